pub mod filter_panel;
pub mod result_card;
pub mod result_list;
pub mod search_bar;
pub mod section_tabs;
pub mod sort_select;
