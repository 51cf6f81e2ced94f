//! Facet option lists. Options come from the last facet load; selection state
//! comes from the query, so a refresh never loses what the user ticked.

use common::facet::{FacetId, FilterType};
use dioxus::prelude::*;
use dioxus_free_icons::{
    Icon,
    icons::md_toggle_icons::{MdCheckBox, MdCheckBoxOutlineBlank, MdRadioButtonChecked, MdRadioButtonUnchecked},
};
use directory::render::{FacetControl, OptionControl};

use crate::data_definitions::directory_handle::DirectoryHandle;

#[component]
pub fn FilterPanel() -> Element {
    let handle = use_context::<DirectoryHandle>();
    let directory = handle.directory;
    let controls = use_memo(move || directory.read().facet_controls().to_vec());

    rsx! {
        div {
            class: "rsd-filter-panel",
            for control in controls() {
                FacetBlock { key: "{control.identifier}", control }
            }
        }
    }
}

#[component]
fn FacetBlock(control: FacetControl) -> Element {
    let FacetControl { identifier, title, placeholder, filter_type, options } = control;
    rsx! {
        section {
            class: "rsd-facet",
            h3 { "{title}" }
            if options.is_empty() {
                p { class: "rsd-facet-empty", "{placeholder}" }
            }
            ul {
                for option in options {
                    li {
                        key: "{option.value}",
                        FacetOption { facet: identifier, filter_type, option }
                    }
                }
            }
        }
    }
}

#[component]
fn FacetOption(facet: FacetId, filter_type: FilterType, option: OptionControl) -> Element {
    let handle = use_context::<DirectoryHandle>();
    let OptionControl { value, label, count, selected } = option;
    let muted = if count == 0 { "rsd-facet-option rsd-facet-option-missing" } else { "rsd-facet-option" };

    rsx! {
        div {
            class: muted,
            onclick: move |_| handle.toggle_filter(facet, value.clone()),
            if filter_type == FilterType::SingleSelect {
                if selected {
                    Icon { icon: MdRadioButtonChecked, style: "width: 22px; height: 22px; flex-shrink: 0;" }
                } else {
                    Icon { icon: MdRadioButtonUnchecked, style: "width: 22px; height: 22px; flex-shrink: 0;" }
                }
            } else if selected {
                Icon { icon: MdCheckBox, style: "width: 22px; height: 22px; flex-shrink: 0;" }
            } else {
                Icon { icon: MdCheckBoxOutlineBlank, style: "width: 22px; height: 22px; flex-shrink: 0;" }
            }
            span { class: "rsd-facet-option-label", "{label}" }
        }
    }
}
