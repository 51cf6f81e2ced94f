use dioxus::prelude::*;
use dioxus_free_icons::{Icon, icons::md_navigation_icons::MdArrowUpward};
use directory::render::ResultsView;

use crate::{
    components::{directory_components::result_card::ResultCard, error_boundary::InlineError, suspend_boundary::LoadingIndicator},
    data_definitions::directory_handle::DirectoryHandle,
};

#[component]
pub fn ResultList() -> Element {
    let handle = use_context::<DirectoryHandle>();
    let directory = handle.directory;
    let view = use_memo(move || directory.read().results_view().clone());
    let observing = use_memo(move || directory.read().scroll().is_observing());

    let empty = view.read().is_empty_result();
    let ResultsView { cards, count, error, loading, show_more_visible, clear_filters_visible } = view();

    rsx! {
        div {
            class: "rsd-results-header",
            h2 { class: "rsd-count", "{count}" }
            if clear_filters_visible {
                button {
                    class: "rsd-button",
                    onclick: move |_| handle.clear_filters(),
                    "Clear filters"
                }
            }
        }
        if let Some(error_txt) = error {
            InlineError { error_txt }
        }
        if empty {
            p { class: "rsd-no-results", "No items match this search." }
        }
        div {
            class: "rsd-card-grid",
            for card in cards {
                ResultCard { key: "{card.id}", card }
            }
        }
        if loading {
            LoadingIndicator {}
        }
        if show_more_visible {
            button {
                class: "rsd-button rsd-show-more",
                onclick: move |_| handle.load_more(),
                "Show more"
            }
        }
        if observing() {
            div {
                class: "rsd-scroll-sentinel",
                onvisible: move |e: Event<VisibleData>| {
                    if e.is_intersecting().unwrap_or(false) {
                        handle.sentinel_visible();
                    }
                },
            }
        }
        button {
            class: "rsd-back-to-top",
            title: "Back to top",
            onclick: move |_| {
                let _ = document::eval("window.scrollTo({ top: 0, behavior: 'smooth' });");
            },
            Icon { icon: MdArrowUpward, style: "width: 24px; height: 24px;" }
        }
    }
}
