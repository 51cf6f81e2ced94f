use common::{section::Section, settings::Settings};
use dioxus::{logger::tracing, prelude::*};
use directory::{ApiClient, Directory, api::PrerenderedPage};

use crate::{
    api::directory_api::{directory_settings, prerender_first_page},
    components::{
        directory_components::{
            filter_panel::FilterPanel, result_list::ResultList, search_bar::SearchBar, section_tabs::SectionTabs,
            sort_select::SortSelect,
        },
        error_boundary::InlineError,
        suspend_boundary::{LoadingIndicator, SuspendWrapper},
    },
    data_definitions::{directory_handle::DirectoryHandle, page_preset::PagePreset, url_param::UrlParam},
};

#[component]
pub fn DirectoryPage(section: Section, organisation_id: String) -> Element {
    rsx! {
        Title { "Research Software Directory: {section}" }
        SuspendWrapper {
            DirectoryPageRoot { section, organisation_id, preset: PagePreset::default() }
        }
    }
}

#[component]
pub fn DirectoryPresetPage(section: Section, organisation_id: String, preset: UrlParam<PagePreset>) -> Element {
    rsx! {
        Title { "Research Software Directory: {section}" }
        SuspendWrapper {
            DirectoryPageRoot { section, organisation_id, preset: preset.0.clone() }
        }
    }
}

/// Waits for settings and the server-rendered first page, then hands both to the live listing.
#[component]
fn DirectoryPageRoot(section: ReadSignal<Section>, organisation_id: ReadSignal<String>, preset: ReadSignal<PagePreset>) -> Element {
    let settings = use_server_future(directory_settings)?;
    let first_page = use_server_future(move || {
        prerender_first_page(section(), organisation_id(), preset())
    })?;

    let settings = settings.read().clone();
    let first_page = first_page.read().clone();
    match (settings, first_page) {
        (Some(Ok(settings)), Some(first_page)) => {
            // a failed first page is fetched again by the client, which reports its own errors
            let first_page = match first_page {
                Ok(page) => Some(page),
                Err(e) => {
                    tracing::warn!("prerendering the first page failed: {}", e);
                    None
                }
            };
            rsx! {
                DirectoryView {
                    key: "{section}-{organisation_id}",
                    settings,
                    first_page,
                    section: section(),
                    organisation_id: organisation_id(),
                    preset: preset(),
                }
            }
        }
        (Some(Err(e)), _) => rsx! { InlineError { error_txt: e.to_string() } },
        _ => rsx! { LoadingIndicator {} },
    }
}

#[component]
fn DirectoryView(settings: Settings, first_page: Option<PrerenderedPage>, section: Section, organisation_id: String, preset: PagePreset) -> Element {
    let keep_search = preset.keeps_search();
    let prerendered = first_page.is_some();
    let directory = use_signal(move || {
        let api = ApiClient::new(&settings.api);
        let mut directory = Directory::new(api, settings, section, organisation_id);
        preset.apply(&mut directory);
        if let Some(page) = first_page {
            directory.adopt_prerendered(page.items, page.total);
        }
        directory
    });
    let handle = use_context_provider(move || DirectoryHandle::new(directory, keep_search));
    use_hook(move || {
        if prerendered {
            handle.refresh_facets();
        } else {
            handle.refresh();
        }
    });

    rsx! {
        div {
            id: "x-directory-root",
            class: "rsd-directory",
            div {
                class: "rsd-directory-top-bar",
                SectionTabs {}
                SearchBar {}
                SortSelect {}
            }
            div {
                class: "rsd-directory-body",
                div {
                    class: "rsd-directory-filters",
                    FilterPanel {}
                }
                div {
                    class: "rsd-directory-results",
                    ResultList {}
                }
            }
        }
    }
}
