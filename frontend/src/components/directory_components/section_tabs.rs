use common::section::Section;
use dioxus::prelude::*;

use crate::data_definitions::directory_handle::DirectoryHandle;

#[component]
pub fn SectionTabs() -> Element {
    rsx! {
        nav {
            class: "rsd-section-tabs",
            for section in Section::ALL {
                SectionTab { key: "{section}", section }
            }
        }
    }
}

#[component]
fn SectionTab(section: Section) -> Element {
    let handle = use_context::<DirectoryHandle>();
    let directory = handle.directory;
    let active = use_memo(move || directory.read().section() == section);
    let class = if active() { "rsd-tab rsd-tab-active" } else { "rsd-tab" };
    let label = match section {
        Section::Software => "Software",
        Section::Projects => "Projects",
    };

    rsx! {
        button {
            class,
            onclick: move |_| handle.switch_section(section),
            "{label}"
        }
    }
}
