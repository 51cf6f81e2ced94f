use common::section::Section;
use dioxus::prelude::*;

use crate::routes::Route;

/// Picks an organisation and section when the listing is opened without one.
#[component]
pub fn HomePage() -> Element {
    let mut organisation_id = use_signal(String::new);
    let mut section = use_signal(Section::default);
    let open = move |_| {
        let organisation_id = organisation_id.read().trim().to_string();
        if organisation_id.is_empty() {
            return;
        }
        navigator().push(Route::DirectoryPage { section: section(), organisation_id });
    };

    rsx! {
        Title { "Research Software Directory" }
        div {
            class: "rsd-home",
            h1 { "Research Software Directory" }
            input {
                r#type: "text",
                placeholder: "Organisation id",
                value: "{organisation_id}",
                oninput: move |e: Event<FormData>| organisation_id.set(e.value()),
            }
            select {
                onchange: move |e: Event<FormData>| {
                    if let Ok(s) = e.value().parse::<Section>() {
                        section.set(s);
                    }
                },
                for s in Section::ALL {
                    option { value: "{s}", selected: s == section(), "{s}" }
                }
            }
            button { class: "rsd-button", onclick: open, "Open" }
        }
    }
}
