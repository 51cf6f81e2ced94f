use dioxus::prelude::*;
use dioxus_free_icons::{Icon, icons::md_action_icons::MdSearch};

use crate::data_definitions::directory_handle::DirectoryHandle;

#[component]
pub fn SearchBar() -> Element {
    let handle = use_context::<DirectoryHandle>();
    let directory = handle.directory;
    let mut text = use_signal(|| directory.peek().query().search_term().to_string());
    let section = use_memo(move || directory.read().section());
    // a section switch clears the term in the query; mirror that in the box
    use_effect(move || {
        let _ = section();
        text.set(directory.peek().query().search_term().to_string());
    });

    rsx! {
        div {
            class: "rsd-search-box",
            button {
                class: "rsd-icon-button",
                onclick: move |_| handle.search_submit(text()),
                Icon { icon: MdSearch, style: "width: 20px; height: 20px;" }
            }
            input {
                r#type: "search",
                placeholder: "Search",
                value: "{text}",
                oninput: move |e: Event<FormData>| {
                    let term = e.value();
                    text.set(term.clone());
                    handle.search_input(term);
                },
                onkeydown: move |e: Event<KeyboardData>| {
                    if e.key() == Key::Enter {
                        handle.search_submit(text());
                    }
                },
            }
        }
    }
}
