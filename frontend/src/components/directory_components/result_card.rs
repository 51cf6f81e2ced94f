use dioxus::prelude::*;
use dioxus_free_icons::{Icon, icons::md_social_icons::{MdGroup, MdSchool}};
use directory::render::{Card, CardProps};

#[component]
pub fn ResultCard(card: Card) -> Element {
    let Card { link, image_url, image_contain, title, description, labels, last_updated, props, .. } = card;
    let image_fit = if image_contain { "contain" } else { "cover" };

    rsx! {
        a {
            class: "rsd-card",
            href: "{link}",
            img {
                class: "rsd-card-image",
                src: "{image_url}",
                alt: "",
                loading: "lazy",
                style: "object-fit: {image_fit};",
            }
            div {
                class: "rsd-card-body",
                h3 { class: "rsd-card-title", "{title}" }
                p { class: "rsd-card-description", "{description}" }
                ul {
                    class: "rsd-card-labels",
                    for label in labels {
                        li { key: "{label}", "{label}" }
                    }
                }
            }
            CardFooter { card_props: props, last_updated }
        }
    }
}

#[component]
fn CardFooter(card_props: CardProps, last_updated: Option<String>) -> Element {
    let updated = last_updated.map(|d| format!("Updated {d}")).unwrap_or_default();
    match card_props {
        CardProps::Software { contributors, mentions } => rsx! {
            div {
                class: "rsd-card-footer",
                span { "{updated}" }
                span { title: "Contributors", Icon { icon: MdGroup, style: "width: 18px; height: 18px;" } " {contributors}" }
                span { title: "Mentions", Icon { icon: MdSchool, style: "width: 18px; height: 18px;" } " {mentions}" }
            }
        },
        CardProps::Project { progress, date_start, date_end, impact, output } => rsx! {
            div {
                class: "rsd-card-footer",
                div {
                    class: "rsd-progress",
                    title: "{progress}%",
                    div { class: "rsd-progress-bar", style: "width: {progress}%;" }
                }
                span { class: "rsd-card-period", "{date_start} - {date_end}" }
                span { title: "Impact", "Impact {impact}" }
                span { title: "Output", "Output {output}" }
            }
        },
    }
}
