use common::{
    section::Section,
    sort::{SortField, SortOrder},
};
use dioxus::prelude::*;

use crate::data_definitions::directory_handle::DirectoryHandle;

fn sort_fields(section: Section) -> &'static [(SortField, &'static str)] {
    match section {
        Section::Software => &[
            (SortField::BrandName, "Name"),
            (SortField::UpdatedAt, "Last updated"),
            (SortField::MentionCnt, "Mentions"),
            (SortField::ContributorCnt, "Contributors"),
        ],
        Section::Projects => &[
            (SortField::Title, "Title"),
            (SortField::UpdatedAt, "Last updated"),
            (SortField::DateStart, "Start date"),
            (SortField::DateEnd, "End date"),
            (SortField::ImpactCnt, "Impact"),
            (SortField::OutputCnt, "Output"),
        ],
    }
}

/// Sort order; picking a field uses its natural direction.
#[component]
pub fn SortSelect() -> Element {
    let handle = use_context::<DirectoryHandle>();
    let directory = handle.directory;
    let section = use_memo(move || directory.read().section());
    let selected = use_memo(move || directory.read().query().order().map(|o| o.field));

    rsx! {
        select {
            class: "rsd-sort-select",
            onchange: move |e: Event<FormData>| {
                let order = e.value().parse::<SortField>().ok().map(SortOrder::with_default_direction);
                handle.set_sort(order);
            },
            option { value: "", selected: selected().is_none(), "Default order" }
            for (field, label) in sort_fields(section()) {
                option {
                    key: "{field.as_str()}",
                    value: "{field.as_str()}",
                    selected: selected() == Some(*field),
                    "{label}"
                }
            }
        }
    }
}
