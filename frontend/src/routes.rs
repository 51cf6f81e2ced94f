use common::section::Section;
use dioxus::prelude::*;

use crate::data_definitions::page_preset::PagePreset;
use crate::data_definitions::url_param::UrlParam;
use crate::pages::directory_page::{DirectoryPage, DirectoryPresetPage};
use crate::pages::home_page::HomePage;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[route("/")]
    HomePage {},

    #[route("/:section/:organisation_id")]
    DirectoryPage { section: Section, organisation_id: String },

    /// Same listing with a search term and sort order set by the host page.
    #[route("/:section/:organisation_id/:preset")]
    DirectoryPresetPage {
        section: Section,
        organisation_id: String,
        preset: UrlParam<PagePreset>,
    },
}
