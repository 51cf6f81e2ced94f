//! Server functions backing the directory page.

use common::{section::Section, settings::Settings};
use dioxus::prelude::*;
use directory::api::PrerenderedPage;

use crate::data_definitions::page_preset::PagePreset;

#[cfg(feature = "server")]
fn server_error(e: anyhow::Error) -> ServerFnError {
    ServerFnError::ServerError { message: format!("{e:#}"), code: 500, details: None }
}

#[server]
pub async fn directory_settings() -> Result<Settings, ServerFnError> {
    directory::config::settings_from_env().map_err(server_error)
}

/// First page of a listing, rendered with the page so the browser adopts it instead of asking again.
#[server]
pub async fn prerender_first_page(section: Section, organisation_id: String, preset: PagePreset) -> Result<PrerenderedPage, ServerFnError> {
    let settings = directory::config::settings_from_env().map_err(server_error)?;
    let api = directory::ApiClient::new(&settings.api);
    let query = preset.to_query_state(section, organisation_id);
    directory::api::prerender_first_page(&api, &settings, query).await.map_err(server_error)
}
