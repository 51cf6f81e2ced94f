//! Server-side settings from environment variables.

use anyhow::Context;
use common::{facet::FacetId, section::Section, settings::Settings};

fn parse_facets(value: &str) -> anyhow::Result<Vec<FacetId>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<FacetId>().map_err(anyhow::Error::from))
        .collect()
}

/// Builds settings from a variable lookup; anything unset keeps its default.
pub fn settings_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();
    settings.api.endpoint = lookup("RSD_API_ENDPOINT").unwrap_or(settings.api.endpoint);
    settings.api.version = lookup("RSD_API_VERSION").unwrap_or(settings.api.version);
    settings.img_url = lookup("RSD_IMG_URL").unwrap_or(settings.img_url);
    if let Some(base) = lookup("RSD_LINK_BASE_URL") {
        settings.img_base_url = base.clone();
        settings.link_base_url = base;
    }
    if let Some(page_size) = lookup("RSD_PAGE_SIZE") {
        settings.page_size = page_size
            .trim()
            .parse()
            .with_context(|| format!("RSD_PAGE_SIZE is not a number: {page_size:?}"))?;
    }
    for (section, var) in [(Section::Software, "RSD_SOFTWARE_FILTERS"), (Section::Projects, "RSD_PROJECTS_FILTERS")] {
        if let Some(value) = lookup(var) {
            let facets = parse_facets(&value).with_context(|| format!("{var} is invalid"))?;
            settings.filters.insert(section, facets);
        }
    }
    Ok(settings)
}

pub fn settings_from_env() -> anyhow::Result<Settings> {
    settings_from_lookup(|name| std::env::var(name).ok())
}
