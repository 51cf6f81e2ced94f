//! Host-provided configuration consumed by the directory.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{facet::FacetId, section::Section};

pub const DEFAULT_API_ENDPOINT: &str = "https://research-software-directory.org/api";
pub const DEFAULT_API_VERSION: &str = "v1";
pub const DEFAULT_LINK_BASE_URL: &str = "https://research-software-directory.org";
pub const DEFAULT_IMG_PATH: &str = "/image/rpc/get_image";
/// 1x1 transparent GIF.
pub const DEFAULT_IMG_URL: &str = "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAAAIBRAA7";
pub const DEFAULT_PAGE_SIZE: u64 = 48;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub endpoint: String,
    pub version: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self { endpoint: DEFAULT_API_ENDPOINT.to_string(), version: DEFAULT_API_VERSION.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    /// Enabled facets per section, in display order.
    pub filters: BTreeMap<Section, Vec<FacetId>>,
    pub img_url: String,
    pub link_base_url: String,
    pub img_base_url: String,
    pub img_path: String,
    pub page_size: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiSettings::default(),
            filters: Section::ALL.into_iter().map(|s| (s, FacetId::for_section(s))).collect(),
            img_url: DEFAULT_IMG_URL.to_string(),
            link_base_url: DEFAULT_LINK_BASE_URL.to_string(),
            img_base_url: DEFAULT_LINK_BASE_URL.to_string(),
            img_path: DEFAULT_IMG_PATH.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Settings {
    /// Facets enabled for a section; facets that do not exist for the section are dropped.
    pub fn enabled_facets(&self, section: Section) -> Vec<FacetId> {
        self.filters
            .get(&section)
            .map(|f| f.iter().copied().filter(|f| f.applies_to(section)).collect())
            .unwrap_or_default()
    }

    pub fn is_facet_enabled(&self, section: Section, facet: FacetId) -> bool {
        self.enabled_facets(section).contains(&facet)
    }

    pub fn image_url(&self, image_id: Option<&str>) -> String {
        match image_id {
            Some(id) if !id.is_empty() => format!("{}{}?uid={}", self.img_base_url, self.img_path, id),
            _ => self.img_url.clone(),
        }
    }

    pub fn item_link(&self, section: Section, slug: &str) -> String {
        format!("{}/{}/{}", self.link_base_url.trim_end_matches('/'), section, slug)
    }
}
