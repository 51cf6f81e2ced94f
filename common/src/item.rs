//! Directory entries decoded from list endpoint rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    progress::{compute_progress, parse_backend_date},
    section::Section,
    settings::Settings,
};

/// Backend rows carry explicit `null`s; treat them like missing fields.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ItemCommon {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_published: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub image_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SoftwareItem {
    #[serde(flatten)]
    pub common: ItemCommon,
    #[serde(default, deserialize_with = "null_as_default")]
    pub brand_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub short_statement: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contributor_cnt: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mention_cnt: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prog_lang: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub licenses: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub closed_source: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProjectItem {
    #[serde(flatten)]
    pub common: ItemCommon,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subtitle: String,
    #[serde(default)]
    pub date_start: Option<String>,
    #[serde(default)]
    pub date_end: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_contain: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_featured: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub research_domain: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub participating_organisations: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub impact_cnt: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub output_cnt: u64,
    #[serde(default)]
    pub project_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Item {
    Software(SoftwareItem),
    Project(ProjectItem),
}

/// Last non-empty path segment of a URL, used when a row has no slug.
pub fn slug_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    path.trim_end_matches('/').rsplit('/').next().unwrap_or_default().to_string()
}

impl Item {
    /// Decodes one backend row for a section; missing fields fall back to defaults.
    pub fn from_row(section: Section, row: serde_json::Value) -> Result<Item, serde_json::Error> {
        let item = match section {
            Section::Software => {
                let mut software: SoftwareItem = serde_json::from_value(row)?;
                if software.common.slug.is_empty() {
                    if let Some(url) = &software.url {
                        software.common.slug = slug_from_url(url);
                    }
                }
                Item::Software(software)
            }
            Section::Projects => Item::Project(serde_json::from_value(row)?),
        };
        Ok(item)
    }

    pub fn common(&self) -> &ItemCommon {
        match self {
            Item::Software(s) => &s.common,
            Item::Project(p) => &p.common,
        }
    }

    pub fn section(&self) -> Section {
        match self {
            Item::Software(_) => Section::Software,
            Item::Project(_) => Section::Projects,
        }
    }

    pub fn id(&self) -> &str {
        &self.common().id
    }

    pub fn slug(&self) -> &str {
        &self.common().slug
    }

    pub fn title(&self) -> &str {
        match self {
            Item::Software(s) => &s.brand_name,
            Item::Project(p) => &p.title,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Item::Software(s) => &s.short_statement,
            Item::Project(p) => &p.subtitle,
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.common().keywords
    }

    pub fn image_url(&self, settings: &Settings) -> String {
        settings.image_url(self.common().image_id.as_deref())
    }

    pub fn link(&self, settings: &Settings) -> String {
        settings.item_link(self.section(), self.slug())
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.common().updated_at.as_deref().and_then(parse_backend_date)
    }
}

impl SoftwareItem {
    pub fn prog_lang_string(&self) -> String {
        self.prog_lang.join(", ")
    }

    pub fn licenses_string(&self) -> String {
        self.licenses.join(", ")
    }
}

impl ProjectItem {
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.date_start.as_deref().and_then(parse_backend_date)
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.date_end.as_deref().and_then(parse_backend_date)
    }

    /// Progress at `now`; 0 when either date is missing or unparsable.
    pub fn progress_at(&self, now: DateTime<Utc>) -> u8 {
        match (self.start(), self.end()) {
            (Some(start), Some(end)) => compute_progress(now, start, end),
            _ => 0,
        }
    }

    /// Short `Mon YYYY` date labels for cards.
    pub fn period_labels(&self) -> (String, String) {
        let fmt = |d: Option<DateTime<Utc>>| d.map(|d| d.format("%b %Y").to_string()).unwrap_or_default();
        (fmt(self.start()), fmt(self.end()))
    }
}
