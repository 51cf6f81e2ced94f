//! Closed set of facets a listing can be narrowed by, and their backend names.

use std::{collections::BTreeSet, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::section::Section;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetId {
    Keyword,
    ProgLanguage,
    License,
    ProjectStatus,
    Domain,
    Organisation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterType {
    SingleSelect,
    MultiCheckbox,
}

impl FacetId {
    pub const ALL: [FacetId; 6] = [
        FacetId::Keyword,
        FacetId::ProgLanguage,
        FacetId::License,
        FacetId::ProjectStatus,
        FacetId::Domain,
        FacetId::Organisation,
    ];

    /// Query key, also the field name of the option rows returned by the backend.
    pub fn identifier(&self) -> &'static str {
        match self {
            FacetId::Keyword => "keyword",
            FacetId::ProgLanguage => "prog_language",
            FacetId::License => "license",
            FacetId::ProjectStatus => "project_status",
            FacetId::Domain => "domain",
            FacetId::Organisation => "organisation",
        }
    }

    /// Name of the list endpoint parameter carrying this facet's selection.
    pub fn param_name(&self) -> &'static str {
        match self {
            FacetId::Keyword => "keywords",
            FacetId::ProgLanguage => "prog_lang",
            FacetId::License => "licenses",
            FacetId::ProjectStatus => "project_status",
            FacetId::Domain => "research_domain",
            FacetId::Organisation => "participating_organisations",
        }
    }

    /// Name of the body field used to narrow the option lists of the other facets.
    pub fn narrowing_param(&self) -> &'static str {
        match self {
            FacetId::Keyword => "keyword_filter",
            FacetId::ProgLanguage => "prog_lang_filter",
            FacetId::License => "license_filter",
            FacetId::ProjectStatus => "status_filter",
            FacetId::Domain => "research_domain_filter",
            FacetId::Organisation => "organisation_filter",
        }
    }

    pub fn filter_type(&self) -> FilterType {
        match self {
            FacetId::ProjectStatus => FilterType::SingleSelect,
            _ => FilterType::MultiCheckbox,
        }
    }

    pub fn default_title(&self) -> &'static str {
        match self {
            FacetId::Keyword => "Keywords",
            FacetId::ProgLanguage => "Programming Languages",
            FacetId::License => "Licenses",
            FacetId::ProjectStatus => "Project Status",
            FacetId::Domain => "Research Domains",
            FacetId::Organisation => "Partners",
        }
    }

    /// RPC path returning `{<identifier>, <identifier>_cnt}` rows, or `None`
    /// when the facet does not exist for the section.
    pub fn option_path(&self, section: Section) -> Option<&'static str> {
        match (section, self) {
            (Section::Software, FacetId::Keyword) => Some("/rpc/org_software_keywords_filter"),
            (Section::Software, FacetId::ProgLanguage) => Some("/rpc/org_software_languages_filter"),
            (Section::Software, FacetId::License) => Some("/rpc/org_software_licenses_filter"),
            (Section::Projects, FacetId::ProjectStatus) => Some("/rpc/org_project_status_filter"),
            (Section::Projects, FacetId::Keyword) => Some("/rpc/org_project_keywords_filter"),
            (Section::Projects, FacetId::Domain) => Some("/rpc/org_project_domains_filter"),
            (Section::Projects, FacetId::Organisation) => {
                Some("/rpc/org_project_participating_organisations_filter")
            }
            _ => None,
        }
    }

    pub fn applies_to(&self, section: Section) -> bool {
        self.option_path(section).is_some()
    }

    /// Facets of a section in their default display order.
    pub fn for_section(section: Section) -> Vec<FacetId> {
        match section {
            Section::Software => vec![FacetId::Keyword, FacetId::ProgLanguage, FacetId::License],
            Section::Projects => vec![
                FacetId::ProjectStatus,
                FacetId::Keyword,
                FacetId::Domain,
                FacetId::Organisation,
            ],
        }
    }

    /// Encodes a selection as a list endpoint filter value: equality on the
    /// lower-cased status for the single-valued facet, array containment otherwise.
    pub fn encode_selection(&self, values: &BTreeSet<String>) -> String {
        match self.filter_type() {
            FilterType::SingleSelect => {
                let joined = values.iter().map(|v| v.to_lowercase()).collect::<Vec<_>>().join(",");
                format!("eq.{joined}")
            }
            FilterType::MultiCheckbox => {
                let quoted = values.iter().map(|v| format!("\"{v}\"")).collect::<Vec<_>>().join(",");
                format!("cs.{{{quoted}}}")
            }
        }
    }
}

impl Display for FacetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFacet(pub String);

impl Display for UnknownFacet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown facet identifier: {:?}", self.0)
    }
}

impl std::error::Error for UnknownFacet {}

impl FromStr for FacetId {
    type Err = UnknownFacet;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FacetId::ALL
            .iter()
            .find(|f| f.identifier() == s.trim())
            .copied()
            .ok_or_else(|| UnknownFacet(s.to_string()))
    }
}
