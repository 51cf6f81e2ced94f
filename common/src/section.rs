//! Top-level content type being browsed.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Software,
    Projects,
}

impl Section {
    pub const ALL: [Section; 2] = [Section::Software, Section::Projects];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Software => "software",
            Section::Projects => "projects",
        }
    }

    /// RPC path listing the published items of an organisation.
    /// The `_search` variant is used whenever a search term is present.
    pub fn list_path(&self, searching: bool) -> &'static str {
        match (self, searching) {
            (Section::Software, false) => "/rpc/software_by_organisation",
            (Section::Software, true) => "/rpc/software_by_organisation_search",
            (Section::Projects, false) => "/rpc/projects_by_organisation",
            (Section::Projects, true) => "/rpc/projects_by_organisation_search",
        }
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSection(pub String);

impl Display for UnknownSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown section: {:?}", self.0)
    }
}

impl std::error::Error for UnknownSection {}

impl FromStr for Section {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "software" => Ok(Section::Software),
            "projects" => Ok(Section::Projects),
            _ => Err(UnknownSection(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_sections_case_insensitively() {
        assert_eq!("Software".parse::<Section>(), Ok(Section::Software));
        assert_eq!(" projects ".parse::<Section>(), Ok(Section::Projects));
        assert!("datasets".parse::<Section>().is_err());
    }

    #[test]
    fn search_selects_search_rpc() {
        assert_eq!(Section::Projects.list_path(true), "/rpc/projects_by_organisation_search");
        assert_eq!(Section::Software.list_path(false), "/rpc/software_by_organisation");
    }
}
