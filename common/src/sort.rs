//! Sort fields and the backend `order` parameter.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    BrandName,
    Title,
    UpdatedAt,
    MentionCnt,
    ContributorCnt,
    ImpactCnt,
    OutputCnt,
    DateStart,
    DateEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortField {
    pub const ALL: [SortField; 9] = [
        SortField::BrandName,
        SortField::Title,
        SortField::UpdatedAt,
        SortField::MentionCnt,
        SortField::ContributorCnt,
        SortField::ImpactCnt,
        SortField::OutputCnt,
        SortField::DateStart,
        SortField::DateEnd,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::BrandName => "brand_name",
            SortField::Title => "title",
            SortField::UpdatedAt => "updated_at",
            SortField::MentionCnt => "mention_cnt",
            SortField::ContributorCnt => "contributor_cnt",
            SortField::ImpactCnt => "impact_cnt",
            SortField::OutputCnt => "output_cnt",
            SortField::DateStart => "date_start",
            SortField::DateEnd => "date_end",
        }
    }

    /// Nullable numeric and date columns; rows without a value must sort last.
    pub fn nulls_last(&self) -> bool {
        matches!(
            self,
            SortField::MentionCnt
                | SortField::ContributorCnt
                | SortField::ImpactCnt
                | SortField::OutputCnt
                | SortField::DateStart
                | SortField::DateEnd
        )
    }

    pub fn default_direction(&self) -> SortDirection {
        match self {
            SortField::MentionCnt
            | SortField::ContributorCnt
            | SortField::ImpactCnt
            | SortField::OutputCnt
            | SortField::UpdatedAt
            | SortField::DateEnd => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl SortOrder {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn with_default_direction(field: SortField) -> Self {
        Self { field, direction: field.default_direction() }
    }

    pub fn to_param(&self) -> String {
        build_order_param(self.field, self.direction)
    }
}

pub fn build_order_param(field: SortField, direction: SortDirection) -> String {
    if field.nulls_last() {
        format!("{}.{}.nullslast", field.as_str(), direction.as_str())
    } else {
        format!("{}.{}", field.as_str(), direction.as_str())
    }
}

impl Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSortField(pub String);

impl Display for UnknownSortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown sort field: {:?}", self.0)
    }
}

impl std::error::Error for UnknownSortField {}

impl FromStr for SortField {
    type Err = UnknownSortField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s_lower = s.trim().to_lowercase();
        SortField::ALL
            .iter()
            .find(|f| f.as_str() == s_lower)
            .copied()
            .ok_or_else(|| UnknownSortField(s.to_string()))
    }
}
