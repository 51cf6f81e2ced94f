//! Facet definitions bound to live option data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::facet::{FacetId, FilterType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub value: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub title: String,
    pub identifier: FacetId,
    pub filter_type: FilterType,
    pub options: Vec<FilterOption>,
    pub labels: BTreeMap<String, String>,
    /// Hide options that have no entry in `labels`.
    pub labeled_only: bool,
    pub show_count: bool,
    pub placeholder: Option<String>,
}

impl Filter {
    pub fn new(identifier: FacetId, title: impl Into<String>, options: Vec<FilterOption>) -> Self {
        Self {
            title: title.into(),
            identifier,
            filter_type: identifier.filter_type(),
            options,
            labels: BTreeMap::new(),
            labeled_only: false,
            show_count: true,
            placeholder: None,
        }
    }

    /// A facet that renders but offers nothing, used when its options could not be fetched.
    pub fn empty(identifier: FacetId, title: impl Into<String>) -> Self {
        Self::new(identifier, title, Vec::new())
    }

    pub fn with_labels(mut self, labels: BTreeMap<String, String>) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_labeled_only(mut self, labeled_only: bool) -> Self {
        self.labeled_only = labeled_only;
        self
    }

    /// Options offered to the user, in backend order.
    pub fn items(&self) -> Vec<&FilterOption> {
        self.options
            .iter()
            .filter(|o| !self.labeled_only || self.labels.contains_key(&o.value))
            .collect()
    }

    pub fn values(&self) -> Vec<String> {
        self.items().into_iter().map(|o| o.value.clone()).collect()
    }

    pub fn count(&self, value: &str) -> u64 {
        self.options.iter().find(|o| o.value == value).map(|o| o.count).unwrap_or(0)
    }

    pub fn label(&self, value: &str) -> String {
        let base = self.labels.get(value).cloned().unwrap_or_else(|| value.to_string());
        if self.show_count {
            format!("{} ({})", base, self.count(value))
        } else {
            base
        }
    }

    pub fn remove_option(&mut self, value: &str) {
        self.options.retain(|o| o.value != value);
    }

    pub fn placeholder(&self) -> String {
        match &self.placeholder {
            Some(p) if !p.is_empty() => p.clone(),
            _ => format!("Filter by {}", self.title.to_lowercase()),
        }
    }
}

/// Static labels for the project status enum.
pub fn project_status_labels() -> BTreeMap<String, String> {
    [
        ("upcoming", "Upcoming"),
        ("in_progress", "In progress"),
        ("finished", "Finished"),
        ("unknown", "Unknown"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}
