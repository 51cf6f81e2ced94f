//! The single source of truth for the query a page section is showing.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{
    facet::{FacetId, FilterType},
    section::Section,
    sort::SortOrder,
};

/// Any mutation that changes which rows match (search, filters, sort, section)
/// resets `offset` to 0; only page loads advance it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct QueryState {
    section: Section,
    organisation_id: String,
    search_term: String,
    active_filters: BTreeMap<FacetId, BTreeSet<String>>,
    order: Option<SortOrder>,
    offset: u64,
    total_count: Option<u64>,
}

pub fn normalize_search_term(term: &str) -> String {
    term.trim().to_lowercase()
}

impl QueryState {
    pub fn new(section: Section, organisation_id: impl Into<String>) -> Self {
        Self { section, organisation_id: organisation_id.into(), ..Default::default() }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn organisation_id(&self) -> &str {
        &self.organisation_id
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn active_filters(&self) -> &BTreeMap<FacetId, BTreeSet<String>> {
        &self.active_filters
    }

    pub fn selection(&self, facet: FacetId) -> Option<&BTreeSet<String>> {
        self.active_filters.get(&facet)
    }

    pub fn is_selected(&self, facet: FacetId, value: &str) -> bool {
        self.selection(facet).map(|s| s.contains(value)).unwrap_or(false)
    }

    pub fn order(&self) -> Option<SortOrder> {
        self.order
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// `None` until a response has reported a total.
    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    /// Returns whether the normalized term differs from the current one.
    pub fn set_search_term(&mut self, term: &str) -> bool {
        let term = normalize_search_term(term);
        let changed = term != self.search_term;
        self.search_term = term;
        self.reset_pagination();
        changed
    }

    /// Replaces the selection of one facet; an empty selection removes the facet.
    pub fn set_filter(&mut self, facet: FacetId, values: impl IntoIterator<Item = String>) {
        let mut values: BTreeSet<String> = values.into_iter().filter(|v| !v.is_empty()).collect();
        if facet.filter_type() == FilterType::SingleSelect && values.len() > 1 {
            let first = values.pop_first();
            values = first.into_iter().collect();
        }
        if values.is_empty() {
            self.active_filters.remove(&facet);
        } else {
            self.active_filters.insert(facet, values);
        }
        self.reset_pagination();
    }

    /// Checkbox semantics: adds or removes one value. Single-select facets
    /// replace their selection instead of accumulating.
    pub fn toggle_filter_value(&mut self, facet: FacetId, value: &str) {
        let mut current = self.selection(facet).cloned().unwrap_or_default();
        if current.contains(value) {
            current.remove(value);
        } else {
            if facet.filter_type() == FilterType::SingleSelect {
                current.clear();
            }
            current.insert(value.to_string());
        }
        self.set_filter(facet, current);
    }

    pub fn clear_filters(&mut self) {
        self.active_filters.clear();
        self.reset_pagination();
    }

    /// Clears facet selections and, unless `keep_search` is set, the search term.
    pub fn clear_all(&mut self, keep_search: bool) {
        if !keep_search {
            self.search_term.clear();
        }
        self.clear_filters();
    }

    pub fn set_sort(&mut self, order: Option<SortOrder>) {
        self.order = order;
        self.reset_pagination();
    }

    /// Switching section is a full reset: nothing from the previous section survives.
    pub fn switch_section(&mut self, section: Section) {
        let organisation_id = std::mem::take(&mut self.organisation_id);
        *self = Self::new(section, organisation_id);
    }

    pub fn has_active_query(&self) -> bool {
        !self.search_term.is_empty() || self.active_filters.values().any(|v| !v.is_empty())
    }

    pub fn reset_pagination(&mut self) {
        self.offset = 0;
    }

    pub fn set_offset(&mut self, offset: u64) {
        self.offset = offset;
    }

    /// A missing count leaves the previously known total in place.
    pub fn record_total_count(&mut self, total: Option<u64>) {
        if total.is_some() {
            self.total_count = total;
        }
    }

    pub fn forget_total_count(&mut self) {
        self.total_count = None;
    }

    pub fn list_path(&self) -> &'static str {
        self.section.list_path(!self.search_term.is_empty())
    }

    /// Query parameters for the list endpoint at the current offset.
    pub fn to_request_params(&self, limit: u64) -> Vec<(String, String)> {
        let mut params = vec![
            ("organisation_id".to_string(), self.organisation_id.clone()),
            ("status".to_string(), "eq.approved".to_string()),
            ("is_published".to_string(), "eq.true".to_string()),
            ("limit".to_string(), limit.to_string()),
            ("offset".to_string(), self.offset.to_string()),
        ];
        if !self.search_term.is_empty() {
            params.push(("search".to_string(), self.search_term.clone()));
        }
        if let Some(order) = self.order {
            params.push(("order".to_string(), order.to_param()));
        }
        for (facet, values) in self.active_filters.iter() {
            if values.is_empty() || !facet.applies_to(self.section) {
                continue;
            }
            params.push((facet.param_name().to_string(), facet.encode_selection(values)));
        }
        params
    }
}
