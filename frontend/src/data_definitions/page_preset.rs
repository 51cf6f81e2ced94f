//! Search term and sort order chosen by the page that embeds a listing.

use common::{query_state::QueryState, section::Section, sort::SortOrder};
use directory::{Directory, Transport};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PagePreset {
    pub search: String,
    pub order: Option<SortOrder>,
}

impl PagePreset {
    /// A preset search term survives "clear filters".
    pub fn keeps_search(&self) -> bool {
        !self.search.trim().is_empty()
    }

    pub fn to_query_state(&self, section: Section, organisation_id: String) -> QueryState {
        let mut query = QueryState::new(section, organisation_id);
        query.set_search_term(&self.search);
        query.set_sort(self.order);
        query
    }

    pub fn apply<T: Transport>(&self, directory: &mut Directory<T>) {
        directory.set_search_term(&self.search);
        directory.set_sort(self.order);
    }
}
