//! Fetches and accumulates result pages for the active query.
//!
//! A fetch is split in three steps so that the network await never holds the
//! controller: `begin_*` snapshots the query into a [`PageRequest`],
//! [`fetch_page`] runs it, and [`ResultController::complete`] reconciles the
//! outcome. Every fresh query bumps the generation; a completion carrying an
//! older generation is discarded, so a slow earlier response can never
//! overwrite a faster later one.

use std::collections::HashSet;

use common::{item::Item, query_state::QueryState, section::Section};
use tracing::{debug, info, warn};

use crate::{
    api_client::{ApiClient, Transport, parse_content_range},
    error::{ApiError, Result},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    Replace,
    Append,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Errored(ApiError),
}

/// Consistent snapshot of the query at the moment a page was requested.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub generation: u64,
    pub mode: LoadMode,
    pub section: Section,
    pub path: &'static str,
    pub params: Vec<(String, String)>,
    pub offset: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub items: Vec<Item>,
    pub total: Option<u64>,
}

/// What a completion did, for the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciled {
    Replaced { total: Option<u64> },
    Appended { items: Vec<Item>, total: Option<u64> },
    Failed { mode: LoadMode, error: ApiError },
    Discarded { generation: u64 },
}

pub async fn fetch_page<T: Transport>(api: &ApiClient<T>, request: &PageRequest) -> Result<Page> {
    let response = api.fetch_list(request.path, &request.params, true).await?;
    let total = response.content_range.as_deref().and_then(parse_content_range);
    let mut items = Vec::with_capacity(response.rows.len());
    for row in response.rows {
        match Item::from_row(request.section, row) {
            Ok(item) => items.push(item),
            Err(e) => warn!("skipping malformed {} row: {}", request.section, e),
        }
    }
    Ok(Page { items, total })
}

#[derive(Debug, Clone)]
pub struct ResultController {
    items: Vec<Item>,
    state: LoadState,
    generation: u64,
    in_flight: Option<(u64, LoadMode)>,
    page_size: u64,
    discarded: u64,
    /// The last fresh load failed; nothing may be appended until the next one.
    replace_failed: bool,
}

impl ResultController {
    pub fn new(page_size: u64) -> Self {
        Self {
            items: Vec::new(),
            state: LoadState::Idle,
            generation: 0,
            in_flight: None,
            page_size: page_size.max(1),
            discarded: 0,
            replace_failed: false,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Number of stale responses dropped so far.
    pub fn discarded_count(&self) -> u64 {
        self.discarded
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// With an unknown total, more items are assumed unless a fetch is already running.
    /// Never true after a failed fresh load.
    pub fn has_more_items(&self, query: &QueryState) -> bool {
        if self.replace_failed {
            return false;
        }
        match query.total_count() {
            Some(total) => (self.items.len() as u64) < total,
            None => self.in_flight.is_none(),
        }
    }

    fn request(&self, query: &QueryState, mode: LoadMode) -> PageRequest {
        PageRequest {
            generation: self.generation,
            mode,
            section: query.section(),
            path: query.list_path(),
            params: query.to_request_params(self.page_size),
            offset: query.offset(),
        }
    }

    /// Starts a fresh query: pagination restarts and accumulated items are dropped.
    pub fn begin_load(&mut self, query: &mut QueryState) -> PageRequest {
        self.generation += 1;
        self.items.clear();
        self.replace_failed = false;
        query.reset_pagination();
        self.in_flight = Some((self.generation, LoadMode::Replace));
        self.state = LoadState::Loading;
        self.request(query, LoadMode::Replace)
    }

    /// Next page at `offset = items.len()`, or `None` when there is nothing more
    /// to load or a page fetch is already running.
    pub fn begin_load_more(&mut self, query: &mut QueryState) -> Option<PageRequest> {
        if self.in_flight.is_some() {
            debug!("load more ignored: fetch in flight");
            return None;
        }
        if !self.has_more_items(query) {
            return None;
        }
        query.set_offset(self.items.len() as u64);
        self.in_flight = Some((self.generation, LoadMode::Append));
        self.state = LoadState::Loading;
        Some(self.request(query, LoadMode::Append))
    }

    pub fn complete(&mut self, query: &mut QueryState, request: &PageRequest, outcome: Result<Page>) -> Reconciled {
        if request.generation != self.generation || self.in_flight != Some((request.generation, request.mode)) {
            self.discarded += 1;
            debug!("discarding stale response of generation {} (current {})", request.generation, self.generation);
            return Reconciled::Discarded { generation: request.generation };
        }
        self.in_flight = None;

        let page = match outcome {
            Ok(page) => page,
            Err(error) => {
                warn!("fetching {} items at offset {} failed: {}", request.section, request.offset, error);
                self.state = LoadState::Errored(error.clone());
                self.replace_failed = request.mode == LoadMode::Replace;
                return Reconciled::Failed { mode: request.mode, error };
            }
        };

        query.record_total_count(page.total);
        self.state = LoadState::Loaded;
        let reconciled = match request.mode {
            LoadMode::Replace => {
                self.items = page.items;
                Reconciled::Replaced { total: query.total_count() }
            }
            LoadMode::Append => {
                let seen: HashSet<String> = self.items.iter().map(|i| i.id().to_string()).collect();
                let fresh: Vec<Item> = page.items.into_iter().filter(|i| !seen.contains(i.id())).collect();
                if fresh.is_empty() {
                    // backend ran out before the reported total, or only repeated itself
                    query.record_total_count(Some(self.items.len() as u64));
                }
                self.items.extend(fresh.iter().cloned());
                Reconciled::Appended { items: fresh, total: query.total_count() }
            }
        };
        query.set_offset(self.items.len() as u64);
        info!(
            "{} page loaded: {} items, total {:?}",
            request.section,
            self.items.len(),
            query.total_count()
        );
        reconciled
    }

    /// Takes over items rendered by the server instead of fetching them again.
    pub fn adopt(&mut self, query: &mut QueryState, items: Vec<Item>, total: Option<u64>) {
        self.items = items;
        self.in_flight = None;
        self.replace_failed = false;
        self.state = LoadState::Loaded;
        query.set_offset(self.items.len() as u64);
        query.record_total_count(total);
    }

    /// Forgets everything and invalidates any fetch still running.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.items.clear();
        self.in_flight = None;
        self.replace_failed = false;
        self.state = LoadState::Idle;
    }

    pub async fn load_items<T: Transport>(&mut self, api: &ApiClient<T>, query: &mut QueryState) -> Reconciled {
        let request = self.begin_load(query);
        let outcome = fetch_page(api, &request).await;
        self.complete(query, &request, outcome)
    }

    pub async fn load_more<T: Transport>(&mut self, api: &ApiClient<T>, query: &mut QueryState) -> Option<Reconciled> {
        let request = self.begin_load_more(query)?;
        let outcome = fetch_page(api, &request).await;
        Some(self.complete(query, &request, outcome))
    }
}
