//! Shared handle to the page's [`Directory`]. Event handlers mutate the query
//! through it; fetches run as spawned tasks that hold a cloned client, never
//! a borrow of the directory itself.

use common::{facet::FacetId, section::Section, sort::SortOrder};
use dioxus::{logger::tracing, prelude::*};
use directory::{
    Directory,
    debounce::SEARCH_DEBOUNCE,
    directory::{FacetRequest, load_facet_request},
    results::{PageRequest, Reconciled, fetch_page},
};
use gloo_timers::future::TimeoutFuture;

#[derive(Clone, Copy)]
pub struct DirectoryHandle {
    pub directory: Signal<Directory>,
    /// Clear filters leaves the search term alone when the host page set it.
    pub keep_search: bool,
}

impl DirectoryHandle {
    pub fn new(directory: Signal<Directory>, keep_search: bool) -> Self {
        Self { directory, keep_search }
    }

    /// Fresh query: first page and facets, fetched independently.
    pub fn refresh(&self) {
        let mut directory = self.directory;
        let refresh = directory.write().begin_refresh();
        self.spawn_page(refresh.page);
        self.spawn_facets(refresh.facets);
    }

    pub fn refresh_facets(&self) {
        let mut directory = self.directory;
        let request = directory.write().begin_facet_refresh();
        self.spawn_facets(request);
    }

    pub fn load_more(&self) {
        let mut directory = self.directory;
        let request = directory.write().begin_load_more();
        if let Some(request) = request {
            self.spawn_page(request);
        }
    }

    pub fn sentinel_visible(&self) {
        let mut directory = self.directory;
        let request = directory.write().on_sentinel_visible();
        if let Some(request) = request {
            self.spawn_page(request);
        }
    }

    fn spawn_page(&self, request: PageRequest) {
        let mut directory = self.directory;
        let api = directory.peek().api().clone();
        spawn(async move {
            let outcome = fetch_page(&api, &request).await;
            let reconciled = directory.write().finish_page(&request, outcome);
            if let Reconciled::Failed { error, .. } = reconciled {
                tracing::error!("loading {} at offset {} failed: {}", request.section, request.offset, error);
            }
        });
    }

    fn spawn_facets(&self, request: FacetRequest) {
        let mut directory = self.directory;
        let api = directory.peek().api().clone();
        let settings = directory.peek().settings().clone();
        spawn(async move {
            let facets = load_facet_request(&api, &settings, &request).await;
            directory.write().finish_facets(&request, facets);
        });
    }

    /// Keystroke: one fetch once typing pauses.
    pub fn search_input(&self, term: String) {
        let mut directory = self.directory;
        let ticket = directory.write().search_input(&term);
        let handle = *self;
        spawn(async move {
            TimeoutFuture::new(SEARCH_DEBOUNCE.as_millis() as u32).await;
            let mut directory = handle.directory;
            let settled = directory.write().search_settled(ticket);
            if settled {
                handle.refresh();
            }
        });
    }

    /// Enter key: no waiting, and the pending keystroke timer is void.
    pub fn search_submit(&self, term: String) {
        let mut directory = self.directory;
        directory.write().search_submit(&term);
        self.refresh();
    }

    pub fn toggle_filter(&self, facet: FacetId, value: String) {
        let mut directory = self.directory;
        let toggled = directory.write().toggle_filter_value(facet.identifier(), &value);
        match toggled {
            Ok(()) => self.refresh(),
            Err(e) => tracing::warn!("ignoring filter change: {}", e),
        }
    }

    pub fn clear_filters(&self) {
        let mut directory = self.directory;
        directory.write().clear_filters(self.keep_search);
        self.refresh();
    }

    pub fn set_sort(&self, order: Option<SortOrder>) {
        let mut directory = self.directory;
        directory.write().set_sort(order);
        self.refresh();
    }

    pub fn switch_section(&self, section: Section) {
        let mut directory = self.directory;
        if directory.peek().section() == section {
            return;
        }
        directory.write().switch_section(section);
        self.refresh();
    }
}
