//! One page section: query state, both controllers and what the UI draws,
//! owned together so several sections can live side by side.
//!
//! The UI layer pushes events in through the mutation methods, then drives a
//! refresh: [`Directory::begin_refresh`] snapshots the query into a page and a
//! facet request, the two are fetched independently with a cloned
//! [`ApiClient`], and each comes back through its own `finish_*` method.

use chrono::{DateTime, Utc};
use common::{
    facet::FacetId, item::Item, query_state::QueryState, section::Section, settings::Settings, sort::SortOrder,
};
use futures::join;
use tracing::debug;

use crate::{
    api_client::{ApiClient, ReqwestTransport, Transport},
    debounce::{DebounceTicket, SearchDebounce},
    error::{ApiError, Result},
    facets::{FacetSet, load_facets},
    render::{CountLabel, FacetControl, ResultsView, render_facets},
    results::{LoadMode, Page, PageRequest, Reconciled, ResultController, fetch_page},
    scroll::{InfiniteScroll, ScrollAction},
};

/// Facet reload for one query snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetRequest {
    pub generation: u64,
    pub state: QueryState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Refresh {
    pub page: PageRequest,
    pub facets: FacetRequest,
}

pub async fn load_facet_request<T: Transport>(api: &ApiClient<T>, settings: &Settings, request: &FacetRequest) -> FacetSet {
    load_facets(api, settings, &request.state).await
}

#[derive(Debug, Clone)]
pub struct Directory<T: Transport = ReqwestTransport> {
    api: ApiClient<T>,
    settings: Settings,
    query: QueryState,
    results: ResultController,
    facets: FacetSet,
    facet_generation: u64,
    results_view: ResultsView,
    facet_controls: Vec<FacetControl>,
    scroll: InfiniteScroll,
    debounce: SearchDebounce,
    clock: fn() -> DateTime<Utc>,
}

impl<T: Transport> Directory<T> {
    pub fn new(api: ApiClient<T>, settings: Settings, section: Section, organisation_id: impl Into<String>) -> Self {
        let results = ResultController::new(settings.page_size);
        Self {
            api,
            settings,
            query: QueryState::new(section, organisation_id),
            results,
            facets: FacetSet::new(),
            facet_generation: 0,
            results_view: ResultsView::default(),
            facet_controls: Vec::new(),
            scroll: InfiniteScroll::default(),
            debounce: SearchDebounce::default(),
            clock: Utc::now,
        }
    }

    /// Fixes "now" for project progress on cards.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn api(&self) -> &ApiClient<T> {
        &self.api
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn section(&self) -> Section {
        self.query.section()
    }

    pub fn items(&self) -> &[Item] {
        self.results.items()
    }

    pub fn results(&self) -> &ResultController {
        &self.results
    }

    pub fn facets(&self) -> &FacetSet {
        &self.facets
    }

    pub fn results_view(&self) -> &ResultsView {
        &self.results_view
    }

    pub fn facet_controls(&self) -> &[FacetControl] {
        &self.facet_controls
    }

    pub fn scroll(&self) -> &InfiniteScroll {
        &self.scroll
    }

    pub fn has_more_items(&self) -> bool {
        self.results.has_more_items(&self.query)
    }

    /// Enabled facets of the current section, in display order.
    pub fn facet_order(&self) -> Vec<FacetId> {
        self.settings.enabled_facets(self.query.section())
    }

    /// Takes over a server-rendered first page so the client does not fetch it again.
    pub fn adopt_prerendered(&mut self, items: Vec<Item>, total: Option<u64>) {
        self.results.adopt(&mut self.query, items, total);
        let now = (self.clock)();
        self.results_view
            .render_results(self.results.items(), self.query.total_count(), false, &self.settings, now);
        self.scroll.after_load(self.has_more_items());
        self.sync_controls();
    }

    fn resolve_facet(&self, identifier: &str) -> Result<FacetId> {
        let facet: FacetId = identifier.parse()?;
        let section = self.query.section();
        if !self.settings.is_facet_enabled(section, facet) {
            return Err(ApiError::FacetNotEnabled { facet, section });
        }
        Ok(facet)
    }

    pub fn set_search_term(&mut self, term: &str) -> bool {
        self.query.set_search_term(term)
    }

    /// Unknown or disabled identifiers are rejected and leave the query untouched.
    pub fn set_filter(&mut self, identifier: &str, values: Vec<String>) -> Result<()> {
        let facet = self.resolve_facet(identifier)?;
        self.query.set_filter(facet, values);
        Ok(())
    }

    pub fn toggle_filter_value(&mut self, identifier: &str, value: &str) -> Result<()> {
        let facet = self.resolve_facet(identifier)?;
        self.query.toggle_filter_value(facet, value);
        Ok(())
    }

    pub fn clear_filters(&mut self, keep_search: bool) {
        self.query.clear_all(keep_search);
    }

    pub fn set_sort(&mut self, order: Option<SortOrder>) {
        self.query.set_sort(order);
    }

    /// Full reset: no item, facet or selection of the previous section survives,
    /// and whatever was in flight for it is discarded on arrival.
    pub fn switch_section(&mut self, section: Section) {
        self.query.switch_section(section);
        self.results.reset();
        self.facets.clear();
        self.facet_controls.clear();
        self.facet_generation += 1;
        self.results_view = ResultsView::default();
        self.scroll = InfiniteScroll::default();
        self.debounce = SearchDebounce::default();
    }

    /// A keystroke in the search box. Wait for the debounce period, then call
    /// [`Self::search_settled`] with the ticket.
    pub fn search_input(&mut self, term: &str) -> DebounceTicket {
        self.debounce.input(term)
    }

    /// Applies the debounced term; false when a newer keystroke superseded the
    /// ticket or the term did not change, in which case nothing needs fetching.
    pub fn search_settled(&mut self, ticket: DebounceTicket) -> bool {
        match self.debounce.settle(ticket) {
            Some(term) => self.query.set_search_term(&term),
            None => false,
        }
    }

    /// Enter key: applies the term immediately. Always refreshes.
    pub fn search_submit(&mut self, term: &str) {
        let term = self.debounce.submit(term);
        self.query.set_search_term(&term);
    }

    /// Starts a fresh query. Accumulated items are dropped at once and the count
    /// turns neutral; facets keep their current options until the new ones arrive.
    pub fn begin_refresh(&mut self) -> Refresh {
        let page = self.results.begin_load(&mut self.query);
        self.results_view.loading = true;
        self.results_view.count = CountLabel::Unknown;
        self.results_view.error = None;
        self.sync_controls();
        Refresh { page, facets: self.begin_facet_refresh() }
    }

    /// Facet reload alone, for a page whose results were adopted from the server.
    pub fn begin_facet_refresh(&mut self) -> FacetRequest {
        self.facet_generation += 1;
        FacetRequest { generation: self.facet_generation, state: self.query.clone() }
    }

    pub fn begin_load_more(&mut self) -> Option<PageRequest> {
        let request = self.results.begin_load_more(&mut self.query)?;
        self.results_view.loading = true;
        self.sync_controls();
        Some(request)
    }

    /// The infinite-scroll sentinel came into view.
    pub fn on_sentinel_visible(&mut self) -> Option<PageRequest> {
        let has_more = self.has_more_items();
        match self.scroll.on_visible(has_more) {
            ScrollAction::LoadMore => self.begin_load_more(),
            ScrollAction::Unobserve => {
                debug!("all {} items loaded, sentinel unobserved", self.query.section());
                None
            }
            ScrollAction::Ignore => None,
        }
    }

    pub fn finish_page(&mut self, request: &PageRequest, outcome: Result<Page>) -> Reconciled {
        let reconciled = self.results.complete(&mut self.query, request, outcome);
        let now = (self.clock)();
        match &reconciled {
            Reconciled::Replaced { total } => {
                self.results_view
                    .render_results(self.results.items(), *total, false, &self.settings, now);
                self.scroll.after_load(self.has_more_items());
            }
            Reconciled::Appended { items, total } => {
                self.results_view.render_results(items, *total, true, &self.settings, now);
                self.scroll.after_append(self.has_more_items());
            }
            Reconciled::Failed { mode, error } => {
                self.results_view.render_error(error);
                if *mode == LoadMode::Replace {
                    self.scroll.after_load(false);
                }
            }
            Reconciled::Discarded { .. } => {}
        }
        self.sync_controls();
        reconciled
    }

    /// Installs fresh facet options; false when a newer facet reload was started meanwhile.
    pub fn finish_facets(&mut self, request: &FacetRequest, facets: FacetSet) -> bool {
        if request.generation != self.facet_generation {
            debug!("discarding stale facets of generation {} (current {})", request.generation, self.facet_generation);
            return false;
        }
        self.facets = facets;
        self.facet_controls = render_facets(&self.facets, &self.facet_order(), &self.query);
        true
    }

    fn sync_controls(&mut self) {
        self.results_view.show_more_visible = self.has_more_items() && !self.results.is_loading();
        self.results_view.clear_filters_visible = self.query.has_active_query();
        if !self.facets.is_empty() {
            self.facet_controls = render_facets(&self.facets, &self.facet_order(), &self.query);
        }
    }

    /// Fetches facets and the first page concurrently and reconciles both.
    pub async fn refresh(&mut self) -> Reconciled {
        let refresh = self.begin_refresh();
        let api = self.api.clone();
        let (facets, outcome) = join!(
            load_facet_request(&api, &self.settings, &refresh.facets),
            fetch_page(&api, &refresh.page)
        );
        self.finish_facets(&refresh.facets, facets);
        self.finish_page(&refresh.page, outcome)
    }

    pub async fn load_more(&mut self) -> Option<Reconciled> {
        let request = self.begin_load_more()?;
        let outcome = fetch_page(&self.api, &request).await;
        Some(self.finish_page(&request, outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        mock_transport::{MockTransport, ok_json},
        results::LoadState,
    };
    use common::{progress::parse_backend_date, sort::SortField};
    use serde_json::{Value, json};

    const LIST: &str = "software_by_organisation";

    fn fixed_now() -> DateTime<Utc> {
        parse_backend_date("2024-01-06").unwrap_or_default()
    }

    fn rows(ids: std::ops::Range<u64>) -> Value {
        Value::Array(ids.map(|i| json!({"id": format!("sw{i}"), "slug": format!("sw-{i}"), "brand_name": format!("Software {i}")})).collect())
    }

    fn directory(transport: &MockTransport, page_size: u64) -> Directory<MockTransport> {
        let settings = Settings { page_size, ..Settings::default() };
        let api = ApiClient::with_transport(&settings.api, transport.clone());
        Directory::new(api, settings, Section::Software, "org-x").with_clock(fixed_now)
    }

    fn facets_reply(transport: &MockTransport) {
        transport.reply("org_software_keywords_filter", ok_json(json!([{"keyword": "GPU", "keyword_cnt": 2}]), None));
        transport.reply("org_software_languages_filter", ok_json(json!([{"prog_language": "Rust", "prog_language_cnt": 5}]), None));
        transport.reply("org_software_licenses_filter", ok_json(json!([]), None));
    }

    #[tokio::test]
    async fn refresh_renders_results_and_facets() {
        let transport = MockTransport::default();
        facets_reply(&transport);
        transport.reply(LIST, ok_json(rows(0..3), Some("0-2/3")));
        let mut dir = directory(&transport, 48);

        let reconciled = dir.refresh().await;
        assert_eq!(reconciled, Reconciled::Replaced { total: Some(3) });
        assert_eq!(dir.results_view().cards.len(), 3);
        assert_eq!(dir.results_view().count, CountLabel::Count(3));
        assert!(!dir.results_view().show_more_visible);
        assert!(!dir.scroll().is_observing());
        assert_eq!(dir.facet_controls().len(), 3);
        assert_eq!(dir.facet_controls()[1].options[0].label, "Rust (5)");
        assert_eq!(transport.requests_to("org_software_").len(), 3);
    }

    #[tokio::test]
    async fn stale_search_never_overwrites_newer_one() {
        let transport = MockTransport::default();
        transport.reply("search=gp", ok_json(rows(0..5), Some("0-4/5")));
        transport.reply("search=gpu", ok_json(rows(10..11), Some("0-0/1")));
        let release_first = transport.gate("search=gp");
        let mut dir = directory(&transport, 48);
        let api = dir.api().clone();

        dir.search_submit("gp");
        let first = dir.begin_refresh();
        dir.search_submit("GPU ");
        let second = dir.begin_refresh();
        assert_eq!(dir.query().search_term(), "gpu");

        let (first_outcome, _) = tokio::join!(fetch_page(&api, &first.page), async {
            let outcome = fetch_page(&api, &second.page).await;
            let reconciled = dir.finish_page(&second.page, outcome);
            let _ = release_first.send(());
            reconciled
        });
        let late = dir.finish_page(&first.page, first_outcome);

        assert_eq!(late, Reconciled::Discarded { generation: first.page.generation });
        assert_eq!(dir.items().len(), 1);
        assert_eq!(dir.items()[0].id(), "sw10");
        assert_eq!(dir.query().total_count(), Some(1));
        assert_eq!(dir.results().discarded_count(), 1);
        assert!(!dir.finish_facets(&first.facets, FacetSet::new()));
    }

    #[tokio::test]
    async fn sentinel_pages_until_exhausted() {
        let transport = MockTransport::default();
        facets_reply(&transport);
        transport.reply("offset=0", ok_json(rows(0..2), Some("0-1/3")));
        transport.reply("offset=2", ok_json(rows(2..3), Some("2-2/3")));
        let mut dir = directory(&transport, 2);

        dir.refresh().await;
        assert!(dir.results_view().show_more_visible);
        let request = dir.on_sentinel_visible().unwrap();
        assert_eq!(request.offset, 2);
        assert!(dir.on_sentinel_visible().is_none(), "a second page must not start while one is in flight");
        let outcome = fetch_page(dir.api(), &request).await;
        dir.finish_page(&request, outcome);

        assert_eq!(dir.results_view().cards.len(), 3);
        assert!(!dir.results_view().show_more_visible);
        assert!(!dir.scroll().is_observing());
        assert!(dir.on_sentinel_visible().is_none());
        assert_eq!(transport.requests_to(LIST).len(), 2);
    }

    #[tokio::test]
    async fn failed_load_more_keeps_rendered_cards() {
        let transport = MockTransport::default();
        facets_reply(&transport);
        transport.reply("offset=0", ok_json(rows(0..2), Some("0-1/9")));
        transport.fail("offset=2", "connection reset");
        let mut dir = directory(&transport, 2);

        dir.refresh().await;
        let reconciled = dir.load_more().await.unwrap();
        assert!(matches!(reconciled, Reconciled::Failed { .. }));
        assert_eq!(dir.items().len(), 2);
        assert_eq!(dir.results_view().cards.len(), 2);
        assert!(dir.results_view().error.is_some());
        assert!(matches!(dir.results().state(), LoadState::Errored(e) if e.is_network()));
        assert_eq!(dir.query().offset(), 2);
    }

    #[tokio::test]
    async fn failed_fresh_load_stops_paging_until_the_next_query() {
        let transport = MockTransport::default();
        facets_reply(&transport);
        transport.reply(LIST, ok_json(rows(0..2), Some("0-1/9")));
        let mut dir = directory(&transport, 2);
        dir.refresh().await;

        transport.fail(LIST, "bad gateway");
        dir.set_filter("keyword", vec!["GPU".to_string()]).unwrap();
        let refresh = dir.begin_refresh();
        assert_eq!(dir.results_view().count, CountLabel::Unknown);
        let outcome = fetch_page(dir.api(), &refresh.page).await;
        let reconciled = dir.finish_page(&refresh.page, outcome);
        assert!(matches!(reconciled, Reconciled::Failed { mode: LoadMode::Replace, .. }));

        assert!(dir.results_view().error.is_some());
        assert_eq!(dir.results_view().count, CountLabel::Unknown);
        assert!(!dir.results_view().show_more_visible);
        assert!(!dir.scroll().is_observing());
        assert!(dir.load_more().await.is_none());
        assert!(dir.on_sentinel_visible().is_none());
        assert_eq!(transport.requests_to(LIST).len(), 2);

        transport.reply(LIST, ok_json(rows(10..12), Some("0-1/5")));
        dir.refresh().await;
        let ids: Vec<&str> = dir.results_view().cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["sw10", "sw11"]);
        assert!(dir.results_view().show_more_visible);
        assert!(dir.scroll().is_observing());
    }

    #[tokio::test]
    async fn repeated_page_ends_infinite_scroll() {
        let transport = MockTransport::default();
        facets_reply(&transport);
        transport.reply("offset=0", ok_json(rows(0..2), Some("0-1/9")));
        transport.reply("offset=2", ok_json(rows(0..2), Some("2-3/9")));
        let mut dir = directory(&transport, 2);
        dir.refresh().await;

        let request = dir.on_sentinel_visible().unwrap();
        let outcome = fetch_page(dir.api(), &request).await;
        dir.finish_page(&request, outcome);
        assert!(dir.on_sentinel_visible().is_none());
        assert!(dir.load_more().await.is_none());
        assert_eq!(dir.results_view().cards.len(), 2);
        assert!(!dir.results_view().show_more_visible);
        assert_eq!(transport.requests_to("offset=2").len(), 1);
    }

    #[test]
    fn filter_identifiers_are_checked_at_the_boundary() {
        let transport = MockTransport::default();
        let mut dir = directory(&transport, 48);
        assert_eq!(dir.set_filter("bogus", vec!["x".to_string()]), Err(ApiError::UnknownFacet("bogus".to_string())));
        assert_eq!(
            dir.set_filter("domain", vec!["NAT".to_string()]),
            Err(ApiError::FacetNotEnabled { facet: FacetId::Domain, section: Section::Software })
        );
        assert!(dir.query().active_filters().is_empty());

        dir.set_filter("keyword", vec!["GPU".to_string()]).unwrap();
        dir.toggle_filter_value("license", "MIT").unwrap();
        assert!(dir.query().is_selected(FacetId::License, "MIT"));
        dir.begin_refresh();
        assert!(dir.results_view().clear_filters_visible);
    }

    #[tokio::test]
    async fn query_changes_reset_pagination_before_fetching() {
        let transport = MockTransport::default();
        facets_reply(&transport);
        transport.reply(LIST, ok_json(rows(0..2), Some("0-1/9")));
        transport.reply("offset=2", ok_json(rows(2..4), Some("2-3/9")));
        let mut dir = directory(&transport, 2);
        dir.refresh().await;
        dir.load_more().await;
        assert_eq!(dir.query().offset(), 4);

        dir.set_sort(Some(SortOrder::with_default_direction(SortField::MentionCnt)));
        assert_eq!(dir.query().offset(), 0);
        let refresh = dir.begin_refresh();
        assert!(dir.items().is_empty());
        assert!(refresh.page.params.contains(&("order".to_string(), "mention_cnt.desc.nullslast".to_string())));
    }

    #[test]
    fn switching_section_discards_everything() {
        let transport = MockTransport::default();
        let mut dir = directory(&transport, 48);
        dir.set_filter("keyword", vec!["GPU".to_string()]).unwrap();
        dir.search_submit("climate");
        let pending = dir.begin_refresh();

        dir.switch_section(Section::Projects);
        assert_eq!(dir.section(), Section::Projects);
        assert!(!dir.query().has_active_query());
        assert_eq!(dir.results_view().count, CountLabel::Unknown);
        let late = dir.finish_page(&pending.page, Ok(Page { items: Vec::new(), total: Some(0) }));
        assert!(matches!(late, Reconciled::Discarded { .. }));
        assert_eq!(dir.facet_order().first(), Some(&FacetId::ProjectStatus));
    }

    #[test]
    fn debounced_search_applies_only_the_last_term() {
        let transport = MockTransport::default();
        let mut dir = directory(&transport, 48);
        let stale = dir.search_input("cl");
        let latest = dir.search_input("Climate");
        assert!(!dir.search_settled(stale));
        assert!(dir.search_settled(latest));
        assert_eq!(dir.query().search_term(), "climate");
        assert_eq!(dir.query().list_path(), "/rpc/software_by_organisation_search");
    }

    #[test]
    fn prerendered_page_is_adopted_without_fetching() {
        let transport = MockTransport::default();
        let mut dir = directory(&transport, 2);
        let items = rows(0..2)
            .as_array()
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|row| Item::from_row(Section::Software, row).unwrap())
            .collect();
        dir.adopt_prerendered(items, Some(5));
        assert_eq!(dir.query().offset(), 2);
        assert_eq!(dir.results_view().count, CountLabel::Count(5));
        assert!(dir.results_view().show_more_visible);
        assert!(dir.scroll().is_observing());
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn empty_page_without_total_is_not_shown_as_zero() {
        let transport = MockTransport::default();
        let mut dir = directory(&transport, 2);
        dir.adopt_prerendered(Vec::new(), None);
        assert_eq!(dir.results_view().count, CountLabel::Unknown);
        assert!(!dir.results_view().is_empty_result());

        dir.adopt_prerendered(Vec::new(), Some(0));
        assert_eq!(dir.results_view().count, CountLabel::Count(0));
        assert!(dir.results_view().is_empty_result());
        assert!(!dir.results_view().show_more_visible);
    }
}
