//! Presentation state derived from controller output. Holds no query logic:
//! it only reflects what the result and facet controllers hand it.

use std::fmt::Display;

use chrono::{DateTime, Utc};
use common::{
    facet::{FacetId, FilterType},
    item::Item,
    query_state::QueryState,
    settings::Settings,
};

use crate::{error::ApiError, facets::FacetSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountLabel {
    /// Nothing fetched yet; rendered as a neutral placeholder, never as zero.
    #[default]
    Unknown,
    Count(u64),
}

impl Display for CountLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CountLabel::Unknown => write!(f, "- items found"),
            CountLabel::Count(n) => write!(f, "{n} items found"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CardProps {
    Software { contributors: u64, mentions: u64 },
    Project { progress: u8, date_start: String, date_end: String, impact: u64, output: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: String,
    pub link: String,
    pub image_url: String,
    pub image_contain: bool,
    pub title: String,
    pub description: String,
    pub labels: Vec<String>,
    pub last_updated: Option<String>,
    pub props: CardProps,
}

impl Card {
    pub fn from_item(item: &Item, settings: &Settings, now: DateTime<Utc>) -> Self {
        let (image_contain, props) = match item {
            Item::Software(s) => (false, CardProps::Software { contributors: s.contributor_cnt, mentions: s.mention_cnt }),
            Item::Project(p) => {
                let (date_start, date_end) = p.period_labels();
                (
                    p.image_contain,
                    CardProps::Project {
                        progress: p.progress_at(now),
                        date_start,
                        date_end,
                        impact: p.impact_cnt,
                        output: p.output_cnt,
                    },
                )
            }
        };
        Self {
            id: item.id().to_string(),
            link: item.link(settings),
            image_url: item.image_url(settings),
            image_contain,
            title: item.title().to_string(),
            description: item.description().to_string(),
            labels: item.keywords().to_vec(),
            last_updated: item.updated_at().map(|d| d.format("%-d %b %Y").to_string()),
            props,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultsView {
    pub cards: Vec<Card>,
    pub count: CountLabel,
    /// Inline, non-fatal; previously rendered cards stay visible.
    pub error: Option<String>,
    pub loading: bool,
    pub show_more_visible: bool,
    pub clear_filters_visible: bool,
}

impl ResultsView {
    pub fn render_results(&mut self, items: &[Item], total: Option<u64>, append: bool, settings: &Settings, now: DateTime<Utc>) {
        self.error = None;
        self.loading = false;
        if items.is_empty() && !append {
            // zero only when the backend said so
            self.cards.clear();
            self.count = total.map(CountLabel::Count).unwrap_or_default();
            return;
        }
        self.count = match (total, append) {
            (Some(n), _) => CountLabel::Count(n),
            (None, true) => self.count,
            (None, false) => CountLabel::Unknown,
        };
        if !append {
            self.cards.clear();
        }
        self.cards.extend(items.iter().map(|item| Card::from_item(item, settings, now)));
    }

    pub fn render_error(&mut self, error: &ApiError) {
        self.loading = false;
        self.error = Some(format!("Could not load results: {error}"));
    }

    pub fn is_empty_result(&self) -> bool {
        self.count == CountLabel::Count(0) && self.cards.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionControl {
    pub value: String,
    pub label: String,
    pub count: u64,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FacetControl {
    pub identifier: FacetId,
    pub title: String,
    pub placeholder: String,
    pub filter_type: FilterType,
    pub options: Vec<OptionControl>,
}

/// Rebuilds every facet control from fresh option lists. Selected values the
/// backend no longer returns are kept, with a zero count, so they can be removed.
pub fn render_facets(facets: &FacetSet, order: &[FacetId], query: &QueryState) -> Vec<FacetControl> {
    order
        .iter()
        .filter_map(|id| facets.get(id))
        .map(|filter| {
            let mut options: Vec<OptionControl> = filter
                .items()
                .into_iter()
                .map(|o| OptionControl {
                    value: o.value.clone(),
                    label: filter.label(&o.value),
                    count: o.count,
                    selected: query.is_selected(filter.identifier, &o.value),
                })
                .collect();
            if let Some(selected) = query.selection(filter.identifier) {
                for value in selected {
                    if options.iter().any(|o| &o.value == value) {
                        continue;
                    }
                    options.push(OptionControl {
                        value: value.clone(),
                        label: filter.label(value),
                        count: 0,
                        selected: true,
                    });
                }
            }
            FacetControl {
                identifier: filter.identifier,
                title: filter.title.clone(),
                placeholder: filter.placeholder(),
                filter_type: filter.filter_type,
                options,
            }
        })
        .collect()
}
