//! Facet option lists scoped to the current search and the other active filters.

use std::collections::BTreeMap;

use common::{
    facet::{FacetId, FilterType},
    filter::{Filter, FilterOption, project_status_labels},
    query_state::QueryState,
    section::Section,
    settings::Settings,
};
use futures::future::join_all;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{
    api_client::{ApiClient, Transport},
    error::Result,
};

pub type FacetSet = BTreeMap<FacetId, Filter>;

#[derive(Debug, Clone, PartialEq)]
pub struct FacetDefinition {
    pub facet: FacetId,
    pub title: String,
    pub path: &'static str,
    pub labels: BTreeMap<String, String>,
    pub labeled_only: bool,
}

/// Enabled facets of a section in display order; disabled ones do not exist at all.
pub fn facet_definitions(settings: &Settings, section: Section) -> Vec<FacetDefinition> {
    settings
        .enabled_facets(section)
        .into_iter()
        .filter_map(|facet| {
            let path = facet.option_path(section)?;
            Some(FacetDefinition {
                facet,
                title: facet.default_title().to_string(),
                path,
                labels: if facet == FacetId::ProjectStatus { project_status_labels() } else { BTreeMap::new() },
                labeled_only: facet == FacetId::Domain,
            })
        })
        .collect()
}

/// Body for one facet's option request. The facet's own selection is left out
/// so every option stays visible and removable.
pub fn facet_request_body(facet: FacetId, state: &QueryState) -> Value {
    let mut body = Map::new();
    body.insert("organisation_id".to_string(), Value::String(state.organisation_id().to_string()));
    if !state.search_term().is_empty() {
        body.insert("search_filter".to_string(), Value::String(state.search_term().to_string()));
    }
    for (other, values) in state.active_filters() {
        if *other == facet || values.is_empty() || !other.applies_to(state.section()) {
            continue;
        }
        let value = match other.filter_type() {
            FilterType::SingleSelect => match values.iter().next() {
                Some(first) => Value::String(first.clone()),
                None => continue,
            },
            FilterType::MultiCheckbox => Value::Array(values.iter().cloned().map(Value::String).collect()),
        };
        body.insert(other.narrowing_param().to_string(), value);
    }
    Value::Object(body)
}

/// Reads `{<identifier>: value, <identifier>_cnt: n}` rows; rows without a value are skipped.
pub fn options_from_rows(facet: FacetId, rows: &[Value]) -> Vec<FilterOption> {
    let count_key = format!("{}_cnt", facet.identifier());
    rows.iter()
        .filter_map(|row| {
            let value = match row.get(facet.identifier())? {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                _ => return None,
            };
            let count = row.get(&count_key).and_then(Value::as_u64).unwrap_or(0);
            Some(FilterOption { value, count })
        })
        .collect()
}

/// Curated names of the top-level research domains, keyed by domain key.
pub async fn fetch_domain_labels<T: Transport>(api: &ApiClient<T>) -> Result<BTreeMap<String, String>> {
    let params = [
        ("select".to_string(), "key,name".to_string()),
        ("parent".to_string(), "is.null".to_string()),
    ];
    let response = api.fetch_list("research_domain", &params, false).await?;
    Ok(response
        .rows
        .iter()
        .filter_map(|row| {
            let key = row.get("key")?.as_str()?;
            let name = row.get("name")?.as_str()?;
            Some((key.to_string(), name.to_string()))
        })
        .collect())
}

/// Never fails: a facet whose request fails comes back with no options.
pub async fn load_facet<T: Transport>(api: &ApiClient<T>, definition: &FacetDefinition, state: &QueryState) -> Filter {
    let facet = definition.facet;
    let body = facet_request_body(facet, state);
    let params = [("order".to_string(), facet.identifier().to_string())];
    let rows = match api.fetch_aggregate(definition.path, &params, &body).await {
        Ok(rows) => rows,
        Err(e) => {
            warn!("facet {} unavailable: {}", facet, e);
            return Filter::empty(facet, definition.title.clone())
                .with_labels(definition.labels.clone())
                .with_labeled_only(definition.labeled_only);
        }
    };

    let mut filter = Filter::new(facet, definition.title.clone(), options_from_rows(facet, &rows))
        .with_labels(definition.labels.clone())
        .with_labeled_only(definition.labeled_only);

    match facet {
        FacetId::Domain => {
            match fetch_domain_labels(api).await {
                Ok(labels) => filter.labels = labels,
                // without labels no domain is offered
                Err(e) => warn!("research domain labels unavailable: {}", e),
            }
            filter.labeled_only = true;
        }
        FacetId::ProjectStatus => filter.remove_option("unknown"),
        _ => {}
    }
    debug!("facet {} has {} options", facet, filter.items().len());
    filter
}

/// Loads every enabled facet of the state's section concurrently.
pub async fn load_facets<T: Transport>(api: &ApiClient<T>, settings: &Settings, state: &QueryState) -> FacetSet {
    let definitions = facet_definitions(settings, state.section());
    let filters = join_all(definitions.iter().map(|d| load_facet(api, d, state))).await;
    filters.into_iter().map(|f| (f.identifier, f)).collect()
}
