//! First result page fetched on the server, so the client can adopt it
//! instead of requesting it again.

use anyhow::Context;
use common::{item::Item, query_state::QueryState, settings::Settings};
use serde::{Deserialize, Serialize};

use crate::{
    api_client::{ApiClient, Transport},
    results::{Reconciled, ResultController},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PrerenderedPage {
    pub items: Vec<Item>,
    pub total: Option<u64>,
}

pub async fn prerender_first_page<T: Transport>(
    api: &ApiClient<T>,
    settings: &Settings,
    mut query: QueryState,
) -> anyhow::Result<PrerenderedPage> {
    let mut results = ResultController::new(settings.page_size);
    match results.load_items(api, &mut query).await {
        Reconciled::Replaced { total } => Ok(PrerenderedPage { items: results.items().to_vec(), total }),
        Reconciled::Failed { error, .. } => {
            Err(error).with_context(|| format!("prerendering {} for {}", query.section(), query.organisation_id()))
        }
        other => anyhow::bail!("unexpected outcome of a first page load: {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_transport::{MockTransport, ok_json};
    use common::section::Section;
    use serde_json::json;

    #[tokio::test]
    async fn first_page_carries_items_and_total() {
        let transport = MockTransport::default();
        transport.reply(
            "projects_by_organisation",
            ok_json(json!([{"id": "p1", "slug": "p-1", "title": "Coastal"}]), Some("0-0/12")),
        );
        let settings = Settings::default();
        let api = ApiClient::with_transport(&settings.api, transport.clone());
        let page = prerender_first_page(&api, &settings, QueryState::new(Section::Projects, "org-x")).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].title(), "Coastal");
        assert_eq!(page.total, Some(12));
        assert_eq!(transport.requests()[0].headers, vec![("Prefer".to_string(), "count=exact".to_string())]);
    }

    #[tokio::test]
    async fn backend_failure_is_reported() {
        let transport = MockTransport::default();
        transport.fail("software_by_organisation", "connection refused");
        let settings = Settings::default();
        let api = ApiClient::with_transport(&settings.api, transport);
        let err = prerender_first_page(&api, &settings, QueryState::new(Section::Software, "org-x"))
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("connection refused"));
    }
}
