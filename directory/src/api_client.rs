//! URL construction and response normalization for the PostgREST backend.

use std::future::Future;

use common::settings::ApiSettings;
use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, Result};

/// What the controller needs from an HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub content_range: Option<String>,
    pub body: String,
}

/// HTTP seam: reqwest in production, in-memory fixtures in tests.
pub trait Transport: Clone {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> impl Future<Output = Result<RawResponse>>;
    fn post_json(&self, url: &str, body: &Value) -> impl Future<Output = Result<RawResponse>>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

async fn into_raw(response: reqwest::Response) -> Result<RawResponse> {
    let status = response.status().as_u16();
    let content_range = response
        .headers()
        .get("content-range")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());
    let body = response.text().await.map_err(|e| ApiError::Network(e.to_string()))?;
    Ok(RawResponse { status, content_range, body })
}

impl Transport for ReqwestTransport {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<RawResponse> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = request.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
        into_raw(response).await
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<RawResponse> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        into_raw(response).await
    }
}

/// Rows of a list response plus the un-parsed `content-range` header, if asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct ListResponse {
    pub rows: Vec<Value>,
    pub content_range: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiClient<T = ReqwestTransport> {
    transport: T,
    endpoint: String,
    version: String,
}

impl ApiClient<ReqwestTransport> {
    pub fn new(settings: &ApiSettings) -> Self {
        Self::with_transport(settings, ReqwestTransport::default())
    }
}

/// Appends `params` as a query string; `path` is returned unchanged when there are none.
pub fn build_url(path: &str, params: &[(String, String)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .finish();
    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{path}{separator}{query}")
}

/// Total from a `start-end/total` header; `None` when the total is not reported.
pub fn parse_content_range(header: &str) -> Option<u64> {
    let (_, total) = header.trim().rsplit_once('/')?;
    total.trim().parse().ok()
}

fn decode_rows(response: RawResponse) -> Result<(Vec<Value>, Option<String>)> {
    if !(200..300).contains(&response.status) {
        return Err(ApiError::Status { status: response.status, body: response.body });
    }
    let rows = match serde_json::from_str::<Value>(&response.body)? {
        Value::Array(rows) => rows,
        Value::Null => Vec::new(),
        other => return Err(ApiError::Decode(format!("expected an array, got {other}"))),
    };
    Ok((rows, response.content_range))
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(settings: &ApiSettings, transport: T) -> Self {
        Self {
            transport,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            version: settings.version.trim_matches('/').to_string(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.endpoint, self.version, path.trim_start_matches('/'))
    }

    /// GET a list endpoint. `want_count` asks the backend for an exact total,
    /// which costs it extra work, so facet lookups leave it off.
    pub async fn fetch_list(&self, path: &str, params: &[(String, String)], want_count: bool) -> Result<ListResponse> {
        let url = self.absolute_url(&build_url(path, params));
        debug!("GET {}", url);
        let headers: &[(&str, &str)] = if want_count { &[("Prefer", "count=exact")] } else { &[] };
        let response = self.transport.get(&url, headers).await?;
        let (rows, content_range) = decode_rows(response)?;
        Ok(ListResponse { rows, content_range: if want_count { content_range } else { None } })
    }

    /// POST structured parameters to an aggregation endpoint.
    pub async fn fetch_aggregate(&self, path: &str, params: &[(String, String)], body: &Value) -> Result<Vec<Value>> {
        let url = self.absolute_url(&build_url(path, params));
        debug!("POST {} {}", url, body);
        let response = self.transport.post_json(&url, body).await?;
        let (rows, _) = decode_rows(response)?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_transport::MockTransport;

    fn p(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn build_url_without_params_is_identity() {
        assert_eq!(build_url("/rpc/software_by_organisation", &[]), "/rpc/software_by_organisation");
    }

    #[test]
    fn build_url_encodes_prebuilt_filter_strings() {
        let url = build_url("rpc/x", &[p("limit", "2"), p("keywords", r#"cs.{"a b"}"#)]);
        assert_eq!(url, "rpc/x?limit=2&keywords=cs.%7B%22a+b%22%7D");
        assert_eq!(build_url("rpc/y?order=keyword", &[p("a", "1")]), "rpc/y?order=keyword&a=1");
    }

    #[test]
    fn absolute_url_normalizes_slashes() {
        let client = ApiClient::with_transport(
            &ApiSettings { endpoint: "https://rsd.example/api/".to_string(), version: "v1".to_string() },
            MockTransport::default(),
        );
        assert_eq!(client.absolute_url("///rpc/a"), "https://rsd.example/api/v1/rpc/a");
    }

    #[test]
    fn content_range_total() {
        assert_eq!(parse_content_range("0-1/7"), Some(7));
        assert_eq!(parse_content_range("*/0"), Some(0));
        assert_eq!(parse_content_range("0-47/*"), None);
        assert_eq!(parse_content_range("garbage"), None);
    }

    #[tokio::test]
    async fn fetch_list_requests_exact_count_only_when_asked() {
        let transport = MockTransport::default();
        transport.reply("software_by_organisation", RawResponse {
            status: 200,
            content_range: Some("0-0/1".to_string()),
            body: r#"[{"id":"1"}]"#.to_string(),
        });
        let client = ApiClient::with_transport(&ApiSettings::default(), transport.clone());

        let counted = client.fetch_list("/rpc/software_by_organisation", &[], true).await.unwrap();
        assert_eq!(counted.content_range.as_deref(), Some("0-0/1"));
        let uncounted = client.fetch_list("/rpc/software_by_organisation", &[], false).await.unwrap();
        assert_eq!(uncounted.content_range, None);

        let requests = transport.requests();
        assert_eq!(requests[0].headers, vec![("Prefer".to_string(), "count=exact".to_string())]);
        assert!(requests[1].headers.is_empty());
    }

    #[tokio::test]
    async fn failures_surface_as_network_errors() {
        let transport = MockTransport::default();
        transport.fail("software_by_organisation", "connection refused");
        transport.reply("org_software_keywords_filter", RawResponse {
            status: 503,
            content_range: None,
            body: "busy".to_string(),
        });
        let client = ApiClient::with_transport(&ApiSettings::default(), transport);

        let err = client.fetch_list("/rpc/software_by_organisation", &[], true).await.unwrap_err();
        assert_eq!(err, ApiError::Network("connection refused".to_string()));
        let err = client
            .fetch_aggregate("/rpc/org_software_keywords_filter", &[], &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(err.is_network());
    }
}
