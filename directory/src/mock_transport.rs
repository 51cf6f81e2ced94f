//! In-memory transport that records requests and replays canned responses.

use std::sync::{Arc, Mutex};

use futures::channel::oneshot;
use serde_json::Value;

use crate::{
    api_client::{RawResponse, Transport},
    error::{ApiError, Result},
};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
enum Reply {
    Ok(RawResponse),
    Fail(String),
}

#[derive(Debug)]
struct Route {
    pattern: String,
    reply: Reply,
    once: bool,
}

#[derive(Debug, Default)]
struct Inner {
    routes: Vec<Route>,
    gates: Vec<(String, oneshot::Receiver<()>)>,
    requests: Vec<RecordedRequest>,
}

#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<Inner>>,
}

pub fn ok_json(body: Value, content_range: Option<&str>) -> RawResponse {
    RawResponse { status: 200, content_range: content_range.map(|s| s.to_string()), body: body.to_string() }
}

impl MockTransport {
    fn push(&self, pattern: &str, reply: Reply, once: bool) {
        let mut inner = self.inner.lock().unwrap();
        inner.routes.push(Route { pattern: pattern.to_string(), reply, once });
    }

    /// Replies to every URL containing `pattern`; later registrations win.
    pub fn reply(&self, pattern: &str, response: RawResponse) {
        self.push(pattern, Reply::Ok(response), false);
    }

    pub fn reply_once(&self, pattern: &str, response: RawResponse) {
        self.push(pattern, Reply::Ok(response), true);
    }

    pub fn fail(&self, pattern: &str, message: &str) {
        self.push(pattern, Reply::Fail(message.to_string()), false);
    }

    /// Holds the next matching request until the returned sender fires.
    pub fn gate(&self, pattern: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.inner.lock().unwrap().gates.push((pattern.to_string(), rx));
        tx
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn requests_to(&self, pattern: &str) -> Vec<RecordedRequest> {
        self.requests().into_iter().filter(|r| r.url.contains(pattern)).collect()
    }

    async fn respond(&self, request: RecordedRequest) -> Result<RawResponse> {
        let (gate, url) = {
            let mut inner = self.inner.lock().unwrap();
            let url = request.url.clone();
            inner.requests.push(request);
            let gate_index = inner.gates.iter().position(|(p, _)| url.contains(p.as_str()));
            let gate = gate_index.map(|i| inner.gates.remove(i).1);
            (gate, url)
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        let mut inner = self.inner.lock().unwrap();
        let Some(index) = inner.routes.iter().rposition(|r| url.contains(r.pattern.as_str())) else {
            return Err(ApiError::Network(format!("no route for {url}")));
        };
        let reply = if inner.routes[index].once {
            inner.routes.remove(index).reply
        } else {
            inner.routes[index].reply.clone()
        };
        match reply {
            Reply::Ok(response) => Ok(response),
            Reply::Fail(message) => Err(ApiError::Network(message)),
        }
    }
}

impl Transport for MockTransport {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<RawResponse> {
        self.respond(RecordedRequest {
            method: "GET",
            url: url.to_string(),
            headers: headers.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            body: None,
        })
        .await
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<RawResponse> {
        self.respond(RecordedRequest {
            method: "POST",
            url: url.to_string(),
            headers: Vec::new(),
            body: Some(body.clone()),
        })
        .await
    }
}
