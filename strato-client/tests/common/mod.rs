use std::{
    collections::HashMap,
    io::Cursor,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use strato_client::{
    errors::{Result, StratoError},
    BodyReader, NodeParams, NodeResponse, RawSeries, RemoteNode,
};

/// Counters shared between a test and the mock node it drives.
#[derive(Debug, Default)]
pub struct NodeCounters {
    pub requests: AtomicUsize,
    pub failures: AtomicUsize,
    pub releases: AtomicUsize,
}

/// In-memory stand-in for a remote aggregation node.
///
/// Serves a canned body after an optional number of failing attempts and
/// records everything the fetch path sends it.
#[derive(Debug)]
pub struct MockNode {
    params: NodeParams,
    // attempts that fail with a transport error before requests start succeeding
    failing_attempts: usize,
    content_type: Option<String>,
    body: Vec<u8>,
    pub counters: Arc<NodeCounters>,
    pub seen_query: Mutex<Option<Vec<(String, String)>>>,
    pub seen_headers: Mutex<Option<HashMap<String, String>>>,
}

impl MockNode {
    pub fn new(content_type: Option<&str>, body: Vec<u8>) -> Self {
        MockNode {
            params: NodeParams::default(),
            failing_attempts: 0,
            content_type: content_type.map(|value| value.to_string()),
            body,
            counters: Arc::new(NodeCounters::default()),
            seen_query: Mutex::new(None),
            seen_headers: Mutex::new(None),
        }
    }

    pub fn with_params(mut self, params: NodeParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_failing_attempts(mut self, failing_attempts: usize) -> Self {
        self.failing_attempts = failing_attempts;
        self
    }
}

#[async_trait]
impl RemoteNode for MockNode {
    async fn request(
        &self,
        _path: &str,
        query: &[(String, String)],
        headers: Option<&HashMap<String, String>>,
        _timeout: Duration,
    ) -> Result<Box<dyn NodeResponse>> {
        let attempt = self.counters.requests.fetch_add(1, Ordering::SeqCst);
        if attempt < self.failing_attempts {
            return Err(StratoError::Transport("connection refused".to_string()));
        }

        *self.seen_query.lock().unwrap() = Some(query.to_vec());
        *self.seen_headers.lock().unwrap() = headers.cloned();

        Ok(Box::new(MockResponse {
            url: "http://node-a:8080/render/?noCache=1".to_string(),
            content_type: self.content_type.clone(),
            body: Some(self.body.clone()),
            counters: self.counters.clone(),
        }))
    }

    fn fail(&self) {
        self.counters.failures.fetch_add(1, Ordering::SeqCst);
    }

    fn params(&self) -> &NodeParams {
        &self.params
    }

    fn host(&self) -> &str {
        "node-a"
    }
}

pub struct MockResponse {
    url: String,
    content_type: Option<String>,
    body: Option<Vec<u8>>,
    counters: Arc<NodeCounters>,
}

impl NodeResponse for MockResponse {
    fn header(&self, name: &str) -> Option<String> {
        if name.eq_ignore_ascii_case("content-type") {
            self.content_type.clone()
        } else {
            None
        }
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn take_body(&mut self) -> Result<BodyReader> {
        let body = self
            .body
            .take()
            .ok_or_else(|| StratoError::Transport("body already taken".to_string()))?;
        Ok(Box::new(Cursor::new(body)))
    }

    fn release(&mut self) {
        self.counters.releases.fetch_add(1, Ordering::SeqCst);
    }
}

pub const MSGPACK_CONTENT_TYPE: &str = "application/x-msgpack";

pub fn sample_series() -> Vec<RawSeries> {
    vec![RawSeries {
        name: "servers.web1.cpu".to_string(),
        path_expression: None,
        start: 0,
        end: 100,
        step: 10,
        values: (1..=10).map(|value| Some(value as f64)).collect(),
    }]
}

pub fn msgpack_body(records: &[RawSeries]) -> Vec<u8> {
    rmp_serde::to_vec_named(records).expect("encode msgpack fixture")
}

pub fn json_body(records: &[RawSeries]) -> Vec<u8> {
    serde_json::to_vec(records).expect("encode json fixture")
}
