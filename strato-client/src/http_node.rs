use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;
use futures::TryStreamExt;
use tokio_util::io::StreamReader;
use tracing::{debug, warn};

use crate::{
    errors::{Result, StratoError},
    node::{BodyReader, NodeParams, NodeResponse, RemoteNode},
};

/// Handle to one remote aggregation node, reached over HTTP.
///
/// Tracks the node's last failure so the finder layer can skip it for a
/// cooldown window before routing requests to it again.
#[derive(Debug)]
pub struct HttpRemoteNode {
    // base url without trailing slash, e.g. http://node-a:8080
    base_url: String,
    // host identity used in diagnostics and routing decisions
    host: String,
    params: NodeParams,
    http: reqwest::Client,
    // epoch millis of the last recorded failure; 0 means never failed
    failed_at_ms: AtomicU64,
}

impl HttpRemoteNode {
    pub fn new(base_url: impl Into<String>, params: NodeParams) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let parsed = reqwest::Url::parse(&base_url)
            .map_err(|err| StratoError::Transport(format!("invalid node url {}: {}", base_url, err)))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| StratoError::Transport(format!("node url {} has no host", base_url)))?
            .to_string();

        let http = reqwest::Client::builder().build()?;

        Ok(HttpRemoteNode {
            base_url,
            host,
            params,
            http,
            failed_at_ms: AtomicU64::new(0),
        })
    }

    /// Whether the node is past the cooldown window of its last failure.
    pub fn is_healthy(&self, cooldown: Duration) -> bool {
        let failed_at = self.failed_at_ms.load(Ordering::Relaxed);
        if failed_at == 0 {
            return true;
        }
        now_epoch_ms().saturating_sub(failed_at) >= cooldown.as_millis() as u64
    }
}

#[async_trait]
impl RemoteNode for HttpRemoteNode {
    async fn request(
        &self,
        path: &str,
        query: &[(String, String)],
        headers: Option<&HashMap<String, String>>,
        timeout: Duration,
    ) -> Result<Box<dyn NodeResponse>> {
        let url = format!("{}{}", self.base_url, path);
        debug!("requesting {} from node {}", url, self.host);

        let mut request = self.http.get(url.as_str()).query(query).timeout(timeout);
        if let Some(headers) = headers {
            for (name, value) in headers {
                request = request.header(name.as_str(), value.as_str());
            }
        }

        let response = request.send().await?;
        let url_full = response.url().to_string();

        Ok(Box::new(HttpNodeResponse {
            url_full,
            response: Some(response),
        }))
    }

    fn fail(&self) {
        warn!("marking node {} as failed", self.host);
        self.failed_at_ms.store(now_epoch_ms(), Ordering::Relaxed);
    }

    fn params(&self) -> &NodeParams {
        &self.params
    }

    fn host(&self) -> &str {
        &self.host
    }
}

struct HttpNodeResponse {
    url_full: String,
    response: Option<reqwest::Response>,
}

impl NodeResponse for HttpNodeResponse {
    fn header(&self, name: &str) -> Option<String> {
        self.response
            .as_ref()?
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string())
    }

    fn url(&self) -> &str {
        &self.url_full
    }

    fn take_body(&mut self) -> Result<BodyReader> {
        let response = self
            .response
            .take()
            .ok_or_else(|| StratoError::Transport("response body already taken".to_string()))?;
        let stream = Box::pin(response.bytes_stream().map_err(std::io::Error::other));
        Ok(Box::new(StreamReader::new(stream)))
    }

    fn release(&mut self) {
        // dropping the response, or the body stream taken out of it, returns
        // the connection to the pool
        self.response.take();
    }
}

fn now_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
