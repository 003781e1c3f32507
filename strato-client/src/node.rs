use std::{collections::HashMap, fmt, time::Duration};

use async_trait::async_trait;
use tokio::io::AsyncRead;

use crate::errors::Result;

/// Wire serialization used for render response bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderFormat {
    MsgPack,
    Json,
}

impl RenderFormat {
    pub fn as_query_value(&self) -> &'static str {
        match self {
            RenderFormat::MsgPack => "msgpack",
            RenderFormat::Json => "json",
        }
    }
}

/// Per-node defaults applied to every render request sent to the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeParams {
    /// Response format the node is asked to produce
    pub format: RenderFormat,
    /// Restrict the node to its locally stored data instead of fanning out
    pub local: bool,
}

impl Default for NodeParams {
    fn default() -> Self {
        NodeParams {
            format: RenderFormat::MsgPack,
            local: true,
        }
    }
}

/// Streamed response body. Taken out of the response once, read through a
/// bounded buffer by the decoder.
pub type BodyReader = Box<dyn AsyncRead + Send + Unpin>;

/// One in-flight render response.
///
/// The connection behind it is a single-owner resource: whoever holds the
/// response must call [`NodeResponse::release`] exactly once before handing
/// control back, whether decoding succeeded or not.
pub trait NodeResponse: Send {
    /// Header lookup by name, `None` when the header is absent.
    fn header(&self, name: &str) -> Option<String>;

    /// Fully resolved request URL, for diagnostics.
    fn url(&self) -> &str;

    /// Takes the body out of the response. Second call is an error.
    fn take_body(&mut self) -> Result<BodyReader>;

    /// Returns the underlying connection to the node.
    fn release(&mut self);
}

/// Handle to one remote aggregation node.
///
/// Which node owns which metric is decided by the finder layer above; this
/// trait is the boundary the fetch path talks through.
#[async_trait]
pub trait RemoteNode: fmt::Debug + Send + Sync {
    /// Issues a single request against the node. One await point, bounded by
    /// `timeout`; no retries at this level.
    async fn request(
        &self,
        path: &str,
        query: &[(String, String)],
        headers: Option<&HashMap<String, String>>,
        timeout: Duration,
    ) -> Result<Box<dyn NodeResponse>>;

    /// Marks the node as failed so routing deprioritizes it for a while.
    fn fail(&self);

    /// Default format/locality flags for requests to this node.
    fn params(&self) -> &NodeParams;

    /// Node identity used in diagnostics.
    fn host(&self) -> &str;
}
