use std::io::Read;

use tokio::io::BufReader;
use tokio_util::io::SyncIoBridge;
use tracing::error;

use crate::{
    errors::{Result, StratoError},
    node::{NodeResponse, RemoteNode},
    series::RawSeries,
};

/// Content type the compact wire format is served under; anything else is
/// decoded as the legacy JSON body.
pub(crate) const MSGPACK_CONTENT_TYPE: &str = "application/x-msgpack";

/// Decodes one render response body into raw series records.
///
/// The body is read through a buffer of configured capacity rather than
/// collected up front, so large responses never sit in memory whole.
#[derive(Debug, Clone)]
pub(crate) struct PayloadDecoder {
    buffer_size: usize,
}

impl PayloadDecoder {
    pub(crate) fn new(buffer_size: usize) -> Self {
        PayloadDecoder { buffer_size }
    }

    /// Decodes the response, releasing its connection on every exit path.
    ///
    /// A decode failure is not retryable: the node gets marked as failed and
    /// the whole batch is discarded.
    pub(crate) async fn decode(
        &self,
        node: &dyn RemoteNode,
        response: Box<dyn NodeResponse>,
    ) -> Result<Vec<RawSeries>> {
        let mut guard = ResponseGuard::new(response);

        let url = guard.response().url().to_string();
        let msgpack = guard
            .response()
            .header("content-type")
            .is_some_and(|value| value == MSGPACK_CONTENT_TYPE);
        let body = guard.response_mut().take_body()?;

        let reader = SyncIoBridge::new(BufReader::with_capacity(self.buffer_size, body));
        let decoded = tokio::task::spawn_blocking(move || decode_records(reader, msgpack))
            .await
            .map_err(|err| StratoError::Unrecoverable(format!("decode task failed: {}", err)))?;

        match decoded {
            Ok(records) => Ok(records),
            Err(detail) => {
                node.fail();
                error!(
                    "error decoding render response from {} ({}): {}",
                    node.host(),
                    url,
                    detail
                );
                Err(StratoError::Decode { url, detail })
            }
        }
    }
}

fn decode_records<R: Read>(reader: R, msgpack: bool) -> std::result::Result<Vec<RawSeries>, String> {
    if msgpack {
        rmp_serde::from_read(reader).map_err(|err| err.to_string())
    } else {
        serde_json::from_reader(reader).map_err(|err| err.to_string())
    }
}

/// Releases the response connection exactly once, whichever way the decode
/// scope is left.
struct ResponseGuard {
    response: Option<Box<dyn NodeResponse>>,
}

impl ResponseGuard {
    fn new(response: Box<dyn NodeResponse>) -> Self {
        ResponseGuard {
            response: Some(response),
        }
    }

    fn response(&self) -> &dyn NodeResponse {
        self.response.as_deref().unwrap()
    }

    fn response_mut(&mut self) -> &mut dyn NodeResponse {
        self.response.as_deref_mut().unwrap()
    }
}

impl Drop for ResponseGuard {
    fn drop(&mut self) {
        if let Some(mut response) = self.response.take() {
            response.release();
        }
    }
}
