use std::{collections::HashMap, time::Duration};

use tracing::{error, warn};

use crate::{
    errors::{Result, StratoError},
    node::{NodeResponse, RemoteNode},
};

/// Issues one render request against a node, retrying transport failures up
/// to a bound.
///
/// Attempts run strictly in sequence with no backoff between them; the only
/// time bound is the per-request timeout. Callers needing an overall deadline
/// impose it around the fetch.
#[derive(Debug, Clone)]
pub(crate) struct RetryingFetcher {
    max_attempts: usize,
}

impl RetryingFetcher {
    pub(crate) fn new(max_attempts: usize) -> Self {
        RetryingFetcher {
            max_attempts: if max_attempts == 0 { 1 } else { max_attempts },
        }
    }

    pub(crate) async fn fetch(
        &self,
        node: &dyn RemoteNode,
        path: &str,
        query: &[(String, String)],
        headers: Option<&HashMap<String, String>>,
        timeout: Duration,
    ) -> Result<Box<dyn NodeResponse>> {
        // start counting at one to keep log output aligned with the setting
        let mut attempt = 1;

        loop {
            match node.request(path, query, headers, timeout).await {
                Ok(response) => return Ok(response),
                Err(err) => {
                    if attempt >= self.max_attempts {
                        error!(
                            "fetch from {} failed after {} attempts, root cause: {}",
                            node.host(),
                            self.max_attempts,
                            err
                        );
                        return Err(StratoError::RetriesExhausted {
                            attempts: self.max_attempts,
                            source: Box::new(err),
                        });
                    }
                    warn!(
                        "fetch from {} failed, try {} of {}, root cause: {}",
                        node.host(),
                        attempt,
                        self.max_attempts,
                        err
                    );
                    attempt += 1;
                }
            }
        }
    }
}
