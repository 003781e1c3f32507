use std::{
    collections::{HashMap, HashSet},
    fmt,
    sync::Arc,
};

use crate::{
    config::FetchConfig,
    decoder::PayloadDecoder,
    errors::Result,
    fetcher::RetryingFetcher,
    node::RemoteNode,
    normalizer,
    query::{RenderQuery, RENDER_PATH},
    series::{Interval, SeriesData, TimeInfo},
};

/// Per-call context forwarded from the caller's inbound request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Trust/identity headers to pass through to the remote node
    pub forward_headers: Option<HashMap<String, String>>,
}

/// Reads series for one metric, or a batch of targets, from a single remote
/// aggregation node.
///
/// Immutable after construction and safe to share across tasks; every fetch
/// call is independent. Built once per (node, metric) association by the
/// finder layer and reused across many fetches.
pub struct RemoteSeriesReader {
    // handle to the node that owns the queried metrics, shared with the finder
    node: Arc<dyn RemoteNode>,
    // metric this reader answers single-series fetches for
    metric_path: Option<String>,
    // time ranges known to be covered on the remote node
    intervals: Vec<Interval>,
    // deduplicated targets sent in one batched render request
    bulk_query: Vec<String>,
    config: FetchConfig,
    fetcher: RetryingFetcher,
    decoder: PayloadDecoder,
}

impl RemoteSeriesReader {
    /// Creates a reader for `metric_path` on `node`.
    ///
    /// When `bulk_query` is absent or empty, the target list falls back to
    /// the metric path alone; with neither present the reader is inert and
    /// every fetch returns empty without touching the network.
    pub fn new(
        node: Arc<dyn RemoteNode>,
        metric_path: Option<String>,
        intervals: Vec<Interval>,
        bulk_query: Option<Vec<String>>,
        config: FetchConfig,
    ) -> Self {
        let bulk_query = match bulk_query {
            Some(targets) if !targets.is_empty() => dedup_targets(targets),
            _ => metric_path.iter().cloned().collect(),
        };

        let fetcher = RetryingFetcher::new(config.max_fetch_attempts);
        let decoder = PayloadDecoder::new(config.buffer_size);

        RemoteSeriesReader {
            node,
            metric_path,
            intervals,
            bulk_query,
            config,
            fetcher,
            decoder,
        }
    }

    /// Time ranges known to be covered by this reader's metric. No I/O.
    pub fn get_intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Fetches every configured target for the given range and returns the
    /// decoded series in payload order.
    pub async fn fetch_multi(
        &self,
        start_time: i64,
        end_time: i64,
        now: Option<i64>,
        request_context: Option<&RequestContext>,
    ) -> Result<Vec<SeriesData>> {
        if self.bulk_query.is_empty() {
            return Ok(Vec::new());
        }

        let query = RenderQuery::new(
            self.node.params(),
            start_time,
            end_time,
            now,
            &self.bulk_query,
        )
        .build();
        let headers = request_context.and_then(|context| context.forward_headers.as_ref());

        let response = self
            .fetcher
            .fetch(
                self.node.as_ref(),
                RENDER_PATH,
                &query,
                headers,
                self.config.fetch_timeout(),
            )
            .await?;

        let records = self.decoder.decode(self.node.as_ref(), response).await?;

        Ok(normalizer::normalize(records))
    }

    /// Fetches the configured metric and returns its time info and values,
    /// or `None` when the response carries no series under that name.
    pub async fn fetch(
        &self,
        start_time: i64,
        end_time: i64,
        now: Option<i64>,
        request_context: Option<&RequestContext>,
    ) -> Result<Option<(TimeInfo, Vec<Option<f64>>)>> {
        let series = self
            .fetch_multi(start_time, end_time, now, request_context)
            .await?;

        Ok(series
            .into_iter()
            .find(|series| self.metric_path.as_deref() == Some(series.name.as_str()))
            .map(|series| (series.time_info, series.values)))
    }
}

impl fmt::Debug for RemoteSeriesReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RemoteSeriesReader[{}]: {}",
            self.node.host(),
            self.bulk_query.join(",")
        )
    }
}

/// First occurrence wins, so the wire order of targets is deterministic
/// across identical calls.
fn dedup_targets(targets: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    targets
        .into_iter()
        .filter(|target| seen.insert(target.clone()))
        .collect()
}
