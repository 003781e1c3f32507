use serde::{Deserialize, Serialize};

/// A series record as decoded from the render response body.
///
/// Both wire formats yield this shape. `(end - start) / step` predicts the
/// number of values, but the node is trusted on that; a mismatch is handled
/// by the consuming layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSeries {
    // metric name the node resolved for this series
    pub name: String,
    // the target expression that produced the series, if the node sent one
    #[serde(rename = "pathExpression", default, skip_serializing_if = "Option::is_none")]
    pub path_expression: Option<String>,
    pub start: i64,
    pub end: i64,
    pub step: i64,
    // one slot per step; None marks a missing datapoint
    pub values: Vec<Option<f64>>,
}

/// (start, end, step) triple describing the sampling window of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInfo {
    pub start: i64,
    pub end: i64,
    pub step: i64,
}

/// Canonical series representation returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesData {
    pub path_expression: String,
    pub name: String,
    pub time_info: TimeInfo,
    pub values: Vec<Option<f64>>,
}

/// A time range covered by a remote metric. Opaque to the fetch path, carried
/// for the aggregation layer above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: i64,
    pub end: i64,
}
