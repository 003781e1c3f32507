use crate::series::{RawSeries, SeriesData, TimeInfo};

/// Maps decoded records into the canonical representation.
///
/// Pure 1:1 mapping: order is preserved from the payload, nothing is
/// filtered or deduplicated.
pub(crate) fn normalize(records: Vec<RawSeries>) -> Vec<SeriesData> {
    records.into_iter().map(normalize_series).collect()
}

fn normalize_series(series: RawSeries) -> SeriesData {
    // nodes older than the compact format omit pathExpression
    let path_expression = series.path_expression.unwrap_or_else(|| series.name.clone());

    SeriesData {
        path_expression,
        name: series.name,
        time_info: TimeInfo {
            start: series.start,
            end: series.end,
            step: series.step,
        },
        values: series.values,
    }
}
