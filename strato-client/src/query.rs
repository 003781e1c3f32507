use crate::node::NodeParams;

/// Render endpoint served by every aggregation node.
pub(crate) const RENDER_PATH: &str = "/render/";

/// Builds the query pairs for one render request.
///
/// Target order follows the reader's deduplicated target list, so identical
/// calls produce identical requests.
#[derive(Debug)]
pub(crate) struct RenderQuery<'a> {
    params: &'a NodeParams,
    start_time: i64,
    end_time: i64,
    now: Option<i64>,
    targets: &'a [String],
}

impl<'a> RenderQuery<'a> {
    pub(crate) fn new(
        params: &'a NodeParams,
        start_time: i64,
        end_time: i64,
        now: Option<i64>,
        targets: &'a [String],
    ) -> Self {
        RenderQuery {
            params,
            start_time,
            end_time,
            now,
            targets,
        }
    }

    pub(crate) fn build(&self) -> Vec<(String, String)> {
        let mut query = vec![
            (
                "format".to_string(),
                self.params.format.as_query_value().to_string(),
            ),
            (
                "local".to_string(),
                if self.params.local { "1" } else { "0" }.to_string(),
            ),
            // force the node to recompute instead of serving its own cache
            ("noCache".to_string(), "1".to_string()),
            ("from".to_string(), self.start_time.to_string()),
            ("until".to_string(), self.end_time.to_string()),
        ];

        for target in self.targets {
            query.push(("target".to_string(), target.clone()));
        }

        if let Some(now) = self.now {
            query.push(("now".to_string(), now.to_string()));
        }

        query
    }
}
