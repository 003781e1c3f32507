use std::sync::Arc;

use anyhow::Result;
use strato_client::{FetchConfig, HttpRemoteNode, NodeParams, RemoteSeriesReader};

/// Simple example fetching one metric from a local aggregation node.
/// Expects a node listening on 127.0.0.1:8080 serving /render/.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let node = Arc::new(HttpRemoteNode::new(
        "http://127.0.0.1:8080",
        NodeParams::default(),
    )?);

    let reader = RemoteSeriesReader::new(
        node,
        Some("servers.web1.cpu".to_string()),
        Vec::new(),
        None,
        FetchConfig::default(),
    );

    let until = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)?
        .as_secs() as i64;
    let from = until - 3600;

    match reader.fetch(from, until, None, None).await? {
        Some((time_info, values)) => {
            println!(
                "📈 servers.web1.cpu: {} points, step {}s",
                values.len(),
                time_info.step
            );
            for (slot, value) in values.iter().enumerate() {
                let timestamp = time_info.start + slot as i64 * time_info.step;
                match value {
                    Some(value) => println!("  {} -> {}", timestamp, value),
                    None => println!("  {} -> (missing)", timestamp),
                }
            }
        }
        None => println!("node returned no series for servers.web1.cpu"),
    }

    Ok(())
}
