//! Strato-Client
//!
//! Strato-Client -- fetches rendered series from Strato aggregation nodes

mod reader;
pub use reader::{RemoteSeriesReader, RequestContext};

pub mod errors;

mod node;
pub use node::{BodyReader, NodeParams, NodeResponse, RemoteNode, RenderFormat};

mod http_node;
pub use http_node::HttpRemoteNode;

mod config;
pub use config::FetchConfig;

mod series;
pub use series::{Interval, RawSeries, SeriesData, TimeInfo};

mod query;

mod fetcher;

mod decoder;

mod normalizer;
