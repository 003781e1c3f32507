use thiserror::Error;

pub type Result<T> = std::result::Result<T, StratoError>;

#[derive(Debug, Error)]
pub enum StratoError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: usize,
        #[source]
        source: Box<StratoError>,
    },

    #[error("error decoding render response from {url}: {detail}")]
    Decode { url: String, detail: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unable to perform operation: {0}")]
    Unrecoverable(String),
}

impl StratoError {
    /// The attempt count carried by a terminal retry failure, if this is one.
    pub fn exhausted_attempts(&self) -> Option<usize> {
        match self {
            StratoError::RetriesExhausted { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }
}
