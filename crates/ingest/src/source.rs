use async_trait::async_trait;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("knowledge base source is not configured: {0}")]
    NotConfigured(String),
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("no file matching {0:?} in the knowledge base")]
    NotFound(String),
    #[error("file {0} has no downloadable content")]
    NoContent(String),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("document from {0} is empty")]
    Empty(String),
}

/// Anything that can hand back the raw text of the knowledge base document.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Short description used in logs and error messages.
    fn describe(&self) -> String;

    async fn fetch_raw(&self) -> Result<String, FetchError>;
}
