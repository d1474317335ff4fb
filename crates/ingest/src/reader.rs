use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs;

use crate::source::{DocumentSource, FetchError};

/// Local fallback read straight from disk.
pub struct FileReader {
    path: PathBuf,
}

impl FileReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DocumentSource for FileReader {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    async fn fetch_raw(&self) -> Result<String, FetchError> {
        fs::read_to_string(&self.path)
            .await
            .map_err(|source| FetchError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

/// Local fallback served as a static resource over HTTP. Any non-2xx status is a failure.
pub struct StaticHttpReader {
    url: String,
    client: reqwest::Client,
}

impl StaticHttpReader {
    pub fn new(url: String, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| FetchError::Http {
                url: url.clone(),
                source,
            })?;

        Ok(Self { url, client })
    }
}

#[async_trait]
impl DocumentSource for StaticHttpReader {
    fn describe(&self) -> String {
        format!("static resource {}", self.url)
    }

    async fn fetch_raw(&self) -> Result<String, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: self.url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status: response.status(),
            });
        }

        response.text().await.map_err(|source| FetchError::Http {
            url: self.url.clone(),
            source,
        })
    }
}
