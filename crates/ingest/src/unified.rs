use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::source::{DocumentSource, FetchError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnifiedConfig {
    pub base_url: String,
    pub connection_id: Option<String>,
    pub api_key: Option<String>,
    pub file_name: String,
    pub timeout_secs: u64,
}

impl Default for UnifiedConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.unified.to".to_string(),
            connection_id: None,
            api_key: None,
            file_name: "health_kms.md".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Client for the Unified storage API, used as the remote knowledge base.
#[derive(Clone)]
pub struct UnifiedStorageClient {
    base_url: String,
    connection_id: String,
    api_key: String,
    file_name: String,
    client: reqwest::Client,
}

#[derive(Debug, Clone, Deserialize)]
struct StorageFile {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    download_url: Option<String>,
}

fn required(value: Option<String>, what: &str) -> Result<String, FetchError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| FetchError::NotConfigured(format!("{what} is not set")))
}

impl UnifiedStorageClient {
    /// Fails with [`FetchError::NotConfigured`] when the API key or connection id is missing.
    pub fn new(config: UnifiedConfig) -> Result<Self, FetchError> {
        let api_key = required(config.api_key, "Unified API key")?;
        let connection_id = required(config.connection_id, "Unified connection id")?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|source| FetchError::Http {
                url: config.base_url.clone(),
                source,
            })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            connection_id,
            api_key,
            file_name: config.file_name,
            client,
        })
    }

    async fn send(
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, FetchError> {
        let response = request.send().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        Ok(response)
    }

    async fn list_files(&self) -> Result<Vec<StorageFile>, FetchError> {
        let url = format!("{}/storage/{}/file", self.base_url, self.connection_id);
        let request = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(&[("query", self.file_name.as_str())]);

        Self::send(&url, request)
            .await?
            .json()
            .await
            .map_err(|source| FetchError::Http { url, source })
    }

    async fn get_file(&self, file_id: &str) -> Result<StorageFile, FetchError> {
        let url = format!(
            "{}/storage/{}/file/{}",
            self.base_url, self.connection_id, file_id
        );
        let request = self.client.get(&url).bearer_auth(&self.api_key);

        Self::send(&url, request)
            .await?
            .json()
            .await
            .map_err(|source| FetchError::Http { url, source })
    }

    /// List files matching the configured name, take the first and download its content.
    pub async fn fetch_document(&self) -> Result<String, FetchError> {
        let files = self.list_files().await?;
        let first = files
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::NotFound(self.file_name.clone()))?;

        tracing::debug!(
            file_id = %first.id,
            name = first.name.as_deref().unwrap_or(""),
            "Found knowledge base file"
        );

        let file = self.get_file(&first.id).await?;
        let download_url = file
            .download_url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| FetchError::NoContent(file.id.clone()))?;

        // Download links are pre-signed, so the bearer token stays with the API host.
        let request = self.client.get(&download_url);
        Self::send(&download_url, request)
            .await?
            .text()
            .await
            .map_err(|source| FetchError::Http {
                url: download_url,
                source,
            })
    }
}

#[async_trait]
impl DocumentSource for UnifiedStorageClient {
    fn describe(&self) -> String {
        format!("unified connection {}", self.connection_id)
    }

    async fn fetch_raw(&self) -> Result<String, FetchError> {
        self.fetch_document().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: &str) -> UnifiedConfig {
        UnifiedConfig {
            base_url: base_url.to_string(),
            connection_id: Some("conn-1".to_string()),
            api_key: Some("test-key".to_string()),
            ..UnifiedConfig::default()
        }
    }

    #[test]
    fn test_missing_api_key_is_construction_error() {
        let config = UnifiedConfig {
            connection_id: Some("conn-1".to_string()),
            ..UnifiedConfig::default()
        };

        let err = UnifiedStorageClient::new(config).err().unwrap();
        assert!(matches!(err, FetchError::NotConfigured(_)));
    }

    #[test]
    fn test_blank_connection_id_is_construction_error() {
        let config = UnifiedConfig {
            api_key: Some("key".to_string()),
            connection_id: Some("   ".to_string()),
            ..UnifiedConfig::default()
        };

        assert!(UnifiedStorageClient::new(config).is_err());
    }

    #[tokio::test]
    async fn test_fetch_document_follows_first_match() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/storage/conn-1/file"))
            .and(query_param("query", "health_kms.md"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "file-1", "name": "health_kms.md"},
                {"id": "file-2", "name": "health_kms.md.bak"}
            ])))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/storage/conn-1/file/file-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "file-1",
                "download_url": format!("{}/download/file-1", server.uri())
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/download/file-1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("## Medications\n"))
            .mount(&server)
            .await;

        let client = UnifiedStorageClient::new(test_config(&server.uri())).unwrap();
        let text = client.fetch_raw().await.unwrap();

        assert_eq!(text, "## Medications\n");
    }

    #[tokio::test]
    async fn test_no_matching_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/storage/conn-1/file"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let client = UnifiedStorageClient::new(test_config(&server.uri())).unwrap();
        let err = client.fetch_raw().await.unwrap_err();

        assert!(matches!(err, FetchError::NotFound(name) if name == "health_kms.md"));
    }

    #[tokio::test]
    async fn test_unauthorized_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = UnifiedStorageClient::new(test_config(&server.uri())).unwrap();
        let err = client.fetch_raw().await.unwrap_err();

        assert!(matches!(err, FetchError::Status { .. }));
    }

    #[tokio::test]
    async fn test_file_without_download_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/storage/conn-1/file"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!([{"id": "file-9"}])),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/storage/conn-1/file/file-9"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "file-9"})),
            )
            .mount(&server)
            .await;

        let client = UnifiedStorageClient::new(test_config(&server.uri())).unwrap();
        let err = client.fetch_raw().await.unwrap_err();

        assert!(matches!(err, FetchError::NoContent(id) if id == "file-9"));
    }
}
