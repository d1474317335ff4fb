use tracing::{info, warn};

use crate::document::{KnowledgeDocument, SourceTag};
use crate::source::{DocumentSource, FetchError};

/// Result of one fetch: remote first, local second, no retries.
#[derive(Debug)]
pub enum FetchOutcome {
    RemoteOk(KnowledgeDocument),
    LocalOk {
        document: KnowledgeDocument,
        remote_error: FetchError,
    },
    BothFailed {
        remote_error: FetchError,
        local_error: FetchError,
    },
}

impl FetchOutcome {
    pub fn document(&self) -> Option<&KnowledgeDocument> {
        match self {
            FetchOutcome::RemoteOk(document) | FetchOutcome::LocalOk { document, .. } => {
                Some(document)
            }
            FetchOutcome::BothFailed { .. } => None,
        }
    }

    pub fn source(&self) -> Option<SourceTag> {
        self.document().map(|d| d.source)
    }
}

pub struct KnowledgeBaseFetcher {
    /// `Err` holds the reason the remote client could not be built, e.g. a missing credential.
    /// Each fetch reports it as [`FetchError::NotConfigured`].
    remote: Result<Box<dyn DocumentSource>, String>,
    local: Box<dyn DocumentSource>,
}

impl KnowledgeBaseFetcher {
    pub fn new(
        remote: Result<Box<dyn DocumentSource>, FetchError>,
        local: Box<dyn DocumentSource>,
    ) -> Self {
        let remote = remote.map_err(|e| {
            warn!(error = %e, "Remote knowledge base unavailable, only the local copy will be used");
            match e {
                FetchError::NotConfigured(reason) => reason,
                other => other.to_string(),
            }
        });
        Self { remote, local }
    }

    pub async fn fetch(&self) -> FetchOutcome {
        let remote_error = match self.fetch_remote().await {
            Ok(document) => {
                info!(doc_id = %document.doc_id, lines = document.line_count(), "Loaded remote knowledge base");
                return FetchOutcome::RemoteOk(document);
            }
            Err(e) => e,
        };

        warn!(error = %remote_error, "Remote knowledge base failed, falling back to local copy");

        match Self::read(self.local.as_ref(), SourceTag::LocalFallback).await {
            Ok(document) => {
                info!(
                    doc_id = %document.doc_id,
                    source = %self.local.describe(),
                    "Loaded local knowledge base"
                );
                FetchOutcome::LocalOk {
                    document,
                    remote_error,
                }
            }
            Err(local_error) => {
                warn!(
                    remote_error = %remote_error,
                    local_error = %local_error,
                    "Both knowledge base sources failed"
                );
                FetchOutcome::BothFailed {
                    remote_error,
                    local_error,
                }
            }
        }
    }

    async fn fetch_remote(&self) -> Result<KnowledgeDocument, FetchError> {
        match &self.remote {
            Ok(source) => Self::read(source.as_ref(), SourceTag::Remote).await,
            Err(reason) => Err(FetchError::NotConfigured(reason.clone())),
        }
    }

    async fn read(
        source: &dyn DocumentSource,
        tag: SourceTag,
    ) -> Result<KnowledgeDocument, FetchError> {
        let raw = source.fetch_raw().await?;
        KnowledgeDocument::from_raw(&raw, tag).ok_or_else(|| FetchError::Empty(source.describe()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Fixed(Option<&'static str>);

    #[async_trait]
    impl DocumentSource for Fixed {
        fn describe(&self) -> String {
            "fixed".to_string()
        }

        async fn fetch_raw(&self) -> Result<String, FetchError> {
            self.0
                .map(str::to_string)
                .ok_or_else(|| FetchError::NotFound("health_kms.md".to_string()))
        }
    }

    fn fetcher(remote: Option<&'static str>, local: Option<&'static str>) -> KnowledgeBaseFetcher {
        let remote: Box<dyn DocumentSource> = Box::new(Fixed(remote));
        KnowledgeBaseFetcher::new(Ok(remote), Box::new(Fixed(local)))
    }

    #[tokio::test]
    async fn test_remote_success_skips_local() {
        let outcome = fetcher(Some("# Remote\n"), None).fetch().await;

        assert!(matches!(outcome, FetchOutcome::RemoteOk(_)));
        assert_eq!(outcome.document().unwrap().text, "# Remote");
        assert_eq!(outcome.source(), Some(SourceTag::Remote));
    }

    #[tokio::test]
    async fn test_remote_failure_falls_back() {
        let outcome = fetcher(None, Some("\u{feff}# Local\r\n")).fetch().await;

        match outcome {
            FetchOutcome::LocalOk {
                document,
                remote_error,
            } => {
                assert_eq!(document.text, "# Local");
                assert_eq!(document.source, SourceTag::LocalFallback);
                assert!(matches!(remote_error, FetchError::NotFound(_)));
            }
            other => panic!("expected local fallback, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_remote_content_falls_back() {
        let outcome = fetcher(Some(" \r\n\0"), Some("# Local")).fetch().await;

        match outcome {
            FetchOutcome::LocalOk { remote_error, .. } => {
                assert!(matches!(remote_error, FetchError::Empty(_)));
            }
            other => panic!("expected local fallback, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unconfigured_remote_falls_back() {
        let fetcher = KnowledgeBaseFetcher::new(
            Err(FetchError::NotConfigured("Unified API key is not set".to_string())),
            Box::new(Fixed(Some("# Local"))),
        );

        let outcome = fetcher.fetch().await;
        assert_eq!(outcome.source(), Some(SourceTag::LocalFallback));
        match outcome {
            FetchOutcome::LocalOk { remote_error, .. } => {
                assert!(matches!(
                    &remote_error,
                    FetchError::NotConfigured(reason) if reason == "Unified API key is not set"
                ));
                assert_eq!(
                    remote_error.to_string(),
                    "knowledge base source is not configured: Unified API key is not set"
                );
            }
            other => panic!("expected local fallback, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_both_failed() {
        let outcome = fetcher(None, Some("")).fetch().await;

        assert!(outcome.document().is_none());
        assert!(matches!(
            outcome,
            FetchOutcome::BothFailed {
                local_error: FetchError::Empty(_),
                ..
            }
        ));
    }
}
