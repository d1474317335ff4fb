use ingest::{
    DocumentSource, FetchError, FetchOutcome, FileReader, KnowledgeBaseFetcher,
    KnowledgeDocument, StaticHttpReader, UnifiedStorageClient,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::avatar::AvatarPanel;
use crate::config::AppConfig;
use crate::metrics::{Metrics, TimedOperation};
use crate::state::{DashboardState, LoadStatus, RefreshError};

pub const LOCAL_DATA_ADVISORY: &str =
    "Could not reach the health records service. Showing locally stored health data.";
pub const LOAD_FAILED_MESSAGE: &str = "Unable to load health data. Please try again later.";

/// Build the remote-then-local fetcher described by `config`.
pub fn build_fetcher(config: &AppConfig) -> anyhow::Result<KnowledgeBaseFetcher> {
    let remote = UnifiedStorageClient::new(config.remote.clone())
        .map(|client| Box::new(client) as Box<dyn DocumentSource>);

    let local: Box<dyn DocumentSource> = match &config.local.url {
        Some(url) => Box::new(StaticHttpReader::new(url.clone(), config.request_timeout())?),
        None => Box::new(FileReader::new(config.local.path.clone())),
    };

    Ok(KnowledgeBaseFetcher::new(remote, local))
}

/// Shared handle to the presentation state and the pipeline that writes it.
#[derive(Clone)]
pub struct Dashboard {
    state: Arc<Mutex<DashboardState>>,
    fetcher: Arc<KnowledgeBaseFetcher>,
    metrics: Arc<Metrics>,
    advisory_ttl: Duration,
}

impl Dashboard {
    pub fn new(
        fetcher: KnowledgeBaseFetcher,
        avatar: AvatarPanel,
        metrics: Arc<Metrics>,
        advisory_ttl: Duration,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(DashboardState::new(avatar))),
            fetcher: Arc::new(fetcher),
            metrics,
            advisory_ttl,
        }
    }

    pub async fn snapshot(&self) -> DashboardState {
        self.state.lock().await.clone()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Run one fetch-and-parse pass.
    ///
    /// The load itself runs on its own task, so a caller that goes away mid-fetch
    /// (a dropped HTTP request) never leaves the state stuck in `Loading`.
    pub async fn refresh(&self) -> Result<LoadStatus, RefreshError> {
        if let Err(e) = self.state.lock().await.begin_load() {
            self.metrics.record_rejected();
            warn!("Refresh rejected, a load is already running");
            return Err(e);
        }

        let this = self.clone();
        match tokio::spawn(async move { this.load().await }).await {
            Ok(status) => Ok(status),
            Err(e) => {
                self.state.lock().await.fail(LOAD_FAILED_MESSAGE);
                self.metrics.record_load(None);
                Err(RefreshError::Aborted(e.to_string()))
            }
        }
    }

    pub async fn avatar_started(&self) -> AvatarPanel {
        let mut state = self.state.lock().await;
        state.avatar.on_start();
        state.avatar.clone()
    }

    pub async fn avatar_closed(&self) -> AvatarPanel {
        let mut state = self.state.lock().await;
        state.avatar.on_close();
        state.avatar.clone()
    }

    async fn load(&self) -> LoadStatus {
        match self.fetcher.fetch().await {
            FetchOutcome::RemoteOk(document) => self.apply(document, None).await,
            FetchOutcome::LocalOk {
                document,
                remote_error,
            } => self.apply(document, Some(remote_error)).await,
            FetchOutcome::BothFailed {
                remote_error,
                local_error,
            } => {
                self.metrics.record_load(None);
                let mut state = self.state.lock().await;
                state.fail(LOAD_FAILED_MESSAGE);
                warn!(
                    remote_error = %remote_error,
                    local_error = %local_error,
                    "Dashboard load failed, keeping previous data"
                );
                state.status
            }
        }
    }

    async fn apply(&self, document: KnowledgeDocument, remote_error: Option<FetchError>) -> LoadStatus {
        let timer = TimedOperation::start();
        let profile = extract::parse_document(&document.text);
        self.metrics.record_parse(timer.elapsed(), profile.record_count());
        self.metrics.record_load(Some(document.source));

        let mut state = self.state.lock().await;
        state.apply(&document, profile);

        if let Some(e) = remote_error {
            let id = state.set_advisory(LOCAL_DATA_ADVISORY);
            debug!(advisory = %id, cause = %e, "Local data advisory shown");
            self.schedule_advisory_clear(id);
        }

        info!(
            doc_id = %document.doc_id,
            source = ?document.source,
            status = ?state.status,
            "Dashboard updated"
        );
        state.status
    }

    fn schedule_advisory_clear(&self, id: Uuid) {
        let state = Arc::clone(&self.state);
        let ttl = self.advisory_ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if state.lock().await.clear_advisory(id) {
                debug!(advisory = %id, "Advisory cleared");
            }
        });
    }
}
