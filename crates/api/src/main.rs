use anyhow::Context;
use api::avatar::AvatarPanel;
use api::metrics::Metrics;
use api::{AppConfig, Dashboard, LogFormat};
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real environment variables still apply.
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);

    let fetcher = api::build_fetcher(&config)?;
    let dashboard = Dashboard::new(
        fetcher,
        AvatarPanel::new(&config.avatar),
        Metrics::new(),
        config.advisory_ttl(),
    );

    // Initial load, the equivalent of the dashboard mounting.
    let initial = dashboard.clone();
    tokio::spawn(async move {
        match initial.refresh().await {
            Ok(status) => tracing::info!(?status, "Initial load finished"),
            Err(e) => tracing::warn!(error = %e, "Initial load did not run"),
        }
    });

    let app = api::router(dashboard);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("Dashboard listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
