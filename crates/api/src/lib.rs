pub mod avatar;
pub mod config;
pub mod metrics;
pub mod pipeline;
pub mod routes;
pub mod state;

pub use config::{AppConfig, LogFormat};
pub use pipeline::{Dashboard, build_fetcher};
pub use routes::router;
pub use state::{DashboardState, LoadStatus, Notice, NoticeKind, RefreshError};
