use ingest::UnifiedConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub bind_addr: String,
    pub remote: UnifiedConfig,
    pub local: LocalConfig,
    pub avatar: AvatarConfig,
    pub advisory_ttl_secs: u64,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalConfig {
    pub path: PathBuf,
    /// Served copy of the document. Takes precedence over `path` when set.
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvatarConfig {
    pub agent_id: String,
    pub face_id: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            remote: UnifiedConfig::default(),
            local: LocalConfig {
                path: PathBuf::from("public/health_kms.md"),
                url: None,
            },
            avatar: AvatarConfig::default(),
            advisory_ttl_secs: 5,
            log_format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from a key lookup; unset or blank keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let parse_u64 = |key: &str, default: u64| -> anyhow::Result<u64> {
            match get(key) {
                Some(v) => v
                    .parse()
                    .map_err(|e| anyhow::anyhow!("{key} must be a whole number of seconds: {e}")),
                None => Ok(default),
            }
        };

        let mut config = Self::default();

        if let Some(addr) = get("DASHBOARD_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(base_url) = get("UNIFIED_BASE_URL") {
            config.remote.base_url = base_url;
        }
        config.remote.api_key = get("UNIFIED_API_KEY");
        config.remote.connection_id = get("UNIFIED_CONNECTION_ID");
        if let Some(file_name) = get("KNOWLEDGE_BASE_FILE") {
            config.remote.file_name = file_name;
        }
        config.remote.timeout_secs = parse_u64("REQUEST_TIMEOUT_SECS", config.remote.timeout_secs)?;

        if let Some(path) = get("LOCAL_KNOWLEDGE_BASE_PATH") {
            config.local.path = PathBuf::from(path);
        }
        config.local.url = get("LOCAL_KNOWLEDGE_BASE_URL");

        config.avatar.agent_id = get("VAPI_AGENT_ID").unwrap_or_default();
        config.avatar.face_id = get("SIMLI_FACE_ID").unwrap_or_default();

        config.advisory_ttl_secs = parse_u64("ADVISORY_TTL_SECS", config.advisory_ttl_secs)?;
        config.log_format = match get("LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => anyhow::bail!("LOG_FORMAT must be \"text\" or \"json\", got {other:?}"),
        };

        Ok(config)
    }

    pub fn advisory_ttl(&self) -> Duration {
        Duration::from_secs(self.advisory_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.remote.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.remote.file_name, "health_kms.md");
        assert!(config.remote.api_key.is_none());
        assert_eq!(config.local.path, PathBuf::from("public/health_kms.md"));
        assert_eq!(config.advisory_ttl(), Duration::from_secs(5));
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("UNIFIED_API_KEY", "jwt-token"),
            ("UNIFIED_CONNECTION_ID", "conn-42"),
            ("LOCAL_KNOWLEDGE_BASE_URL", "http://localhost:8080/health_kms.md"),
            ("ADVISORY_TTL_SECS", "10"),
            ("VAPI_AGENT_ID", "agent-1"),
            ("LOG_FORMAT", "json"),
        ]))
        .unwrap();

        assert_eq!(config.remote.api_key.as_deref(), Some("jwt-token"));
        assert_eq!(config.remote.connection_id.as_deref(), Some("conn-42"));
        assert!(config.local.url.is_some());
        assert_eq!(config.advisory_ttl_secs, 10);
        assert_eq!(config.avatar.agent_id, "agent-1");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = AppConfig::from_lookup(lookup(&[("UNIFIED_API_KEY", "   ")])).unwrap();
        assert!(config.remote.api_key.is_none());
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        assert!(AppConfig::from_lookup(lookup(&[("REQUEST_TIMEOUT_SECS", "soon")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("LOG_FORMAT", "xml")])).is_err());
    }
}
