use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use mood_core::EngineConfig;
use serde::{Deserialize, Serialize};

/// Top-level `mood.toml`. Every section and field is optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub source: SourceConfig,
    pub server: ServerConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// JSON feed returning `{"data": [RawItem, ...]}`. No URL, no ingestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Sent as `Authorization: Bearer ...`. `MOOD_BEARER_TOKEN` overrides.
    /// Never written back out.
    #[serde(skip_serializing)]
    pub bearer_token: Option<String>,
    pub max_results: u32,
    pub poll_interval_secs: f64,
    pub backoff_secs: f64,
    pub timeout_secs: f64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: None,
            bearer_token: None,
            max_results: 10,
            poll_interval_secs: 5.0,
            backoff_secs: 5.0,
            timeout_secs: 10.0,
        }
    }
}

impl SourceConfig {
    /// Durations must be positive and representable, or a failing source
    /// would be retried in a tight loop.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("poll_interval_secs", self.poll_interval_secs),
            ("backoff_secs", self.backoff_secs),
            ("timeout_secs", self.timeout_secs),
        ] {
            if !(value > 0.0 && Duration::try_from_secs_f64(value).is_ok()) {
                anyhow::bail!("{field} must be a positive number of seconds, got {value}");
            }
        }
        if self.max_results == 0 {
            anyhow::bail!("max_results must be at least 1");
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        secs(self.poll_interval_secs)
    }

    pub fn backoff(&self) -> Duration {
        secs(self.backoff_secs)
    }

    pub fn timeout(&self) -> Duration {
        secs(self.timeout_secs)
    }
}

// Callers go through `validate` first
fn secs(s: f64) -> Duration {
    Duration::try_from_secs_f64(s).unwrap_or(Duration::ZERO)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8050".to_string(),
        }
    }
}

/// Explicit path > `MOOD_CONFIG` env > built-in defaults.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os("MOOD_CONFIG").map(PathBuf::from))
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let mut config: AppConfig = toml::from_str(content).context("invalid config TOML")?;
    if let Ok(token) = std::env::var("MOOD_BEARER_TOKEN")
        && !token.is_empty()
    {
        config.source.bearer_token = Some(token);
    }
    config
        .engine
        .validate()
        .context("invalid [engine] config")?;
    config
        .source
        .validate()
        .context("invalid [source] config")?;
    Ok(config)
}

pub fn load(explicit: Option<&Path>) -> Result<AppConfig> {
    match resolve_config_path(explicit) {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            let config = parse(&content)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            tracing::info!("loaded config from {}", path.display());
            Ok(config)
        }
        None => parse(""),
    }
}
