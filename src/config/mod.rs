use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Base URL of the WHEP media server (MediaMTX-style), e.g.
    /// "https://media.fab.local:8889".
    pub whep_base_url: String,
    /// Hard deadline for one signaling offer/answer round trip.
    pub signaling_timeout_ms: u64,
    /// Fixed interval between automatic reconnect attempts.
    pub reconnect_interval_ms: u64,
    /// Simulated latency of the demo vehicle control endpoint.
    pub command_latency_ms: u64,
    /// Cap on the execution history list, most-recent-first.
    pub history_limit: usize,
    /// Number of vehicles seeded into the demo fleet.
    pub fleet_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6820,
            whep_base_url: "http://127.0.0.1:8889".to_string(),
            signaling_timeout_ms: 10_000,
            reconnect_interval_ms: 5_000,
            command_latency_ms: 500,
            history_limit: 50,
            fleet_size: 12,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(file_config) = Self::from_conf_file()? {
            config.apply_file(file_config);
        }

        if let Ok(host) = std::env::var("HOST") {
            config.host = host;
        }

        if let Ok(port) = std::env::var("PORT") {
            config.port = port.parse().unwrap_or(6820);
        }

        if let Ok(url) = std::env::var("WHEP_BASE_URL") {
            config.whep_base_url = url;
        }

        config.normalize_whep_base_url()?;
        Ok(config)
    }

    fn conf_path() -> PathBuf {
        std::env::var("OHT_GATEWAY_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.json"))
    }

    fn from_conf_file() -> Result<Option<FileConfig>> {
        let path = Self::conf_path();
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let file_config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(Some(file_config))
    }

    fn apply_file(&mut self, file_config: FileConfig) {
        if let Some(host) = file_config.host {
            self.host = host;
        }
        if let Some(port) = file_config.port {
            self.port = port;
        }
        if let Some(url) = file_config.whep_base_url {
            self.whep_base_url = url;
        }
        if let Some(ms) = file_config.signaling_timeout_ms {
            self.signaling_timeout_ms = ms;
        }
        if let Some(ms) = file_config.reconnect_interval_ms {
            self.reconnect_interval_ms = ms;
        }
        if let Some(ms) = file_config.command_latency_ms {
            self.command_latency_ms = ms;
        }
        if let Some(limit) = file_config.history_limit {
            self.history_limit = limit;
        }
        if let Some(size) = file_config.fleet_size {
            self.fleet_size = size;
        }
    }

    fn normalize_whep_base_url(&mut self) -> Result<()> {
        let url = self.whep_base_url.trim();
        if url.is_empty() {
            anyhow::bail!("whep_base_url cannot be empty");
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            anyhow::bail!("whep_base_url must start with http:// or https://");
        }
        self.whep_base_url = url.trim_end_matches('/').to_string();
        Ok(())
    }

    /// WHEP endpoint for a stream name, e.g. "{base}/cam1/whep".
    pub fn whep_url(&self, stream_name: &str) -> String {
        format!("{}/{}/whep", self.whep_base_url, stream_name)
    }
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    host: Option<String>,
    port: Option<u16>,
    whep_base_url: Option<String>,
    signaling_timeout_ms: Option<u64>,
    reconnect_interval_ms: Option<u64>,
    command_latency_ms: Option<u64>,
    history_limit: Option<usize>,
    fleet_size: Option<usize>,
}
