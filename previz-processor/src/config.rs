//! Configuration for the render worker.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Network settings.
    pub network: NetworkConfig,
    /// Render-tick settings.
    pub render: RenderConfig,
    /// Asset lookup settings.
    pub assets: AssetConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Network configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Host the authoring tool listens on.
    pub host: String,
    /// Port the authoring tool listens on.
    pub port: u16,
    /// Connect retry budget before giving up.
    pub connect_attempts: u32,
    /// Sleep between failed connect attempts, in milliseconds.
    pub connect_backoff_ms: u64,
}

/// Render-tick configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Render ticks per second.
    pub target_fps: u32,
}

/// Asset lookup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directories prepended to the engine's model search path.
    pub search_paths: Vec<String>,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            render: RenderConfig::default(),
            assets: AssetConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 5555,
            connect_attempts: 3,
            connect_backoff_ms: 1000,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { target_fps: 60 }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            search_paths: Vec::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".into() }
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl ProcessorConfig {
    /// Load configuration from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(_) => {
                tracing::info!("no config at {}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// The peer address in `host:port` form.
    pub fn peer_addr(&self) -> String {
        format!("{}:{}", self.network.host, self.network.port)
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let cfg = ProcessorConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        assert!(text.contains("port"));
        assert!(text.contains("target_fps"));
    }

    #[test]
    fn roundtrip_config() {
        let cfg = ProcessorConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        let parsed: ProcessorConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.network.port, 5555);
        assert_eq!(parsed.network.connect_attempts, 3);
        assert_eq!(parsed.render.target_fps, 60);
    }

    #[test]
    fn peer_addr_joins_host_and_port() {
        let cfg = ProcessorConfig::default();
        assert_eq!(cfg.peer_addr(), "127.0.0.1:5555");
    }
}
