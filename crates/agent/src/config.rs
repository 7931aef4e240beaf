//! Agent configuration

use anyhow::Result;
use monitor_lib::MonitorConfig;
use serde::Deserialize;

/// Agent configuration: the monitor core settings plus the API surface
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// API server port for health/metrics
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Monitor loop configuration
    #[serde(default)]
    pub monitor: MonitorConfig,
}

fn default_api_port() -> u16 {
    9000
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            monitor: MonitorConfig::default(),
        }
    }
}

impl AgentConfig {
    /// Load configuration from the environment (MONITOR_ prefix)
    ///
    /// Nested monitor fields use a double-underscore separator, e.g.
    /// `MONITOR_MONITOR__ALERT_THRESHOLD=90`. Falls back to defaults when
    /// the environment carries nothing usable.
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("MONITOR").separator("__"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_default())
    }
}
