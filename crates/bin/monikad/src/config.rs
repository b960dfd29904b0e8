//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `monika.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use monika_adapter_mock::MockSettings;
use monika_adapter_netbox_reqwest::NetboxSettings;
use monika_domain::kind::DeviceType;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Gateway connection settings.
    pub gateway: GatewayConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Mock driver settings.
    pub mock: MockConfig,
    /// NetBox inventory settings.
    pub netbox: NetboxConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port. Also announced to the gateway on connect.
    pub port: u16,
}

/// Gateway configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Base URL of the gateway.
    pub url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Free-form location announced on connect.
    pub location: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Mock driver configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    /// Number of simulated devices.
    pub devices: usize,
    /// Device type the driver serves.
    pub device_type: DeviceType,
    /// Generic modules per device, on top of the video and audio modules.
    pub generic_modules: usize,
    /// IOlets per generic module.
    pub iolets_per_module: usize,
    /// Clock ticker period in seconds.
    pub tick_secs: u64,
    /// Seconds a rebooting device stays offline.
    pub reboot_secs: u64,
}

/// NetBox inventory configuration. Leaving `url` empty keeps the mock
/// provider.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct NetboxConfig {
    /// Base URL of the NetBox instance.
    pub url: String,
    /// API token.
    pub token: String,
    /// Device type the driver serves.
    pub device_type: DeviceType,
    /// NetBox id of that device type.
    pub device_type_id: u32,
    /// Control port recorded on every listed device.
    pub control_port: Option<u16>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Config {
    /// Load configuration from `monika.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("monika.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("MONIKA_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("MONIKA_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("MONIKA_GATEWAY_URL") {
            self.gateway.url = val;
        }
        if let Ok(val) = std::env::var("MONIKA_NETBOX_URL") {
            self.netbox.url = val;
        }
        if let Ok(val) = std::env::var("MONIKA_NETBOX_TOKEN") {
            self.netbox.token = val;
        }
        if let Ok(val) = std::env::var("MONIKA_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if let Err(err) = url::Url::parse(&self.gateway.url) {
            return Err(ConfigError::Validation(format!(
                "gateway url {:?} is invalid: {err}",
                self.gateway.url
            )));
        }
        if self.gateway.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "gateway timeout must be non-zero".to_string(),
            ));
        }
        if self.mock.tick_secs == 0 {
            return Err(ConfigError::Validation(
                "mock tick interval must be non-zero".to_string(),
            ));
        }
        if !self.netbox.url.is_empty() {
            if let Err(err) = url::Url::parse(&self.netbox.url) {
                return Err(ConfigError::Validation(format!(
                    "netbox url {:?} is invalid: {err}",
                    self.netbox.url
                )));
            }
            if self.netbox.device_type_id == 0 {
                return Err(ConfigError::Validation(
                    "netbox device_type_id must be set".to_string(),
                ));
            }
            if self.netbox.timeout_secs == 0 {
                return Err(ConfigError::Validation(
                    "netbox timeout must be non-zero".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    #[must_use]
    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_secs(self.gateway.timeout_secs)
    }

    /// NetBox provider settings, or `None` when no NetBox URL is configured.
    #[must_use]
    pub fn netbox_settings(&self) -> Option<NetboxSettings> {
        if self.netbox.url.is_empty() {
            return None;
        }
        Some(NetboxSettings {
            url: self.netbox.url.clone(),
            token: self.netbox.token.clone(),
            device_type: self.netbox.device_type,
            device_type_id: self.netbox.device_type_id,
            control_port: self.netbox.control_port,
            timeout: Duration::from_secs(self.netbox.timeout_secs),
        })
    }

    /// Simulation parameters for every mock device.
    #[must_use]
    pub fn mock_settings(&self) -> MockSettings {
        MockSettings {
            generic_modules: self.mock.generic_modules,
            iolets_per_module: self.mock.iolets_per_module,
            tick_interval: Duration::from_secs(self.mock.tick_secs),
            reboot_delay: Duration::from_secs(self.mock.reboot_secs),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8090,
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8080".to_string(),
            timeout_secs: 5,
            location: String::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "monikad=info,monika=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        let settings = MockSettings::default();
        Self {
            devices: 1,
            device_type: DeviceType::GenericDummy,
            generic_modules: settings.generic_modules,
            iolets_per_module: settings.iolets_per_module,
            tick_secs: settings.tick_interval.as_secs(),
            reboot_secs: settings.reboot_delay.as_secs(),
        }
    }
}

impl Default for NetboxConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            token: String::new(),
            device_type: DeviceType::GenericDummy,
            device_type_id: 0,
            control_port: None,
            timeout_secs: 5,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
