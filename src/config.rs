//! Configuration
//!
//! `HubConfig` holds the fixed limits and timings of the connection hub.
//! `ServerConfig` is read from the environment at startup.

use std::time::Duration;

use crate::error::ConfigError;

/// Largest inbound application frame accepted, in bytes
pub const MAX_FRAME_SIZE: usize = 512;

/// Pending outbound payloads buffered per connection
pub const OUTBOUND_QUEUE_CAPACITY: usize = 256;

/// Time allowed between pongs before the read path gives up
pub const READ_DEADLINE: Duration = Duration::from_secs(60);

/// Time allowed for a single frame write
pub const WRITE_DEADLINE: Duration = Duration::from_secs(10);

/// Interval between keepalive pings; must be shorter than `READ_DEADLINE`
pub const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(54);

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8100;

/// Limits and timings applied to every connection
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HubConfig {
    pub max_frame_size: usize,
    pub queue_capacity: usize,
    pub read_deadline: Duration,
    pub write_deadline: Duration,
    pub keepalive_interval: Duration,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            max_frame_size: MAX_FRAME_SIZE,
            queue_capacity: OUTBOUND_QUEUE_CAPACITY,
            read_deadline: READ_DEADLINE,
            write_deadline: WRITE_DEADLINE,
            keepalive_interval: KEEPALIVE_INTERVAL,
        }
    }
}

/// Log output format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Process-level settings for the HTTP service
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    /// Allowed CORS origins; empty means any origin
    pub cors_origins: Vec<String>,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            cors_origins: Vec::new(),
            log_format: LogFormat::Text,
        }
    }
}

impl ServerConfig {
    /// Read `BIND_ADDR`, `PORT`, `CORS_ORIGINS` and `LOG_FORMAT`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup("BIND_ADDR").filter(|v| !v.trim().is_empty()) {
            config.bind_addr = addr.trim().to_string();
        }

        if let Some(port) = lookup("PORT").filter(|v| !v.trim().is_empty()) {
            config.port = port.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    var: "PORT",
                    value: port.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        if let Some(origins) = lookup("CORS_ORIGINS") {
            config.cors_origins = parse_origins(&origins);
        }

        if let Some(format) = lookup("LOG_FORMAT") {
            config.log_format = match format.trim().to_ascii_lowercase().as_str() {
                "" | "text" | "pretty" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "LOG_FORMAT",
                        value: format,
                        reason: "expected `text` or `json`".to_string(),
                    })
                }
            };
        }

        Ok(config)
    }

    /// Address string for the listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

/// Split a comma separated origin list; `*` means any origin
fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();

    if origins.iter().any(|o| o == "*") {
        Vec::new()
    } else {
        origins
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_hub_defaults() {
        let config = HubConfig::default();
        assert_eq!(config.max_frame_size, 512);
        assert_eq!(config.queue_capacity, 256);
        assert_eq!(config.read_deadline, Duration::from_secs(60));
        assert_eq!(config.write_deadline, Duration::from_secs(10));
        assert_eq!(config.keepalive_interval, Duration::from_secs(54));
        assert!(config.keepalive_interval < config.read_deadline);
    }

    #[test]
    fn test_server_defaults_when_env_empty() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.listen_addr(), "0.0.0.0:8100");
    }

    #[test]
    fn test_server_config_from_vars() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("PORT", "9000"),
            ("BIND_ADDR", "127.0.0.1"),
            ("CORS_ORIGINS", "http://a.test, http://b.test,"),
            ("LOG_FORMAT", "JSON"),
        ]))
        .unwrap();

        assert_eq!(config.listen_addr(), "127.0.0.1:9000");
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_wildcard_origin_means_any() {
        let config =
            ServerConfig::from_lookup(lookup(&[("CORS_ORIGINS", "http://a.test,*")])).unwrap();
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn test_invalid_port_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "PORT", .. }));
    }

    #[test]
    fn test_invalid_log_format_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[("LOG_FORMAT", "xml")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "LOG_FORMAT", .. }));
    }
}
