//! Configuration loading and constants.
//!
//! The server needs no configuration at all: every field has a default that
//! reproduces the classic behavior (port 8080 on all interfaces, host name
//! resolved per request, text logs). An optional TOML file and a couple of
//! environment variables can override those defaults.

use const_format::formatcp;
use serde::Deserialize;
use std::path::Path;

// =============================================================================
// Listener
// =============================================================================

/// Interface the listener binds to by default (all interfaces)
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// Port the listener binds to by default
pub const DEFAULT_HTTP_PORT: u16 = 8080;

// =============================================================================
// Responses and log lines
// =============================================================================

/// Logged once at startup, before the listener is bound
pub const STARTUP_MESSAGE: &str = "hostname server starting ...";

/// Body returned when a request cannot be answered
pub const INTERNAL_ERROR_BODY: &str = "Internal server error";

/// Cache-Control for every response; a replica's identity must never be cached
pub const CACHE_CONTROL_NO_STORE: &str = "no-store";

// =============================================================================
// Environment and logging
// =============================================================================

/// Overrides `http.host` / `http.port` with a `host:port` pair
pub const ENV_LISTEN_ADDR: &str = "SERVICE_LISTEN_ADDR";

/// Overrides `whoami.healthy_count`
pub const ENV_HEALTHY_COUNT: &str = "SERVICE_HEALTHY_COUNT";

/// Tracing target of everything this crate logs
pub const LOG_TARGET: &str = "hostname_server";

/// Target of the fixed startup and per-request lines, which no filter hides
pub const ANNOUNCE_TARGET: &str = formatcp!("{}::announce", LOG_TARGET);

/// Directive appended to every filter so the announce lines stay on
pub const ANNOUNCE_DIRECTIVE: &str = formatcp!("{}=info", ANNOUNCE_TARGET);

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = formatcp!("{}=info", LOG_TARGET);

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Listener configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Response behavior
    #[serde(default)]
    pub whoami: WhoamiConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Problems found while loading that did not stop startup. Logged once
    /// tracing is up, since the log format itself comes from this config.
    #[serde(skip)]
    pub warnings: Vec<String>,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }

    /// `host:port` as handed to the listener. Host names are resolved at
    /// bind time; bare IPv6 literals get their brackets back.
    pub fn listen_addr(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// How the handler builds its response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WhoamiConfig {
    /// Resolve the host name once at startup instead of on every request
    #[serde(default)]
    pub cache_hostname: bool,
    /// Append the remote address and the sorted request headers to the body
    #[serde(default)]
    pub echo_request: bool,
    /// Number of requests answered before every response turns into a 500.
    /// `None` means the server never becomes unhealthy.
    #[serde(default)]
    pub healthy_count: Option<u64>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    /// Load configuration from an optional file, then apply environment overrides.
    ///
    /// A missing path means "all defaults"; a path that cannot be read is an error.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_toml(&std::fs::read_to_string(path)?)?,
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;

        if !matches!(config.logging.format.to_ascii_lowercase().as_str(), "text" | "json") {
            return Err(ConfigError::Validation(format!(
                "unknown logging.format {:?}, expected \"text\" or \"json\"",
                config.logging.format
            )));
        }

        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply `SERVICE_LISTEN_ADDR` and `SERVICE_HEALTHY_COUNT`.
    ///
    /// The listen address must be `host:port` with a numeric port; the host
    /// may be a name, an IP literal or empty. An unparsable healthy count is
    /// ignored with a warning, leaving the configured value in place.
    fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup(ENV_LISTEN_ADDR).filter(|v| !v.is_empty()) {
            let (host, port) = addr.rsplit_once(':').ok_or_else(|| {
                ConfigError::Validation(format!("invalid address {addr:?} to listen: missing port"))
            })?;
            let port = port.parse::<u16>().map_err(|e| {
                ConfigError::Validation(format!("invalid address {addr:?} to listen: {e}"))
            })?;
            let host = host.trim_start_matches('[').trim_end_matches(']');
            self.http.host = if host.is_empty() {
                DEFAULT_HTTP_HOST.to_string()
            } else {
                host.to_string()
            };
            self.http.port = port;
        }

        if let Some(count) = lookup(ENV_HEALTHY_COUNT) {
            match count.trim().parse::<i64>() {
                Ok(n) if n < 0 => self.whoami.healthy_count = None,
                Ok(n) => self.whoami.healthy_count = Some(n as u64),
                Err(_) => self.warnings.push(format!(
                    "ignoring unparsable {ENV_HEALTHY_COUNT}={count:?}"
                )),
            }
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
