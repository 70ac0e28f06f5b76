//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

/// Where per-client sessions live
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackendKind {
    /// Lost on restart
    Memory,
    /// One JSON document per client under `data_dir/sessions`
    File,
}

impl std::str::FromStr for SessionBackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(SessionBackendKind::Memory),
            "file" => Ok(SessionBackendKind::File),
            other => Err(ConfigError::Invalid(format!(
                "unknown session backend '{}', expected memory or file",
                other
            ))),
        }
    }
}

/// Session handling configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_backend")]
    pub backend: SessionBackendKind,

    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    #[serde(default = "default_logout_delay")]
    pub logout_delay_ms: u64,
}

fn default_backend() -> SessionBackendKind {
    SessionBackendKind::Memory
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("community-platform").to_string_lossy().to_string())
        .unwrap_or_else(|| "./community_data".to_string())
}

fn default_cookie_name() -> String {
    "cp_session".to_string()
}

fn default_logout_delay() -> u64 {
    1000
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            data_dir: default_data_dir(),
            cookie_name: default_cookie_name(),
            logout_delay_ms: default_logout_delay(),
        }
    }
}

impl SessionConfig {
    /// Data directory with a leading `~/` expanded
    pub fn data_path(&self) -> PathBuf {
        match (self.data_dir.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(&self.data_dir),
        }
    }

    /// Directory holding per-client session documents
    pub fn sessions_dir(&self) -> PathBuf {
        self.data_path().join("sessions")
    }

    /// Session document used by the CLI
    pub fn cli_session_path(&self) -> PathBuf {
        self.data_path().join("cli_session.json")
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Invalid(error) => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("community-platform").join("config.toml")),
            Some(PathBuf::from("/etc/community-platform/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Server overrides
        if let Ok(host) = std::env::var("COMMUNITY_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("COMMUNITY_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }

        // Session overrides
        if let Ok(backend) = std::env::var("COMMUNITY_SESSION_BACKEND") {
            match backend.parse() {
                Ok(kind) => self.session.backend = kind,
                Err(e) => tracing::warn!("Ignoring COMMUNITY_SESSION_BACKEND: {}", e),
            }
        }
        if let Ok(data_dir) = std::env::var("COMMUNITY_DATA_DIR") {
            self.session.data_dir = data_dir;
        }

        // Logging overrides
        if let Ok(level) = std::env::var("COMMUNITY_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("COMMUNITY_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Community Platform Configuration
#
# Environment variables override these settings:
# - COMMUNITY_HOST
# - COMMUNITY_PORT
# - COMMUNITY_SESSION_BACKEND
# - COMMUNITY_DATA_DIR
# - COMMUNITY_LOG_LEVEL
# - COMMUNITY_LOG_FORMAT

[server]
# Server host
host = "0.0.0.0"

# Server port
port = 8080

# Allowed CORS origins (empty = same origin only)
cors_origins = []

[session]
# Session backend: memory (lost on restart) or file
backend = "memory"

# Directory for session documents (file backend and CLI)
data_dir = "~/.local/share/community-platform"

# Cookie carrying the client's session token
cookie_name = "cp_session"

# Delay before the logout page forwards to /login (ms)
logout_delay_ms = 1000

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/community-platform/server.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.session.backend, SessionBackendKind::Memory);
        assert_eq!(config.session.cookie_name, "cp_session");
        assert_eq!(config.session.logout_delay_ms, 1000);
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.session.backend, SessionBackendKind::Memory);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(
            r#"
            [session]
            backend = "file"
            data_dir = "/tmp/cp"
            "#,
        )
        .unwrap();

        assert_eq!(config.session.backend, SessionBackendKind::File);
        assert_eq!(config.session.sessions_dir(), PathBuf::from("/tmp/cp/sessions"));
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_invalid_backend() {
        let err = Config::parse("[session]\nbackend = \"redis\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!("redis".parse::<SessionBackendKind>().is_err());
        assert_eq!(
            "FILE".parse::<SessionBackendKind>().unwrap(),
            SessionBackendKind::File
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 9000\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.server.port, 9000);
    }
}
