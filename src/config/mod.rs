//! Configuration management
//!
//! This module handles loading and parsing configuration for StudySprint.
//! Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Static development signing secret, used only when `auth.session_secret`
/// is not configured. Explicitly insecure; production deployments must set
/// `STUDYSPRINT_AUTH_SESSION_SECRET`.
pub const DEV_SESSION_SECRET: &str = "dev-insecure-secret-change-me";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Admin identity and session configuration
    #[serde(default)]
    pub auth: AuthConfig,
    /// Upload configuration
    #[serde(default)]
    pub upload: UploadConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origin (for cookie-based auth)
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
    /// Mark session cookies as Secure (set in production behind TLS)
    #[serde(default)]
    pub secure_cookies: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
            secure_cookies: false,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database path (":memory:" for tests)
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "data/studysprint.db".to_string()
}

/// Admin identity and session configuration
///
/// The admin credential ladder: if `admin_password_hash` is set it wins
/// (Argon2id PHC string); otherwise the plaintext `admin_password` is
/// compared. Both defaults are non-production placeholders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Admin login email (compared case-insensitively)
    #[serde(default = "default_admin_email")]
    pub admin_email: String,
    /// Plaintext admin password (dev fallback)
    #[serde(default = "default_admin_password")]
    pub admin_password: String,
    /// Argon2id hash of the admin password; takes precedence when set
    #[serde(default)]
    pub admin_password_hash: Option<String>,
    /// HMAC signing secret for session tokens
    #[serde(default)]
    pub session_secret: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_email: default_admin_email(),
            admin_password: default_admin_password(),
            admin_password_hash: None,
            session_secret: None,
        }
    }
}

impl AuthConfig {
    /// Effective signing secret. Falls back to the static development
    /// secret when unset; callers should warn loudly in that case.
    pub fn session_secret(&self) -> &str {
        self.session_secret.as_deref().unwrap_or(DEV_SESSION_SECRET)
    }

    /// Whether the deployment is still running on the insecure fallback.
    pub fn uses_dev_secret(&self) -> bool {
        self.session_secret.is_none()
    }
}

fn default_admin_email() -> String {
    "admin@gmail.com".to_string()
}

fn default_admin_password() -> String {
    "password".to_string()
}

/// Upload configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Directory where uploaded files are stored
    #[serde(default = "default_upload_path")]
    pub path: PathBuf,
    /// Public URL prefix for stored files
    #[serde(default = "default_url_prefix")]
    pub url_prefix: String,
    /// Maximum file size in bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            path: default_upload_path(),
            url_prefix: default_url_prefix(),
            max_file_size: default_max_file_size(),
        }
    }
}

fn default_upload_path() -> PathBuf {
    PathBuf::from("data/uploads")
}

fn default_url_prefix() -> String {
    "/uploads".to_string()
}

fn default_max_file_size() -> u64 {
    25 * 1024 * 1024 // 25 MB
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: String, message: String },
}

impl Config {
    /// Load configuration from a YAML file.
    ///
    /// A missing or empty file yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides.
    ///
    /// Environment variables follow the pattern
    /// `STUDYSPRINT_<SECTION>_<FIELD>`, e.g. `STUDYSPRINT_SERVER_PORT`.
    pub fn load_with_env(path: &Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("STUDYSPRINT_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("STUDYSPRINT_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }
        if let Ok(cors_origin) = std::env::var("STUDYSPRINT_SERVER_CORS_ORIGIN") {
            self.server.cors_origin = cors_origin;
        }
        if let Ok(secure) = std::env::var("STUDYSPRINT_SERVER_SECURE_COOKIES") {
            self.server.secure_cookies = matches!(secure.as_str(), "1" | "true" | "yes");
        }

        if let Ok(url) = std::env::var("STUDYSPRINT_DATABASE_URL") {
            self.database.url = url;
        }

        if let Ok(email) = std::env::var("STUDYSPRINT_AUTH_ADMIN_EMAIL") {
            self.auth.admin_email = email;
        }
        if let Ok(password) = std::env::var("STUDYSPRINT_AUTH_ADMIN_PASSWORD") {
            self.auth.admin_password = password;
        }
        if let Ok(hash) = std::env::var("STUDYSPRINT_AUTH_ADMIN_PASSWORD_HASH") {
            self.auth.admin_password_hash = Some(hash);
        }
        if let Ok(secret) = std::env::var("STUDYSPRINT_AUTH_SESSION_SECRET") {
            self.auth.session_secret = Some(secret);
        }

        if let Ok(path) = std::env::var("STUDYSPRINT_UPLOAD_PATH") {
            self.upload.path = PathBuf::from(path);
        }
        if let Ok(prefix) = std::env::var("STUDYSPRINT_UPLOAD_URL_PREFIX") {
            self.upload.url_prefix = prefix;
        }
        if let Ok(size) = std::env::var("STUDYSPRINT_UPLOAD_MAX_FILE_SIZE") {
            if let Ok(size) = size.parse::<u64>() {
                self.upload.max_file_size = size;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = Config::load(Path::new("does-not-exist.yml")).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.url, "data/studysprint.db");
        assert!(config.auth.uses_dev_secret());
        assert_eq!(config.auth.session_secret(), DEV_SESSION_SECRET);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "server:\n  port: 9000\nauth:\n  admin_email: ops@example.com"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.auth.admin_email, "ops@example.com");
        assert_eq!(config.auth.admin_password, "password");
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server: [not, a, map").unwrap();
        assert!(Config::load(file.path()).is_err());
    }
}
