//! Configuration management for the application.
//!
//! Settings are loaded once at startup into an [`AppConfig`] and handed to
//! every component that needs them. Nothing reads the environment afterwards.
//!
//! ## Example Configuration
//!
//! ```toml
//! [server]
//! port = 8000
//!
//! [database]
//! url = "mongodb://localhost:27017"
//! name = "foodhub"
//!
//! [auth]
//! jwt_secret = "change-me-to-a-long-random-string-of-32+"
//!
//! [storage]
//! remote_provider = "s3"
//!
//! [storage.s3]
//! bucket = "foodhub-uploads"
//! region = "us-east-1"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (e.g., "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Maximum JSON body size in bytes
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    /// Allowed CORS origins; `*` allows any
    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    /// Serve the OpenAPI document and Swagger UI
    #[serde(default = "default_true")]
    pub enable_swagger: bool,
}

/// MongoDB configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection string
    pub url: String,

    /// Database name
    #[serde(default = "default_db_name")]
    pub name: String,

    /// Minimum connection pool size
    #[serde(default)]
    pub min_pool_size: u32,

    /// Maximum connection pool size
    #[serde(default = "default_pool_size")]
    pub max_pool_size: u32,

    /// Connection and server selection timeout in seconds
    #[serde(default = "default_db_timeout")]
    pub connect_timeout_seconds: u64,
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign bearer tokens
    pub jwt_secret: String,

    /// Token lifetime in seconds
    #[serde(default = "default_token_expiry")]
    pub token_expiry_seconds: u64,

    /// Key expected in the `x-admin-key` header; admin routes are closed when unset
    #[serde(default)]
    pub admin_api_key: Option<String>,
}

/// Where remotely hosted uploads go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RemoteStorageProvider {
    /// AWS S3 or an S3-compatible service (MinIO, etc.)
    S3,
    /// Local filesystem (development only)
    #[default]
    Local,
}

/// Image storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for locally stored images, served under `/images`
    #[serde(default = "default_images_dir")]
    pub images_dir: String,

    /// Largest accepted upload in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Accepted file extensions, lowercase
    #[serde(default = "default_allowed_formats")]
    pub allowed_formats: Vec<String>,

    /// Backend for `/upload`
    #[serde(default)]
    pub remote_provider: RemoteStorageProvider,

    /// Required when `remote_provider` is `s3`
    #[serde(default)]
    pub s3: Option<S3Config>,
}

/// S3 configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    /// S3 bucket name
    pub bucket: String,

    /// AWS region
    pub region: String,

    /// Custom S3 endpoint (for S3-compatible services)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Key prefix for uploaded objects
    #[serde(default = "default_s3_prefix")]
    pub path_prefix: String,

    /// Base URL used to build public object URLs; derived from the bucket when unset
    #[serde(default)]
    pub public_base_url: Option<String>,

    /// Use path-style addressing (required by most S3-compatible servers)
    #[serde(default)]
    pub force_path_style: bool,
}

/// Login rate limiting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests allowed per window per client
    #[serde(default = "default_login_max_requests")]
    pub login_max_requests: u32,

    /// Window length in seconds
    #[serde(default = "default_login_window")]
    pub login_window_seconds: u64,
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Service name reported in logs
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Enable JSON logging format
    #[serde(default)]
    pub json_logging: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_body_size() -> usize {
    1024 * 1024
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_db_name() -> String {
    "foodhub".to_string()
}

fn default_pool_size() -> u32 {
    10
}

fn default_db_timeout() -> u64 {
    10
}

fn default_token_expiry() -> u64 {
    86400
}

fn default_images_dir() -> String {
    "images".to_string()
}

fn default_max_upload_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_allowed_formats() -> Vec<String> {
    ["jpg", "png", "jpeg", "gif"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_s3_prefix() -> String {
    "uploads".to_string()
}

fn default_login_max_requests() -> u32 {
    5
}

fn default_login_window() -> u64 {
    120
}

fn default_service_name() -> String {
    "foodhub".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
            max_body_size: default_max_body_size(),
            cors_allowed_origins: default_cors_origins(),
            enable_swagger: true,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            images_dir: default_images_dir(),
            max_upload_bytes: default_max_upload_bytes(),
            allowed_formats: default_allowed_formats(),
            remote_provider: RemoteStorageProvider::Local,
            s3: None,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            login_max_requests: default_login_max_requests(),
            login_window_seconds: default_login_window(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            json_logging: false,
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Load configuration from configuration files and environment variables.
    ///
    /// Later sources override earlier ones:
    /// 1. Default values
    /// 2. `config/default.toml` (if exists)
    /// 3. `config/{environment}.toml` (if exists, where environment is from APP_ENV)
    /// 4. Environment variables prefixed with `APP_`, e.g. `APP_DATABASE__URL`
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use foodhub_common::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load configuration");
    /// println!("Server will run on {}", config.server_address());
    /// ```
    pub fn load() -> Result<Self> {
        Self::load_from("config")
    }

    /// Same as [`AppConfig::load`] with a custom configuration directory
    pub fn load_from(config_dir: &str) -> Result<Self> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{}/default", config_dir)).required(false))
            .add_source(
                config::File::with_name(&format!("{}/{}", config_dir, env)).required(false),
            )
            // Example: APP_SERVER__PORT=3000
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_allowed_origins")
                    .with_list_parse_key("storage.allowed_formats")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be greater than 0");
        }

        if self.server.request_timeout_seconds == 0 {
            anyhow::bail!("Request timeout must be greater than 0");
        }

        if self.database.url.is_empty() {
            anyhow::bail!("Database URL is required");
        }

        if self.database.name.is_empty() {
            anyhow::bail!("Database name is required");
        }

        if self.database.max_pool_size == 0 {
            anyhow::bail!("Database pool size must be greater than 0");
        }

        if self.auth.jwt_secret.is_empty() {
            anyhow::bail!("JWT secret is required");
        }

        if self.auth.jwt_secret.len() < 32 {
            anyhow::bail!("JWT secret must be at least 32 characters long");
        }

        if self.auth.token_expiry_seconds == 0 {
            anyhow::bail!("Token expiry must be greater than 0");
        }

        if matches!(&self.auth.admin_api_key, Some(key) if key.len() < 16) {
            anyhow::bail!("Admin API key must be at least 16 characters long");
        }

        if self.storage.max_upload_bytes == 0 {
            anyhow::bail!("Maximum upload size must be greater than 0");
        }

        if self.storage.allowed_formats.is_empty() {
            anyhow::bail!("At least one upload format must be allowed");
        }

        if self.storage.remote_provider == RemoteStorageProvider::S3 {
            match &self.storage.s3 {
                Some(s3) if !s3.bucket.is_empty() && !s3.region.is_empty() => {}
                _ => anyhow::bail!("S3 bucket and region are required for the s3 provider"),
            }
        }

        if self.rate_limit.login_max_requests == 0 {
            anyhow::bail!("Login rate limit must allow at least one request");
        }

        if self.rate_limit.login_window_seconds == 0 {
            anyhow::bail!("Login rate limit window must be greater than 0");
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.telemetry.log_level.as_str()) {
            anyhow::bail!(
                "Invalid log level '{}'. Must be one of: {}",
                self.telemetry.log_level,
                valid_log_levels.join(", ")
            );
        }

        Ok(())
    }

    /// `host:port` to bind the HTTP listener to
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_seconds)
    }

    /// Get the database connection timeout as a Duration
    pub fn database_timeout(&self) -> Duration {
        Duration::from_secs(self.database.connect_timeout_seconds)
    }

    /// Get the token expiry as a Duration
    pub fn token_expiry(&self) -> Duration {
        Duration::from_secs(self.auth.token_expiry_seconds)
    }

    /// Get the login rate limit window as a Duration
    pub fn login_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit.login_window_seconds)
    }

    /// Create a development configuration with sensible defaults
    pub fn development() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                ..ServerConfig::default()
            },
            database: DatabaseConfig {
                url: "mongodb://localhost:27017".to_string(),
                name: "foodhub_dev".to_string(),
                min_pool_size: 0,
                max_pool_size: 5,
                connect_timeout_seconds: 5,
            },
            auth: AuthConfig {
                jwt_secret: "development-secret-key-minimum-32-chars".to_string(),
                token_expiry_seconds: 86400,
                admin_api_key: Some("development-admin-key".to_string()),
            },
            storage: StorageConfig::default(),
            rate_limit: RateLimitConfig::default(),
            telemetry: TelemetryConfig {
                service_name: "foodhub-dev".to_string(),
                json_logging: false,
                log_level: "debug".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_config_is_valid() {
        assert!(AppConfig::development().validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::development();

        config.server.port = 0;
        assert!(config.validate().is_err());
        config.server.port = 8000;

        config.auth.jwt_secret = "short".to_string();
        assert!(config.validate().is_err());
        config.auth.jwt_secret = "a".repeat(32);

        config.telemetry.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
        config.telemetry.log_level = "info".to_string();

        config.auth.admin_api_key = Some("tiny".to_string());
        assert!(config.validate().is_err());
        config.auth.admin_api_key = None;

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_s3_provider_requires_bucket() {
        let mut config = AppConfig::development();
        config.storage.remote_provider = RemoteStorageProvider::S3;
        assert!(config.validate().is_err());

        config.storage.s3 = Some(S3Config {
            bucket: "uploads".to_string(),
            region: "us-east-1".to_string(),
            endpoint: None,
            path_prefix: default_s3_prefix(),
            public_base_url: None,
            force_path_style: false,
        });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_storage_defaults() {
        let storage = StorageConfig::default();
        assert_eq!(storage.images_dir, "images");
        assert_eq!(storage.max_upload_bytes, 5 * 1024 * 1024);
        assert_eq!(storage.allowed_formats, vec!["jpg", "png", "jpeg", "gif"]);
    }

    #[test]
    fn test_minimal_document_deserializes_with_defaults() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "database": { "url": "mongodb://db:27017" },
            "auth": { "jwt_secret": "x".repeat(40) }
        }))
        .unwrap();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.database.name, "foodhub");
        assert_eq!(config.rate_limit.login_max_requests, 5);
        assert_eq!(config.login_window(), Duration::from_secs(120));
        assert!(config.auth.admin_api_key.is_none());
        assert!(config.validate().is_ok());
    }
}
