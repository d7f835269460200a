//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Backend API configuration.
    pub api: ApiConfig,
    /// Session configuration (workspace and token).
    #[serde(default)]
    pub session: SessionConfig,
    /// Dashboard analytics configuration.
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

/// Backend API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the REST backend, e.g. `http://localhost:5000/api`.
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("dompet/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Session configuration.
///
/// Both values are passed explicitly to every backend call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    /// Workspace the session operates in.
    pub workspace_id: Option<i64>,
    /// Bearer token issued by the backend.
    pub token: Option<String>,
    /// Caller's role in the workspace (`Owner`, `Admin`, `Member`, `Viewer`).
    pub role: Option<String>,
}

/// Dashboard analytics configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsConfig {
    /// Page size for the paginated transaction fallback.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Number of categories kept before folding the rest into one bucket.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_per_page() -> u32 {
    200
}

fn default_top_n() -> usize {
    8
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            top_n: default_top_n(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("DOMPET").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
