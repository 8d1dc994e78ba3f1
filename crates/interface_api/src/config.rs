//! API configuration

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use domain_claims::ClassifierKind;
use domain_policy::CoverageMatch;

/// API configuration
///
/// Every field can be set through an `API_`-prefixed environment variable,
/// e.g. `API_PORT=9000` or `API_SLACK_WEBHOOK_URL=https://hooks.slack.com/...`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level
    pub log_level: String,
    /// Externally visible base URL used in download links
    pub public_base_url: Option<String>,
    /// Directory for uploaded images
    pub upload_dir: PathBuf,
    /// Directory for rendered documents
    pub output_dir: PathBuf,
    /// Classification strategy: `random`, `keyword` or `model`
    pub classifier: ClassifierKind,
    /// Vision model endpoint, required for the `model` classifier
    pub vision_model_url: Option<String>,
    pub vision_timeout_secs: u64,
    /// JSON policy table; the built-in demo table is used when unset
    pub policy_table_path: Option<PathBuf>,
    /// `substring` or `exact`
    pub coverage_match: CoverageMatch,
    pub slack_webhook_url: Option<String>,
    /// Bounded wait for notification delivery
    pub notification_timeout_secs: u64,
    pub notifications_enabled: bool,
    /// Maximum request body size, uploads included
    pub max_upload_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            public_base_url: None,
            upload_dir: PathBuf::from("uploads"),
            output_dir: PathBuf::from("output"),
            classifier: ClassifierKind::RandomMock,
            vision_model_url: None,
            vision_timeout_secs: 30,
            policy_table_path: None,
            coverage_match: CoverageMatch::Substring,
            slack_webhook_url: None,
            notification_timeout_secs: 10,
            notifications_enabled: true,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Base URL for links handed back to clients, without a trailing slash
    pub fn base_url(&self) -> String {
        match &self.public_base_url {
            Some(url) if !url.trim().is_empty() => url.trim_end_matches('/').to_string(),
            _ => {
                let host = if self.host == "0.0.0.0" { "localhost" } else { self.host.as_str() };
                format!("http://{}:{}", host, self.port)
            }
        }
    }

    /// Download URL for documents stored under `key`
    pub fn document_url(&self, key: &str) -> String {
        format!("{}/api/claims/{}/pdf", self.base_url(), key)
    }

    pub fn notification_timeout(&self) -> Duration {
        Duration::from_secs(self.notification_timeout_secs)
    }

    pub fn vision_timeout(&self) -> Duration {
        Duration::from_secs(self.vision_timeout_secs)
    }
}
