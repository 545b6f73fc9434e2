use serde::Deserialize;
use std::fs;
use std::time::Duration;
use tracing::info;

use crate::constants::{llm, server};
use crate::error::ConfigError;
use crate::llm::tools::MarketDataTools;
use crate::services::dispatcher::StreamErrorPolicy;

#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub stream_error_policy: StreamErrorPolicy,
    /// Deadline for collecting the whole response. Unset means wait forever.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: default_model(),
            stream_error_policy: StreamErrorPolicy::default(),
            request_timeout_secs: None,
        }
    }
}

impl LlmConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Cross-origin allow-list. `"*"` stands for any origin.
#[derive(Clone, Debug, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_origins")]
    pub origins: Vec<String>,
    #[serde(default)]
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: default_origins(),
            allow_credentials: false,
        }
    }
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.origins.iter().any(|o| o.trim() == "*")
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub tools: MarketDataTools,
    #[serde(default)]
    pub cors: CorsConfig,
}

fn default_bind_addr() -> String {
    server::DEFAULT_BIND_ADDR.to_string()
}

fn default_model() -> String {
    llm::DEFAULT_MODEL.to_string()
}

fn default_origins() -> Vec<String> {
    vec!["*".to_string()]
}

impl AppConfig {
    /// Load `config.yaml` (or `$STOCK_ANALYST_CONFIG`), then apply env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(server::CONFIG_PATH_ENV)
            .unwrap_or_else(|_| server::DEFAULT_CONFIG_PATH.to_string());

        let mut config = match fs::read_to_string(&path) {
            Ok(content) => Self::from_yaml(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("ℹ️ {} not found - using built-in defaults", path);
                Self::default()
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // Strip BOM if present
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Environment wins over the file. `lookup` is injectable for tests.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("OPENAI_API_KEY").filter(|v| !v.is_empty()) {
            self.llm.api_key = Some(key);
        }
        if let Some(url) = lookup("OPENAI_BASE_URL").filter(|v| !v.is_empty()) {
            self.llm.base_url = Some(url);
        }
        if let Some(model) = lookup("LLM_MODEL").filter(|v| !v.is_empty()) {
            self.llm.model = model;
        }
        if let Some(addr) = lookup("BIND_ADDR").filter(|v| !v.is_empty()) {
            self.server.bind_addr = addr;
        }
        if let Some(origins) = lookup("CORS_ORIGINS") {
            let origins: Vec<String> = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
            if !origins.is_empty() {
                self.cors.origins = origins;
            }
        }
        if let Some(flag) = lookup("CORS_ALLOW_CREDENTIALS") {
            self.cors.allow_credentials = matches!(
                flag.trim().to_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::Invalid("llm.model must not be empty".into()));
        }
        if self.cors.origins.is_empty() {
            return Err(ConfigError::Invalid(
                "cors.origins must list at least one origin".into(),
            ));
        }
        if self.cors.allow_credentials && self.cors.allows_any_origin() {
            return Err(ConfigError::Invalid(
                "cors.allow_credentials cannot be combined with the \"*\" origin".into(),
            ));
        }
        match self.llm.request_timeout_secs {
            Some(0) => {
                return Err(ConfigError::Invalid(
                    "llm.request_timeout_secs must be greater than zero".into(),
                ));
            }
            Some(secs) if secs > llm::MAX_REQUEST_TIMEOUT_SECS => {
                return Err(ConfigError::Invalid(format!(
                    "llm.request_timeout_secs must not exceed {}",
                    llm::MAX_REQUEST_TIMEOUT_SECS
                )));
            }
            _ => {}
        }
        Ok(())
    }
}
