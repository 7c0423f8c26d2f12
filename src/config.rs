use serde::Deserialize;
use url::Url;

use crate::astarte::{DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT};

/// Environment variable that overrides `astarte.token`.
pub const TOKEN_ENV: &str = "ASTARTE_TOKEN";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub astarte: AstarteConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Clone, Deserialize)]
pub struct AstarteConfig {
    pub api_url: String,
    pub realm: String,
    #[serde(default)]
    pub token: String,
    /// Individual AppEngine URL (e.g. a local installation on port 4002).
    #[serde(default)]
    pub appengine_url: Option<String>,
    #[serde(default)]
    pub realm_management_url: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for AstarteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AstarteConfig")
            .field("api_url", &self.api_url)
            .field("realm", &self.realm)
            .field("token", &"<redacted>")
            .field("appengine_url", &self.appengine_url)
            .field("realm_management_url", &self.realm_management_url)
            .field("page_size", &self.page_size)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl AppConfig {
    /// Loads `$CONFIG_FILE` (default `config.toml`); `$ASTARTE_TOKEN` overrides the token.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let token = std::env::var(TOKEN_ENV).ok();
        Self::load_from_path(&path, token)
    }

    pub fn load_from_path(path: &str, token_override: Option<String>) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading config {}: {}", path, e))?;
        let mut config: AppConfig = toml::from_str(&s)?;
        if let Some(token) = token_override.filter(|t| !t.is_empty()) {
            config.astarte.token = token;
        }
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(!self.server.host.is_empty(), "server.host must be non-empty");
        validate_http_url("astarte.api_url", &self.astarte.api_url)?;
        if let Some(url) = &self.astarte.appengine_url {
            validate_http_url("astarte.appengine_url", url)?;
        }
        if let Some(url) = &self.astarte.realm_management_url {
            validate_http_url("astarte.realm_management_url", url)?;
        }
        anyhow::ensure!(
            !self.astarte.realm.is_empty(),
            "astarte.realm must be non-empty"
        );
        anyhow::ensure!(
            !self.astarte.token.is_empty(),
            "astarte.token must be non-empty (set it in the file or via {})",
            TOKEN_ENV
        );
        anyhow::ensure!(
            self.astarte.page_size > 0,
            "astarte.page_size must be > 0, got {}",
            self.astarte.page_size
        );
        anyhow::ensure!(
            self.astarte.timeout_secs > 0,
            "astarte.timeout_secs must be > 0, got {}",
            self.astarte.timeout_secs
        );
        Ok(())
    }
}

fn validate_http_url(key: &str, value: &str) -> anyhow::Result<()> {
    let url = Url::parse(value).map_err(|e| anyhow::anyhow!("{} is not a valid URL: {}", key, e))?;
    anyhow::ensure!(
        matches!(url.scheme(), "http" | "https"),
        "{} must be an http(s) URL, got {}",
        key,
        value
    );
    Ok(())
}
