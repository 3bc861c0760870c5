use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

pub const DEFAULT_TABLE: &str = "Freelancers";
pub const DEFAULT_API_URL: &str = "https://api.airtable.com/v0";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub airtable: AirtableConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: None }
    }
}

/// Remote tabular store settings. The backend is only enabled when both
/// `token` and `base_id` are non-empty.
#[derive(Debug, Clone, Deserialize)]
pub struct AirtableConfig {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub base_id: String,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for AirtableConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            base_id: String::new(),
            table: default_table(),
            api_url: default_api_url(),
            page_size: default_page_size(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8081 }
fn default_table() -> String { DEFAULT_TABLE.into() }
fn default_api_url() -> String { DEFAULT_API_URL.into() }
fn default_page_size() -> u32 { 50 }
fn default_request_timeout() -> u64 { 30 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if !std::path::Path::new(&path).exists() {
        return Ok(AppConfig::default());
    }
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), overlay the process environment
    /// and validate. Read once at startup.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.overlay_env(|key| std::env::var(key).ok());
        self.server.normalize()?;
        self.airtable.validate()?;
        Ok(())
    }

    /// Apply environment overrides using the given lookup.
    pub fn overlay_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.server.port = port;
        }
        if let Some(w) = lookup("TOKIO_WORKER_THREADS").and_then(|v| v.parse::<usize>().ok()) {
            self.server.worker_threads = Some(w);
        }

        if let Some(token) = lookup("AIRTABLE_TOKEN").or_else(|| lookup("AIRTABLE_API_KEY")) {
            self.airtable.token = token;
        }
        if let Some(base_id) = lookup("AIRTABLE_BASE_ID") {
            self.airtable.base_id = base_id;
        }
        if let Some(table) = lookup("AIRTABLE_TABLE") {
            self.airtable.table = table;
        }
        if let Some(api_url) = lookup("AIRTABLE_API_URL") {
            self.airtable.api_url = api_url;
        }
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        if self.worker_threads == Some(0) {
            self.worker_threads = None;
        }
        Ok(())
    }
}

impl AirtableConfig {
    /// Both a token and a base id are required to talk to the remote service.
    pub fn is_enabled(&self) -> bool {
        !self.token.trim().is_empty() && !self.base_id.trim().is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        if self.table.trim().is_empty() {
            return Err(anyhow!("airtable.table must not be empty"));
        }
        let lower = self.api_url.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("airtable.api_url must start with http:// or https://"));
        }
        if self.page_size == 0 || self.page_size > 100 {
            return Err(anyhow!("airtable.page_size must be within 1..=100"));
        }
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("airtable.request_timeout_secs must be positive"));
        }
        Ok(())
    }
}
