use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub providers: ProviderConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

/// Upstream provider settings. Credentials are optional: a missing key
/// disables the matching feature instead of failing requests.
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    #[serde(default)]
    pub helius_api_key: Option<String>,
    #[serde(default)]
    pub holderscan_api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 3000 }
fn default_static_dir() -> String { "./public".to_string() }
fn default_timeout_secs() -> u64 { 10 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            helius_api_key: None,
            holderscan_api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Loads `config.toml` when present, then applies environment overrides.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = Self::from_file(Path::new("config.toml"))?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config: Config = toml::from_str(content)?;
        config.providers.helius_api_key = non_empty(config.providers.helius_api_key);
        config.providers.holderscan_api_key = non_empty(config.providers.holderscan_api_key);
        Ok(config)
    }

    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = non_empty(lookup("HELIUS_API_KEY")) {
            self.providers.helius_api_key = Some(key);
        }
        if let Some(key) = non_empty(lookup("HOLDERSCAN_API_KEY")) {
            self.providers.holderscan_api_key = Some(key);
        }
        if let Some(port) = lookup("PORT").and_then(|p| p.trim().parse::<u16>().ok()) {
            self.server.port = port;
        }
        if let Some(host) = non_empty(lookup("HOST")) {
            self.server.host = host;
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
