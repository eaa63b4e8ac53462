use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub contact: ContactConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Upper bound for request bodies. Gallery uploads carry whole images.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_max_body_bytes() -> usize {
    16 * 1024 * 1024 // 16MB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: default_max_body_bytes(),
            log_dir: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackendType {
    #[default]
    Rest,
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackendType,

    /// Base URL of the hosted store, e.g. `https://xyz.supabase.co`.
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: PathBuf,

    #[serde(default = "default_store_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_sqlite_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("folio")
        .join("folio.db")
}

fn default_store_timeout_secs() -> u64 {
    15
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackendType::default(),
            url: String::new(),
            api_key: String::new(),
            sqlite_path: default_sqlite_path(),
            timeout_secs: default_store_timeout_secs(),
        }
    }
}

impl StoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Credentials from `FOLIO_STORE_URL` / `FOLIO_STORE_KEY` win over the file.
    /// Missing values stay empty; the hosted store rejects them at request time.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("FOLIO_STORE_URL") {
            self.url = url;
        }
        if let Ok(key) = std::env::var("FOLIO_STORE_KEY") {
            self.api_key = key;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_site_name")]
    pub name: String,

    #[serde(default = "default_tagline")]
    pub tagline: String,

    /// Number of projects featured on the home page.
    #[serde(default = "default_featured_projects")]
    pub featured_projects: usize,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub linkedin: String,

    #[serde(default)]
    pub github: String,
}

fn default_site_name() -> String {
    "Cellia".to_string()
}

fn default_tagline() -> String {
    "Engineering Project Management Professional | BIM Specialist".to_string()
}

fn default_featured_projects() -> usize {
    3
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            tagline: default_tagline(),
            featured_projects: default_featured_projects(),
            email: String::new(),
            phone: String::new(),
            location: String::new(),
            linkedin: String::new(),
            github: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactConfig {
    /// Where `folio-cli contact` posts submissions.
    #[serde(default = "default_contact_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_contact_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_contact_endpoint() -> String {
    "http://127.0.0.1:3000/api/contact".to_string()
}

fn default_contact_timeout_secs() -> u64 {
    20
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            endpoint: default_contact_endpoint(),
            timeout_secs: default_contact_timeout_secs(),
        }
    }
}

impl ContactConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            store: StoreConfig::default(),
            site: SiteConfig::default(),
            contact: ContactConfig::default(),
        }
    }
}

impl Config {
    /// Load from `FOLIO_CONFIG` or the default location, writing defaults on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let mut config = Config::default();
            config.save_to(&config_path)?;
            config.store.apply_env();
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.store.apply_env();
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("folio")
    }

    fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("FOLIO_CONFIG") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }
}
