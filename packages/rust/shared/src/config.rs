//! Application configuration for sitekb.
//!
//! User config lives at `~/.sitekb/sitekb.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SiteKbError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "sitekb.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".sitekb";

// ---------------------------------------------------------------------------
// Config structs (matching sitekb.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Crawl scope policies.
    #[serde(default)]
    pub crawl_policies: CrawlPoliciesConfig,

    /// Snapshot storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Site to crawl when the CLI is not given a URL.
    #[serde(default)]
    pub site_url: Option<String>,

    /// Maximum crawl depth from the seed URL.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// Politeness delay between consecutive fetches, in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Maximum number of URLs visited per build.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            site_url: None,
            max_depth: default_max_depth(),
            delay_ms: default_delay_ms(),
            max_pages: default_max_pages(),
        }
    }
}

fn default_max_depth() -> u32 {
    3
}
fn default_delay_ms() -> u64 {
    1000
}
fn default_max_pages() -> usize {
    100
}

/// `[crawl_policies]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlPoliciesConfig {
    /// URL include patterns (regex). Empty means "same domain as the seed".
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// URL exclude patterns (regex).
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

impl Default for CrawlPoliciesConfig {
    fn default() -> Self {
        Self {
            include_patterns: Vec::new(),
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

/// Binary file extensions that are never worth fetching.
fn default_exclude_patterns() -> Vec<String> {
    [r"\.pdf$", r"\.zip$", r"\.jpg$", r"\.png$", r"\.gif$"]
        .map(String::from)
        .to_vec()
}

/// `[storage]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for knowledge-base snapshots. Defaults to `<config dir>/snapshots`.
    #[serde(default)]
    pub snapshot_dir: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Crawl options (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime crawl options — merged from defaults, config file, and CLI flags.
///
/// Callers override individual fields with struct-update syntax over
/// [`CrawlOptions::default`].
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Maximum crawl depth from the seed URL (seed is depth 0).
    pub max_depth: u32,
    /// Politeness delay applied before every fetch.
    pub delay_between_requests: Duration,
    /// URL include patterns (regex). Empty means "same domain as the seed".
    pub include_patterns: Vec<String>,
    /// URL exclude patterns (regex).
    pub exclude_patterns: Vec<String>,
    /// Maximum number of URLs visited per build; filtered and failed URLs
    /// count against this quota too.
    pub max_pages: usize,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            delay_between_requests: Duration::from_millis(default_delay_ms()),
            include_patterns: Vec::new(),
            exclude_patterns: default_exclude_patterns(),
            max_pages: default_max_pages(),
        }
    }
}

impl From<&AppConfig> for CrawlOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_depth: config.defaults.max_depth,
            delay_between_requests: Duration::from_millis(config.defaults.delay_ms),
            include_patterns: config.crawl_policies.include_patterns.clone(),
            exclude_patterns: config.crawl_policies.exclude_patterns.clone(),
            max_pages: config.defaults.max_pages,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.sitekb/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SiteKbError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.sitekb/sitekb.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Resolve the snapshot directory: configured value or `<config dir>/snapshots`.
pub fn snapshot_dir(config: &AppConfig) -> Result<PathBuf> {
    match &config.storage.snapshot_dir {
        Some(dir) => Ok(dir.clone()),
        None => Ok(config_dir()?.join("snapshots")),
    }
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SiteKbError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| SiteKbError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| SiteKbError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| SiteKbError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| SiteKbError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
