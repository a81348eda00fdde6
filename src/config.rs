//! Configuration management for cinescrape.
//!
//! Settings are an explicit structure passed into the data-load and scrape
//! operations at construction time; nothing reads configuration from global
//! state. A config file (TOML or JSON) can override the defaults, and
//! `DATABASE_URL` takes highest precedence for the database location.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::repository::AsyncSqlitePool;

/// Default database filename.
pub const DEFAULT_DATABASE_FILENAME: &str = "cinescrape.db";

/// Genre tags scraped when neither the command line nor the config file
/// names any.
pub const DEFAULT_GENRES: [&str; 5] = ["fantasy", "adventure", "family", "biography", "animation"];

fn default_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("static date must be valid")
}

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base data directory.
    pub data_dir: PathBuf,
    /// Database filename.
    pub database_filename: String,
    /// Database URL (overrides data_dir/database_filename if set).
    pub database_url: Option<String>,
    /// User agent for HTTP requests.
    pub user_agent: String,
    /// Request timeout in seconds.
    pub request_timeout: u64,
    /// Settle delay between listing pages in milliseconds.
    pub page_settle_ms: u64,
    /// Base URL of the upstream listing.
    pub listing_base_url: String,
    /// Genre tags to scrape by default.
    pub genres: Vec<String>,
    /// Inclusive start of the release-date range.
    pub date_from: NaiveDate,
    /// Inclusive end of the release-date range.
    pub date_to: NaiveDate,
}

impl Default for Settings {
    fn default() -> Self {
        // Default to ~/Documents/cinescrape/ for user data
        // Falls back gracefully: Documents dir -> Home dir -> Current dir
        let data_dir = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cinescrape");

        Self {
            data_dir,
            database_filename: DEFAULT_DATABASE_FILENAME.to_string(),
            database_url: None,
            user_agent: "cinescrape/0.3 (research)".to_string(),
            request_timeout: 30,
            page_settle_ms: 3000,
            listing_base_url: "https://www.imdb.com".to_string(),
            genres: DEFAULT_GENRES.iter().map(|g| g.to_string()).collect(),
            date_from: default_date(2024, 1, 1),
            date_to: default_date(2024, 12, 31),
        }
    }
}

impl Settings {
    /// Get the database URL, constructing from path if not explicitly set.
    pub fn database_url(&self) -> String {
        if let Some(ref url) = self.database_url {
            url.clone()
        } else {
            format!("sqlite:{}", self.database_path().display())
        }
    }

    /// Get the full path to the database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_filename)
    }

    /// Check if the database appears to be initialized.
    pub fn database_exists(&self) -> bool {
        if self.database_url.is_some() {
            true // explicit URL - connection errors surface on use
        } else {
            self.database_path().exists()
        }
    }

    /// Ensure the data directory exists.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_dir).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to create data directory '{}': {}",
                    self.data_dir.display(),
                    e
                ),
            )
        })
    }

    /// Create a connection pool for the configured database.
    pub fn create_pool(&self) -> AsyncSqlitePool {
        AsyncSqlitePool::new(&self.database_url())
    }

    /// Request timeout as a duration.
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout)
    }

    /// Inter-page settle delay as a duration.
    pub fn settle_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.page_settle_ms)
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Data directory path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    /// Database filename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    /// User agent string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
    /// Settle delay between listing pages in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_settle_ms: Option<u64>,
    /// Base URL of the upstream listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_base_url: Option<String>,
    /// Genre tags to scrape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    /// Inclusive start of the release-date range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    /// Inclusive end of the release-date range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a specific file path.
    /// Supports TOML and JSON based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

        let mut config: Config = match ext {
            "json" => serde_json::from_str(&contents)
                .map_err(|e| format!("Failed to parse JSON config: {}", e))?,
            _ => toml::from_str(&contents)
                .map_err(|e| format!("Failed to parse TOML config: {}", e))?,
        };

        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Get the base directory for resolving relative paths.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a path that may be relative to the config file.
    /// - Absolute paths are returned as-is
    /// - Paths starting with ~ are expanded
    /// - Relative paths are resolved relative to `base_dir`
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Apply configuration to settings.
    /// `base_dir` is used to resolve relative paths.
    pub fn apply_to_settings(&self, settings: &mut Settings, base_dir: &Path) {
        if let Some(ref data_dir) = self.data_dir {
            settings.data_dir = self.resolve_path(data_dir, base_dir);
        }
        if let Some(ref database) = self.database {
            settings.database_filename = database.clone();
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = user_agent.clone();
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = timeout;
        }
        if let Some(settle) = self.page_settle_ms {
            settings.page_settle_ms = settle;
        }
        if let Some(ref base_url) = self.listing_base_url {
            settings.listing_base_url = base_url.clone();
        }
        if let Some(ref genres) = self.genres {
            settings.genres = genres.clone();
        }
        if let Some(date_from) = self.date_from {
            settings.date_from = date_from;
        }
        if let Some(date_to) = self.date_to {
            settings.date_to = date_to;
        }
    }
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides discovery).
    pub config_path: Option<PathBuf>,
    /// Data directory or database file (--data flag).
    pub data: Option<PathBuf>,
}

/// Resolved data path information.
#[derive(Debug, Clone)]
struct ResolvedData {
    database_filename: String,
    data_dir: PathBuf,
}

impl ResolvedData {
    /// Resolve a data path to database filename and directory.
    /// - If path is a .db file, extract filename and use its parent
    /// - If path is a directory, look for cinescrape.db inside
    fn from_path(path: &Path) -> Self {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(path)
        };

        let is_db_file = path
            .extension()
            .is_some_and(|ext| ext == "db" || ext == "sqlite" || ext == "sqlite3")
            || (path.exists() && path.is_file());

        if is_db_file {
            let database_filename = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(DEFAULT_DATABASE_FILENAME)
                .to_string();
            let data_dir = path
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."));
            Self {
                database_filename,
                data_dir,
            }
        } else {
            Self {
                database_filename: DEFAULT_DATABASE_FILENAME.to_string(),
                data_dir: path,
            }
        }
    }
}

/// Look for a config file next to the database.
fn find_config_next_to_db(data_dir: &Path) -> Option<PathBuf> {
    let extensions = ["toml", "json"];
    let basenames = ["cinescrape", "config"];

    for basename in basenames {
        for ext in extensions {
            let path = data_dir.join(format!("{}.{}", basename, ext));
            if path.exists() {
                return Some(path);
            }
        }
    }
    None
}

/// Load config from the appropriate source based on options.
async fn load_config_from_sources(
    options: &LoadOptions,
    resolved_data: Option<&ResolvedData>,
) -> Config {
    // Priority 1: Explicit --config flag
    if let Some(ref config_path) = options.config_path {
        return Config::load_from_path(config_path)
            .await
            .unwrap_or_default();
    }

    // Priority 2: Config next to the data directory
    if let Some(resolved) = resolved_data {
        if let Some(config_path) = find_config_next_to_db(&resolved.data_dir) {
            tracing::debug!("Found config next to data dir: {}", config_path.display());
            return Config::load_from_path(&config_path)
                .await
                .unwrap_or_default();
        }
    }

    // Priority 3: Config in the current directory
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    if let Some(config_path) = find_config_next_to_db(&cwd) {
        return Config::load_from_path(&config_path)
            .await
            .unwrap_or_default();
    }

    Config::default()
}

/// Load settings with explicit options.
/// Returns (Settings, Config) tuple.
pub async fn load_settings_with_options(options: LoadOptions) -> (Settings, Config) {
    let resolved_data = options.data.as_ref().map(|d| ResolvedData::from_path(d));

    let config = load_config_from_sources(&options, resolved_data.as_ref()).await;

    let mut settings = Settings::default();

    let base_dir = config
        .base_dir()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    config.apply_to_settings(&mut settings, &base_dir);

    // --data override takes precedence for data_dir and database filename
    if let Some(resolved) = resolved_data {
        settings.data_dir = resolved.data_dir;
        settings.database_filename = resolved.database_filename;
    }

    // DATABASE_URL environment variable takes highest precedence
    if let Some(database_url) = std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()) {
        tracing::debug!("Using DATABASE_URL from environment: {}", database_url);
        settings.database_url = Some(database_url);
    }

    (settings, config)
}
