use crate::core::DEFAULT_MAX_ITEMS;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub telegram: TelegramSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub results: ResultSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramSettings {
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for TelegramSettings {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_url: default_api_url(),
            poll_timeout_secs: default_poll_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_api_url() -> String { "https://api.telegram.org".to_string() }
fn default_poll_timeout() -> u64 { 10 }
fn default_request_timeout() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_form_field")]
    pub form_field: String,
    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: default_search_endpoint(),
            form_field: default_form_field(),
            timeout_secs: default_search_timeout(),
        }
    }
}

fn default_search_endpoint() -> String { "http://searchface.ru/request/".to_string() }
fn default_form_field() -> String { "upl".to_string() }
fn default_search_timeout() -> u64 { 60 }

#[derive(Debug, Clone, Deserialize)]
pub struct ResultSettings {
    #[serde(default = "default_max_items")]
    pub max_items: usize,
}

impl Default for ResultSettings {
    fn default() -> Self {
        Self { max_items: default_max_items() }
    }
}

fn default_max_items() -> usize { DEFAULT_MAX_ITEMS }

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    #[serde(default = "std::env::temp_dir")]
    pub download_dir: PathBuf,
    #[serde(default)]
    pub keep_downloads: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            download_dir: std::env::temp_dir(),
            keep_downloads: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with FACEBOT__)
    /// 5. TELEGRAM_BOT_TOKEN for the bot token
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., FACEBOT__SEARCH__ENDPOINT -> search.endpoint
            .add_source(environment())
            .build()?;

        substitute_env_vars(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        substitute_env_vars(settings)?.try_deserialize()
    }

    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&mut self, token: Option<String>, max_results: Option<usize>) {
        if let Some(token) = token {
            self.telegram.token = token;
        }
        if let Some(max) = max_results {
            self.results.max_items = max;
        }
    }

    /// Check the settings that have no usable default
    ///
    /// `results.max_items` is clamped to what a single album can hold.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        if self.telegram.token.trim().is_empty() {
            return Err(ConfigError::Message("token argument is mandatory".to_string()));
        }
        if self.search.endpoint.trim().is_empty() {
            return Err(ConfigError::Message("search.endpoint must not be empty".to_string()));
        }
        self.results.max_items = self.results.max_items.clamp(1, DEFAULT_MAX_ITEMS);
        Ok(())
    }
}

fn environment() -> Environment {
    Environment::with_prefix("FACEBOT")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Pick up the bot token from the conventional TELEGRAM_BOT_TOKEN variable
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("TELEGRAM_BOT_TOKEN") {
        Ok(token) if !token.is_empty() => Config::builder()
            .add_source(settings)
            .set_override("telegram.token", token)?
            .build(),
        _ => Ok(settings),
    }
}
