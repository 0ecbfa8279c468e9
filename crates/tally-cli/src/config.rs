//! Settings file and credential loading for the CLI.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tally_extractor::ExtractorConfig;
use tally_llm::gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use tally_pipeline::PipelineConfig;
use thiserror::Error;

/// Settings file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "tally.toml";

/// Provider API key variable.
pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";

/// Store base URL variable.
pub const SUPABASE_URL: &str = "SUPABASE_URL";

/// Store service key variable.
pub const SUPABASE_KEY: &str = "SUPABASE_KEY";

/// Configuration errors. All are fatal before any file is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more required environment variables are unset or blank
    #[error("missing required credential(s): {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),

    /// Settings file could not be read
    #[error("failed to read {path}: {source}")]
    FileRead {
        /// File that was requested
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Settings file is not valid TOML for [`Settings`]
    #[error("failed to parse settings: {0}")]
    Parse(String),

    /// A setting is out of range
    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Complete CLI settings, loaded from a TOML file.
///
/// Every section is optional; missing values fall back to defaults.
///
/// ```toml
/// [pipeline]
/// input_dir = "uploads"
/// concurrency = 2
///
/// [extractor]
/// max_text_chars = 30000
///
/// [store]
/// backend = "sqlite"
/// sqlite_path = "tally.db"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Batch orchestration
    pub pipeline: PipelineConfig,

    /// Model prompt and reply handling
    pub extractor: ExtractorConfig,

    /// Provider selection
    pub llm: LlmSettings,

    /// Store selection
    pub store: StoreSettings,

    /// Output defaults
    pub output: OutputSettings,
}

/// Provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Model name
    pub model: String,

    /// API base URL
    pub endpoint: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

/// Store settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Which sink receives the batches
    pub backend: StoreBackend,

    /// Database file for the sqlite backend
    pub sqlite_path: PathBuf,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Rest,
            sqlite_path: PathBuf::from("tally.db"),
        }
    }
}

/// Store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Hosted REST table (needs `SUPABASE_URL` and `SUPABASE_KEY`)
    #[default]
    Rest,
    /// Local SQLite file
    Sqlite,
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (status line only) format
    Quiet,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            color: default_true(),
            format: default_format(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

impl Settings {
    /// Load settings from `path`, or from [`DEFAULT_CONFIG_FILE`] when it exists.
    ///
    /// An explicit path must exist; the implicit file is optional. Values are not
    /// validated here, since command-line overrides may still replace them.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::read(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::read(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Self::default()),
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pipeline.validate().map_err(ConfigError::Invalid)?;
        self.extractor.validate().map_err(ConfigError::Invalid)?;
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::Invalid("llm.model must not be empty".to_string()));
        }
        if !self.llm.endpoint.starts_with("http://") && !self.llm.endpoint.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "llm.endpoint must be an http(s) URL, got '{}'",
                self.llm.endpoint
            )));
        }
        if self.store.backend == StoreBackend::Sqlite && self.store.sqlite_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "store.sqlite_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse settings from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize settings to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// Secrets read from the environment.
#[derive(Clone)]
pub struct Credentials {
    /// Provider API key
    pub google_api_key: String,

    /// Store credentials, present for the REST backend
    pub store: Option<StoreCredentials>,
}

/// REST store credentials.
#[derive(Clone)]
pub struct StoreCredentials {
    /// Project base URL
    pub url: String,

    /// Service key
    pub key: String,
}

impl Credentials {
    /// Read the credentials `backend` needs from the process environment.
    pub fn from_env(backend: StoreBackend) -> Result<Self, ConfigError> {
        Self::from_lookup(backend, |name| std::env::var(name).ok())
    }

    /// Read credentials through `lookup`, reporting every missing name at once.
    ///
    /// Blank values count as missing.
    pub fn from_lookup<F>(backend: StoreBackend, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut required = |name: &'static str| {
            let value = lookup(name).filter(|v| !v.trim().is_empty());
            if value.is_none() {
                missing.push(name);
            }
            value
        };

        let google_api_key = required(GOOGLE_API_KEY);
        let store = match backend {
            StoreBackend::Rest => Some((required(SUPABASE_URL), required(SUPABASE_KEY))),
            StoreBackend::Sqlite => None,
        };

        if !missing.is_empty() {
            return Err(ConfigError::MissingCredentials(missing));
        }

        Ok(Self {
            google_api_key: google_api_key.unwrap_or_default(),
            store: store.map(|(url, key)| StoreCredentials {
                url: url.unwrap_or_default(),
                key: key.unwrap_or_default(),
            }),
        })
    }

    /// Read only the provider API key.
    pub fn api_key_from_env() -> Result<String, ConfigError> {
        std::env::var(GOOGLE_API_KEY)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingCredentials(vec![GOOGLE_API_KEY]))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("google_api_key", &"<redacted>")
            .field("store", &self.store)
            .finish()
    }
}

impl fmt::Debug for StoreCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreCredentials")
            .field("url", &self.url)
            .field("key", &"<redacted>")
            .finish()
    }
}
