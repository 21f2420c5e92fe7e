use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;
use crate::manifest::conventions::{ConventionSpec, NamingConvention};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Root of the local library (parent of `Gurukul_Library`)
    #[serde(default = "default_library_root")]
    pub library_root: PathBuf,

    /// Bucket the manifest URLs point into
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Verse pattern lookup table
    #[serde(default = "default_lookup_table_path")]
    pub lookup_table_path: PathBuf,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Metadata generation settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Naming conventions added to (or replacing) the built-in ones
    #[serde(default)]
    pub conventions: Vec<ConventionSpec>,
}

/// Generative model provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GenerationProvider {
    // @provider: Google Gemini
    #[default]
    Gemini,
    // @provider: Canned replies, no network
    Mock,
}

impl GenerationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Gemini => "Gemini",
            Self::Mock => "Mock",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Gemini => "gemini".to_string(),
            Self::Mock => "mock".to_string(),
        }
    }
}

// Implement Display trait for GenerationProvider
impl std::fmt::Display for GenerationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for GenerationProvider
impl std::str::FromStr for GenerationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Metadata generation configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GenerationConfig {
    // @field: Provider type
    #[serde(default)]
    pub provider: GenerationProvider,

    // @field: Model name
    #[serde(default = "default_model")]
    pub model: String,

    // @field: Service URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    // @field: Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Pause between two API calls
    #[serde(default = "default_rate_limit_delay_ms")]
    pub rate_limit_delay_ms: u64,

    #[serde(default)]
    pub temperature: Option<f32>,

    #[serde(default)]
    pub max_output_tokens: Option<u32>,
}

impl GenerationConfig {
    /// Read the API key from the configured environment variable
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    /// Read the API key through `lookup` (variable name in, value out)
    pub fn resolve_api_key_with<F>(&self, lookup: F) -> Result<String, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(&self.api_key_env) {
            Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(ConfigError::MissingCredential {
                var: self.api_key_env.clone(),
            }),
        }
    }

    /// Whether the provider needs a credential
    pub fn requires_api_key(&self) -> bool {
        self.provider == GenerationProvider::Gemini
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: GenerationProvider::default(),
            model: default_model(),
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            rate_limit_delay_ms: default_rate_limit_delay_ms(),
            temperature: None,
            max_output_tokens: None,
        }
    }
}

/// Log level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching log crate filter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_library_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_bucket() -> String {
    crate::manifest::builder::DEFAULT_BUCKET.to_string()
}

fn default_lookup_table_path() -> PathBuf {
    PathBuf::from("verse-pattern-lookup-table.json")
}

fn default_model() -> String {
    "gemini-2.5-pro".to_string()
}

fn default_endpoint() -> String {
    crate::providers::gemini::DEFAULT_ENDPOINT.to_string()
}

fn default_api_key_env() -> String {
    "GOOGLE_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_rate_limit_delay_ms() -> u64 {
    3000
}

impl Config {
    /// Load the configuration file, creating it with defaults when missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            Ok(config)
        } else {
            warn!("Config file not found at '{}', creating default config.", path.display());
            let config = Config::default();
            config.save(path)?;
            Ok(config)
        }
    }

    /// Write the configuration as indented JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bucket.trim().is_empty() {
            return Err(ConfigError::Invalid("bucket must not be empty".to_string()));
        }
        if self.generation.model.trim().is_empty() {
            return Err(ConfigError::Invalid("generation.model must not be empty".to_string()));
        }
        if self.generation.api_key_env.trim().is_empty() {
            return Err(ConfigError::Invalid("generation.api_key_env must not be empty".to_string()));
        }

        for spec in &self.conventions {
            NamingConvention::compile(spec.clone())?;
        }

        Ok(())
    }

    /// Resolve a path given on the command line against the library root when relative
    pub fn resolve_library_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() || path.exists() {
            path.to_path_buf()
        } else {
            self.library_root.join(path)
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            library_root: default_library_root(),
            bucket: default_bucket(),
            lookup_table_path: default_lookup_table_path(),
            log_level: LogLevel::default(),
            generation: GenerationConfig::default(),
            conventions: Vec::new(),
        }
    }
}
