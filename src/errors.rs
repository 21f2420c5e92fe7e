/*!
 * Error types for the gurukul tooling.
 *
 * Typed errors are defined with the thiserror crate. Fatal errors (configuration,
 * credentials, lookup table) stop a run at startup; per-item errors (one PDF, one
 * model response) are caught at the file boundary and turned into an `ItemOutcome`.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The provider answered without any text
    #[error("Provider returned an empty response")]
    EmptyResponse,
}

/// Startup errors. Any of these aborts the run before work begins.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Credential environment variable is unset or empty
    #[error("Missing credential: set the {var} environment variable (e.g. `export {var}=...`)")]
    MissingCredential { var: String },

    /// Root directory for a walk does not exist
    #[error("Directory does not exist: {0:?}")]
    MissingRootDirectory(PathBuf),

    /// No naming convention registered for this scripture
    #[error("Unknown scripture '{0}': add a convention to the config or use one of the built-ins")]
    UnknownScripture(String),

    /// A configured regex failed to compile
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Any other invalid setting
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors loading the verse pattern lookup table
#[derive(Error, Debug)]
pub enum LookupTableError {
    #[error("Failed to read lookup table {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse lookup table {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Per-chapter errors raised while generating metadata
#[derive(Error, Debug)]
pub enum MetadataError {
    /// Reading the PDF or writing the JSON failed
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    /// The model call failed
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// No `{ ... }` span could be isolated from the model output
    #[error("Could not isolate a JSON object from the model response")]
    UnrecoverableResponse,

    /// The isolated span is not valid JSON
    #[error("Failed to parse JSON response: {message} (near: {preview})")]
    Parse { message: String, preview: String },

    /// Valid JSON, but not an object
    #[error("Model response is JSON but not an object")]
    NotAnObject,
}

/// Errors building a chapter manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("No division folders found in {0:?}")]
    NoDivisions(PathBuf),

    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Startup configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Lookup table error
    #[error("Lookup table error: {0}")]
    LookupTable(#[from] LookupTableError),

    /// Metadata generation error
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// Manifest generation error
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
