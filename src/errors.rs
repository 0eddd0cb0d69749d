/*!
 * Error types for the mtbatch library.
 *
 * This module contains custom error types for different parts of the library,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to a translation backend
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

    /// The request did not finish within the per-request ceiling
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that can surface from the translation pipeline
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// No supported language is close enough to the requested one
    #[error("Language '{language}' is not supported by engine '{engine}'")]
    LanguageUnsupported {
        /// Requested language code
        language: String,
        /// Engine that rejected it
        engine: String,
    },

    /// The requested engine is not registered
    #[error("Unknown translation engine: {0}")]
    UnknownEngine(String),

    /// A backend is fundamentally misconfigured (e.g. missing credentials)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The translation memory corpus could not be loaded
    #[error("Translation memory error: {0}")]
    Memory(String),
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

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

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

/// Why a single unit has no accepted translation yet
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The unit has not been part of a finished request
    #[error("not attempted")]
    NotAttempted,

    /// The chunk request failed
    #[error("request failed: {0}")]
    Request(String),

    /// The chunk request exceeded the per-request ceiling
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// The reply could not be aligned to the chunk's units
    #[error("reply has {received} usable lines, expected {expected}")]
    Misaligned {
        /// Line count implied by the chunk's sources
        expected: usize,
        /// Line count of the reply
        received: usize,
    },

    /// A multi-line unit came back with a different blank-line layout
    #[error("blank-line layout of a multi-line unit changed")]
    LayoutChanged,

    /// The fallback engine failed as well
    #[error("fallback failed: {0}")]
    Fallback(String),
}
