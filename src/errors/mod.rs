//! Error handling utilities for the calmly application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.
//!
//! Most of these errors never reach the user: the chat pipeline and the stores
//! recover from them locally. They exist so the recovery sites can log what
//! actually went wrong.

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Represents specific error cases that can occur when reading or writing persisted blobs.
///
/// # Examples
///
/// ```
/// use calmly::errors::StorageError;
/// use std::io::{self, ErrorKind};
/// use std::path::PathBuf;
///
/// let error = StorageError::Io {
///     path: PathBuf::from("/data/moodTracking.json"),
///     source: io::Error::new(ErrorKind::PermissionDenied, "permission denied"),
/// };
///
/// assert!(format!("{}", error).contains("moodTracking.json"));
/// assert!(format!("{}", error).contains("permission denied"));
/// ```
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem failure while touching a blob.
    #[error("Failed to access storage at {path}: {source}")]
    Io {
        /// The blob or directory path involved
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A value could not be encoded as JSON.
    #[error("Failed to encode '{key}' for storage: {source}")]
    Serialize {
        /// The storage key being written
        key: String,
        /// The underlying serde error
        #[source]
        source: serde_json::Error,
    },

    /// The cross-process write lock could not be taken.
    #[error("Failed to acquire storage lock {path}: {source}. Check for other running calmly processes.")]
    Lock {
        /// The lock file path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Keys become file names, so they are restricted to a safe alphabet.
    #[error("Invalid storage key: '{0}'")]
    InvalidKey(String),
}

/// Represents specific error cases that can occur when calling the language model.
///
/// # Examples
///
/// ```
/// use calmly::errors::AIError;
/// use std::time::Duration;
///
/// let error = AIError::Timeout(Duration::from_secs(15));
/// assert!(format!("{}", error).contains("timed out"));
///
/// let error = AIError::ModelNotFound("llama3.2:3b".to_string());
/// assert!(format!("{}", error).contains("llama3.2:3b"));
/// ```
#[derive(Debug, Error)]
pub enum AIError {
    /// The model endpoint is not reachable.
    #[error("Language model API error: {0}. Is the model server reachable?")]
    Offline(#[source] reqwest::Error),

    /// Requested model not found on the server.
    #[error("Model not found: {0}. Try: ollama pull {0}")]
    ModelNotFound(String),

    /// Invalid or unexpected response from the model API.
    #[error("Invalid response from language model: {0}")]
    InvalidResponse(String),

    /// The provider needs an API key that was not configured.
    #[error("Missing API credentials: set {0}")]
    MissingCredentials(String),

    /// The call did not finish within its time bound.
    #[error("Language model call timed out after {0:?}")]
    Timeout(Duration),

    /// The call was cancelled through its cancellation token.
    #[error("Language model call was cancelled")]
    Cancelled,
}

/// Represents all possible errors that can occur in the calmly application.
///
/// This enum is the central error type used across the application, with variants
/// for different error categories. It uses `thiserror` for deriving the `Error` trait
/// implementation and formatted error messages.
///
/// # Examples
///
/// Creating a configuration error:
/// ```
/// use calmly::errors::AppError;
///
/// let error = AppError::Config("Missing data directory".to_string());
/// assert_eq!(format!("{}", error), "Configuration error: Missing data directory");
/// ```
///
/// Converting from an IO error:
/// ```
/// use calmly::errors::AppError;
/// use std::io::{self, ErrorKind};
///
/// let io_error = io::Error::new(ErrorKind::NotFound, "file not found");
/// let app_error: AppError = io_error.into();
///
/// match app_error {
///     AppError::Io(inner) => assert_eq!(inner.kind(), ErrorKind::NotFound),
///     _ => panic!("Expected Io variant"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from the terminal or filesystem.
    ///
    /// This variant automatically converts from `std::io::Error` through the `From` trait.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors related to persisted state.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Errors related to language model calls.
    #[error("AI error: {0}")]
    AI(#[from] AIError),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// # Examples
///
/// ```
/// use calmly::errors::{AppResult, AppError};
///
/// fn might_fail() -> AppResult<String> {
///     if false {
///         return Err(AppError::Config("Something went wrong".to_string()));
///     }
///     Ok("Operation succeeded".to_string())
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;
