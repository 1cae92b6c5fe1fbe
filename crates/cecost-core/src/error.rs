//! Error types for cecost
//!
//! This module defines the error types used throughout the cecost library.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! # Example
//!
//! ```
//! use cecost_core::error::{CecostError, Result};
//!
//! fn example_function() -> Result<()> {
//!     // This will automatically convert serde_json::Error to CecostError
//!     let _value: serde_json::Value = serde_json::from_str("{")?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Boxed error returned by the billing service, carried through untouched
pub type UpstreamSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for cecost operations
///
/// The three variants that matter to callers of the facade are
/// [`CecostError::Configuration`], [`CecostError::Upstream`] and
/// [`CecostError::MalformedResponse`]. The rest cover user input and
/// local I/O.
#[derive(Error, Debug)]
pub enum CecostError {
    /// Credentials are incomplete, or the client was built from incomplete credentials
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The billing service call itself failed
    #[error("Upstream error: {0}")]
    Upstream(#[source] UpstreamSource),

    /// The billing service returned a shape the aggregator cannot sum
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Invalid date format
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// Invalid timezone
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CecostError {
    /// Wrap any service-side error without reinterpreting it
    pub fn upstream<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Upstream(Box::new(error))
    }

    /// Whether this error means the client can never issue a request
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// Convenience type alias for Results in cecost
///
/// # Example
///
/// ```
/// use cecost_core::Result;
///
/// fn process_data() -> Result<String> {
///     Ok("Processed successfully".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, CecostError>;
