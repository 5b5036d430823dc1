//! Error types for neatling_core.
//!
//! Covers configuration problems, network compilation and activation failures,
//! and explicit not-found results for id lookups.

use neatling_data::ParseFunctionError;
use thiserror::Error;

/// Main error type for neatling_core operations.
#[derive(Error, Debug)]
pub enum NeatError {
    /// Configuration values that cannot be used
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Activation or aggregation name with no known function
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Input vector length differs from the configured input count
    #[error("Expected {expected} inputs, got {got}")]
    InputLengthMismatch { expected: usize, got: usize },

    /// Node id absent from a genome
    #[error("Node not found: {0}")]
    NodeNotFound(i64),

    /// No connection joins the given endpoints
    #[error("Connection not found: {from} -> {to}")]
    ConnectionNotFound { from: i64, to: i64 },

    /// Parent selection requested from a species without members
    #[error("Species {0} has no members to select from")]
    EmptySpecies(usize),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// File system errors
    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<NeatError>,
    },
}

/// Result type alias for neatling_core operations.
pub type Result<T> = std::result::Result<T, NeatError>;

impl From<ParseFunctionError> for NeatError {
    fn from(err: ParseFunctionError) -> Self {
        Self::UnknownFunction(err.to_string())
    }
}

impl NeatError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn invalid_configuration<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Creates a new unknown-function error.
    #[must_use]
    pub fn unknown_function<S: Into<String>>(name: S) -> Self {
        Self::UnknownFunction(name.into())
    }

    /// Wraps an error with additional context.
    #[must_use]
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}
