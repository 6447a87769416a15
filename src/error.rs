use thiserror::Error;

/// Result type for tolc-synchronized operations
pub type Result<T> = std::result::Result<T, Error>;

/// Internal failures of the handler machinery.
///
/// Mistakes in the annotated source are never reported through this type;
/// they become diagnostics (see [`crate::handlers::HandlerError`]).
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error at line {line}: {message}")]
    Config { line: usize, message: String },

    #[error("Annotation node not found: {message}")]
    StaleNode { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl Error {
    /// Create a configuration error for a line of a config source
    pub fn config_error(line: usize, message: impl Into<String>) -> Self {
        Self::Config { line, message: message.into() }
    }

    /// Create an error for an annotation path that no longer resolves
    pub fn stale_node(message: impl Into<String>) -> Self {
        Self::StaleNode { message: message.into() }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }
}
