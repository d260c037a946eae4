/// Core error types for Resound
use thiserror::Error;

/// Result type alias using `ResoundError`
pub type Result<T> = std::result::Result<T, ResoundError>;

/// Core error type shared by the filter pipeline and the database engine
#[derive(Error, Debug)]
pub enum ResoundError {
    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A plugin rejected its configuration or does not exist
    #[error("Plugin error: {0}")]
    Plugin(String),

    /// A filter stage cannot accept the incoming audio format
    #[error("Format negotiation failed: {0}")]
    FormatNegotiation(String),

    /// A transform failed on otherwise well-formed input
    #[error("Processing error: {0}")]
    Processing(String),

    /// Backend failure during enumeration
    #[error("Database error: {0}")]
    Database(String),

    /// Entity not found
    #[error("{entity}: {id}")]
    NotFound { entity: String, id: String },

    /// I/O errors on a host byte stream
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ResoundError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a plugin error
    pub fn plugin(msg: impl Into<String>) -> Self {
        Self::Plugin(msg.into())
    }

    /// Create a format negotiation error
    pub fn format_negotiation(msg: impl Into<String>) -> Self {
        Self::FormatNegotiation(msg.into())
    }

    /// Create a processing error
    pub fn processing(msg: impl Into<String>) -> Self {
        Self::Processing(msg.into())
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a not found error
    ///
    /// `entity` is the leading phrase of the message, e.g.
    /// `"No such configured filter"`.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message() {
        let err = ResoundError::not_found("No such configured filter", "missing");
        assert_eq!(err.to_string(), "No such configured filter: missing");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: ResoundError = io.into();
        assert!(matches!(err, ResoundError::Io(_)));
        assert_eq!(err.to_string(), "pipe closed");
    }
}
