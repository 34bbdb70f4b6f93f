//! Error types for the Campus Portal client.

use thiserror::Error;

/// A shared error type for the entire client.
///
/// Every failure is scoped to the component that triggered it: nothing here is
/// fatal to the process. Components store [`PortalError::user_message`] as their
/// inline error text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PortalError {
    /// Local validation failed before any network call was made
    #[error("Validation error on '{field}': {message}")]
    Validation { field: String, message: String },

    /// A document upload was attempted before the server allocated a request id
    #[error("Please submit the application form before uploading documents.")]
    MissingRequestId,

    /// An operation of the same kind is still in flight
    #[error("Another operation is already in progress")]
    Busy,

    /// The backend rejected the bearer token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The backend answered with a non-success status
    #[error("API error ({status}): {detail}")]
    Api { status: u16, detail: String },

    /// The request never reached the backend or the connection broke
    #[error("Network error: {0}")]
    Network(String),

    /// The backend did not answer within the configured timeout
    #[error("Request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PortalError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an Api error
    pub fn api(status: u16, detail: impl Into<String>) -> Self {
        Self::Api {
            status,
            detail: detail.into(),
        }
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this error was raised by local validation
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::MissingRequestId)
    }

    /// Check if this error came from the network boundary
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Api { .. } | Self::Network(_) | Self::Timeout { .. } | Self::Unauthorized(_)
        )
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Api { status: 404, .. })
    }

    /// The text shown in an inline alert.
    ///
    /// Server-provided `detail` text is shown verbatim; local validation shows
    /// only the message without the field prefix.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message, .. } => message.clone(),
            Self::Api { detail, .. } => detail.clone(),
            Self::Unauthorized(detail) => detail.clone(),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for PortalError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for PortalError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for PortalError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for PortalError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, PortalError>`.
pub type Result<T> = std::result::Result<T, PortalError>;
