//! Error types for the DocQA client.

use thiserror::Error;

/// Failure reported by a document or question-answering collaborator.
///
/// The two variants map onto the two failure kinds the session controller
/// distinguishes: an upload failure leaves the session without a document,
/// a query failure leaves the chat usable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The document could not be uploaded or processed.
    #[error("Upload failed: {message}")]
    Upload {
        message: String,
        /// HTTP status code, when the failure came from a server response.
        status: Option<u16>,
    },

    /// The question could not be answered.
    #[error("Query failed: {message}")]
    Query {
        message: String,
        /// HTTP status code, when the failure came from a server response.
        status: Option<u16>,
    },
}

impl ServiceError {
    /// Creates an Upload error without a status code
    pub fn upload(message: impl Into<String>) -> Self {
        Self::Upload {
            message: message.into(),
            status: None,
        }
    }

    /// Creates a Query error without a status code
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
            status: None,
        }
    }

    /// Attaches an HTTP status code to the error.
    pub fn with_status(self, code: u16) -> Self {
        match self {
            Self::Upload { message, .. } => Self::Upload {
                message,
                status: Some(code),
            },
            Self::Query { message, .. } => Self::Query {
                message,
                status: Some(code),
            },
        }
    }

    /// The lower-level description, without the kind prefix.
    ///
    /// This is the text surfaced in transcript entries.
    pub fn message(&self) -> &str {
        match self {
            Self::Upload { message, .. } | Self::Query { message, .. } => message,
        }
    }

    /// HTTP status code carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upload { status, .. } | Self::Query { status, .. } => *status,
        }
    }

    /// Check if this is an upload error
    pub fn is_upload(&self) -> bool {
        matches!(self, Self::Upload { .. })
    }

    /// Check if this is a query error
    pub fn is_query(&self) -> bool {
        matches!(self, Self::Query { .. })
    }
}

/// Crate-wide error for everything that is not a collaborator failure.
#[derive(Error, Debug)]
pub enum DocQaError {
    /// IO error (reading documents, config files)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// Collaborator failure
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl DocQaError {
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

    /// Check if this is an IO error
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl From<std::io::Error> for DocQaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for DocQaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for DocQaError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, DocQaError>`.
pub type Result<T> = std::result::Result<T, DocQaError>;
