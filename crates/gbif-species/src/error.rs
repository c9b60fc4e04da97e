//! Error types for the GBIF species client

use std::fmt;

/// Errors that can occur when interacting with the GBIF API
#[derive(Debug)]
pub enum GbifError {
    /// Rejected before any request was issued (bad paging bounds, missing identifier)
    InvalidArgument(String),
    /// The transport failed to execute the request
    Transport(Box<dyn std::error::Error + Send + Sync>),
    /// The server answered with a non-success status
    Status { status: u16, body: String },
    /// The response body could not be decoded into the expected records
    MalformedResponse(String),
}

impl GbifError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }
}

impl fmt::Display for GbifError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Self::Transport(e) => write!(f, "GBIF transport error: {}", e),
            Self::Status { status, body } if body.is_empty() => {
                write!(f, "GBIF returned status {}", status)
            }
            Self::Status { status, body } => write!(f, "GBIF returned status {}: {}", status, body),
            Self::MalformedResponse(msg) => write!(f, "Malformed GBIF response: {}", msg),
        }
    }
}

impl std::error::Error for GbifError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GbifError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(Box::new(e))
    }
}

impl From<serde_json::Error> for GbifError {
    fn from(e: serde_json::Error) -> Self {
        Self::MalformedResponse(e.to_string())
    }
}

/// Result type for GBIF API operations
pub type Result<T> = std::result::Result<T, GbifError>;
