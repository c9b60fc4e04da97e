//! Error types for the CLI

use std::fmt;

#[derive(Debug)]
pub enum CliError {
    /// GBIF API error
    Gbif(gbif_species::GbifError),
    /// Failed to render output
    Output(serde_json::Error),
    /// Configuration error
    Config(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gbif(e) => write!(f, "{}", e),
            Self::Output(e) => write!(f, "Output error: {}", e),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gbif(e) => Some(e),
            Self::Output(e) => Some(e),
            Self::Config(_) => None,
        }
    }
}

impl From<gbif_species::GbifError> for CliError {
    fn from(e: gbif_species::GbifError) -> Self {
        Self::Gbif(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::Output(e)
    }
}

impl From<tracing_subscriber::filter::ParseError> for CliError {
    fn from(e: tracing_subscriber::filter::ParseError) -> Self {
        Self::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
