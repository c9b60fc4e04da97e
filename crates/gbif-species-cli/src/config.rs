use std::env;
use std::time::Duration;

use gbif_species::{ApiConfig, DEFAULT_ROOT, DEFAULT_VERSION};

use crate::error::{CliError, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// CLI configuration parsed from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub root: String,
    pub version: String,
    pub timeout: Duration,
}

impl Config {
    /// Parse configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let root = lookup("GBIF_API_ROOT").unwrap_or_else(|| DEFAULT_ROOT.to_string());
        let version = lookup("GBIF_API_VERSION").unwrap_or_else(|| DEFAULT_VERSION.to_string());

        let timeout_secs = match lookup("GBIF_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                CliError::Config(format!("GBIF_TIMEOUT_SECS must be a number, got {:?}", raw))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            root,
            version,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Apply command line overrides
    pub fn with_overrides(mut self, root: Option<String>, version: Option<String>) -> Self {
        if let Some(root) = root {
            self.root = root;
        }
        if let Some(version) = version {
            self.version = version;
        }
        self
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(self.root.clone(), self.version.clone())
    }
}
