//! Command line configuration.

use crate::registry::{HttpLookup, NpmCliLookup, RegistryQuery};
use crate::types::{PublishableError, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

/// Check whether a package can be published to the npm registry.
///
/// Exits with 0 when the package is publishable and 1 otherwise.
#[derive(Parser, Debug, Clone)]
#[command(name = "publishable")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Package directory or package.json path
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Show details of errors
    #[arg(short, long)]
    pub verbose: bool,

    /// How to query the registry
    #[arg(long, value_enum, env = "PUBLISHABLE_LOOKUP", default_value = "npm")]
    pub lookup: LookupKind,

    /// Registry to query when package.json has no publishConfig.registry
    #[arg(long, env = "PUBLISHABLE_REGISTRY")]
    pub registry: Option<String>,

    /// npm executable used by the npm lookup
    #[arg(long, env = "PUBLISHABLE_NPM", default_value = "npm")]
    pub npm_path: PathBuf,

    /// Request timeout in seconds for the http lookup
    #[arg(long, default_value = "30")]
    pub timeout: u64,
}

/// Registry transport.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    /// `npm view --json -- <name> versions`
    Npm,
    /// GET the package document from the registry
    Http,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            verbose: false,
            lookup: LookupKind::Npm,
            registry: None,
            npm_path: PathBuf::from("npm"),
            timeout: 30,
        }
    }
}

impl Config {
    /// Parse the fallback registry URL, if any.
    pub fn fallback_registry(&self) -> Result<Option<Url>> {
        self.registry
            .as_deref()
            .map(|r| {
                Url::parse(r.trim())
                    .map_err(|e| PublishableError::ConfigError(format!("invalid registry {}: {}", r, e)))
            })
            .transpose()
    }

    /// Build the registry lookup selected on the command line.
    pub fn registry_lookup(&self) -> Result<Arc<dyn RegistryQuery>> {
        Ok(match self.lookup {
            LookupKind::Npm => Arc::new(NpmCliLookup::new(&self.npm_path)),
            LookupKind::Http => Arc::new(HttpLookup::new(self.timeout)?),
        })
    }
}
