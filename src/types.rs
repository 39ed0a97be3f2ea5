//! Core types and errors for the publishability checker.

use std::collections::BTreeSet;
use thiserror::Error;

/// Errors that can occur while loading a manifest or talking to a registry.
#[derive(Error, Debug)]
pub enum PublishableError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, PublishableError>;

/// Reason a single check rejected the manifest.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Hard name validation failures, one message per violation.
    #[error("{}", .0.join("\n"))]
    InvalidName(Vec<String>),

    #[error("This package is private.")]
    PrivatePackage,

    /// `name` or `version` is absent from the manifest.
    #[error("This package has not `{0}`.")]
    MissingField(&'static str),

    #[error("{name}@{version} is already published")]
    AlreadyPublished { name: String, version: String },

    /// The registry lookup itself failed.
    #[error("{0}")]
    LookupFailure(String),
}

/// Outcome of one check.
pub type CheckOutcome = std::result::Result<(), Rejection>;

/// Result of asking a registry for the published versions of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResult {
    /// The package has never been published.
    NotFound,
    /// Every version the registry knows about.
    Published(BTreeSet<String>),
    /// The lookup failed for a reason other than "never published".
    Failed(String),
}

impl LookupResult {
    /// Build a result from a version list, collapsing an empty list to `NotFound`.
    pub fn from_versions<I, S>(versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = versions.into_iter().map(Into::into).collect();
        if set.is_empty() {
            Self::NotFound
        } else {
            Self::Published(set)
        }
    }

    /// Whether `version` is among the published versions.
    pub fn contains(&self, version: &str) -> bool {
        match self {
            Self::Published(set) => set.contains(version),
            Self::NotFound | Self::Failed(_) => false,
        }
    }
}
