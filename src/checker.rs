//! Runs every check against a manifest and collects the results.

use crate::checks::{check_already_published, check_name, check_private};
use crate::manifest::Manifest;
use crate::registry::RegistryQuery;
use crate::types::Rejection;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Everything one run found out about a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Every failing check, in name / already-published / private order.
    pub rejections: Vec<Rejection>,
    /// Legacy-name warnings; these never fail the run.
    pub warnings: Vec<String>,
}

impl Report {
    /// True when no check rejected the manifest.
    pub fn is_publishable(&self) -> bool {
        self.rejections.is_empty()
    }

    /// All rejection messages, one per line.
    pub fn message(&self) -> String {
        self.rejections
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Checks whether a manifest can be published.
pub struct PublishabilityChecker {
    lookup: Arc<dyn RegistryQuery>,
    fallback_registry: Option<Url>,
}

impl PublishabilityChecker {
    /// Create a checker backed by the given registry lookup.
    pub fn new(lookup: Arc<dyn RegistryQuery>) -> Self {
        Self {
            lookup,
            fallback_registry: None,
        }
    }

    /// Registry to query when the manifest has no `publishConfig.registry`.
    pub fn with_fallback_registry(mut self, registry: Option<Url>) -> Self {
        self.fallback_registry = registry;
        self
    }

    /// Run all checks concurrently and report every failure.
    pub async fn check(&self, manifest: &Manifest) -> Report {
        let (name, published, private) = tokio::join!(
            async { check_name(manifest) },
            check_already_published(
                manifest,
                self.lookup.as_ref(),
                self.fallback_registry.as_ref()
            ),
            async { check_private(manifest) },
        );

        let (name_outcome, warnings) = name;
        let rejections: Vec<Rejection> = [name_outcome, published, private]
            .into_iter()
            .filter_map(Result::err)
            .collect();

        debug!(
            "{} rejection(s), {} warning(s)",
            rejections.len(),
            warnings.len()
        );

        Report {
            rejections,
            warnings,
        }
    }
}
