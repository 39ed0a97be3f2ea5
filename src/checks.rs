//! The individual publishability checks.

use crate::manifest::Manifest;
use crate::registry::RegistryQuery;
use crate::types::{CheckOutcome, LookupResult, Rejection};
use crate::validate::validate_package_name;
use tracing::debug;
use url::Url;

/// Reject invalid names; warnings are returned for the caller to surface.
///
/// A missing name passes here and is reported by [`check_already_published`].
pub fn check_name(manifest: &Manifest) -> (CheckOutcome, Vec<String>) {
    let Some(name) = manifest.name.as_deref() else {
        return (Ok(()), Vec::new());
    };

    let validation = validate_package_name(name);
    let outcome = if validation.is_valid() {
        Ok(())
    } else {
        Err(Rejection::InvalidName(validation.errors))
    };
    (outcome, validation.warnings)
}

/// Reject manifests marked `"private": true`.
pub fn check_private(manifest: &Manifest) -> CheckOutcome {
    if manifest.private == Some(true) {
        return Err(Rejection::PrivatePackage);
    }
    Ok(())
}

/// Reject when `name@version` is already on the registry.
///
/// `fallback_registry` is used when the manifest has no `publishConfig.registry`.
pub async fn check_already_published(
    manifest: &Manifest,
    lookup: &dyn RegistryQuery,
    fallback_registry: Option<&Url>,
) -> CheckOutcome {
    let name = manifest
        .name
        .as_deref()
        .ok_or(Rejection::MissingField("name"))?;
    let version = manifest
        .version
        .as_deref()
        .ok_or(Rejection::MissingField("version"))?;

    let registry = manifest.publish_registry.as_ref().or(fallback_registry);
    debug!(
        "Looking up {} on {}",
        name,
        registry.map_or("default registry", Url::as_str)
    );

    match lookup.query_versions(name, registry).await {
        LookupResult::Failed(message) => Err(Rejection::LookupFailure(message)),
        result if result.contains(version) => Err(Rejection::AlreadyPublished {
            name: name.to_string(),
            version: version.to_string(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Returns a fixed result and records what it was asked.
    struct FixedLookup {
        result: LookupResult,
        calls: AtomicUsize,
        registry: Mutex<Option<String>>,
    }

    impl FixedLookup {
        fn new(result: LookupResult) -> Self {
            Self {
                result,
                calls: AtomicUsize::new(0),
                registry: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl RegistryQuery for FixedLookup {
        async fn query_versions(&self, _name: &str, registry: Option<&Url>) -> LookupResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.registry.lock().unwrap() = registry.map(Url::to_string);
            self.result.clone()
        }
    }

    fn manifest(name: Option<&str>, version: Option<&str>) -> Manifest {
        Manifest {
            name: name.map(str::to_string),
            version: version.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_private_always_rejected() {
        let mut m = manifest(Some("pkg"), Some("1.0.0"));
        m.private = Some(true);
        assert_eq!(check_private(&m), Err(Rejection::PrivatePackage));

        let mut m = Manifest::default();
        m.private = Some(true);
        assert_eq!(check_private(&m), Err(Rejection::PrivatePackage));

        m.private = Some(false);
        assert_eq!(check_private(&m), Ok(()));
        m.private = None;
        assert_eq!(check_private(&m), Ok(()));
    }

    #[test]
    fn test_name_check() {
        let (outcome, warnings) = check_name(&manifest(Some("pkg"), None));
        assert_eq!(outcome, Ok(()));
        assert!(warnings.is_empty());

        let (outcome, _) = check_name(&manifest(Some("invalid name"), None));
        let message = outcome.unwrap_err().to_string();
        assert!(message.contains("name can only contain URL-friendly characters"));

        let (outcome, warnings) = check_name(&manifest(Some("Legacy"), None));
        assert_eq!(outcome, Ok(()));
        assert_eq!(warnings, vec!["name can no longer contain capital letters"]);

        let (outcome, warnings) = check_name(&manifest(None, None));
        assert_eq!(outcome, Ok(()));
        assert!(warnings.is_empty());
    }

    #[tokio::test]
    async fn test_missing_fields_skip_lookup() {
        let lookup = FixedLookup::new(LookupResult::NotFound);

        let outcome = check_already_published(&manifest(None, Some("1.0.0")), &lookup, None).await;
        assert_eq!(outcome, Err(Rejection::MissingField("name")));

        let outcome = check_already_published(&manifest(Some("pkg"), None), &lookup, None).await;
        assert_eq!(outcome, Err(Rejection::MissingField("version")));
        assert!(outcome.unwrap_err().to_string().contains("version"));

        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_already_published() {
        let lookup = FixedLookup::new(LookupResult::from_versions(["0.9.0", "1.0.0"]));
        let outcome =
            check_already_published(&manifest(Some("pkg"), Some("1.0.0")), &lookup, None).await;
        let message = outcome.unwrap_err().to_string();
        assert!(message.contains("pkg@1.0.0 is already published"));

        let outcome =
            check_already_published(&manifest(Some("pkg"), Some("1.1.0")), &lookup, None).await;
        assert_eq!(outcome, Ok(()));
    }

    #[tokio::test]
    async fn test_not_found_passes_and_failure_rejects() {
        let lookup = FixedLookup::new(LookupResult::NotFound);
        let outcome =
            check_already_published(&manifest(Some("pkg"), Some("1.0.0")), &lookup, None).await;
        assert_eq!(outcome, Ok(()));

        let lookup = FixedLookup::new(LookupResult::Failed("ETIMEDOUT".to_string()));
        let outcome =
            check_already_published(&manifest(Some("pkg"), Some("1.0.0")), &lookup, None).await;
        assert_eq!(outcome, Err(Rejection::LookupFailure("ETIMEDOUT".to_string())));
    }

    #[tokio::test]
    async fn test_manifest_registry_overrides_fallback() {
        let lookup = FixedLookup::new(LookupResult::NotFound);
        let fallback = Url::parse("https://fallback.example.com").unwrap();

        let mut m = manifest(Some("pkg"), Some("1.0.0"));
        check_already_published(&m, &lookup, Some(&fallback)).await.unwrap();
        assert_eq!(
            lookup.registry.lock().unwrap().as_deref(),
            Some("https://fallback.example.com/")
        );

        m.publish_registry = Some(Url::parse("https://registry.yarnpkg.com").unwrap());
        check_already_published(&m, &lookup, Some(&fallback)).await.unwrap();
        assert_eq!(
            lookup.registry.lock().unwrap().as_deref(),
            Some("https://registry.yarnpkg.com/")
        );
    }
}
