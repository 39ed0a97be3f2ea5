//! Loading and normalizing `package.json` manifests.

use crate::types::{PublishableError, Result};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use url::Url;

/// File name looked up when the manifest path is a directory.
pub const MANIFEST_FILE: &str = "package.json";

/// The subset of a package manifest the checks care about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub name: Option<String>,
    pub version: Option<String>,
    pub private: Option<bool>,
    /// `publishConfig.registry`, if declared.
    pub publish_registry: Option<Url>,
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    name: Option<String>,
    version: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    private: Option<bool>,
    #[serde(rename = "publishConfig")]
    publish_config: Option<RawPublishConfig>,
}

#[derive(Debug, Deserialize)]
struct RawPublishConfig {
    registry: Option<String>,
}

/// Accept only real JSON booleans; anything else counts as absent.
fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_bool())
}

impl Manifest {
    /// Load a manifest from a directory (reading its `package.json`) or a file path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = resolve_manifest_path(path.as_ref());
        debug!("Reading manifest: {}", file.display());

        let content = std::fs::read_to_string(&file)?;
        Self::parse(&content)
    }

    /// Parse and normalize manifest JSON.
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawManifest = serde_json::from_str(content)?;

        let version = raw.version.map(|v| normalize_version(&v)).transpose()?;

        let publish_registry = match raw.publish_config.and_then(|c| c.registry) {
            Some(registry) => Some(Url::parse(registry.trim())?),
            None => None,
        };

        let manifest = Self {
            name: raw.name,
            version,
            private: raw.private,
            publish_registry,
        };
        trace!("Loaded manifest: {:?}", manifest);
        Ok(manifest)
    }
}

/// A directory resolves to its `package.json`; anything else is used as-is.
pub fn resolve_manifest_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(MANIFEST_FILE)
    } else {
        path.to_path_buf()
    }
}

/// Clean a version string (`" v1.2.3+build "` -> `"1.2.3"`) and require valid semver.
pub fn normalize_version(version: &str) -> Result<String> {
    let trimmed = version.trim();
    let cleaned = trimmed
        .strip_prefix('=')
        .or_else(|| trimmed.strip_prefix('v'))
        .unwrap_or(trimmed)
        .trim_start();

    // Registries never store build metadata
    semver::Version::parse(cleaned)
        .map(|mut v| {
            v.build = semver::BuildMetadata::EMPTY;
            v.to_string()
        })
        .map_err(|e| PublishableError::InvalidVersion(format!("{}: {}", version, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_full_manifest() {
        let manifest = Manifest::parse(
            r#"{
                "name": "@scope/pkg",
                "version": "1.2.3",
                "private": false,
                "publishConfig": { "registry": "https://registry.yarnpkg.com" }
            }"#,
        )
        .unwrap();

        assert_eq!(manifest.name.as_deref(), Some("@scope/pkg"));
        assert_eq!(manifest.version.as_deref(), Some("1.2.3"));
        assert_eq!(manifest.private, Some(false));
        assert_eq!(
            manifest.publish_registry.map(|u| u.to_string()),
            Some("https://registry.yarnpkg.com/".to_string())
        );
    }

    #[test]
    fn test_missing_fields_are_none() {
        let manifest = Manifest::parse("{}").unwrap();
        assert_eq!(manifest, Manifest::default());
    }

    #[test]
    fn test_private_must_be_boolean() {
        let manifest = Manifest::parse(r#"{"private": "true"}"#).unwrap();
        assert_eq!(manifest.private, None);

        let manifest = Manifest::parse(r#"{"private": true}"#).unwrap();
        assert_eq!(manifest.private, Some(true));
    }

    #[test]
    fn test_normalize_version() {
        assert_eq!(normalize_version("1.0.0").unwrap(), "1.0.0");
        assert_eq!(normalize_version(" v2.0.0 ").unwrap(), "2.0.0");
        assert_eq!(normalize_version("=3.1.0-beta.1").unwrap(), "3.1.0-beta.1");
        assert!(normalize_version("latest").is_err());
        assert!(Manifest::parse(r#"{"version": "1.0"}"#).is_err());
    }

    #[test]
    fn test_normalize_version_drops_build_metadata() {
        assert_eq!(normalize_version("1.0.0+build.5").unwrap(), "1.0.0");
        assert_eq!(normalize_version("v2.1.0-rc.1+sha.abc").unwrap(), "2.1.0-rc.1");

        let manifest = Manifest::parse(r#"{"version": "1.0.0+build.5"}"#).unwrap();
        assert_eq!(manifest.version.as_deref(), Some("1.0.0"));
    }

    #[test]
    fn test_invalid_registry_url() {
        let result = Manifest::parse(r#"{"publishConfig": {"registry": "not a url"}}"#);
        assert!(matches!(result, Err(PublishableError::UrlError(_))));
    }

    #[test]
    fn test_load_from_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(MANIFEST_FILE);
        fs::write(&file, r#"{"name": "pkg", "version": "1.0.0"}"#).unwrap();

        let from_dir = Manifest::load(dir.path()).unwrap();
        let from_file = Manifest::load(&file).unwrap();
        assert_eq!(from_dir, from_file);
        assert_eq!(from_dir.name.as_deref(), Some("pkg"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Manifest::load(dir.path());
        assert!(matches!(result, Err(PublishableError::IoError(_))));
    }
}
