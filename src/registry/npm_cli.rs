//! Registry lookup through the `npm` command line tool.

use crate::registry::normalize::reconcile;
use crate::registry::RegistryQuery;
use crate::types::LookupResult;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, trace};
use url::Url;

/// Runs `npm view --json -- <name> versions` and normalizes its output.
#[derive(Debug, Clone)]
pub struct NpmCliLookup {
    npm_path: PathBuf,
}

impl Default for NpmCliLookup {
    fn default() -> Self {
        Self::new("npm")
    }
}

impl NpmCliLookup {
    /// Create a lookup that invokes the given npm executable.
    pub fn new(npm_path: impl Into<PathBuf>) -> Self {
        Self {
            npm_path: npm_path.into(),
        }
    }

    /// Arguments passed to npm for a lookup.
    ///
    /// Options come first and the package name only after `--`, so a name
    /// starting with `-` is never read as an option.
    pub fn args(name: &str, registry: Option<&Url>) -> Vec<String> {
        let mut args = vec!["view".to_string(), "--json".to_string()];
        if let Some(registry) = registry {
            args.push("--registry".to_string());
            args.push(registry.to_string());
        }
        args.push("--".to_string());
        args.push(name.to_string());
        args.push("versions".to_string());
        args
    }
}

#[async_trait]
impl RegistryQuery for NpmCliLookup {
    async fn query_versions(&self, name: &str, registry: Option<&Url>) -> LookupResult {
        let args = Self::args(name, registry);
        trace!("Running {} {}", self.npm_path.display(), args.join(" "));

        let output = match Command::new(&self.npm_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                return LookupResult::Failed(format!(
                    "failed to run {}: {}",
                    self.npm_path.display(),
                    e
                ))
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("npm exited with {}", output.status);
        debug!("npm stdout: {}", stdout.trim());
        debug!("npm stderr: {}", stderr.trim());

        reconcile(&stdout, &stderr, output.status.success(), output.status.code())
    }
}
