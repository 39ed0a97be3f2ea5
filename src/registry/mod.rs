//! Registry lookup module.
//!
//! Answers "which versions of this package are already published?" through
//! the npm CLI or directly over HTTP, normalizing both into a
//! [`LookupResult`].

pub mod http;
pub mod normalize;
pub mod npm_cli;

pub use http::HttpLookup;
pub use normalize::{classify, reconcile, ChannelPayload};
pub use npm_cli::NpmCliLookup;

use crate::types::LookupResult;
use async_trait::async_trait;
use url::Url;

/// Default public npm registry.
pub const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org";

/// Capability to list the published versions of a package.
#[async_trait]
pub trait RegistryQuery: Send + Sync {
    /// Query `registry` (or the transport's default) for every published version of `name`.
    async fn query_versions(&self, name: &str, registry: Option<&Url>) -> LookupResult;
}

/// Percent-encode a package name for use as a single registry path segment.
///
/// `@scope/pkg` becomes `%40scope%2Fpkg`.
pub fn encode_package_path(name: &str) -> String {
    urlencoding::encode(name).into_owned()
}

/// Reverse [`encode_package_path`].
pub fn decode_package_path(path: &str) -> Option<String> {
    urlencoding::decode(path).ok().map(|s| s.into_owned())
}
