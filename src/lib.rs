//! publishable - Checks whether an npm package can be published.
//!
//! A manifest is publishable when:
//! - its name is valid (legacy names only produce warnings)
//! - `name@version` is not already on the registry
//! - it is not marked `"private": true`
//!
//! # Example
//!
//! ```no_run
//! use publishable::{Manifest, NpmCliLookup, PublishabilityChecker};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let manifest = Manifest::load(".").unwrap();
//!     let checker = PublishabilityChecker::new(Arc::new(NpmCliLookup::default()));
//!     let report = checker.check(&manifest).await;
//!     if !report.is_publishable() {
//!         eprintln!("{}", report.message());
//!     }
//! }
//! ```

pub mod checker;
pub mod checks;
pub mod config;
pub mod manifest;
pub mod notify;
pub mod registry;
pub mod types;
pub mod validate;

pub use checker::{PublishabilityChecker, Report};
pub use config::{Config, LookupKind};
pub use manifest::Manifest;
pub use notify::ConsoleOutput;
pub use registry::{HttpLookup, NpmCliLookup, RegistryQuery};
pub use types::{CheckOutcome, LookupResult, PublishableError, Rejection, Result};
pub use validate::{validate_package_name, NameValidation};
