//! publishable - Checks whether an npm package can be published.
//!
//! CLI entry point.

use clap::Parser;
use publishable::{Config, ConsoleOutput, Manifest, PublishabilityChecker, RegistryQuery};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Set up logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config.verbose {
            EnvFilter::new("publishable=debug")
        } else {
            EnvFilter::new("publishable=off")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let console = ConsoleOutput::new(config.verbose);

    let result = match config.registry_lookup() {
        Ok(lookup) => run(&config, &console, lookup).await,
        Err(e) => Err(format!("Failed to set up registry lookup: {}", e)),
    };
    exit_code(result)
}

/// 0 when publishable, 1 for rejections and for anything that stopped the run.
fn exit_code(result: Result<bool, String>) -> ExitCode {
    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(message) => {
            error!("{}", message);
            ExitCode::FAILURE
        }
    }
}

async fn run(
    config: &Config,
    console: &ConsoleOutput,
    lookup: Arc<dyn RegistryQuery>,
) -> Result<bool, String> {
    let manifest = Manifest::load(&config.path)
        .map_err(|e| format!("Failed to load {}: {}", config.path.display(), e))?;

    let fallback_registry = config.fallback_registry().map_err(|e| e.to_string())?;

    let checker = PublishabilityChecker::new(lookup).with_fallback_registry(fallback_registry);
    let report = checker.check(&manifest).await;
    console.print_report(&report);

    debug!("Publishable: {}", report.is_publishable());
    Ok(report.is_publishable())
}
