//! docket server harness.
//!
//! Boots the configuration from a directory, then keeps the active snapshot
//! current: SIGHUP reloads the area and music lists, Ctrl-C exits.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use docket::config::load_engine_config;
use docket::lifecycle::{boot_from_dir, signals, Shutdown};
use docket::observability::logging::init_logging;
use docket::snapshot::SessionRoster;
use docket::SchemaRegistry;

#[derive(Parser)]
#[command(name = "docket")]
#[command(about = "Validate and serve courtroom server configuration", long_about = None)]
struct Cli {
    /// Engine configuration file (defaults to ./docket.toml when present).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the server documents.
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Validate, print the report and exit instead of serving.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config = load_engine_config(cli.config.as_deref())?;
    if let Some(dir) = cli.dir {
        config.documents.dir = dir;
    }
    init_logging(&config.observability);

    tracing::info!(dir = %config.documents.dir.display(), "docket v{} starting", env!("CARGO_PKG_VERSION"));

    let registry = SchemaRegistry::new().with_overrides(&config.documents.unknown_keys);
    let roster = Arc::new(SessionRoster::new());
    let manager = match boot_from_dir(&config.documents.dir, registry) {
        Ok(manager) => Arc::new(manager.with_roster(roster)),
        Err(e) => {
            eprintln!("{}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let active = manager.active();
    println!(
        "configuration valid: generation {}, {} area(s), {} track(s)",
        active.generation,
        active.areas.len(),
        active.music.track_count()
    );
    if cli.check {
        return Ok(ExitCode::SUCCESS);
    }

    let shutdown = Shutdown::new();
    let reloader = tokio::spawn(signals::reload_on_hangup(
        Arc::clone(&manager),
        config.documents.dir.clone(),
        shutdown.subscribe(),
    ));

    signals::shutdown_on_signal(&shutdown).await?;
    reloader.await??;

    tracing::info!(generation = manager.generation(), "Shutdown complete");
    Ok(ExitCode::SUCCESS)
}
