//! OS signal handling.
//!
//! # Responsibilities
//! - SIGHUP: reload the area and music lists from their files
//! - Ctrl-C / SIGTERM: trigger graceful shutdown
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - A failed reload is logged and the server keeps running on the active
//!   snapshot
//! - SIGHUP triggers reload, never shutdown

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::broadcast;

use crate::config::loader::{read_document, require};
use crate::document::Slot;
use crate::lifecycle::shutdown::Shutdown;
use crate::snapshot::{ReloadResult, SnapshotManager};

/// Reload every slot from `dir`, in slot order.
pub async fn reload_from_dir(manager: &Arc<SnapshotManager>, dir: &Path) -> Vec<(Slot, ReloadResult)> {
    let mut outcomes = Vec::with_capacity(Slot::ALL.len());
    for slot in Slot::ALL {
        let raw = match require(dir, slot.kind()).and_then(|path| read_document(&path)) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(%slot, error = %e, "Reload skipped");
                continue;
            }
        };
        let result = ReloadResult::from(manager.reload_async(slot, raw).await);
        if result.success {
            tracing::info!(%slot, generation = result.generation, relocated = result.relocations.len(), "Slot reloaded");
        } else {
            tracing::error!(%slot, errors = result.errors.len(), "Slot reload rejected");
            for diag in &result.errors {
                tracing::error!(%slot, path = %diag.path, "{}", diag.message);
            }
        }
        outcomes.push((slot, result));
    }
    outcomes
}

/// Reload on every SIGHUP until shutdown.
#[cfg(unix)]
pub async fn reload_on_hangup(
    manager: Arc<SnapshotManager>,
    dir: PathBuf,
    mut shutdown: broadcast::Receiver<()>,
) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = signal(SignalKind::hangup())?;
    loop {
        tokio::select! {
            received = hangup.recv() => {
                if received.is_none() {
                    return Ok(());
                }
                tracing::info!(dir = %dir.display(), "SIGHUP received, reloading");
                reload_from_dir(&manager, &dir).await;
            }
            _ = shutdown.recv() => return Ok(()),
        }
    }
}

/// Without SIGHUP there is nothing to wait for but shutdown.
#[cfg(not(unix))]
pub async fn reload_on_hangup(
    _manager: Arc<SnapshotManager>,
    _dir: PathBuf,
    mut shutdown: broadcast::Receiver<()>,
) -> std::io::Result<()> {
    let _ = shutdown.recv().await;
    Ok(())
}

/// Wait for Ctrl-C (or SIGTERM on unix), then trigger `shutdown`.
pub async fn shutdown_on_signal(shutdown: &Shutdown) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result?,
            _ = terminate.recv() => {}
        }
    }
    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    tracing::info!("Shutdown signal received");
    shutdown.trigger();
    Ok(())
}
