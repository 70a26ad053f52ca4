//! Snapshot subsystem.
//!
//! # Data Flow
//! ```text
//! reload(slot, raw text)
//!     → per-slot guard (one reload of a slot at a time)
//!     → parse + validate + resolve against the active companions
//!     → rejected: ReloadError, active snapshot untouched
//!     → accepted: rcu publish of generation + 1
//!     → roster.rs relocates clients of removed or moved areas
//!
//! readers: active() → Arc<ConfigSnapshot> (lock-free, immutable)
//! ```
//!
//! # Design Decisions
//! - Snapshots are never mutated; a reload builds a successor
//! - Unchanged entities are shared between generations through `Arc`
//! - Settings, backgrounds and gimp messages are fixed after startup

pub mod manager;
pub mod roster;
pub mod state;

pub use manager::{ReloadResult, Reloaded, SnapshotManager};
pub use roster::{ClientId, ClientRoster, Relocation, SessionRoster};
pub use state::{ConfigSnapshot, Provenance};
