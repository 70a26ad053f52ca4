//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     settings → backgrounds → gimp → areas → music
//!     → cross-reference rules → generation 1 or StartupError
//!
//! Signals (signals.rs):
//!     SIGHUP → reload area and music lists from disk
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     broadcast to every long-running task → exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: documents before the references between them
//! - Startup problems are fatal; reload problems never are

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{
    boot_from_dir, check_document, read_documents, startup, startup_report, CheckReport, StartupDocuments,
    StartupReport,
};
