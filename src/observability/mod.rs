//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! startup, reload, relocation:
//!     → logging.rs (structured events; reloads carry a `reload` span
//!       with a UUID v4 reload_id)
//!     → metrics.rs (counters, generation gauge)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
