//! Configuration validation and hot-reload engine for a courtroom-roleplay
//! game server.
//!
//! # Architecture Overview
//!
//! ```text
//!   raw text ──▶ document ──▶ validation ──▶ resolve ──▶ snapshot
//!   (toml/yaml)  (Node tree)  (schema walk,  (cross-doc   (ArcSwap, generation,
//!                              typed entity)  references)  client relocation)
//!                     ▲             ▲
//!                     │             │
//!                   error        schema
//!
//!   lifecycle: startup (all documents, fatal) / signals (SIGHUP reload)
//!   config + observability: engine settings, tracing, metrics
//! ```

// Core subsystems
pub mod document;
pub mod model;
pub mod resolve;
pub mod schema;
pub mod snapshot;
pub mod validation;

// Cross-cutting concerns
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod observability;

pub use config::EngineConfig;
pub use document::{DocumentKind, Format, RawDocument, Slot};
pub use error::{BootError, LoadError, Problem, ReloadError, StartupError};
pub use lifecycle::{startup, Shutdown, StartupDocuments};
pub use schema::SchemaRegistry;
pub use snapshot::{ConfigSnapshot, ReloadResult, SnapshotManager};
