//! Engine configuration subsystem.
//!
//! # Data Flow
//! ```text
//! docket.toml (optional)
//!     → loader.rs (read & deserialize)
//!     → EngineConfig (documents dir, unknown-key overrides, logging)
//!     → SchemaRegistry overrides + logging init
//!
//! documents dir
//!     → loader.rs locate/read (`<stem>.toml|yaml|yml`)
//!     → RawDocument tagged with its path
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Command-line flags override the file

pub mod loader;
pub mod schema;

pub use loader::{load_engine_config, locate, read_document, require};
pub use schema::{DocumentsConfig, EngineConfig, LogFormat, ObservabilityConfig};
