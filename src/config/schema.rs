//! Engine configuration schema.
//!
//! This is the engine's own configuration (where documents live, how strict
//! to be, how to log), not the server documents it validates. Every section
//! defaults, so an absent or empty `docket.toml` is valid.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::document::DocumentKind;
use crate::schema::UnknownKeyPolicy;

/// Root configuration for the engine.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Where the server documents are read from.
    pub documents: DocumentsConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Document location and strictness.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DocumentsConfig {
    /// Directory holding `config.*`, `backgrounds.*`, `gimp.*`, `areas.*`
    /// and `music.*`.
    pub dir: PathBuf,

    /// Unknown-key policy per document kind, overriding the built-in one.
    ///
    /// ```toml
    /// [documents.unknown_keys]
    /// areas = "reject"
    /// ```
    pub unknown_keys: HashMap<DocumentKind, UnknownKeyPolicy>,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("config"),
            unknown_keys: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level for the `docket` target when `RUST_LOG` is unset.
    pub log_level: String,

    /// Output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
