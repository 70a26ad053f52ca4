//! Document subsystem.
//!
//! # Data Flow
//! ```text
//! raw text + DocumentKind + Format
//!     → parser.rs (TOML or YAML front-end)
//!     → tree.rs (generic Node tree, duplicate keys rejected)
//!     → validation (per-kind schema walk)
//! ```
//!
//! # Design Decisions
//! - The tree is format-agnostic: both front-ends deserialize into the same `Node`
//! - Parsing has no side effects and never consults other documents
//! - Documents are identified by a kind tag, never by file name

pub mod parser;
pub mod path;
pub mod tree;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub use parser::{parse, parse_raw};
pub use path::FieldPath;
pub use tree::Node;

/// The five document types the server is configured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Settings,
    Backgrounds,
    Gimp,
    Areas,
    Music,
}

impl DocumentKind {
    /// Every kind, in startup dependency order.
    pub const ALL: [DocumentKind; 5] = [
        DocumentKind::Settings,
        DocumentKind::Backgrounds,
        DocumentKind::Gimp,
        DocumentKind::Areas,
        DocumentKind::Music,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DocumentKind::Settings => "settings",
            DocumentKind::Backgrounds => "backgrounds",
            DocumentKind::Gimp => "gimp",
            DocumentKind::Areas => "areas",
            DocumentKind::Music => "music",
        }
    }

    /// File stem looked up when booting from a configuration directory.
    pub fn file_stem(self) -> &'static str {
        match self {
            DocumentKind::Settings => "config",
            other => other.name(),
        }
    }

    /// Human-readable description used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            DocumentKind::Settings => "server settings",
            DocumentKind::Backgrounds => "background list",
            DocumentKind::Gimp => "gimp message list",
            DocumentKind::Areas => "area list",
            DocumentKind::Music => "music list",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "settings" | "config" => Ok(DocumentKind::Settings),
            "backgrounds" => Ok(DocumentKind::Backgrounds),
            "gimp" => Ok(DocumentKind::Gimp),
            "areas" => Ok(DocumentKind::Areas),
            "music" => Ok(DocumentKind::Music),
            other => Err(format!("unknown document kind `{}`", other)),
        }
    }
}

/// Documents that may be replaced while clients stay connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Areas,
    Music,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::Areas, Slot::Music];

    pub fn kind(self) -> DocumentKind {
        match self {
            Slot::Areas => DocumentKind::Areas,
            Slot::Music => DocumentKind::Music,
        }
    }

    pub fn name(self) -> &'static str {
        self.kind().name()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Surface syntax of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Toml,
    Yaml,
}

impl Format {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Format> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "toml" => Some(Format::Toml),
            "yaml" | "yml" => Some(Format::Yaml),
            _ => None,
        }
    }

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Format::Toml => &["toml"],
            Format::Yaml => &["yaml", "yml"],
        }
    }
}

/// Raw document text as handed over by the file-loading collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub text: String,
    pub format: Format,
    /// Where the text came from, if anywhere (e.g. a file path).
    pub source: Option<String>,
}

impl RawDocument {
    pub fn new(text: impl Into<String>, format: Format) -> Self {
        Self {
            text: text.into(),
            format,
            source: None,
        }
    }

    pub fn toml(text: impl Into<String>) -> Self {
        Self::new(text, Format::Toml)
    }

    pub fn yaml(text: impl Into<String>) -> Self {
        Self::new(text, Format::Yaml)
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_path(Path::new("config/areas.yaml")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("music.YML")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("config.toml")), Some(Format::Toml));
        assert_eq!(Format::from_path(Path::new("notes.txt")), None);
        assert_eq!(Format::from_path(Path::new("areas")), None);
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("config".parse::<DocumentKind>().unwrap(), DocumentKind::Settings);
        assert_eq!("music".parse::<DocumentKind>().unwrap(), DocumentKind::Music);
        assert!("characters".parse::<DocumentKind>().is_err());
        assert_eq!(DocumentKind::Settings.file_stem(), "config");
        assert_eq!(Slot::Areas.kind(), DocumentKind::Areas);
    }
}
