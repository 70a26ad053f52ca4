//! Error taxonomy.
//!
//! # Categories
//! - `SyntaxError`: the text is not well-formed structured data
//! - `ValidationError`: a value violates its document's schema
//! - `ReferenceError`: a value names an entity another document does not define
//! - `StartupError`: every problem found at boot (fatal)
//! - `ReloadError`: every problem found by a rejected reload (recoverable)
//! - `LoadError`: I/O trouble reading a document, kept apart from document problems
//!
//! # Design Decisions
//! - Parser, validator and resolver return problem collections, never panic
//! - Every problem carries the document kind and a field path so that the
//!   aggregated reports stay readable when several documents fail at once

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::document::{DocumentKind, FieldPath, Slot};

/// 1-based position in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    /// Convert a byte offset into a line/column pair.
    pub fn from_offset(text: &str, offset: usize) -> Self {
        let offset = offset.min(text.len());
        let before = &text.as_bytes()[..offset];
        let line = before.iter().filter(|b| **b == b'\n').count() + 1;
        let line_start = before.iter().rposition(|b| *b == b'\n').map_or(0, |p| p + 1);
        let column = String::from_utf8_lossy(&before[line_start..]).chars().count() + 1;
        Self { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} column {}", self.line, self.column)
    }
}

/// Malformed document text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{kind}: syntax error{}: {message}", at(.location))]
pub struct SyntaxError {
    pub kind: DocumentKind,
    pub location: Option<Location>,
    pub message: String,
}

fn at(location: &Option<Location>) -> String {
    location.map(|loc| format!(" at {}", loc)).unwrap_or_default()
}

/// A schema violation at one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{kind}: {path}: expected {expected}, found {actual}")]
pub struct ValidationError {
    pub kind: DocumentKind,
    pub path: FieldPath,
    /// The constraint that was violated.
    pub expected: String,
    /// What the document actually contained.
    pub actual: String,
}

impl ValidationError {
    pub fn new(
        kind: DocumentKind,
        path: FieldPath,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            path,
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// A non-fatal observation, such as an unknown key under the warn policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationWarning {
    pub kind: DocumentKind,
    pub path: FieldPath,
    pub message: String,
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.kind, self.path, self.message)
    }
}

/// Candidates shown before the list is cut short.
const SHOWN_CANDIDATES: usize = 10;

/// A dangling reference from one entity to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{kind}: {path}: `{value}` does not name a known {target} {}", valid(.candidates))]
pub struct ReferenceError {
    pub kind: DocumentKind,
    /// Name of the cross-reference rule that failed.
    pub rule: &'static str,
    pub path: FieldPath,
    /// Position of the referring entity in its list.
    pub index: usize,
    pub field: String,
    /// The reference that did not resolve.
    pub value: String,
    /// What the reference is supposed to name ("background", "area").
    pub target: &'static str,
    /// Every valid value, sorted.
    pub candidates: Vec<String>,
}

fn valid(candidates: &[String]) -> String {
    if candidates.is_empty() {
        return "(none are defined)".to_string();
    }
    let shown: Vec<&str> = candidates.iter().take(SHOWN_CANDIDATES).map(String::as_str).collect();
    match candidates.len().checked_sub(SHOWN_CANDIDATES) {
        Some(more) if more > 0 => format!("(valid: {}, and {} more)", shown.join(", "), more),
        _ => format!("(valid: {})", shown.join(", ")),
    }
}

/// Any expected problem with a document's contents.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Problem {
    #[error("{0}")]
    Syntax(SyntaxError),
    #[error("{0}")]
    Validation(ValidationError),
    #[error("{0}")]
    Reference(ReferenceError),
}

impl Problem {
    pub fn kind(&self) -> DocumentKind {
        match self {
            Problem::Syntax(e) => e.kind,
            Problem::Validation(e) => e.kind,
            Problem::Reference(e) => e.kind,
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            Problem::Syntax(_) => "syntax",
            Problem::Validation(_) => "validation",
            Problem::Reference(_) => "reference",
        }
    }

    /// Field path, or the source location for syntax errors.
    pub fn path(&self) -> String {
        match self {
            Problem::Syntax(e) => e
                .location
                .map(|loc| loc.to_string())
                .unwrap_or_else(|| FieldPath::root().to_string()),
            Problem::Validation(e) => e.path.to_string(),
            Problem::Reference(e) => e.path.to_string(),
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Problem::Reference(_))
    }

    pub fn diagnostic(&self) -> Diagnostic {
        Diagnostic {
            document: self.kind(),
            category: self.category(),
            path: self.path(),
            message: self.to_string(),
        }
    }
}

impl From<SyntaxError> for Problem {
    fn from(e: SyntaxError) -> Self {
        Problem::Syntax(e)
    }
}

impl From<ValidationError> for Problem {
    fn from(e: ValidationError) -> Self {
        Problem::Validation(e)
    }
}

impl From<ReferenceError> for Problem {
    fn from(e: ReferenceError) -> Self {
        Problem::Reference(e)
    }
}

/// Flat `{path, message}` form of a problem handed to collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub document: DocumentKind,
    pub category: &'static str,
    pub path: String,
    pub message: String,
}

/// "N problem(s):" followed by one indented line per problem.
fn listing(problems: &[Problem]) -> String {
    let mut out = format!("{} problem(s):", problems.len());
    for problem in problems {
        out.push_str("\n  - ");
        out.push_str(&problem.to_string());
    }
    out
}

/// Every problem found while booting. Fatal.
#[derive(Debug, Clone, Error)]
#[error("configuration rejected at startup with {}", listing(.problems))]
pub struct StartupError {
    pub problems: Vec<Problem>,
}

impl StartupError {
    /// Problems belonging to one document.
    pub fn for_kind(&self, kind: DocumentKind) -> impl Iterator<Item = &Problem> {
        self.problems.iter().filter(move |p| p.kind() == kind)
    }
}

/// Every problem found by a rejected reload. The active snapshot is untouched.
#[derive(Debug, Clone, Error)]
#[error("{slot} reload rejected with {}", listing(.problems))]
pub struct ReloadError {
    pub slot: Slot,
    /// Generation that stayed active.
    pub generation: u64,
    pub problems: Vec<Problem>,
}

/// Failure to obtain a document's text.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot tell the format of {} (expected .toml, .yaml or .yml)", .path.display())]
    UnknownFormat { path: PathBuf },

    #[error("no {kind} document `{stem}.*` found in {}", .dir.display())]
    Missing {
        kind: DocumentKind,
        stem: &'static str,
        dir: PathBuf,
    },

    #[error("failed to parse engine configuration {}: {source}", .path.display())]
    EngineConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Outcome of booting from disk: either the files could not be read, or
/// they were read and rejected.
#[derive(Debug, Error)]
pub enum BootError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Startup(#[from] StartupError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_from_offset() {
        let text = "a = 1\nbb = 2\nccc";
        assert_eq!(Location::from_offset(text, 0), Location { line: 1, column: 1 });
        assert_eq!(Location::from_offset(text, 6), Location { line: 2, column: 1 });
        assert_eq!(Location::from_offset(text, 9), Location { line: 2, column: 4 });
        assert_eq!(Location::from_offset(text, 999), Location { line: 3, column: 4 });
    }

    #[test]
    fn test_reference_display_truncates_candidates() {
        let err = ReferenceError {
            kind: DocumentKind::Areas,
            rule: "area-backgrounds",
            path: FieldPath::root().key("areas").index(0).key("background"),
            index: 0,
            field: "background".to_string(),
            value: "missing_bg".to_string(),
            target: "background",
            candidates: (0..12).map(|i| format!("bg{:02}", i)).collect(),
        };
        let text = err.to_string();
        assert!(text.starts_with("areas: areas[0].background: `missing_bg` does not name a known background"));
        assert!(text.contains("bg09"));
        assert!(!text.contains("bg10"));
        assert!(text.ends_with("and 2 more)"));
    }

    #[test]
    fn test_problem_diagnostic() {
        let problem = Problem::from(ValidationError::new(
            DocumentKind::Settings,
            FieldPath::root().key("port"),
            "integer in 1..=65535",
            "integer 0",
        ));
        let diag = problem.diagnostic();
        assert_eq!(diag.path, "port");
        assert_eq!(diag.category, "validation");
        assert_eq!(diag.message, "settings: port: expected integer in 1..=65535, found integer 0");
    }
}
