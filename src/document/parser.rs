//! Document parsing.
//!
//! # Responsibilities
//! - Turn raw TOML or YAML text into a generic [`Node`] tree
//! - Reject duplicate keys in any mapping
//! - Report the offending line/column when the format provides one
//!
//! # Design Decisions
//! - Pure function: no I/O, no logging, no knowledge of other documents
//! - Messages drop the format crates' own location suffixes; the location
//!   travels separately in `SyntaxError::location`

use crate::document::{DocumentKind, Format, Node, RawDocument};
use crate::error::{Location, SyntaxError};

/// Parse a document's text into a generic tree.
pub fn parse(text: &str, kind: DocumentKind, format: Format) -> Result<Node, SyntaxError> {
    match format {
        Format::Toml => parse_toml(text, kind),
        Format::Yaml => parse_yaml(text, kind),
    }
}

/// Parse a [`RawDocument`].
pub fn parse_raw(raw: &RawDocument, kind: DocumentKind) -> Result<Node, SyntaxError> {
    parse(&raw.text, kind, raw.format)
}

fn parse_toml(text: &str, kind: DocumentKind) -> Result<Node, SyntaxError> {
    toml::from_str::<Node>(text).map_err(|e| SyntaxError {
        kind,
        location: e.span().map(|span| Location::from_offset(text, span.start)),
        message: e.message().trim().to_string(),
    })
}

fn parse_yaml(text: &str, kind: DocumentKind) -> Result<Node, SyntaxError> {
    if text.trim().is_empty() {
        return Ok(Node::Null);
    }
    serde_yaml::from_str::<Node>(text).map_err(|e| {
        let message = strip_yaml_location(&e.to_string());
        let mut location = e.location().map(|loc| Location {
            line: loc.line(),
            column: loc.column(),
        });
        // Duplicate keys are reported at the enclosing mapping.
        if let (Some(start), Some(key)) = (location, duplicate_key(&message)) {
            location = Some(second_occurrence(text, start, key).unwrap_or(start));
        }
        SyntaxError {
            kind,
            location,
            message,
        }
    })
}

/// Key named by a "duplicate key `x`" message.
fn duplicate_key(message: &str) -> Option<&str> {
    let rest = &message[message.find("duplicate key `")? + "duplicate key `".len()..];
    rest.find('`').map(|end| &rest[..end])
}

/// Second line of a block mapping starting at `start` that defines `key`.
fn second_occurrence(text: &str, start: Location, key: &str) -> Option<Location> {
    let indent = start.column.checked_sub(1)?;
    let mut seen = 0;
    for (i, line) in text.lines().enumerate().skip(start.line.checked_sub(1)?) {
        let first = i + 1 == start.line;
        let lead = line.len() - line.trim_start_matches(' ').len();
        let body = line.trim();
        if body.is_empty() || body.starts_with('#') {
            continue;
        }
        if !first && lead < indent {
            break;
        }
        if lead != indent && !first {
            continue;
        }
        let Some(entry) = line.get(indent..) else {
            continue;
        };
        if defines_key(entry, key) {
            seen += 1;
            if seen == 2 {
                return Some(Location {
                    line: i + 1,
                    column: start.column,
                });
            }
        }
    }
    None
}

fn defines_key(entry: &str, key: &str) -> bool {
    [key.to_string(), format!("\"{}\"", key), format!("'{}'", key)]
        .iter()
        .any(|form| {
            entry
                .strip_prefix(form.as_str())
                .is_some_and(|rest| rest.trim_start().starts_with(':'))
        })
}

/// `serde_yaml` appends " at line X column Y" to its messages.
fn strip_yaml_location(message: &str) -> String {
    match message.find(" at line ") {
        Some(pos) => message[..pos].to_string(),
        None => message.to_string(),
    }
}
