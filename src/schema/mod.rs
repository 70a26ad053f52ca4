//! Schema registry subsystem.
//!
//! # Responsibilities
//! - Describe the expected shape of every document kind as static data
//! - Required keys, optional keys with defaults, scalar types, bounds, choices
//! - Minimum length and uniqueness key for sequence documents
//! - Per-document unknown-key policy (warn or reject), overridable at runtime
//!
//! # Design Decisions
//! - Schemas are `'static` and `Copy`; looking one up never allocates
//! - No behavior lives here beyond lookup; the validator interprets the data

pub mod documents;
pub mod registry;

use serde::{Deserialize, Serialize};

use crate::document::DocumentKind;

pub use registry::SchemaRegistry;

/// What to do with keys a record does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownKeyPolicy {
    /// Report a warning and ignore the key.
    Warn,
    /// Report a validation error.
    Reject,
}

/// Unknown-key policy of a single record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordPolicy {
    /// Follow the document-level policy.
    Inherit,
    /// Always apply this policy, whatever the document says.
    Fixed(UnknownKeyPolicy),
}

/// Constraints on text values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRule {
    NonEmpty,
    /// No leading `%` and no `#`; both break the client wire protocol.
    ProtocolSafe,
    /// No `.` or `..` path component.
    NoRelativePath,
    NotReserved(&'static [&'static str]),
    NoSpaces,
    NoPipe,
}

/// Expected type of a single field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text(&'static [TextRule]),
    /// Text, or an integer taken as its decimal text.
    Name(&'static [TextRule]),
    Integer { min: i64, max: i64 },
    /// Integer or floating point.
    Number { min: f64 },
    Boolean,
    Choice(&'static [&'static str]),
    /// Sequence of texts, or one comma-separated text.
    TextList(&'static [TextRule]),
    /// Mapping of text to text.
    TextMap {
        key_rules: &'static [TextRule],
        value_rules: &'static [TextRule],
    },
    Record(&'static RecordSpec),
    List(&'static ListSpec),
}

/// Value filled in when an optional field is absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(&'static str),
    TextList(&'static [&'static str]),
    EmptyMap,
    /// Validate an empty mapping against the nested record, filling its defaults.
    EmptyRecord,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Presence {
    Required,
    /// May be absent; stays absent.
    Optional,
    Default(DefaultValue),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub kind: FieldKind,
    pub presence: Presence,
}

impl FieldSpec {
    pub const fn required(key: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            kind,
            presence: Presence::Required,
        }
    }

    pub const fn optional(key: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            kind,
            presence: Presence::Optional,
        }
    }

    pub const fn defaulted(key: &'static str, kind: FieldKind, default: DefaultValue) -> Self {
        Self {
            key,
            kind,
            presence: Presence::Default(default),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordSpec {
    pub fields: &'static [FieldSpec],
    pub unknown_keys: RecordPolicy,
    /// Keys that used to exist, with the hint shown when they are used.
    pub removed: &'static [(&'static str, &'static str)],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uniqueness {
    None,
    /// Scalar items must be distinct.
    Value,
    /// Record items must be distinct on this key.
    Key(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListSpec {
    pub item: FieldKind,
    pub min_len: usize,
    pub unique: Uniqueness,
}

/// Top-level shape of a document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Record(&'static RecordSpec),
    /// A sequence held under `root_key` of the root table. A bare root
    /// sequence is accepted as shorthand.
    List {
        root_key: &'static str,
        list: &'static ListSpec,
    },
}

/// Everything the validator needs to check one document kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Schema {
    pub kind: DocumentKind,
    pub shape: Shape,
    pub unknown_keys: UnknownKeyPolicy,
}

impl Schema {
    /// Effective policy of a record inside this document.
    pub fn policy_for(&self, record: &RecordSpec) -> UnknownKeyPolicy {
        match record.unknown_keys {
            RecordPolicy::Inherit => self.unknown_keys,
            RecordPolicy::Fixed(policy) => policy,
        }
    }
}
