//! Schema lookup with per-document policy overrides.

use std::collections::HashMap;

use crate::document::DocumentKind;
use crate::schema::{documents, Schema, UnknownKeyPolicy};

/// Lookup of document schemas by kind.
///
/// Starts from the built-in schemas; operators may tighten (or relax) the
/// unknown-key policy of individual documents.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    overrides: HashMap<DocumentKind, UnknownKeyPolicy>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the document-level unknown-key policy of one kind.
    pub fn with_unknown_keys(mut self, kind: DocumentKind, policy: UnknownKeyPolicy) -> Self {
        self.overrides.insert(kind, policy);
        self
    }

    /// Apply every override from a map, e.g. the engine configuration.
    pub fn with_overrides(mut self, overrides: &HashMap<DocumentKind, UnknownKeyPolicy>) -> Self {
        self.overrides
            .extend(overrides.iter().map(|(kind, policy)| (*kind, *policy)));
        self
    }

    pub fn schema(&self, kind: DocumentKind) -> Schema {
        let mut schema = documents::builtin(kind);
        if let Some(policy) = self.overrides.get(&kind) {
            schema.unknown_keys = *policy;
        }
        schema
    }
}
