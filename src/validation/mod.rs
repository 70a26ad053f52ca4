//! Validation subsystem.
//!
//! # Data Flow
//! ```text
//! Node tree + Schema
//!     → walker.rs (structural checks, defaults, normalization)
//!     → serde (typed entity)
//!     → rules.rs (per-document semantic checks)
//!     → Validated<T> { entity, warnings }
//! ```
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function of the tree and the schema
//! - Booleans accept only true/false; integers reject fractional values
//! - Unknown keys warn or fail according to the schema's policy

pub mod rules;
pub mod walker;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::document::{self, DocumentKind, FieldPath, Node, RawDocument};
use crate::error::{Problem, ValidationError, ValidationWarning};
use crate::schema::{Schema, SchemaRegistry};

pub use walker::split_list;

/// A typed document entity.
pub trait Document: DeserializeOwned + Serialize + Sized {
    const KIND: DocumentKind;

    /// Checks that span several fields of the same document.
    fn semantic_errors(&self) -> Vec<ValidationError> {
        Vec::new()
    }

    /// Observations worth reporting that do not reject the document.
    fn semantic_warnings(&self) -> Vec<ValidationWarning> {
        Vec::new()
    }
}

/// A validated entity and the warnings raised while validating it.
#[derive(Debug, Clone)]
pub struct Validated<T> {
    pub entity: T,
    pub warnings: Vec<ValidationWarning>,
}

/// Everything learned from one document, kept even when it is rejected.
#[derive(Debug, Clone)]
pub struct Inspection<T> {
    /// The typed entity, present only when `problems` is empty.
    pub entity: Option<T>,
    pub problems: Vec<Problem>,
    pub warnings: Vec<ValidationWarning>,
}

impl<T> Inspection<T> {
    fn rejected(problems: Vec<Problem>, warnings: Vec<ValidationWarning>) -> Self {
        Self {
            entity: None,
            problems,
            warnings,
        }
    }
}

/// Validate a parsed tree against a schema and build the typed entity.
pub fn validate<T: Document>(tree: &Node, schema: &Schema) -> Result<Validated<T>, Vec<ValidationError>> {
    let checked = walker::check(tree, schema)?;
    let entity = build::<T>(checked.value, schema)?;
    let mut warnings = checked.warnings;
    warnings.extend(entity.semantic_warnings());
    Ok(Validated { entity, warnings })
}

/// Parse, validate and report on raw text in one pass.
pub fn inspect<T: Document>(raw: &RawDocument, registry: &SchemaRegistry) -> Inspection<T> {
    let tree = match document::parse_raw(raw, T::KIND) {
        Ok(tree) => tree,
        Err(e) => return Inspection::rejected(vec![Problem::from(e)], Vec::new()),
    };
    let schema = registry.schema(T::KIND);
    let walked = walker::walk(&tree, &schema);
    let mut warnings = walked.warnings;
    if !walked.errors.is_empty() {
        return Inspection::rejected(problems(walked.errors), warnings);
    }
    match build::<T>(walked.value, &schema) {
        Ok(entity) => {
            warnings.extend(entity.semantic_warnings());
            Inspection {
                entity: Some(entity),
                problems: Vec::new(),
                warnings,
            }
        }
        Err(errors) => Inspection::rejected(problems(errors), warnings),
    }
}

/// Parse and validate raw text in one step.
pub fn load<T: Document>(raw: &RawDocument, registry: &SchemaRegistry) -> Result<Validated<T>, Vec<Problem>> {
    let inspection = inspect::<T>(raw, registry);
    match inspection.entity {
        Some(entity) => Ok(Validated {
            entity,
            warnings: inspection.warnings,
        }),
        None => Err(inspection.problems),
    }
}

/// Typed entity from a normalized value, then the document's own rules.
fn build<T: Document>(value: serde_json::Value, schema: &Schema) -> Result<T, Vec<ValidationError>> {
    debug_assert_eq!(schema.kind, T::KIND);

    let entity: T = serde_json::from_value(value).map_err(|e| {
        vec![ValidationError::new(
            schema.kind,
            FieldPath::root(),
            format!("a {} document", schema.kind.describe()),
            e.to_string(),
        )]
    })?;

    let errors = entity.semantic_errors();
    if errors.is_empty() {
        Ok(entity)
    } else {
        Err(errors)
    }
}

fn problems(errors: Vec<ValidationError>) -> Vec<Problem> {
    errors.into_iter().map(Problem::from).collect()
}
