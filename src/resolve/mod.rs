//! Cross-reference resolution.
//!
//! # Responsibilities
//! - Check references between already-validated documents
//! - Run every rule in a fixed order so that output is stable across runs
//! - Report the dangling value together with every valid candidate
//!
//! # Design Decisions
//! - Dependencies between documents are explicit data (`plan.rs`), not flags
//! - A rule runs only when every document it reads is available; a document
//!   that failed its own validation silently disables the rules needing it
//! - Rules never mutate entities

pub mod plan;
pub mod rules;

use crate::document::DocumentKind;
use crate::error::ReferenceError;
use crate::model::{AreaList, BackgroundCatalog, MusicList};

pub use plan::{dependencies, Rule, CROSS_RULES, VALIDATION_PLAN};

/// Validated documents available to the rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct Context<'a> {
    pub backgrounds: Option<&'a BackgroundCatalog>,
    pub areas: Option<&'a AreaList>,
    pub music: Option<&'a MusicList>,
}

impl<'a> Context<'a> {
    fn has(&self, kind: DocumentKind) -> bool {
        match kind {
            DocumentKind::Backgrounds => self.backgrounds.is_some(),
            DocumentKind::Areas => self.areas.is_some(),
            DocumentKind::Music => self.music.is_some(),
            DocumentKind::Settings | DocumentKind::Gimp => true,
        }
    }
}

/// Run every applicable rule, in plan order.
pub fn resolve(ctx: &Context<'_>) -> Result<(), Vec<ReferenceError>> {
    run(CROSS_RULES.iter(), ctx)
}

/// Run only the rules that read `kind`, in plan order. Used on reload.
pub fn resolve_for(kind: DocumentKind, ctx: &Context<'_>) -> Result<(), Vec<ReferenceError>> {
    run(CROSS_RULES.iter().filter(|rule| rule.reads().contains(&kind)), ctx)
}

fn run<'r>(rules: impl Iterator<Item = &'r Rule>, ctx: &Context<'_>) -> Result<(), Vec<ReferenceError>> {
    let mut errors = Vec::new();
    for rule in rules {
        if rule.reads().iter().all(|kind| ctx.has(*kind)) {
            errors.extend(rule.apply(ctx));
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
