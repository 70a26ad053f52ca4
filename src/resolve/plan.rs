//! The ordered validation plan.
//!
//! ```text
//! settings ─┐
//! backgrounds ──▶ areas
//! gimp ─────┘
//! music
//! ```
//!
//! Documents validate independently in `VALIDATION_PLAN` order; cross rules
//! then run in `CROSS_RULES` order.

use crate::document::DocumentKind;
use crate::error::ReferenceError;
use crate::resolve::{rules, Context};

/// One document in the startup plan and the documents it references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub kind: DocumentKind,
    pub depends_on: &'static [DocumentKind],
}

pub const VALIDATION_PLAN: &[Step] = &[
    Step {
        kind: DocumentKind::Settings,
        depends_on: &[],
    },
    Step {
        kind: DocumentKind::Backgrounds,
        depends_on: &[],
    },
    Step {
        kind: DocumentKind::Gimp,
        depends_on: &[],
    },
    Step {
        kind: DocumentKind::Areas,
        depends_on: &[DocumentKind::Backgrounds],
    },
    Step {
        kind: DocumentKind::Music,
        depends_on: &[],
    },
];

/// Documents `kind` references.
pub fn dependencies(kind: DocumentKind) -> &'static [DocumentKind] {
    VALIDATION_PLAN
        .iter()
        .find(|step| step.kind == kind)
        .map_or(&[], |step| step.depends_on)
}

/// A cross-reference rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// `areas[i].background` names a catalog background.
    AreaBackgrounds,
    /// `areas[i].afk_sendto` is an existing area index.
    AreaAfkTarget,
    /// Reachability, visibility and scream lists name existing areas.
    AreaReachability,
}

pub const CROSS_RULES: &[Rule] = &[Rule::AreaBackgrounds, Rule::AreaAfkTarget, Rule::AreaReachability];

impl Rule {
    pub fn name(self) -> &'static str {
        match self {
            Rule::AreaBackgrounds => "area-backgrounds",
            Rule::AreaAfkTarget => "area-afk-target",
            Rule::AreaReachability => "area-reachability",
        }
    }

    /// Documents the rule reads.
    pub fn reads(self) -> &'static [DocumentKind] {
        match self {
            Rule::AreaBackgrounds => &[DocumentKind::Areas, DocumentKind::Backgrounds],
            Rule::AreaAfkTarget | Rule::AreaReachability => &[DocumentKind::Areas],
        }
    }

    pub fn apply(self, ctx: &Context<'_>) -> Vec<ReferenceError> {
        let Some(areas) = ctx.areas else {
            return Vec::new();
        };
        match self {
            Rule::AreaBackgrounds => match ctx.backgrounds {
                Some(catalog) => rules::area_backgrounds(self.name(), areas, catalog),
                None => Vec::new(),
            },
            Rule::AreaAfkTarget => rules::area_afk_targets(self.name(), areas),
            Rule::AreaReachability => rules::area_reachability(self.name(), areas),
        }
    }
}
