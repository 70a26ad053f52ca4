//! Cross-reference rule bodies.

use crate::document::{DocumentKind, FieldPath};
use crate::error::ReferenceError;
use crate::model::{AreaList, AreaSelector, BackgroundCatalog};

fn area_path(index: usize) -> FieldPath {
    FieldPath::root().key("areas").index(index)
}

fn sorted(names: impl Iterator<Item = impl Into<String>>) -> Vec<String> {
    let mut out: Vec<String> = names.map(Into::into).collect();
    out.sort();
    out
}

pub fn area_backgrounds(
    rule: &'static str,
    areas: &AreaList,
    catalog: &BackgroundCatalog,
) -> Vec<ReferenceError> {
    let mut candidates: Option<Vec<String>> = None;
    let mut errors = Vec::new();

    for (i, area) in areas.iter().enumerate() {
        if catalog.contains(&area.background) {
            continue;
        }
        let candidates = candidates.get_or_insert_with(|| sorted(catalog.names()));
        errors.push(ReferenceError {
            kind: DocumentKind::Areas,
            rule,
            path: area_path(i).key("background"),
            index: i,
            field: "background".to_string(),
            value: area.background.clone(),
            target: "background",
            candidates: candidates.clone(),
        });
    }
    errors
}

pub fn area_afk_targets(rule: &'static str, areas: &AreaList) -> Vec<ReferenceError> {
    areas
        .iter()
        .enumerate()
        .filter(|(_, area)| area.afk_sendto >= areas.len())
        .map(|(i, area)| ReferenceError {
            kind: DocumentKind::Areas,
            rule,
            path: area_path(i).key("afk_sendto"),
            index: i,
            field: "afk_sendto".to_string(),
            value: area.afk_sendto.to_string(),
            target: "area index",
            candidates: (0..areas.len()).map(|id| id.to_string()).collect(),
        })
        .collect()
}

pub fn area_reachability(rule: &'static str, areas: &AreaList) -> Vec<ReferenceError> {
    let names = areas.names();
    let candidates = sorted(names.iter().copied());
    let mut errors = Vec::new();

    for (i, area) in areas.iter().enumerate() {
        let lists = [
            ("reachable_areas", &area.reachable_areas, false),
            ("visible_areas", &area.visible_areas, true),
            ("scream_range", &area.scream_range, true),
        ];
        for (field, entries, allows_reachable) in lists {
            for (j, entry) in entries.iter().enumerate() {
                let known = match AreaSelector::parse(entry) {
                    AreaSelector::All => true,
                    AreaSelector::Reachable => allows_reachable,
                    AreaSelector::Named(name) => names.contains(name),
                };
                if known {
                    continue;
                }
                errors.push(ReferenceError {
                    kind: DocumentKind::Areas,
                    rule,
                    path: area_path(i).key(field).index(j),
                    index: i,
                    field: field.to_string(),
                    value: entry.clone(),
                    target: "area",
                    candidates: candidates.clone(),
                });
            }
        }
    }
    errors
}
