//! Connected-client area assignments.
//!
//! The session layer owns the real client list; it is reached through the
//! `ClientRoster` trait so that an accepted area reload can move clients
//! whose area disappeared or changed index. The moves and the publish of the
//! new area list happen in one step the roster controls.

use std::sync::{Arc, PoisonError, RwLock};

use dashmap::DashMap;
use serde::Serialize;

use crate::model::AreaList;

/// Area every client of a removed area is sent to.
pub const FALLBACK_AREA: usize = 0;

/// Identifier the session layer gives a connected client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ClientId(pub u32);

/// Current area assignment of every connected client.
pub trait ClientRoster: Send + Sync {
    /// Snapshot of `(client, area index)` pairs.
    fn assignments(&self) -> Vec<(ClientId, usize)>;

    /// Switch every client over to a new area list.
    ///
    /// Implementations keep their clients still for the whole call: pass the
    /// current assignments to `plan`, apply the returned moves, call
    /// `publish` (which makes the new snapshot visible and returns its
    /// generation), and only then let readers and joins through again.
    /// Returns the moves applied.
    fn switch_areas(
        &self,
        plan: &dyn Fn(&[(ClientId, usize)]) -> Vec<Relocation>,
        publish: &mut dyn FnMut() -> u64,
    ) -> Vec<Relocation>;
}

/// A client moved by a reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relocation {
    pub client: ClientId,
    pub from: usize,
    pub to: usize,
    /// The area the client was in was removed.
    pub removed: bool,
}

/// Work out where every client goes when `old` is replaced by `new`.
///
/// A client whose area name still exists follows it to its new index; any
/// other client goes to `FALLBACK_AREA`. Clients that stay put are omitted.
pub fn plan_relocations(old: &AreaList, new: &AreaList, assignments: &[(ClientId, usize)]) -> Vec<Relocation> {
    let mut moves: Vec<Relocation> = assignments
        .iter()
        .filter_map(|&(client, from)| {
            let target = old.get(from).and_then(|area| new.index_of(&area.name));
            let to = target.unwrap_or(FALLBACK_AREA);
            (to != from || target.is_none()).then_some(Relocation {
                client,
                from,
                to,
                removed: target.is_none(),
            })
        })
        .collect();
    moves.sort_by_key(|m| m.client);
    moves
}

/// In-process roster backed by a concurrent map.
///
/// Joins and lookups share a gate that an area switch holds exclusively, so
/// every placement read is tagged with the generation it is valid for.
#[derive(Debug, Clone, Default)]
pub struct SessionRoster {
    clients: Arc<DashMap<ClientId, usize>>,
    /// Generation of the area list current placements index into.
    gate: Arc<RwLock<u64>>,
}

impl SessionRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client in an area, replacing any previous assignment.
    pub fn join(&self, client: ClientId, area: usize) {
        let _open = self.gate.read().unwrap_or_else(PoisonError::into_inner);
        self.clients.insert(client, area);
    }

    pub fn leave(&self, client: ClientId) -> Option<usize> {
        let _open = self.gate.read().unwrap_or_else(PoisonError::into_inner);
        self.clients.remove(&client).map(|(_, area)| area)
    }

    pub fn area_of(&self, client: ClientId) -> Option<usize> {
        self.placement(client).map(|(area, _)| area)
    }

    /// Area of a client and the snapshot generation that index refers to.
    /// Zero until the first area switch.
    pub fn placement(&self, client: ClientId) -> Option<(usize, u64)> {
        let generation = self.gate.read().unwrap_or_else(PoisonError::into_inner);
        self.clients.get(&client).map(|r| (*r.value(), *generation))
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl ClientRoster for SessionRoster {
    fn assignments(&self) -> Vec<(ClientId, usize)> {
        self.clients.iter().map(|r| (*r.key(), *r.value())).collect()
    }

    fn switch_areas(
        &self,
        plan: &dyn Fn(&[(ClientId, usize)]) -> Vec<Relocation>,
        publish: &mut dyn FnMut() -> u64,
    ) -> Vec<Relocation> {
        let mut generation = self.gate.write().unwrap_or_else(PoisonError::into_inner);
        let moves = plan(&self.assignments());
        for relocation in &moves {
            if let Some(mut entry) = self.clients.get_mut(&relocation.client) {
                *entry = relocation.to;
            }
        }
        *generation = publish();
        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AreaDefinition, EvidenceMode};
    use std::collections::BTreeMap;

    fn list(names: &[&str]) -> AreaList {
        AreaList {
            areas: names
                .iter()
                .map(|name| AreaDefinition {
                    name: name.to_string(),
                    background: "lobby".to_string(),
                    description: None,
                    bglock: false,
                    cbg_allowed: false,
                    locking_allowed: false,
                    private_area: false,
                    lobby_area: false,
                    has_lights: true,
                    iniswap_allowed: false,
                    global_allowed: true,
                    rollp_allowed: true,
                    song_switch_allowed: false,
                    evidence_mod: EvidenceMode::Ffa,
                    afk_delay: 0,
                    afk_sendto: 0,
                    reachable_areas: vec!["<ALL>".to_string()],
                    visible_areas: vec!["<ALL>".to_string()],
                    scream_range: Vec::new(),
                    restricted_chars: Vec::new(),
                    background_tod: BTreeMap::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_removed_area_sends_occupants_to_fallback() {
        let old = list(&["Lobby", "Courtroom", "Basement"]);
        let new = list(&["Lobby", "Basement"]);
        let moves = plan_relocations(&old, &new, &[(ClientId(7), 1), (ClientId(3), 2), (ClientId(1), 0)]);
        assert_eq!(
            moves,
            vec![
                Relocation {
                    client: ClientId(3),
                    from: 2,
                    to: 1,
                    removed: false
                },
                Relocation {
                    client: ClientId(7),
                    from: 1,
                    to: 0,
                    removed: true
                },
            ]
        );
    }

    #[test]
    fn test_out_of_range_assignment_is_treated_as_removed() {
        let old = list(&["Lobby"]);
        let moves = plan_relocations(&old, &old, &[(ClientId(1), 0), (ClientId(2), 0), (ClientId(9), 5)]);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].client, ClientId(9));
        assert!(moves[0].removed);
    }

    #[test]
    fn test_session_roster_switch_moves_then_publishes() {
        let roster = SessionRoster::new();
        roster.join(ClientId(1), 1);
        roster.join(ClientId(2), 0);
        assert_eq!(roster.placement(ClientId(1)), Some((1, 0)));

        let old = list(&["Lobby", "Courtroom"]);
        let new = list(&["Lobby"]);
        let mut published = Vec::new();
        let moves = roster.switch_areas(&|assignments| plan_relocations(&old, &new, assignments), &mut || {
            published.push(roster.clients.get(&ClientId(1)).map(|r| *r.value()));
            2
        });

        assert_eq!(moves.len(), 1);
        assert_eq!(published, vec![Some(0)]);
        assert_eq!(roster.placement(ClientId(1)), Some((0, 2)));
        assert_eq!(roster.placement(ClientId(2)), Some((0, 2)));
        assert_eq!(roster.leave(ClientId(1)), Some(0));
        assert_eq!(roster.len(), 1);
    }
}
