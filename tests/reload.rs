//! Runtime reload tests.

use std::sync::{Arc, Mutex, OnceLock, Weak};
use std::thread;

use docket::error::Problem;
use docket::snapshot::{ClientId, ClientRoster, Relocation, SessionRoster};
use docket::{RawDocument, ReloadResult, SnapshotManager, Slot};

mod common;

#[test]
fn test_accepted_reload_increments_generation() {
    let manager = common::boot();
    let reloaded = manager
        .reload(
            Slot::Areas,
            RawDocument::toml(common::areas_toml(&[("Lobby", "lobby"), ("Annex", "basement")])),
        )
        .unwrap();

    assert_eq!(reloaded.generation, 2);
    let active = manager.active();
    assert_eq!(active.generation, 2);
    assert_eq!(active.areas.names().into_iter().collect::<Vec<_>>(), vec!["Annex", "Lobby"]);
}

#[test]
fn test_rejected_reload_keeps_active_snapshot() {
    let manager = common::boot();
    let before = manager.active();

    let err = manager
        .reload(Slot::Areas, RawDocument::toml(common::areas_toml(&[("Lobby", "missing_bg")])))
        .unwrap_err();

    assert_eq!(err.slot, Slot::Areas);
    assert_eq!(err.generation, 1);
    assert_eq!(err.problems.len(), 1);
    assert!(err.problems[0].is_reference());

    let after = manager.active();
    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(after.areas.len(), 3);
}

#[test]
fn test_duplicate_track_rejects_music_reload() {
    let manager = common::boot();
    let music = "- category: Trial\n  songs:\n    - name: cross.mp3\n    - name: cross.mp3\n";

    let err = manager.reload(Slot::Music, RawDocument::yaml(music)).unwrap_err();
    assert_eq!(err.problems.len(), 1);
    match &err.problems[0] {
        Problem::Validation(e) => assert_eq!(e.path.to_string(), "music[0].songs[1].name"),
        other => panic!("expected a validation error, got {other}"),
    }
    assert_eq!(manager.generation(), 1);
    assert_eq!(manager.active().music.track_count(), 3);
}

#[test]
fn test_removed_area_occupants_move_to_area_zero() {
    let roster = Arc::new(SessionRoster::new());
    roster.join(ClientId(1), 1); // Courtroom
    roster.join(ClientId(2), 2); // Basement
    roster.join(ClientId(3), 0); // Lobby
    let manager = common::boot().with_roster(roster.clone());

    // Courtroom removed, Basement moves from index 2 to 1.
    let reloaded = manager
        .reload(
            Slot::Areas,
            RawDocument::toml(common::areas_toml(&[("Lobby", "lobby"), ("Basement", "basement")])),
        )
        .unwrap();

    assert_eq!(reloaded.generation, 2);
    assert_eq!(roster.area_of(ClientId(1)), Some(0));
    assert_eq!(roster.area_of(ClientId(2)), Some(1));
    assert_eq!(roster.area_of(ClientId(3)), Some(0));

    let removed: Vec<_> = reloaded.relocations.iter().filter(|r| r.removed).map(|r| r.client).collect();
    assert_eq!(removed, vec![ClientId(1)]);
    assert_eq!(reloaded.relocations.len(), 2);
}

#[test]
fn test_rejected_reload_moves_nobody() {
    let roster = Arc::new(SessionRoster::new());
    roster.join(ClientId(1), 2);
    let manager = common::boot().with_roster(roster.clone());

    assert!(manager.reload(Slot::Areas, RawDocument::toml("areas = []\n")).is_err());
    assert_eq!(roster.area_of(ClientId(1)), Some(2));
}

/// Roster of one client that records what the manager publishes around it.
#[derive(Default)]
struct RecordingRoster {
    manager: OnceLock<Weak<SnapshotManager>>,
    area: Mutex<usize>,
    /// `(step, active generation, active area count, client area)`.
    seen: Mutex<Vec<(&'static str, u64, usize, usize)>>,
}

impl RecordingRoster {
    fn record(&self, step: &'static str) {
        let Some(manager) = self.manager.get().and_then(Weak::upgrade) else {
            return;
        };
        let active = manager.active();
        let area = *self.area.lock().unwrap();
        self.seen.lock().unwrap().push((step, active.generation, active.areas.len(), area));
    }
}

impl ClientRoster for RecordingRoster {
    fn assignments(&self) -> Vec<(ClientId, usize)> {
        vec![(ClientId(1), *self.area.lock().unwrap())]
    }

    fn switch_areas(
        &self,
        plan: &dyn Fn(&[(ClientId, usize)]) -> Vec<Relocation>,
        publish: &mut dyn FnMut() -> u64,
    ) -> Vec<Relocation> {
        self.record("before");
        let moves = plan(&self.assignments());
        for relocation in &moves {
            *self.area.lock().unwrap() = relocation.to;
        }
        self.record("moved");
        publish();
        self.record("published");
        moves
    }
}

#[test]
fn test_clients_move_before_new_area_list_is_visible() {
    let roster = Arc::new(RecordingRoster::default());
    *roster.area.lock().unwrap() = 2; // Basement
    let manager = Arc::new(common::boot().with_roster(roster.clone()));
    roster.manager.set(Arc::downgrade(&manager)).unwrap();

    let reloaded = manager
        .reload(
            Slot::Areas,
            RawDocument::toml(common::areas_toml(&[("Lobby", "lobby"), ("Courtroom", "courtroom")])),
        )
        .unwrap();

    assert_eq!(
        *roster.seen.lock().unwrap(),
        vec![("before", 1, 3, 2), ("moved", 1, 3, 0), ("published", 2, 2, 0)]
    );
    assert_eq!(reloaded.relocations.len(), 1);
    assert!(reloaded.relocations[0].removed);
}

#[test]
fn test_session_roster_placement_carries_generation() {
    let roster = Arc::new(SessionRoster::new());
    roster.join(ClientId(4), 1); // Courtroom
    let manager = common::boot().with_roster(roster.clone());

    manager
        .reload(Slot::Music, RawDocument::yaml("[]\n"))
        .unwrap();
    assert_eq!(roster.placement(ClientId(4)), Some((1, 0)));

    manager
        .reload(
            Slot::Areas,
            RawDocument::toml(common::areas_toml(&[("Courtroom", "courtroom"), ("Lobby", "lobby")])),
        )
        .unwrap();
    assert_eq!(roster.placement(ClientId(4)), Some((0, 3)));
}

#[test]
fn test_reader_keeps_its_snapshot_across_reloads() {
    let manager = common::boot();
    let held = manager.active();
    let courtroom = held.area(1).cloned();

    manager
        .reload(Slot::Areas, RawDocument::toml(common::areas_toml(&[("Elsewhere", "lobby")])))
        .unwrap();
    manager.reload(Slot::Music, RawDocument::yaml("[]\n")).unwrap();

    assert_eq!(held.generation, 1);
    assert_eq!(held.area(1).cloned(), courtroom);
    assert_eq!(held.music.track_count(), 3);
    assert_eq!(manager.active().generation, 3);
}

#[test]
fn test_concurrent_reloads_of_both_slots_keep_every_update() {
    let manager = Arc::new(common::boot());
    let rounds = 20;

    let areas = {
        let manager = Arc::clone(&manager);
        thread::spawn(move || {
            for i in 0..rounds {
                let name = format!("Room{}", i);
                manager
                    .reload(Slot::Areas, RawDocument::toml(common::areas_toml(&[(name.as_str(), "lobby")])))
                    .unwrap();
            }
        })
    };
    let music = {
        let manager = Arc::clone(&manager);
        thread::spawn(move || {
            for i in 0..rounds {
                let doc = format!("- category: Loop\n  songs:\n    - name: track{}.mp3\n", i);
                manager.reload(Slot::Music, RawDocument::yaml(doc)).unwrap();
            }
        })
    };
    areas.join().unwrap();
    music.join().unwrap();

    let active = manager.active();
    assert_eq!(active.generation, 1 + 2 * rounds as u64);
    assert_eq!(active.areas.get(0).map(|a| a.name.as_str()), Some("Room19"));
    assert!(active.music.find("Loop", "track19.mp3").is_some());
}

#[test]
fn test_provenance_tracks_previous_source() {
    let manager = common::boot();
    manager
        .reload(Slot::Music, RawDocument::yaml("[]\n").with_source("music-v2.yaml"))
        .unwrap();

    let active = manager.active();
    let provenance = active.provenance(Slot::Music);
    assert_eq!(provenance.current.as_deref(), Some("music-v2.yaml"));
    assert_eq!(provenance.previous.as_deref(), Some("music.yaml"));
    assert_eq!(active.provenance(Slot::Areas).current.as_deref(), Some("areas.toml"));
}

#[test]
fn test_reload_result_flat_form() {
    let manager = common::boot();

    let rejected = ReloadResult::from(manager.reload(Slot::Areas, RawDocument::toml("areas = 3\n")));
    assert!(!rejected.success);
    assert_eq!(rejected.generation, 1);
    assert_eq!(rejected.errors.len(), 1);
    assert_eq!(rejected.errors[0].path, "areas");

    let accepted = ReloadResult::from(manager.reload(Slot::Music, RawDocument::yaml("[]\n")));
    assert!(accepted.success);
    assert_eq!(accepted.generation, 2);
    assert!(accepted.errors.is_empty());
}

#[tokio::test]
async fn test_reload_async_publishes() {
    let manager = Arc::new(common::boot());
    let reloaded = manager
        .reload_async(Slot::Areas, RawDocument::toml(common::areas_toml(&[("Lobby", "lobby")])))
        .await
        .unwrap();

    assert_eq!(reloaded.generation, 2);
    assert_eq!(manager.active().areas.len(), 1);
}

#[test]
fn test_manager_debug_shows_generation() {
    let manager = common::boot().with_roster(Arc::new(SessionRoster::new()));
    let shown = format!("{manager:?}");
    assert!(shown.starts_with("SnapshotManager"));
    assert!(shown.contains("generation: 1"));
    assert!(shown.contains("roster: true"));
}
