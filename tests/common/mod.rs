//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use docket::{RawDocument, SchemaRegistry, SnapshotManager, StartupDocuments};

pub const SETTINGS: &str = r#"
hostname = "Courthouse"
port = 27016
playerlimit = 100
timeout = 250
local = false
use_masterserver = false
masterserver_name = "Courthouse"
masterserver_description = "Integration test server"
masterserver_ip = "127.0.0.1:27016"
announce_areas = true
motd = "Welcome\\nto the courthouse"
modpass = "mod-secret"
cmpass = "cm-secret"
gmpass = "gm-secret"

[music_change_floodguard]
times_per_interval = 3
interval_length = 20
mute_length = 60.5
"#;

pub const BACKGROUNDS: &str = "- courtroom\n- lobby\n- basement\n- Blackout_HD\n";

pub const GIMP: &str = "messages:\n  - HELP ME\n  - what does call mod do\n";

pub const AREAS: &str = r#"
[[areas]]
name = "Lobby"
background = "lobby"
lobby_area = true

[[areas]]
name = "Courtroom"
background = "courtroom"
evidence_mod = "CM"
reachable_areas = "Lobby, Basement"

[[areas]]
name = "Basement"
background = "basement"
afk_delay = 15
afk_sendto = 0
"#;

pub const MUSIC: &str = r#"
- category: "==Trial=="
  songs:
    - name: cross.mp3
      length: 120
    - name: objection.mp3
      length: 95.5
- category: "==Calm=="
  songs:
    - name: lobby.opus
      source: https://example.org/lobby.opus
"#;

/// An area list document with one `(name, background)` pair per area.
pub fn areas_toml(areas: &[(&str, &str)]) -> String {
    areas
        .iter()
        .map(|(name, bg)| format!("[[areas]]\nname = {:?}\nbackground = {:?}\n\n", name, bg))
        .collect()
}

pub fn documents() -> StartupDocuments {
    StartupDocuments {
        settings: RawDocument::toml(SETTINGS),
        backgrounds: RawDocument::yaml(BACKGROUNDS),
        gimp: Some(RawDocument::yaml(GIMP)),
        areas: RawDocument::toml(AREAS).with_source("areas.toml"),
        music: RawDocument::yaml(MUSIC).with_source("music.yaml"),
    }
}

/// A manager booted from the default fixtures.
pub fn boot() -> SnapshotManager {
    docket::startup(documents(), SchemaRegistry::new()).expect("fixtures are valid")
}

/// Write the default fixtures as a configuration directory.
pub fn write_dir(dir: &Path) {
    fs::write(dir.join("config.toml"), SETTINGS).unwrap();
    fs::write(dir.join("backgrounds.yaml"), BACKGROUNDS).unwrap();
    fs::write(dir.join("gimp.yml"), GIMP).unwrap();
    fs::write(dir.join("areas.toml"), AREAS).unwrap();
    fs::write(dir.join("music.yaml"), MUSIC).unwrap();
}
