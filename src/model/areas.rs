//! Area list entities.
//!
//! Position in the list is the area's numeric ID. Reachability lists may use
//! `<ALL>` (every area) and `<REACHABLE_AREAS>` (the area's reachable set).

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::ServerSettings;
use crate::schema::documents::{ALL_AREAS, REACHABLE_AREAS};

/// One entry of the area list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AreaDefinition {
    pub name: String,
    /// Reference into the background catalog.
    pub background: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub bglock: bool,
    pub cbg_allowed: bool,
    pub locking_allowed: bool,
    pub private_area: bool,
    pub lobby_area: bool,
    pub has_lights: bool,
    pub iniswap_allowed: bool,
    pub global_allowed: bool,
    pub rollp_allowed: bool,
    pub song_switch_allowed: bool,
    pub evidence_mod: EvidenceMode,
    /// Minutes of inactivity before a client is sent to `afk_sendto`.
    pub afk_delay: u32,
    /// Area index inactive clients are moved to.
    pub afk_sendto: usize,
    pub reachable_areas: Vec<String>,
    pub visible_areas: Vec<String>,
    pub scream_range: Vec<String>,
    pub restricted_chars: Vec<String>,
    /// Time-of-day name to background name.
    pub background_tod: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum EvidenceMode {
    #[serde(rename = "FFA")]
    Ffa,
    Mods,
    #[serde(rename = "CM")]
    Cm,
    #[serde(rename = "HiddenCM")]
    HiddenCm,
}

impl AreaDefinition {
    /// Description shown to clients, falling back to the server default.
    pub fn description_or<'a>(&'a self, settings: &'a ServerSettings) -> &'a str {
        self.description
            .as_deref()
            .unwrap_or(&settings.default_area_description)
    }
}

/// An entry of a reachability list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaSelector<'a> {
    All,
    Reachable,
    Named(&'a str),
}

impl<'a> AreaSelector<'a> {
    pub fn parse(entry: &'a str) -> Self {
        match entry {
            ALL_AREAS => AreaSelector::All,
            REACHABLE_AREAS => AreaSelector::Reachable,
            name => AreaSelector::Named(name),
        }
    }
}

/// The ordered area list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AreaList {
    pub areas: Vec<AreaDefinition>,
}

impl AreaList {
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&AreaDefinition> {
        self.areas.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AreaDefinition> {
        self.areas.iter()
    }

    /// Area ID of the area with this exact name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.areas.iter().position(|a| a.name == name)
    }

    pub fn names(&self) -> BTreeSet<&str> {
        self.areas.iter().map(|a| a.name.as_str()).collect()
    }

    /// Names of areas a client in `id` may move to. An area always reaches
    /// itself.
    pub fn reachable_from(&self, id: usize) -> BTreeSet<&str> {
        match self.get(id) {
            Some(area) => {
                let mut out = self.expand(&area.reachable_areas, None);
                out.insert(area.name.as_str());
                out
            }
            None => BTreeSet::new(),
        }
    }

    /// Names of areas a client in `id` may see.
    pub fn visible_from(&self, id: usize) -> BTreeSet<&str> {
        match self.get(id) {
            Some(area) => self.expand(&area.visible_areas, Some(&area.reachable_areas)),
            None => BTreeSet::new(),
        }
    }

    /// Names of areas a scream from `id` is heard in.
    pub fn scream_targets(&self, id: usize) -> BTreeSet<&str> {
        match self.get(id) {
            Some(area) => self.expand(&area.scream_range, Some(&area.reachable_areas)),
            None => BTreeSet::new(),
        }
    }

    fn expand<'a>(&'a self, entries: &'a [String], reachable: Option<&'a [String]>) -> BTreeSet<&'a str> {
        let mut out = BTreeSet::new();
        for entry in entries {
            match AreaSelector::parse(entry) {
                AreaSelector::All => out.extend(self.names()),
                AreaSelector::Reachable => {
                    if let Some(reachable) = reachable {
                        out.extend(self.expand(reachable, None));
                    }
                }
                AreaSelector::Named(name) => {
                    out.insert(name);
                }
            }
        }
        out
    }
}
