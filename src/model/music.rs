//! Music list entities.

use serde::{Deserialize, Serialize};

/// One playable track. Identity is `(category, name)`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Track {
    pub name: String,
    /// Length in seconds; absent when unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MusicCategory {
    pub category: String,
    pub songs: Vec<Track>,
}

/// The ordered music list.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MusicList {
    pub music: Vec<MusicCategory>,
}

impl MusicList {
    pub fn categories(&self) -> impl Iterator<Item = &MusicCategory> {
        self.music.iter()
    }

    /// Look a track up by its identity.
    pub fn find(&self, category: &str, track: &str) -> Option<&Track> {
        self.music
            .iter()
            .filter(|c| c.category == category)
            .flat_map(|c| c.songs.iter())
            .find(|t| t.name == track)
    }

    /// Look a track up by name alone, first match in list order.
    pub fn find_by_name(&self, track: &str) -> Option<(&MusicCategory, &Track)> {
        self.music
            .iter()
            .flat_map(|c| c.songs.iter().map(move |t| (c, t)))
            .find(|(_, t)| t.name == track)
    }

    pub fn track_count(&self) -> usize {
        self.music.iter().map(|c| c.songs.len()).sum()
    }
}
