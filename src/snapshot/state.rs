//! The immutable configuration bundle readers see.

use std::sync::Arc;

use serde::Serialize;

use crate::document::Slot;
use crate::model::{AreaDefinition, AreaList, BackgroundCatalog, GimpMessagePool, MusicList, ServerSettings};

/// Where a slot's active entities came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Provenance {
    /// Source label of the active document; `None` for raw text.
    pub current: Option<String>,
    /// Source label of the document it replaced.
    pub previous: Option<String>,
}

impl Provenance {
    pub fn new(source: Option<String>) -> Self {
        Self {
            current: source,
            previous: None,
        }
    }

    fn replaced_by(&self, source: Option<String>) -> Self {
        Self {
            current: source,
            previous: self.current.clone(),
        }
    }
}

/// Fully validated configuration tagged with a generation.
///
/// Entities sit behind their own `Arc` so a reload of one slot shares every
/// other entity with the snapshot it replaces.
#[derive(Debug, Clone)]
pub struct ConfigSnapshot {
    pub generation: u64,
    pub settings: Arc<ServerSettings>,
    pub backgrounds: Arc<BackgroundCatalog>,
    pub gimp: Arc<GimpMessagePool>,
    pub areas: Arc<AreaList>,
    pub music: Arc<MusicList>,
    areas_provenance: Provenance,
    music_provenance: Provenance,
}

impl ConfigSnapshot {
    /// Generation of the first published snapshot.
    pub const INITIAL_GENERATION: u64 = 1;

    pub fn initial(
        settings: ServerSettings,
        backgrounds: BackgroundCatalog,
        gimp: GimpMessagePool,
        areas: (AreaList, Option<String>),
        music: (MusicList, Option<String>),
    ) -> Self {
        Self {
            generation: Self::INITIAL_GENERATION,
            settings: Arc::new(settings),
            backgrounds: Arc::new(backgrounds),
            gimp: Arc::new(gimp),
            areas: Arc::new(areas.0),
            music: Arc::new(music.0),
            areas_provenance: Provenance::new(areas.1),
            music_provenance: Provenance::new(music.1),
        }
    }

    pub fn provenance(&self, slot: Slot) -> &Provenance {
        match slot {
            Slot::Areas => &self.areas_provenance,
            Slot::Music => &self.music_provenance,
        }
    }

    /// Successor with a new area list.
    pub(crate) fn with_areas(&self, areas: Arc<AreaList>, source: Option<String>) -> Self {
        Self {
            generation: self.generation + 1,
            areas,
            areas_provenance: self.areas_provenance.replaced_by(source),
            ..self.clone()
        }
    }

    /// Successor with a new music list.
    pub(crate) fn with_music(&self, music: Arc<MusicList>, source: Option<String>) -> Self {
        Self {
            generation: self.generation + 1,
            music,
            music_provenance: self.music_provenance.replaced_by(source),
            ..self.clone()
        }
    }

    pub fn area(&self, id: usize) -> Option<&AreaDefinition> {
        self.areas.get(id)
    }

    /// Description of area `id`, falling back to the server default.
    pub fn area_description(&self, id: usize) -> Option<&str> {
        self.area(id).map(|area| area.description_or(&self.settings))
    }
}
