//! Typed configuration entities.
//!
//! Entities are produced only by the validator and are never mutated after
//! validation. They derive serde traits so a published snapshot can be
//! written back out and validated again.

pub mod areas;
pub mod catalog;
pub mod music;
pub mod settings;

pub use areas::{AreaDefinition, AreaList, AreaSelector, EvidenceMode};
pub use catalog::{BackgroundCatalog, GimpMessagePool};
pub use music::{MusicCategory, MusicList, Track};
pub use settings::{Floodguard, ServerSettings};
