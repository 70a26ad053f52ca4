//! Active snapshot ownership and the reload path.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use serde::Serialize;
use uuid::Uuid;

use crate::document::{DocumentKind, RawDocument, Slot};
use crate::error::{Diagnostic, Problem, ReloadError, ValidationWarning};
use crate::model::{AreaList, MusicList};
use crate::observability::metrics;
use crate::resolve::{self, Context};
use crate::schema::SchemaRegistry;
use crate::snapshot::roster::{plan_relocations, ClientRoster, Relocation};
use crate::snapshot::state::ConfigSnapshot;
use crate::validation;

/// Entities that passed every check and are ready to publish.
enum Staged {
    Areas(Arc<AreaList>),
    Music(Arc<MusicList>),
}

/// An accepted reload.
#[derive(Debug, Clone)]
pub struct Reloaded {
    pub reload_id: Uuid,
    pub slot: Slot,
    /// Generation of the snapshot this reload published.
    pub generation: u64,
    pub warnings: Vec<ValidationWarning>,
    pub relocations: Vec<Relocation>,
}

/// Flat outcome handed back to whoever requested the reload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReloadResult {
    pub success: bool,
    /// Active generation after the request.
    pub generation: u64,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<String>,
    pub relocations: Vec<Relocation>,
}

impl From<Result<Reloaded, ReloadError>> for ReloadResult {
    fn from(outcome: Result<Reloaded, ReloadError>) -> Self {
        match outcome {
            Ok(reloaded) => Self {
                success: true,
                generation: reloaded.generation,
                errors: Vec::new(),
                warnings: reloaded.warnings.iter().map(ToString::to_string).collect(),
                relocations: reloaded.relocations,
            },
            Err(rejected) => Self {
                success: false,
                generation: rejected.generation,
                errors: rejected.problems.iter().map(Problem::diagnostic).collect(),
                warnings: Vec::new(),
                relocations: Vec::new(),
            },
        }
    }
}

/// Owner of the active configuration snapshot.
///
/// Reads are lock-free. An area reload with a roster attached hands the
/// publish to `ClientRoster::switch_areas`, so clients are moved in the same
/// step the new list becomes visible. Reloads of one slot are serialized by that slot's
/// guard; reloads of different slots may run concurrently and publish via
/// read-copy-update, so neither loses the other's entities.
pub struct SnapshotManager {
    active: ArcSwap<ConfigSnapshot>,
    areas_guard: Mutex<()>,
    music_guard: Mutex<()>,
    registry: SchemaRegistry,
    roster: Option<Arc<dyn ClientRoster>>,
}

impl SnapshotManager {
    pub fn new(initial: ConfigSnapshot, registry: SchemaRegistry) -> Self {
        metrics::record_generation(initial.generation);
        Self {
            active: ArcSwap::from_pointee(initial),
            areas_guard: Mutex::new(()),
            music_guard: Mutex::new(()),
            registry,
            roster: None,
        }
    }

    /// Attach the roster whose clients are relocated on area reloads.
    pub fn with_roster(mut self, roster: Arc<dyn ClientRoster>) -> Self {
        self.roster = Some(roster);
        self
    }

    /// The active snapshot. Never blocks; the returned snapshot stays valid
    /// and unchanged however many reloads publish afterwards.
    pub fn active(&self) -> Arc<ConfigSnapshot> {
        self.active.load_full()
    }

    pub fn generation(&self) -> u64 {
        self.active.load().generation
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Parse, validate and resolve a replacement for `slot`, then publish it.
    ///
    /// On any problem the active snapshot is left untouched and every problem
    /// is returned.
    pub fn reload(&self, slot: Slot, raw: RawDocument) -> Result<Reloaded, ReloadError> {
        let reload_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "reload",
            %reload_id,
            %slot,
            source = raw.source.as_deref().unwrap_or("-")
        );
        let _entered = span.enter();

        let _guard = self.guard(slot).lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.active.load_full();

        let (staged, warnings) = match self.stage(slot, &raw, &current) {
            Ok(staged) => staged,
            Err(problems) => {
                metrics::record_reload(slot, "rejected");
                tracing::warn!(
                    problems = problems.len(),
                    generation = current.generation,
                    "Reload rejected, keeping active snapshot"
                );
                for problem in &problems {
                    tracing::debug!(path = %problem.path(), category = problem.category(), "{}", problem);
                }
                return Err(ReloadError {
                    slot,
                    generation: current.generation,
                    problems,
                });
            }
        };

        for warning in &warnings {
            tracing::warn!(path = %warning.path, "{}", warning.message);
        }

        let source = raw.source;
        let mut generation = current.generation;
        let relocations = {
            let mut publish = || {
                generation = self.publish(&staged, source.clone());
                generation
            };
            match (&staged, &self.roster) {
                (Staged::Areas(areas), Some(roster)) => {
                    let old = &current.areas;
                    roster.switch_areas(&|assignments| plan_relocations(old, areas, assignments), &mut publish)
                }
                _ => {
                    publish();
                    Vec::new()
                }
            }
        };

        metrics::record_reload(slot, "accepted");
        metrics::record_generation(generation);
        tracing::info!(generation, "Reload accepted");
        for relocation in &relocations {
            tracing::info!(
                client = relocation.client.0,
                from = relocation.from,
                to = relocation.to,
                removed = relocation.removed,
                "Client relocated"
            );
        }
        metrics::record_relocations(relocations.len());

        Ok(Reloaded {
            reload_id,
            slot,
            generation,
            warnings,
            relocations,
        })
    }

    /// `reload` on a blocking worker, for callers on the async runtime.
    pub async fn reload_async(self: &Arc<Self>, slot: Slot, raw: RawDocument) -> Result<Reloaded, ReloadError> {
        let manager = Arc::clone(self);
        match tokio::task::spawn_blocking(move || manager.reload(slot, raw)).await {
            Ok(outcome) => outcome,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            // Runtime shutting down before the task ran; nothing was published.
            Err(_) => Err(ReloadError {
                slot,
                generation: self.generation(),
                problems: Vec::new(),
            }),
        }
    }

    fn guard(&self, slot: Slot) -> &Mutex<()> {
        match slot {
            Slot::Areas => &self.areas_guard,
            Slot::Music => &self.music_guard,
        }
    }

    /// Validate and resolve against the companions in `current`.
    fn stage(
        &self,
        slot: Slot,
        raw: &RawDocument,
        current: &ConfigSnapshot,
    ) -> Result<(Staged, Vec<ValidationWarning>), Vec<Problem>> {
        match slot {
            Slot::Areas => {
                let validated = validation::load::<AreaList>(raw, &self.registry)?;
                let ctx = Context {
                    backgrounds: Some(&*current.backgrounds),
                    areas: Some(&validated.entity),
                    music: Some(&*current.music),
                };
                resolve::resolve_for(DocumentKind::Areas, &ctx).map_err(into_problems)?;
                Ok((Staged::Areas(Arc::new(validated.entity)), validated.warnings))
            }
            Slot::Music => {
                let validated = validation::load::<MusicList>(raw, &self.registry)?;
                let ctx = Context {
                    backgrounds: Some(&*current.backgrounds),
                    areas: Some(&*current.areas),
                    music: Some(&validated.entity),
                };
                resolve::resolve_for(DocumentKind::Music, &ctx).map_err(into_problems)?;
                Ok((Staged::Music(Arc::new(validated.entity)), validated.warnings))
            }
        }
    }

    /// Swap in a successor built from the latest snapshot; returns its generation.
    fn publish(&self, staged: &Staged, source: Option<String>) -> u64 {
        let previous = self.active.rcu(|snap| match staged {
            Staged::Areas(areas) => snap.with_areas(Arc::clone(areas), source.clone()),
            Staged::Music(music) => snap.with_music(Arc::clone(music), source.clone()),
        });
        previous.generation + 1
    }
}

impl fmt::Debug for SnapshotManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotManager")
            .field("generation", &self.generation())
            .field("registry", &self.registry)
            .field("roster", &self.roster.is_some())
            .finish()
    }
}

fn into_problems<E: Into<Problem>>(errors: Vec<E>) -> Vec<Problem> {
    errors.into_iter().map(Into::into).collect()
}
