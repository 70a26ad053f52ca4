//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate every document in dependency order
//! - Resolve cross-document references once all documents are known
//! - Publish generation 1, or report every problem at once
//!
//! # Design Decisions
//! - Fail fast, but only after collecting: any problem is fatal, and the
//!   operator sees all of them in a single report
//! - A document whose dependency failed is still validated on its own; only
//!   the rules that need the failed dependency are skipped
//! - A missing gimp document falls back to the built-in message pool

use std::path::Path;

use crate::config::loader::{locate, read_document, require};
use crate::document::{DocumentKind, RawDocument};
use crate::error::{BootError, Problem, StartupError, ValidationWarning};
use crate::model::{AreaList, BackgroundCatalog, GimpMessagePool, MusicList, ServerSettings};
use crate::observability::metrics;
use crate::resolve::{self, Context};
use crate::schema::SchemaRegistry;
use crate::snapshot::{ConfigSnapshot, SnapshotManager};
use crate::validation::{self, Document};

/// Raw text of every document the server boots from.
#[derive(Debug, Clone)]
pub struct StartupDocuments {
    pub settings: RawDocument,
    pub backgrounds: RawDocument,
    /// `None` uses the built-in message pool.
    pub gimp: Option<RawDocument>,
    pub areas: RawDocument,
    pub music: RawDocument,
}

/// Problems and warnings found while checking documents.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub problems: Vec<Problem>,
    pub warnings: Vec<ValidationWarning>,
}

impl CheckReport {
    pub fn is_valid(&self) -> bool {
        self.problems.is_empty()
    }

    fn stage<T: Document>(&mut self, raw: &RawDocument, registry: &SchemaRegistry) -> Option<T> {
        let inspection = validation::inspect::<T>(raw, registry);
        for warning in &inspection.warnings {
            tracing::warn!(document = %T::KIND, path = %warning.path, "{}", warning.message);
        }
        self.warnings.extend(inspection.warnings);
        match inspection.entity {
            Some(entity) => {
                tracing::debug!(document = %T::KIND, source = raw.source.as_deref().unwrap_or("-"), "Document valid");
                Some(entity)
            }
            None => {
                tracing::debug!(document = %T::KIND, problems = inspection.problems.len(), "Document rejected");
                self.problems.extend(inspection.problems);
                None
            }
        }
    }
}

/// Outcome of a startup together with every warning raised on the way.
#[derive(Debug)]
pub struct StartupReport {
    pub outcome: Result<SnapshotManager, StartupError>,
    pub warnings: Vec<ValidationWarning>,
}

/// Validate all documents and publish the first snapshot.
pub fn startup(docs: StartupDocuments, registry: SchemaRegistry) -> Result<SnapshotManager, StartupError> {
    startup_report(docs, registry).outcome
}

/// `startup`, keeping the warnings for callers that report them.
pub fn startup_report(docs: StartupDocuments, registry: SchemaRegistry) -> StartupReport {
    let mut report = CheckReport::default();

    let settings = report.stage::<ServerSettings>(&docs.settings, &registry);
    let backgrounds = report.stage::<BackgroundCatalog>(&docs.backgrounds, &registry);
    let gimp = match &docs.gimp {
        Some(raw) => report.stage::<GimpMessagePool>(raw, &registry),
        None => {
            tracing::warn!("No gimp message document, using the built-in messages");
            Some(GimpMessagePool::builtin())
        }
    };
    let areas = report.stage::<AreaList>(&docs.areas, &registry);
    let music = report.stage::<MusicList>(&docs.music, &registry);

    let ctx = Context {
        backgrounds: backgrounds.as_ref(),
        areas: areas.as_ref(),
        music: music.as_ref(),
    };
    if let Err(errors) = resolve::resolve(&ctx) {
        report.problems.extend(errors.into_iter().map(Problem::from));
    }

    match (settings, backgrounds, gimp, areas, music) {
        (Some(settings), Some(backgrounds), Some(gimp), Some(areas), Some(music)) if report.problems.is_empty() => {
            let snapshot = ConfigSnapshot::initial(
                settings,
                backgrounds,
                gimp,
                (areas, docs.areas.source),
                (music, docs.music.source),
            );
            tracing::info!(
                generation = snapshot.generation,
                areas = snapshot.areas.len(),
                backgrounds = snapshot.backgrounds.len(),
                tracks = snapshot.music.track_count(),
                "Configuration loaded"
            );
            metrics::record_startup("accepted");
            StartupReport {
                outcome: Ok(SnapshotManager::new(snapshot, registry)),
                warnings: report.warnings,
            }
        }
        _ => {
            for problem in &report.problems {
                tracing::error!(document = %problem.kind(), path = %problem.path(), "{}", problem);
            }
            metrics::record_startup("rejected");
            StartupReport {
                outcome: Err(StartupError {
                    problems: report.problems,
                }),
                warnings: report.warnings,
            }
        }
    }
}

/// Validate one document on its own.
///
/// Cross-reference rules that only need this document still run; rules
/// that need another document are skipped.
pub fn check_document(kind: DocumentKind, raw: &RawDocument, registry: &SchemaRegistry) -> CheckReport {
    fn alone<T: Document>(
        raw: &RawDocument,
        registry: &SchemaRegistry,
        context: impl FnOnce(&T) -> Context<'_>,
    ) -> CheckReport {
        let mut report = CheckReport::default();
        if let Some(entity) = report.stage::<T>(raw, registry) {
            if let Err(errors) = resolve::resolve_for(T::KIND, &context(&entity)) {
                report.problems.extend(errors.into_iter().map(Problem::from));
            }
        }
        report
    }

    match kind {
        DocumentKind::Settings => alone::<ServerSettings>(raw, registry, |_| Context::default()),
        DocumentKind::Backgrounds => alone::<BackgroundCatalog>(raw, registry, |catalog| Context {
            backgrounds: Some(catalog),
            ..Context::default()
        }),
        DocumentKind::Gimp => alone::<GimpMessagePool>(raw, registry, |_| Context::default()),
        DocumentKind::Areas => alone::<AreaList>(raw, registry, |areas| Context {
            areas: Some(areas),
            ..Context::default()
        }),
        DocumentKind::Music => alone::<MusicList>(raw, registry, |music| Context {
            music: Some(music),
            ..Context::default()
        }),
    }
}

/// Read every document from `dir`.
pub fn read_documents(dir: &Path) -> Result<StartupDocuments, BootError> {
    let read = |kind: DocumentKind| require(dir, kind).and_then(|path| read_document(&path));
    let gimp = match locate(dir, DocumentKind::Gimp) {
        Some(path) => Some(read_document(&path)?),
        None => None,
    };
    Ok(StartupDocuments {
        settings: read(DocumentKind::Settings)?,
        backgrounds: read(DocumentKind::Backgrounds)?,
        gimp,
        areas: read(DocumentKind::Areas)?,
        music: read(DocumentKind::Music)?,
    })
}

/// Boot from a configuration directory.
pub fn boot_from_dir(dir: &Path, registry: SchemaRegistry) -> Result<SnapshotManager, BootError> {
    tracing::info!(dir = %dir.display(), "Loading configuration directory");
    let docs = read_documents(dir)?;
    Ok(startup(docs, registry)?)
}
