//! Loading the engine configuration and document files from disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::EngineConfig;
use crate::document::{DocumentKind, Format, RawDocument};
use crate::error::LoadError;

/// Engine configuration file looked up when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "docket.toml";

/// Load the engine configuration.
///
/// An explicit `path` must exist. Without one, `docket.toml` in the working
/// directory is used when present, and defaults otherwise.
pub fn load_engine_config(path: Option<&Path>) -> Result<EngineConfig, LoadError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !fallback.exists() {
                return Ok(EngineConfig::default());
            }
            fallback
        }
    };

    let content = fs::read_to_string(&path).map_err(|source| LoadError::Io {
        path: path.clone(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| LoadError::EngineConfig { path, source })
}

/// Read a document file, picking the format from its extension.
pub fn read_document(path: &Path) -> Result<RawDocument, LoadError> {
    let format = Format::from_path(path).ok_or_else(|| LoadError::UnknownFormat {
        path: path.to_path_buf(),
    })?;
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(RawDocument::new(text, format).with_source(path.display().to_string()))
}

/// Find the file for `kind` in `dir`: `<stem>.toml`, then `<stem>.yaml`,
/// then `<stem>.yml`.
pub fn locate(dir: &Path, kind: DocumentKind) -> Option<PathBuf> {
    [Format::Toml, Format::Yaml]
        .iter()
        .flat_map(|format| format.extensions())
        .map(|ext| dir.join(format!("{}.{}", kind.file_stem(), ext)))
        .find(|candidate| candidate.is_file())
}

/// Like `locate`, but a missing file is an error.
pub fn require(dir: &Path, kind: DocumentKind) -> Result<PathBuf, LoadError> {
    locate(dir, kind).ok_or_else(|| LoadError::Missing {
        kind,
        stem: kind.file_stem(),
        dir: dir.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_prefers_toml() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("areas.yaml"), "- name: Lobby\n").unwrap();
        fs::write(dir.path().join("areas.toml"), "").unwrap();
        fs::write(dir.path().join("music.yml"), "").unwrap();

        assert_eq!(locate(dir.path(), DocumentKind::Areas), Some(dir.path().join("areas.toml")));
        assert_eq!(locate(dir.path(), DocumentKind::Music), Some(dir.path().join("music.yml")));
        assert_eq!(locate(dir.path(), DocumentKind::Gimp), None);
        assert!(matches!(
            require(dir.path(), DocumentKind::Settings),
            Err(LoadError::Missing { stem: "config", .. })
        ));
    }

    #[test]
    fn test_read_document_tags_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gimp.yaml");
        fs::write(&path, "- HELP ME\n").unwrap();

        let raw = read_document(&path).unwrap();
        assert_eq!(raw.format, Format::Yaml);
        assert_eq!(raw.source.as_deref(), Some(path.display().to_string().as_str()));

        let err = read_document(&dir.path().join("gimp.txt")).unwrap_err();
        assert!(matches!(err, LoadError::UnknownFormat { .. }));
    }

    #[test]
    fn test_explicit_engine_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_engine_config(Some(&dir.path().join("docket.toml"))).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));

        let path = dir.path().join("bad.toml");
        fs::write(&path, "[documents\n").unwrap();
        assert!(matches!(
            load_engine_config(Some(&path)),
            Err(LoadError::EngineConfig { .. })
        ));
    }
}
