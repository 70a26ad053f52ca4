//! Per-document semantic rules.
//!
//! These run after the structural walk succeeded, on the typed entity, and
//! cover constraints that relate several fields of the same document.

use crate::document::{DocumentKind, FieldPath};
use crate::error::{ValidationError, ValidationWarning};
use crate::model::{AreaList, BackgroundCatalog, GimpMessagePool, MusicList, ServerSettings};
use crate::validation::Document;

impl Document for ServerSettings {
    const KIND: DocumentKind = DocumentKind::Settings;

    /// Every defined password must differ from every other one.
    fn semantic_errors(&self) -> Vec<ValidationError> {
        let passwords = self.passwords();
        let mut errors = Vec::new();
        for (i, (key, value)) in passwords.iter().enumerate() {
            if let Some((first, _)) = passwords[..i].iter().find(|(_, other)| other == value) {
                errors.push(ValidationError::new(
                    Self::KIND,
                    FieldPath::root().key(*key),
                    format!("a password different from `{}`", first),
                    format!("the same password as `{}`", first),
                ));
            }
        }
        errors
    }
}

impl Document for BackgroundCatalog {
    const KIND: DocumentKind = DocumentKind::Backgrounds;
}

impl Document for GimpMessagePool {
    const KIND: DocumentKind = DocumentKind::Gimp;
}

impl Document for AreaList {
    const KIND: DocumentKind = DocumentKind::Areas;

    /// No character list is loaded, so restricted characters go unchecked.
    fn semantic_warnings(&self) -> Vec<ValidationWarning> {
        self.iter()
            .enumerate()
            .filter(|(_, area)| !area.restricted_chars.is_empty())
            .map(|(i, _)| ValidationWarning {
                kind: Self::KIND,
                path: FieldPath::root().key("areas").index(i).key("restricted_chars"),
                message: "not checked against a server character list (none is loaded)".to_string(),
            })
            .collect()
    }
}

impl Document for MusicList {
    const KIND: DocumentKind = DocumentKind::Music;

    /// Track identity is `(category, name)`; a category name may appear more
    /// than once, but the same identity may not.
    fn semantic_errors(&self) -> Vec<ValidationError> {
        let root = FieldPath::root().key("music");
        let mut errors = Vec::new();
        for (i, category) in self.music.iter().enumerate() {
            let earlier = self.music[..i]
                .iter()
                .enumerate()
                .filter(|(_, c)| c.category == category.category);
            for (j, track) in category.songs.iter().enumerate() {
                let clash = earlier.clone().find_map(|(e, c)| {
                    c.songs.iter().position(|t| t.name == track.name).map(|k| (e, k))
                });
                if let Some((e, k)) = clash {
                    let first = root.index(e).key("songs").index(k).key("name");
                    errors.push(ValidationError::new(
                        Self::KIND,
                        root.index(i).key("songs").index(j).key("name"),
                        format!(
                            "a unique track in category {:?} (already used at {})",
                            category.category, first
                        ),
                        format!("duplicate text {:?}", track.name),
                    ));
                }
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{parse, Format};
    use crate::schema::SchemaRegistry;
    use crate::validation::validate;

    fn music(text: &str) -> Result<MusicList, Vec<ValidationError>> {
        let tree = parse(text, DocumentKind::Music, Format::Yaml).unwrap();
        validate::<MusicList>(&tree, &SchemaRegistry::new().schema(DocumentKind::Music)).map(|v| v.entity)
    }

    #[test]
    fn test_duplicate_track_within_category() {
        let errors = music(
            "- category: Trial\n  songs:\n    - name: a.mp3\n    - name: b.mp3\n    - name: a.mp3\n",
        )
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path.to_string(), "music[0].songs[2].name");
    }

    #[test]
    fn test_same_track_in_different_categories_is_allowed() {
        let list = music(
            "- category: Trial\n  songs:\n    - name: a.mp3\n- category: Calm\n  songs:\n    - name: a.mp3\n",
        )
        .unwrap();
        assert_eq!(list.track_count(), 2);
    }

    #[test]
    fn test_repeated_category_shares_identity_space() {
        let errors = music(
            "- category: Trial\n  songs:\n    - name: a.mp3\n- category: Trial\n  songs:\n    - name: b.mp3\n    - name: a.mp3\n",
        )
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path.to_string(), "music[1].songs[1].name");
        assert!(errors[0].expected.contains("music[0].songs[0].name"));
    }

    #[test]
    fn test_category_keys_are_strict() {
        let errors = music("- category: Trial\n  songs:\n    - name: a.mp3\n  cover: art.png\n").unwrap_err();
        assert_eq!(errors[0].path.to_string(), "music[0].cover");
    }

    #[test]
    fn test_passwords_must_differ() {
        let text = "hostname = \"Court\"\nport = 27016\nplayerlimit = 10\ntimeout = 250\n\
                    local = false\nuse_masterserver = false\nmasterserver_name = \"\"\n\
                    masterserver_description = \"\"\nmasterserver_ip = \"\"\nannounce_areas = true\n\
                    motd = \"hi\"\nmodpass = \"secret\"\ncmpass = \"cm\"\ngmpass = \"gm\"\ngmpass3 = \"secret\"\n";
        let tree = parse(text, DocumentKind::Settings, Format::Toml).unwrap();
        let errors = validate::<ServerSettings>(&tree, &SchemaRegistry::new().schema(DocumentKind::Settings))
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path.to_string(), "gmpass3");
        assert!(errors[0].actual.contains("`modpass`"));
    }

    #[test]
    fn test_time_of_day_names_reject_spaces() {
        let text = "[[areas]]\nname = \"Lobby\"\nbackground = \"lobby\"\n\n\
                    [areas.background_tod]\nday = \"lobby_day\"\n\"late night\" = \"lobby_night\"\n";
        let tree = parse(text, DocumentKind::Areas, Format::Toml).unwrap();
        let errors = validate::<AreaList>(&tree, &SchemaRegistry::new().schema(DocumentKind::Areas))
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path.to_string(), "areas[0].background_tod.late night");
        assert_eq!(errors[0].expected, "text without spaces");
    }

    #[test]
    fn test_restricted_chars_warn_unchecked() {
        let text = "[[areas]]\nname = \"Lobby\"\nbackground = \"lobby\"\n\n\
                    [[areas]]\nname = \"Jail\"\nbackground = \"jail\"\nrestricted_chars = \"Phoenix, Edgeworth\"\n";
        let tree = parse(text, DocumentKind::Areas, Format::Toml).unwrap();
        let validated = validate::<AreaList>(&tree, &SchemaRegistry::new().schema(DocumentKind::Areas)).unwrap();
        assert_eq!(validated.entity.get(1).map(|a| a.restricted_chars.len()), Some(2));
        assert_eq!(validated.warnings.len(), 1);
        assert_eq!(validated.warnings[0].path.to_string(), "areas[1].restricted_chars");
    }

    #[test]
    fn test_empty_category_is_rejected() {
        let errors = music("- category: Trial\n  songs: []\n").unwrap_err();
        assert_eq!(errors[0].path.to_string(), "music[0].songs");
        assert_eq!(errors[0].expected, "at least 1 item(s)");
    }
}
