//! Background catalog and gimp message pool.

use serde::{Deserialize, Serialize};

/// Every background name the server knows. Loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BackgroundCatalog {
    pub backgrounds: Vec<String>,
}

impl BackgroundCatalog {
    pub fn contains(&self, name: &str) -> bool {
        self.backgrounds.iter().any(|b| b == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.backgrounds.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.backgrounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backgrounds.is_empty()
    }

    /// Background used when nothing else applies: the first one listed.
    pub fn default_background(&self) -> Option<&str> {
        self.backgrounds.first().map(String::as_str)
    }
}

/// Replacement messages for gimped clients. Loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GimpMessagePool {
    pub messages: Vec<String>,
}

const DEFAULT_GIMP_MESSAGES: &[&str] = &[
    "HELP ME",
    "(((((case????)))))",
    "Anyone else a fan of MLP?",
    "does this server have sans from undertale?",
    "what does call mod do",
    "Join my discord server please",
    "can I have mod pls?",
    "why is everyone a missingo?",
    "how 2 change areas?",
    "When do we remove dangits",
    "MODS STOP GIMPING ME",
    "PLAY NORMIES PLS",
    "share if you not afraid of herobrine",
    "New Killer Choosen! Hold On!!",
    "The cake killed Nether.",
];

impl GimpMessagePool {
    /// Pool used when no gimp document exists.
    pub fn builtin() -> Self {
        Self {
            messages: DEFAULT_GIMP_MESSAGES.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// A uniformly random message.
    pub fn pick(&self) -> &str {
        // Never empty once validated.
        match self.messages.len() {
            0 => "",
            n => &self.messages[fastrand::usize(..n)],
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lookup() {
        let catalog = BackgroundCatalog {
            backgrounds: vec!["courtroom".into(), "lobby".into()],
        };
        assert!(catalog.contains("lobby"));
        assert!(!catalog.contains("Lobby"));
        assert_eq!(catalog.default_background(), Some("courtroom"));
    }

    #[test]
    fn test_pick_comes_from_pool() {
        let pool = GimpMessagePool::builtin();
        assert!(!pool.is_empty());
        for _ in 0..32 {
            let picked = pool.pick();
            assert!(pool.messages.iter().any(|m| m == picked));
        }
    }
}
