//! Pair catalogs
//!
//! A catalog is the list of pairs a round can be dealt from. Word catalogs
//! put the source word on the primary face and its translation on the
//! secondary face; face catalogs use the same texture for both cards.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// One pair definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairDef {
    /// Matching key shared by both cards
    pub key: String,
    /// Face of the first (or primary lane) card
    pub primary: String,
    /// Face of the second card, same as `primary` when absent
    #[serde(default)]
    pub secondary: Option<String>,
}

impl PairDef {
    pub fn new(key: impl Into<String>, primary: impl Into<String>, secondary: Option<String>) -> Self {
        Self {
            key: key.into(),
            primary: primary.into(),
            secondary,
        }
    }

    /// Word pair keyed as `<source>-<target>`
    pub fn word(source: &str, target: &str) -> Self {
        Self::new(format!("{source}-{target}"), source, Some(target.to_string()))
    }

    /// Identical-face pair keyed by its texture name
    pub fn face(name: &str) -> Self {
        Self::new(name, name, None)
    }

    pub fn secondary_label(&self) -> &str {
        self.secondary.as_deref().unwrap_or(&self.primary)
    }
}

/// Named list of pairs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub name: String,
    pub pairs: Vec<PairDef>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::word_pairs()
    }
}

impl Catalog {
    /// English -> Ojibwe vocabulary
    pub fn word_pairs() -> Self {
        let words = [
            ("water", "nibi"),
            ("sun", "giizis"),
            ("dog", "animosh"),
            ("bear", "makwa"),
            ("fire", "ishkode"),
            ("tree", "mitig"),
            ("moon", "dibik-giizis"),
            ("house", "waakaa'igan"),
        ];
        Self {
            name: "english-ojibwe".to_string(),
            pairs: words.iter().map(|(en, oj)| PairDef::word(en, oj)).collect(),
        }
    }

    /// Picture cards `card-0` .. `card-4`
    pub fn card_faces() -> Self {
        Self {
            name: "card-faces".to_string(),
            pairs: (0..5).map(|i| PairDef::face(&format!("card-{i}"))).collect(),
        }
    }

    /// Parse a catalog from JSON (`{"name": ..., "pairs": [...]}`)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let catalog: Catalog =
            serde_json::from_str(json).map_err(|e| ConfigError::Catalog(e.to_string()))?;
        if catalog.pairs.is_empty() {
            return Err(ConfigError::Catalog(format!(
                "catalog {:?} has no pairs",
                catalog.name
            )));
        }
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The first `count` pairs, or an error if the catalog is too small
    pub fn take(&self, count: usize) -> Result<&[PairDef], ConfigError> {
        if count == 0 {
            return Err(ConfigError::NoPairs);
        }
        self.pairs
            .get(..count)
            .ok_or(ConfigError::CatalogTooSmall {
                requested: count,
                available: self.pairs.len(),
            })
    }
}
