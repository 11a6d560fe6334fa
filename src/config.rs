//! Round configuration
//!
//! Everything a fresh round needs: lives, pair count, deal mode, resolution
//! delays, catalog and grid. Validated once up front so dealing can't fail
//! halfway through a restart.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, PairDef};
use crate::consts::*;
use crate::layout::GridLayout;
use crate::sim::{DeckError, DeckMode};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("starting lives must be at least 1")]
    ZeroLives,
    #[error("a round needs at least one pair")]
    NoPairs,
    #[error("requested {requested} pairs but the catalog only has {available}")]
    CatalogTooSmall { requested: usize, available: usize },
    #[error("invalid grid: {0}")]
    InvalidGrid(String),
    #[error("invalid catalog: {0}")]
    Catalog(String),
    #[error("invalid config: {0}")]
    Parse(String),
    #[error(transparent)]
    Deck(#[from] DeckError),
}

/// Configuration for every round of a game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Lives at round start
    pub starting_lives: u32,
    /// Pairs dealt per round
    pub pair_count: usize,
    /// Single deck or two-lane word deck
    pub mode: DeckMode,
    /// Match presentation delay (ms)
    pub match_delay_ms: u32,
    /// Mismatch presentation delay (ms)
    pub mismatch_delay_ms: u32,
    /// Pair source
    #[serde(default)]
    pub catalog: Catalog,
    /// Explicit grid; derived from the mode when absent
    #[serde(default)]
    pub grid: Option<GridLayout>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_lives: DEFAULT_LIVES,
            pair_count: DEFAULT_PAIR_COUNT,
            mode: DeckMode::TwoLane,
            match_delay_ms: MATCH_DELAY_MS,
            mismatch_delay_ms: MISMATCH_DELAY_MS,
            catalog: Catalog::word_pairs(),
            grid: None,
        }
    }
}

impl GameConfig {
    /// Picture-card game: identical faces, any two cards compared
    pub fn card_faces() -> Self {
        Self {
            mode: DeckMode::Single,
            catalog: Catalog::card_faces(),
            ..Self::default()
        }
    }

    /// Parse and validate a config from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every precondition of dealing a round
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_lives == 0 {
            return Err(ConfigError::ZeroLives);
        }
        self.pairs()?;
        self.layout().validate()?;
        Ok(())
    }

    /// The pairs dealt each round
    pub fn pairs(&self) -> Result<&[PairDef], ConfigError> {
        self.catalog.take(self.pair_count)
    }

    /// Grid used by the presentation layer
    pub fn layout(&self) -> GridLayout {
        if let Some(grid) = &self.grid {
            return grid.clone();
        }
        match self.mode {
            DeckMode::Single => GridLayout::default(),
            DeckMode::TwoLane => {
                GridLayout::two_lane(Vec2::new(VIEW_WIDTH, VIEW_HEIGHT), self.pair_count as u32)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
        assert_eq!(GameConfig::card_faces().validate(), Ok(()));
    }

    #[test]
    fn test_zero_lives_rejected() {
        let config = GameConfig {
            starting_lives: 0,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroLives));
    }

    #[test]
    fn test_pair_count_checked_against_catalog() {
        let config = GameConfig {
            pair_count: 0,
            ..GameConfig::card_faces()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoPairs));

        let config = GameConfig {
            pair_count: 50,
            ..GameConfig::card_faces()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CatalogTooSmall { requested: 50, .. })
        ));
    }

    #[test]
    fn test_bad_grid_rejected() {
        let config = GameConfig {
            grid: Some(GridLayout {
                columns: 0,
                ..GridLayout::default()
            }),
            ..GameConfig::card_faces()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidGrid(_))));
    }

    #[test]
    fn test_layout_follows_mode() {
        assert_eq!(GameConfig::card_faces().layout(), GridLayout::default());
        let two_lane = GameConfig::default().layout();
        assert_eq!(two_lane.columns, 2);
        assert_eq!(two_lane.card_scale, 1.0);
    }

    #[test]
    fn test_from_json_uses_defaults() {
        let json = r#"{
            "starting_lives": 3,
            "pair_count": 2,
            "mode": "Single",
            "match_delay_ms": 0,
            "mismatch_delay_ms": 0
        }"#;
        let config = GameConfig::from_json(json).unwrap();
        assert_eq!(config.starting_lives, 3);
        assert_eq!(config.catalog, Catalog::word_pairs());
        assert!(config.grid.is_none());

        assert!(matches!(
            GameConfig::from_json(r#"{"starting_lives": 0}"#),
            Err(ConfigError::Parse(_))
        ));
        let zero = json.replace("\"starting_lives\": 3", "\"starting_lives\": 0");
        assert_eq!(GameConfig::from_json(&zero), Err(ConfigError::ZeroLives));
    }
}
