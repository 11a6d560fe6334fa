//! Session state
//!
//! Everything one round owns. Replaced wholesale on restart; nothing carries
//! over between rounds except the configuration.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::card::{CardId, CardRecord, Lane};
use super::deck::{DeckMode, build_deck};
use crate::config::{ConfigError, GameConfig};

/// Where the round is in the select/resolve cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Nothing selected, accepting input
    Idle,
    /// One card held (one lane filled, in two-lane decks)
    OneSelected,
    /// Movement locked until the pending resolution commits
    Resolving,
    /// Round won or lost; input is ignored until reset
    Terminal,
}

/// Result of comparing two selected cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Match,
    Mismatch,
}

/// Round status as seen by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Ongoing,
    Win,
    GameOver,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Ongoing => "ongoing",
            GameStatus::Win => "win",
            GameStatus::GameOver => "gameOver",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }
}

/// Cards currently held by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    /// Any card may pair with any other
    Single(Option<CardId>),
    /// One candidate per lane
    Lanes {
        primary: Option<CardId>,
        secondary: Option<CardId>,
    },
}

impl Selection {
    pub fn empty(mode: DeckMode) -> Self {
        match mode {
            DeckMode::Single => Selection::Single(None),
            DeckMode::TwoLane => Selection::Lanes {
                primary: None,
                secondary: None,
            },
        }
    }

    pub fn clear(&mut self) {
        match self {
            Selection::Single(held) => *held = None,
            Selection::Lanes { primary, secondary } => {
                *primary = None;
                *secondary = None;
            }
        }
    }

    /// Held ids, primary lane first
    pub fn held(&self) -> Vec<CardId> {
        match *self {
            Selection::Single(held) => held.into_iter().collect(),
            Selection::Lanes { primary, secondary } => {
                primary.into_iter().chain(secondary).collect()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.held().is_empty()
    }

    /// Mutable slot for a lane (`None` for single decks)
    pub fn lane_slot(&mut self, lane: Lane) -> Option<&mut Option<CardId>> {
        match self {
            Selection::Single(_) => None,
            Selection::Lanes { primary, secondary } => Some(match lane {
                Lane::Primary => primary,
                Lane::Secondary => secondary,
            }),
        }
    }
}

/// The single deferred commit in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingResolution {
    pub outcome: Outcome,
    pub first: CardId,
    pub second: CardId,
    /// Presentation time left before the commit (ms)
    pub remaining_ms: u32,
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Complete round state (deterministic for a given config and seed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    /// Configuration every round is dealt from
    pub config: GameConfig,
    /// Deal seed of the current round
    pub rng_state: RngState,
    /// Rounds dealt so far (1 after construction)
    pub round: u32,
    /// Cards still in play, in deal order
    pub deck: Vec<CardRecord>,
    pub lives: u32,
    /// Set while a resolution is in flight
    pub movement_locked: bool,
    pub selection: Selection,
    pub pending: Option<PendingResolution>,
    pub phase: SessionPhase,
    /// Committed matches this round
    pub matches: u32,
    /// Committed mismatches this round
    pub mismatches: u32,
}

impl SessionState {
    /// Validate `config` and deal the first round
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut state = Self {
            rng_state: RngState::new(seed),
            round: 0,
            deck: Vec::new(),
            lives: config.starting_lives,
            movement_locked: false,
            selection: Selection::empty(config.mode),
            pending: None,
            phase: SessionPhase::Idle,
            matches: 0,
            mismatches: 0,
            config,
        };
        state.reset(seed)?;
        Ok(state)
    }

    /// Start a fresh round with the current config.
    ///
    /// Any pending resolution is dropped with the old deck.
    pub fn reset(&mut self, seed: u64) -> Result<(), ConfigError> {
        self.reconfigure(self.config.clone(), seed)
    }

    /// Start a fresh round dealt from `config`.
    ///
    /// On error the session is left untouched, config and seed included.
    pub fn reconfigure(&mut self, config: GameConfig, seed: u64) -> Result<(), ConfigError> {
        config.validate()?;
        let rng_state = RngState::new(seed);
        let deck = build_deck(config.pairs()?, config.mode, &mut rng_state.to_rng())?;

        if self.pending.is_some() {
            log::debug!("Dropping pending resolution from round {}", self.round);
        }
        self.rng_state = rng_state;
        self.deck = deck;
        self.lives = config.starting_lives;
        self.movement_locked = false;
        self.selection = Selection::empty(config.mode);
        self.pending = None;
        self.phase = SessionPhase::Idle;
        self.matches = 0;
        self.mismatches = 0;
        self.round += 1;
        self.config = config;

        log::info!(
            "Round {} dealt: {} cards, {} lives, seed {}",
            self.round,
            self.deck.len(),
            self.lives,
            seed
        );
        Ok(())
    }

    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }

    /// Lives first, then the deck
    pub fn status(&self) -> GameStatus {
        if self.lives == 0 {
            GameStatus::GameOver
        } else if self.deck.is_empty() {
            GameStatus::Win
        } else {
            GameStatus::Ongoing
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.phase == SessionPhase::Terminal
    }

    pub fn card(&self, id: CardId) -> Option<&CardRecord> {
        self.deck.iter().find(|c| c.id == id)
    }

    pub fn card_mut(&mut self, id: CardId) -> Option<&mut CardRecord> {
        self.deck.iter_mut().find(|c| c.id == id)
    }

    pub fn index_of(&self, id: CardId) -> Option<usize> {
        self.deck.iter().position(|c| c.id == id)
    }

    /// Pairs left to find
    pub fn pairs_remaining(&self) -> usize {
        self.deck.len() / 2
    }
}
