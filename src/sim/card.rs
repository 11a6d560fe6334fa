//! Card records owned by a session

use serde::{Deserialize, Serialize};

/// Stable card identifier within a round (deck index at deal time)
pub type CardId = u32;

/// Visual/selection state of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CardState {
    /// Face down / idle, accepting selection
    #[default]
    Hidden,
    /// Held by the current selection
    Selected,
    /// Matched, waiting for the removal to commit
    Matched,
    /// Gone from play
    Removed,
}

/// Which collection a card belongs to in two-lane decks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lane {
    /// Source-language lane (left column)
    Primary,
    /// Target-language lane (right column)
    Secondary,
}

impl Lane {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lane::Primary => "primary",
            Lane::Secondary => "secondary",
        }
    }

    /// Grid column this lane occupies
    pub fn column(&self) -> u32 {
        match self {
            Lane::Primary => 0,
            Lane::Secondary => 1,
        }
    }
}

/// One card in the deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    pub id: CardId,
    /// Shared by exactly two cards in a round
    pub match_key: String,
    /// Text or texture name; never used for matching
    pub face_label: String,
    pub state: CardState,
    /// `None` in single-select decks
    #[serde(default)]
    pub lane: Option<Lane>,
}

impl CardRecord {
    pub fn new(id: CardId, match_key: impl Into<String>, face_label: impl Into<String>) -> Self {
        Self {
            id,
            match_key: match_key.into(),
            face_label: face_label.into(),
            state: CardState::Hidden,
            lane: None,
        }
    }

    pub fn with_lane(mut self, lane: Lane) -> Self {
        self.lane = Some(lane);
        self
    }

    /// True if the card can still be picked by the player
    pub fn is_selectable(&self) -> bool {
        matches!(self.state, CardState::Hidden | CardState::Selected)
    }

    pub fn matches(&self, other: &CardRecord) -> bool {
        self.match_key == other.match_key
    }
}
