//! Presentation boundary
//!
//! The resolver decides *when* something happens; implementors of
//! `PresentationPort` decide *how* it looks and sounds.

use serde::{Deserialize, Serialize};

use super::card::{CardId, CardRecord};

/// Calls made by the resolver into the presentation layer
pub trait PresentationPort {
    /// Mark a card as chosen (idempotent)
    fn highlight(&mut self, card: &CardRecord);
    /// Clear the chosen mark
    fn unhighlight(&mut self, card: &CardRecord);
    fn play_match_cue(&mut self);
    fn play_mismatch_cue(&mut self);
    /// Transient view shake
    fn shake_on_mismatch(&mut self);
    /// Take one life icon away
    fn remove_life_indicator(&mut self);
    /// Card left the deck; remove it from view
    fn animate_card_removal(&mut self, card: &CardRecord);
    fn announce_win(&mut self);
    fn announce_game_over(&mut self);
}

/// A recorded presentation call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresentationEvent {
    Highlight(CardId),
    Unhighlight(CardId),
    MatchCue,
    MismatchCue,
    Shake,
    RemoveLife,
    CardRemoved(CardId),
    Win,
    GameOver,
}

/// Port that records every call in order
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    pub events: Vec<PresentationEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain the recorded events
    pub fn take(&mut self) -> Vec<PresentationEvent> {
        std::mem::take(&mut self.events)
    }
}

impl PresentationPort for EventLog {
    fn highlight(&mut self, card: &CardRecord) {
        self.events.push(PresentationEvent::Highlight(card.id));
    }

    fn unhighlight(&mut self, card: &CardRecord) {
        self.events.push(PresentationEvent::Unhighlight(card.id));
    }

    fn play_match_cue(&mut self) {
        self.events.push(PresentationEvent::MatchCue);
    }

    fn play_mismatch_cue(&mut self) {
        self.events.push(PresentationEvent::MismatchCue);
    }

    fn shake_on_mismatch(&mut self) {
        self.events.push(PresentationEvent::Shake);
    }

    fn remove_life_indicator(&mut self) {
        self.events.push(PresentationEvent::RemoveLife);
    }

    fn animate_card_removal(&mut self, card: &CardRecord) {
        self.events.push(PresentationEvent::CardRemoved(card.id));
    }

    fn announce_win(&mut self) {
        self.events.push(PresentationEvent::Win);
    }

    fn announce_game_over(&mut self) {
        self.events.push(PresentationEvent::GameOver);
    }
}
