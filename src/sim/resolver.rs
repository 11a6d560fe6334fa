//! Match resolution
//!
//! Drives a `SessionState` through Idle -> OneSelected -> Resolving -> Idle
//! (or Terminal). Every entry point is a no-op on stale or locked input;
//! nothing here can fail.

use super::card::{CardId, CardState, Lane};
use super::port::PresentationPort;
use super::state::{GameStatus, Outcome, PendingResolution, Selection, SessionPhase, SessionState};

/// Why a selection was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// A resolution is in flight
    Locked,
    /// The round is over
    Terminal,
    /// No card with that id in the deck
    UnknownCard,
    /// Card already matched or removed
    NotSelectable,
}

/// What a call to `select` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Card is now held
    Selected(CardId),
    /// Held card was picked again and released
    Deselected(CardId),
    /// Two-lane only: the lane's held card was swapped for another
    Moved { from: CardId, to: CardId },
    /// Two cards are being compared; movement is locked
    Resolving(Outcome),
    Ignored(IgnoreReason),
}

/// Forward a user pick to the session
pub fn select<P: PresentationPort + ?Sized>(
    state: &mut SessionState,
    port: &mut P,
    id: CardId,
) -> SelectOutcome {
    if state.is_terminal() {
        return SelectOutcome::Ignored(IgnoreReason::Terminal);
    }
    if state.movement_locked {
        return SelectOutcome::Ignored(IgnoreReason::Locked);
    }
    let Some(card) = state.card(id) else {
        log::debug!("Ignoring pick of unknown card {}", id);
        return SelectOutcome::Ignored(IgnoreReason::UnknownCard);
    };
    if !card.is_selectable() {
        return SelectOutcome::Ignored(IgnoreReason::NotSelectable);
    }
    let lane = card.lane;

    let selection = state.selection;
    match selection {
        Selection::Single(None) => {
            hold(state, port, id);
            state.selection = Selection::Single(Some(id));
            state.phase = SessionPhase::OneSelected;
            SelectOutcome::Selected(id)
        }
        Selection::Single(Some(held)) if held == id => {
            release(state, port, id);
            state.selection = Selection::Single(None);
            state.phase = SessionPhase::Idle;
            SelectOutcome::Deselected(id)
        }
        Selection::Single(Some(held)) => {
            hold(state, port, id);
            begin_resolution(state, port, held, id)
        }
        Selection::Lanes { .. } => {
            let Some(lane) = lane else {
                return SelectOutcome::Ignored(IgnoreReason::NotSelectable);
            };
            select_in_lane(state, port, id, lane)
        }
    }
}

fn select_in_lane<P: PresentationPort + ?Sized>(
    state: &mut SessionState,
    port: &mut P,
    id: CardId,
    lane: Lane,
) -> SelectOutcome {
    let current = state.selection.lane_slot(lane).and_then(|slot| *slot);

    let outcome = match current {
        Some(held) if held == id => {
            release(state, port, id);
            set_lane(state, lane, None);
            SelectOutcome::Deselected(id)
        }
        Some(held) => {
            release(state, port, held);
            hold(state, port, id);
            set_lane(state, lane, Some(id));
            SelectOutcome::Moved { from: held, to: id }
        }
        None => {
            hold(state, port, id);
            set_lane(state, lane, Some(id));
            SelectOutcome::Selected(id)
        }
    };

    let selection = state.selection;
    match selection {
        Selection::Lanes {
            primary: Some(first),
            secondary: Some(second),
        } => begin_resolution(state, port, first, second),
        _ => {
            state.phase = if state.selection.is_empty() {
                SessionPhase::Idle
            } else {
                SessionPhase::OneSelected
            };
            outcome
        }
    }
}

fn set_lane(state: &mut SessionState, lane: Lane, value: Option<CardId>) {
    if let Some(slot) = state.selection.lane_slot(lane) {
        *slot = value;
    }
}

fn hold<P: PresentationPort + ?Sized>(state: &mut SessionState, port: &mut P, id: CardId) {
    if let Some(card) = state.card_mut(id) {
        card.state = CardState::Selected;
        port.highlight(card);
    }
}

fn release<P: PresentationPort + ?Sized>(state: &mut SessionState, port: &mut P, id: CardId) {
    if let Some(card) = state.card_mut(id) {
        card.state = CardState::Hidden;
        port.unhighlight(card);
    }
}

/// Lock movement and decide the outcome; the commit waits for `advance`
fn begin_resolution<P: PresentationPort + ?Sized>(
    state: &mut SessionState,
    port: &mut P,
    first: CardId,
    second: CardId,
) -> SelectOutcome {
    let matched = match (state.card(first), state.card(second)) {
        (Some(a), Some(b)) => a.matches(b),
        _ => false,
    };

    state.movement_locked = true;
    state.phase = SessionPhase::Resolving;

    let (outcome, delay) = if matched {
        for id in [first, second] {
            if let Some(card) = state.card_mut(id) {
                card.state = CardState::Matched;
            }
        }
        port.play_match_cue();
        (Outcome::Match, state.config.match_delay_ms)
    } else {
        port.play_mismatch_cue();
        port.shake_on_mismatch();
        (Outcome::Mismatch, state.config.mismatch_delay_ms)
    };

    log::debug!("Cards {} and {}: {:?}", first, second, outcome);
    state.pending = Some(PendingResolution {
        outcome,
        first,
        second,
        remaining_ms: delay,
    });
    SelectOutcome::Resolving(outcome)
}

/// Advance presentation time; commits the pending resolution once its
/// delay has elapsed. Returns the committed outcome, if any.
pub fn advance<P: PresentationPort + ?Sized>(
    state: &mut SessionState,
    port: &mut P,
    dt_ms: u32,
) -> Option<Outcome> {
    let pending = state.pending.as_mut()?;
    pending.remaining_ms = pending.remaining_ms.saturating_sub(dt_ms);
    if pending.remaining_ms > 0 {
        return None;
    }
    commit_pending(state, port)
}

/// Commit the pending resolution immediately
pub fn commit_pending<P: PresentationPort + ?Sized>(
    state: &mut SessionState,
    port: &mut P,
) -> Option<Outcome> {
    let pending = state.pending.take()?;

    match pending.outcome {
        Outcome::Match => {
            for id in [pending.first, pending.second] {
                if let Some(index) = state.index_of(id) {
                    let mut card = state.deck.remove(index);
                    card.state = CardState::Removed;
                    port.animate_card_removal(&card);
                }
            }
            state.matches += 1;
        }
        Outcome::Mismatch => {
            for id in [pending.first, pending.second] {
                release(state, port, id);
            }
            state.lives = state.lives.saturating_sub(1);
            port.remove_life_indicator();
            state.mismatches += 1;
        }
    }

    state.selection.clear();
    state.movement_locked = false;

    match state.status() {
        GameStatus::Ongoing => state.phase = SessionPhase::Idle,
        GameStatus::Win => {
            state.phase = SessionPhase::Terminal;
            log::info!("Round {} won with {} lives left", state.round, state.lives);
            port.announce_win();
        }
        GameStatus::GameOver => {
            state.phase = SessionPhase::Terminal;
            log::info!(
                "Round {} lost with {} pairs left",
                state.round,
                state.pairs_remaining()
            );
            port.announce_game_over();
        }
    }

    Some(pending.outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::card::CardRecord;
    use crate::sim::deck::DeckMode;
    use crate::sim::port::{EventLog, PresentationEvent as Ev};

    /// Session with a hand-laid deck, keys in deck order
    fn session(mode: DeckMode, keys: &[&str], lives: u32) -> SessionState {
        let config = match mode {
            DeckMode::Single => GameConfig::card_faces(),
            DeckMode::TwoLane => GameConfig::default(),
        };
        let mut state = SessionState::new(
            GameConfig {
                starting_lives: lives,
                ..config
            },
            1,
        )
        .unwrap();
        let half = keys.len() / 2;
        state.deck = keys
            .iter()
            .enumerate()
            .map(|(i, key)| {
                let card = CardRecord::new(i as CardId, *key, *key);
                match mode {
                    DeckMode::Single => card,
                    DeckMode::TwoLane if i < half => card.with_lane(Lane::Primary),
                    DeckMode::TwoLane => card.with_lane(Lane::Secondary),
                }
            })
            .collect();
        state
    }

    fn ids(state: &SessionState) -> Vec<CardId> {
        state.deck.iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_first_pick_highlights() {
        let mut state = session(DeckMode::Single, &["A", "A", "B", "B"], 3);
        let mut log = EventLog::new();

        assert_eq!(select(&mut state, &mut log, 2), SelectOutcome::Selected(2));
        assert_eq!(state.phase, SessionPhase::OneSelected);
        assert_eq!(state.selection, Selection::Single(Some(2)));
        assert_eq!(state.card(2).unwrap().state, CardState::Selected);
        assert_eq!(log.take(), vec![Ev::Highlight(2)]);
    }

    #[test]
    fn test_toggle_deselect() {
        let mut state = session(DeckMode::Single, &["A", "A", "B", "B"], 3);
        let mut log = EventLog::new();

        select(&mut state, &mut log, 1);
        assert_eq!(select(&mut state, &mut log, 1), SelectOutcome::Deselected(1));
        assert_eq!(state.phase, SessionPhase::Idle);
        assert_eq!(state.selection, Selection::Single(None));
        assert_eq!(state.lives, 3);
        assert_eq!(state.deck.len(), 4);
        assert_eq!(state.card(1).unwrap().state, CardState::Hidden);
        assert_eq!(log.take(), vec![Ev::Highlight(1), Ev::Unhighlight(1)]);
    }

    #[test]
    fn test_match_commit() {
        let mut state = session(DeckMode::Single, &["A", "B", "A", "B"], 3);
        let mut log = EventLog::new();

        select(&mut state, &mut log, 0);
        assert_eq!(
            select(&mut state, &mut log, 2),
            SelectOutcome::Resolving(Outcome::Match)
        );
        assert!(state.movement_locked);
        assert_eq!(state.phase, SessionPhase::Resolving);
        assert_eq!(state.card(2).unwrap().state, CardState::Matched);
        assert_eq!(state.deck.len(), 4);

        // Delay not elapsed yet
        assert_eq!(advance(&mut state, &mut log, 499), None);
        assert_eq!(state.deck.len(), 4);

        assert_eq!(advance(&mut state, &mut log, 1), Some(Outcome::Match));
        assert_eq!(ids(&state), vec![1, 3]);
        assert_eq!(state.lives, 3);
        assert!(!state.movement_locked);
        assert_eq!(state.phase, SessionPhase::Idle);
        assert!(state.selection.is_empty());
        assert_eq!(state.matches, 1);
        assert_eq!(
            log.take(),
            vec![
                Ev::Highlight(0),
                Ev::Highlight(2),
                Ev::MatchCue,
                Ev::CardRemoved(0),
                Ev::CardRemoved(2),
            ]
        );
    }

    #[test]
    fn test_mismatch_commit() {
        let mut state = session(DeckMode::Single, &["A", "B", "A", "B"], 3);
        let mut log = EventLog::new();

        select(&mut state, &mut log, 0);
        assert_eq!(
            select(&mut state, &mut log, 1),
            SelectOutcome::Resolving(Outcome::Mismatch)
        );
        // Life only goes at commit time
        assert_eq!(state.lives, 3);
        assert_eq!(advance(&mut state, &mut log, 999), None);
        assert_eq!(advance(&mut state, &mut log, 5), Some(Outcome::Mismatch));

        assert_eq!(state.lives, 2);
        assert_eq!(state.deck.len(), 4);
        assert!(state.deck.iter().all(|c| c.state == CardState::Hidden));
        assert!(!state.movement_locked);
        assert_eq!(state.phase, SessionPhase::Idle);
        assert_eq!(
            log.take(),
            vec![
                Ev::Highlight(0),
                Ev::Highlight(1),
                Ev::MismatchCue,
                Ev::Shake,
                Ev::Unhighlight(0),
                Ev::Unhighlight(1),
                Ev::RemoveLife,
            ]
        );
    }

    #[test]
    fn test_locked_select_is_noop() {
        let mut state = session(DeckMode::Single, &["A", "B", "A", "B"], 3);
        let mut log = EventLog::new();
        select(&mut state, &mut log, 0);
        select(&mut state, &mut log, 1);
        log.take();

        let before = (state.deck.clone(), state.selection, state.pending, state.lives);
        for id in 0..4 {
            assert_eq!(
                select(&mut state, &mut log, id),
                SelectOutcome::Ignored(IgnoreReason::Locked)
            );
        }
        assert_eq!(
            before,
            (state.deck.clone(), state.selection, state.pending, state.lives)
        );
        assert!(log.events.is_empty());
    }

    #[test]
    fn test_unknown_and_matched_cards_ignored() {
        let mut state = session(DeckMode::Single, &["A", "A", "B", "B"], 3);
        let mut log = EventLog::new();
        assert_eq!(
            select(&mut state, &mut log, 42),
            SelectOutcome::Ignored(IgnoreReason::UnknownCard)
        );

        select(&mut state, &mut log, 0);
        select(&mut state, &mut log, 1);
        commit_pending(&mut state, &mut log);
        // Stale reference to a removed card
        assert_eq!(
            select(&mut state, &mut log, 0),
            SelectOutcome::Ignored(IgnoreReason::UnknownCard)
        );
        assert_eq!(state.phase, SessionPhase::Idle);
    }

    #[test]
    fn test_win_detection() {
        let mut state = session(DeckMode::Single, &["A", "A"], 1);
        let mut log = EventLog::new();
        select(&mut state, &mut log, 0);
        select(&mut state, &mut log, 1);
        commit_pending(&mut state, &mut log);

        assert!(state.deck.is_empty());
        assert_eq!(state.status(), GameStatus::Win);
        assert_eq!(state.phase, SessionPhase::Terminal);
        assert_eq!(log.events.last(), Some(&Ev::Win));
    }

    #[test]
    fn test_loss_detection_and_lockout() {
        let mut state = session(DeckMode::Single, &["A", "B", "A", "B"], 1);
        let mut log = EventLog::new();
        select(&mut state, &mut log, 0);
        select(&mut state, &mut log, 1);
        commit_pending(&mut state, &mut log);

        assert_eq!(state.lives, 0);
        assert_eq!(state.status(), GameStatus::GameOver);
        assert!(state.is_terminal());
        assert_eq!(log.events.last(), Some(&Ev::GameOver));

        log.take();
        for id in 0..4 {
            assert_eq!(
                select(&mut state, &mut log, id),
                SelectOutcome::Ignored(IgnoreReason::Terminal)
            );
        }
        assert!(log.events.is_empty());
        assert_eq!(advance(&mut state, &mut log, 10_000), None);
    }

    #[test]
    fn test_two_pair_scenario() {
        // [A, A, B, B], one life
        let mut state = session(DeckMode::Single, &["A", "A", "B", "B"], 1);
        let mut log = EventLog::new();
        select(&mut state, &mut log, 0);
        select(&mut state, &mut log, 1);
        commit_pending(&mut state, &mut log);
        assert_eq!(ids(&state), vec![2, 3]);
        assert_eq!(state.lives, 1);

        select(&mut state, &mut log, 2);
        select(&mut state, &mut log, 3);
        commit_pending(&mut state, &mut log);
        assert!(state.deck.is_empty());
        assert_eq!(state.status(), GameStatus::Win);

        // Same opening, but the second pick is a different key
        let mut state = session(DeckMode::Single, &["A", "A", "B", "C"], 1);
        select(&mut state, &mut log, 0);
        select(&mut state, &mut log, 1);
        commit_pending(&mut state, &mut log);
        select(&mut state, &mut log, 2);
        select(&mut state, &mut log, 3);
        commit_pending(&mut state, &mut log);
        assert_eq!(state.lives, 0);
        assert_eq!(state.status(), GameStatus::GameOver);
    }

    #[test]
    fn test_reset_during_resolution_drops_commit() {
        let mut state = session(DeckMode::Single, &["A", "B", "A", "B"], 3);
        let mut log = EventLog::new();
        select(&mut state, &mut log, 0);
        select(&mut state, &mut log, 1);
        assert!(state.pending.is_some());

        state.reset(77).unwrap();
        log.take();
        assert_eq!(advance(&mut state, &mut log, 5_000), None);
        assert_eq!(commit_pending(&mut state, &mut log), None);
        assert_eq!(state.lives, 3);
        assert!(log.events.is_empty());
        assert_eq!(state.phase, SessionPhase::Idle);
    }

    #[test]
    fn test_lane_pick_moves_within_lane() {
        // Primary lane: cards 0, 1; secondary lane: cards 2, 3
        let mut state = session(DeckMode::TwoLane, &["A", "B", "B", "A"], 3);
        let mut log = EventLog::new();

        assert_eq!(select(&mut state, &mut log, 0), SelectOutcome::Selected(0));
        assert_eq!(
            select(&mut state, &mut log, 1),
            SelectOutcome::Moved { from: 0, to: 1 }
        );
        assert_eq!(
            state.selection,
            Selection::Lanes {
                primary: Some(1),
                secondary: None
            }
        );
        assert_eq!(state.phase, SessionPhase::OneSelected);
        assert!(!state.movement_locked);
        assert_eq!(
            log.take(),
            vec![Ev::Highlight(0), Ev::Unhighlight(0), Ev::Highlight(1)]
        );

        assert_eq!(select(&mut state, &mut log, 1), SelectOutcome::Deselected(1));
        assert_eq!(state.phase, SessionPhase::Idle);
    }

    #[test]
    fn test_zero_delay_waits_for_next_advance() {
        let mut state = session(DeckMode::Single, &["A", "A", "B", "B"], 3);
        state.config.match_delay_ms = 0;
        state.config.mismatch_delay_ms = 0;
        let mut log = EventLog::new();

        select(&mut state, &mut log, 0);
        assert_eq!(
            select(&mut state, &mut log, 2),
            SelectOutcome::Resolving(Outcome::Mismatch)
        );
        // Still pending until the host steps time, even by zero
        assert_eq!(state.lives, 3);
        assert!(state.movement_locked);
        assert_eq!(advance(&mut state, &mut log, 0), Some(Outcome::Mismatch));
        assert_eq!(state.lives, 2);
        assert!(!state.movement_locked);

        select(&mut state, &mut log, 0);
        select(&mut state, &mut log, 1);
        assert_eq!(state.deck.len(), 4);
        assert_eq!(advance(&mut state, &mut log, 0), Some(Outcome::Match));
        assert_eq!(ids(&state), vec![2, 3]);
        assert_eq!(advance(&mut state, &mut log, 0), None);
    }

    #[test]
    fn test_laneless_card_in_two_lane_deck_ignored() {
        let mut state = session(DeckMode::TwoLane, &["A", "B", "B", "A"], 3);
        state.deck.push(CardRecord::new(9, "C", "C"));
        let mut log = EventLog::new();

        assert_eq!(
            select(&mut state, &mut log, 9),
            SelectOutcome::Ignored(IgnoreReason::NotSelectable)
        );
        assert_eq!(state.phase, SessionPhase::Idle);
        assert!(state.selection.is_empty());
        assert_eq!(state.card(9).unwrap().state, CardState::Hidden);
        assert!(log.take().is_empty());
    }

    #[test]
    fn test_lane_match_and_mismatch() {
        let mut state = session(DeckMode::TwoLane, &["A", "B", "B", "A"], 3);
        let mut log = EventLog::new();

        // Secondary first, then primary: comparison starts once both lanes hold
        assert_eq!(select(&mut state, &mut log, 2), SelectOutcome::Selected(2));
        assert_eq!(
            select(&mut state, &mut log, 0),
            SelectOutcome::Resolving(Outcome::Mismatch)
        );
        assert_eq!(
            state.pending.map(|p| (p.first, p.second)),
            Some((0, 2))
        );
        commit_pending(&mut state, &mut log);
        assert_eq!(state.lives, 2);
        assert!(state.selection.is_empty());

        select(&mut state, &mut log, 0);
        assert_eq!(
            select(&mut state, &mut log, 3),
            SelectOutcome::Resolving(Outcome::Match)
        );
        commit_pending(&mut state, &mut log);
        assert_eq!(ids(&state), vec![1, 2]);
        assert!(state.selection.is_empty());
        assert_eq!(state.phase, SessionPhase::Idle);
    }

    #[test]
    fn test_full_round_with_dealt_deck() {
        let mut state = SessionState::new(GameConfig::card_faces(), 2024).unwrap();
        let mut log = EventLog::new();

        while !state.is_terminal() {
            let first = state.deck[0].clone();
            let partner = state
                .deck
                .iter()
                .find(|c| c.id != first.id && c.matches(&first))
                .map(|c| c.id)
                .unwrap();
            select(&mut state, &mut log, first.id);
            select(&mut state, &mut log, partner);
            while advance(&mut state, &mut log, 16).is_none() {}
        }
        assert_eq!(state.status(), GameStatus::Win);
        assert_eq!(state.matches, 5);
        assert_eq!(state.lives, 10);
    }
}
