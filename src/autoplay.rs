//! Autoplay
//!
//! A bot with perfect memory: it remembers every card it has turned over and
//! takes a known pair whenever one is available, otherwise it explores. Used
//! by the native demo and as a whole-round check of the resolver.

use std::collections::HashMap;

use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

use crate::sim::{
    CardId, GameStatus, PresentationPort, SessionState, SelectOutcome, advance, select,
};

/// Upper bound on picks per round, in case a deck can never finish
const MAX_PICKS: usize = 10_000;

/// Memory-game bot
#[derive(Debug, Clone)]
pub struct MemoryBot {
    seen: HashMap<CardId, String>,
    rng: Pcg32,
}

impl MemoryBot {
    pub fn new(seed: u64) -> Self {
        Self {
            seen: HashMap::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Forget everything (new round)
    pub fn forget(&mut self) {
        self.seen.clear();
    }

    /// Remember the keys of every card currently face up
    pub fn observe(&mut self, state: &SessionState) {
        let mut face_up = state.selection.held();
        if let Some(pending) = &state.pending {
            face_up.extend([pending.first, pending.second]);
        }
        for id in face_up {
            if let Some(card) = state.card(id) {
                self.seen.insert(id, card.match_key.clone());
            }
        }
        self.seen.retain(|id, _| state.card(*id).is_some());
    }

    /// Next card to pick, `None` when nothing is selectable
    pub fn next_pick(&mut self, state: &SessionState) -> Option<CardId> {
        let held = state.selection.held();
        let candidates: Vec<CardId> = state
            .deck
            .iter()
            .filter(|c| c.is_selectable() && !held.contains(&c.id))
            .filter(|c| match held.first().and_then(|h| state.card(*h)) {
                // Second pick of a laned deck must come from the other lane
                Some(first) => first.lane.is_none() || c.lane != first.lane,
                None => true,
            })
            .map(|c| c.id)
            .collect();

        let partner_of = |id: CardId| {
            let key = state.card(id).map(|c| &c.match_key)?;
            candidates
                .iter()
                .copied()
                .find(|other| *other != id && self.seen.get(other) == Some(key))
        };

        match held.first() {
            Some(&first) => {
                if let Some(partner) = partner_of(first) {
                    return Some(partner);
                }
            }
            None => {
                if let Some(known) = candidates
                    .iter()
                    .copied()
                    .find(|id| self.seen.contains_key(id) && partner_of(*id).is_some())
                {
                    return Some(known);
                }
            }
        }

        let unseen: Vec<CardId> = candidates
            .iter()
            .copied()
            .filter(|id| !self.seen.contains_key(id))
            .collect();
        let pool = if unseen.is_empty() { &candidates } else { &unseen };
        pool.choose(&mut self.rng).copied()
    }
}

/// Play the current round to the end, stepping time by `frame_ms`
pub fn play_round<P: PresentationPort + ?Sized>(
    state: &mut SessionState,
    port: &mut P,
    bot: &mut MemoryBot,
    frame_ms: u32,
) -> GameStatus {
    let frame_ms = frame_ms.max(1);
    let mut picks = 0;
    while !state.is_terminal() && picks < MAX_PICKS {
        if state.pending.is_some() {
            advance(state, port, frame_ms);
            continue;
        }
        let Some(id) = bot.next_pick(state) else {
            log::warn!("Bot found nothing to pick in round {}", state.round);
            break;
        };
        if let SelectOutcome::Ignored(reason) = select(state, port, id) {
            log::warn!("Bot pick {} ignored: {:?}", id, reason);
        }
        bot.observe(state);
        picks += 1;
    }
    state.status()
}
