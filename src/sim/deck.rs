//! Deck generation
//!
//! Builds the shuffled deck for a round from a catalog of pair definitions
//! and rejects any deck whose keys don't pair up.

use std::collections::{HashMap, HashSet};

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::card::{CardId, CardRecord, Lane};
use crate::catalog::PairDef;

/// How cards are dealt and compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeckMode {
    /// Two identical faces per pair, any two cards may be compared
    #[default]
    Single,
    /// One card per lane per pair, comparisons are always cross-lane
    TwoLane,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeckError {
    #[error("catalog is empty")]
    EmptyCatalog,
    #[error("duplicate match key {0:?} in catalog")]
    DuplicateKey(String),
    #[error("match key {key:?} appears {count} times, expected 2")]
    UnpairedKey { key: String, count: usize },
    #[error("match key {key:?} has {count} cards in the {lane} lane, expected 1")]
    LaneImbalance {
        key: String,
        lane: &'static str,
        count: usize,
    },
    #[error("card {0} has no lane in a two-lane deck")]
    MissingLane(CardId),
    #[error("duplicate card id {0}")]
    DuplicateId(CardId),
}

/// Build and shuffle a deck from `pairs`.
///
/// Ids are assigned in final deck order, so `deck[i].id == i`.
pub fn build_deck<R: Rng + ?Sized>(
    pairs: &[PairDef],
    mode: DeckMode,
    rng: &mut R,
) -> Result<Vec<CardRecord>, DeckError> {
    if pairs.is_empty() {
        return Err(DeckError::EmptyCatalog);
    }
    let mut seen = HashSet::with_capacity(pairs.len());
    for pair in pairs {
        if !seen.insert(pair.key.as_str()) {
            return Err(DeckError::DuplicateKey(pair.key.clone()));
        }
    }

    let mut deck = match mode {
        DeckMode::Single => {
            let mut cards: Vec<CardRecord> = pairs
                .iter()
                .flat_map(|pair| {
                    [
                        CardRecord::new(0, &pair.key, &pair.primary),
                        CardRecord::new(0, &pair.key, pair.secondary_label()),
                    ]
                })
                .collect();
            cards.shuffle(rng);
            cards
        }
        DeckMode::TwoLane => {
            let mut primary: Vec<CardRecord> = pairs
                .iter()
                .map(|pair| CardRecord::new(0, &pair.key, &pair.primary).with_lane(Lane::Primary))
                .collect();
            let mut secondary: Vec<CardRecord> = pairs
                .iter()
                .map(|pair| {
                    CardRecord::new(0, &pair.key, pair.secondary_label())
                        .with_lane(Lane::Secondary)
                })
                .collect();
            // Lanes are shuffled independently so rows don't line up
            primary.shuffle(rng);
            secondary.shuffle(rng);
            primary.extend(secondary);
            primary
        }
    };

    for (index, card) in deck.iter_mut().enumerate() {
        card.id = index as CardId;
    }

    validate_deck(&deck, mode)?;
    Ok(deck)
}

/// Check the pairing invariant on a deck that hasn't been played yet
pub fn validate_deck(deck: &[CardRecord], mode: DeckMode) -> Result<(), DeckError> {
    if deck.is_empty() {
        return Err(DeckError::EmptyCatalog);
    }

    let mut ids = HashSet::with_capacity(deck.len());
    // key -> (total, primary, secondary)
    let mut counts: HashMap<&str, (usize, usize, usize)> = HashMap::new();
    for card in deck {
        if !ids.insert(card.id) {
            return Err(DeckError::DuplicateId(card.id));
        }
        let entry = counts.entry(card.match_key.as_str()).or_default();
        entry.0 += 1;
        if mode == DeckMode::TwoLane {
            match card.lane {
                Some(Lane::Primary) => entry.1 += 1,
                Some(Lane::Secondary) => entry.2 += 1,
                None => return Err(DeckError::MissingLane(card.id)),
            }
        }
    }

    // Sorted so the reported key is stable
    let mut keys: Vec<_> = counts.into_iter().collect();
    keys.sort_by(|a, b| a.0.cmp(b.0));
    for (key, (total, primary, secondary)) in keys {
        if total != 2 {
            return Err(DeckError::UnpairedKey {
                key: key.to_string(),
                count: total,
            });
        }
        if mode == DeckMode::TwoLane {
            for (lane, count) in [(Lane::Primary, primary), (Lane::Secondary, secondary)] {
                if count != 1 {
                    return Err(DeckError::LaneImbalance {
                        key: key.to_string(),
                        lane: lane.as_str(),
                        count,
                    });
                }
            }
        }
    }

    Ok(())
}
