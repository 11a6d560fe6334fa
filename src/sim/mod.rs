//! Match-resolution core
//!
//! All gameplay rules live here. This module must stay pure:
//! - Seeded RNG only
//! - Time advances only through `advance`
//! - No rendering or platform dependencies (the outside world is a `PresentationPort`)

pub mod card;
pub mod deck;
pub mod port;
pub mod resolver;
pub mod state;

pub use card::{CardId, CardRecord, CardState, Lane};
pub use deck::{DeckError, DeckMode, build_deck, validate_deck};
pub use port::{EventLog, PresentationEvent, PresentationPort};
pub use resolver::{IgnoreReason, SelectOutcome, advance, commit_pending, select};
pub use state::{
    GameStatus, Outcome, PendingResolution, RngState, Selection, SessionPhase, SessionState,
};
