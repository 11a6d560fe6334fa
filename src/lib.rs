//! Word Match - A memory/word-matching card game
//!
//! Core modules:
//! - `sim`: Deterministic match-resolution core (cards, deck, session, resolver)
//! - `autoplay`: Memory bot that plays whole rounds through the resolver
//! - `catalog`: Pair definitions (word pairs, card faces)
//! - `config`: Round configuration and validation
//! - `layout`: Grid placement and hit testing for the presentation layer
//! - `settings`: Player preferences persisted in LocalStorage
//! - `debug`: Text overlay describing the live session
//! - `web`: DOM presentation layer (wasm32 only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod autoplay;
pub mod catalog;
pub mod config;
pub mod debug;
pub mod layout;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use catalog::{Catalog, PairDef};
pub use config::{ConfigError, GameConfig};
pub use layout::GridLayout;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Lives at the start of every round
    pub const DEFAULT_LIVES: u32 = 10;
    /// Pairs dealt per round
    pub const DEFAULT_PAIR_COUNT: usize = 5;

    /// Delay between a match decision and the cards leaving the deck (ms)
    pub const MATCH_DELAY_MS: u32 = 500;
    /// Delay between a mismatch decision and the life being taken (ms)
    pub const MISMATCH_DELAY_MS: u32 = 1000;

    /// Board shake on mismatch
    pub const SHAKE_DURATION_MS: u32 = 600;

    /// Unscaled card face size (pixels)
    pub const CARD_WIDTH: f32 = 98.0;
    pub const CARD_HEIGHT: f32 = 128.0;

    /// Logical canvas size
    pub const VIEW_WIDTH: f32 = 549.0;
    pub const VIEW_HEIGHT: f32 = 480.0;

    /// Frame delta clamp so a backgrounded tab doesn't commit everything at once
    pub const MAX_FRAME_MS: u32 = 100;
}
