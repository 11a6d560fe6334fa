//! DOM presentation layer
//!
//! Cards are absolutely positioned `div`s inside `#board`; highlight,
//! removal and shake are CSS classes. Lives are heart icons in `#lives`.

use std::collections::HashMap;

use glam::Vec2;
use web_sys::{Document, Element};

use crate::audio::{AudioManager, SoundEffect};
use crate::consts::SHAKE_DURATION_MS;
use crate::debug::debug_lines;
use crate::layout::GridLayout;
use crate::settings::Settings;
use crate::sim::{CardId, CardRecord, PresentationPort, SessionState};

/// Presentation port backed by the page DOM
pub struct DomPort {
    document: Document,
    board: Element,
    audio: AudioManager,
    settings: Settings,
    grid: GridLayout,
    cards: HashMap<CardId, Element>,
    placed: Vec<(CardId, Vec2)>,
    shake_ms: u32,
}

impl DomPort {
    /// Bind to `#board`; `None` if the page doesn't have one
    pub fn new(document: Document, settings: Settings, grid: GridLayout) -> Option<Self> {
        let board = document.get_element_by_id("board")?;
        let mut audio = AudioManager::new();
        audio.apply_settings(&settings);
        let port = Self {
            document,
            board,
            audio,
            settings,
            grid,
            cards: HashMap::new(),
            placed: Vec::new(),
            shake_ms: 0,
        };
        port.set_class("volume-btn", "muted", port.settings.muted);
        Some(port)
    }

    /// Change settings, persist them and refresh dependent state
    pub fn update_settings(&mut self, f: impl FnOnce(&mut Settings)) {
        f(&mut self.settings);
        self.settings.save();
        self.audio.apply_settings(&self.settings);
        self.set_class("volume-btn", "muted", self.settings.muted);
        if !self.settings.show_debug {
            self.set_class("debug", "hidden", true);
        }
    }

    pub fn play(&self, effect: SoundEffect) {
        self.audio.play(effect);
    }

    /// Rebuild the board for a freshly dealt round
    pub fn deal(&mut self, state: &SessionState) {
        self.board.set_inner_html("");
        self.cards.clear();
        self.placed = self.grid.place(&state.deck);
        self.shake_ms = 0;
        let _ = self.board.class_list().remove_1("shake");

        let size = self.grid.scaled_card_size();
        for (&(id, center), card) in self.placed.iter().zip(&state.deck) {
            let Ok(el) = self.document.create_element("div") else {
                continue;
            };
            let top_left = center - size / 2.0;
            let _ = el.set_attribute("class", "card");
            let _ = el.set_attribute("data-card-id", &id.to_string());
            let _ = el.set_attribute(
                "style",
                &format!(
                    "left:{:.1}px;top:{:.1}px;width:{:.1}px;height:{:.1}px",
                    top_left.x, top_left.y, size.x, size.y
                ),
            );
            if let Some(lane) = card.lane {
                let _ = el.class_list().add_1(lane.as_str());
            }
            el.set_text_content(Some(&card.face_label));
            let _ = self.board.append_child(&el);
            self.cards.insert(id, el);
        }

        if let Some(lives) = self.document.get_element_by_id("lives") {
            lives.set_inner_html(&"<span class=\"heart\"></span>".repeat(state.lives as usize));
        }
        self.set_class("banner", "hidden", true);
        self.play(SoundEffect::CardSlide);
        log::debug!("Dealt {} cards to the board", self.cards.len());
    }

    /// Card under a board-relative point
    pub fn card_at(&self, point: Vec2) -> Option<CardId> {
        self.grid.hit_test(&self.placed, point)
    }

    /// Per-frame upkeep for timed effects
    pub fn tick(&mut self, dt_ms: u32) {
        if self.shake_ms > 0 {
            self.shake_ms = self.shake_ms.saturating_sub(dt_ms);
            if self.shake_ms == 0 {
                let _ = self.board.class_list().remove_1("shake");
            }
        }
    }

    /// Refresh the HUD and, when visible, the debug overlay
    pub fn update_hud(&self, state: &SessionState) {
        if let Some(el) = self.document.query_selector("#hud-pairs .hud-value").ok().flatten() {
            el.set_text_content(Some(&state.pairs_remaining().to_string()));
        }

        if let Some(el) = self.document.get_element_by_id("debug") {
            if self.settings.show_debug {
                let _ = el.set_attribute("class", "");
                el.set_text_content(Some(&debug_lines(state, &self.grid).join("\n")));
            }
        }
    }

    fn set_class(&self, id: &str, class: &str, on: bool) {
        if let Some(el) = self.document.get_element_by_id(id) {
            let list = el.class_list();
            let _ = if on { list.add_1(class) } else { list.remove_1(class) };
        }
    }

    fn show_banner(&self, text: &str) {
        if let Some(el) = self.document.get_element_by_id("banner") {
            el.set_text_content(Some(text));
            let _ = el.set_attribute("class", "");
        }
    }
}

impl PresentationPort for DomPort {
    fn highlight(&mut self, card: &CardRecord) {
        if let Some(el) = self.cards.get(&card.id) {
            let _ = el.class_list().add_1("selected");
        }
        self.play(SoundEffect::CardFlip);
    }

    fn unhighlight(&mut self, card: &CardRecord) {
        if let Some(el) = self.cards.get(&card.id) {
            let _ = el.class_list().remove_1("selected");
        }
    }

    fn play_match_cue(&mut self) {
        self.play(SoundEffect::Match);
    }

    fn play_mismatch_cue(&mut self) {
        self.play(SoundEffect::Mismatch);
    }

    fn shake_on_mismatch(&mut self) {
        if !self.settings.effective_screen_shake() {
            return;
        }
        let _ = self.board.class_list().add_1("shake");
        self.shake_ms = SHAKE_DURATION_MS;
    }

    fn remove_life_indicator(&mut self) {
        if let Some(heart) = self
            .document
            .get_element_by_id("lives")
            .and_then(|lives| lives.last_element_child())
        {
            heart.remove();
        }
    }

    fn animate_card_removal(&mut self, card: &CardRecord) {
        self.placed.retain(|(id, _)| *id != card.id);
        let Some(el) = self.cards.remove(&card.id) else {
            return;
        };
        if self.settings.reduced_motion {
            el.remove();
        } else {
            // CSS transition slides it out; the next deal clears the board
            let _ = el.class_list().add_1("removed");
        }
    }

    fn announce_win(&mut self) {
        self.play(SoundEffect::Victory);
        self.show_banner("You Win!");
    }

    fn announce_game_over(&mut self) {
        self.play(SoundEffect::GameOver);
        self.show_banner("Game Over");
    }
}
