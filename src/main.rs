//! Word Match entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{KeyboardEvent, MouseEvent};

    use word_match::audio::SoundEffect;
    use word_match::consts::*;
    use word_match::sim::{SelectOutcome, SessionState, advance, select};
    use word_match::web::DomPort;
    use word_match::{GameConfig, Settings};

    /// Game instance holding all state
    struct Game {
        state: SessionState,
        port: DomPort,
        last_time: f64,
        /// Set once the title screen is dismissed
        started: bool,
    }

    impl Game {
        /// Run one frame of presentation time
        fn update(&mut self, dt_ms: u32) {
            let dt_ms = dt_ms.min(MAX_FRAME_MS);
            if let Some(outcome) = advance(&mut self.state, &mut self.port, dt_ms) {
                log::debug!("Committed {:?}, status {}", outcome, self.state.status().as_str());
            }
            self.port.tick(dt_ms);
            self.port.update_hud(&self.state);
        }

        /// Leave the title screen and deal the first round
        fn start(&mut self) {
            if self.started {
                return;
            }
            self.started = true;
            self.port.play(SoundEffect::Whoosh);
            self.port.deal(&self.state);
            log::info!("Round {} started", self.state.round);
        }

        /// Forward a board click to the resolver
        fn click(&mut self, point: Vec2) {
            if !self.started {
                return;
            }
            let Some(id) = self.port.card_at(point) else {
                return;
            };
            if let SelectOutcome::Ignored(reason) = select(&mut self.state, &mut self.port, id) {
                log::debug!("Pick of card {} ignored: {:?}", id, reason);
            }
        }

        /// Deal a fresh round
        fn restart(&mut self, seed: u64) {
            if !self.started {
                return;
            }
            match self.state.reset(seed) {
                Ok(()) => {
                    self.port.deal(&self.state);
                    log::info!("Game restarted with seed: {}", seed);
                }
                Err(e) => log::error!("Restart failed: {}", e),
            }
        }
    }

    /// Config from `<script id="game-config" type="application/json">`, if present
    fn load_config(document: &web_sys::Document) -> GameConfig {
        let Some(json) = document
            .get_element_by_id("game-config")
            .and_then(|el| el.text_content())
        else {
            return GameConfig::default();
        };
        match GameConfig::from_json(&json) {
            Ok(config) => {
                log::info!("Loaded game config ({} pairs)", config.pair_count);
                config
            }
            Err(e) => {
                log::error!("Bad game config, using defaults: {}", e);
                GameConfig::default()
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Word Match starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let config = load_config(&document);
        let grid = config.layout();
        let seed = js_sys::Date::now() as u64;
        let state = match SessionState::new(config, seed) {
            Ok(state) => state,
            Err(e) => {
                log::error!("Invalid config ({}), falling back to defaults", e);
                SessionState::new(GameConfig::default(), seed).expect("default config is valid")
            }
        };

        let settings = Settings::load();
        let port = DomPort::new(document.clone(), settings, grid).expect("no #board element");

        // The board is dealt from the title screen click, which also
        // unlocks Web Audio
        let game = Rc::new(RefCell::new(Game {
            state,
            port,
            last_time: 0.0,
            started: false,
        }));
        log::info!("Game initialized with seed: {}", seed);

        setup_title(game.clone());
        setup_board_input(game.clone());
        setup_buttons(game.clone());
        setup_keyboard(game.clone());

        request_animation_frame(game);

        log::info!("Word Match running!");
    }

    fn setup_title(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();
        let Some(title) = document.get_element_by_id("title") else {
            game.borrow_mut().start();
            return;
        };
        let title_clone = title.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let _ = title_clone.set_attribute("class", "hidden");
            game.borrow_mut().start();
        });
        let _ = title.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_board_input(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();
        let Some(board) = document.get_element_by_id("board") else {
            return;
        };
        let board_clone = board.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let rect = board_clone.get_bounding_client_rect();
            let point = Vec2::new(
                event.client_x() as f32 - rect.left() as f32,
                event.client_y() as f32 - rect.top() as f32,
            );
            game.borrow_mut().click(point);
        });
        let _ = board.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        // Restart from the end-of-round banner or the restart button
        for id in ["banner", "restart-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    let mut g = game.borrow_mut();
                    g.port.play(SoundEffect::Whoosh);
                    g.restart(js_sys::Date::now() as u64);
                });
                let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        // Volume icon
        if let Some(btn) = document.get_element_by_id("volume-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().port.update_settings(|s| {
                    s.toggle_mute();
                });
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut g = game.borrow_mut();
            match event.key().as_str() {
                "d" | "D" => g.port.update_settings(|s| {
                    let shown = s.toggle_debug();
                    log::info!("Debug overlay: {}", shown);
                }),
                "m" | "M" => g.port.update_settings(|s| {
                    s.toggle_mute();
                }),
                "r" | "R" => g.restart(js_sys::Date::now() as u64),
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt_ms = if g.last_time > 0.0 {
                (time - g.last_time).max(0.0) as u32
            } else {
                0
            };
            g.last_time = time;

            g.update(dt_ms);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Word Match (native) starting...");
    log::info!("The playable version is the web build - run with `trunk serve`");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(42);
    let config = match std::env::args().nth(2).as_deref() {
        Some("faces") => word_match::GameConfig::card_faces(),
        _ => word_match::GameConfig::default(),
    };

    if let Err(e) = demo_round(config, seed) {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

/// Let the memory bot play one round and log every presentation call
#[cfg(not(target_arch = "wasm32"))]
fn demo_round(config: word_match::GameConfig, seed: u64) -> Result<(), word_match::ConfigError> {
    use word_match::autoplay::{MemoryBot, play_round};
    use word_match::debug::debug_lines;
    use word_match::sim::{EventLog, SessionState};

    let grid = config.layout();
    let mut state = SessionState::new(config, seed)?;
    let mut events = EventLog::new();
    let mut bot = MemoryBot::new(seed);

    let status = play_round(&mut state, &mut events, &mut bot, 16);
    for event in &events.events {
        log::debug!("{:?}", event);
    }
    for line in debug_lines(&state, &grid) {
        log::info!("{}", line);
    }
    println!(
        "Round finished: {} ({} matches, {} mismatches, {} lives left)",
        status.as_str(),
        state.matches,
        state.mismatches,
        state.lives
    );
    Ok(())
}
