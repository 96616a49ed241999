//! Bomb Tag entry point
//!
//! On wasm this drives the match from requestAnimationFrame and wires up the
//! keyboard, the admin command box and the HUD. Natively it plays a headless
//! demo match and logs what happens.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlInputElement, KeyboardEvent};

    use bomb_tag::sim::{GameEvent, MatchPhase, Snapshot, key_binding};
    use bomb_tag::{MatchConfig, Session};

    // Hand-off to the JavaScript side: config in, frames and results out
    #[wasm_bindgen(inline_js = "
        export function match_config_json() {
            const cfg = window.bombTagConfig;
            return cfg ? JSON.stringify(cfg) : '';
        }

        export function present_frame(json) {
            if (typeof window.renderBombTag === 'function') {
                window.renderBombTag(JSON.parse(json));
            }
        }

        export function announce_winner(winner) {
            window.dispatchEvent(new CustomEvent('bombtag:gameover', { detail: { winner } }));
        }
    ")]
    extern "C" {
        fn match_config_json() -> String;
        fn present_frame(json: &str);
        fn announce_winner(winner: &str);
    }

    /// Game instance: the session plus the page it draws into
    struct Game {
        session: Session,
        document: Document,
    }

    impl Game {
        /// Tick, present, handle events; false once the loop should stop
        fn frame(&mut self) -> bool {
            let now = js_sys::Date::now();
            let Some(snapshot) = self.session.frame(now) else {
                return false;
            };
            match snapshot.to_json() {
                Ok(json) => present_frame(&json),
                Err(e) => log::error!("Snapshot encoding failed: {e}"),
            }
            update_hud(&self.document, &snapshot);
            let over = matches!(snapshot.phase, MatchPhase::GameOver { .. });

            for event in self.session.drain_events() {
                match event {
                    GameEvent::RoundStarted { round, map } => {
                        log::info!("Round {round} on {map}");
                    }
                    GameEvent::MatchEnded { winner } => {
                        set_text(&self.document, "winner-name", &winner);
                        set_class(&self.document, "game-over", "");
                        announce_winner(&winner);
                    }
                    GameEvent::BombPassed { .. } | GameEvent::Exploded { .. } => {}
                }
            }
            !over
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_class(document: &Document, id: &str, class: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", class);
        }
    }

    fn update_hud(document: &Document, snapshot: &Snapshot<'_>) {
        set_text(document, "hud-timer", &snapshot.countdown_label());
        set_text(document, "hud-round", &snapshot.round.to_string());
        set_text(document, "hud-map", snapshot.map_name);
        set_text(document, "hud-alive", &snapshot.alive_count().to_string());

        let holder = snapshot
            .bomb_holder
            .and_then(|id| snapshot.characters.get(id))
            .map_or("-", |c| c.label.as_str());
        set_text(document, "hud-holder", holder);
    }

    /// requestAnimationFrame loop that can be cancelled from outside
    struct FrameLoop {
        pending: Cell<Option<i32>>,
        callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    }

    impl FrameLoop {
        fn start(game: Rc<RefCell<Game>>) -> Rc<Self> {
            let frames = Rc::new(Self {
                pending: Cell::new(None),
                callback: RefCell::new(None),
            });
            let weak = Rc::downgrade(&frames);
            let closure = Closure::<dyn FnMut(f64)>::new(move |_time: f64| {
                let Some(frames) = weak.upgrade() else {
                    return;
                };
                frames.pending.set(None);
                if game.borrow_mut().frame() {
                    frames.schedule();
                } else {
                    log::info!("Frame loop stopped");
                }
            });
            *frames.callback.borrow_mut() = Some(closure);
            frames.schedule();
            frames
        }

        fn schedule(&self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            if let Some(callback) = self.callback.borrow().as_ref() {
                match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                    Ok(id) => self.pending.set(Some(id)),
                    Err(e) => log::error!("requestAnimationFrame failed: {e:?}"),
                }
            }
        }

        /// Revoke the scheduled frame, if any
        fn cancel(&self) {
            let (Some(id), Some(window)) = (self.pending.take(), web_sys::window()) else {
                return;
            };
            if let Err(e) = window.cancel_animation_frame(id) {
                log::warn!("cancelAnimationFrame failed: {e:?}");
            }
        }
    }

    fn load_config() -> MatchConfig {
        let json = match_config_json();
        if json.is_empty() {
            return MatchConfig::default();
        }
        MatchConfig::from_json(&json).unwrap_or_else(|e| {
            log::warn!("Bad match config ({e}), using defaults");
            MatchConfig::default()
        })
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {e}").into());
        }

        log::info!("Bomb Tag starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document to run in");
            return;
        };
        set_class(&document, "loading", "hidden");
        set_class(&document, "game-over", "hidden");

        let config = load_config();
        let seed = js_sys::Date::now() as u64;
        let session = Session::new(config, seed, js_sys::Date::now());
        let game = Rc::new(RefCell::new(Game {
            session,
            document: document.clone(),
        }));

        setup_keyboard(game.clone());
        setup_admin_input(&document, game.clone());

        let frames = FrameLoop::start(game.clone());
        setup_teardown(&document, game, frames);

        log::info!("Bomb Tag running!");
    }

    fn typing_in_text_box(event: &KeyboardEvent) -> bool {
        event
            .target()
            .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            .is_some()
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        for (event_name, down) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if typing_in_text_box(&event) {
                    return;
                }
                let Some((slot, key)) = key_binding(&event.code()) else {
                    return;
                };
                event.prevent_default();
                let mut g = game.borrow_mut();
                let mut held = g.session.controls(slot);
                held.set(key, down);
                g.session.set_controls(slot, held);
            });
            let _ = window
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keys released while the window is unfocused never send keyup
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().session.release_all_keys();
            log::info!("Window lost focus, released all keys");
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Typed admin commands; speech transcripts are fed through the same box
    fn setup_admin_input(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(input) = document
            .get_element_by_id("admin-command")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        else {
            log::warn!("No admin command box on the page");
            return;
        };

        let input_clone = input.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if event.key() != "Enter" {
                return;
            }
            let text = input_clone.value();
            if !game.borrow_mut().session.submit_text(&text) {
                log::info!("Unknown command: {text}");
            }
            input_clone.set_value("");
        });
        let _ = input.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Leaving the match (quit button or page hide) stops the loop for good
    fn setup_teardown(document: &Document, game: Rc<RefCell<Game>>, frames: Rc<FrameLoop>) {
        let teardown = Rc::new(move || {
            frames.cancel();
            game.borrow_mut().session.teardown();
        });

        if let Some(btn) = document.get_element_by_id("quit-btn") {
            let teardown = teardown.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                teardown();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                teardown();
            });
            let _ = window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Bomb Tag (native) starting headless demo match...");
    demo::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::time::{SystemTime, UNIX_EPOCH};

    use bomb_tag::sim::{GameEvent, MatchPhase};
    use bomb_tag::{MatchConfig, Session};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after this much simulated time
    const MAX_MATCH_MS: f64 = 20.0 * 60.0 * 1000.0;
    /// Admin commands replayed during the demo, by simulated time
    const SCRIPT: &[(f64, &str)] = &[
        (2_000.0, "giant 3"),
        (4_000.0, "target one"),
        (6_000.0, "bomb player 2"),
        (9_000.0, "swap"),
        (20_000.0, "close 4"),
    ];

    /// Optional JSON config as the first argument, e.g. '{"humanCount":3}'
    fn config_from_args() -> MatchConfig {
        let Some(json) = std::env::args().nth(1) else {
            return MatchConfig::default();
        };
        MatchConfig::from_json(&json).unwrap_or_else(|e| {
            log::warn!("Bad match config ({e}), using defaults");
            MatchConfig::default()
        })
    }

    pub fn run() {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let mut session = Session::new(config_from_args(), seed, 0.0);
        let mut script = SCRIPT.iter().peekable();

        let mut now = 0.0;
        while now < MAX_MATCH_MS {
            now += FRAME_MS;
            while let Some(&&(at, text)) = script.peek() {
                if at > now {
                    break;
                }
                log::info!("Admin: {text}");
                session.submit_text(text);
                script.next();
            }

            let over = session
                .frame(now)
                .is_some_and(|s| matches!(s.phase, MatchPhase::GameOver { .. }));

            for event in session.drain_events() {
                match event {
                    GameEvent::BombPassed { from, to } => {
                        log::info!("{:.1}s: bomb {from} -> {to}", now / 1000.0);
                    }
                    GameEvent::Exploded { victim } => {
                        log::info!("{:.1}s: {victim} exploded", now / 1000.0);
                    }
                    GameEvent::RoundStarted { round, map } => {
                        log::info!("Round {round} on {map}");
                    }
                    GameEvent::MatchEnded { winner } => {
                        log::info!("Winner: {winner}");
                    }
                }
            }
            if over {
                break;
            }
        }
        session.teardown();
    }
}
