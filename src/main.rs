//! Skyflap entry point
//!
//! Wires the simulation to the browser: canvas, overlays, input events and
//! the requestAnimationFrame loop. On native it runs a short headless demo
//! so the sim can be exercised without a browser.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, HtmlCanvasElement};

    use skyflap::renderer::CanvasRenderer;
    use skyflap::sim::{GameEvent, GameState, Phase};
    use skyflap::{BestScore, Settings};

    /// DOM elements the driver updates on game events
    struct Hud {
        score: Option<Element>,
        best_score: Option<Element>,
        start_overlay: Option<Element>,
        game_over_overlay: Option<Element>,
        final_score: Option<Element>,
        final_best_score: Option<Element>,
    }

    impl Hud {
        fn lookup(document: &web_sys::Document) -> Self {
            let find = |id: &str| {
                let el = document.get_element_by_id(id);
                if el.is_none() {
                    log::warn!("missing element #{id}");
                }
                el
            };
            Self {
                score: find("score"),
                best_score: find("bestScore"),
                start_overlay: find("startOverlay"),
                game_over_overlay: find("gameOverOverlay"),
                final_score: find("finalScore"),
                final_best_score: find("finalBestScore"),
            }
        }

        fn set_text(el: &Option<Element>, value: u32) {
            if let Some(el) = el {
                el.set_text_content(Some(&value.to_string()));
            }
        }

        fn set_visible(el: &Option<Element>, visible: bool) {
            if let Some(el) = el {
                if visible {
                    let _ = el.class_list().add_1("overlay--visible");
                    let _ = el.set_attribute("aria-hidden", "false");
                } else {
                    let _ = el.class_list().remove_1("overlay--visible");
                    let _ = el.set_attribute("aria-hidden", "true");
                }
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: CanvasRenderer,
        best: BestScore,
        settings: Settings,
        hud: Hud,
        last_time: f64,
    }

    impl Game {
        fn update_score_displays(&self) {
            Hud::set_text(&self.hud.score, self.state.score);
            Hud::set_text(&self.hud.best_score, self.state.best);
        }

        fn apply_event(&mut self, event: GameEvent) {
            match event {
                GameEvent::Scored { total } => {
                    Hud::set_text(&self.hud.score, total);
                }
                GameEvent::NewBest { score } => {
                    // Fire-and-forget; a broken storage layer is harmless
                    self.best.record(score);
                    self.best.save();
                    Hud::set_text(&self.hud.best_score, score);
                }
                GameEvent::PhaseChanged(phase) => {
                    match phase {
                        Phase::Ready => {
                            Hud::set_visible(&self.hud.start_overlay, true);
                            Hud::set_visible(&self.hud.game_over_overlay, false);
                        }
                        Phase::Playing => {
                            Hud::set_visible(&self.hud.start_overlay, false);
                            Hud::set_visible(&self.hud.game_over_overlay, false);
                        }
                        Phase::Over => {
                            Hud::set_visible(&self.hud.game_over_overlay, true);
                            Hud::set_text(&self.hud.final_score, self.state.score);
                            Hud::set_text(&self.hud.final_best_score, self.state.best);
                        }
                        Phase::Dying => {}
                    }
                    self.update_score_displays();
                }
            }
        }

        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            self.last_time = time;

            self.state.tick_frame(dt);
            for event in self.state.drain_events() {
                self.apply_event(event);
            }
            self.renderer
                .draw(&self.state, self.settings.effective_screen_shake());
        }

        fn resize_to_window(&mut self) {
            let window = match web_sys::window() {
                Some(w) => w,
                None => return,
            };
            let width = window
                .inner_width()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0) as f32;
            let height = window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0) as f32;

            self.state.on_resize(width, height);
            self.renderer.configure(&self.state.metrics);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = match document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into().ok())
        {
            Some(canvas) => canvas,
            None => {
                log::error!("no #gameCanvas element, cannot start");
                return;
            }
        };

        let renderer = match CanvasRenderer::new(canvas.clone()) {
            Ok(renderer) => renderer,
            Err(err) => {
                log::error!("canvas context unavailable: {err:?}");
                return;
            }
        };

        let seed = js_sys::Date::now() as u64;
        let best = BestScore::load();
        let mut state = GameState::new(seed, 0.0, 0.0);
        state.best = best.score;

        let game = Rc::new(RefCell::new(Game {
            state,
            renderer,
            best,
            settings: Settings::load(),
            hud: Hud::lookup(&document),
            last_time: 0.0,
        }));

        {
            let mut g = game.borrow_mut();
            g.resize_to_window();
            g.update_score_displays();
        }

        setup_input_handlers(&canvas, game.clone());
        setup_resize_handler(game.clone());
        request_animation_frame(game);

        log::info!("Skyflap running (seed {seed})");
    }

    fn primary_action(game: &Rc<RefCell<Game>>) {
        game.borrow_mut().state.handle_primary_action();
    }

    /// Attach the primary action to an element, covering mouse, touch and pen
    fn attach_primary(target: &Element, game: Rc<RefCell<Game>>, event_name: &str) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            event.prevent_default();
            event.stop_propagation();
            primary_action(&game);
        });
        let _ = target.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        attach_primary(canvas, game.clone(), "pointerdown");
        attach_primary(canvas, game.clone(), "touchstart");

        let document = web_sys::window().unwrap().document().unwrap();
        for id in ["startOverlay", "restartBtn"] {
            if let Some(el) = document.get_element_by_id(id) {
                attach_primary(&el, game.clone(), "pointerdown");
                attach_primary(&el, game.clone(), "click");
            }
        }

        // Keyboard
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if event.code() == "Space" || event.code() == "ArrowUp" {
                    event.prevent_default();
                    primary_action(&game);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize_to_window();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
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
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use skyflap::sim::{GameState, Phase};

    env_logger::init();
    log::info!("Skyflap (native) - headless demo run");

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(1);

    let mut state = GameState::new(seed, 800.0, 600.0);
    state.handle_primary_action();

    // Naive autopilot: flap whenever the bird sinks below the next gap
    let dt = 1.0 / 60.0;
    for _ in 0..60 * 60 {
        if state.phase == Phase::Playing {
            let target = state
                .pipes
                .iter()
                .find(|p| p.trailing_edge() > state.bird.x)
                .map(|p| (p.top_height + p.bottom_y) / 2.0)
                .unwrap_or(state.metrics.height * 0.45);
            if state.bird.bottom() > target {
                state.handle_primary_action();
            }
        }
        state.tick_frame(dt);
        if state.phase == Phase::Over {
            break;
        }
    }

    println!(
        "demo finished: score {}, phase {:?}, seed {}",
        state.score, state.phase, seed
    );
}
