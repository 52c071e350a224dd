//! Sky Striker entry point
//!
//! The browser build drives the game from `requestAnimationFrame` on a 2D
//! canvas. The native build has no window; it runs one autopilot game
//! headless and records the result in a file-backed ranking.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use sky_striker::consts::SIM_DT;
    use sky_striker::persistence::{KeyValueStore, LocalStorage, MemoryStore};
    use sky_striker::platform::{Clock, KeyboardState, SystemClock};
    use sky_striker::renderer::canvas::CanvasSurface;
    use sky_striker::{App, GameConfig, GameError};

    type Store = Box<dyn KeyValueStore>;

    struct Game {
        app: App<CanvasSurface, Store>,
        keyboard: KeyboardState,
        clock: SystemClock,
        last_time: f64,
    }

    impl Game {
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;

            let input = self.keyboard.take_intents();
            self.app.advance(dt, &input, self.clock.now_ms());
            self.app.render(time);
        }

        /// Screen navigation keys; false when the key is not one of them
        fn handle_menu_key(&mut self, code: &str) -> bool {
            match code {
                "Enter" => {
                    if self.app.awaiting_name() {
                        self.prompt_and_submit();
                    } else if !self.app.state().is_running() {
                        self.keyboard.release_all();
                        self.app.start_game();
                    }
                    true
                }
                "KeyR" if !self.app.state().is_running() => {
                    self.app.show_ranking();
                    true
                }
                "Escape" => {
                    if self.app.state().is_running() {
                        self.app.quit_to_title();
                    } else {
                        self.app.show_title();
                    }
                    true
                }
                _ => false,
            }
        }

        fn prompt_and_submit(&mut self) {
            let name = web_sys::window()
                .and_then(|w| w.prompt_with_message_and_default("Enter your name", "").ok())
                .flatten()
                .unwrap_or_default();
            match self.app.submit_score(&name) {
                Ok(Some(rank)) => log::info!("Ranked #{rank}"),
                Ok(None) => log::info!("Score did not place"),
                Err(e) => log::error!("Failed to save score: {e}"),
            }
        }
    }

    fn open_store() -> Store {
        match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("{e}; rankings will not persist");
                Box::new(MemoryStore::new())
            }
        }
    }

    pub fn run() -> Result<(), GameError> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {e}").into());
        }

        log::info!("Sky Striker starting...");

        let missing = |what: &str| GameError::MissingRenderTarget(what.to_string());
        let window = web_sys::window().ok_or_else(|| missing("no window"))?;
        let document = window.document().ok_or_else(|| missing("no document"))?;

        let config = GameConfig::default();
        let canvas = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());
        let surface = match canvas {
            Some(canvas) => {
                canvas.set_width(config.canvas.width as u32);
                canvas.set_height(config.canvas.height as u32);
                Some(CanvasSurface::new(&canvas, config.canvas.width, config.canvas.height)?)
            }
            None => None,
        };

        let seed = js_sys::Date::now() as u64;
        let app = App::new(config, surface, open_store(), seed)?;
        let game = Rc::new(RefCell::new(Game {
            app,
            keyboard: KeyboardState::new(),
            clock: SystemClock,
            last_time: 0.0,
        }));

        setup_input_handlers(&window, game.clone());
        request_animation_frame(game);

        log::info!("Sky Striker running!");
        Ok(())
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                let mut g = game.borrow_mut();
                let handled = if event.repeat() {
                    g.keyboard.key_down(&code)
                } else {
                    g.handle_menu_key(&code) || g.keyboard.key_down(&code)
                };
                if handled {
                    event.prevent_default();
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().keyboard.key_up(&event.code());
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            // Keys released while unfocused never send keyup
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().keyboard.release_all();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
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
    if let Err(e) = wasm_game::run() {
        log::error!("Startup failed: {e}");
        web_sys::console::error_1(&format!("Sky Striker failed to start: {e}").into());
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use sky_striker::consts::{FRAMES_PER_SECOND, SIM_DT};
    use sky_striker::persistence::FileStore;
    use sky_striker::platform::{Clock, ManualClock};
    use sky_striker::renderer::CommandRecorder;
    use sky_striker::sim::{GameEvent, TickInput};
    use sky_striker::{App, GameConfig, GameError};

    /// Ten minutes of play at the nominal rate
    const DEFAULT_FRAME_LIMIT: u64 = 36_000;
    /// Render one frame out of this many to exercise the draw path
    const RENDER_EVERY: u64 = 60;

    pub struct Options {
        pub seed: u64,
        pub frame_limit: u64,
        pub data_dir: PathBuf,
    }

    impl Options {
        /// `sky-striker [seed] [frame_limit]`; `SKY_STRIKER_DATA` picks the
        /// ranking directory
        pub fn from_args() -> Self {
            let mut args = std::env::args().skip(1);
            let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(0x5EED);
            let frame_limit = args
                .next()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_FRAME_LIMIT);
            let data_dir = std::env::var_os("SKY_STRIKER_DATA")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("sky-striker-data"));
            Self {
                seed,
                frame_limit,
                data_dir,
            }
        }
    }

    pub fn run(options: Options) -> Result<(), GameError> {
        let store = FileStore::new(&options.data_dir)?;
        log::info!("Rankings stored in {}", store.dir().display());

        let mut app = App::new(
            GameConfig::default(),
            Some(CommandRecorder::new()),
            store,
            options.seed,
        )?;
        let clock = ManualClock::new(0.0);
        let input = TickInput {
            idle_mode: true,
            ..TickInput::default()
        };
        let frame_ms = 1000.0 / FRAMES_PER_SECOND;

        app.start_game();
        let mut frames = 0;
        while frames < options.frame_limit && !app.awaiting_name() {
            for event in app.advance(SIM_DT, &input, clock.now_ms()) {
                match event {
                    GameEvent::BossSpawned { stage } => log::info!("Stage {stage} boss engaged"),
                    GameEvent::BossDefeated { stage } => log::info!("Stage {stage} boss down"),
                    GameEvent::PlayerHit { lives_left } => log::debug!("Hit, {lives_left} lives left"),
                    _ => {}
                }
            }
            if frames % RENDER_EVERY == 0 {
                app.surface_mut().reset();
                app.render(clock.now_ms());
            }
            clock.advance(frame_ms);
            frames += 1;
        }

        let hud = app.hud();
        log::info!(
            "Autopilot finished after {frames} frames: score {}, stage {}/{}, {} lives",
            hud.score,
            hud.stage,
            hud.total_stages,
            hud.lives
        );

        if !app.awaiting_name() {
            app.quit_to_title();
            return Ok(());
        }
        match app.submit_score("Autopilot")? {
            Some(rank) => log::info!("Autopilot ranked #{rank}"),
            None => log::info!("Autopilot did not place"),
        }
        for (i, entry) in app.rankings().iter().enumerate() {
            log::info!("{:>2}. {:<12} {:>8} {}", i + 1, entry.name, entry.score, entry.date);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Sky Striker (native) starting headless autopilot run...");

    if let Err(e) = headless::run(headless::Options::from_args()) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
