//! Speed Rays entry point
//!
//! Native: headless autopilot run, `speed-rays [race|park] [seed] [--max-frames N]`.
//! Web: keyboard-driven loop on the browser's animation frame.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::KeyboardEvent;

    use speed_rays::audio::WebAudio;
    use speed_rays::persistence::LocalStorageRunLog;
    use speed_rays::render::{Hud, RenderSink};
    use speed_rays::sim::{Mode, Profile, Session, TickInput};
    use speed_rays::{Flow, Game, Settings, Tuning, platform};

    /// Writes the HUD line into `#hud`
    struct DomHud;

    impl RenderSink for DomHud {
        fn draw(&mut self, session: &Session) {
            let el = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id("hud"));
            if let Some(el) = el {
                el.set_text_content(Some(&Hud::from_session(session).line()));
            }
        }
    }

    struct App {
        game: Game<DomHud, WebAudio, LocalStorageRunLog>,
        input: TickInput,
        last_time: f64,
    }

    pub fn run() {
        platform::init_logging();
        log::info!("Speed Rays (web) starting...");

        let settings = Settings::load();
        let mut game = Game::new(
            Tuning::default(),
            settings,
            DomHud,
            WebAudio::new(),
            LocalStorageRunLog,
        );
        let generation = game.start(Profile::default(), Mode::Race, 1, seed());
        let app = Rc::new(RefCell::new(App {
            game,
            input: TickInput::default(),
            last_time: 0.0,
        }));

        setup_keyboard(app.clone());
        setup_auto_pause(app.clone());
        request_animation_frame(app, generation);
    }

    fn seed() -> u64 {
        platform::now_ms() as u64
    }

    fn set_key(input: &mut TickInput, key: &str, down: bool) -> bool {
        match key {
            "ArrowLeft" | "a" | "A" => input.left = down,
            "ArrowRight" | "d" | "D" => input.right = down,
            "ArrowUp" | "w" | "W" => input.up = down,
            "ArrowDown" | "s" | "S" => input.down = down,
            _ => return false,
        }
        true
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                let mut a = app.borrow_mut();
                // Browsers only start audio after a user gesture
                a.game.audio().sink().resume();
                if set_key(&mut a.input, &key, true) {
                    event.prevent_default();
                    return;
                }
                match key.as_str() {
                    "Escape" | "p" | "P" => {
                        a.input.pause = !a.input.pause;
                        log::info!("Paused: {}", a.input.pause);
                    }
                    "i" | "I" => {
                        a.input.autopilot = !a.input.autopilot;
                        log::info!("Autopilot: {}", a.input.autopilot);
                    }
                    "r" | "R" | "Enter" => {
                        let stopped = a.game.session().is_none_or(|s| !s.running);
                        if stopped {
                            let generation = a.game.restart(seed());
                            a.last_time = 0.0;
                            drop(a);
                            request_animation_frame(app.clone(), generation);
                        }
                    }
                    "m" | "M" => {
                        let mode = match a.game.session().map(|s| s.mode) {
                            Some(Mode::Race) => Mode::Park,
                            _ => Mode::Race,
                        };
                        let level = a.game.unlocked(mode);
                        let generation = a.game.start(Profile::default(), mode, level, seed());
                        a.last_time = 0.0;
                        drop(a);
                        request_animation_frame(app.clone(), generation);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut a = app.borrow_mut();
            set_key(&mut a.input, &event.key(), false);
        });
        let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Pause when the window loses focus
    fn setup_auto_pause(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            let mut a = app.borrow_mut();
            if !a.input.pause {
                a.input.pause = true;
                log::info!("Auto-paused (window blur)");
            }
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>, generation: u64) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, generation, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, generation: u64, time: f64) {
        let flow = {
            let mut a = app.borrow_mut();
            // A newer run owns the loop now
            if !a.game.is_current(generation) {
                return;
            }

            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                speed_rays::consts::SIM_DT
            };
            a.last_time = time;

            let input = a.input.clone();
            a.game.update(dt, &input)
        };

        if flow == Flow::Continue {
            request_animation_frame(app, generation);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::Path;

    use clap::Parser;
    use speed_rays::audio::LogAudio;
    use speed_rays::highscores::HighScores;
    use speed_rays::persistence::JsonFileRunLog;
    use speed_rays::render::{Hud, LogRenderer};
    use speed_rays::sim::{Mode, Profile};
    use speed_rays::{AutopilotPump, Flow, Game, Settings, Tuning, platform};

    /// Three minutes of simulated time
    const MAX_FRAMES: u64 = 60 * 60 * 3;
    const RUN_LOG_PATH: &str = "runs.json";
    const SETTINGS_PATH: &str = "settings.json";
    const TUNING_PATH: &str = "tuning.json";

    /// Speed Rays headless run - the autopilot drives one session
    #[derive(Parser, Debug)]
    #[command(name = "speed-rays")]
    #[command(about = "Run one autopilot session and print the leaderboard")]
    pub struct Args {
        /// Game mode: race or park
        #[arg(default_value = "race")]
        pub mode: Mode,

        /// RNG seed for a reproducible run (defaults to the clock)
        pub seed: Option<u64>,

        /// Frame cap before the run is cancelled
        #[arg(long, default_value_t = MAX_FRAMES)]
        pub max_frames: u64,
    }

    impl Args {
        pub fn seed(&self) -> u64 {
            self.seed.unwrap_or_else(|| platform::now_ms() as u64)
        }
    }

    pub fn run(args: &Args) -> speed_rays::Result<()> {
        let tuning = if Path::new(TUNING_PATH).exists() {
            Tuning::load(TUNING_PATH)?
        } else {
            Tuning::default()
        };
        let settings = Settings {
            autopilot: true,
            ..Settings::load(Path::new(SETTINGS_PATH))?
        };

        let mut game = Game::new(
            tuning,
            settings,
            LogRenderer::new(60),
            LogAudio,
            JsonFileRunLog::new(RUN_LOG_PATH),
        );
        game.start(Profile::default(), args.mode, 1, args.seed());

        if game.run(&mut AutopilotPump::new(args.max_frames)) == Flow::Continue {
            log::info!("Frame cap reached, ending run");
            game.cancel();
        }
        if let Some(session) = game.session() {
            log::info!("{}", Hud::from_session(session).line());
        }

        let records = game.run_log().read()?;
        let scores = HighScores::from_records(&records);
        if let Some(record) = game.last_record() {
            println!(
                "{} {}: {} points in {}s [{}]",
                record.avatar,
                record.name,
                record.score,
                record.time,
                record.badges.join(", ")
            );
            // Rank against the board as it stood before this run
            let earlier = records.iter().filter(|r| *r != record);
            match HighScores::from_records(earlier).add(record) {
                Some(rank) => println!("New high score! Rank #{rank}"),
                None => {
                    if let Some(best) = scores.top_score() {
                        println!("Best: {best}");
                    }
                }
            }
        }

        println!("\nHigh scores:");
        if scores.is_empty() {
            println!("  (none yet)");
        }
        for line in scores.lines() {
            println!("  {line}");
        }
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_args() {
            let args = Args::try_parse_from(["speed-rays", "park", "7"]).unwrap();
            assert_eq!(args.mode, Mode::Park);
            assert_eq!(args.seed(), 7);
            assert_eq!(args.max_frames, MAX_FRAMES);

            let args = Args::try_parse_from(["speed-rays", "parking", "1", "--max-frames", "90"])
                .unwrap();
            assert_eq!(args.mode, Mode::Park);
            assert_eq!(args.max_frames, 90);

            let args = Args::try_parse_from(["speed-rays"]).unwrap();
            assert_eq!(args.mode, Mode::Race);
            assert_eq!(args.seed, None);
        }

        #[test]
        fn test_args_rejects_bad_input() {
            assert!(Args::try_parse_from(["speed-rays", "golf"]).is_err());
            assert!(Args::try_parse_from(["speed-rays", "race", "x"]).is_err());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    speed_rays::platform::init_logging();

    let args = native::Args::parse();
    log::info!(
        "Speed Rays (native) starting: mode={} seed={:?}",
        args.mode.as_str(),
        args.seed
    );
    if let Err(e) = native::run(&args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
