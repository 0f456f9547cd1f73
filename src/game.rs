//! Frame driver
//!
//! [`Game`] owns the live [`Session`] and everything the simulation must not
//! touch: the render sink, audio, the run log and level unlocks. The host
//! calls [`Game::step`] (one tick) or [`Game::update`] (wall-clock delta,
//! fixed substeps) from its frame callback and stops rescheduling when the
//! returned [`Flow`] is `Stop`.
//!
//! Every `start`/`restart`/`cancel` bumps a generation counter. A host that
//! captured an older generation in a pending callback must drop it, so at
//! most one tick stream drives a session.

use std::collections::HashMap;

use crate::audio::{AudioManager, AudioSink, SoundEffect};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::highscores::{RunLog, RunRecord};
use crate::persistence::append_or_warn;
use crate::platform;
use crate::render::RenderSink;
use crate::settings::Settings;
use crate::sim::progression::level_count;
use crate::sim::{Flow, GameEvent, Mode, Profile, Session, TickInput, tick};
use crate::tuning::Tuning;

/// Source of per-frame input for [`Game::run`]
///
/// Returning `None` ends the loop (window closed, frame cap reached).
pub trait FramePump {
    fn next_frame(&mut self) -> Option<TickInput>;
}

/// Pump that hands the wheel to the autopilot for a bounded number of frames
#[derive(Debug, Clone)]
pub struct AutopilotPump {
    frames_left: u64,
}

impl AutopilotPump {
    pub fn new(max_frames: u64) -> Self {
        Self {
            frames_left: max_frames,
        }
    }
}

impl FramePump for AutopilotPump {
    fn next_frame(&mut self) -> Option<TickInput> {
        if self.frames_left == 0 {
            return None;
        }
        self.frames_left -= 1;
        Some(TickInput {
            autopilot: true,
            ..Default::default()
        })
    }
}

/// Pump replaying a fixed input script
#[derive(Debug, Clone, Default)]
pub struct ScriptedPump {
    inputs: std::collections::VecDeque<TickInput>,
}

impl ScriptedPump {
    pub fn new(inputs: impl IntoIterator<Item = TickInput>) -> Self {
        Self {
            inputs: inputs.into_iter().collect(),
        }
    }
}

impl FramePump for ScriptedPump {
    fn next_frame(&mut self) -> Option<TickInput> {
        self.inputs.pop_front()
    }
}

/// Game instance holding the session and its side-effect sinks
pub struct Game<R: RenderSink, A: AudioSink, L: RunLog> {
    session: Option<Session>,
    /// Last run's profile and mode, for restart
    profile: Profile,
    mode: Mode,
    tuning: Tuning,
    settings: Settings,
    renderer: R,
    audio: AudioManager<A>,
    run_log: L,
    /// Highest level reached per mode
    unlocked: HashMap<Mode, u32>,
    accumulator: f32,
    generation: u64,
    recorded: bool,
    last_record: Option<RunRecord>,
}

impl<R: RenderSink, A: AudioSink, L: RunLog> Game<R, A, L> {
    pub fn new(tuning: Tuning, settings: Settings, renderer: R, audio: A, run_log: L) -> Self {
        let mut audio = AudioManager::new(audio);
        audio.apply_settings(&settings);
        Self {
            session: None,
            profile: Profile::default(),
            mode: Mode::default(),
            tuning: tuning.sanitized(),
            settings,
            renderer,
            audio,
            run_log,
            unlocked: HashMap::new(),
            accumulator: 0.0,
            generation: 0,
            recorded: false,
            last_record: None,
        }
    }

    /// Begin a new run, replacing any current one
    ///
    /// `level` is clamped to `[1, unlocked]` for the mode. Returns the new
    /// generation.
    pub fn start(&mut self, profile: Profile, mode: Mode, level: u32, seed: u64) -> u64 {
        self.cancel();
        let level = level.clamp(1, self.unlocked(mode));
        self.profile = profile.clone();
        self.mode = mode;
        self.session = Some(Session::new(profile, mode, self.tuning.clone(), seed, level));
        self.recorded = false;
        self.generation
    }

    /// Play again with the same profile and mode
    ///
    /// Race starts over at level 1; Park resumes at the highest unlocked
    /// level.
    pub fn restart(&mut self, seed: u64) -> u64 {
        let level = match self.mode {
            Mode::Race => 1,
            Mode::Park => self.unlocked(Mode::Park),
        };
        self.start(self.profile.clone(), self.mode, level, seed)
    }

    /// Stop the current run without recording it
    pub fn cancel(&mut self) {
        if let Some(session) = self.session.take() {
            if session.running {
                log::info!("Run cancelled at tick {}", session.time_ticks);
            }
        }
        self.accumulator = 0.0;
        self.generation += 1;
    }

    /// Whether a callback scheduled under `generation` may still run
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Advance exactly one tick, fan out its events and render it
    ///
    /// The tick that ends a run is not rendered; the host shows the result
    /// from [`Game::last_record`] or the finished session instead.
    pub fn step(&mut self, input: &TickInput) -> Flow {
        let Some(session) = self.session.as_mut() else {
            return Flow::Stop;
        };

        let input = if self.settings.autopilot && !input.autopilot {
            TickInput {
                autopilot: true,
                ..input.clone()
            }
        } else {
            input.clone()
        };

        let flow = tick(session, &input, SIM_DT);

        for event in session.events.drain(..) {
            if let GameEvent::BadgeEarned(badge) = event {
                log::info!("Badge earned: {}", badge.label());
            }
            if let Some(effect) = SoundEffect::for_event(&event) {
                self.audio.play(effect);
            }
        }

        let cap = level_count(session.mode.rules().objectives());
        let reached = session.level.min(cap).max(1);
        let unlocked = self.unlocked.entry(session.mode).or_insert(1);
        *unlocked = (*unlocked).max(reached);

        // A terminating tick returns before render
        if flow == Flow::Continue {
            self.renderer.draw(session);
        }

        if flow == Flow::Stop && session.over && !self.recorded {
            self.recorded = true;
            let record = RunRecord::from_session(session, platform::now_ms());
            append_or_warn(&mut self.run_log, &record);
            self.last_record = Some(record);
        }

        flow
    }

    /// Advance by wall-clock `dt` seconds in fixed substeps
    pub fn update(&mut self, dt: f32, input: &TickInput) -> Flow {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
            if self.step(input) == Flow::Stop {
                self.accumulator = 0.0;
                return Flow::Stop;
            }
        }

        if self.session.is_some() {
            Flow::Continue
        } else {
            Flow::Stop
        }
    }

    /// Drive the current run from `pump` until it stops
    pub fn run(&mut self, pump: &mut impl FramePump) -> Flow {
        while let Some(input) = pump.next_frame() {
            if self.step(&input) == Flow::Stop {
                return Flow::Stop;
            }
        }
        Flow::Continue
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Highest level reached in `mode` (at least 1)
    pub fn unlocked(&self, mode: Mode) -> u32 {
        self.unlocked.get(&mode).copied().unwrap_or(1)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.audio.apply_settings(&settings);
        self.settings = settings;
    }

    pub fn last_record(&self) -> Option<&RunRecord> {
        self.last_record.as_ref()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn audio(&self) -> &AudioManager<A> {
        &self.audio
    }

    pub fn run_log(&self) -> &L {
        &self.run_log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Cue;
    use crate::highscores::MemoryRunLog;
    use crate::render::NullRenderer;
    use crate::sim::{Badge, Obstacle, Rect, RunEnd};

    #[derive(Default)]
    struct Recorder(Vec<Cue>);

    impl AudioSink for Recorder {
        fn play(&mut self, cue: &Cue) {
            self.0.push(*cue);
        }
    }

    #[derive(Default)]
    struct CountingRenderer(u64);

    impl RenderSink for CountingRenderer {
        fn draw(&mut self, _session: &Session) {
            self.0 += 1;
        }
    }

    type TestGame = Game<CountingRenderer, Recorder, MemoryRunLog>;

    fn game() -> TestGame {
        Game::new(
            Tuning::default(),
            Settings::default(),
            CountingRenderer::default(),
            Recorder::default(),
            MemoryRunLog::default(),
        )
    }

    fn park_to_completion(g: &mut TestGame) {
        let flow = g.run(&mut AutopilotPump::new(600));
        assert_eq!(flow, Flow::Stop);
    }

    #[test]
    fn test_no_session_stops() {
        let mut g = game();
        assert_eq!(g.step(&TickInput::default()), Flow::Stop);
        assert_eq!(g.renderer().0, 0);
    }

    #[test]
    fn test_park_run_records_once_and_unlocks() {
        let mut g = game();
        g.start(Profile::default(), Mode::Park, 1, 9);
        park_to_completion(&mut g);

        assert_eq!(g.unlocked(Mode::Park), 2);
        assert_eq!(g.run_log().records.len(), 1);
        let record = &g.run_log().records[0];
        assert_eq!(record.mode, Mode::Park);
        assert_eq!(record.score, 250);
        assert_eq!(record.badges, vec!["🅿️ Parked!".to_string()]);

        // Stopped runs keep returning Stop and are not logged again
        assert_eq!(g.step(&TickInput::default()), Flow::Stop);
        assert_eq!(g.run_log().records.len(), 1);

        let freqs: Vec<f32> = g.audio().sink().0.iter().map(|c| c.frequency).collect();
        assert_eq!(freqs, vec![1320.0, 1244.0]);
    }

    #[test]
    fn test_park_restart_uses_unlocked_level() {
        let mut g = game();
        g.start(Profile::default(), Mode::Park, 1, 9);
        let first_spot = g.session().unwrap().target.unwrap().bounds;
        park_to_completion(&mut g);

        g.restart(10);
        let s = g.session().unwrap();
        assert_eq!(s.level, 2);
        assert!(s.running);
        let spot = s.target.unwrap().bounds;
        assert!(spot.w < first_spot.w && spot.h < first_spot.h);
    }

    #[test]
    fn test_race_restart_starts_at_one() {
        let mut g = game();
        g.unlocked.insert(Mode::Race, 3);
        g.start(Profile::default(), Mode::Race, 3, 1);
        assert_eq!(g.session().unwrap().level, 3);
        g.restart(2);
        assert_eq!(g.session().unwrap().level, 1);
    }

    #[test]
    fn test_start_level_clamped_to_unlocked() {
        let mut g = game();
        g.start(Profile::default(), Mode::Park, 3, 1);
        assert_eq!(g.session().unwrap().level, 1);
        g.start(Profile::default(), Mode::Park, 0, 1);
        assert_eq!(g.session().unwrap().level, 1);
    }

    #[test]
    fn test_restart_invalidates_old_generation() {
        let mut g = game();
        let first = g.start(Profile::default(), Mode::Race, 1, 1);
        assert!(g.is_current(first));
        let second = g.restart(2);
        assert!(!g.is_current(first));
        assert!(g.is_current(second));
    }

    #[test]
    fn test_cancel_drops_run_without_record() {
        let mut g = game();
        g.start(Profile::default(), Mode::Race, 1, 1);
        g.step(&TickInput::default());
        g.cancel();
        assert!(g.session().is_none());
        assert_eq!(g.step(&TickInput::default()), Flow::Stop);
        assert!(g.run_log().records.is_empty());
    }

    #[test]
    fn test_crash_plays_cue_and_logs() {
        let mut g = game();
        g.start(Profile::default(), Mode::Race, 1, 4);
        let session = g.session.as_mut().unwrap();
        let player = session.player.bounds;
        session.obstacles.push(Obstacle {
            id: 900,
            bounds: Rect::new(player.x, player.y - 30.0, 46.0, 70.0),
            lane: 1,
            vy: Some(5.0),
        });

        assert_eq!(g.step(&TickInput::default()), Flow::Stop);
        let s = g.session().unwrap();
        assert_eq!(s.outcome, Some(RunEnd::Crashed));
        assert!(!s.has_badge(Badge::Parked));
        assert_eq!(g.audio().sink().0[0].frequency, 100.0);
        assert_eq!(g.last_record().map(|r| r.score), Some(0));
        assert_eq!(g.renderer().0, 0);
    }

    #[test]
    fn test_renders_every_tick() {
        let mut g = game();
        g.start(Profile::default(), Mode::Park, 1, 1);
        let paused = TickInput {
            pause: true,
            ..Default::default()
        };
        g.run(&mut ScriptedPump::new(vec![TickInput::default(), paused.clone(), paused]));
        assert_eq!(g.renderer().0, 3);
    }

    #[test]
    fn test_final_tick_not_rendered() {
        let mut g = game();
        g.start(Profile::default(), Mode::Park, 1, 9);
        park_to_completion(&mut g);
        let ticks = g.session().unwrap().time_ticks;
        assert_eq!(g.renderer().0, ticks - 1);
    }

    #[test]
    fn test_update_runs_fixed_substeps() {
        let mut g = game();
        g.start(Profile::default(), Mode::Park, 1, 1);
        assert_eq!(g.update(0.04, &TickInput::default()), Flow::Continue);
        assert_eq!(g.session().unwrap().time_ticks, 2);
    }

    #[test]
    fn test_settings_autopilot_drives() {
        let mut g = game();
        g.set_settings(Settings {
            autopilot: true,
            muted: true,
            ..Settings::default()
        });
        g.start(Profile::default(), Mode::Park, 1, 5);
        let flow = g.run(&mut ScriptedPump::new(vec![TickInput::default(); 600]));
        assert_eq!(flow, Flow::Stop);
        assert!(g.session().unwrap().has_badge(Badge::Parked));
        assert!(g.audio().sink().0.is_empty());
    }

    struct FailingLog;

    impl RunLog for FailingLog {
        fn append(&mut self, _record: &RunRecord) -> crate::Result<()> {
            Err(crate::Error::Storage("read-only".into()))
        }
    }

    #[test]
    fn test_run_log_failure_is_not_fatal() {
        let mut g = Game::new(
            Tuning::default(),
            Settings::default(),
            NullRenderer,
            Recorder::default(),
            FailingLog,
        );
        g.start(Profile::default(), Mode::Park, 1, 2);
        assert_eq!(g.run(&mut AutopilotPump::new(600)), Flow::Stop);
        assert!(g.last_record().is_some());
    }
}
