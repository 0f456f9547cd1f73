//! Speed Rays - a lane-dodging race and car parking arcade game
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (movement, spawning, collisions, levels)
//! - `game`: Frame driver that owns the live session and fans out side effects
//! - `audio`: Cue descriptors and the audio sink
//! - `highscores`: Run records, the run-log sink and the leaderboard
//! - `persistence`: JSON run-log file with a versioned envelope
//! - `platform`: Browser/native differences (time, logging, storage)
//! - `render`: Render sink, draw list and HUD summary
//! - `settings`: Player preferences (volume, mute, autopilot)
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod error;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod render;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{Error, Result};
pub use game::{AutopilotPump, FramePump, Game, ScriptedPump};
pub use highscores::{HighScores, RunLog, RunRecord};
pub use sim::Flow;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
///
/// These are the shipped defaults; [`Tuning`] carries the live values.
pub mod consts {
    /// Simulation ticks per second
    pub const HZ: f32 = 60.0;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / HZ;
    /// Max ticks per rendered frame (avoids spiral of death after a stall)
    pub const MAX_SUBSTEPS: u32 = 5;

    /// Base view dimensions
    pub const VIEW_WIDTH: f32 = 420.0;
    pub const VIEW_HEIGHT: f32 = 860.0;

    /// Road layout
    pub const LANE_COUNT: u32 = 3;
    pub const ROAD_PADDING: f32 = 28.0;

    /// Speed bounds and integration (units per tick at 60 Hz)
    pub const MIN_SPEED: f32 = 4.0;
    pub const MAX_SPEED: f32 = 15.0;
    pub const ACCELERATION: f32 = 0.55;
    pub const DECELERATION: f32 = 0.7;
    /// Speed bonus applied when a race level completes
    pub const LEVEL_SPEED_BONUS: f32 = 1.0;

    /// Player car
    pub const CAR_WIDTH: f32 = 54.0;
    pub const CAR_HEIGHT: f32 = 96.0;
    pub const RACE_STEER_SPEED: f32 = 7.8;
    pub const PARK_MOVE_SPEED: f32 = 5.2;

    /// Spawn cadence (milliseconds)
    pub const OBSTACLE_SPAWN_INTERVAL_BASE_MS: f32 = 720.0;
    pub const OBSTACLE_SPAWN_FLOOR_MS: f32 = 360.0;
    pub const OBSTACLE_SPAWN_SCALE: f32 = 40.0;
    pub const COIN_SPAWN_INTERVAL_BASE_MS: f32 = 1100.0;
    pub const COIN_SPAWN_FLOOR_MS: f32 = 420.0;
    pub const COIN_SPAWN_SCALE: f32 = 30.0;

    /// Scoring
    pub const COIN_REWARD: u64 = 15;
    pub const PARK_REWARD: u64 = 250;
    pub const SCORE_PER_SPEED: f32 = 0.7;
}
