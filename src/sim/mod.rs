//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or storage dependencies

pub mod autopilot;
pub mod entity;
pub mod geometry;
pub mod mode;
pub mod park;
pub mod profile;
pub mod progression;
pub mod race;
pub mod spawner;
pub mod state;
pub mod tick;

pub use entity::{CarStyle, Entity, Obstacle, Pickup, Player, TargetZone, Wall};
pub use geometry::{Rect, intersects};
pub use mode::ModeRules;
pub use profile::Profile;
pub use progression::{Objective, PARK_LEVELS, RACE_LEVELS};
pub use state::{Badge, GameEvent, Mode, RunEnd, Session};
pub use tick::{Flow, TickInput, tick};
