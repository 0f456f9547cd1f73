//! Mode rulesets
//!
//! The tick loop is mode-agnostic: it asks the run's [`ModeRules`] to move the
//! player, advance the world, check for a run-ending condition and accrue
//! score. Race and Park each implement the contract.

use glam::Vec2;

use super::park::ParkRules;
use super::progression::Objective;
use super::race::RaceRules;
use super::state::{Mode, RunEnd, Session};

pub trait ModeRules: Sync {
    fn mode(&self) -> Mode;

    /// Ordered level objectives for this mode
    fn objectives(&self) -> &'static [Objective];

    /// Lay out the level at run start
    fn setup(&self, _session: &mut Session) {}

    /// Integrate the player's position from the steering direction,
    /// including any collision response that keeps it out of solid geometry
    fn move_player(&self, session: &mut Session, steer: Vec2);

    /// Spawn, scroll and cull world entities
    fn advance(&self, _session: &mut Session, _dt: f32) {}

    /// Run-ending collisions and pickups. `Some` ends the run immediately.
    fn check_termination(&self, session: &mut Session) -> Option<RunEnd>;

    /// Per-tick score and distance
    fn accrue(&self, _session: &mut Session, _dt: f32) {}

    /// Difficulty adjustment after an objective completes
    fn on_level_complete(&self, _session: &mut Session) {}
}

impl Mode {
    /// The ruleset for this mode
    pub fn rules(self) -> &'static dyn ModeRules {
        match self {
            Mode::Race => &RaceRules,
            Mode::Park => &ParkRules,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch() {
        assert_eq!(Mode::Race.rules().mode(), Mode::Race);
        assert_eq!(Mode::Park.rules().mode(), Mode::Park);
        assert_eq!(Mode::Race.rules().objectives().len(), 5);
        assert_eq!(Mode::Park.rules().objectives().len(), 3);
    }
}
