//! Fixed timestep simulation tick
//!
//! Advances a session by exactly one step per call, independent of wall-clock
//! time. Order within a tick: speed, player movement, spawning and scrolling,
//! collision/termination, score, level progression.

use glam::Vec2;

use super::autopilot;
use super::progression;
use super::state::{RunEnd, Session};
use crate::consts::HZ;

/// Input sampled once per tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Accelerate (race) / drive up (park)
    pub up: bool,
    /// Brake (race) / drive down (park)
    pub down: bool,
    /// Paused flag (level, not a toggle)
    pub pause: bool,
    /// Let the demo driver steer
    pub autopilot: bool,
}

impl TickInput {
    /// Unit steering direction in screen space (y down)
    pub fn steer(&self) -> Vec2 {
        let x = (self.right as i8 - self.left as i8) as f32;
        let y = (self.down as i8 - self.up as i8) as f32;
        Vec2::new(x, y)
    }
}

/// Whether the host should schedule another tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Advance the session by one fixed timestep
pub fn tick(session: &mut Session, input: &TickInput, dt: f32) -> Flow {
    if !session.running {
        return Flow::Stop;
    }
    // Paused: no mutation, keep rescheduling
    if input.pause {
        return Flow::Continue;
    }

    let input = if input.autopilot {
        autopilot::drive(session)
    } else {
        input.clone()
    };

    session.time_ticks += 1;
    session.elapsed += dt;

    // Speed integration (rates are per nominal tick)
    let scale = dt * HZ;
    let t = &session.tuning;
    let mut speed = session.speed;
    if input.up {
        speed += t.acceleration * scale;
    }
    if input.down {
        speed -= t.deceleration * scale;
    }
    session.speed = t.clamp_speed(speed);

    let rules = session.mode.rules();
    let steer = input.steer();

    rules.move_player(session, steer);
    rules.advance(session, dt);

    if let Some(outcome) = rules.check_termination(session) {
        session.end(outcome);
        // Parking is itself the objective; a crash skips progression
        if outcome == RunEnd::Parked {
            progression::evaluate(session);
        }
        return Flow::Stop;
    }

    rules.accrue(session, dt);
    progression::evaluate(session);

    session.normalize_order();
    Flow::Continue
}
