//! Demo driver - computes input for the current session
//!
//! Race: stay in the lane whose nearest oncoming car is farthest away, and
//! drift toward coins when the current lane is clear. Park: line up with the
//! spot horizontally, then drive straight in.

use super::state::{Mode, Session};
use super::tick::TickInput;

/// Only traffic within this distance above the car is considered a threat
const LOOKAHEAD: f32 = 420.0;
/// Gap that counts as comfortably clear
const SAFE_GAP: f32 = 260.0;

/// Produce this tick's input for `session`
pub fn drive(session: &Session) -> TickInput {
    let mut input = match session.mode {
        Mode::Race => drive_race(session),
        Mode::Park => drive_park(session),
    };
    input.autopilot = true;
    input
}

fn drive_race(session: &Session) -> TickInput {
    let t = &session.tuning;
    let player = session.player.bounds;
    let lanes = t.lane_count;

    let current_lane = (0..lanes)
        .min_by(|a, b| {
            let da = (t.lane_center(*a) - player.center().x).abs();
            let db = (t.lane_center(*b) - player.center().x).abs();
            da.total_cmp(&db)
        })
        .unwrap_or(0);

    // Distance from the car's nose to the nearest oncoming car per lane
    let gap = |lane: u32| -> f32 {
        session
            .obstacles
            .iter()
            .filter(|o| o.lane == lane)
            .filter(|o| o.bounds.y < player.bottom() && o.bounds.bottom() > player.y - LOOKAHEAD)
            .map(|o| player.y - o.bounds.bottom())
            .fold(f32::INFINITY, f32::min)
    };

    let target_lane = if gap(current_lane) >= SAFE_GAP {
        // Clear ahead: go for the nearest coin in a lane that is also clear
        session
            .pickups
            .iter()
            .filter(|c| c.bounds.bottom() < player.y && gap(c.lane) >= SAFE_GAP)
            .max_by(|a, b| a.bounds.y.total_cmp(&b.bounds.y))
            .map(|c| c.lane)
            .unwrap_or(current_lane)
    } else {
        (0..lanes)
            .max_by(|a, b| {
                gap(*a)
                    .total_cmp(&gap(*b))
                    .then_with(|| current_lane.abs_diff(*b).cmp(&current_lane.abs_diff(*a)))
            })
            .unwrap_or(current_lane)
    };

    let dx = t.lane_center(target_lane) - player.center().x;
    let deadband = t.race_steer_speed / 2.0;
    TickInput {
        left: dx < -deadband,
        right: dx > deadband,
        ..Default::default()
    }
}

fn drive_park(session: &Session) -> TickInput {
    let Some(zone) = session.target else {
        return TickInput::default();
    };
    let player = session.player.bounds.center();
    let goal = zone.bounds.center();
    let deadband = session.tuning.park_move_speed;

    let dx = goal.x - player.x;
    if dx.abs() > deadband {
        return TickInput {
            left: dx < 0.0,
            right: dx > 0.0,
            ..Default::default()
        };
    }

    let dy = goal.y - player.y;
    TickInput {
        up: dy < -deadband,
        down: dy > deadband,
        ..Default::default()
    }
}
