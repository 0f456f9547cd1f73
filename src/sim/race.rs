//! Race mode: dodge traffic, grab coins
//!
//! The car is fixed vertically and steers across the lanes. Traffic and coins
//! scroll down at their own velocity; anything that leaves the bottom of the
//! view is culled, and culled traffic counts as avoided.

use glam::Vec2;

use super::mode::ModeRules;
use super::progression::{Objective, RACE_LEVELS};
use super::spawner::tick_spawner;
use super::state::{Badge, GameEvent, Mode, RunEnd, Session};
use crate::consts::HZ;

/// Race ruleset
pub struct RaceRules;

/// Lateral clearance between the car and the road edge
const EDGE_CLEARANCE: f32 = 6.0;

impl ModeRules for RaceRules {
    fn mode(&self) -> Mode {
        Mode::Race
    }

    fn objectives(&self) -> &'static [Objective] {
        &RACE_LEVELS
    }

    fn move_player(&self, session: &mut Session, steer: Vec2) {
        let t = &session.tuning;
        let min_x = t.road_padding + EDGE_CLEARANCE;
        let max_x = t.view_width - t.road_padding - session.player.bounds.w - EDGE_CLEARANCE;
        let step = steer.x * t.race_steer_speed;

        let bounds = &mut session.player.bounds;
        bounds.x = (bounds.x + step).max(min_x).min(max_x);
    }

    fn advance(&self, session: &mut Session, dt: f32) {
        tick_spawner(session, dt);

        let scale = dt * HZ;
        let default_vy = session.speed * session.tuning.default_scroll_factor;
        for obstacle in &mut session.obstacles {
            obstacle.bounds.y += obstacle.vy.unwrap_or(default_vy) * scale;
        }
        for coin in &mut session.pickups {
            coin.bounds.y += coin.vy.unwrap_or(default_vy) * scale;
        }

        let obstacle_limit = session.tuning.view_height + session.tuning.obstacle_cull_margin;
        let coin_limit = session.tuning.view_height + session.tuning.coin_cull_margin;

        let before = session.obstacles.len();
        session.obstacles.retain(|o| o.bounds.y < obstacle_limit);
        session.avoided += (before - session.obstacles.len()) as u32;
        session.pickups.retain(|c| c.bounds.y < coin_limit);
    }

    fn check_termination(&self, session: &mut Session) -> Option<RunEnd> {
        let player = session.player.bounds;

        if session.obstacles.iter().any(|o| player.intersects(&o.bounds)) {
            session.events.push(GameEvent::Crashed);
            return Some(RunEnd::Crashed);
        }

        let before = session.pickups.len();
        session.pickups.retain(|c| !player.intersects(&c.bounds));
        let grabbed = (before - session.pickups.len()) as u32;
        for _ in 0..grabbed {
            session.collected += 1;
            session.score += session.tuning.coin_reward;
            session.events.push(GameEvent::CoinCollected);
        }

        None
    }

    fn accrue(&self, session: &mut Session, dt: f32) {
        session.distance += session.speed * dt;
        session.score += (session.speed * session.tuning.score_per_speed).floor() as u64;
        award_challenges(session);
    }

    fn on_level_complete(&self, session: &mut Session) {
        session.speed = (session.speed + session.tuning.level_speed_bonus).min(session.tuning.max_speed);
    }
}

/// One-shot race achievements
fn award_challenges(session: &mut Session) {
    let reached = [
        (Badge::Survived30, session.elapsed >= 30.0),
        (Badge::Dodged20, session.avoided >= 20),
        (Badge::Collected10, session.collected >= 10),
        (Badge::Speed12, session.speed >= 12.0),
        (Badge::Score500, session.score >= 500),
    ];
    for (badge, done) in reached {
        if done {
            session.award(badge);
        }
    }
}
