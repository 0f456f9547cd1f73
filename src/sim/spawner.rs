//! Time-driven traffic and coin spawning (race mode)
//!
//! Each kind has its own countdown. When a countdown runs out an entity is
//! spawned in a random lane and the countdown resets to an interval that
//! shrinks as speed grows.

use rand::Rng;

use super::entity::{Obstacle, Pickup};
use super::geometry::Rect;
use super::state::Session;

/// Per-kind spawn countdowns in milliseconds
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spawner {
    pub obstacle_ms: f32,
    pub coin_ms: f32,
}

/// Which kinds are due this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnDue {
    pub obstacle: bool,
    pub coin: bool,
}

impl Spawner {
    /// Run the countdowns down by `dt_ms`, resetting any that expired
    pub fn advance(&mut self, dt_ms: f32, obstacle_interval: f32, coin_interval: f32) -> SpawnDue {
        self.obstacle_ms -= dt_ms;
        self.coin_ms -= dt_ms;

        let mut due = SpawnDue::default();
        if self.obstacle_ms <= 0.0 {
            due.obstacle = true;
            self.obstacle_ms = obstacle_interval;
        }
        if self.coin_ms <= 0.0 {
            due.coin = true;
            self.coin_ms = coin_interval;
        }
        due
    }
}

/// Tick the spawn countdowns and spawn whatever is due
pub fn tick_spawner(session: &mut Session, dt: f32) {
    let obstacle_interval = session.tuning.obstacle_interval(session.speed);
    let coin_interval = session.tuning.coin_interval(session.speed);
    let due = session
        .spawner
        .advance(dt * 1000.0, obstacle_interval, coin_interval);

    if due.obstacle {
        spawn_obstacle(session);
    }
    if due.coin {
        spawn_pickup(session);
    }
}

/// Add one obstacle above the top of the road in a random lane
pub fn spawn_obstacle(session: &mut Session) {
    let lane_count = session.tuning.lane_count;
    let rng = session.rng();
    let lane = rng.random_range(0..lane_count);
    let height_roll: f32 = rng.random();
    let velocity_roll: f32 = rng.random();

    let t = &session.tuning;
    let w = t.obstacle_width;
    let h = t.obstacle_min_height + height_roll * t.obstacle_height_jitter;
    let x = t.lane_center(lane) - w / 2.0;
    let vy = session.speed + t.obstacle_base_velocity + velocity_roll * t.obstacle_velocity_jitter;

    let id = session.next_entity_id();
    log::debug!("Spawn obstacle {} lane={} vy={:.2}", id, lane, vy);
    session.obstacles.push(Obstacle {
        id,
        bounds: Rect::new(x, -h, w, h),
        lane,
        vy: Some(vy),
    });
}

/// Add one coin above the top of the road in a random lane
pub fn spawn_pickup(session: &mut Session) {
    let lane_count = session.tuning.lane_count;
    let lane = session.rng().random_range(0..lane_count);

    let t = &session.tuning;
    let size = t.coin_size;
    let x = t.lane_center(lane) - size / 2.0;
    let vy = session.speed + t.coin_velocity_offset;
    let y = t.coin_spawn_y;

    let id = session.next_entity_id();
    log::debug!("Spawn coin {} lane={}", id, lane);
    session.pickups.push(Pickup {
        id,
        bounds: Rect::new(x, y, size, size),
        lane,
        vy: Some(vy),
    });
}
