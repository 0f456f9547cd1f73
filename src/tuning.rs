//! Data-driven game balance
//!
//! Every gameplay constant lives here so balance can be adjusted from a JSON
//! file without recompiling. Missing keys fall back to the shipped defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Balance parameters for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub view_width: f32,
    pub view_height: f32,
    pub lane_count: u32,
    pub road_padding: f32,

    pub min_speed: f32,
    pub max_speed: f32,
    /// Speed at run start
    pub start_speed: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    pub level_speed_bonus: f32,

    pub car_width: f32,
    pub car_height: f32,
    pub race_steer_speed: f32,
    pub park_move_speed: f32,

    pub obstacle_width: f32,
    pub obstacle_min_height: f32,
    /// Random extra height on top of `obstacle_min_height`
    pub obstacle_height_jitter: f32,
    pub obstacle_base_velocity: f32,
    pub obstacle_velocity_jitter: f32,
    pub obstacle_interval_ms: f32,
    pub obstacle_floor_ms: f32,
    pub obstacle_interval_scale: f32,
    /// Obstacles are culled once `y >= view_height + obstacle_cull_margin`
    pub obstacle_cull_margin: f32,

    pub coin_size: f32,
    pub coin_spawn_y: f32,
    pub coin_velocity_offset: f32,
    pub coin_interval_ms: f32,
    pub coin_floor_ms: f32,
    pub coin_interval_scale: f32,
    pub coin_cull_margin: f32,

    /// Scroll velocity multiplier for entities without their own velocity
    pub default_scroll_factor: f32,

    pub coin_reward: u64,
    pub park_reward: u64,
    pub score_per_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            view_width: VIEW_WIDTH,
            view_height: VIEW_HEIGHT,
            lane_count: LANE_COUNT,
            road_padding: ROAD_PADDING,

            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,
            start_speed: MIN_SPEED + 0.5,
            acceleration: ACCELERATION,
            deceleration: DECELERATION,
            level_speed_bonus: LEVEL_SPEED_BONUS,

            car_width: CAR_WIDTH,
            car_height: CAR_HEIGHT,
            race_steer_speed: RACE_STEER_SPEED,
            park_move_speed: PARK_MOVE_SPEED,

            obstacle_width: 46.0,
            obstacle_min_height: 68.0,
            obstacle_height_jitter: 22.0,
            obstacle_base_velocity: 1.2,
            obstacle_velocity_jitter: 2.2,
            obstacle_interval_ms: OBSTACLE_SPAWN_INTERVAL_BASE_MS,
            obstacle_floor_ms: OBSTACLE_SPAWN_FLOOR_MS,
            obstacle_interval_scale: OBSTACLE_SPAWN_SCALE,
            obstacle_cull_margin: 60.0,

            coin_size: 24.0,
            coin_spawn_y: -18.0,
            coin_velocity_offset: 1.4,
            coin_interval_ms: COIN_SPAWN_INTERVAL_BASE_MS,
            coin_floor_ms: COIN_SPAWN_FLOOR_MS,
            coin_interval_scale: COIN_SPAWN_SCALE,
            coin_cull_margin: 40.0,

            default_scroll_factor: 3.9,

            coin_reward: COIN_REWARD,
            park_reward: PARK_REWARD,
            score_per_speed: SCORE_PER_SPEED,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON, then clamp it into a playable range
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Clamp values that would otherwise break the simulation
    pub fn sanitized(mut self) -> Self {
        self.lane_count = self.lane_count.max(1);
        self.min_speed = self.min_speed.max(0.0);
        self.max_speed = self.max_speed.max(self.min_speed);
        self.start_speed = self.start_speed.clamp(self.min_speed, self.max_speed);
        self.obstacle_floor_ms = self.obstacle_floor_ms.max(1.0);
        self.coin_floor_ms = self.coin_floor_ms.max(1.0);
        self.view_width = self.view_width.max(2.0 * self.road_padding + self.car_width);
        self.view_height = self.view_height.max(self.car_height * 2.0);
        self
    }

    /// Horizontal width of one lane
    pub fn lane_width(&self) -> f32 {
        (self.view_width - self.road_padding * 2.0) / self.lane_count as f32
    }

    /// Center x of a lane
    pub fn lane_center(&self, lane: u32) -> f32 {
        let lane_width = self.lane_width();
        self.road_padding + lane_width * lane as f32 + lane_width / 2.0
    }

    /// Clamp a speed into `[min_speed, max_speed]`
    pub fn clamp_speed(&self, speed: f32) -> f32 {
        speed.clamp(self.min_speed, self.max_speed)
    }

    /// Milliseconds until the next obstacle at `speed`
    pub fn obstacle_interval(&self, speed: f32) -> f32 {
        (self.obstacle_interval_ms - speed * self.obstacle_interval_scale).max(self.obstacle_floor_ms)
    }

    /// Milliseconds until the next coin at `speed`
    pub fn coin_interval(&self, speed: f32) -> f32 {
        (self.coin_interval_ms - speed * self.coin_interval_scale).max(self.coin_floor_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_centers() {
        let tuning = Tuning::default();
        // (420 - 56) / 3 = 121.33
        assert!((tuning.lane_center(0) - (28.0 + 121.333_336 / 2.0)).abs() < 0.01);
        assert!((tuning.lane_center(1) - 210.0).abs() < 0.01);
    }

    #[test]
    fn test_intervals_shrink_with_speed() {
        let tuning = Tuning::default();
        assert_eq!(tuning.obstacle_interval(4.0), 560.0);
        assert!(tuning.obstacle_interval(8.0) < tuning.obstacle_interval(4.0));
        // Floors
        assert_eq!(tuning.obstacle_interval(100.0), 360.0);
        assert_eq!(tuning.coin_interval(100.0), 420.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "lane_count": 4, "max_speed": 20.0 }"#).unwrap();
        assert_eq!(tuning.lane_count, 4);
        assert_eq!(tuning.max_speed, 20.0);
        assert_eq!(tuning.min_speed, MIN_SPEED);
    }

    #[test]
    fn test_sanitized_fixes_inverted_bounds() {
        let tuning = Tuning::from_json(r#"{ "lane_count": 0, "min_speed": 9.0, "max_speed": 3.0 }"#)
            .unwrap();
        assert_eq!(tuning.lane_count, 1);
        assert!(tuning.min_speed <= tuning.max_speed);
        assert!(tuning.start_speed >= tuning.min_speed && tuning.start_speed <= tuning.max_speed);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Tuning::from_json("{ not json").is_err());
    }
}
