//! Run state and core simulation types
//!
//! One [`Session`] exists per run. It is created at run start, owned by the
//! game driver, and replaced (never reused) when the player plays again.

use std::str::FromStr;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, Obstacle, Pickup, Player, TargetZone, Wall};
use super::geometry::Rect;
use super::profile::Profile;
use super::progression;
use super::spawner::Spawner;
use crate::tuning::Tuning;

/// Which ruleset a run plays under (fixed for the run)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Race,
    Park,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Race => "race",
            Mode::Park => "park",
        }
    }

}

impl FromStr for Mode {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "race" => Ok(Mode::Race),
            "park" | "parking" => Ok(Mode::Park),
            _ => Err(crate::Error::Unknown {
                kind: "mode",
                value: s.to_string(),
            }),
        }
    }
}

/// Achievement tags shown at run end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Badge {
    Parked,
    Survived30,
    Dodged20,
    Collected10,
    Speed12,
    Score500,
}

impl Badge {
    pub fn label(&self) -> &'static str {
        match self {
            Badge::Parked => "🅿️ Parked!",
            Badge::Survived30 => "⏱️ Survived 30s",
            Badge::Dodged20 => "🚗 Dodged 20",
            Badge::Collected10 => "🪙 Collected 10",
            Badge::Speed12 => "⚡ Speed 12",
            Badge::Score500 => "🏆 500 points",
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunEnd {
    /// Hit traffic (race)
    Crashed,
    /// Reached the target zone (park)
    Parked,
}

/// Things that happened during a tick, drained by the driver for audio/UI
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Crashed,
    CoinCollected,
    Parked,
    LevelComplete { level: u32, description: &'static str },
    BadgeEarned(Badge),
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct Session {
    /// Run seed
    pub seed: u64,
    rng: Pcg32,
    pub tuning: Tuning,
    pub profile: Profile,
    pub mode: Mode,
    /// Cleared when the run ends; the loop stops rescheduling
    pub running: bool,
    /// Set once the run has ended
    pub over: bool,
    /// How the run ended, if it has
    pub outcome: Option<RunEnd>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Seconds of simulated play
    pub elapsed: f32,
    pub speed: f32,
    pub distance: f32,
    pub score: u64,
    /// Current level (1-based)
    pub level: u32,
    /// Obstacles that scrolled off the bottom
    pub avoided: u32,
    /// Coins picked up
    pub collected: u32,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub pickups: Vec<Pickup>,
    pub walls: Vec<Wall>,
    pub target: Option<TargetZone>,
    pub spawner: Spawner,
    /// Events produced since the driver last drained them
    pub events: Vec<GameEvent>,
    badges: Vec<Badge>,
    next_id: u32,
}

impl Session {
    /// Start a new run at `level` (clamped to 1 or more)
    pub fn new(profile: Profile, mode: Mode, tuning: Tuning, seed: u64, level: u32) -> Self {
        let tuning = tuning.sanitized();
        let player = Player {
            bounds: Rect::new(
                tuning.lane_center(tuning.lane_count / 2) - tuning.car_width / 2.0,
                tuning.view_height - 120.0,
                tuning.car_width,
                tuning.car_height,
            ),
            color: profile.color.clone(),
            car: profile.car,
        };

        let mut session = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            speed: tuning.start_speed,
            tuning,
            profile,
            mode,
            running: true,
            over: false,
            outcome: None,
            time_ticks: 0,
            elapsed: 0.0,
            distance: 0.0,
            score: 0,
            level: level.max(1),
            avoided: 0,
            collected: 0,
            player,
            obstacles: Vec::new(),
            pickups: Vec::new(),
            walls: Vec::new(),
            target: None,
            spawner: Spawner::default(),
            events: Vec::new(),
            badges: Vec::new(),
            next_id: 1,
        };

        mode.rules().setup(&mut session);
        progression::run_level_setup(&mut session);

        log::info!(
            "Run started: mode={} level={} seed={}",
            mode.as_str(),
            session.level,
            seed
        );
        session
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Append a badge unless already earned. Returns true if newly added.
    pub fn award(&mut self, badge: Badge) -> bool {
        if self.badges.contains(&badge) {
            return false;
        }
        self.badges.push(badge);
        self.events.push(GameEvent::BadgeEarned(badge));
        true
    }

    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }

    pub fn has_badge(&self, badge: Badge) -> bool {
        self.badges.contains(&badge)
    }

    /// Badge labels in award order
    pub fn badge_labels(&self) -> Vec<String> {
        self.badges.iter().map(|b| b.label().to_string()).collect()
    }

    /// Terminal transition; a finished session is never resumed
    pub fn end(&mut self, outcome: RunEnd) {
        if self.over {
            return;
        }
        self.running = false;
        self.over = true;
        self.outcome = Some(outcome);
        log::info!(
            "Run over ({:?}): score={} level={} elapsed={:.1}s",
            outcome,
            self.score,
            self.level,
            self.elapsed
        );
    }

    /// Whole seconds played, as recorded in the run log
    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed.floor() as u32
    }

    /// Drivable area of the current mode
    pub fn play_area(&self) -> Rect {
        Rect::new(0.0, 0.0, self.tuning.view_width, self.tuning.view_height)
    }

    /// All entities in draw order (ground first, player last)
    pub fn entities(&self) -> impl Iterator<Item = Entity<'_>> {
        self.target
            .iter()
            .map(Entity::TargetZone)
            .chain(self.walls.iter().map(Entity::Wall))
            .chain(self.obstacles.iter().map(Entity::Obstacle))
            .chain(self.pickups.iter().map(Entity::Pickup))
            .chain(std::iter::once(Entity::Player(&self.player)))
    }

    /// Keep entity iteration stable by id
    pub fn normalize_order(&mut self) {
        self.obstacles.sort_by_key(|o| o.id);
        self.pickups.sort_by_key(|p| p.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn race() -> Session {
        Session::new(Profile::default(), Mode::Race, Tuning::default(), 7, 1)
    }

    #[test]
    fn test_new_race_session() {
        let s = race();
        assert!(s.running && !s.over);
        assert_eq!(s.level, 1);
        assert_eq!(s.speed, Tuning::default().start_speed);
        assert!(s.walls.is_empty() && s.target.is_none());
        // Centered on the middle lane
        assert!((s.player.bounds.center().x - s.tuning.lane_center(1)).abs() < 0.001);
        assert_eq!(s.player.bounds.y, s.tuning.view_height - 120.0);
    }

    #[test]
    fn test_level_clamped() {
        let s = Session::new(Profile::default(), Mode::Race, Tuning::default(), 7, 0);
        assert_eq!(s.level, 1);
    }

    #[test]
    fn test_badges_are_unique_and_ordered() {
        let mut s = race();
        assert!(s.award(Badge::Dodged20));
        assert!(s.award(Badge::Speed12));
        assert!(!s.award(Badge::Dodged20));
        assert_eq!(s.badges(), &[Badge::Dodged20, Badge::Speed12]);
        assert_eq!(s.badge_labels(), vec!["🚗 Dodged 20", "⚡ Speed 12"]);
    }

    #[test]
    fn test_end_is_terminal() {
        let mut s = race();
        s.end(RunEnd::Crashed);
        s.end(RunEnd::Parked);
        assert!(!s.running && s.over);
        assert_eq!(s.outcome, Some(RunEnd::Crashed));
    }

    #[test]
    fn test_entities_draw_player_last() {
        let s = Session::new(Profile::default(), Mode::Park, Tuning::default(), 7, 1);
        let all: Vec<_> = s.entities().collect();
        assert!(matches!(all.first(), Some(Entity::TargetZone(_))));
        assert!(matches!(all.last(), Some(Entity::Player(_))));
        assert_eq!(all.len(), 1 + 4 + 1);
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("Parking".parse::<Mode>().ok(), Some(Mode::Park));
        assert_eq!("race".parse::<Mode>().ok(), Some(Mode::Race));
        assert!(matches!(
            "fly".parse::<Mode>(),
            Err(crate::Error::Unknown { kind: "mode", .. })
        ));
    }
}
