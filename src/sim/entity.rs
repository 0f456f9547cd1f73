//! Game entities
//!
//! Each kind carries only the fields it needs. The session stores them in
//! typed collections; [`Entity`] is the borrowed, closed view handed to
//! renderers.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::geometry::Rect;

/// Visual style of the player's car
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarStyle {
    #[default]
    Sport,
    Muscle,
    Retro,
}

impl CarStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            CarStyle::Sport => "sport",
            CarStyle::Muscle => "muscle",
            CarStyle::Retro => "retro",
        }
    }

    /// Width of the cockpit stripe drawn on the car body
    pub fn stripe_width(&self) -> f32 {
        match self {
            CarStyle::Sport => 12.0,
            CarStyle::Muscle => 16.0,
            CarStyle::Retro => 10.0,
        }
    }
}

impl FromStr for CarStyle {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sport" => Ok(CarStyle::Sport),
            "muscle" => Ok(CarStyle::Muscle),
            "retro" => Ok(CarStyle::Retro),
            _ => Err(crate::Error::Unknown {
                kind: "car style",
                value: s.to_string(),
            }),
        }
    }
}

/// The player's car (exactly one per run)
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub bounds: Rect,
    /// CSS-style color, e.g. `#ff3366`
    pub color: String,
    pub car: CarStyle,
}

/// Oncoming traffic in race mode
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: u32,
    pub bounds: Rect,
    pub lane: u32,
    /// Downward velocity per tick; `None` scrolls at the road speed
    pub vy: Option<f32>,
}

/// Coin pickup in race mode
#[derive(Debug, Clone, PartialEq)]
pub struct Pickup {
    pub id: u32,
    pub bounds: Rect,
    pub lane: u32,
    pub vy: Option<f32>,
}

/// Solid parking lot wall
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub bounds: Rect,
}

/// The highlighted parking spot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetZone {
    pub bounds: Rect,
}

/// Borrowed view over any entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Entity<'a> {
    Player(&'a Player),
    Obstacle(&'a Obstacle),
    Pickup(&'a Pickup),
    Wall(&'a Wall),
    TargetZone(&'a TargetZone),
}

impl Entity<'_> {
    pub fn bounds(&self) -> Rect {
        match self {
            Entity::Player(p) => p.bounds,
            Entity::Obstacle(o) => o.bounds,
            Entity::Pickup(p) => p.bounds,
            Entity::Wall(w) => w.bounds,
            Entity::TargetZone(z) => z.bounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_car_style_parse() {
        assert_eq!("Muscle".parse::<CarStyle>().ok(), Some(CarStyle::Muscle));
        assert_eq!(" retro ".parse::<CarStyle>().ok(), Some(CarStyle::Retro));
        assert!(matches!(
            "truck".parse::<CarStyle>(),
            Err(crate::Error::Unknown { kind: "car style", .. })
        ));
        assert_eq!(CarStyle::Sport.as_str(), "sport");
    }

    #[test]
    fn test_entity_view() {
        let obstacle = Obstacle {
            id: 1,
            bounds: Rect::new(1.0, 2.0, 3.0, 4.0),
            lane: 2,
            vy: Some(5.0),
        };
        let wall = Wall {
            bounds: Rect::new(0.0, 0.0, 12.0, 100.0),
        };
        assert_eq!(Entity::Obstacle(&obstacle).bounds(), obstacle.bounds);
        assert_eq!(Entity::Wall(&wall).bounds(), wall.bounds);
    }
}
