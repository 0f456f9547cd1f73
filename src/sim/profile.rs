//! Player profile supplied once at run start
//!
//! Form input is clamped into shape here rather than rejected.

use serde::{Deserialize, Serialize};

use super::entity::CarStyle;

pub const DEFAULT_NAME: &str = "Player";
pub const DEFAULT_AGE: u32 = 18;
pub const DEFAULT_AVATAR: &str = "😎";
pub const DEFAULT_COLOR: &str = "#ff3b6b";
/// Avatars are at most this many characters
pub const MAX_AVATAR_CHARS: usize = 2;
const MAX_NAME_CHARS: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub age: u32,
    pub avatar: String,
    pub car: CarStyle,
    pub color: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            age: DEFAULT_AGE,
            avatar: DEFAULT_AVATAR.to_string(),
            car: CarStyle::default(),
            color: DEFAULT_COLOR.to_string(),
        }
    }
}

impl Profile {
    /// Build a profile from raw start-form values
    pub fn from_form(name: &str, age: &str, avatar: &str, car: &str, color: &str) -> Self {
        let name = name.trim();
        let name = if name.is_empty() {
            DEFAULT_NAME.to_string()
        } else {
            name.chars().take(MAX_NAME_CHARS).collect()
        };

        let age = age
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|a| *a > 0)
            .unwrap_or(DEFAULT_AGE)
            .min(120);

        let avatar = avatar.trim();
        let avatar = if avatar.is_empty() {
            DEFAULT_AVATAR.to_string()
        } else {
            avatar.chars().take(MAX_AVATAR_CHARS).collect()
        };

        let color = color.trim();
        let color = if is_hex_color(color) {
            color.to_string()
        } else {
            DEFAULT_COLOR.to_string()
        };

        Self {
            name,
            age,
            avatar,
            car: car.parse().unwrap_or_default(),
            color,
        }
    }

    /// HUD label, e.g. `😎 Ada (31)`
    pub fn label(&self) -> String {
        format!("{} {} ({})", self.avatar, self.name, self.age)
    }
}

fn is_hex_color(s: &str) -> bool {
    let Some(hex) = s.strip_prefix('#') else {
        return false;
    };
    matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
}
