//! Render sink and draw-list generation
//!
//! Renderers never touch the session mutably. [`scene`] turns the current
//! state into flat colored quads in draw order, and [`Hud`] carries the text
//! overlay. A backend only has to fill rectangles and print a few strings.

use crate::sim::{Entity, Mode, Rect, Session};

/// RGBA, 0.0 - 1.0
pub type Color = [f32; 4];

const ROAD: Color = [0.07, 0.07, 0.09, 1.0];
const LANE_MARK: Color = [1.0, 1.0, 1.0, 0.25];
const LOT: Color = [0.16, 0.17, 0.2, 1.0];
const WALL: Color = [0.55, 0.55, 0.6, 1.0];
const TARGET: Color = [0.2, 0.9, 0.45, 0.35];
const OBSTACLE: Color = [0.95, 0.6, 0.1, 1.0];
const COIN: Color = [1.0, 0.85, 0.1, 1.0];
const STRIPE: Color = [1.0, 1.0, 1.0, 0.85];
const DEFAULT_CAR: Color = [1.0, 0.23, 0.42, 1.0];

/// Dashed lane marker dimensions
const DASH_LEN: f32 = 36.0;
const DASH_GAP: f32 = 28.0;
const DASH_WIDTH: f32 = 4.0;

/// One filled rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub rect: Rect,
    pub color: Color,
}

impl Quad {
    fn new(rect: Rect, color: Color) -> Self {
        Self { rect, color }
    }
}

/// Parse `#rrggbb` or `#rgb` into a color
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() == 3 {
        let long: String = hex.chars().flat_map(|c| [c, c]).collect();
        return parse_hex_color(&format!("#{long}"));
    }
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| -> Option<f32> {
        let v = u8::from_str_radix(hex.get(i..i + 2)?, 16).ok()?;
        Some(v as f32 / 255.0)
    };
    Some([channel(0)?, channel(2)?, channel(4)?, 1.0])
}

/// Build the frame's draw list (background first, player last)
pub fn scene(session: &Session) -> Vec<Quad> {
    let t = &session.tuning;
    let view = Rect::new(0.0, 0.0, t.view_width, t.view_height);
    let mut quads = Vec::with_capacity(8 + session.obstacles.len() + session.pickups.len());

    match session.mode {
        Mode::Race => {
            quads.push(Quad::new(view, ROAD));
            // Dashes scroll with distance so the road appears to move
            let period = DASH_LEN + DASH_GAP;
            let offset = (session.distance * t.default_scroll_factor * 10.0) % period;
            for lane in 1..t.lane_count {
                let x = t.road_padding + t.lane_width() * lane as f32 - DASH_WIDTH / 2.0;
                let mut y = offset - period;
                while y < t.view_height {
                    quads.push(Quad::new(Rect::new(x, y, DASH_WIDTH, DASH_LEN), LANE_MARK));
                    y += period;
                }
            }
        }
        Mode::Park => quads.push(Quad::new(view, LOT)),
    }

    for entity in session.entities() {
        let rect = entity.bounds();
        match entity {
            Entity::TargetZone(_) => quads.push(Quad::new(rect, TARGET)),
            Entity::Wall(_) => quads.push(Quad::new(rect, WALL)),
            Entity::Obstacle(_) => quads.push(Quad::new(rect, OBSTACLE)),
            Entity::Pickup(_) => quads.push(Quad::new(rect, COIN)),
            Entity::Player(p) => {
                let body = parse_hex_color(&p.color).unwrap_or(DEFAULT_CAR);
                quads.push(Quad::new(rect, body));
                let sw = p.car.stripe_width();
                let stripe = Rect::new(rect.center().x - sw / 2.0, rect.y, sw, rect.h);
                quads.push(Quad::new(stripe, STRIPE));
            }
        }
    }

    quads
}

/// Text overlay for the current frame
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    /// "avatar name (age)"
    pub player: String,
    pub mode: Mode,
    pub score: u64,
    /// Speed rounded to a whole number
    pub speed: u32,
    /// Whole seconds elapsed
    pub time: u32,
    pub level: u32,
    /// Current objective, if any level remains
    pub objective: Option<&'static str>,
    pub badges: Vec<String>,
    pub over: bool,
}

impl Hud {
    pub fn from_session(session: &Session) -> Self {
        Self {
            player: session.profile.label(),
            mode: session.mode,
            score: session.score,
            speed: session.speed.round().max(0.0) as u32,
            time: session.elapsed_secs(),
            level: session.level,
            objective: crate::sim::progression::current(
                session.mode.rules().objectives(),
                session.level,
            )
            .map(|o| o.description),
            badges: session.badge_labels(),
            over: session.over,
        }
    }

    /// Single status line
    pub fn line(&self) -> String {
        let mut line = format!(
            "{} | {} | L{} | score {} | speed {} | {}s",
            self.player,
            self.mode.as_str(),
            self.level,
            self.score,
            self.speed,
            self.time
        );
        if let Some(objective) = self.objective {
            line.push_str(" | ");
            line.push_str(objective);
        }
        if !self.badges.is_empty() {
            line.push_str(" | ");
            line.push_str(&self.badges.join(" "));
        }
        line
    }
}

/// Something that draws a session
///
/// Called once per tick after the simulation step.
pub trait RenderSink {
    fn draw(&mut self, session: &Session);
}

/// Draws nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl RenderSink for NullRenderer {
    fn draw(&mut self, _session: &Session) {}
}

/// Logs the HUD line every `every` frames
#[derive(Debug, Clone)]
pub struct LogRenderer {
    every: u64,
    frames: u64,
    /// Quads in the most recent scene
    pub last_quads: usize,
}

impl LogRenderer {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            frames: 0,
            last_quads: 0,
        }
    }
}

impl RenderSink for LogRenderer {
    fn draw(&mut self, session: &Session) {
        self.last_quads = scene(session).len();
        if self.frames % self.every == 0 {
            log::info!("{}", Hud::from_session(session).line());
        }
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Profile;
    use crate::tuning::Tuning;

    fn session(mode: Mode) -> Session {
        Session::new(Profile::default(), mode, Tuning::default(), 3, 1)
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff0000"), Some([1.0, 0.0, 0.0, 1.0]));
        assert_eq!(parse_hex_color("#0f0"), Some([0.0, 1.0, 0.0, 1.0]));
        assert_eq!(parse_hex_color("ff0000"), None);
        assert_eq!(parse_hex_color("#ff00"), None);
        assert_eq!(parse_hex_color("#gg0000"), None);
    }

    #[test]
    fn test_park_scene_layers() {
        let s = session(Mode::Park);
        let quads = scene(&s);
        // lot, target, 4 walls, car, stripe
        assert_eq!(quads.len(), 8);
        assert_eq!(quads[1].color, TARGET);
        assert_eq!(quads[6].rect, s.player.bounds);
    }

    #[test]
    fn test_race_scene_has_lane_marks() {
        let s = session(Mode::Race);
        let quads = scene(&s);
        assert!(quads.iter().any(|q| q.color == LANE_MARK));
        assert_eq!(quads.last().map(|q| q.color), Some(STRIPE));
    }

    #[test]
    fn test_hud_line() {
        let mut s = session(Mode::Race);
        s.score = 42;
        s.speed = 4.6;
        let hud = Hud::from_session(&s);
        assert_eq!(hud.player, "😎 Player (18)");
        assert_eq!(hud.speed, 5);
        assert_eq!(hud.objective, Some("Survive 20s"));
        assert!(hud.line().contains("score 42"));
    }
}
