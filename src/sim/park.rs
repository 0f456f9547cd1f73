//! Park mode: drive around a walled lot into the highlighted spot

use glam::Vec2;

use super::entity::{TargetZone, Wall};
use super::geometry::Rect;
use super::mode::ModeRules;
use super::progression::{Objective, PARK_LEVELS};
use super::state::{Badge, GameEvent, Mode, RunEnd, Session};

/// Park ruleset
pub struct ParkRules;

/// Lot layout
pub const LOT_MARGIN: f32 = 24.0;
/// Space above the lot reserved for the HUD
pub const LOT_TOP_OFFSET: f32 = 60.0;
pub const WALL_THICKNESS: f32 = 12.0;
pub const SPOT_WIDTH: f32 = 80.0;
pub const SPOT_HEIGHT: f32 = 120.0;
/// Inset of the spot (and the start position) from the lot edges
const LOT_INSET: f32 = 24.0;

/// Spot never shrinks below this
pub const MIN_SPOT_WIDTH: f32 = 50.0;
pub const MIN_SPOT_HEIGHT: f32 = 80.0;

impl ModeRules for ParkRules {
    fn mode(&self) -> Mode {
        Mode::Park
    }

    fn objectives(&self) -> &'static [Objective] {
        &PARK_LEVELS
    }

    fn setup(&self, session: &mut Session) {
        let lot_w = session.tuning.view_width - LOT_MARGIN * 2.0;
        let lot_h = session.tuning.view_height - 200.0;
        let top = LOT_MARGIN + LOT_TOP_OFFSET;

        session.walls = vec![
            Wall {
                bounds: Rect::new(LOT_MARGIN, top, lot_w, WALL_THICKNESS),
            },
            Wall {
                bounds: Rect::new(LOT_MARGIN, top + lot_h - WALL_THICKNESS, lot_w, WALL_THICKNESS),
            },
            Wall {
                bounds: Rect::new(LOT_MARGIN, top, WALL_THICKNESS, lot_h),
            },
            Wall {
                bounds: Rect::new(LOT_MARGIN + lot_w - WALL_THICKNESS, top, WALL_THICKNESS, lot_h),
            },
        ];

        session.target = Some(TargetZone {
            bounds: Rect::new(
                LOT_MARGIN + lot_w - SPOT_WIDTH - LOT_INSET,
                top + LOT_INSET,
                SPOT_WIDTH,
                SPOT_HEIGHT,
            ),
        });

        let player = &mut session.player.bounds;
        player.x = LOT_MARGIN + 36.0;
        player.y = top + lot_h - player.h - LOT_INSET;
    }

    fn move_player(&self, session: &mut Session, steer: Vec2) {
        let step = steer * session.tuning.park_move_speed;
        let area = session.play_area();
        let walls = &session.walls;
        let player = &mut session.player.bounds;

        // One axis at a time so a wall hit on one axis never snaps the other
        player.translate(Vec2::new(step.x, 0.0));
        for wall in walls {
            if player.intersects(&wall.bounds) {
                push_back_x(player, &wall.bounds, step.x);
            }
        }
        player.translate(Vec2::new(0.0, step.y));
        for wall in walls {
            if player.intersects(&wall.bounds) {
                push_back_y(player, &wall.bounds, step.y);
            }
        }
        player.clamp_within(&area);
    }

    fn check_termination(&self, session: &mut Session) -> Option<RunEnd> {
        let zone = session.target?;
        if !session.player.bounds.intersects(&zone.bounds) {
            return None;
        }

        session.award(Badge::Parked);
        session.score += session.tuning.park_reward * session.level as u64;
        session.events.push(GameEvent::Parked);
        Some(RunEnd::Parked)
    }
}

/// Undo a horizontal overlap caused by moving `dx`
fn push_back_x(player: &mut Rect, wall: &Rect, dx: f32) {
    if dx > 0.0 {
        player.x = wall.x - player.w;
    } else if dx < 0.0 {
        player.x = wall.right();
    }
}

/// Undo a vertical overlap caused by moving `dy`
fn push_back_y(player: &mut Rect, wall: &Rect, dy: f32) {
    if dy > 0.0 {
        player.y = wall.y - player.h;
    } else if dy < 0.0 {
        player.y = wall.bottom();
    }
}

/// Shrink the level's spot about its center (level setup action)
pub fn shrink_spot(session: &mut Session, scale: f32) {
    if let Some(zone) = session.target.as_mut() {
        zone.bounds
            .shrink_about_center(scale, MIN_SPOT_WIDTH, MIN_SPOT_HEIGHT);
        log::debug!("Spot shrunk to {}x{}", zone.bounds.w, zone.bounds.h);
    }
}
