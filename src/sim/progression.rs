//! Level objectives and progression
//!
//! Each mode has an ordered objective table. The current objective is the one
//! whose id equals the session's level; completing it bumps the level once and
//! lets the mode apply its difficulty adjustment. Past the last objective,
//! progression does nothing.

use super::park::shrink_spot;
use super::state::{Badge, GameEvent, Session};

/// A per-level win condition
#[derive(Debug, Clone, Copy)]
pub struct Objective {
    pub id: u32,
    pub description: &'static str,
    /// Side-effect free check against the session
    pub check: fn(&Session) -> bool,
    /// One-time level setup, run when a run starts at this level
    pub setup: Option<fn(&mut Session)>,
}

pub static RACE_LEVELS: [Objective; 5] = [
    Objective {
        id: 1,
        description: "Survive 20s",
        check: survived_20s,
        setup: None,
    },
    Objective {
        id: 2,
        description: "Reach score 400",
        check: score_400,
        setup: None,
    },
    Objective {
        id: 3,
        description: "Collect 8 coins",
        check: collected_8,
        setup: None,
    },
    Objective {
        id: 4,
        description: "Survive 40s",
        check: survived_40s,
        setup: None,
    },
    Objective {
        id: 5,
        description: "Reach score 900",
        check: score_900,
        setup: None,
    },
];

pub static PARK_LEVELS: [Objective; 3] = [
    Objective {
        id: 1,
        description: "Park in the highlighted spot",
        check: parked,
        setup: None,
    },
    Objective {
        id: 2,
        description: "Park again (smaller spot)",
        check: parked,
        setup: Some(smaller_spot),
    },
    Objective {
        id: 3,
        description: "Park again (tiny spot)",
        check: parked,
        setup: Some(tiny_spot),
    },
];

fn survived_20s(s: &Session) -> bool {
    s.elapsed >= 20.0
}

fn survived_40s(s: &Session) -> bool {
    s.elapsed >= 40.0
}

fn score_400(s: &Session) -> bool {
    s.score >= 400
}

fn score_900(s: &Session) -> bool {
    s.score >= 900
}

fn collected_8(s: &Session) -> bool {
    s.collected >= 8
}

fn parked(s: &Session) -> bool {
    s.over && s.has_badge(Badge::Parked)
}

fn smaller_spot(s: &mut Session) {
    shrink_spot(s, 0.8);
}

fn tiny_spot(s: &mut Session) {
    shrink_spot(s, 0.65);
}

/// The objective for `level`, if one is defined
pub fn current(objectives: &'static [Objective], level: u32) -> Option<&'static Objective> {
    objectives.iter().find(|o| o.id == level)
}

/// Number of levels defined for a table
pub fn level_count(objectives: &[Objective]) -> u32 {
    objectives.iter().map(|o| o.id).max().unwrap_or(0)
}

/// Run the current level's setup action (called once at run start)
pub fn run_level_setup(session: &mut Session) {
    let objectives = session.mode.rules().objectives();
    if let Some(setup) = current(objectives, session.level).and_then(|o| o.setup) {
        setup(session);
    }
}

/// Check the current objective; on success advance one level.
///
/// Returns the id of the completed objective.
pub fn evaluate(session: &mut Session) -> Option<u32> {
    let rules = session.mode.rules();
    let objective = current(rules.objectives(), session.level)?;
    if !(objective.check)(session) {
        return None;
    }

    session.level += 1;
    session.events.push(GameEvent::LevelComplete {
        level: objective.id,
        description: objective.description,
    });
    rules.on_level_complete(session);

    log::info!(
        "Level {} complete: {} (now level {})",
        objective.id,
        objective.description,
        session.level
    );
    Some(objective.id)
}
