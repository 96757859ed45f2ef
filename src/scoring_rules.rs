use log::warn;
use serde::*;
use std::fs;

/*
    The scoring policy is supplied once per run, usually as a JSON payload next to the
    upload. Anything malformed falls back to the stock policy below rather than failing
    the run, so a typo in a tournament config can never take the whole batch down.
*/

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ScoringRules {
    #[serde(default = "default_points_per_kill", rename(deserialize = "pointsPerKill"))]
    pub points_per_kill: i64,

    // If true, placement scores as (total teams - rank) plus a win bonus for first.
    // If false, the threshold/range tables below apply instead.
    #[serde(default = "default_true", rename(deserialize = "useLinearPlacement"))]
    pub use_linear_placement: bool,

    #[serde(default = "default_win_bonus", rename(deserialize = "winBonus"))]
    pub win_bonus: i64,

    #[serde(default)]
    pub thresholds: Option<Vec<PlacementThreshold>>,
    #[serde(default)]
    pub ranges: Option<Vec<PlacementRange>>,
}

// Flat bonus for finishing at or above a rank. "Top 10 is worth 5 points."
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PlacementThreshold {
    #[serde(rename(deserialize = "thresholdRank"))]
    pub threshold_rank: u32,
    pub points: i64,
}

// Per-step bonus across a rank range. "Every place climbed from 30 to 20 is worth 1."
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PlacementRange {
    #[serde(rename(deserialize = "startRank"))]
    pub start_rank: u32,
    #[serde(rename(deserialize = "endRank"))]
    pub end_rank: u32,
    #[serde(rename(deserialize = "pointsPerStep"))]
    pub points_per_step: i64,
}

impl ScoringRules {
    // Stock policy: two points per kill, linear placement, win bonus 5 (15 for trios).
    pub fn default_for(mode: GameMode) -> Self {
        let win_bonus = if mode == GameMode::Trios { 15 } else { 5 };

        Self {
            points_per_kill: 2,
            use_linear_placement: true,
            win_bonus,
            thresholds: None,
            ranges: None,
        }
    }

    pub fn from_json(payload: &str, mode: GameMode) -> Self {
        match serde_json::from_str(payload) {
            Ok(rules) => rules,
            Err(err) => {
                warn!("malformed scoring rules, using defaults: {err}");
                Self::default_for(mode)
            }
        }
    }
}

// Reads a rules file. Unreadable or malformed files mean the stock policy, logged.
pub fn load_rules(path: &str, mode: GameMode) -> ScoringRules {
    match fs::read_to_string(path) {
        Ok(payload) => ScoringRules::from_json(&payload, mode),
        Err(err) => {
            warn!("could not read rules file {path}, using defaults: {err}");
            ScoringRules::default_for(mode)
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Solos,
    Duos,
    Trios,
    Squads,
}

impl GameMode {
    // Placement points scale with team size so a squad win is worth as much per
    // player as stacking the same points across a lobby of solos.
    pub fn multiplier(self) -> i64 {
        match self {
            GameMode::Solos => 1,
            GameMode::Duos => 2,
            GameMode::Trios => 3,
            GameMode::Squads => 4,
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.to_lowercase().as_str() {
            "solos" | "solo" => Some(GameMode::Solos),
            "duos" | "duo" => Some(GameMode::Duos),
            "trios" | "trio" => Some(GameMode::Trios),
            "squads" | "squad" => Some(GameMode::Squads),
            _ => None,
        }
    }
}

fn default_points_per_kill() -> i64 {
    1
}
fn default_win_bonus() -> i64 {
    5
}
fn default_true() -> bool {
    true
}
