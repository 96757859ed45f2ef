use serde::*;
use serde_aux::field_attributes::deserialize_option_number_from_string;
use std::fs;

use crate::error::EngineError;

// Loads one decoded match record from a JSON file. The upstream replay decoder is
// responsible for turning the binary container into this shape; we only consume it.
// Note that the elimination list is chronological and must stay in source order.
pub fn load_match_record(path: &str) -> Result<MatchRecord, EngineError> {
    let data = fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.to_string(),
        source,
    })?;

    let record: MatchRecord = serde_json::from_str(&data).map_err(|source| EngineError::Json {
        path: path.to_string(),
        source,
    })?;

    Ok(record)
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct MatchRecord {
    #[serde(default)]
    pub players: Vec<RosterEntry>,
    #[serde(default)]
    pub eliminations: Vec<EliminationEvent>,
}

// One roster row as the decoder emits it. The decoder is sloppy about numeric types
// (numbers sometimes arrive as strings), hence serde-aux on every numeric field.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RosterEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename(deserialize = "isBot"))]
    pub is_bot: bool,
    #[serde(
        default,
        rename(deserialize = "teamId"),
        deserialize_with = "deserialize_option_number_from_string"
    )]
    pub team_id: Option<i64>,
    // Signed like teamId: decoders emit -1 for "no placement", which is merely
    // invalid data, not a corrupt record.
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub placement: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub kills: Option<u32>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EliminationEvent {
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub eliminator: String,
    #[serde(default, rename(deserialize = "eliminated"))]
    pub victim: String,
    #[serde(default)]
    pub knocked: bool,
}

impl EliminationEvent {
    // Times arrive as text. Garbage text becomes 0.0, a bad clock never kills a match.
    pub fn time_seconds(&self) -> f64 {
        self.time.trim().parse().unwrap_or(0.0)
    }
}
