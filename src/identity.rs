use serde::Serialize;
use std::collections::HashMap;

use crate::data_loader::MatchRecord;

pub const UNKNOWN_NAME: &str = "Unknown/Bot";

// One player's accumulator for a single match. A fresh set is built per match;
// nothing here survives across matches (the tournament aggregator re-joins by id).
#[derive(Serialize, Debug, Clone)]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub is_bot: bool,
    pub team_key: String,

    // Official placement from the decoder, when it bothered to supply one.
    pub official_placement: Option<u32>,
    // Kill count the decoder claims; the event log is authoritative, this is a cross-check.
    pub reported_kills: Option<u32>,

    pub kills: u32,
    pub knocks: u32,

    // None until the placement resolver runs. Never 0, never negative.
    pub rank: Option<u32>,
    pub is_winner: bool,
    pub eliminated_by: Option<String>,

    pub kill_points: i64,
    pub placement_points: i64,
    pub total_points: i64,

    // Dense leaderboard position, assigned by the leaderboard builder after sorting.
    pub position: u32,
}

impl Participant {
    fn new(id: String, name: String, is_bot: bool, team_key: String) -> Self {
        Self {
            id,
            name,
            is_bot,
            team_key,
            official_placement: None,
            reported_kills: None,
            kills: 0,
            knocks: 0,
            rank: None,
            is_winner: false,
            eliminated_by: None,
            kill_points: 0,
            placement_points: 0,
            total_points: 0,
            position: 0,
        }
    }
}

// Identity -> Participant store that remembers insertion order. Iteration order matters
// downstream: leaderboard ties keep their original relative order, so a plain HashMap
// walk would make results flap between runs.
#[derive(Debug, Default)]
pub struct Roster {
    participants: Vec<Participant>,
    index: HashMap<String, usize>,
}

impl Roster {
    pub fn get(&self, id: &str) -> Option<&Participant> {
        self.index.get(id).map(|&i| &self.participants[i])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Participant> {
        let idx = *self.index.get(id)?;
        Some(&mut self.participants[idx])
    }

    // Anyone who shows up only in the event log gets materialized here, so the
    // elimination pass never trips over an identity the roster forgot.
    pub fn get_or_insert_bot(&mut self, id: &str) -> &mut Participant {
        if !self.index.contains_key(id) {
            let team_key = solo_team_key(id);
            self.push(Participant::new(
                id.to_string(),
                UNKNOWN_NAME.to_string(),
                true,
                team_key,
            ));
        }

        let idx = self.index[id];
        &mut self.participants[idx]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Participant> {
        self.participants.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn into_participants(self) -> Vec<Participant> {
        self.participants
    }

    fn push(&mut self, participant: Participant) {
        self.index
            .insert(participant.id.clone(), self.participants.len());
        self.participants.push(participant);
    }
}

// Builds the canonical participant set from the roster half of a match record.
// Rows without an id are dropped; duplicate rows for the same id only refine what we
// already have (better name, placement if it was missing), counters are never reset.
pub fn resolve_identities(record: &MatchRecord) -> Roster {
    let mut roster = Roster::default();

    for entry in &record.players {
        if entry.id.is_empty() {
            continue;
        }

        if let Some(existing) = roster.get_mut(&entry.id) {
            if !entry.name.is_empty() {
                existing.name = entry.name.clone();
            }
            if existing.official_placement.is_none() {
                existing.official_placement = valid_placement(entry.placement);
            }
            if existing.reported_kills.is_none() {
                existing.reported_kills = entry.kills;
            }
            continue;
        }

        let name = if entry.name.is_empty() {
            entry.id.clone()
        } else {
            entry.name.clone()
        };

        let mut participant = Participant::new(
            entry.id.clone(),
            name,
            entry.is_bot,
            team_key(&entry.id, entry.team_id),
        );
        participant.official_placement = valid_placement(entry.placement);
        participant.reported_kills = entry.kills;

        roster.push(participant);
    }

    roster
}

// An unassigned team marker collapses to a synthetic per-player key, so every solo
// entry behaves as its own one-member team.
pub fn team_key(id: &str, team_id: Option<i64>) -> String {
    match team_id {
        Some(t) if t > 0 => format!("team:{t}"),
        _ => solo_team_key(id),
    }
}

fn solo_team_key(id: &str) -> String {
    format!("solo:{id}")
}

// Only positive placements count as official data; 0 and negatives mean the
// decoder had nothing, which just triggers the reconstruction fallback.
fn valid_placement(placement: Option<i64>) -> Option<u32> {
    placement.and_then(|p| u32::try_from(p).ok()).filter(|&p| p >= 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_loader::RosterEntry;

    fn entry(id: &str, name: &str, team_id: Option<i64>) -> RosterEntry {
        RosterEntry {
            id: id.to_string(),
            name: name.to_string(),
            is_bot: false,
            team_id,
            placement: None,
            kills: None,
        }
    }

    #[test]
    fn empty_roster_yields_empty_store() {
        let roster = resolve_identities(&MatchRecord::default());
        assert!(roster.is_empty());
    }

    #[test]
    fn rows_without_an_id_are_dropped() {
        let record = MatchRecord {
            players: vec![entry("", "Ghost", Some(1)), entry("p1", "Alpha", Some(1))],
            eliminations: vec![],
        };

        let roster = resolve_identities(&record);
        assert_eq!(roster.len(), 1);
        assert!(roster.get("p1").is_some());
    }

    #[test]
    fn duplicate_rows_refine_but_never_reset() {
        let mut first = entry("p1", "", Some(2));
        first.placement = Some(4);
        let second = entry("p1", "Alpha", Some(2));

        let record = MatchRecord {
            players: vec![first, second],
            eliminations: vec![],
        };

        let mut roster = resolve_identities(&record);
        roster.get_mut("p1").unwrap().kills = 3;

        let p = roster.get("p1").unwrap();
        assert_eq!(p.name, "Alpha");
        assert_eq!(p.official_placement, Some(4));
        assert_eq!(p.kills, 3);
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn non_positive_placements_are_invalid_not_fatal() {
        let mut minus = entry("p1", "Alpha", Some(1));
        minus.placement = Some(-1);
        let mut zero = entry("p2", "Beta", Some(2));
        zero.placement = Some(0);

        let record = MatchRecord {
            players: vec![minus, zero],
            eliminations: vec![],
        };

        let roster = resolve_identities(&record);
        assert_eq!(roster.get("p1").unwrap().official_placement, None);
        assert_eq!(roster.get("p2").unwrap().official_placement, None);
    }

    #[test]
    fn unassigned_team_becomes_a_singleton() {
        assert_eq!(team_key("p1", None), "solo:p1");
        assert_eq!(team_key("p1", Some(0)), "solo:p1");
        assert_eq!(team_key("p1", Some(-1)), "solo:p1");
        assert_eq!(team_key("p1", Some(12)), "team:12");
    }

    #[test]
    fn event_only_identities_materialize_as_bots() {
        let mut roster = resolve_identities(&MatchRecord::default());
        let p = roster.get_or_insert_bot("mystery");

        assert!(p.is_bot);
        assert_eq!(p.name, UNKNOWN_NAME);
        assert_eq!(p.team_key, "solo:mystery");
        assert_eq!(p.rank, None);
    }

    #[test]
    fn nameless_rows_fall_back_to_the_id() {
        let record = MatchRecord {
            players: vec![entry("p9", "", Some(3))],
            eliminations: vec![],
        };

        let roster = resolve_identities(&record);
        assert_eq!(roster.get("p9").unwrap().name, "p9");
    }
}
