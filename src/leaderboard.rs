use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;

use crate::data_loader::MatchRecord;
use crate::eliminations::process_eliminations;
use crate::identity::{resolve_identities, Participant};
use crate::placement::resolve_placements;
use crate::scoring::score_participant;
use crate::scoring_rules::{GameMode, ScoringRules};

// The finished, sorted view of one match. Immutable once built; tournament
// aggregation only ever reads it.
#[derive(Serialize, Debug, Clone)]
pub struct MatchLeaderboard {
    pub file_label: String,
    pub processed_at: DateTime<Utc>,
    pub mode: GameMode,
    pub total_teams: u32,
    pub total_players: u32,
    pub teams: Vec<TeamResult>,
    pub players: Vec<Participant>,
}

#[derive(Serialize, Debug, Clone)]
pub struct TeamResult {
    pub team_key: String,
    pub rank: u32,
    pub position: u32,
    pub is_winner: bool,
    // Sorted for deterministic display and for the cross-match join key.
    pub member_names: Vec<String>,
    pub kills: u32,
    pub knocks: u32,
    pub kill_points: i64,
    pub placement_points: i64,
    pub total_points: i64,
}

// Runs the whole per-match pipeline: identities, eliminations, placement, scoring,
// then the sorted player and team views.
pub fn process_match(
    file_label: &str,
    record: &MatchRecord,
    rules: &ScoringRules,
    mode: GameMode,
) -> MatchLeaderboard {
    let mut roster = resolve_identities(record);
    let log = process_eliminations(&mut roster, &record.eliminations);
    let team_count = resolve_placements(&mut roster, &log);

    let multiplier = mode.multiplier();
    for p in roster.iter_mut() {
        score_participant(p, team_count, rules, multiplier);
    }

    let mut teams = build_team_results(&roster);
    sort_and_position_teams(&mut teams);

    let mut players = roster.into_participants();
    // Stable sort: full ties keep their original relative order.
    players.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then(b.kills.cmp(&a.kills))
            .then(b.knocks.cmp(&a.knocks))
    });
    for (i, p) in players.iter_mut().enumerate() {
        p.position = i as u32 + 1;
    }

    info!(
        "{file_label}: {} players in {team_count} teams",
        players.len()
    );

    MatchLeaderboard {
        file_label: file_label.to_string(),
        processed_at: Utc::now(),
        mode,
        total_teams: team_count,
        total_players: players.len() as u32,
        teams,
        players,
    }
}

fn build_team_results(roster: &crate::identity::Roster) -> Vec<TeamResult> {
    let mut teams: Vec<TeamResult> = Vec::new();

    for p in roster.iter() {
        let idx = match teams.iter().position(|t| t.team_key == p.team_key) {
            Some(idx) => idx,
            None => {
                teams.push(TeamResult {
                    team_key: p.team_key.clone(),
                    rank: p.rank.unwrap_or(0),
                    position: 0,
                    is_winner: p.is_winner,
                    member_names: Vec::new(),
                    kills: 0,
                    knocks: 0,
                    kill_points: 0,
                    // Placement points are shared across a team: taken once, not summed.
                    placement_points: p.placement_points,
                    total_points: 0,
                });
                teams.len() - 1
            }
        };

        let team = &mut teams[idx];
        team.member_names.push(p.name.clone());
        team.kills += p.kills;
        team.knocks += p.knocks;
        team.kill_points += p.kill_points;
    }

    for team in &mut teams {
        team.member_names.sort();
        team.total_points = team.placement_points + team.kill_points;
    }

    teams
}

fn sort_and_position_teams(teams: &mut [TeamResult]) {
    teams.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then(b.kills.cmp(&a.kills))
            .then(b.knocks.cmp(&a.knocks))
    });
    for (i, team) in teams.iter_mut().enumerate() {
        team.position = i as u32 + 1;
    }
}
