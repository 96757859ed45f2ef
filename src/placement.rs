use log::debug;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::eliminations::EliminationLog;
use crate::identity::Roster;

/*
    Assigns every team a finishing rank 1..N, best finish first, from two sources:

      - official per-player placement from the decoder, where present. Teams take
        the best (minimum) placement among their members, since partial official
        data routinely under-reports some of them;
      - reconstruction from the event log for everyone else: teams still standing
        at the end of the log beat wiped teams, and wiped teams rank in reverse
        wipe order (wiped last = placed best).

    The two sources are merged into one ordering and densified, so the final ranks
    are always a bijection onto 1..N even when official data is sparse, duplicated
    or disagrees with the log.

    The reference behavior is ambiguous about whether sparse official data (half
    the lobby or less) should disable the per-team official shortcut entirely. We
    apply the shortcut unconditionally; see DESIGN.md, and the regression test
    below pins the choice.
*/

struct TeamDraft {
    key: String,
    members: Vec<String>,
    official: Option<u32>,
    kills: u32,
    last_active: f64,
    has_last_killer: bool,
    // Index into the deduplicated death order at which the last member fell.
    wiped_at: Option<usize>,
}

// Resolves and writes the rank of every participant. Returns the team count.
pub fn resolve_placements(roster: &mut Roster, log: &EliminationLog) -> u32 {
    let mut teams = collect_teams(roster, log);
    let team_count = teams.len() as u32;

    if teams.is_empty() {
        return 0;
    }

    let with_official = roster
        .iter()
        .filter(|p| p.official_placement.is_some())
        .count();
    debug!(
        "official placement coverage: {with_official}/{} participants",
        roster.len()
    );

    // Reconstruction ordering across all teams: active first, then wiped in
    // reverse wipe order. Both sorts are stable, so full ties keep input order.
    let mut order: Vec<usize> = (0..teams.len()).collect();
    order.sort_by(|&a, &b| {
        let (ta, tb) = (&teams[a], &teams[b]);
        match (ta.wiped_at, tb.wiped_at) {
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(wa), Some(wb)) => wb.cmp(&wa),
            (None, None) => tb
                .has_last_killer
                .cmp(&ta.has_last_killer)
                .then(tb.kills.cmp(&ta.kills))
                .then(
                    tb.last_active
                        .partial_cmp(&ta.last_active)
                        .unwrap_or(Ordering::Equal),
                ),
        }
    });

    let mut recon_pos = vec![0u32; teams.len()];
    for (pos, &idx) in order.iter().enumerate() {
        recon_pos[idx] = pos as u32 + 1;
    }

    // Merge: officially placed teams sort on their official rank, the rest on
    // their reconstructed position. Official beats reconstructed on equal values,
    // the reconstructed position settles everything after that.
    let mut merged: Vec<usize> = (0..teams.len()).collect();
    merged.sort_by_key(|&idx| {
        let t = &teams[idx];
        (
            t.official.unwrap_or(recon_pos[idx]),
            t.official.is_none(),
            recon_pos[idx],
        )
    });

    if let Some(&first) = merged.first() {
        debug!("rank 1 resolved to team {}", teams[first].key);
    }

    for (pos, &idx) in merged.iter().enumerate() {
        let rank = pos as u32 + 1;
        for id in teams[idx].members.drain(..) {
            if let Some(p) = roster.get_mut(&id) {
                p.rank = Some(rank);
                p.is_winner = rank == 1;
            }
        }
    }

    // Everything above covers every team, but an unresolved rank must never
    // reach the scoring engine, so coerce stragglers to the worst legal rank.
    for p in roster.iter_mut() {
        if p.rank.is_none() {
            p.rank = Some(team_count.max(1));
        }
    }

    team_count
}

fn collect_teams(roster: &Roster, log: &EliminationLog) -> Vec<TeamDraft> {
    let deaths = final_deaths(&log.death_order);

    let mut teams: Vec<TeamDraft> = Vec::new();
    let mut by_key: HashMap<String, usize> = HashMap::new();

    for p in roster.iter() {
        let idx = *by_key.entry(p.team_key.clone()).or_insert_with(|| {
            teams.push(TeamDraft {
                key: p.team_key.clone(),
                members: Vec::new(),
                official: None,
                kills: 0,
                last_active: f64::NEG_INFINITY,
                has_last_killer: false,
                wiped_at: None,
            });
            teams.len() - 1
        });

        let team = &mut teams[idx];
        team.members.push(p.id.clone());
        team.kills += p.kills;

        if let Some(placement) = p.official_placement {
            team.official = Some(match team.official {
                Some(best) => best.min(placement),
                None => placement,
            });
        }

        if let Some(&stamp) = log.last_active.get(&p.id) {
            if stamp > team.last_active {
                team.last_active = stamp;
            }
        }

        if log.last_killer.as_deref() == Some(p.id.as_str()) {
            team.has_last_killer = true;
        }
    }

    for team in &mut teams {
        // A team is wiped once every member has a final death; the wipe moment is
        // the latest of those deaths.
        let mut wiped_at = 0usize;
        let mut all_dead = true;

        for id in &team.members {
            match deaths.get(id.as_str()) {
                Some(&at) => wiped_at = wiped_at.max(at),
                None => {
                    all_dead = false;
                    break;
                }
            }
        }

        if all_dead {
            team.wiped_at = Some(wiped_at);
        }
    }

    teams
}

// Final death position per victim. Revived players re-appear in death order; only
// the last occurrence counts.
fn final_deaths(death_order: &[String]) -> HashMap<&str, usize> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut deaths: HashMap<&str, usize> = HashMap::new();

    for (pos, id) in death_order.iter().enumerate().rev() {
        if seen.insert(id.as_str()) {
            deaths.insert(id.as_str(), pos);
        }
    }

    deaths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_loader::{EliminationEvent, MatchRecord, RosterEntry};
    use crate::eliminations::process_eliminations;
    use crate::identity::resolve_identities;

    fn entry(id: &str, team_id: i64, placement: Option<i64>) -> RosterEntry {
        RosterEntry {
            id: id.to_string(),
            name: id.to_uppercase(),
            is_bot: false,
            team_id: Some(team_id),
            placement,
            kills: None,
        }
    }

    fn kill(time: &str, eliminator: &str, victim: &str) -> EliminationEvent {
        EliminationEvent {
            time: time.to_string(),
            eliminator: eliminator.to_string(),
            victim: victim.to_string(),
            knocked: false,
        }
    }

    fn rank_of(roster: &Roster, id: &str) -> u32 {
        roster.get(id).unwrap().rank.unwrap()
    }

    fn resolve(record: MatchRecord) -> (Roster, u32) {
        let mut roster = resolve_identities(&record);
        let log = process_eliminations(&mut roster, &record.eliminations);
        let count = resolve_placements(&mut roster, &log);
        (roster, count)
    }

    #[test]
    fn reconstruction_ranks_by_reverse_wipe_order() {
        // a1 dies first, b1 second, c1 never dies: C=1, B=2, A=3.
        let record = MatchRecord {
            players: vec![
                entry("a1", 1, None),
                entry("b1", 2, None),
                entry("c1", 3, None),
            ],
            eliminations: vec![kill("10", "c1", "a1"), kill("20", "c1", "b1")],
        };

        let (roster, count) = resolve(record);
        assert_eq!(count, 3);
        assert_eq!(rank_of(&roster, "c1"), 1);
        assert_eq!(rank_of(&roster, "b1"), 2);
        assert_eq!(rank_of(&roster, "a1"), 3);
        assert!(roster.get("c1").unwrap().is_winner);
    }

    #[test]
    fn team_takes_the_best_official_placement_among_members() {
        let record = MatchRecord {
            players: vec![
                entry("a1", 1, Some(5)),
                entry("a2", 1, Some(2)),
                entry("b1", 2, Some(1)),
            ],
            eliminations: vec![],
        };

        let (roster, _) = resolve(record);
        assert_eq!(rank_of(&roster, "b1"), 1);
        assert_eq!(rank_of(&roster, "a1"), 2);
        assert_eq!(rank_of(&roster, "a2"), 2);
    }

    #[test]
    fn ranks_are_a_dense_bijection_even_with_partial_official_data() {
        // Team 1 carries official data, teams 2 and 3 reconstruct.
        let record = MatchRecord {
            players: vec![
                entry("a1", 1, Some(2)),
                entry("b1", 2, None),
                entry("c1", 3, None),
            ],
            eliminations: vec![kill("10", "c1", "b1")],
        };

        let (roster, count) = resolve(record);
        let mut ranks = vec![
            rank_of(&roster, "a1"),
            rank_of(&roster, "b1"),
            rank_of(&roster, "c1"),
        ];
        ranks.sort();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(count, 3);
        // c1 survived and is the only candidate for first.
        assert_eq!(rank_of(&roster, "c1"), 1);
    }

    #[test]
    fn official_shortcut_applies_even_when_coverage_is_sparse() {
        // One of four participants carries official data (25% <= 50%). The shortcut
        // still applies per team: a1 says first, so team 1 is first, no matter that
        // the log reconstruction would have put team 3 there.
        let record = MatchRecord {
            players: vec![
                entry("a1", 1, Some(1)),
                entry("a2", 1, None),
                entry("b1", 2, None),
                entry("c1", 3, None),
            ],
            eliminations: vec![
                kill("10", "c1", "a1"),
                kill("11", "c1", "a2"),
                kill("12", "c1", "b1"),
            ],
        };

        let (roster, _) = resolve(record);
        assert_eq!(rank_of(&roster, "a1"), 1);
        assert_eq!(rank_of(&roster, "a2"), 1);
    }

    #[test]
    fn active_teams_break_ties_on_last_killer_then_kills() {
        // Nobody on teams 1-3 dies. Team 2 holds the last kill, team 3 out-kills
        // team 1.
        let record = MatchRecord {
            players: vec![
                entry("a1", 1, None),
                entry("b1", 2, None),
                entry("c1", 3, None),
                entry("d1", 4, None),
                entry("d2", 4, None),
            ],
            eliminations: vec![
                kill("10", "c1", "d1"),
                kill("11", "c1", "d2"),
                kill("30", "b1", "d2"),
            ],
        };

        let (roster, _) = resolve(record);
        assert_eq!(rank_of(&roster, "b1"), 1); // last confirmed elimination
        assert_eq!(rank_of(&roster, "c1"), 2); // two kills
        assert_eq!(rank_of(&roster, "a1"), 3);
        assert_eq!(rank_of(&roster, "d1"), 4); // wiped team comes last
    }

    #[test]
    fn active_teams_fall_back_to_the_later_last_action() {
        // Neither a1 nor b1 holds the last kill (c1 does) and kills are equal;
        // b1 acted later, so team 2 edges team 1.
        let record = MatchRecord {
            players: vec![
                entry("a1", 1, None),
                entry("b1", 2, None),
                entry("c1", 3, None),
                entry("d1", 4, None),
                entry("d2", 4, None),
                entry("d3", 4, None),
            ],
            eliminations: vec![
                kill("10", "a1", "d1"),
                kill("20", "b1", "d2"),
                kill("30", "c1", "d3"),
            ],
        };

        let (roster, _) = resolve(record);
        assert_eq!(rank_of(&roster, "c1"), 1);
        assert_eq!(rank_of(&roster, "b1"), 2);
        assert_eq!(rank_of(&roster, "a1"), 3);
    }

    #[test]
    fn revived_players_count_their_last_death_only() {
        // a1 dies, gets revived, dies again after b1. Team A therefore wipes last.
        let record = MatchRecord {
            players: vec![
                entry("a1", 1, None),
                entry("b1", 2, None),
                entry("c1", 3, None),
            ],
            eliminations: vec![
                kill("10", "b1", "a1"),
                kill("20", "c1", "b1"),
                kill("30", "c1", "a1"),
            ],
        };

        let (roster, _) = resolve(record);
        assert_eq!(rank_of(&roster, "c1"), 1);
        assert_eq!(rank_of(&roster, "a1"), 2);
        assert_eq!(rank_of(&roster, "b1"), 3);
    }

    #[test]
    fn empty_roster_resolves_to_zero_teams() {
        let (roster, count) = resolve(MatchRecord::default());
        assert_eq!(count, 0);
        assert!(roster.is_empty());
    }
}
