use crate::identity::Participant;
use crate::scoring_rules::ScoringRules;

// Converts a resolved rank plus kill count into points. Placement points are a team
// property: every member of a team gets the same placement points, so callers score
// each participant with the rank the placement resolver already wrote.
pub fn score_participant(
    p: &mut Participant,
    team_count: u32,
    rules: &ScoringRules,
    multiplier: i64,
) {
    let rank = p.rank.unwrap_or_else(|| team_count.max(1));

    p.kill_points = p.kills as i64 * rules.points_per_kill;
    p.placement_points = placement_points(rank, team_count, rules, multiplier);
    p.total_points = p.kill_points + p.placement_points;
}

pub fn placement_points(
    rank: u32,
    team_count: u32,
    rules: &ScoringRules,
    multiplier: i64,
) -> i64 {
    let base = if rules.use_linear_placement {
        let mut points = (team_count as i64 - rank as i64).max(0);
        if rank == 1 {
            points += rules.win_bonus;
        }
        points
    } else {
        rule_table_points(rank, rules)
    };

    base * multiplier
}

fn rule_table_points(rank: u32, rules: &ScoringRules) -> i64 {
    let mut points = 0;

    if let Some(thresholds) = &rules.thresholds {
        for t in thresholds {
            if rank <= t.threshold_rank {
                points += t.points;
            }
        }
    }

    if let Some(ranges) = &rules.ranges {
        for r in ranges {
            if rank > r.start_rank {
                continue;
            }

            // Credit for every step from the range start down to the player's own
            // rank, capped at the range end. Rank 25 in a 30..20 range: 6 steps.
            let effective_end = rank.max(r.end_rank);
            let steps = r.start_rank as i64 - effective_end as i64 + 1;
            if steps > 0 {
                points += steps * r.points_per_step;
            }
        }
    }

    points
}
