use crate::error::EngineError;
use crate::leaderboard::MatchLeaderboard;
use crate::tournament::TournamentStandings;

pub fn print_match_leaderboard(board: &MatchLeaderboard) {
    println!(
        "\n=== {} ({} teams, {} players, processed {}) ===",
        board.file_label,
        board.total_teams,
        board.total_players,
        board.processed_at.format("%Y-%m-%d %H:%M:%S UTC"),
    );

    println!("-- Teams --");
    for t in &board.teams {
        println!(
            "|{0:3}. | rank {1:3} | {2:4} pts | {3:2} kills | {4:60}",
            t.position,
            t.rank,
            t.total_points,
            t.kills,
            t.member_names.join(", "),
        );
    }

    println!("-- Players --");
    for p in &board.players {
        println!(
            "|{0:3}. | rank {1:3} | {2:4} pts | {3:2} kills | {4:2} knocks | {5:25}",
            p.position,
            p.rank.unwrap_or(0),
            p.total_points,
            p.kills,
            p.knocks,
            p.name,
        );
    }
}

pub fn print_standings(standings: &TournamentStandings) {
    println!("\n=== Tournament: {} matches ===", standings.total_matches);
    for m in &standings.matches {
        match &m.error {
            Some(err) => println!("  {} (ERROR: {err})", m.file_label),
            None => println!("  {}", m.file_label),
        }
    }

    println!("-- Team standings --");
    for (i, t) in standings.teams.iter().enumerate() {
        println!(
            "|{0:3}. | {1:4} pts | {2:2} wins | {3:3} kills | avg rank {4:6.2} | {5:60}",
            i + 1,
            t.total_points,
            t.wins,
            t.kills,
            t.average_rank,
            t.fingerprint,
        );
    }

    println!("-- Player standings --");
    for (i, p) in standings.players.iter().enumerate() {
        println!(
            "|{0:3}. | {1:4} pts | {2:2} wins | {3:3} kills | avg rank {4:6.2} | {5:25}",
            i + 1,
            p.total_points,
            p.wins,
            p.kills,
            p.average_rank,
            p.name,
        );
    }
}

// Standings rows serialize straight into the two CSV tables.
pub fn write_standings_csv(
    standings: &TournamentStandings,
    players_path: &str,
    teams_path: &str,
) -> Result<(), EngineError> {
    write_table(players_path, &standings.players)?;
    write_table(teams_path, &standings.teams)?;
    Ok(())
}

fn write_table<T: serde::Serialize>(path: &str, rows: &[T]) -> Result<(), EngineError> {
    let wrap = |source: csv::Error| EngineError::Report {
        path: path.to_string(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(wrap)?;
    for row in rows {
        writer.serialize(row).map_err(wrap)?;
    }
    writer.flush().map_err(|e| wrap(e.into()))?;

    Ok(())
}
