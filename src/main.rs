mod data_loader;
mod eliminations;
mod error;
mod identity;
mod leaderboard;
mod placement;
mod report;
mod scoring;
mod scoring_rules;
mod tournament;
mod util;

use log::warn;

use crate::scoring_rules::{GameMode, ScoringRules};
use crate::tournament::TournamentAggregator;

/*
    Batch driver: every positional argument is one decoded match record (JSON). Each
    file becomes a match leaderboard and gets folded into the tournament standings.
    One bad file is reported and skipped; it never takes the batch down.
*/

fn main() {
    env_logger::init();

    let (files, rules_path, mode) = parse_args();
    if files.is_empty() {
        eprintln!(
            "usage: replay_standings [--rules rules.json] [--mode solos|duos|trios|squads] match.json..."
        );
        return;
    }

    let rules = match &rules_path {
        Some(path) => scoring_rules::load_rules(path, mode),
        None => ScoringRules::default_for(mode),
    };

    let mut aggregator = TournamentAggregator::new();

    for path in &files {
        match data_loader::load_match_record(path) {
            Ok(record) => {
                let board = leaderboard::process_match(path, &record, &rules, mode);
                report::print_match_leaderboard(&board);
                aggregator.fold(&board);
            }
            Err(err) => {
                warn!("skipping {path}: {err}");
                aggregator.record_failure(path, &err.to_string());
            }
        }
    }

    let standings = aggregator.finish();
    report::print_standings(&standings);

    if let Err(err) =
        report::write_standings_csv(&standings, "tournament_players.csv", "tournament_teams.csv")
    {
        warn!("could not write CSV reports: {err}");
    }
}

fn parse_args() -> (Vec<String>, Option<String>, GameMode) {
    let mut files = Vec::new();
    let mut rules_path = None;
    let mut mode = GameMode::Solos;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--rules" => rules_path = args.next(),
            "--mode" => {
                if let Some(text) = args.next() {
                    match GameMode::parse(&text) {
                        Some(parsed) => mode = parsed,
                        None => warn!("unknown mode {text}, staying on solos"),
                    }
                }
            }
            _ => files.push(arg),
        }
    }

    (files, rules_path, mode)
}
