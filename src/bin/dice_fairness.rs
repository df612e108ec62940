use cacao_path_rust::core::{
    board::BoardSpecification,
    dice::DieFace,
    game_session::GameSession,
    rule_helper,
};
use cacao_path_rust::util::env::{env_opt, env_parse, env_string};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let board_name = env_string("CACAO_BOARD", rule_helper::DEFAULT_BOARD_NAME);
    let num_games = env_parse::<usize>("CACAO_GAMES", 200);
    let max_turns = env_parse::<usize>("CACAO_MAX_TURNS", 100);
    let base_seed = env_opt::<u64>("CACAO_SEED");

    let spec = match BoardSpecification::from_embedded(&board_name) {
        Ok(spec) => spec,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let mut face_counts = BTreeMap::<DieFace, usize>::new();
    let mut effect_counts = BTreeMap::<String, usize>::new();
    let mut num_extra_turns = 0usize;
    let mut num_skips = 0usize;
    let mut num_turns = 0usize;
    let started = Instant::now();

    for game_idx in 0..num_games {
        let seed = base_seed.map(|seed| seed.wrapping_add(game_idx as u64));
        let mut game = match GameSession::from_spec(spec.clone(), seed) {
            Ok(game) => game,
            Err(err) => {
                eprintln!("{err}");
                std::process::exit(1);
            }
        };

        for _ in 0..max_turns {
            let outcome = match game.roll_dice().and_then(|pending| game.settle(pending.token, pending.face)) {
                Ok(outcome) => outcome,
                Err(err) => {
                    eprintln!("game {game_idx}: {err}");
                    break;
                }
            };

            num_turns += 1;
            *face_counts.entry(outcome.face).or_default() += 1;
            if let Some(special) = &outcome.special {
                *effect_counts.entry(special.key.clone()).or_default() += 1;
            }
            if outcome.extra_turn {
                num_extra_turns += 1;
            }
            if outcome.skipped_player.is_some() {
                num_skips += 1;
            }
        }

        info!(game = game_idx, turns = game.turn_hist().len(), "game simulated");
    }

    let elapsed = started.elapsed();
    let expected = num_turns as f64 / rule_helper::NUM_DIE_FACES as f64;
    let chi_square: f64 = DieFace::all()
        .map(|face| {
            let observed = face_counts.get(&face).copied().unwrap_or(0) as f64;
            if expected > 0.0 { (observed - expected).powi(2) / expected } else { 0.0 }
        })
        .sum();

    println!(
        "board={} games={} turns={} timeSec={:.4}",
        board_name,
        num_games,
        num_turns,
        elapsed.as_secs_f64()
    );
    for face in DieFace::all() {
        let count = face_counts.get(&face).copied().unwrap_or(0);
        println!("  face {face}: {count:>8} ({:.4})", count as f64 / num_turns.max(1) as f64);
    }
    println!("  chiSquare={chi_square:.3} (df=5, p=0.001 critical 20.515)");
    for (key, count) in &effect_counts {
        println!("  effect {key:<20} {count:>8}");
    }
    println!("  extraTurns={num_extra_turns} skips={num_skips}");
}
