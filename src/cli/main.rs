mod session;

use cacao_path_rust::util::env::{env_opt, env_string};
use cacao_path_rust::core::rule_helper;
use session::Session;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    println!("program begin");
    let board_name = env_string("CACAO_BOARD", rule_helper::DEFAULT_BOARD_NAME);
    let seed = env_opt::<u64>("CACAO_SEED");
    let mut session = Session::new(board_name, seed);
    session.start();
    println!("program end");
}
