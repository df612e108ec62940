pub mod board;
pub mod cell;
pub mod dice;
pub mod effect;
pub mod error;
pub mod game_session;
pub mod player;
pub mod rule_helper;
pub mod turn;
