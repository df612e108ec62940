use crate::core::game_session::EnginePhase;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board must be at least 2x2, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("{requested} special tiles requested but only {available} non-start cells exist")]
    BoardTooSmall { requested: usize, available: usize },
    #[error("board needs at least one player")]
    NoPlayers,
    #[error("cell {cell} cannot hold a special tile on a {path_len}-cell path")]
    InvalidSpecialCell { cell: usize, path_len: usize },
}

#[derive(Debug, Error)]
pub enum BoardLoadError {
    #[error("no embedded board named '{0}'")]
    UnknownBoard(String),
    #[error("invalid board JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Layout(#[from] BoardError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("roll refused while engine is {phase}")]
    EngineBusy { phase: EnginePhase },
    #[error("roll {roll_id} is not the outstanding roll")]
    UnknownRoll { roll_id: u64 },
    #[error("die face {0} is outside 1..=6")]
    InvalidFace(u8),
    #[error("no player with index {0}")]
    InvalidPlayer(usize),
    #[error("no cell with index {0}")]
    InvalidCell(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_values() {
        let err = BoardError::InvalidDimensions { width: 1, height: 4 };
        assert_eq!(err.to_string(), "board must be at least 2x2, got 1x4");

        let err = EngineError::EngineBusy {
            phase: EnginePhase::Rolling,
        };
        assert_eq!(err.to_string(), "roll refused while engine is rolling");
    }

    #[test]
    fn layout_errors_pass_through_load_errors() {
        let err: BoardLoadError = BoardError::BoardTooSmall {
            requested: 9,
            available: 7,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "9 special tiles requested but only 7 non-start cells exist"
        );
    }
}
