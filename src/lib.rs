use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod core;
pub mod util;

use crate::core::{
    board::BoardSpecification,
    cell::CellIndex,
    dice::DieFace,
    effect::SpecialTile,
    game_session::GameSession,
    rule_helper,
    turn::TurnOutcome,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpecialTileInfo<'a> {
    cell: CellIndex,
    col: u32,
    row: u32,
    #[serde(flatten)]
    tile: &'a SpecialTile,
}

fn to_json_or<T: Serialize + ?Sized>(value: &T, fallback: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| fallback.to_string())
}

#[wasm_bindgen]
pub struct GameSessionHandle {
    session: GameSession,
}

#[wasm_bindgen]
impl GameSessionHandle {
    pub fn summary(&self, indentation_level: usize) -> String {
        self.session.summary(indentation_level)
    }

    #[wasm_bindgen(js_name = "boardName")]
    pub fn board_name(&self) -> String {
        self.session.board().name.clone()
    }

    #[wasm_bindgen(js_name = "boardWidth")]
    pub fn board_width(&self) -> u32 {
        self.session.board().width
    }

    #[wasm_bindgen(js_name = "boardHeight")]
    pub fn board_height(&self) -> u32 {
        self.session.board().height
    }

    /// Ordered `[col, row]` pairs; index in the array is the cell index.
    #[wasm_bindgen(js_name = "pathJson")]
    pub fn path_json(&self) -> String {
        let pairs = self
            .session
            .board()
            .path
            .iter()
            .map(|coord| [coord.col, coord.row])
            .collect::<Vec<_>>();
        to_json_or(&pairs, "[]")
    }

    #[wasm_bindgen(js_name = "specialTilesJson")]
    pub fn special_tiles_json(&self) -> String {
        let board = self.session.board();
        let tiles = board
            .special_cells()
            .into_iter()
            .filter_map(|cell| {
                let coord = board.coord(cell)?;
                let tile = board.special_at(cell)?;
                Some(SpecialTileInfo {
                    cell,
                    col: coord.col,
                    row: coord.row,
                    tile,
                })
            })
            .collect::<Vec<_>>();
        to_json_or(&tiles, "[]")
    }

    #[wasm_bindgen(js_name = "snapshotJson")]
    pub fn snapshot_json(&self) -> String {
        to_json_or(&self.session.snapshot(), "{}")
    }

    #[wasm_bindgen(js_name = "currentPlayerIndex")]
    pub fn current_player_index(&self) -> usize {
        self.session.current_player_id().0
    }

    #[wasm_bindgen(js_name = "numPlayers")]
    pub fn num_players(&self) -> usize {
        self.session.players().len()
    }

    #[wasm_bindgen(js_name = "phaseName")]
    pub fn phase_name(&self) -> String {
        self.session.phase().as_str().to_string()
    }

    #[wasm_bindgen(js_name = "isIdle")]
    pub fn is_idle(&self) -> bool {
        self.session.is_idle()
    }

    /// Starts a roll and returns the face the die must come to rest on, or 0
    /// when a roll is already in flight.
    #[wasm_bindgen(js_name = "rollDice")]
    pub fn roll_dice(&mut self) -> u8 {
        self.session
            .roll_dice()
            .map(|pending| pending.face.value())
            .unwrap_or(0)
    }

    /// Called once the die animation has come to rest. Returns an empty
    /// string on success, otherwise the reason nothing happened.
    #[wasm_bindgen(js_name = "settleRoll")]
    pub fn settle_roll(&mut self, face: u8) -> String {
        let Some(pending) = self.session.pending_roll() else {
            return "No roll in progress.".to_string();
        };
        let face = match DieFace::new(face) {
            Ok(face) => face,
            Err(err) => return err.to_string(),
        };

        match self.session.settle(pending.token, face) {
            Ok(_) => String::new(),
            Err(err) => err.to_string(),
        }
    }

    #[wasm_bindgen(js_name = "lastTurnJson")]
    pub fn last_turn_json(&self) -> String {
        match self.session.last_turn() {
            Some(outcome) => to_json_or(outcome, "null"),
            None => "null".to_string(),
        }
    }

    #[wasm_bindgen(js_name = "lastTurnValue")]
    pub fn last_turn_value(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.session.last_turn().cloned())
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Cells the mover passed through, one per die pip, for step animation.
    #[wasm_bindgen(js_name = "lastTurnStepCells")]
    pub fn last_turn_step_cells(&self) -> Vec<u32> {
        self.session
            .last_turn()
            .map(|outcome: &TurnOutcome| outcome.path_cells.iter().map(|cell| cell.0 as u32).collect())
            .unwrap_or_default()
    }

    #[wasm_bindgen(js_name = "lastTurnEffectText")]
    pub fn last_turn_effect_text(&self) -> String {
        self.session
            .last_turn()
            .and_then(|outcome| outcome.effect_text())
            .unwrap_or_default()
            .to_string()
    }

    #[wasm_bindgen(js_name = "piecePositions")]
    pub fn piece_positions(&self) -> Vec<u32> {
        self.session
            .players()
            .iter()
            .map(|player| player.position.0 as u32)
            .collect()
    }

    /// Euler angles (x, y, z) that rest the die with `face` on top; empty for
    /// an invalid face.
    #[wasm_bindgen(js_name = "dieFaceRotation")]
    pub fn die_face_rotation(&self, face: u8) -> Vec<f32> {
        DieFace::new(face)
            .map(|face| face.upright_rotation().to_vec())
            .unwrap_or_default()
    }

    #[wasm_bindgen(js_name = "turnHistory")]
    pub fn turn_history(&self) -> String {
        self.session
            .turn_hist()
            .iter()
            .map(|outcome| outcome.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[wasm_bindgen(js_name = "resetGame")]
    pub fn reset_game(&mut self) {
        self.session.reset();
    }
}

impl GameSessionHandle {
    fn from_board_name(board_name: &str, seed: Option<u64>) -> Result<Self, String> {
        let spec = BoardSpecification::from_embedded(board_name).map_err(|err| err.to_string())?;
        let session = GameSession::from_spec(spec, seed).map_err(|err| err.to_string())?;
        Ok(Self { session })
    }
}

#[wasm_bindgen(js_name = "newDefaultGameSession")]
pub fn new_default_game_session() -> Result<GameSessionHandle, JsValue> {
    GameSessionHandle::from_board_name(rule_helper::DEFAULT_BOARD_NAME, None)
        .map_err(|err| JsValue::from_str(&err))
}

#[wasm_bindgen(js_name = "newGameSession")]
pub fn new_game_session(board_name: &str, seed: Option<u64>) -> Result<GameSessionHandle, JsValue> {
    GameSessionHandle::from_board_name(board_name, seed).map_err(|err| JsValue::from_str(&err))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(board_name: &str, seed: u64) -> GameSessionHandle {
        GameSessionHandle::from_board_name(board_name, Some(seed)).unwrap()
    }

    #[test]
    fn unknown_board_names_are_reported() {
        let err = GameSessionHandle::from_board_name("Nowhere", Some(1)).err();
        assert_eq!(err.as_deref(), Some("no embedded board named 'Nowhere'"));
    }

    #[test]
    fn path_json_lists_cells_in_order() {
        let handle = handle("CacaoTiny", 1);
        assert_eq!(
            handle.path_json(),
            "[[0,0],[1,0],[2,0],[2,1],[2,2],[1,2],[0,2],[0,1]]"
        );
        assert_eq!(handle.board_width(), 3);
        assert_eq!(handle.num_players(), 2);
    }

    #[test]
    fn special_tiles_json_includes_coordinates_and_effect() {
        let handle = handle("CacaoClassic", 3);
        let tiles: Vec<serde_json::Value> =
            serde_json::from_str(&handle.special_tiles_json()).unwrap();

        assert_eq!(tiles.len(), 6);
        for tile in &tiles {
            assert_ne!(tile["cell"], 0);
            assert!(tile["col"].is_u64());
            assert!(tile["key"].is_string());
            assert!(!tile["effect"].is_null());
        }
    }

    #[test]
    fn roll_then_settle_round_trip() {
        let mut handle = handle("CacaoClassic", 9);
        assert!(handle.is_idle());

        let face = handle.roll_dice();
        assert!((1..=6).contains(&face));
        assert_eq!(handle.phase_name(), "rolling");
        assert_eq!(handle.roll_dice(), 0);

        assert_eq!(handle.settle_roll(face), "");
        assert!(handle.is_idle());
        assert_eq!(handle.last_turn_step_cells().len(), face as usize);
        assert_eq!(handle.piece_positions().len(), 3);

        let outcome: serde_json::Value = serde_json::from_str(&handle.last_turn_json()).unwrap();
        assert_eq!(outcome["face"], face);
        assert_eq!(outcome["playerId"], 0);
    }

    #[test]
    fn settle_without_roll_or_with_bad_face_is_refused() {
        let mut handle = handle("CacaoTiny", 4);
        assert_eq!(handle.settle_roll(3), "No roll in progress.");

        handle.roll_dice();
        assert_eq!(handle.settle_roll(9), "die face 9 is outside 1..=6");
        assert_eq!(handle.phase_name(), "rolling");
        assert_eq!(handle.settle_roll(2), "");
    }

    #[test]
    fn reset_clears_pending_roll_and_history() {
        let mut handle = handle("CacaoTiny", 4);
        let face = handle.roll_dice();
        handle.settle_roll(face);
        handle.roll_dice();

        handle.reset_game();

        assert!(handle.is_idle());
        assert_eq!(handle.last_turn_json(), "null");
        assert_eq!(handle.turn_history(), "");
        assert_eq!(handle.piece_positions(), vec![0, 0]);
        assert_eq!(handle.settle_roll(1), "No roll in progress.");
    }

    #[test]
    fn die_face_rotation_rejects_invalid_faces() {
        let handle = handle("CacaoTiny", 4);
        assert_eq!(handle.die_face_rotation(1), vec![0.0, 0.0, 0.0]);
        assert!(handle.die_face_rotation(0).is_empty());
    }
}
