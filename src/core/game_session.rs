use crate::core::{
    board::{Board, BoardSpecification},
    cell::CellIndex,
    dice::{self, DieFace},
    effect::Effect,
    error::{BoardError, EngineError},
    player::{Player, PlayerId, players_to_nice_string},
    rule_helper,
    turn::{TurnOutcome, turn_hist_text},
};
use crate::util::observer::{NoopObserver, TurnObserver};
use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};
use tsify::Tsify;

/// Admission control for rolls: only one roll is ever outstanding.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, Tsify)]
#[serde(rename_all = "camelCase")]
pub enum EnginePhase {
    Idle,
    Rolling,
    Resolving,
}

impl EnginePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            EnginePhase::Idle => "idle",
            EnginePhase::Rolling => "rolling",
            EnginePhase::Resolving => "resolving",
        }
    }
}

impl fmt::Display for EnginePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollToken {
    pub roll_id: u64,
}

/// A requested roll whose face is already decided; the presentation layer
/// animates toward `face` and then hands the token back to `settle`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRoll {
    pub token: RollToken,
    pub face: DieFace,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Tsify)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub turn_id: u32,
    pub phase: EnginePhase,
    pub current_player_id: PlayerId,
    pub players: Vec<Player>,
}

#[derive(Clone, Debug)]
pub struct GameSession {
    board: Board,
    players: Vec<Player>,
    current_player_index: usize,
    phase: EnginePhase,
    pending: Option<PendingRoll>,
    next_roll_id: u64,
    turn_id: u32,
    turn_hist: Vec<TurnOutcome>,
    rng: StdRng,
}

impl GameSession {
    /// Fresh session on `board`. The RNG is seeded once here and never again.
    pub fn new(board: Board, seed: Option<u64>) -> Self {
        Self::with_rng(board, seeded_rng(seed))
    }

    /// Generates the board with the session RNG, then starts the session.
    pub fn from_spec(spec: BoardSpecification, seed: Option<u64>) -> Result<Self, BoardError> {
        let mut rng = seeded_rng(seed);
        let board = Board::from_spec(spec, &mut rng)?;
        Ok(Self::with_rng(board, rng))
    }

    fn with_rng(board: Board, rng: StdRng) -> Self {
        let players = (0..board.num_players)
            .map(|idx| Player::at_start(PlayerId(idx)))
            .collect();

        GameSession {
            board,
            players,
            current_player_index: 0,
            phase: EnginePhase::Idle,
            pending: None,
            next_roll_id: 1,
            turn_id: 1,
            turn_hist: Vec::new(),
            rng,
        }
    }

    pub fn reset(&mut self) {
        for player in &mut self.players {
            *player = Player::at_start(player.id);
        }
        self.current_player_index = 0;
        self.phase = EnginePhase::Idle;
        self.pending = None;
        self.turn_id = 1;
        self.turn_hist.clear();
        info!(board = %self.board.name, players = self.players.len(), "session reset");
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == EnginePhase::Idle
    }

    pub fn pending_roll(&self) -> Option<PendingRoll> {
        self.pending
    }

    pub fn current_player_id(&self) -> PlayerId {
        PlayerId(self.current_player_index)
    }

    pub fn turn_id(&self) -> u32 {
        self.turn_id
    }

    pub fn turn_hist(&self) -> &[TurnOutcome] {
        &self.turn_hist
    }

    pub fn last_turn(&self) -> Option<&TurnOutcome> {
        self.turn_hist.last()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            turn_id: self.turn_id,
            phase: self.phase,
            current_player_id: self.current_player_id(),
            players: self.players.clone(),
        }
    }

    /// Starts a roll. Refused without side effects unless the engine is idle.
    pub fn roll_dice(&mut self) -> Result<PendingRoll, EngineError> {
        if self.phase != EnginePhase::Idle {
            debug!(phase = %self.phase, "roll ignored: engine busy");
            return Err(EngineError::EngineBusy { phase: self.phase });
        }

        let pending = PendingRoll {
            token: RollToken {
                roll_id: self.next_roll_id,
            },
            face: dice::roll_face(&mut self.rng),
        };
        self.next_roll_id += 1;
        self.pending = Some(pending);
        self.phase = EnginePhase::Rolling;

        debug!(
            roll_id = pending.token.roll_id,
            face = pending.face.value(),
            player = %self.current_player_id(),
            "roll requested"
        );
        Ok(pending)
    }

    pub fn settle(&mut self, token: RollToken, face: DieFace) -> Result<TurnOutcome, EngineError> {
        self.settle_observed(token, face, &mut NoopObserver)
    }

    /// Applies the settled face for the outstanding roll: movement, special
    /// tile, next player, then `observer`, then back to idle.
    pub fn settle_observed(
        &mut self,
        token: RollToken,
        face: DieFace,
        observer: &mut dyn TurnObserver,
    ) -> Result<TurnOutcome, EngineError> {
        match self.pending {
            Some(pending) if pending.token == token => {}
            _ => return Err(EngineError::UnknownRoll {
                roll_id: token.roll_id,
            }),
        }

        self.pending = None;
        self.phase = EnginePhase::Resolving;

        let player_index = self.current_player_index;
        let Some(outcome) = self.resolve_face(player_index, face) else {
            self.phase = EnginePhase::Idle;
            return Err(EngineError::InvalidPlayer(player_index));
        };

        observer.on_turn_resolved(self, &outcome);
        self.phase = EnginePhase::Idle;
        Ok(outcome)
    }

    /// Moves `player_index` forward `steps` cells and applies whatever it
    /// lands on. Returns `None` and changes nothing when there is nothing to
    /// resolve: no players, unknown player, empty path, or `steps` not a die
    /// value.
    pub fn resolve_roll(&mut self, player_index: usize, steps: usize) -> Option<TurnOutcome> {
        let face = u8::try_from(steps).ok().and_then(|value| DieFace::new(value).ok())?;
        self.resolve_face(player_index, face)
    }

    fn resolve_face(&mut self, player_index: usize, face: DieFace) -> Option<TurnOutcome> {
        let num_players = self.players.len();
        let path_len = self.board.len();
        if num_players == 0 || player_index >= num_players || path_len == 0 {
            return None;
        }

        let player_id = self.players[player_index].id;
        let start_cell = self.players[player_index].position;
        let mut path_cells = Vec::with_capacity(face.steps());
        let mut cell = start_cell;
        for _ in 0..face.steps() {
            cell = cell.next(path_len);
            path_cells.push(cell);
        }
        let landed_cell = cell;

        // relocation is final; the destination's own tile is not applied
        let special = self.board.special_at(landed_cell).cloned();
        let mut final_cell = landed_cell;
        if let Some(tile) = &special {
            debug!(player = %player_id, cell = landed_cell.0, key = %tile.key, effect = %tile.effect, "special tile");
            match tile.effect {
                Effect::SkipNextTurn => {
                    let victim = rule_helper::next_player_index(player_index, num_players);
                    self.players[victim].pending_skip = true;
                }
                Effect::ExtraTurn => {
                    self.players[player_index].pending_extra_turn = true;
                }
                relocating => {
                    if let Some(delta) = relocating.cell_delta() {
                        final_cell = CellIndex(rule_helper::clamped_cell(landed_cell.0, delta, path_len));
                    }
                }
            }
        }
        self.players[player_index].position = final_cell;

        let mut extra_turn = false;
        let mut skipped_player = None;
        let next_index = if self.players[player_index].pending_extra_turn {
            self.players[player_index].pending_extra_turn = false;
            extra_turn = true;
            player_index
        } else {
            let candidate = rule_helper::next_player_index(player_index, num_players);
            if self.players[candidate].pending_skip {
                // one hop only, even if the following player is also flagged
                self.players[candidate].pending_skip = false;
                skipped_player = Some(self.players[candidate].id);
                rule_helper::next_player_index(candidate, num_players)
            } else {
                candidate
            }
        };
        self.current_player_index = next_index;

        let outcome = TurnOutcome {
            turn_id: self.turn_id,
            player_id,
            face,
            start_cell,
            path_cells,
            landed_cell,
            special,
            final_cell,
            extra_turn,
            skipped_player,
            next_player_id: self.players[next_index].id,
        };
        self.turn_id += 1;
        self.turn_hist.push(outcome.clone());

        debug!(
            turn = outcome.turn_id,
            player = %player_id,
            face = face.value(),
            landed = landed_cell.0,
            final_cell = final_cell.0,
            next = %outcome.next_player_id,
            "roll resolved"
        );
        Some(outcome)
    }

    fn check_setup_allowed(&self, player_id: PlayerId) -> Result<usize, EngineError> {
        if self.phase != EnginePhase::Idle {
            return Err(EngineError::EngineBusy { phase: self.phase });
        }
        if player_id.0 >= self.players.len() {
            return Err(EngineError::InvalidPlayer(player_id.0));
        }
        Ok(player_id.0)
    }

    pub fn set_player_position(&mut self, player_id: PlayerId, cell: CellIndex) -> Result<(), EngineError> {
        let idx = self.check_setup_allowed(player_id)?;
        if cell.0 >= self.board.len() {
            return Err(EngineError::InvalidCell(cell.0));
        }
        self.players[idx].position = cell;
        Ok(())
    }

    pub fn set_pending_skip(&mut self, player_id: PlayerId, pending: bool) -> Result<(), EngineError> {
        let idx = self.check_setup_allowed(player_id)?;
        self.players[idx].pending_skip = pending;
        Ok(())
    }

    pub fn set_pending_extra_turn(&mut self, player_id: PlayerId, pending: bool) -> Result<(), EngineError> {
        let idx = self.check_setup_allowed(player_id)?;
        self.players[idx].pending_extra_turn = pending;
        Ok(())
    }

    pub fn set_current_player(&mut self, player_id: PlayerId) -> Result<(), EngineError> {
        self.current_player_index = self.check_setup_allowed(player_id)?;
        Ok(())
    }

    pub fn summary(&self, indentation_level: usize) -> String {
        let indentation = "  ".repeat(indentation_level);
        let specials_text = self
            .board
            .special_cells()
            .into_iter()
            .filter_map(|cell| self.board.special_at(cell).map(|tile| format!("{cell}:{tile}")))
            .collect::<Vec<_>>()
            .join(" ");

        format!(
            "{indentation}T{} {} ({}), {} to roll\n{indentation}Players: {}\n{indentation}Specials: {}\n{indentation}History: {}",
            self.turn_id,
            self.board.name,
            self.phase,
            self.current_player_id(),
            players_to_nice_string(&self.players),
            specials_text,
            turn_hist_text(&self.turn_hist),
        )
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    StdRng::seed_from_u64(seed.unwrap_or_else(dice::entropy_seed))
}
