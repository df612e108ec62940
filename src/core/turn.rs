use crate::core::{
    cell::CellIndex,
    dice::DieFace,
    effect::SpecialTile,
    player::PlayerId,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tsify::Tsify;

/// Everything that happened while resolving one settled roll.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Tsify)]
#[serde(rename_all = "camelCase")]
pub struct TurnOutcome {
    pub turn_id: u32,
    pub player_id: PlayerId,
    #[tsify(type = "number")]
    pub face: DieFace,
    pub start_cell: CellIndex,
    /// Cell reached after each unit step, in order; the last entry is the landed cell.
    pub path_cells: Vec<CellIndex>,
    pub landed_cell: CellIndex,
    pub special: Option<SpecialTile>,
    pub final_cell: CellIndex,
    pub extra_turn: bool,
    pub skipped_player: Option<PlayerId>,
    pub next_player_id: PlayerId,
}

impl TurnOutcome {
    pub fn was_relocated(&self) -> bool {
        self.final_cell != self.landed_cell
    }

    pub fn effect_text(&self) -> Option<&str> {
        self.special.as_ref().map(|tile| tile.text.as_str())
    }
}

impl fmt::Display for TurnOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "T{} {} rolled {}: {}->{}",
            self.turn_id, self.player_id, self.face, self.start_cell, self.landed_cell
        )?;

        if let Some(special) = &self.special {
            write!(f, " [{special}]")?;
        }
        if self.was_relocated() {
            write!(f, "->{}", self.final_cell)?;
        }
        if let Some(skipped) = self.skipped_player {
            write!(f, " skips {skipped}")?;
        }
        if self.extra_turn {
            f.write_str(" again")?;
        }

        write!(f, "; next {}", self.next_player_id)
    }
}

pub fn turn_hist_text<'a>(outcomes: impl IntoIterator<Item = &'a TurnOutcome>) -> String {
    outcomes
        .into_iter()
        .map(|outcome| format!("{}@{}", outcome.player_id.display_num(), outcome.face))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::effect::{Effect, EffectDefinition, TileKind};

    fn plain_outcome() -> TurnOutcome {
        TurnOutcome {
            turn_id: 4,
            player_id: PlayerId(0),
            face: DieFace::new(4).unwrap(),
            start_cell: CellIndex(26),
            path_cells: vec![CellIndex(27), CellIndex(0), CellIndex(1), CellIndex(2)],
            landed_cell: CellIndex(2),
            special: None,
            final_cell: CellIndex(2),
            extra_turn: false,
            skipped_player: None,
            next_player_id: PlayerId(1),
        }
    }

    #[test]
    fn display_plain_move() {
        assert_eq!(plain_outcome().to_string(), "T4 P1 rolled 4: 26->2; next P2");
    }

    #[test]
    fn display_relocation_and_skip() {
        let mut outcome = plain_outcome();
        outcome.special = Some(
            EffectDefinition::new("cacao-gold", "Advance 3", Effect::Advance(3)).placed(TileKind::Benefit),
        );
        outcome.final_cell = CellIndex(5);
        outcome.skipped_player = Some(PlayerId(1));
        outcome.next_player_id = PlayerId(2);

        assert!(outcome.was_relocated());
        assert_eq!(outcome.effect_text(), Some("Advance 3"));
        assert_eq!(
            outcome.to_string(),
            "T4 P1 rolled 4: 26->2 [cacao-gold(+3)]->5 skips P2; next P3"
        );
    }

    #[test]
    fn json_uses_camel_case() {
        let json = serde_json::to_value(plain_outcome()).unwrap();
        assert_eq!(json["landedCell"], 2);
        assert_eq!(json["pathCells"], serde_json::json!([27, 0, 1, 2]));
        assert_eq!(json["face"], 4);
        assert!(json["special"].is_null());
    }

    #[test]
    fn turn_hist_text_lists_player_and_face() {
        let mut second = plain_outcome();
        second.player_id = PlayerId(1);
        second.face = DieFace::new(6).unwrap();
        assert_eq!(turn_hist_text(&[plain_outcome(), second]), "1@4 2@6");
    }
}
