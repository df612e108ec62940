use crate::core::cell::CellIndex;
use serde::{Deserialize, Serialize};
use std::fmt;
use tsify::Tsify;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize, Tsify)]
#[serde(transparent)]
pub struct PlayerId(pub usize);

impl PlayerId {
    pub fn display_num(self) -> usize {
        self.0 + 1
    }

    pub fn from_display_num(display_num: usize) -> Option<Self> {
        display_num.checked_sub(1).map(PlayerId)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.display_num())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Tsify)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub position: CellIndex,
    pub pending_skip: bool,
    pub pending_extra_turn: bool,
}

impl Player {
    pub fn at_start(id: PlayerId) -> Self {
        Self {
            id,
            position: CellIndex::START,
            pending_skip: false,
            pending_extra_turn: false,
        }
    }

    pub fn flags_text(&self) -> String {
        let mut text = String::new();
        if self.pending_skip {
            text.push_str(" skip");
        }
        if self.pending_extra_turn {
            text.push_str(" extra");
        }
        text
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}{}", self.id, self.position, self.flags_text())
    }
}

pub fn players_to_nice_string<'a>(players: impl IntoIterator<Item = &'a Player>) -> String {
    let joined = players
        .into_iter()
        .map(|player| player.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    format!("{joined};")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_id_display_is_one_based() {
        assert_eq!(PlayerId(0).to_string(), "P1");
        assert_eq!(PlayerId::from_display_num(3), Some(PlayerId(2)));
        assert_eq!(PlayerId::from_display_num(0), None);
    }

    #[test]
    fn at_start_has_no_pending_flags() {
        let player = Player::at_start(PlayerId(1));
        assert_eq!(player.position, CellIndex::START);
        assert!(!player.pending_skip);
        assert!(!player.pending_extra_turn);
        assert_eq!(player.to_string(), "P2@0");
    }

    #[test]
    fn players_to_nice_string_lists_flags() {
        let mut second = Player::at_start(PlayerId(1));
        second.position = CellIndex(9);
        second.pending_skip = true;
        let players = vec![Player::at_start(PlayerId(0)), second];
        assert_eq!(players_to_nice_string(&players), "P1@0 P2@9 skip;");
    }
}
