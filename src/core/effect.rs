use serde::{Deserialize, Serialize};
use std::fmt;
use tsify::Tsify;

/// What happens to a player who ends a move on a special tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, Tsify)]
pub enum Effect {
    Advance(u32),
    Retreat(u32),
    SkipNextTurn,
    ExtraTurn,
}

impl Effect {
    /// Signed cell delta for the relocating effects.
    pub fn cell_delta(self) -> Option<i64> {
        match self {
            Effect::Advance(k) => Some(i64::from(k)),
            Effect::Retreat(k) => Some(-i64::from(k)),
            Effect::SkipNextTurn | Effect::ExtraTurn => None,
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Advance(k) => write!(f, "+{k}"),
            Effect::Retreat(k) => write!(f, "-{k}"),
            Effect::SkipNextTurn => f.write_str("skip"),
            Effect::ExtraTurn => f.write_str("extra"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, Tsify)]
pub enum TileKind {
    Benefit,
    Penalty,
}

/// Template for a special tile, placed onto the path at setup.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
#[readonly::make]
pub struct EffectDefinition {
    pub key: String,
    pub text: String,
    pub effect: Effect,
}

impl EffectDefinition {
    pub fn new(key: impl Into<String>, text: impl Into<String>, effect: Effect) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
            effect,
        }
    }

    pub fn placed(&self, kind: TileKind) -> SpecialTile {
        SpecialTile {
            kind,
            key: self.key.clone(),
            text: self.text.clone(),
            effect: self.effect,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Tsify)]
#[serde(rename_all = "camelCase")]
#[readonly::make]
pub struct SpecialTile {
    pub kind: TileKind,
    pub key: String,
    pub text: String,
    pub effect: Effect,
}

impl fmt::Display for SpecialTile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.key, self.effect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_json_is_externally_tagged() {
        let effects: Vec<Effect> =
            serde_json::from_str(r#"[{"Advance": 3}, {"Retreat": 2}, "SkipNextTurn", "ExtraTurn"]"#)
                .unwrap();
        assert_eq!(
            effects,
            vec![
                Effect::Advance(3),
                Effect::Retreat(2),
                Effect::SkipNextTurn,
                Effect::ExtraTurn
            ]
        );
    }

    #[test]
    fn cell_delta_only_for_relocating_effects() {
        assert_eq!(Effect::Advance(3).cell_delta(), Some(3));
        assert_eq!(Effect::Retreat(2).cell_delta(), Some(-2));
        assert_eq!(Effect::SkipNextTurn.cell_delta(), None);
        assert_eq!(Effect::ExtraTurn.cell_delta(), None);
    }

    #[test]
    fn definition_parses_pascal_case() {
        let def: EffectDefinition = serde_json::from_str(
            r#"{ "Key": "rain", "Text": "Heavy rain", "Effect": { "Retreat": 1 } }"#,
        )
        .unwrap();
        assert_eq!(def.key, "rain");
        assert_eq!(def.effect, Effect::Retreat(1));

        let tile = def.placed(TileKind::Penalty);
        assert_eq!(tile.kind, TileKind::Penalty);
        assert_eq!(tile.to_string(), "rain(-1)");
    }
}
