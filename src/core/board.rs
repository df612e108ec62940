use crate::core::{
    cell::{CellIndex, GridCoord},
    effect::{EffectDefinition, SpecialTile, TileKind},
    error::{BoardError, BoardLoadError},
    rule_helper,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

pub const EMBEDDED_BOARD_NAMES: [&str; 2] = ["CacaoClassic", "CacaoTiny"];

fn embedded_board_json(name: &str) -> Option<&'static str> {
    match name {
        "CacaoClassic" => Some(include_str!("../data/CacaoClassic.json")),
        "CacaoTiny" => Some(include_str!("../data/CacaoTiny.json")),
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
#[readonly::make]
pub struct BoardSpecification {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub num_players: usize,
    #[serde(default)]
    pub benefits: Vec<EffectDefinition>,
    #[serde(default)]
    pub penalties: Vec<EffectDefinition>,
}

impl BoardSpecification {
    pub fn new(
        name: impl Into<String>,
        width: u32,
        height: u32,
        num_players: usize,
        benefits: impl IntoIterator<Item = EffectDefinition>,
        penalties: impl IntoIterator<Item = EffectDefinition>,
    ) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            num_players,
            benefits: benefits.into_iter().collect(),
            penalties: penalties.into_iter().collect(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Case-insensitive lookup in the embedded board catalog.
    pub fn from_embedded(name: &str) -> Result<Self, BoardLoadError> {
        let canonical = EMBEDDED_BOARD_NAMES
            .iter()
            .find(|candidate| candidate.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| BoardLoadError::UnknownBoard(name.to_string()))?;
        let json = embedded_board_json(canonical)
            .ok_or_else(|| BoardLoadError::UnknownBoard(name.to_string()))?;
        Ok(Self::from_json_str(json)?)
    }

    pub fn with_dimensions(&self, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..self.clone()
        }
    }

    pub fn with_num_players(&self, num_players: usize) -> Self {
        Self {
            num_players,
            ..self.clone()
        }
    }

    pub fn num_specials(&self) -> usize {
        self.benefits.len() + self.penalties.len()
    }
}

/// Generated board: the perimeter path plus the special tiles placed on it.
/// Immutable once built.
#[derive(Clone, Debug, PartialEq)]
#[readonly::make]
pub struct Board {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub num_players: usize,
    pub path: Vec<GridCoord>,                       // indexed by cell index
    pub specials: HashMap<CellIndex, SpecialTile>,  // never contains cell 0
    pub spec: Option<BoardSpecification>,
}

impl Board {
    /// Board with hand-placed specials; cells must lie in `1..path_len`.
    pub fn new(
        name: impl Into<String>,
        width: u32,
        height: u32,
        num_players: usize,
        specials: impl IntoIterator<Item = (CellIndex, SpecialTile)>,
    ) -> Result<Self, BoardError> {
        if num_players == 0 {
            return Err(BoardError::NoPlayers);
        }

        let path = build_path(width, height)?;
        let specials = specials.into_iter().collect::<HashMap<_, _>>();
        if let Some(bad_cell) = specials
            .keys()
            .find(|cell| cell.is_start() || cell.0 >= path.len())
        {
            return Err(BoardError::InvalidSpecialCell {
                cell: bad_cell.0,
                path_len: path.len(),
            });
        }

        Ok(Board {
            name: name.into(),
            width,
            height,
            num_players,
            path,
            specials,
            spec: None,
        })
    }

    pub fn from_spec<R: Rng + ?Sized>(
        spec: BoardSpecification,
        rng: &mut R,
    ) -> Result<Self, BoardError> {
        if spec.num_players == 0 {
            return Err(BoardError::NoPlayers);
        }

        let path = build_path(spec.width, spec.height)?;
        let specials = assign_specials(&path, &spec.benefits, &spec.penalties, rng)?;

        info!(
            board = %spec.name,
            width = spec.width,
            height = spec.height,
            cells = path.len(),
            specials = specials.len(),
            "generated board"
        );

        Ok(Board {
            name: spec.name.clone(),
            width: spec.width,
            height: spec.height,
            num_players: spec.num_players,
            path,
            specials,
            spec: Some(spec),
        })
    }

    pub fn from_json_str<R: Rng + ?Sized>(json: &str, rng: &mut R) -> Result<Self, BoardLoadError> {
        let spec = BoardSpecification::from_json_str(json)?;
        Ok(Self::from_spec(spec, rng)?)
    }

    pub fn from_embedded_json<R: Rng + ?Sized>(name: &str, rng: &mut R) -> Result<Self, BoardLoadError> {
        let spec = BoardSpecification::from_embedded(name)?;
        Ok(Self::from_spec(spec, rng)?)
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn last_cell(&self) -> CellIndex {
        CellIndex(self.path.len().saturating_sub(1))
    }

    pub fn coord(&self, cell: CellIndex) -> Option<GridCoord> {
        self.path.get(cell.0).copied()
    }

    pub fn cell_of(&self, coord: GridCoord) -> Option<CellIndex> {
        self.path.iter().position(|c| *c == coord).map(CellIndex)
    }

    pub fn special_at(&self, cell: CellIndex) -> Option<&SpecialTile> {
        self.specials.get(&cell)
    }

    /// Special cells in path order.
    pub fn special_cells(&self) -> Vec<CellIndex> {
        let mut cells = self.specials.keys().copied().collect::<Vec<_>>();
        cells.sort();
        cells
    }

    pub fn is_valid(&self) -> Result<(), Vec<String>> {
        let mut mistakes = Vec::new();

        if self.path.len() != rule_helper::perimeter_len(self.width, self.height) {
            mistakes.push(format!(
                "path has {} cells, expected {}",
                self.path.len(),
                rule_helper::perimeter_len(self.width, self.height)
            ));
        }

        let mut seen = HashSet::new();
        for (idx, coord) in self.path.iter().enumerate() {
            if !seen.insert(*coord) {
                mistakes.push(format!("cell {idx} repeats coordinate {coord}"));
            }
            if coord.col >= self.width || coord.row >= self.height {
                mistakes.push(format!("cell {idx} coordinate {coord} is off the board"));
            }

            let next = self.path[(idx + 1) % self.path.len()];
            if !coord.is_adjacent_to(next) {
                mistakes.push(format!("cell {idx} ({coord}) is not adjacent to its successor ({next})"));
            }
        }

        for cell in self.special_cells() {
            if cell.is_start() {
                mistakes.push("start cell holds a special tile".to_string());
            } else if cell.0 >= self.path.len() {
                mistakes.push(format!("special tile on nonexistent cell {cell}"));
            }
        }

        if mistakes.is_empty() {
            Ok(())
        } else {
            Err(mistakes)
        }
    }
}

/// Clockwise walk of the rectangle's border starting at the top-left corner:
/// top row left to right, right column downward, bottom row right to left,
/// left column upward.
pub fn build_path(width: u32, height: u32) -> Result<Vec<GridCoord>, BoardError> {
    if width < rule_helper::MIN_BOARD_SIDE || height < rule_helper::MIN_BOARD_SIDE {
        return Err(BoardError::InvalidDimensions { width, height });
    }

    let mut path = Vec::with_capacity(rule_helper::perimeter_len(width, height));
    path.extend((0..width).map(|col| GridCoord::new(col, 0)));
    path.extend((1..height).map(|row| GridCoord::new(width - 1, row)));
    path.extend((0..width - 1).rev().map(|col| GridCoord::new(col, height - 1)));
    path.extend((1..height - 1).rev().map(|row| GridCoord::new(0, row)));

    Ok(path)
}

/// Places every benefit then every penalty on a distinct random non-start cell.
pub fn assign_specials<R: Rng + ?Sized>(
    path: &[GridCoord],
    benefits: &[EffectDefinition],
    penalties: &[EffectDefinition],
    rng: &mut R,
) -> Result<HashMap<CellIndex, SpecialTile>, BoardError> {
    let requested = benefits.len() + penalties.len();
    let available = path.len().saturating_sub(1);
    if requested > available {
        return Err(BoardError::BoardTooSmall {
            requested,
            available,
        });
    }

    let templates = benefits
        .iter()
        .map(|def| (def, TileKind::Benefit))
        .chain(penalties.iter().map(|def| (def, TileKind::Penalty)));

    let mut specials = HashMap::with_capacity(requested);
    for (def, kind) in templates {
        let cell = loop {
            let candidate = CellIndex(rng.random_range(1..path.len()));
            if !specials.contains_key(&candidate) {
                break candidate;
            }
        };

        debug!(cell = cell.0, key = %def.key, "placed special tile");
        specials.insert(cell, def.placed(kind));
    }

    Ok(specials)
}
