use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use tsify::Tsify;

/// Index into the perimeter path. Cell 0 is the start/home cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Tsify)]
#[serde(transparent)]
pub struct CellIndex(pub usize);

impl CellIndex {
    pub const START: CellIndex = CellIndex(0);

    /// One unit step along a path of `path_len` cells, wrapping back to the start.
    pub fn next(self, path_len: usize) -> CellIndex {
        CellIndex((self.0 + 1) % path_len)
    }

    pub fn is_start(self) -> bool {
        self == Self::START
    }
}

impl<'de> Deserialize<'de> for CellIndex {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CellIndexVisitor;

        impl<'de> Visitor<'de> for CellIndexVisitor {
            type Value = CellIndex;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a cell index as a number or numeric string")
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                usize::try_from(value)
                    .map(CellIndex)
                    .map_err(|_| E::custom("cell index out of range for usize"))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                if value < 0 {
                    return Err(E::custom("cell index must be non-negative"));
                }

                self.visit_u64(value as u64)
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                value
                    .trim()
                    .parse::<usize>()
                    .map(CellIndex)
                    .map_err(E::custom)
            }
        }

        deserializer.deserialize_any(CellIndexVisitor)
    }
}

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Board grid position; `col` grows rightward, `row` grows downward.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, Tsify)]
pub struct GridCoord {
    pub col: u32,
    pub row: u32,
}

impl GridCoord {
    pub fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }

    pub fn is_adjacent_to(self, other: GridCoord) -> bool {
        self.col.abs_diff(other.col) + self.row.abs_diff(other.row) == 1
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.col, self.row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_wraps_to_start() {
        assert_eq!(CellIndex(26).next(28), CellIndex(27));
        assert_eq!(CellIndex(27).next(28), CellIndex::START);
    }

    #[test]
    fn deserializes_numbers_and_numeric_strings() {
        let cells: Vec<CellIndex> = serde_json::from_str(r#"[3, "7", " 12 "]"#).unwrap();
        assert_eq!(cells, vec![CellIndex(3), CellIndex(7), CellIndex(12)]);

        assert!(serde_json::from_str::<CellIndex>("-1").is_err());
        assert!(serde_json::from_str::<CellIndex>(r#""seven""#).is_err());
    }

    #[test]
    fn serializes_transparently() {
        assert_eq!(serde_json::to_string(&CellIndex(5)).unwrap(), "5");
    }

    #[test]
    fn adjacency_is_manhattan_distance_one() {
        let origin = GridCoord::new(0, 0);
        assert!(origin.is_adjacent_to(GridCoord::new(1, 0)));
        assert!(origin.is_adjacent_to(GridCoord::new(0, 1)));
        assert!(!origin.is_adjacent_to(GridCoord::new(1, 1)));
        assert!(!origin.is_adjacent_to(origin));
    }

    #[test]
    fn grid_coord_display() {
        assert_eq!(GridCoord::new(7, 3).to_string(), "7,3");
    }
}
