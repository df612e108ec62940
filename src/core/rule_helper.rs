pub const MIN_BOARD_SIDE: u32 = 2;

pub const DIE_FACE_MIN: u8 = 1;
pub const DIE_FACE_MAX: u8 = 6;
pub const NUM_DIE_FACES: usize = DIE_FACE_MAX as usize;

pub const DEFAULT_BOARD_NAME: &str = "CacaoClassic";

/// Cells on the border of a `width x height` rectangle.
pub fn perimeter_len(width: u32, height: u32) -> usize {
    (2 * (width as usize + height as usize)).saturating_sub(4)
}

/// `cell + delta` clamped into `0..path_len` without wrapping.
pub fn clamped_cell(cell: usize, delta: i64, path_len: usize) -> usize {
    let last = path_len.saturating_sub(1) as i64;
    (cell as i64 + delta).clamp(0, last) as usize
}

pub fn next_player_index(player_index: usize, num_players: usize) -> usize {
    (player_index + 1) % num_players
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perimeter_len_matches_formula() {
        assert_eq!(perimeter_len(8, 10), 28);
        assert_eq!(perimeter_len(2, 2), 4);
        assert_eq!(perimeter_len(3, 3), 8);
    }

    #[test]
    fn clamped_cell_never_wraps() {
        assert_eq!(clamped_cell(2, 3, 28), 5);
        assert_eq!(clamped_cell(26, 3, 28), 27);
        assert_eq!(clamped_cell(1, -2, 28), 0);
        assert_eq!(clamped_cell(10, -1, 28), 9);
    }

    #[test]
    fn next_player_index_wraps() {
        assert_eq!(next_player_index(0, 3), 1);
        assert_eq!(next_player_index(2, 3), 0);
        assert_eq!(next_player_index(0, 1), 0);
    }
}
