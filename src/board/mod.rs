//! Grid model for the thaw puzzle.
//!
//! A [`Board`] is an immutable row-major grid of [`CellState`]. Player turns never
//! mutate a board in place; [`Board::apply_action`] hands back a new value so the
//! round can compare, keep or discard boards freely.
//!
//! Submodules:
//! - [`generator`]: random layouts with the "already complete" rejection rule
//! - [`layout`]: pixel <-> cell mapping shared by input handling and rendering

pub mod generator;
pub mod layout;

use std::fmt;

use thiserror::Error;

// --- Cells ------------------------------------------------------------------

/// State of a single grid position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellState {
    /// Snow tile. Never actionable, never blocks completion.
    Frozen,
    /// A former `Empty` tile the player thawed; counts toward score.
    Cleared,
    /// The only actionable tile. The round is complete once none remain.
    Empty,
}

impl CellState {
    pub fn is_actionable(self) -> bool {
        matches!(self, CellState::Empty)
    }
}

// --- Board --------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("a {width}x{height} board needs {expected} cells, got {actual}")]
    CellCount {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("a {width}x{height} board has more cells than this target can address")]
    TooLarge { width: u32, height: u32 },
}

fn cell_count(width: u32, height: u32) -> Result<usize, BoardError> {
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(BoardError::TooLarge { width, height })
}

/// Row-major grid. `cells.len() == width * height` holds for every value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    width: u32,
    height: u32,
    cells: Vec<CellState>,
}

impl Board {
    pub fn new(width: u32, height: u32, cells: Vec<CellState>) -> Result<Self, BoardError> {
        let expected = cell_count(width, height)?;
        if cells.len() != expected {
            return Err(BoardError::CellCount {
                width,
                height,
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Board with every cell set to `state`.
    pub fn filled(width: u32, height: u32, state: CellState) -> Result<Self, BoardError> {
        Ok(Self {
            width,
            height,
            cells: vec![state; cell_count(width, height)?],
        })
    }

    /// Fixed opening layout shown before the first generated board: a plus of
    /// empty tiles with frozen corners.
    pub fn starter() -> Self {
        use CellState::{Empty, Frozen};
        Self {
            width: 3,
            height: 3,
            cells: vec![
                Frozen, Empty, Frozen, //
                Empty, Empty, Empty, //
                Frozen, Empty, Frozen,
            ],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, index: usize) -> Option<CellState> {
        self.cells.get(index).copied()
    }

    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&c| c == state).count()
    }

    /// True once no `Empty` cell remains. Frozen/Cleared distribution is ignored,
    /// so an all-frozen board is complete too.
    pub fn is_complete(&self) -> bool {
        !self.cells.iter().any(|c| c.is_actionable())
    }

    /// Thaw the cell at `index`.
    ///
    /// Out-of-range indices and non-`Empty` targets are no-ops and return an equal
    /// board; otherwise exactly one cell changes from `Empty` to `Cleared`. Safe to
    /// call for every position a drag passes over.
    pub fn apply_action(&self, index: usize) -> Board {
        let mut next = self.clone();
        if let Some(cell) = next.cells.get_mut(index) {
            if cell.is_actionable() {
                *cell = CellState::Cleared;
            }
        }
        next
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width.max(1) as usize) {
            for cell in row {
                let glyph = match cell {
                    CellState::Frozen => '#',
                    CellState::Cleared => '*',
                    CellState::Empty => '.',
                };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_wrong_cell_count() {
        let err = Board::new(2, 2, vec![CellState::Empty; 3]).unwrap_err();
        assert_eq!(
            err,
            BoardError::CellCount {
                width: 2,
                height: 2,
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_starter_plus_clears_in_five_moves() {
        let mut board = Board::starter();
        assert!(!board.is_complete());
        for idx in [1, 3, 4, 5, 7] {
            board = board.apply_action(idx);
        }
        assert!(board.is_complete());
        assert_eq!(board.count(CellState::Empty), 0);
        assert_eq!(board.count(CellState::Cleared), 5);
        assert_eq!(board.count(CellState::Frozen), 4);
    }

    #[test]
    fn test_frozen_and_cleared_targets_are_noops() {
        let board = Board::starter();
        assert_eq!(board.apply_action(0), board);

        let once = board.apply_action(4);
        assert_eq!(once.apply_action(4), once);
    }

    #[test]
    fn test_out_of_range_is_noop() {
        let board = Board::starter();
        assert_eq!(board.apply_action(9), board);
        assert_eq!(board.apply_action(usize::MAX), board);
    }

    #[test]
    fn test_action_changes_at_most_one_cell() {
        let board = Board::starter();
        for idx in 0..board.len() {
            let next = board.apply_action(idx);
            let changed = board
                .cells()
                .iter()
                .zip(next.cells())
                .filter(|(a, b)| a != b)
                .count();
            assert!(changed <= 1, "index {idx} changed {changed} cells");
            assert!(board.count(CellState::Empty) - next.count(CellState::Empty) <= 1);
        }
    }

    #[test]
    fn test_all_frozen_counts_as_complete() {
        assert!(Board::filled(4, 2, CellState::Frozen).unwrap().is_complete());
        assert!(!Board::filled(4, 2, CellState::Empty).unwrap().is_complete());
    }

    #[test]
    fn test_cell_lookup() {
        let board = Board::starter();
        assert_eq!(board.cell(1), Some(CellState::Empty));
        assert_eq!(board.cell(0), Some(CellState::Frozen));
        assert_eq!(board.cell(9), None);
    }

    #[cfg(target_pointer_width = "32")]
    #[test]
    fn test_cell_count_overflow_is_an_error() {
        assert_eq!(
            Board::filled(70_000, 70_000, CellState::Empty),
            Err(BoardError::TooLarge {
                width: 70_000,
                height: 70_000
            })
        );
    }

    #[test]
    fn test_display_renders_rows() {
        let board = Board::starter().apply_action(4);
        assert_eq!(board.to_string(), "#.#\n.*.\n#.#\n");
    }
}
