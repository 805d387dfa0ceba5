// Static terrain grid, loaded once per game

use serde::Serialize;

use crate::error::BoardError;
use crate::types::Position;

/// Terrain value of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Cell {
    /// Outside the uploaded map
    Unset,
    Open,
    Wall,
    /// Concealment; tanks can drive through it
    Grass,
}

impl Cell {
    pub fn from_value(value: i32) -> Option<Cell> {
        match value {
            -1 => Some(Cell::Unset),
            0 => Some(Cell::Open),
            1 => Some(Cell::Wall),
            2 => Some(Cell::Grass),
            _ => None,
        }
    }

    pub fn value(&self) -> i32 {
        match self {
            Cell::Unset => -1,
            Cell::Open => 0,
            Cell::Wall => 1,
            Cell::Grass => 2,
        }
    }
}

/// Square terrain grid of fixed capacity.
///
/// The uploaded map is copied into the top-left corner; everything beyond it
/// stays `Unset`. `center` and `width` derive from the uploaded size, not the
/// capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    side: usize,
    map_size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Board of the given capacity with every cell `Unset`
    pub fn unset(side: usize) -> Self {
        Board {
            side,
            map_size: 0,
            cells: vec![Cell::Unset; side * side],
        }
    }

    /// Loads a square map of raw cell values into a board of `capacity` side.
    pub fn load(grid: &[Vec<i32>], capacity: usize) -> Result<Self, BoardError> {
        let size = grid.len();
        if size == 0 {
            return Err(BoardError::EmptyMap);
        }
        if size > capacity {
            return Err(BoardError::TooLarge { size, capacity });
        }

        let mut board = Board::unset(capacity);
        for (row, values) in grid.iter().enumerate() {
            if values.len() != size {
                return Err(BoardError::NotSquare {
                    row,
                    len: values.len(),
                    expected: size,
                });
            }
            for (col, &value) in values.iter().enumerate() {
                let cell =
                    Cell::from_value(value).ok_or(BoardError::InvalidCell { row, col, value })?;
                board.cells[row * capacity + col] = cell;
            }
        }
        board.map_size = size;
        Ok(board)
    }

    /// Side length of the underlying grid
    pub fn side(&self) -> usize {
        self.side
    }

    /// Side length of the uploaded map
    pub fn map_size(&self) -> usize {
        self.map_size
    }

    /// Rally point coordinate on both axes
    pub fn center(&self) -> i32 {
        (self.map_size / 2) as i32
    }

    /// Practical play radius, also the scorer's base score
    pub fn width(&self) -> i32 {
        (self.map_size / 2) as i32
    }

    pub fn center_position(&self) -> Position {
        Position::new(self.center(), self.center())
    }

    pub fn in_bounds(&self, pos: &Position) -> bool {
        self.index(pos).is_some()
    }

    /// Flat index of `pos`, `None` when outside the grid
    pub fn index(&self, pos: &Position) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        let (x, y) = (pos.x as usize, pos.y as usize);
        if x >= self.side || y >= self.side {
            return None;
        }
        Some(x * self.side + y)
    }

    pub fn value(&self, pos: &Position) -> Result<Cell, BoardError> {
        self.index(pos)
            .map(|i| self.cells[i])
            .ok_or(BoardError::OutOfBounds {
                pos: *pos,
                side: self.side,
            })
    }

    /// True iff the cell is not a wall
    pub fn passable(&self, pos: &Position) -> Result<bool, BoardError> {
        Ok(self.value(pos)? != Cell::Wall)
    }

    pub fn is_wall(&self, pos: &Position) -> bool {
        matches!(self.value(pos), Ok(Cell::Wall))
    }

    /// Grass cell closest to `anchor` by Manhattan distance, looking no more
    /// than `radius` rows or columns away and never past the uploaded map.
    /// Ties go to the first cell in row-major order.
    pub fn nearest_grass(&self, anchor: &Position, radius: i32) -> Option<Position> {
        let last = self.map_size as i32 - 1;
        let radius = radius.max(0);
        let rows = anchor.x.saturating_sub(radius).max(0)..=anchor.x.saturating_add(radius).min(last);
        let cols = anchor.y.saturating_sub(radius).max(0)..=anchor.y.saturating_add(radius).min(last);

        rows.flat_map(|x| cols.clone().map(move |y| Position::new(x, y)))
            .filter(|pos| matches!(self.value(pos), Ok(Cell::Grass)))
            .min_by_key(|pos| pos.manhattan(anchor))
    }

    pub(crate) fn cells(&self) -> &[Cell] {
        &self.cells
    }
}
