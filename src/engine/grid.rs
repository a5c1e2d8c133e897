use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::line::Tile;
use crate::error::EngineError;

const CELL_WIDTH: usize = 7;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Which kind of line a direction operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl Direction {
    pub const ALL: [Direction; 4] =
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Rows for Left/Right, columns for Up/Down.
    #[inline]
    pub fn axis(self) -> Axis {
        match self {
            Direction::Left | Direction::Right => Axis::Row,
            Direction::Up | Direction::Down => Axis::Column,
        }
    }

    /// True when tiles travel toward the high-index end of the line.
    #[inline]
    pub fn is_reversed(self) -> bool {
        matches!(self, Direction::Right | Direction::Down)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

impl FromStr for Direction {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "w" | "k" => Ok(Direction::Up),
            "down" | "s" | "j" => Ok(Direction::Down),
            "left" | "a" | "h" => Ok(Direction::Left),
            "right" | "d" | "l" => Ok(Direction::Right),
            _ => Err(EngineError::InvalidDirection(s.to_string())),
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = EngineError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Direction::Up),
            1 => Ok(Direction::Down),
            2 => Ok(Direction::Left),
            3 => Ok(Direction::Right),
            other => Err(EngineError::InvalidDirection(other.to_string())),
        }
    }
}

impl From<Direction> for u8 {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

/// Cell indices (row-major) of line `line` of an `size`x`size` grid,
/// ordered so the merge target for `dir` comes first.
///
/// This is the single coordinate transform used for both reading and
/// writing lines, in every direction.
///
/// ```
/// use puzzle_2048::engine::grid::line_indices;
/// use puzzle_2048::engine::Direction;
/// assert_eq!(line_indices(3, Direction::Left, 1).collect::<Vec<_>>(), vec![3, 4, 5]);
/// assert_eq!(line_indices(3, Direction::Down, 0).collect::<Vec<_>>(), vec![6, 3, 0]);
/// ```
pub fn line_indices(size: usize, dir: Direction, line: usize) -> impl Iterator<Item = usize> {
    debug_assert!(line < size);
    (0..size).map(move |k| {
        let pos = if dir.is_reversed() { size - 1 - k } else { k };
        match dir.axis() {
            Axis::Row => line * size + pos,
            Axis::Column => pos * size + line,
        }
    })
}

#[inline]
fn is_valid_tile(value: Tile) -> bool {
    value >= 2 && value.is_power_of_two()
}

/// Square grid of optional tiles, stored row-major.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    cells: Vec<Option<Tile>>,
}

impl Grid {
    /// An all-empty `size`x`size` grid.
    pub fn new(size: usize) -> Result<Self, EngineError> {
        if size < 2 {
            return Err(EngineError::InvalidGridSize(size));
        }
        Ok(Grid { size, cells: vec![None; size * size] })
    }

    /// Build a grid from rows of optional tiles.
    ///
    /// Every row must have as many cells as there are rows, and every tile
    /// must be a power of two >= 2.
    pub fn from_rows<R: AsRef<[Option<Tile>]>>(rows: &[R]) -> Result<Self, EngineError> {
        let mut grid = Grid::new(rows.len())?;
        for (r, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != grid.size {
                return Err(EngineError::ShapeMismatch { expected: grid.size, got: row.len() });
            }
            for (c, &cell) in row.iter().enumerate() {
                if let Some(v) = cell {
                    if !is_valid_tile(v) {
                        return Err(EngineError::InvalidTile(v));
                    }
                }
                grid.cells[r * grid.size + c] = cell;
            }
        }
        Ok(grid)
    }

    /// Like [`Grid::from_rows`] with `0` standing for an empty cell.
    ///
    /// ```
    /// use puzzle_2048::engine::Grid;
    /// let g = Grid::from_values(&[[2, 0], [0, 4]]).unwrap();
    /// assert_eq!(g.get(1, 1), Some(4));
    /// assert_eq!(g.count_empty(), 2);
    /// ```
    pub fn from_values<R: AsRef<[u64]>>(rows: &[R]) -> Result<Self, EngineError> {
        let rows: Vec<Vec<Option<Tile>>> = rows
            .iter()
            .map(|row| row.as_ref().iter().map(|&v| (v != 0).then_some(v)).collect())
            .collect();
        Grid::from_rows(&rows)
    }

    /// Side length N.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Cell at `(row, col)`; `None` if empty or out of range.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<Tile> {
        if row >= self.size || col >= self.size {
            return None;
        }
        self.cells[row * self.size + col]
    }

    /// Borrow all cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[Option<Tile>] {
        &self.cells
    }

    /// Owned copy of the cells as rows.
    pub fn rows(&self) -> Vec<Vec<Option<Tile>>> {
        self.cells.chunks(self.size).map(<[_]>::to_vec).collect()
    }

    /// Row-major indices of the empty cells.
    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells.iter().enumerate().filter(|(_, c)| c.is_none()).map(|(idx, _)| idx)
    }

    /// Count the number of empty cells.
    #[inline]
    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// Highest tile on the grid, if any.
    pub fn highest_tile(&self) -> Option<Tile> {
        self.cells.iter().flatten().copied().max()
    }

    /// True if some cell holds exactly `value`.
    pub fn contains(&self, value: Tile) -> bool {
        self.cells.iter().any(|&c| c == Some(value))
    }

    /// Read line `line` oriented for `dir` (merge target first).
    pub fn read_line(&self, dir: Direction, line: usize) -> Vec<Option<Tile>> {
        line_indices(self.size, dir, line).map(|idx| self.cells[idx]).collect()
    }

    /// Write merged values back into line `line` oriented for `dir`,
    /// clearing the remainder of the line.
    pub(crate) fn write_line(&mut self, dir: Direction, line: usize, merged: &[Tile]) {
        debug_assert!(merged.len() <= self.size);
        for (k, idx) in line_indices(self.size, dir, line).enumerate() {
            self.cells[idx] = merged.get(k).copied();
        }
    }

    #[inline]
    pub(crate) fn set_index(&mut self, idx: usize, value: Option<Tile>) {
        self.cells[idx] = value;
    }

    pub(crate) fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = None);
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid").field("size", &self.size).field("rows", &self.rows()).finish()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = "-".repeat(self.size * CELL_WIDTH + self.size - 1);
        writeln!(f)?;
        for (r, row) in self.cells.chunks(self.size).enumerate() {
            if r > 0 {
                writeln!(f, "{}", separator)?;
            }
            let line: Vec<String> = row.iter().map(|&c| format_val(c)).collect();
            writeln!(f, "{}", line.join("|"))?;
        }
        Ok(())
    }
}

fn format_val(cell: Option<Tile>) -> String {
    match cell {
        None => " ".repeat(CELL_WIDTH),
        Some(v) => format!("{:^width$}", v, width = CELL_WIDTH),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_line_indices_all_directions() {
        let idx = |dir, line| line_indices(4, dir, line).collect::<Vec<_>>();
        assert_eq!(idx(Direction::Left, 0), vec![0, 1, 2, 3]);
        assert_eq!(idx(Direction::Right, 0), vec![3, 2, 1, 0]);
        assert_eq!(idx(Direction::Up, 2), vec![2, 6, 10, 14]);
        assert_eq!(idx(Direction::Down, 2), vec![14, 10, 6, 2]);
        assert_eq!(idx(Direction::Right, 3), vec![15, 14, 13, 12]);
    }

    #[test]
    fn it_read_and_write_line() {
        let mut g = Grid::from_values(&[[2, 0, 4], [0, 8, 0], [16, 0, 32]]).unwrap();
        assert_eq!(g.read_line(Direction::Right, 0), vec![Some(4), None, Some(2)]);
        assert_eq!(g.read_line(Direction::Up, 0), vec![Some(2), None, Some(16)]);
        g.write_line(Direction::Down, 1, &[8]);
        assert_eq!(g.get(2, 1), Some(8));
        assert_eq!(g.get(1, 1), None);
        assert_eq!(g.get(0, 1), None);
    }

    #[test]
    fn it_rejects_bad_shapes_and_tiles() {
        assert_eq!(Grid::new(1).unwrap_err(), EngineError::InvalidGridSize(1));
        assert_eq!(
            Grid::from_values(&[vec![2, 0], vec![0]]).unwrap_err(),
            EngineError::ShapeMismatch { expected: 2, got: 1 }
        );
        assert_eq!(Grid::from_values(&[[3, 0], [0, 0]]).unwrap_err(), EngineError::InvalidTile(3));
        assert_eq!(Grid::from_values(&[[1, 0], [0, 0]]).unwrap_err(), EngineError::InvalidTile(1));
    }

    #[test]
    fn it_queries() {
        let g = Grid::from_values(&[[2, 0], [0, 1024]]).unwrap();
        assert_eq!(g.count_empty(), 2);
        assert_eq!(g.empty_cells().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(g.highest_tile(), Some(1024));
        assert!(g.contains(2));
        assert!(!g.contains(4));
        assert_eq!(Grid::new(3).unwrap().highest_tile(), None);
        assert_eq!(g.get(5, 0), None);
    }

    #[test]
    fn it_parses_directions() {
        assert_eq!("Left".parse::<Direction>().unwrap(), Direction::Left);
        assert_eq!(" w ".parse::<Direction>().unwrap(), Direction::Up);
        assert_eq!("j".parse::<Direction>().unwrap(), Direction::Down);
        assert_eq!("d".parse::<Direction>().unwrap(), Direction::Right);
        assert_eq!(
            "diagonal".parse::<Direction>().unwrap_err(),
            EngineError::InvalidDirection("diagonal".to_string())
        );
        assert_eq!(Direction::try_from(3).unwrap(), Direction::Right);
        assert!(Direction::try_from(4).is_err());
        for dir in Direction::ALL {
            assert_eq!(Direction::try_from(u8::from(dir)).unwrap(), dir);
        }
    }

    #[test]
    fn it_displays() {
        let g = Grid::from_values(&[[2, 0], [0, 2048]]).unwrap();
        let text = g.to_string();
        assert_eq!(text, "\n   2   |       \n---------------\n       | 2048  \n");
    }
}
