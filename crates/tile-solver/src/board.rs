//! Immutable sliding-tile board.
//!
//! A [`Board`] is an N×N permutation of `0..N²` where `0` is the blank.
//! Boards are value objects: every transformation (sliding the blank,
//! building the twin) returns a new board and equality is structural.
//!
//! The text format matches the classic puzzle files: the dimension on the
//! first line followed by N rows of N tiles.
//!
//! ```text
//! 3
//!  0 1 3
//!  4 2 5
//!  7 8 6
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::BoardError;

/// Value of the blank cell.
pub const BLANK: u32 = 0;

/// Direction the blank travels when it swaps with an adjacent tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Fixed expansion order used by [`Board::neighbors`].
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// `(row, col)` offset of the cell the blank moves into.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// One puzzle configuration.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BoardRepr", into = "BoardRepr")]
pub struct Board {
    dimension: usize,
    /// Row-major tiles, `dimension * dimension` long.
    tiles: Box<[u32]>,
    /// Row-major index of the blank.
    blank: usize,
}

impl Board {
    /// Build a board from rows of tiles, copying them.
    ///
    /// The rows must form a square grid of side at least 2 whose tiles are a
    /// permutation of `0..n²`.
    pub fn new<R: AsRef<[u32]>>(rows: &[R]) -> Result<Self, BoardError> {
        let dimension = rows.len();
        let mut tiles = Vec::with_capacity(dimension * dimension);
        for (row, cells) in rows.iter().enumerate() {
            let cells = cells.as_ref();
            if cells.len() != dimension {
                return Err(BoardError::NotSquare {
                    row,
                    len: cells.len(),
                    dimension,
                });
            }
            tiles.extend_from_slice(cells);
        }
        Self::from_tiles(dimension, tiles)
    }

    /// Build a board from row-major tiles.
    pub fn from_tiles(dimension: usize, tiles: Vec<u32>) -> Result<Self, BoardError> {
        if dimension < 2 {
            return Err(BoardError::TooSmall { dimension });
        }
        let cells = dimension * dimension;
        if tiles.len() != cells {
            return Err(BoardError::Parse(format!(
                "expected {} tiles for dimension {}, found {}",
                cells,
                dimension,
                tiles.len()
            )));
        }

        let limit = cells as u32;
        let mut seen = vec![false; cells];
        for &tile in &tiles {
            if tile >= limit {
                return Err(BoardError::TileOutOfRange { tile, limit });
            }
            if std::mem::replace(&mut seen[tile as usize], true) {
                return Err(BoardError::DuplicateTile { tile });
            }
        }

        // A full permutation always contains exactly one blank.
        let blank = tiles
            .iter()
            .position(|&t| t == BLANK)
            .ok_or(BoardError::DuplicateTile { tile: BLANK })?;

        Ok(Self {
            dimension,
            tiles: tiles.into_boxed_slice(),
            blank,
        })
    }

    /// The solved board of the given dimension.
    pub fn goal(dimension: usize) -> Result<Self, BoardError> {
        let cells = dimension * dimension;
        let tiles = (1..cells as u32).chain(std::iter::once(BLANK)).collect();
        Self::from_tiles(dimension, tiles)
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Tile at `(row, col)`, or `None` when out of bounds.
    pub fn tile(&self, row: usize, col: usize) -> Option<u32> {
        if row >= self.dimension || col >= self.dimension {
            return None;
        }
        Some(self.tiles[row * self.dimension + col])
    }

    /// `(row, col)` of the blank.
    pub fn blank(&self) -> (usize, usize) {
        (self.blank / self.dimension, self.blank % self.dimension)
    }

    /// Row-major view of all tiles.
    pub fn tiles(&self) -> &[u32] {
        &self.tiles
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.tiles.chunks(self.dimension)
    }

    /// Number of non-blank tiles out of place.
    pub fn hamming(&self) -> usize {
        self.tiles
            .iter()
            .enumerate()
            .filter(|&(idx, &tile)| tile != BLANK && goal_index(tile) != idx)
            .count()
    }

    /// Sum over non-blank tiles of row plus column distance to the goal cell.
    pub fn manhattan(&self) -> usize {
        let n = self.dimension;
        self.tiles
            .iter()
            .enumerate()
            .filter(|&(_, &tile)| tile != BLANK)
            .map(|(idx, &tile)| {
                let goal = goal_index(tile);
                (idx / n).abs_diff(goal / n) + (idx % n).abs_diff(goal % n)
            })
            .sum()
    }

    pub fn is_goal(&self) -> bool {
        self.hamming() == 0
    }

    /// Boards reachable by sliding one tile into the blank.
    ///
    /// Yields 2, 3 or 4 boards depending on where the blank sits, always in
    /// [`Direction::ALL`] order.
    pub fn neighbors(&self) -> Neighbors<'_> {
        let targets: SmallVec<[usize; 4]> = Direction::ALL
            .iter()
            .filter_map(|&dir| self.step(dir))
            .collect();
        Neighbors {
            board: self,
            targets: targets.into_iter(),
        }
    }

    /// The board after moving the blank in `dir`, if that stays on the grid.
    pub fn slide(&self, dir: Direction) -> Option<Board> {
        self.step(dir).map(|target| self.swapped(self.blank, target))
    }

    /// A board differing by one swap of two adjacent non-blank tiles.
    ///
    /// Swaps the first two tiles of the first row that does not hold the
    /// blank. Exactly one of a board and its twin can reach the goal.
    pub fn twin(&self) -> Board {
        let n = self.dimension;
        let blank_row = self.blank / n;
        let row = if blank_row == 0 { 1 } else { 0 };
        self.swapped(row * n, row * n + 1)
    }

    /// Index of the cell the blank would move into.
    fn step(&self, dir: Direction) -> Option<usize> {
        let (row, col) = self.blank();
        let (dr, dc) = dir.delta();
        let r = row.checked_add_signed(dr)?;
        let c = col.checked_add_signed(dc)?;
        if r >= self.dimension || c >= self.dimension {
            return None;
        }
        Some(r * self.dimension + c)
    }

    fn swapped(&self, a: usize, b: usize) -> Board {
        let mut tiles = self.tiles.clone();
        tiles.swap(a, b);
        let blank = if self.blank == a {
            b
        } else if self.blank == b {
            a
        } else {
            self.blank
        };
        Board {
            dimension: self.dimension,
            tiles,
            blank,
        }
    }
}

/// Row-major goal index of a non-blank tile.
fn goal_index(tile: u32) -> usize {
    tile as usize - 1
}

/// Lazy iterator over the neighbors of a board.
pub struct Neighbors<'a> {
    board: &'a Board,
    targets: smallvec::IntoIter<[usize; 4]>,
}

impl Iterator for Neighbors<'_> {
    type Item = Board;

    fn next(&mut self) -> Option<Board> {
        let target = self.targets.next()?;
        Some(self.board.swapped(self.board.blank, target))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.targets.size_hint()
    }
}

impl ExactSizeIterator for Neighbors<'_> {}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.tiles.len() - 1).to_string().len();
        writeln!(f, "{}", self.dimension)?;
        for row in self.rows() {
            for &tile in row {
                write!(f, " {:>width$}", tile, width = width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rows()).finish()
    }
}

impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut numbers = s.split_whitespace().map(|token| {
            token
                .parse::<u32>()
                .map_err(|e| BoardError::Parse(format!("invalid number {:?}: {}", token, e)))
        });

        let dimension = numbers
            .next()
            .ok_or_else(|| BoardError::Parse("missing dimension".to_string()))??
            as usize;
        let tiles = numbers.collect::<Result<Vec<u32>, _>>()?;
        Self::from_tiles(dimension, tiles)
    }
}

/// Serialized form: `{"tiles": [[...], ...]}`.
#[derive(Serialize, Deserialize)]
struct BoardRepr {
    tiles: Vec<Vec<u32>>,
}

impl TryFrom<BoardRepr> for Board {
    type Error = BoardError;

    fn try_from(repr: BoardRepr) -> Result<Self, Self::Error> {
        Board::new(&repr.tiles)
    }
}

impl From<Board> for BoardRepr {
    fn from(board: Board) -> Self {
        BoardRepr {
            tiles: board.rows().map(<[u32]>::to_vec).collect(),
        }
    }
}
