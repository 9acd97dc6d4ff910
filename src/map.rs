use std::path::Path;

use thiserror::Error;

/// Built-in 16x16 level. `#` is a wall, anything else is open floor.
const REFERENCE_MAP: [&str; 16] = [
    "################",
    "#..............#",
    "#.......########",
    "#..............#",
    "#......##......#",
    "#......##......#",
    "#..............#",
    "###............#",
    "##.............#",
    "#......####..###",
    "#......#.......#",
    "#......#.......#",
    "#..............#",
    "#......#########",
    "#..............#",
    "################",
];

#[derive(Debug, Error)]
pub enum MapError {
    #[error("map has no cells")]
    Empty,

    #[error("row {row} is {found} cells wide, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("{width}x{height} map needs {expected} cells, got {found}")]
    SizeMismatch {
        width: usize,
        height: usize,
        expected: usize,
        found: usize,
    },

    #[error("reading map file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Wall,
    Empty,
}

impl From<char> for Cell {
    fn from(c: char) -> Self {
        if c == '#' { Cell::Wall } else { Cell::Empty }
    }
}

/// Read-only grid of cells, row-major.
#[derive(Debug, Clone)]
pub struct Map {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Map {
    pub fn new(width: usize, height: usize, cells: Vec<Cell>) -> Result<Self, MapError> {
        if width == 0 || height == 0 {
            return Err(MapError::Empty);
        }
        if cells.len() != width * height {
            return Err(MapError::SizeMismatch {
                width,
                height,
                expected: width * height,
                found: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, MapError> {
        let width = rows.first().map_or(0, |r| r.as_ref().chars().count());
        let mut cells = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let before = cells.len();
            cells.extend(line.as_ref().chars().map(Cell::from));
            let found = cells.len() - before;
            if found != width {
                return Err(MapError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }
        }
        Self::new(width, rows.len(), cells)
    }

    /// Load a map from a text file, one row per line. Blank lines are skipped.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let text = std::fs::read_to_string(path)?;
        let rows: Vec<&str> = text
            .lines()
            .filter(|l| !l.is_empty())
            .collect();
        Self::from_rows(&rows)
    }

    pub fn reference() -> Self {
        Self::from_rows(&REFERENCE_MAP).expect("reference map is rectangular")
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Anything outside the grid counts as wall.
    #[inline]
    pub fn is_wall(&self, col: i32, row: i32) -> bool {
        if !self.in_bounds(col, row) {
            return true;
        }
        self.cells[row as usize * self.width + col as usize] == Cell::Wall
    }

    #[inline]
    pub fn in_bounds(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && (col as usize) < self.width && (row as usize) < self.height
    }
}

impl Default for Map {
    fn default() -> Self {
        Self::reference()
    }
}
