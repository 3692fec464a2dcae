//! Text rendering of [`Grid`]s and [`Maze`]s, and parsing that text back.
//!
//! Cells are written in traversal order, one character each (see [`Cell::symbol`]), with a
//! line break after the last cell of every column. A `width` x `height` grid therefore renders
//! as `width` lines of `height` characters.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Error};

use crate::generator::Maze;
use crate::grid::{Cell, Grid};

/// Render a [`Grid`] as text.
///
/// ```
/// use sparse_maze::grid::{Cell, Grid};
/// use sparse_maze::render::render;
///
/// let grid = Grid::new(2, 3, Cell::Wall);
/// assert_eq!(render(&grid), "###\n###\n");
/// ```
pub fn render(grid: &Grid) -> String {
    let mut out = String::with_capacity((grid.height() + 1) * grid.width());
    for (p, cell) in grid.cells() {
        out.push(cell.symbol());
        if p.y == grid.height() - 1 {
            out.push('\n');
        }
    }
    out
}

/// Parse text produced by [`render`] back into a [`Grid`].
///
/// ```
/// use nalgebra::Point2;
/// use sparse_maze::grid::Cell;
/// use sparse_maze::render::parse_grid;
///
/// let grid = parse_grid("#S#\n#.#\n#T#\n").unwrap();
/// assert_eq!(grid.at(&Point2::new(0, 1)), Some(Cell::Start));
/// assert_eq!(grid.at(&Point2::new(2, 1)), Some(Cell::Target));
/// ```
pub fn parse_grid(text: &str) -> Result<Grid, Error> {
    let mut columns: Vec<Vec<Cell>> = vec![];
    for (x, line) in text.lines().enumerate() {
        let column = line
            .chars()
            .enumerate()
            .map(|(y, c)| {
                Cell::from_symbol(c).ok_or_else(|| anyhow!("Unknown cell {:?} at ({}, {})", c, x, y))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(first) = columns.first() {
            if column.len() != first.len() {
                return Err(anyhow!(
                    "Column {} has {} cells, expected {}",
                    x,
                    column.len(),
                    first.len()
                ));
            }
        }
        columns.push(column);
    }

    if columns.first().map_or(true, Vec::is_empty) {
        return Err(anyhow!("Grid is empty"));
    }
    Ok(Grid::from_columns(columns))
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.grid(), f)
    }
}

impl FromStr for Grid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_grid(s)
    }
}

impl FromStr for Maze {
    type Err = Error;

    /// Parse a rendered maze, checking that the result follows the maze rules
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Maze::from_grid(parse_grid(s)?)
    }
}
