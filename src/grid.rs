//! Logical grid structs and utilities.

use anyhow::{anyhow, Error};
use nalgebra::Point2;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::error::MIN_DIMENSION;

/// Enum for [`Grid`] cell values.
///
/// The discriminant of each variant is the character it is rendered as.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Cell {
    /// Wall
    Wall = b'#',
    /// Empty space
    Open = b'.',
    /// Where the maze is entered
    Start = b'S',
    /// Where the maze is exited
    Target = b'T',
}

impl Cell {
    /// The character this [`Cell`] is rendered as.
    pub fn symbol(self) -> char {
        u8::from(self) as char
    }

    /// The [`Cell`] rendered as `c`, if any.
    ///
    /// ```
    /// use sparse_maze::grid::Cell;
    ///
    /// assert_eq!(Cell::from_symbol('T'), Some(Cell::Target));
    /// assert_eq!(Cell::from_symbol('x'), None);
    /// ```
    pub fn from_symbol(c: char) -> Option<Self> {
        u8::try_from(c).ok().and_then(|b| Cell::try_from(b).ok())
    }
}

/// A 2D grid of [`Cell`]s stored in a single flat vector.
///
/// Cells are laid out column by column: the cell at `(x, y)` lives at index
/// `x * height + y`. This is also the traversal order used everywhere a grid is walked,
/// so iterating [`Grid::positions`] visits `(0, 0), (0, 1), ..., (0, height - 1), (1, 0), ...`
///
/// A [`Grid`] is only ever built through [`Grid::new`] or by parsing rendered text, which keeps
/// the cell vector the same size as `width * height`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a `width` x `height` grid filled with `fill`
    pub fn new(width: usize, height: usize, fill: Cell) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; width * height],
        }
    }

    /// Build a grid from its columns; every column must have the same length
    pub(crate) fn from_columns(columns: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        let height = columns.first().map_or(0, Vec::len);
        debug_assert!(columns.iter().all(|c| c.len() == height));
        Self {
            width,
            height,
            cells: columns.into_iter().flatten().collect(),
        }
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, p: &Point2<usize>) -> Option<usize> {
        if p.x >= self.width || p.y >= self.height {
            return None;
        }
        Some(p.x * self.height + p.y)
    }

    /// Returns the [`Cell`] at the given position, or `None` if the position is out of bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use nalgebra::Point2;
    /// use sparse_maze::grid::{Cell, Grid};
    ///
    /// let grid = Grid::new(4, 5, Cell::Open);
    /// assert_eq!(grid.at(&Point2::new(3, 4)), Some(Cell::Open));
    /// assert_eq!(grid.at(&Point2::new(4, 0)), None);
    /// ```
    pub fn at(&self, p: &Point2<usize>) -> Option<Cell> {
        self.index(p).map(|i| self.cells[i])
    }

    /// Overwrite the [`Cell`] at the given position; out of bounds writes are ignored
    pub(crate) fn set(&mut self, p: &Point2<usize>, cell: Cell) {
        if let Some(i) = self.index(p) {
            self.cells[i] = cell;
        }
    }

    /// Every position in traversal order
    pub fn positions(&self) -> impl Iterator<Item = Point2<usize>> {
        let height = self.height;
        (0..self.width).flat_map(move |x| (0..height).map(move |y| Point2::new(x, y)))
    }

    /// Every position with its [`Cell`], in traversal order
    pub fn cells(&self) -> impl Iterator<Item = (Point2<usize>, Cell)> + '_ {
        self.positions().zip(self.cells.iter().copied())
    }

    /// Whether the position lies on the outermost ring of the grid; out of bounds positions don't.
    ///
    /// ```
    /// use nalgebra::Point2;
    /// use sparse_maze::grid::{Cell, Grid};
    ///
    /// let grid = Grid::new(10, 20, Cell::Open);
    /// assert!(grid.is_border(&Point2::new(0, 5)));
    /// assert!(grid.is_border(&Point2::new(4, 19)));
    /// assert!(!grid.is_border(&Point2::new(1, 1)));
    /// ```
    pub fn is_border(&self, p: &Point2<usize>) -> bool {
        if self.index(p).is_none() {
            return false;
        }
        p.x == 0 || p.x == self.width - 1 || p.y == 0 || p.y == self.height - 1
    }

    /// Whether the position is inside the grid and not on its border
    pub fn is_interior(&self, p: &Point2<usize>) -> bool {
        self.index(p).is_some() && !self.is_border(p)
    }

    /// How many cells hold the given value
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Positions of every cell holding the given value, in traversal order
    pub fn find(&self, cell: Cell) -> Vec<Point2<usize>> {
        self.cells()
            .filter(|&(_, c)| c == cell)
            .map(|(p, _)| p)
            .collect()
    }
}

/// Validates a [`Grid`] as a maze, returning its start and target positions.
///
/// A valid maze grid must satisfy the following conditions:
/// - Both dimensions are at least [`MIN_DIMENSION`].
/// - The edges of the grid are all walls, except for the start and target.
/// - There is exactly one start and exactly one target.
/// - The start and target are on the edges of the grid.
pub fn validate_maze_grid(grid: &Grid) -> Result<(Point2<usize>, Point2<usize>), Error> {
    if grid.width() < MIN_DIMENSION || grid.height() < MIN_DIMENSION {
        return Err(anyhow!(
            "Grid is {}x{}, both dimensions must be at least {}",
            grid.width(),
            grid.height(),
            MIN_DIMENSION
        ));
    }

    // the edges of the grid should all be walls, apart from the start and target
    let (w, h) = (grid.width(), grid.height());
    let open = |x: usize, y: usize| grid.at(&Point2::new(x, y)) == Some(Cell::Open);
    if (0..h).any(|y| open(0, y)) {
        return Err(anyhow!("Left edge of grid is not all walls"));
    }
    if (0..h).any(|y| open(w - 1, y)) {
        return Err(anyhow!("Right edge of grid is not all walls"));
    }
    if (0..w).any(|x| open(x, 0)) {
        return Err(anyhow!("Top edge of grid is not all walls"));
    }
    if (0..w).any(|x| open(x, h - 1)) {
        return Err(anyhow!("Bottom edge of grid is not all walls"));
    }

    let start = single(grid, Cell::Start, "start")?;
    let target = single(grid, Cell::Target, "target")?;

    Ok((start, target))
}

fn single(grid: &Grid, cell: Cell, name: &str) -> Result<Point2<usize>, Error> {
    let found = grid.find(cell);
    if found.len() != 1 {
        return Err(Error::msg(format!(
            "Expected exactly one {}, found {}",
            name,
            found.len()
        )));
    }
    let p = found[0];
    if !grid.is_border(&p) {
        return Err(Error::msg(format!(
            "The {} at ({}, {}) is not on the edge of the grid",
            name, p.x, p.y
        )));
    }
    Ok(p)
}
