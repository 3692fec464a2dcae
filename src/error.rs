//! Errors raised while setting up or generating a [`Maze`](crate::generator::Maze)

use thiserror::Error;

/// The smallest width or height a maze can have.
///
/// Anything smaller leaves no interior and no room to place the start and target.
pub const MIN_DIMENSION: usize = 4;

/// Error returned by maze generation.
#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
pub enum MazeError {
    /// Width or height is below [`MIN_DIMENSION`]
    #[error(
        "Maze dimensions {width}x{height} are too small, both must be at least {min}",
        min = MIN_DIMENSION
    )]
    InvalidDimension {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
    },

    /// Fill percent outside of `0..=100`
    #[error("Fill percent {0} is not within 0..=100")]
    InvalidFillPercent(u8),
}

/// Checks that a `width` x `height` maze has room for a border and an interior.
///
/// ```
/// use sparse_maze::error::{check_dimensions, MazeError};
///
/// assert!(check_dimensions(4, 4).is_ok());
/// assert_eq!(
///     check_dimensions(3, 10),
///     Err(MazeError::InvalidDimension { width: 3, height: 10 })
/// );
/// ```
pub fn check_dimensions(width: usize, height: usize) -> Result<(), MazeError> {
    if width < MIN_DIMENSION || height < MIN_DIMENSION {
        return Err(MazeError::InvalidDimension { width, height });
    }
    Ok(())
}
