//! Options for maze generation

use serde::{Deserialize, Serialize};

use crate::error::{check_dimensions, MazeError};

/// Width used when nothing else is configured
pub const DEFAULT_WIDTH: usize = 10;
/// Height used when nothing else is configured
pub const DEFAULT_HEIGHT: usize = 20;
/// Percentage of the interior that is nominally filled with walls
pub const DEFAULT_FILL_PERCENT: u8 = 20;

/// Rarely changed options for the maze generator
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct MazeSettings {
    /// Number of columns, including the border
    pub width: usize,
    /// Number of rows, including the border
    pub height: usize,
    /// Nominal interior wall density, `0..=100`
    pub fill_percent: u8,
    /// Seed for a reproducible maze; the thread RNG is used when `None`
    pub seed: Option<u64>,
}

impl Default for MazeSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fill_percent: DEFAULT_FILL_PERCENT,
            seed: None,
        }
    }
}

impl MazeSettings {
    /// Default settings with the given dimensions
    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Check that these settings describe a maze that can be generated
    pub fn validate(&self) -> Result<(), MazeError> {
        check_dimensions(self.width, self.height)?;
        if self.fill_percent > 100 {
            return Err(MazeError::InvalidFillPercent(self.fill_percent));
        }
        Ok(())
    }

    /// The most interior walls a maze generated with these settings can have.
    ///
    /// ```
    /// use sparse_maze::settings::MazeSettings;
    ///
    /// // (10 - 2) * (20 - 2) * 20 / 100 = 28.8
    /// assert_eq!(MazeSettings::default().wall_budget(), 28);
    /// assert_eq!(MazeSettings::with_size(4, 4).wall_budget(), 0);
    /// ```
    pub fn wall_budget(&self) -> usize {
        wall_budget(self.width, self.height, self.fill_percent)
    }
}

/// `floor((width - 2) * (height - 2) * fill_percent / 100)`
pub(crate) fn wall_budget(width: usize, height: usize, fill_percent: u8) -> usize {
    width.saturating_sub(2) * height.saturating_sub(2) * usize::from(fill_percent) / 100
}
