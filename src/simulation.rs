//! Position of the hero, advanced once per update tick.

use crate::{config::BoundaryMode, input::InputTracker, math::Vector};

/// State mutated by the update ticks.
#[derive(Debug, Clone)]
pub struct Simulation {
    /// Amount of times [`Self::advance`] got called.
    tick: u64,
    /// Current position of the hero.
    position: Vector,
    /// Width and height of the grid, used for the boundary.
    grid_size: (i32, i32),
    /// What to do when leaving the grid.
    boundary: BoundaryMode,
}

impl Simulation {
    /// Start at a position without any ticks.
    ///
    /// # Arguments
    ///
    /// * `position` - Starting position.
    /// * `grid_size` - Width and height of the visible grid.
    /// * `boundary` - What to do when the position leaves the grid.
    #[inline]
    #[must_use]
    pub const fn new(position: Vector, grid_size: (i32, i32), boundary: BoundaryMode) -> Self {
        Self {
            tick: 0,
            position,
            grid_size,
            boundary,
        }
    }

    /// Move the position by the current velocity of the input.
    ///
    /// Must be called exactly once for every fired tick.
    #[inline]
    pub fn advance(&mut self, input: &InputTracker) {
        // Walking off the grid for a long time can't overflow
        let position = self.position.saturating_add(input.velocity());

        self.position = self.apply_boundary(position);
        self.tick += 1;
    }

    /// Current position of the hero.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Vector {
        self.position
    }

    /// Amount of ticks processed.
    #[inline]
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Keep the position on the grid if required.
    fn apply_boundary(&self, position: Vector) -> Vector {
        let (width, height) = self.grid_size;

        match self.boundary {
            BoundaryMode::Unbounded => position,
            BoundaryMode::Clamp => Vector::new(
                position.x.clamp(0, width - 1),
                position.y.clamp(0, height - 1),
            ),
            BoundaryMode::Wrap => Vector::new(position.x.rem_euclid(width), position.y.rem_euclid(height)),
        }
    }
}
