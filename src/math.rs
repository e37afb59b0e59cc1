//! Integer vector math on the pixel grid.

use std::ops::{Add, Mul};

use serde::Deserialize;

/// Immutable 2D integer vector.
///
/// Used for both the position on the grid and the velocity applied every tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct Vector {
    /// Horizontal component, positive is right.
    pub x: i32,
    /// Vertical component, positive is down.
    pub y: i32,
}

#[allow(clippy::same_name_method)]
impl Vector {
    /// Vector without any magnitude.
    pub const ZERO: Self = Self::new(0, 0);

    /// Construct a new vector.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Add another vector, returning the result as a new vector.
    ///
    /// # Arguments
    ///
    /// * `other` - Vector to add to this one.
    ///
    /// # Example
    ///
    /// ```
    /// use hero_walk::math::Vector;
    ///
    /// assert_eq!(Vector::new(32, 32).add(Vector::new(1, 0)), Vector::new(33, 32));
    /// ```
    #[inline]
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub const fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    /// Add both components, staying at the numeric bounds instead of overflowing.
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self::new(self.x.saturating_add(other.x), self.y.saturating_add(other.y))
    }

    /// Multiply both components with the same factor.
    #[inline]
    #[must_use]
    pub const fn scale(self, factor: i32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Whether both components are zero.
    #[inline]
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.x == 0 && self.y == 0
    }
}

impl Add for Vector {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self::add(self, rhs)
    }
}

impl Mul<i32> for Vector {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: i32) -> Self::Output {
        self.scale(rhs)
    }
}

impl From<(i32, i32)> for Vector {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::Vector;

    #[test]
    fn add_returns_new_vector() {
        let position = Vector::new(32, 32);
        let moved = position.add(Vector::new(0, -1));

        assert_eq!(moved, Vector::new(32, 31));

        // Operands are untouched
        assert_eq!(position, Vector::new(32, 32));
    }

    #[test]
    fn saturating_add_stays_at_bounds() {
        assert_eq!(
            Vector::new(i32::MAX, i32::MIN).saturating_add(Vector::new(1, -1)),
            Vector::new(i32::MAX, i32::MIN)
        );
        assert_eq!(
            Vector::new(3, 4).saturating_add(Vector::new(1, -1)),
            Vector::new(4, 3)
        );
    }

    #[test]
    fn repeated_add_equals_scaled() {
        let velocity = Vector::new(-1, 0);
        let mut position = Vector::new(10, 4);
        for _ in 0..7 {
            position = position + velocity;
        }

        assert_eq!(position, Vector::new(10, 4) + velocity * 7);
    }
}
