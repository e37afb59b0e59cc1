//! Convert arrow key events into the velocity of the hero.

use hashbrown::HashSet;
use winit::{
    event::{ElementState, KeyEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::{config::MovementMode, math::Vector};

/// One of the four arrow key directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Direction {
    /// `ArrowUp`.
    Up,
    /// `ArrowDown`.
    Down,
    /// `ArrowLeft`.
    Left,
    /// `ArrowRight`.
    Right,
}

impl Direction {
    /// All directions.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Parse the direction from a key identifier such as `"ArrowUp"`.
    ///
    /// # Returns
    ///
    /// - `None` for any key that's not one of the four arrow keys.
    #[inline]
    #[must_use]
    pub fn from_key_name(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|direction| direction.key_name() == key)
    }

    /// Get the direction for a physical key.
    #[inline]
    #[must_use]
    pub const fn from_key_code(key_code: KeyCode) -> Option<Self> {
        match key_code {
            KeyCode::ArrowUp => Some(Self::Up),
            KeyCode::ArrowDown => Some(Self::Down),
            KeyCode::ArrowLeft => Some(Self::Left),
            KeyCode::ArrowRight => Some(Self::Right),
            _ => None,
        }
    }

    /// Key identifier of this direction.
    #[inline]
    #[must_use]
    pub const fn key_name(self) -> &'static str {
        match self {
            Self::Up => "ArrowUp",
            Self::Down => "ArrowDown",
            Self::Left => "ArrowLeft",
            Self::Right => "ArrowRight",
        }
    }

    /// Vector with a length of one pointing in this direction.
    ///
    /// Up is negative since the grid origin is the top-left.
    #[inline]
    #[must_use]
    pub const fn unit(self) -> Vector {
        match self {
            Self::Up => Vector::new(0, -1),
            Self::Down => Vector::new(0, 1),
            Self::Left => Vector::new(-1, 0),
            Self::Right => Vector::new(1, 0),
        }
    }
}

/// Tracks the arrow keys and derives a single velocity from them.
///
/// Only the arrow keys are recognized, every other key is silently ignored.
#[derive(Debug, Clone)]
pub struct InputTracker {
    /// How held keys are combined.
    mode: MovementMode,
    /// Length of the unit vectors.
    speed: i32,
    /// Velocity applied every tick.
    velocity: Vector,
    /// Arrow keys that are currently held down.
    held: HashSet<Direction>,
}

impl InputTracker {
    /// Start without any keys held and a zero velocity.
    ///
    /// # Arguments
    ///
    /// * `mode` - How multiple held keys are combined into a velocity.
    /// * `speed` - Pixels per tick for a single direction.
    #[inline]
    #[must_use]
    pub fn new(mode: MovementMode, speed: i32) -> Self {
        Self {
            mode,
            speed,
            velocity: Vector::ZERO,
            held: HashSet::new(),
        }
    }

    /// Handle a key-down signal.
    ///
    /// # Returns
    ///
    /// - Whether the key was one of the arrow keys.
    #[inline]
    pub fn key_down(&mut self, key: &str) -> bool {
        Direction::from_key_name(key).map_or(false, |direction| {
            self.press(direction);

            true
        })
    }

    /// Handle a key-up signal.
    ///
    /// # Returns
    ///
    /// - Whether the key was one of the arrow keys.
    #[inline]
    pub fn key_up(&mut self, key: &str) -> bool {
        Direction::from_key_name(key).map_or(false, |direction| {
            self.release(direction);

            true
        })
    }

    /// Handle a physical key press or release.
    ///
    /// # Returns
    ///
    /// - Whether the key was one of the arrow keys.
    #[inline]
    pub fn handle_key_code(&mut self, key_code: KeyCode, pressed: bool) -> bool {
        let Some(direction) = Direction::from_key_code(key_code) else {
            return false;
        };

        if pressed {
            self.press(direction);
        } else {
            self.release(direction);
        }

        true
    }

    /// Handle a winit keyboard event.
    ///
    /// Repeated key-down events are handled like a new press.
    #[inline]
    pub(crate) fn handle_event(&mut self, event: &KeyEvent) -> bool {
        let PhysicalKey::Code(key_code) = event.physical_key else {
            return false;
        };

        self.handle_key_code(key_code, event.state == ElementState::Pressed)
    }

    /// An arrow key got pressed.
    #[inline]
    pub fn press(&mut self, direction: Direction) {
        log::debug!("keydown {}", direction.key_name());

        self.held.insert(direction);

        self.velocity = match self.mode {
            // Override whatever we were doing
            MovementMode::LastPressed => direction.unit().scale(self.speed),
            MovementMode::HeldDirections => self.held_velocity(),
        };
    }

    /// An arrow key got released.
    #[inline]
    pub fn release(&mut self, direction: Direction) {
        log::debug!("keyup {}", direction.key_name());

        self.held.remove(&direction);

        self.velocity = match self.mode {
            // Any released arrow key stops the movement, even when it was never pressed
            MovementMode::LastPressed => Vector::ZERO,
            MovementMode::HeldDirections => self.held_velocity(),
        };
    }

    /// Forget all held keys and stop moving.
    #[inline]
    pub fn release_all(&mut self) {
        self.held.clear();
        self.velocity = Vector::ZERO;
    }

    /// Velocity to apply to the position every tick.
    #[inline]
    #[must_use]
    pub const fn velocity(&self) -> Vector {
        self.velocity
    }

    /// Whether the arrow key is currently held down.
    #[inline]
    #[must_use]
    pub fn is_held(&self, direction: Direction) -> bool {
        self.held.contains(&direction)
    }

    /// Sum of all held directions.
    fn held_velocity(&self) -> Vector {
        self.held
            .iter()
            .fold(Vector::ZERO, |sum, direction| sum.add(direction.unit()))
            .scale(self.speed)
    }
}

impl Default for InputTracker {
    #[inline]
    fn default() -> Self {
        Self::new(MovementMode::default(), 1)
    }
}

#[cfg(test)]
mod tests {
    use winit::keyboard::KeyCode;

    use super::{Direction, InputTracker};
    use crate::{config::MovementMode, math::Vector};

    #[test]
    fn starts_still() {
        assert_eq!(InputTracker::default().velocity(), Vector::ZERO);
    }

    #[test]
    fn last_pressed_overrides() {
        let mut input = InputTracker::default();

        assert!(input.key_down("ArrowUp"));
        assert_eq!(input.velocity(), Vector::new(0, -1));

        // Not a diagonal
        assert!(input.key_down("ArrowLeft"));
        assert_eq!(input.velocity(), Vector::new(-1, 0));

        assert!(input.key_down("ArrowDown"));
        assert!(input.key_down("ArrowUp"));
        assert_eq!(input.velocity(), Vector::new(0, -1));
    }

    #[test]
    fn last_pressed_release_of_any_arrow_stops() {
        let mut input = InputTracker::default();

        input.key_down("ArrowLeft");
        // Up was never pressed
        assert!(input.key_up("ArrowUp"));

        assert_eq!(input.velocity(), Vector::ZERO);
        assert!(input.is_held(Direction::Left));
    }

    #[test]
    fn held_directions_keep_moving() {
        let mut input = InputTracker::new(MovementMode::HeldDirections, 1);

        input.key_down("ArrowLeft");
        input.key_up("ArrowUp");
        assert_eq!(input.velocity(), Vector::new(-1, 0));

        input.key_down("ArrowUp");
        assert_eq!(input.velocity(), Vector::new(-1, -1));

        input.key_down("ArrowRight");
        assert_eq!(input.velocity(), Vector::new(0, -1));

        input.key_up("ArrowUp");
        input.key_up("ArrowRight");
        assert_eq!(input.velocity(), Vector::new(-1, 0));

        input.key_up("ArrowLeft");
        assert_eq!(input.velocity(), Vector::ZERO);
    }

    #[test]
    fn other_keys_are_ignored() {
        let mut input = InputTracker::default();
        input.key_down("ArrowRight");

        assert!(!input.key_down("KeyW"));
        assert!(!input.key_up("Space"));
        assert!(!input.key_down("arrowup"));
        assert!(!input.handle_key_code(KeyCode::KeyA, false));

        assert_eq!(input.velocity(), Vector::new(1, 0));
    }

    #[test]
    fn key_codes() {
        let mut input = InputTracker::default();

        assert!(input.handle_key_code(KeyCode::ArrowDown, true));
        assert_eq!(input.velocity(), Vector::new(0, 1));

        assert!(input.handle_key_code(KeyCode::ArrowRight, false));
        assert_eq!(input.velocity(), Vector::ZERO);
    }

    #[test]
    fn speed_scales_velocity() {
        let mut input = InputTracker::new(MovementMode::LastPressed, 3);
        input.press(Direction::Left);

        assert_eq!(input.velocity(), Vector::new(-3, 0));

        input.release_all();
        assert_eq!(input.velocity(), Vector::ZERO);
        assert!(!input.is_held(Direction::Left));
    }

    #[test]
    fn key_names_round_trip() {
        for direction in Direction::ALL {
            assert_eq!(
                Direction::from_key_name(direction.key_name()),
                Some(direction)
            );
        }
    }
}
