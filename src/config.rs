//! Game configuration.

use std::{path::PathBuf, time::Duration};

use glamour::Size2;
use miette::{ensure, Result, WrapErr};
use serde::Deserialize;

use crate::{
    assets::loader::{toml::TomlLoader, Loader},
    math::Vector,
};

/// Biggest allowed width or height of the grid in pixels.
pub const MAX_GRID_SIZE: u32 = 4096;

/// Biggest allowed factor between the grid and the window.
pub const MAX_SCALING: u32 = 64;

/// Longest allowed time between two update ticks in seconds.
pub const MAX_UPDATE_DELTA_TIME: f32 = 60.0;

/// Biggest allowed amount of pixels moved per tick.
pub const MAX_SPEED: i32 = 1024;

/// Initial game configuration passed to [`crate::run`].
///
/// There's two ways to initialize the config:
///
/// # Example
///
/// ```rust
/// # use hero_walk::Config;
/// Config {
///   title: "My Walk".to_owned(),
///   ..Default::default()
/// };
/// ```
///
/// # Example
///
/// ```rust
/// # use hero_walk::Config;
/// Config::default().with_title("My Walk");
/// ```
///
/// It can also be parsed from a TOML file where every field is optional:
///
/// ```rust
/// # use hero_walk::Config;
/// let config = Config::from_toml_str(r#"
/// scaling = 4
/// movement = "held-directions"
/// boundary = "wrap"
/// "#).unwrap();
///
/// assert_eq!(config.scaling, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Name in the title bar.
    ///
    /// Defaults to `"Hero Walk"`.
    pub title: String,
    /// Amount of horizontal pixels of the grid.
    ///
    /// Defaults to `64`.
    pub grid_width: u32,
    /// Amount of vertical pixels of the grid.
    ///
    /// Defaults to `64`.
    pub grid_height: u32,
    /// Integer factor applied to the grid size for the requested window size.
    ///
    /// Defaults to `10`.
    pub scaling: u32,
    /// Seconds between two update ticks.
    ///
    /// Defaults to `1/60`.
    pub update_delta_time: f32,
    /// Maximum amount of update ticks that may run for a single rendered frame.
    ///
    /// Elapsed time beyond this is dropped so a stall doesn't result in a burst of movement.
    ///
    /// Defaults to `20`.
    pub max_ticks_per_poll: u32,
    /// Amount of pixels the hero moves every tick.
    ///
    /// Defaults to `1`.
    pub speed: i32,
    /// Position of the hero when starting.
    ///
    /// Defaults to the center of the grid.
    pub start_position: Option<Vector>,
    /// How held arrow keys are converted into a velocity.
    ///
    /// Defaults to [`MovementMode::LastPressed`].
    pub movement: MovementMode,
    /// What happens when the hero reaches the edge of the grid.
    ///
    /// Defaults to [`BoundaryMode::Unbounded`].
    pub boundary: BoundaryMode,
    /// Color of the background tile filling the grid.
    ///
    /// Defaults to `0xFF5D1D45` (dark purple).
    pub background_color: u32,
    /// Color of the viewport.
    ///
    /// The viewport is the area outside of the grid when inside a bigger window.
    ///
    /// Defaults to `0xFF000000` (black).
    pub viewport_color: u32,
    /// Frames of the hero animation in the sprite sheet.
    pub animation: AnimationConfig,
    /// PNG sprite sheet on disk to use instead of the embedded one.
    ///
    /// Ignored on the web.
    pub sprite_sheet: Option<PathBuf>,
    /// Wait for the vertical blank of the monitor before presenting a frame.
    ///
    /// Defaults to `true`.
    pub vsync: bool,
}

impl Config {
    /// Parse the configuration from a TOML string.
    ///
    /// Missing fields are filled in with their defaults.
    ///
    /// # Errors
    ///
    /// - When the TOML is invalid or contains unknown fields.
    /// - When any of the values is invalid, see [`Self::validate`].
    #[inline]
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = TomlLoader::load(source.as_bytes(), "config")?;
        config.validate()?;

        Ok(config)
    }

    /// Read and parse the configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// - When the file can't be read.
    /// - When the contents can't be parsed, see [`Self::from_toml_str`].
    #[cfg(not(target_arch = "wasm32"))]
    #[inline]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        use miette::IntoDiagnostic;

        let path = path.as_ref();

        log::debug!("Loading configuration from '{}'", path.display());

        let bytes = std::fs::read(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Error reading config file '{}'", path.display()))?;

        let config: Self = TomlLoader::load(&bytes, &path.display().to_string())?;
        config.validate()?;

        Ok(config)
    }

    /// Ensure all values can be used to run the game.
    ///
    /// # Errors
    ///
    /// - When the grid has no pixels or is bigger than [`MAX_GRID_SIZE`].
    /// - When the scaling is zero or bigger than [`MAX_SCALING`].
    /// - When the speed is not in `1..=MAX_SPEED`.
    /// - When the update delta time is not positive or longer than [`MAX_UPDATE_DELTA_TIME`].
    /// - When no ticks are allowed per poll.
    /// - When the animation has no frames or an invalid frame rate.
    #[inline]
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.grid_width > 0 && self.grid_height > 0,
            "Grid size must be at least 1x1 pixels, got {}x{}",
            self.grid_width,
            self.grid_height
        );
        ensure!(
            self.grid_width <= MAX_GRID_SIZE && self.grid_height <= MAX_GRID_SIZE,
            "Grid size can't be bigger than {MAX_GRID_SIZE}x{MAX_GRID_SIZE} pixels, got {}x{}",
            self.grid_width,
            self.grid_height
        );
        ensure!(
            (1..=MAX_SCALING).contains(&self.scaling),
            "Scaling must be between 1 and {MAX_SCALING}, got {}",
            self.scaling
        );
        ensure!(
            (1..=MAX_SPEED).contains(&self.speed),
            "Speed must be between 1 and {MAX_SPEED} pixels per tick, got {}",
            self.speed
        );

        ensure!(
            self.update_delta_time <= MAX_UPDATE_DELTA_TIME
                && Duration::try_from_secs_f32(self.update_delta_time)
                    .is_ok_and(|interval| !interval.is_zero()),
            "Update delta time must be a positive amount of seconds up to {MAX_UPDATE_DELTA_TIME}, got {}",
            self.update_delta_time
        );
        ensure!(
            self.max_ticks_per_poll > 0,
            "At least a single tick must be allowed per poll"
        );
        self.animation
            .validate()
            .wrap_err("Invalid hero animation")?;

        Ok(())
    }

    /// Set the name in the title bar.
    #[inline]
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();

        self
    }

    /// Set the amount of pixels of the grid.
    #[inline]
    #[must_use]
    pub fn with_grid_size(mut self, grid_width: u32, grid_height: u32) -> Self {
        self.grid_width = grid_width;
        self.grid_height = grid_height;

        self
    }

    /// Set the integer factor applied to the grid size for the requested window size.
    #[inline]
    #[must_use]
    pub fn with_scaling(mut self, scaling: u32) -> Self {
        self.scaling = scaling;

        self
    }

    /// Set the seconds between two update ticks.
    #[inline]
    #[must_use]
    pub fn with_update_delta_time(mut self, update_delta_time: f32) -> Self {
        self.update_delta_time = update_delta_time;

        self
    }

    /// Set the maximum amount of update ticks for a single rendered frame.
    #[inline]
    #[must_use]
    pub fn with_max_ticks_per_poll(mut self, max_ticks_per_poll: u32) -> Self {
        self.max_ticks_per_poll = max_ticks_per_poll;

        self
    }

    /// Set the amount of pixels the hero moves every tick.
    #[inline]
    #[must_use]
    pub fn with_speed(mut self, speed: i32) -> Self {
        self.speed = speed;

        self
    }

    /// Set the position of the hero when starting.
    #[inline]
    #[must_use]
    pub fn with_start_position(mut self, start_position: Vector) -> Self {
        self.start_position = Some(start_position);

        self
    }

    /// Set how held arrow keys are converted into a velocity.
    #[inline]
    #[must_use]
    pub fn with_movement(mut self, movement: MovementMode) -> Self {
        self.movement = movement;

        self
    }

    /// Set what happens when the hero reaches the edge of the grid.
    #[inline]
    #[must_use]
    pub fn with_boundary(mut self, boundary: BoundaryMode) -> Self {
        self.boundary = boundary;

        self
    }

    /// Set the color of the background tile.
    #[inline]
    #[must_use]
    pub fn with_background_color(mut self, background_color: u32) -> Self {
        self.background_color = background_color;

        self
    }

    /// Set the color of the viewport.
    ///
    /// The viewport is the area outside of the grid when inside a bigger window.
    #[inline]
    #[must_use]
    pub fn with_viewport_color(mut self, viewport_color: u32) -> Self {
        self.viewport_color = viewport_color;

        self
    }

    /// Set the frames of the hero animation.
    #[inline]
    #[must_use]
    pub fn with_animation(mut self, animation: AnimationConfig) -> Self {
        self.animation = animation;

        self
    }

    /// Load the sprite sheet from disk instead of using the embedded one.
    #[inline]
    #[must_use]
    pub fn with_sprite_sheet(mut self, sprite_sheet: impl Into<PathBuf>) -> Self {
        self.sprite_sheet = Some(sprite_sheet.into());

        self
    }

    /// Set whether to wait for the vertical blank before presenting a frame.
    #[inline]
    #[must_use]
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;

        self
    }

    /// Duration of a single update tick.
    #[inline]
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f32(self.update_delta_time)
    }

    /// Size of the grid in pixels.
    #[inline]
    #[must_use]
    pub fn buffer_size(&self) -> Size2<u32> {
        Size2::new(self.grid_width, self.grid_height)
    }

    /// Requested size of the window in logical pixels, the grid multiplied by the scaling.
    #[inline]
    #[must_use]
    pub fn window_size(&self) -> Size2<u32> {
        Size2::new(
            self.grid_width.saturating_mul(self.scaling),
            self.grid_height.saturating_mul(self.scaling),
        )
    }

    /// Position the hero starts at, the center of the grid when not set.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn start_position(&self) -> Vector {
        self.start_position.unwrap_or_else(|| {
            Vector::new(self.grid_width as i32 / 2, self.grid_height as i32 / 2)
        })
    }
}

impl Default for Config {
    #[inline]
    fn default() -> Self {
        Self {
            title: "Hero Walk".to_owned(),
            grid_width: 64,
            grid_height: 64,
            scaling: 10,
            update_delta_time: 1.0 / 60.0,
            max_ticks_per_poll: 20,
            speed: 1,
            start_position: None,
            movement: MovementMode::default(),
            boundary: BoundaryMode::default(),
            background_color: 0xFF5D_1D45,
            viewport_color: 0xFF00_0000,
            animation: AnimationConfig::default(),
            sprite_sheet: None,
            vsync: true,
        }
    }
}

/// How held arrow keys are converted into a single velocity.
///
/// Defaults to [`MovementMode::LastPressed`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum MovementMode {
    /// The last pressed arrow key decides the direction.
    ///
    /// Releasing _any_ arrow key stops the hero, even when another arrow key is still held.
    #[default]
    LastPressed,
    /// All held arrow keys are summed into the direction.
    ///
    /// Opposite keys cancel each other out, perpendicular keys move diagonally.
    /// Releasing a key only removes that key's direction.
    HeldDirections,
}

/// What happens to the hero when moving past the edge of the grid.
///
/// Defaults to [`BoundaryMode::Unbounded`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum BoundaryMode {
    /// Walk off the grid indefinitely.
    #[default]
    Unbounded,
    /// Stop at the last pixel on the edge.
    Clamp,
    /// Reappear on the opposite side.
    Wrap,
}

/// Animation of the hero, a sequence of frames in the sprite sheet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationConfig {
    /// Rectangles in the sprite sheet, shown in order.
    ///
    /// Defaults to the three 10x20 "standing" frames.
    pub frames: Vec<FrameRect>,
    /// Frames shown per second, independent of the update tick rate.
    ///
    /// Defaults to `7`.
    pub frame_rate: f32,
}

impl AnimationConfig {
    /// Ensure the animation can be played.
    ///
    /// # Errors
    ///
    /// - When there are no frames.
    /// - When any frame has no pixels.
    /// - When the frame rate is not positive.
    #[inline]
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.frames.is_empty(), "Animation needs at least one frame");
        ensure!(
            self.frames
                .iter()
                .all(|frame| frame.width > 0 && frame.height > 0),
            "Animation frames must be at least 1x1 pixels"
        );
        ensure!(
            self.frame_rate.is_finite() && self.frame_rate > 0.0,
            "Animation frame rate must be positive, got {}",
            self.frame_rate
        );

        Ok(())
    }
}

impl Default for AnimationConfig {
    #[inline]
    fn default() -> Self {
        Self {
            frames: vec![
                FrameRect::new(3, 32, 10, 20),
                FrameRect::new(13, 32, 10, 20),
                FrameRect::new(23, 32, 10, 20),
            ],
            frame_rate: 7.0,
        }
    }
}

/// Sub rectangle of a sprite sheet.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrameRect {
    /// Horizontal offset from the left of the sheet.
    pub x: u32,
    /// Vertical offset from the top of the sheet.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameRect {
    /// Construct a new frame rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use glamour::Size2;

    use super::{
        BoundaryMode, Config, FrameRect, MovementMode, MAX_GRID_SIZE, MAX_SCALING, MAX_SPEED,
        MAX_UPDATE_DELTA_TIME,
    };
    use crate::math::Vector;

    #[test]
    fn defaults_match_the_demo() {
        let config = Config::default();

        assert_eq!(config.start_position(), Vector::new(32, 32));
        assert_eq!(config.grid_width * config.scaling, 640);
        assert_eq!(config.animation.frames[2], FrameRect::new(23, 32, 10, 20));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_partial_toml() {
        let config = Config::from_toml_str(
            r#"
            title = "Walk"
            grid_width = 32
            movement = "held-directions"
            boundary = "clamp"
            background_color = 0xFF112233
            start_position = { x = 1, y = 2 }

            [animation]
            frame_rate = 12.0
            "#,
        )
        .unwrap();

        assert_eq!(config.title, "Walk");
        assert_eq!(config.grid_width, 32);
        assert_eq!(config.grid_height, 64);
        assert_eq!(config.movement, MovementMode::HeldDirections);
        assert_eq!(config.boundary, BoundaryMode::Clamp);
        assert_eq!(config.background_color, 0xFF11_2233);
        assert_eq!(config.start_position(), Vector::new(1, 2));
        assert_eq!(config.animation.frames.len(), 3);
    }

    #[test]
    fn reject_unknown_fields() {
        assert!(Config::from_toml_str("not_a_field = 1").is_err());
    }

    #[test]
    fn reject_invalid_values() {
        assert!(Config::from_toml_str("scaling = 0").is_err());
        assert!(Config::from_toml_str("update_delta_time = 0.0").is_err());
        assert!(Config::from_toml_str("grid_height = 0").is_err());
        assert!(Config::from_toml_str("[animation]\nframes = []").is_err());
        assert!(Config::default()
            .with_max_ticks_per_poll(0)
            .validate()
            .is_err());
    }

    #[test]
    fn reject_out_of_range_values() {
        assert!(Config::from_toml_str("speed = 0").is_err());
        assert!(Config::from_toml_str("speed = -3").is_err());
        assert!(Config::from_toml_str("speed = 2147483647").is_err());
        assert!(Config::from_toml_str("scaling = 4294967295").is_err());
        assert!(Config::from_toml_str("grid_width = 3000000000").is_err());
        assert!(Config::from_toml_str("update_delta_time = 1e18").is_err());
        assert!(Config::from_toml_str("update_delta_time = -1.0").is_err());
        assert!(Config::from_toml_str("update_delta_time = 61.0").is_err());
        assert!(Config::from_toml_str("update_delta_time = nan").is_err());
    }

    #[test]
    fn accept_upper_bounds() {
        let config = Config::default()
            .with_grid_size(MAX_GRID_SIZE, MAX_GRID_SIZE)
            .with_scaling(MAX_SCALING)
            .with_speed(MAX_SPEED)
            .with_update_delta_time(MAX_UPDATE_DELTA_TIME)
            .with_max_ticks_per_poll(u32::MAX);

        assert!(config.validate().is_ok());
        assert_eq!(
            config.window_size(),
            Size2::new(MAX_GRID_SIZE * MAX_SCALING, MAX_GRID_SIZE * MAX_SCALING)
        );
    }
}
