//! Wire the input, the tick source, the simulation and the scene together.

use imgref::ImgRef;
use miette::{Result, WrapErr};
use web_time::Instant;
use winit::{event::KeyEvent, keyboard::KeyCode};

use crate::{
    assets::SpriteSheet,
    config::Config,
    input::InputTracker,
    math::Vector,
    scene::SceneComposer,
    simulation::Simulation,
    tick::TickSource,
};

/// Complete game state, independent of any window or GPU.
///
/// The window drives it by forwarding keyboard events, calling [`Self::update`] and [`Self::render`] on every redraw.
///
/// # Example
///
/// ```
/// use hero_walk::{Config, Game};
/// use web_time::Instant;
///
/// let config = Config::default();
/// let mut game = Game::from_config(&config).unwrap();
///
/// let start = Instant::now();
/// game.start(start);
/// game.key_down("ArrowRight");
/// game.update(start + config.tick_interval() * 5);
///
/// assert_eq!(game.position(), hero_walk::math::Vector::new(37, 32));
/// ```
#[derive(Debug, Clone)]
pub struct Game {
    /// Arrow key state.
    input: InputTracker,
    /// Position of the hero.
    simulation: Simulation,
    /// Fixed interval update ticks.
    ticks: TickSource,
    /// Draws the frames.
    scene: SceneComposer,
    /// Moment the game got started, drives the sprite animation.
    started_at: Option<Instant>,
}

impl Game {
    /// Setup the game with a sprite sheet.
    ///
    /// The game must be started with [`Self::start`] before any tick is fired.
    ///
    /// # Errors
    ///
    /// - When the configuration is invalid.
    /// - When the animation frames don't fit in the sprite sheet.
    #[inline]
    #[allow(clippy::cast_possible_wrap)]
    pub fn new(config: &Config, sprite_sheet: SpriteSheet) -> Result<Self> {
        config.validate()?;

        let input = InputTracker::new(config.movement, config.speed);
        let simulation = Simulation::new(
            config.start_position(),
            (config.grid_width as i32, config.grid_height as i32),
            config.boundary,
        );
        let ticks = TickSource::new(config.tick_interval(), config.max_ticks_per_poll);
        let scene = SceneComposer::new(
            config.grid_width as usize,
            config.grid_height as usize,
            config.background_color,
            sprite_sheet,
            config.animation.clone(),
        )?;

        Ok(Self {
            input,
            simulation,
            ticks,
            scene,
            started_at: None,
        })
    }

    /// Setup the game with the sprite sheet from the configuration, or the embedded one.
    ///
    /// # Errors
    ///
    /// - When the sprite sheet can't be loaded.
    /// - When [`Self::new`] fails.
    #[inline]
    pub fn from_config(config: &Config) -> Result<Self> {
        #[cfg(not(target_arch = "wasm32"))]
        let sprite_sheet = match &config.sprite_sheet {
            Some(path) => SpriteSheet::load(path)?,
            None => SpriteSheet::embedded()?,
        };
        #[cfg(target_arch = "wasm32")]
        let sprite_sheet = SpriteSheet::embedded()?;

        Self::new(config, sprite_sheet).wrap_err("Error setting up game state")
    }

    /// Start firing update ticks.
    #[inline]
    pub fn start(&mut self, now: Instant) {
        self.started_at.get_or_insert(now);
        self.ticks.start(now);
    }

    /// Stop firing update ticks, [`Self::update`] won't move the hero anymore after this.
    #[inline]
    pub fn stop(&mut self) {
        self.ticks.stop();
    }

    /// Whether update ticks are firing.
    #[inline]
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.ticks.is_running()
    }

    /// Handle a key-down signal with a key identifier such as `"ArrowUp"`.
    ///
    /// # Returns
    ///
    /// - Whether the key changed the movement.
    #[inline]
    pub fn key_down(&mut self, key: &str) -> bool {
        self.input.key_down(key)
    }

    /// Handle a key-up signal with a key identifier such as `"ArrowUp"`.
    ///
    /// # Returns
    ///
    /// - Whether the key changed the movement.
    #[inline]
    pub fn key_up(&mut self, key: &str) -> bool {
        self.input.key_up(key)
    }

    /// Handle a physical key being pressed or released.
    ///
    /// # Returns
    ///
    /// - Whether the key changed the movement.
    #[inline]
    pub fn handle_key_code(&mut self, code: KeyCode, pressed: bool) -> bool {
        self.input.handle_key_code(code, pressed)
    }

    /// Handle a keyboard event from the window.
    #[inline]
    pub(crate) fn handle_key_event(&mut self, event: &KeyEvent) -> bool {
        self.input.handle_event(event)
    }

    /// Advance the simulation once for every tick due at `now`.
    ///
    /// # Returns
    ///
    /// - Amount of ticks that fired.
    #[inline]
    pub fn update(&mut self, now: Instant) -> u32 {
        profiling::scope!("Update");

        let Self {
            input,
            simulation,
            ticks,
            ..
        } = self;

        ticks.run_due(now, |_tick| simulation.advance(input))
    }

    /// Draw the current state, doesn't advance the simulation.
    #[inline]
    pub fn render(&mut self, now: Instant) -> ImgRef<'_, [u8; 4]> {
        let elapsed = self
            .started_at
            .map(|started_at| now.saturating_duration_since(started_at))
            .unwrap_or_default();

        self.scene.compose(self.simulation.position(), elapsed)
    }

    /// Current position of the hero.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Vector {
        self.simulation.position()
    }

    /// Current velocity of the hero.
    #[inline]
    #[must_use]
    pub const fn velocity(&self) -> Vector {
        self.input.velocity()
    }

    /// Amount of update ticks processed.
    #[inline]
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.simulation.tick()
    }
}
