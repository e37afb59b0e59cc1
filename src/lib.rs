#![forbid(unsafe_code)]

//! Walk a pixel-art hero around a grid with the arrow keys.
//!
//! The game is split in parts that don't know about the window:
//!
//! - [`input::InputTracker`] turns arrow key signals into a velocity.
//! - [`tick::TickSource`] fires update ticks at a fixed interval, independent of how often the window redraws.
//! - [`simulation::Simulation`] moves the hero once per tick.
//! - [`scene::SceneComposer`] draws the background and the animated hero into a pixel buffer.
//!
//! [`Game`] wires them together, [`run`] opens a window and presents the pixel buffer with integer scaling on the GPU.
//!
//! # Example
//!
//! Driving the game without a window:
//!
//! ```
//! use hero_walk::{math::Vector, Config, Game};
//! use web_time::Instant;
//!
//! # fn try_main() -> miette::Result<()> {
//! let config = Config::default();
//! let mut game = Game::from_config(&config)?;
//!
//! let start = Instant::now();
//! game.start(start);
//!
//! // Walk down for 3 ticks
//! game.key_down("ArrowDown");
//! game.update(start + config.tick_interval() * 3);
//! assert_eq!(game.position(), Vector::new(32, 35));
//!
//! // Draw it
//! let pixels = game.render(start + config.tick_interval() * 3);
//! assert_eq!(pixels.width(), 64);
//! # Ok(())
//! # }
//! # try_main().unwrap();
//! ```
//!
//! Opening a window:
//!
//! ```no_run
//! hero_walk::run(hero_walk::Config::default().with_title("My Walk")).unwrap();
//! ```

pub mod assets;
pub mod config;
pub mod game;
mod graphics;
pub mod input;
pub mod math;
pub mod scene;
pub mod simulation;
pub mod tick;
mod window;

pub use config::Config;
pub use game::Game;
use miette::Result;

/// Setup logging, open the window and run the game until it's closed.
///
/// # Arguments
///
/// * `config` - Configuration for the window and the game.
///
/// # Errors
///
/// - When the configuration is invalid.
/// - When the sprite sheet could not be loaded.
/// - When a window could not be opened.
/// - If no GPU could be found or accessed.
#[inline]
pub fn run(config: Config) -> Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        // Enable environment logger for winit
        env_logger::init();
    }
    #[cfg(target_arch = "wasm32")]
    {
        use miette::{IntoDiagnostic, WrapErr};

        // Show logs
        console_log::init_with_level(log::Level::Debug)
            .into_diagnostic()
            .wrap_err("Error setting up logger")?;

        // Show panics in the browser console log
        console_error_panic_hook::set_once();
    }

    log::info!(
        "Opening '{}' with a {}x{} grid",
        config.title,
        config.grid_width,
        config.grid_height
    );

    let game = Game::from_config(&config)?;

    window::run(config, game)
}
