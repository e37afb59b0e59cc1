//! Open the hero walk window.
//!
//! On the desktop the first argument can point to a TOML configuration file.

use hero_walk::Config;
use miette::Result;

fn main() -> Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    let config = match std::env::args_os().nth(1) {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    #[cfg(target_arch = "wasm32")]
    let config = Config::default();

    hero_walk::run(config)
}
