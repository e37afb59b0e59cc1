//! Drive the game without a window, moving the hero with key signals and elapsed time.

use hero_walk::{
    config::{BoundaryMode, MovementMode},
    math::Vector,
    Config, Game,
};
use web_time::Instant;

/// Game that's started at the returned moment.
fn game(config: &Config) -> (Game, Instant) {
    let mut game = Game::from_config(config).unwrap();
    let start = Instant::now();
    game.start(start);

    (game, start)
}

#[test]
fn walk_right_and_stop() {
    let config = Config::default();
    let (mut game, start) = game(&config);
    let interval = config.tick_interval();
    assert_eq!(game.position(), Vector::new(32, 32));

    game.key_down("ArrowRight");
    assert_eq!(game.update(start + interval * 5), 5);
    assert_eq!(game.position(), Vector::new(37, 32));

    game.key_up("ArrowRight");
    assert_eq!(game.update(start + interval * 10), 5);
    assert_eq!(game.position(), Vector::new(37, 32));
    assert_eq!(game.tick(), 10);
}

#[test]
fn last_pressed_direction_wins() {
    let config = Config::default();
    let (mut game, start) = game(&config);

    game.key_down("ArrowDown");
    game.key_down("ArrowUp");
    assert_eq!(game.velocity(), Vector::new(0, -1));

    game.update(start + config.tick_interval() * 3);
    assert_eq!(game.position(), Vector::new(32, 29));
}

#[test]
fn pressing_another_direction_overrides() {
    let config = Config::default();
    let (mut game, _start) = game(&config);

    game.key_down("ArrowUp");
    game.key_down("ArrowLeft");

    assert_eq!(game.velocity(), Vector::new(-1, 0));
}

#[test]
fn releasing_any_arrow_stops() {
    let config = Config::default();
    let (mut game, start) = game(&config);

    game.key_down("ArrowLeft");
    game.key_up("ArrowUp");
    assert_eq!(game.velocity(), Vector::ZERO);

    game.update(start + config.tick_interval() * 4);
    assert_eq!(game.position(), Vector::new(32, 32));
}

#[test]
fn held_directions_keep_moving() {
    let config = Config::default().with_movement(MovementMode::HeldDirections);
    let (mut game, start) = game(&config);

    game.key_down("ArrowLeft");
    game.key_up("ArrowUp");
    assert_eq!(game.velocity(), Vector::new(-1, 0));

    game.key_down("ArrowDown");
    game.update(start + config.tick_interval() * 2);
    assert_eq!(game.position(), Vector::new(30, 34));
}

#[test]
fn other_keys_are_ignored() {
    let config = Config::default();
    let (mut game, start) = game(&config);

    assert!(!game.key_down("a"));
    assert!(!game.key_down("Enter"));
    assert!(!game.key_up("Escape"));

    game.update(start + config.tick_interval() * 3);
    assert_eq!(game.position(), Vector::new(32, 32));
}

#[test]
fn rendering_never_advances_ticks() {
    let config = Config::default();
    let interval = config.tick_interval();

    // One game renders ten times per tick, the other doesn't render at all
    let start = Instant::now();
    let mut rendered = Game::from_config(&config).unwrap();
    let mut unrendered = Game::from_config(&config).unwrap();
    for game in [&mut rendered, &mut unrendered] {
        game.start(start);
        game.key_down("ArrowDown");
    }

    for frame in 1..=8 {
        let now = start + interval * frame;

        rendered.update(now);
        for _ in 0..10 {
            rendered.render(now);
        }
    }
    unrendered.update(start + interval * 8);

    assert_eq!(rendered.tick(), 8);
    assert_eq!(rendered.tick(), unrendered.tick());
    assert_eq!(rendered.position(), unrendered.position());
}

#[test]
fn stopped_game_stays_still() {
    let config = Config::default();
    let (mut game, start) = game(&config);

    game.key_down("ArrowRight");
    game.stop();
    assert!(!game.is_running());

    assert_eq!(game.update(start + config.tick_interval() * 5), 0);
    assert_eq!(game.position(), Vector::new(32, 32));
}

#[test]
fn clamped_to_the_grid() {
    let config = Config::default()
        .with_boundary(BoundaryMode::Clamp)
        .with_speed(4);
    let (mut game, start) = game(&config);
    let interval = config.tick_interval();

    game.key_down("ArrowLeft");
    for frame in 1..=20 {
        game.update(start + interval * frame);
    }

    assert_eq!(game.position(), Vector::new(0, 32));
}

#[test]
fn configured_from_toml() {
    let config = Config::from_toml_str(
        r"
        speed = 2
        start_position = { x = 10, y = 20 }
        movement = 'held-directions'
        ",
    )
    .unwrap();
    let (mut game, start) = game(&config);

    game.key_down("ArrowRight");
    game.update(start + config.tick_interval() * 3);

    assert_eq!(game.position(), Vector::new(16, 20));
}

#[test]
fn fastest_speed_keeps_walking() {
    let config = Config::default().with_speed(hero_walk::config::MAX_SPEED);
    let (mut game, start) = game(&config);
    let interval = config.tick_interval();

    game.key_down("ArrowRight");
    for frame in 1..=60 {
        game.update(start + interval * frame);
    }

    assert_eq!(game.position(), Vector::new(32 + 60 * 1024, 32));
}

#[test]
fn overflowing_config_is_rejected() {
    for toml in [
        "speed = 2147483647",
        "update_delta_time = 1e18",
        "scaling = 4294967295",
        "grid_width = 4294967295",
    ] {
        assert!(Config::from_toml_str(toml).is_err(), "{toml} was accepted");
    }
}
