use bevy::prelude::*;
use std::thread;
use std::time::Duration;

use gridveil::coords::Tile;
use gridveil::sim::{EnemyTag, PlayerTag, Pools, Position};
use gridveil::{GameState, GenContext, SimPlugin, WorldGrid, WorldPlugin};

fn headless_app(seed: u64) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins((WorldPlugin, SimPlugin))
        .insert_resource(GenContext {
            seed,
            ..Default::default()
        });
    app
}

#[test]
fn startup_builds_a_level_and_starts_the_run() {
    let mut app = headless_app(42);
    app.update();

    let grid = app.world.resource::<WorldGrid>();
    assert!(!grid.is_empty());
    assert_eq!(*app.world.resource::<GameState>(), GameState::Playing);

    let players = app
        .world
        .query_filtered::<Entity, With<PlayerTag>>()
        .iter(&app.world)
        .count();
    assert_eq!(players, 1);
}

#[test]
fn player_start_area_is_revealed() {
    let ctx = GenContext {
        seed: 7,
        ..Default::default()
    };
    let start = ctx.player_start;
    let mut app = headless_app(0);
    app.insert_resource(ctx);
    app.update();

    let grid = app.world.resource::<WorldGrid>();
    assert!(grid.is_revealed(start));
    assert!(grid.is_revealed(Tile::new(start.x + 1, start.y)));
}

#[test]
fn enemy_on_top_of_the_player_drains_health() {
    let mut app = headless_app(31);
    app.insert_resource(GenContext {
        seed: 31,
        enemy_count: 12,
        ..Default::default()
    });
    app.update();

    let player_pos = {
        let mut query = app.world.query_filtered::<&Position, With<PlayerTag>>();
        query.single(&app.world).0
    };
    let enemies: Vec<Entity> = app
        .world
        .query_filtered::<Entity, With<EnemyTag>>()
        .iter(&app.world)
        .collect();
    assert!(!enemies.is_empty(), "level spawned no enemies");

    // Park every enemy on the player: they enter Attack and hold still,
    // which must still hurt.
    for entity in enemies {
        app.world.get_mut::<Position>(entity).unwrap().0 = player_pos;
    }

    let before = {
        let mut query = app.world.query_filtered::<&Pools, With<PlayerTag>>();
        query.single(&app.world).health.current
    };

    for _ in 0..20 {
        thread::sleep(Duration::from_millis(2));
        app.update();
    }

    let mut query = app.world.query_filtered::<&Pools, With<PlayerTag>>();
    let after = query.single(&app.world).health.current;
    assert!(after < before, "health did not drain: {after} vs {before}");
    assert!(after >= 0.0);
}

#[test]
fn oxygen_drains_while_playing() {
    let mut app = headless_app(13);
    app.update();

    let initial = {
        let mut query = app.world.query_filtered::<&Pools, With<PlayerTag>>();
        query.single(&app.world).oxygen.current
    };

    for _ in 0..20 {
        // Give the frame clock a nonzero delta.
        thread::sleep(Duration::from_millis(2));
        app.update();
    }

    let mut query = app.world.query_filtered::<&Pools, With<PlayerTag>>();
    let after = query.single(&app.world).oxygen.current;
    assert!(after < initial, "oxygen did not drain: {after} vs {initial}");
    assert!(after >= 0.0);
}
