use std::path::Path;
use std::time::Duration;

use bevy::app::{AppExit, ScheduleRunnerPlugin};
use bevy::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gridveil::persist;
use gridveil::sim::{Action, Cargo, InputState, PlayerTag};
use gridveil::{GameState, GenContext, SimPlugin, WorldPlugin};

const PROFILE_PATH: &str = "gridveil_profile.json";
const TICK: f64 = 1.0 / 60.0;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let seed = fastrand::u64(..);
    info!(seed, "starting headless run");

    App::new()
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(TICK))),
        )
        .add_plugins((WorldPlugin, SimPlugin))
        .insert_resource(GenContext {
            seed,
            ..Default::default()
        })
        .init_resource::<Autopilot>()
        .add_systems(Update, (autopilot_input, watch_game_state))
        .run();
}

/// Scripted input so the headless demo exercises movement, drilling, vision
/// and pool drain without a real keyboard.
#[derive(Resource, Default)]
struct Autopilot {
    retarget_in: f32,
}

fn autopilot_input(
    state: Res<GameState>,
    time: Res<Time>,
    mut autopilot: ResMut<Autopilot>,
    mut input: ResMut<InputState>,
) {
    if *state != GameState::Playing {
        return;
    }
    autopilot.retarget_in -= time.delta_seconds();
    if autopilot.retarget_in > 0.0 {
        return;
    }
    autopilot.retarget_in = 1.0 + fastrand::f32() * 1.5;

    input.clear();
    match fastrand::u8(0..4) {
        0 => input.press(Action::MoveUp),
        1 => input.press(Action::MoveDown),
        2 => input.press(Action::MoveLeft),
        _ => input.press(Action::MoveRight),
    }
    if fastrand::bool() {
        match fastrand::u8(0..4) {
            0 => input.press(Action::MoveUp),
            1 => input.press(Action::MoveDown),
            2 => input.press(Action::MoveLeft),
            _ => input.press(Action::MoveRight),
        }
    }
    if fastrand::f32() < 0.4 {
        input.press(Action::Drill);
    }
    if fastrand::f32() < 0.2 {
        input.press(Action::Light);
    }
}

/// Log state transitions; on a terminal state, persist the profile and exit.
fn watch_game_state(
    state: Res<GameState>,
    mut previous: Local<GameState>,
    cargo_query: Query<&Cargo, With<PlayerTag>>,
    mut exit: EventWriter<AppExit>,
) {
    if *state == *previous {
        return;
    }
    info!(from = ?*previous, to = ?*state, "game state changed");
    *previous = *state;

    let terminal = matches!(*state, GameState::GameOver | GameState::Victory);
    if !terminal {
        return;
    }

    let score = cargo_query
        .get_single()
        .map(|cargo| cargo.total_value)
        .unwrap_or(0);
    let path = Path::new(PROFILE_PATH);
    let mut profile = persist::load_or_default(path);
    profile.record_run(*state == GameState::Victory, score);
    if let Err(err) = persist::save(path, &profile) {
        // Persistence failure never interrupts shutdown.
        warn!(%err, "could not save profile");
    } else {
        info!(
            score,
            high_score = profile.high_score,
            games_played = profile.games_played,
            "profile saved"
        );
    }
    exit.send(AppExit);
}
