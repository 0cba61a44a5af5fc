//! Dodgetia - headless entry point.
//!
//! Runs one encounter against a scripted wandering player at the fixed
//! simulation rate and exits when the run ends. Settings come from
//! `assets/data/encounter.ron`.

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use dodgetia::core::{GameState, Session};
use dodgetia::enemies::SIMULATION_HZ;

fn main() -> AppExit {
    App::new()
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
            1.0 / SIMULATION_HZ,
        ))))
        .add_plugins((LogPlugin::default(), StatesPlugin))
        .add_plugins(dodgetia::DodgePlugin)
        .add_systems(OnEnter(GameState::GameOver), exit_with_survival)
        .run()
}

fn exit_with_survival(session: Res<Session>, mut exit: EventWriter<AppExit>) {
    info!("Survived {:.2}s", session.survival);
    exit.send(AppExit::Success);
}
