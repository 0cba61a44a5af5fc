//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` + `StatesPlugin` provide the ECS runtime and states.
//! - `DodgePlugin` installs gameplay.
//! - Tests drive `FixedUpdate` by hand so every run is one exact tick apart.

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use dodgetia::core::{CautionHit, DangerHit, EnemyRetired, EnemySpawned, GameState, SimSet};
use dodgetia::world::EncounterSettings;

/// Everything the enemies reported, in order.
#[derive(Resource, Default)]
pub struct Seen {
    pub spawned: Vec<EnemySpawned>,
    pub retired: Vec<EnemyRetired>,
    pub dangers: Vec<&'static str>,
    pub cautions: Vec<&'static str>,
}

fn record(
    mut seen: ResMut<Seen>,
    mut spawned: EventReader<EnemySpawned>,
    mut retired: EventReader<EnemyRetired>,
    mut dangers: EventReader<DangerHit>,
    mut cautions: EventReader<CautionHit>,
) {
    seen.spawned.extend(spawned.read().copied());
    seen.retired.extend(retired.read().cloned());
    seen.dangers.extend(dangers.read().map(|h| h.skill));
    seen.cautions.extend(cautions.read().map(|h| h.skill));
}

/// Headless app already in `InGame`, with the player and director in place.
pub fn app_headless(settings: EncounterSettings) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin))
        .insert_resource(settings)
        .add_plugins(dodgetia::DodgePlugin)
        .init_resource::<Seen>()
        .add_systems(
            FixedUpdate,
            record.after(SimSet::Enemies).before(SimSet::Session),
        );

    // Startup, then Title hands over to InGame
    app.update();
    assert_eq!(state(&app), GameState::InGame);
    app
}

pub fn settings(allowed: &[&str], seed: u64) -> EncounterSettings {
    EncounterSettings {
        allowed: allowed.iter().map(|s| s.to_string()).collect(),
        seed: Some(seed),
        ..Default::default()
    }
}

pub fn fixed_ticks(app: &mut App, n: usize) {
    for _ in 0..n {
        app.world_mut().run_schedule(FixedUpdate);
    }
}

pub fn apply_state_transitions(app: &mut App) {
    app.world_mut().run_schedule(StateTransition);
}

pub fn state(app: &App) -> GameState {
    *app.world().resource::<State<GameState>>().get()
}
