//! Core plugin that sets up game states, events, and the game-over policy.

use bevy::prelude::*;

use super::events::*;
use super::session::Session;
use super::states::*;
use crate::world::EncounterSettings;

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Title, InGame, GameOver)
/// - Global events (DangerHit, CautionHit, ...)
/// - The fixed-step ordering of player, enemies, and session
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app
            .init_state::<GameState>()
            .init_resource::<Session>()
            .add_event::<DangerHit>()
            .add_event::<CautionHit>()
            .add_event::<SlowRequested>()
            .add_event::<EnemySpawned>()
            .add_event::<EnemyRetired>()
            .configure_sets(
                FixedUpdate,
                (SimSet::Player, SimSet::Enemies, SimSet::Session).chain(),
            )
            // No menu yet, go straight into the encounter
            .add_systems(OnEnter(GameState::Title), start_encounter)
            .add_systems(OnEnter(GameState::InGame), reset_session)
            .add_systems(
                FixedUpdate,
                (apply_hits, track_survival).chain().in_set(SimSet::Session),
            )
            .add_systems(OnEnter(GameState::GameOver), report_run);

        for set in [SimSet::Player, SimSet::Enemies, SimSet::Session] {
            app.configure_sets(FixedUpdate, set.run_if(in_state(GameState::InGame)));
        }
    }
}

fn start_encounter(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::InGame);
}

fn reset_session(mut commands: Commands, settings: Res<EncounterSettings>) {
    commands.insert_resource(Session::new(settings.caution_limit));
}

/// Feed this tick's hits into the session, ending the run when the policy says so.
fn apply_hits(
    mut dangers: EventReader<DangerHit>,
    mut cautions: EventReader<CautionHit>,
    mut session: ResMut<Session>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let mut ended = false;
    for hit in dangers.read() {
        warn!("Danger hit by {}", hit.skill);
        ended |= session.record_danger(hit.skill);
    }
    for hit in cautions.read() {
        info!("Caution hit by {} ({}/{})", hit.skill, session.cautions + 1, session.caution_limit);
        ended |= session.record_caution(hit.skill);
    }
    if ended {
        next_state.set(GameState::GameOver);
    }
}

fn track_survival(fixed: Res<Time<Fixed>>, mut session: ResMut<Session>) {
    session.survive(fixed.timestep().as_secs_f32());
}

fn report_run(session: Res<Session>) {
    info!(
        "Game over after {:.2}s with {} caution(s): {:?}",
        session.survival, session.cautions, session.end
    );
}
