//! Enemy plugin - runs the director on the fixed tick and mirrors the live
//! enemy into the ECS.

use bevy::prelude::*;

use super::components::*;
use super::data::{load_enemy_tunings, TuningRegistry};
use super::lifecycle::{EnemyDirector, TickReport};
use super::skills::{Outcome, Severity};
use crate::core::{CautionHit, DangerHit, EnemyRetired, EnemySpawned, GameState, Session, SimSet, SlowRequested};
use crate::geometry::Circle;
use crate::player::Player;
use crate::world::EncounterSettings;

/// Fixed simulation rate.
pub const SIMULATION_HZ: f64 = 120.0;

/// The running encounter.
#[derive(Resource)]
pub struct Encounter {
    pub director: EnemyDirector,
}

/// Enemy plugin - handles tuning data, the director tick, and the ECS mirror.
pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app
            .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
            .init_resource::<TuningRegistry>()
            .add_systems(Startup, load_enemy_tunings)
            .add_systems(OnEnter(GameState::InGame), start_encounter)
            .add_systems(
                FixedUpdate,
                (tick_encounter, sync_enemy_mirror)
                    .chain()
                    .in_set(SimSet::Enemies),
            );
    }
}

/// Build a fresh director from the loaded settings. Bad settings end the run
/// before it starts.
fn start_encounter(
    mut commands: Commands,
    settings: Res<EncounterSettings>,
    tunings: Res<TuningRegistry>,
    mirrors: Query<Entity, With<Enemy>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for entity in &mirrors {
        commands.entity(entity).despawn();
    }
    match EnemyDirector::from_settings(&settings, tunings.clone()) {
        Ok(director) => {
            info!(
                "Encounter started with {} archetype(s) in a {}x{} arena",
                director.roster().len(),
                settings.arena.width,
                settings.arena.height
            );
            commands.insert_resource(Encounter { director });
        }
        Err(e) => {
            error!("Cannot start encounter: {}", e);
            commands.remove_resource::<Encounter>();
            next_state.set(GameState::GameOver);
        }
    }
}

/// Advance the director one fixed step against the player's current position.
fn tick_encounter(
    mut commands: Commands,
    fixed: Res<Time<Fixed>>,
    encounter: Option<ResMut<Encounter>>,
    session: Res<Session>,
    players: Query<(&Transform, &Player)>,
    mirrors: Query<(Entity, &Enemy)>,
    mut dangers: EventWriter<DangerHit>,
    mut cautions: EventWriter<CautionHit>,
    mut slows: EventWriter<SlowRequested>,
    mut spawned: EventWriter<EnemySpawned>,
    mut retired: EventWriter<EnemyRetired>,
) {
    let Some(mut encounter) = encounter else {
        return;
    };
    let Ok((transform, player)) = players.get_single() else {
        return;
    };

    let view = Circle::new(transform.translation.truncate(), player.radius);
    let dt = fixed.timestep().as_secs_f32();
    let report: TickReport = encounter.director.tick(dt, view, !session.is_over());

    for outcome in report.outcomes {
        match outcome {
            Outcome::Hit {
                severity: Severity::Danger,
                skill,
            } => {
                dangers.send(DangerHit { skill });
            }
            Outcome::Hit {
                severity: Severity::Caution,
                skill,
            } => {
                cautions.send(CautionHit { skill });
            }
            Outcome::Slow { factor, seconds } => {
                slows.send(SlowRequested { factor, seconds });
            }
        }
    }

    for gone in report.retired {
        for (entity, enemy) in &mirrors {
            if enemy.id == gone.id {
                commands.entity(entity).despawn();
            }
        }
        retired.send(EnemyRetired {
            id: gone.id,
            kind: gone.kind,
            spent: gone.rotation.spent,
            discarded: gone.rotation.discarded,
        });
    }

    for new in report.spawned {
        commands.spawn((
            Enemy { id: new.id },
            EnemyKind(new.kind),
            EnemyStateLabel::default(),
            EnemyFacing::default(),
            ActiveTelegraphs::default(),
            Transform::from_xyz(new.pos.x, new.pos.y, 0.0),
        ));
        spawned.send(EnemySpawned {
            id: new.id,
            kind: new.kind,
            pos: new.pos,
        });
    }
}

/// Copy position, facing, state, and shapes of every live enemy onto its mirror.
fn sync_enemy_mirror(
    encounter: Option<Res<Encounter>>,
    mut mirrors: Query<(
        &Enemy,
        &mut Transform,
        &mut EnemyStateLabel,
        &mut EnemyFacing,
        &mut ActiveTelegraphs,
    )>,
) {
    let Some(encounter) = encounter else {
        return;
    };
    for (tag, mut transform, mut label, mut facing, mut shapes) in &mut mirrors {
        let Some(enemy) = encounter.director.get(tag.id) else {
            continue;
        };
        let body = enemy.body();
        transform.translation = body.pos.extend(transform.translation.z);
        label.0 = enemy.state_name();
        facing.0 = body.facing;
        shapes.0 = enemy.telegraphs();
    }
}
