//! Headless player movement: spawning, scripted wandering, and slows.

use bevy::prelude::*;

use super::components::*;
use crate::core::{GameState, SimSet, SlowRequested};
use crate::world::{Arena, EncounterSettings};

/// Set up player movement systems.
pub fn setup_movement_systems(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_player)
        .add_systems(
            FixedUpdate,
            (tick_slow, wander).chain().in_set(SimSet::Player),
        )
        // Slows requested this tick take effect from the next one
        .add_systems(FixedUpdate, apply_slows.in_set(SimSet::Session));
}

/// Point on the wander curve `t` seconds in.
pub fn wander_target(arena: &Arena, reach: f32, t: f32) -> Vec2 {
    let half = arena.size() * 0.5 * reach;
    arena.center() + Vec2::new((t * 0.7).cos() * half.x, (t * 1.1).sin() * half.y)
}

/// Spawn the player at the arena center, once per encounter.
pub fn spawn_player(
    mut commands: Commands,
    settings: Res<EncounterSettings>,
    existing: Query<Entity, With<Player>>,
) {
    for entity in &existing {
        commands.entity(entity).despawn();
    }
    let center = settings.arena.center();
    commands.spawn((
        Player {
            radius: settings.player_radius,
            speed: settings.player_speed * settings.meter,
        },
        SlowDebuff::default(),
        Wander::default(),
        Transform::from_xyz(center.x, center.y, 0.0),
    ));
    info!("Player spawned at ({:.0}, {:.0})", center.x, center.y);
}

/// Walk toward the moving wander target at the (possibly slowed) player speed.
pub fn wander(
    fixed: Res<Time<Fixed>>,
    settings: Res<EncounterSettings>,
    mut players: Query<(&mut Transform, &mut Wander, &Player, &SlowDebuff)>,
) {
    let dt = fixed.timestep().as_secs_f32();
    for (mut transform, mut wander, player, slow) in &mut players {
        wander.clock += dt;
        let target = wander_target(&settings.arena, wander.reach, wander.clock);
        let pos = transform.translation.truncate();
        let to_target = target - pos;
        let step = player.speed * slow.multiplier() * dt;
        let next = if to_target.length() <= step {
            target
        } else {
            pos + to_target.normalize_or_zero() * step
        };
        let next = settings.arena.clamp_inset(next, player.radius);
        transform.translation = next.extend(transform.translation.z);
    }
}

pub fn tick_slow(fixed: Res<Time<Fixed>>, mut slows: Query<&mut SlowDebuff>) {
    let dt = fixed.timestep().as_secs_f32();
    for mut slow in &mut slows {
        slow.tick(dt);
    }
}

pub fn apply_slows(mut requests: EventReader<SlowRequested>, mut slows: Query<&mut SlowDebuff, With<Player>>) {
    for request in requests.read() {
        debug!("Player slowed to {} for {}s", request.factor, request.seconds);
        for mut slow in &mut slows {
            slow.apply(request.factor, request.seconds);
        }
    }
}
