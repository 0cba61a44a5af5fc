mod common;

use bevy::prelude::*;
use common::{app_headless, apply_state_transitions, fixed_ticks, settings, state, Seen};
use dodgetia::core::{GameState, Session, SlowRequested};
use dodgetia::enemies::{ArchetypeKind, Encounter, Enemy, EnemyKind, EnemyStateLabel};
use dodgetia::player::{Player, SlowDebuff, Wander};
use dodgetia::world::EncounterSettings;

fn mirror_count(app: &mut App) -> usize {
    let mut mirrors = app.world_mut().query::<&Enemy>();
    mirrors.iter(app.world()).count()
}

#[test]
fn first_tick_spawns_a_mirrored_enemy() {
    let mut app = app_headless(settings(&["darko"], 1));
    assert_eq!(mirror_count(&mut app), 0);

    fixed_ticks(&mut app, 1);

    assert_eq!(mirror_count(&mut app), 1);
    let seen = app.world().resource::<Seen>();
    assert_eq!(seen.spawned.len(), 1);
    assert_eq!(seen.spawned[0].kind, ArchetypeKind::Darko);

    let mut kinds = app.world_mut().query::<&EnemyKind>();
    let kind = kinds.single(app.world());
    assert_eq!(kind.0, ArchetypeKind::Darko);
}

#[test]
fn mirror_follows_the_director() {
    let mut app = app_headless(settings(&["luku"], 2));
    fixed_ticks(&mut app, 240);

    let (id, pos, state_name) = {
        let encounter = app.world().resource::<Encounter>();
        let (id, enemy) = encounter.director.enemies().next().unwrap();
        (id, enemy.body().pos, enemy.state_name())
    };
    let mut mirrors = app.world_mut().query::<(&Enemy, &Transform, &EnemyStateLabel)>();
    let (tag, transform, label) = mirrors.single(app.world());
    assert_eq!(tag.id, id);
    assert_eq!(transform.translation.truncate(), pos);
    assert_eq!(label.0, state_name);
}

#[test]
fn retired_enemies_are_replaced_and_despawned() {
    let mut app = app_headless(EncounterSettings {
        caution_limit: 0,
        ..settings(&["darko", "luku", "isaac"], 3)
    });
    for _ in 0..120 * 90 {
        fixed_ticks(&mut app, 1);
        assert!(mirror_count(&mut app) <= 1);
        if app.world().resource::<Session>().is_over() {
            break;
        }
    }
    let seen = app.world().resource::<Seen>();
    assert!(!seen.retired.is_empty(), "nobody retired");
    for retired in &seen.retired {
        assert!(!retired.spent.is_empty());
    }
    // every retirement but a final one is followed by a replacement
    assert!(seen.spawned.len() >= seen.retired.len());
}

#[test]
fn standing_still_against_hisui_ends_the_run() {
    let mut app = app_headless(settings(&["hisui"], 4));
    let player = {
        let mut players = app.world_mut().query_filtered::<Entity, With<Player>>();
        players.single(app.world())
    };
    app.world_mut().entity_mut(player).remove::<Wander>();

    let mut ticks = 0;
    while !app.world().resource::<Session>().is_over() {
        fixed_ticks(&mut app, 1);
        ticks += 1;
        assert!(ticks < 120 * 60, "the player was never hit");
    }
    let survival = app.world().resource::<Session>().survival;
    assert!(survival > 1.0);

    // Enemies keep acting but nothing new spawns and the clock is frozen
    let spawned = app.world().resource::<Seen>().spawned.len();
    fixed_ticks(&mut app, 120 * 20);
    assert_eq!(app.world().resource::<Seen>().spawned.len(), spawned);
    assert_eq!(app.world().resource::<Session>().survival, survival);

    apply_state_transitions(&mut app);
    assert_eq!(state(&app), GameState::GameOver);
}

#[test]
fn slow_requests_reach_the_player() {
    let mut app = app_headless(settings(&["luku"], 5));
    app.world_mut().send_event(SlowRequested {
        factor: 0.7,
        seconds: 1.0,
    });
    fixed_ticks(&mut app, 1);

    let mut slows = app.world_mut().query_filtered::<&SlowDebuff, With<Player>>();
    assert_eq!(slows.single(app.world()).multiplier(), 0.7);

    fixed_ticks(&mut app, 121);
    let mut slows = app.world_mut().query_filtered::<&SlowDebuff, With<Player>>();
    assert_eq!(slows.single(app.world()).multiplier(), 1.0);
}

#[test]
fn bad_settings_end_the_run_before_it_starts() {
    let mut app = app_headless(settings(&["Nobody"], 6));
    assert!(app.world().get_resource::<Encounter>().is_none());
    apply_state_transitions(&mut app);
    assert_eq!(state(&app), GameState::GameOver);
}
