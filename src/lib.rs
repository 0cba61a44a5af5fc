//! Dodgetia - the attack-pattern engine of a bullet-hell dodge game.
//!
//! One enemy at a time walks into a fixed arena, telegraphs its skills, and
//! leaves once its whole rotation has been cast. A hit is either Danger,
//! which ends the run, or Caution, which counts toward a limit.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, global events, the run session
//! - **Player**: The circle the enemies aim at, with scripted movement
//! - **Enemies**: Archetype state machines, skill queues, and the director
//! - **World**: Arena bounds and encounter settings
//!
//! Everything under `geometry` and `enemies` except the plugin is plain Rust
//! and can be driven without an `App`.

pub mod core;
pub mod enemies;
pub mod geometry;
pub mod player;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct DodgePlugin;

impl Plugin for DodgePlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)
            .add_plugins(player::PlayerPlugin)
            .add_plugins(enemies::EnemyPlugin)
            .add_plugins(world::WorldPlugin);
    }
}
