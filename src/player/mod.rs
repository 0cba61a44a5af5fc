//! Player module - the circle the enemies aim at.

mod components;
mod movement;
mod plugin;

pub use components::*;
pub use movement::{spawn_player, wander_target};
pub use plugin::PlayerPlugin;
