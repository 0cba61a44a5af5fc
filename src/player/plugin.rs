//! Player plugin - spawning and scripted movement.

use bevy::prelude::*;

use super::movement;

/// Player plugin - handles player spawning, movement, and slows.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        movement::setup_movement_systems(app);
    }
}
