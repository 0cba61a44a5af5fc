//! World plugin - encounter settings loading.

use bevy::prelude::*;

use super::settings::load_encounter_settings;

/// World plugin - loads the arena and encounter settings before anything spawns.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        // PreStartup so the settings resource exists for every Startup system
        app.add_systems(PreStartup, load_encounter_settings);
    }
}
