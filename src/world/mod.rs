//! World module - arena bounds, encounter settings, and data loading errors.

mod arena;
mod error;
mod plugin;
mod settings;

pub use arena::{Arena, Edge, SPAWN_PADDING};
pub use error::{ConfigError, DataLoadError};
pub use plugin::WorldPlugin;
pub use settings::{load_encounter_settings, EncounterSettings, ENCOUNTER_PATH};
