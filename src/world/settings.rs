//! Encounter settings loaded from `assets/data/encounter.ron`.

use std::fs;
use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;

use super::arena::Arena;
use super::error::{ConfigError, DataLoadError};
use crate::enemies::ArchetypeKind;

pub const ENCOUNTER_PATH: &str = "assets/data/encounter.ron";

/// Everything the enemy core needs from the outside world, besides the
/// player's live position.
#[derive(Resource, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct EncounterSettings {
    /// Pixels per meter. Every range and speed in tuning data is in meters.
    pub meter: f32,
    pub arena: Arena,
    /// Archetype names allowed to spawn. Matching is case-insensitive.
    pub allowed: Vec<String>,
    /// Seconds between a retirement and the replacement spawn.
    pub respawn_delay: f32,
    /// Fixed seed for reproducible runs. Entropy when absent.
    pub seed: Option<u64>,
    /// Caution hits tolerated before the run ends.
    pub caution_limit: u32,
    pub player_radius: f32,
    /// Player movement speed in meters per second.
    pub player_speed: f32,
}

impl Default for EncounterSettings {
    fn default() -> Self {
        Self {
            meter: 55.0,
            arena: Arena::default(),
            allowed: ArchetypeKind::ALL.iter().map(|k| k.name().to_string()).collect(),
            respawn_delay: 0.0,
            seed: None,
            caution_limit: 3,
            player_radius: 18.0,
            player_speed: 3.9,
        }
    }
}

impl EncounterSettings {
    /// Check every field and resolve the roster.
    pub fn validate(&self) -> Result<Vec<ArchetypeKind>, ConfigError> {
        if !self.meter.is_finite() || self.meter <= 0.0 {
            return Err(ConfigError::InvalidMeter(self.meter));
        }
        self.arena.validate()?;
        if !self.respawn_delay.is_finite() || self.respawn_delay < 0.0 {
            return Err(ConfigError::InvalidRespawnDelay(self.respawn_delay));
        }
        if !self.player_radius.is_finite() || self.player_radius < 0.0 {
            return Err(ConfigError::InvalidPlayerRadius(self.player_radius));
        }
        self.roster()
    }

    /// Resolve `allowed` into archetypes, dropping duplicates.
    pub fn roster(&self) -> Result<Vec<ArchetypeKind>, ConfigError> {
        let mut roster = Vec::new();
        for name in &self.allowed {
            let kind: ArchetypeKind = name.parse()?;
            if !roster.contains(&kind) {
                roster.push(kind);
            }
        }
        if roster.is_empty() {
            return Err(ConfigError::EmptyRoster);
        }
        Ok(roster)
    }

    /// Read and parse a settings file.
    pub fn load_from_file(path: &Path) -> Result<Self, DataLoadError> {
        if !path.exists() {
            return Err(DataLoadError::FileNotFound(path.display().to_string()));
        }
        let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
            path: path.display().to_string(),
            details: e.to_string(),
        })?;
        ron::from_str(&contents).map_err(|e| DataLoadError::ParseError {
            path: path.display().to_string(),
            details: e.to_string(),
        })
    }
}

/// Load encounter settings, keeping the defaults when the file is missing or broken.
pub fn load_encounter_settings(mut commands: Commands, existing: Option<Res<EncounterSettings>>) {
    if existing.is_some() {
        info!("Encounter settings provided by the app, skipping {}", ENCOUNTER_PATH);
        return;
    }

    let settings = match EncounterSettings::load_from_file(Path::new(ENCOUNTER_PATH)) {
        Ok(settings) => {
            info!("Loaded encounter settings from {}", ENCOUNTER_PATH);
            settings
        }
        Err(DataLoadError::FileNotFound(path)) => {
            warn!("Encounter settings not found at {}, using defaults", path);
            EncounterSettings::default()
        }
        Err(e) => {
            error!("{}, using defaults", e);
            EncounterSettings::default()
        }
    };

    commands.insert_resource(settings);
}
