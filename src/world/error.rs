//! Error types for encounter configuration and data loading.

use thiserror::Error;

/// Errors that can occur when loading encounter or tuning data.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// File could not be found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },
}

/// Invalid encounter configuration, rejected before any enemy is built.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Meter scale must be a positive finite number, got {0}")]
    InvalidMeter(f32),

    #[error("Arena bounds must be positive and finite, got {width}x{height}")]
    InvalidArena { width: f32, height: f32 },

    /// The arena is too small to fit the edge spawn padding.
    #[error("Arena {width}x{height} cannot fit a spawn padding of {padding}")]
    ArenaTooSmall { width: f32, height: f32, padding: f32 },

    #[error("No archetypes are allowed to spawn")]
    EmptyRoster,

    #[error("Unknown archetype '{0}'")]
    UnknownArchetype(String),

    #[error("Respawn delay must be zero or positive, got {0}")]
    InvalidRespawnDelay(f32),

    #[error("Player radius must be zero or positive, got {0}")]
    InvalidPlayerRadius(f32),
}
