//! Enemies module - archetype state machines, skills, and the director that
//! keeps one of them in the arena.

pub mod archetypes;
mod components;
pub mod data;
mod lifecycle;
mod plugin;
pub mod projectile;
pub mod queue;
pub mod skills;
pub mod steering;

pub use archetypes::{ArchetypeKind, TickContext};
pub use components::*;
pub use data::TuningRegistry;
pub use lifecycle::{EnemyDirector, EnemyId, Retired, Spawned, TickReport};
pub use plugin::{Encounter, EnemyPlugin, SIMULATION_HZ};
pub use skills::{Outcome, Severity, Telegraph};
