//! Global events used for cross-system communication.
//!
//! The enemy plugin turns every resolved hit into one of these, and the
//! session and player systems consume them. Nothing in the enemy core waits
//! on a reader: unread events are simply dropped.

use bevy::prelude::*;

use crate::enemies::{ArchetypeKind, EnemyId};

/// A Danger-severity skill landed. Ends the run.
#[derive(Event, Clone, Debug, PartialEq)]
pub struct DangerHit {
    /// Name of the skill that landed
    pub skill: &'static str,
}

/// A Caution-severity skill landed.
#[derive(Event, Clone, Debug, PartialEq)]
pub struct CautionHit {
    pub skill: &'static str,
}

/// A skill asked for the player to be slowed.
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub struct SlowRequested {
    /// Speed multiplier while the slow lasts
    pub factor: f32,
    pub seconds: f32,
}

/// An enemy entered the arena.
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub struct EnemySpawned {
    pub id: EnemyId,
    pub kind: ArchetypeKind,
    pub pos: Vec2,
}

/// An enemy used up its rotation and left.
#[derive(Event, Clone, Debug, PartialEq)]
pub struct EnemyRetired {
    pub id: EnemyId,
    pub kind: ArchetypeKind,
    /// Skills in the order they were cast
    pub spent: Vec<&'static str>,
    /// Skills dropped without being cast
    pub discarded: Vec<&'static str>,
}
