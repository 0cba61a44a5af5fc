//! Enemy-related components.

use bevy::math::Vec2;
use bevy::prelude::*;

use super::archetypes::ArchetypeKind;
use super::lifecycle::EnemyId;
use super::skills::Telegraph;
use crate::geometry::direction;

/// Collision radius of an enemy body. Cosmetic: only skills touch the player.
pub const BODY_RADIUS: f32 = 16.0;

/// Which way the sprite faces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Ties resolve to `Right`.
    pub fn from_dx(dx: f32) -> Self {
        if dx >= 0.0 {
            Facing::Right
        } else {
            Facing::Left
        }
    }

    /// Facing for movement along `angle`.
    pub fn along(angle: f32) -> Self {
        Self::from_dx(direction(angle).x)
    }

    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Kinematic state of an enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub facing: Facing,
    pub radius: f32,
}

impl Body {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            facing: Facing::Right,
            radius: BODY_RADIUS,
        }
    }

    pub fn distance_to(&self, target: Vec2) -> f32 {
        self.pos.distance(target)
    }

    pub fn face(&mut self, target: Vec2) {
        self.facing = Facing::from_dx(target.x - self.pos.x);
    }
}

/// ECS mirror of a live enemy, keyed by its director id.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Enemy {
    pub id: EnemyId,
}

/// Archetype of the mirrored enemy.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemyKind(pub ArchetypeKind);

/// Current FSM state name, for debugging and HUD overlays.
#[derive(Component, Clone, Debug, Default, PartialEq, Eq)]
pub struct EnemyStateLabel(pub &'static str);

/// Sprite facing of the mirrored enemy.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnemyFacing(pub Facing);

/// Shapes the renderer should draw this frame.
#[derive(Component, Clone, Debug, Default)]
pub struct ActiveTelegraphs(pub Vec<Telegraph>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facing_ties_resolve_right() {
        assert_eq!(Facing::from_dx(0.0), Facing::Right);
        assert_eq!(Facing::from_dx(-0.1), Facing::Left);
        assert_eq!(Facing::along(std::f32::consts::PI), Facing::Left);
    }
}
