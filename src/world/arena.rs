//! The rectangular play field.

use bevy::math::Vec2;
use rand::{Rng, RngCore};
use serde::Deserialize;

use super::error::ConfigError;

/// Inset from the arena edge used when spawning enemies.
pub const SPAWN_PADDING: f32 = 40.0;

/// Arena bounds in pixels. The playable area is `[0, width] x [0, height]`.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 540.0,
        }
    }
}

/// One of the four arena edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];
}

impl Arena {
    /// Validated constructor.
    pub fn new(width: f32, height: f32) -> Result<Self, ConfigError> {
        let arena = Self { width, height };
        arena.validate()?;
        Ok(arena)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ok = |v: f32| v.is_finite() && v > 0.0;
        if !ok(self.width) || !ok(self.height) {
            return Err(ConfigError::InvalidArena {
                width: self.width,
                height: self.height,
            });
        }
        if self.width < SPAWN_PADDING * 2.0 || self.height < SPAWN_PADDING * 2.0 {
            return Err(ConfigError::ArenaTooSmall {
                width: self.width,
                height: self.height,
                padding: SPAWN_PADDING,
            });
        }
        Ok(())
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.size() * 0.5
    }

    pub fn contains(&self, p: Vec2) -> bool {
        (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
    }

    /// Clamp into `[0, W] x [0, H]`.
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        self.clamp_inset(p, 0.0)
    }

    /// Clamp into the arena shrunk by `margin` on every side.
    pub fn clamp_inset(&self, p: Vec2, margin: f32) -> Vec2 {
        Vec2::new(
            p.x.clamp(margin, (self.width - margin).max(margin)),
            p.y.clamp(margin, (self.height - margin).max(margin)),
        )
    }

    /// Uniform point along `edge`, inset by `padding`.
    pub fn edge_point(&self, edge: Edge, along: f32, padding: f32) -> Vec2 {
        let span = |len: f32| along.clamp(0.0, 1.0) * (len - padding * 2.0) + padding;
        match edge {
            Edge::Left => Vec2::new(padding, span(self.height)),
            Edge::Right => Vec2::new(self.width - padding, span(self.height)),
            Edge::Top => Vec2::new(span(self.width), padding),
            Edge::Bottom => Vec2::new(span(self.width), self.height - padding),
        }
    }

    /// Random point on a random edge, inset by `padding`.
    pub fn random_edge_point(&self, rng: &mut dyn RngCore, padding: f32) -> Vec2 {
        let edge = Edge::ALL[rng.gen_range(0..Edge::ALL.len())];
        let along: f32 = rng.gen();
        self.edge_point(edge, along, padding)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn rejects_degenerate_bounds() {
        assert!(Arena::new(0.0, 540.0).is_err());
        assert!(Arena::new(960.0, f32::NAN).is_err());
        assert!(matches!(
            Arena::new(50.0, 540.0),
            Err(ConfigError::ArenaTooSmall { .. })
        ));
        assert!(Arena::new(960.0, 540.0).is_ok());
    }

    #[test]
    fn clamp_keeps_points_inside() {
        let arena = Arena::default();
        assert_eq!(arena.clamp(Vec2::new(-5.0, 600.0)), Vec2::new(0.0, 540.0));
        assert_eq!(arena.clamp_inset(Vec2::new(-5.0, 600.0), 4.0), Vec2::new(4.0, 536.0));
    }

    #[test]
    fn edge_points_sit_on_the_padded_border() {
        let arena = Arena::default();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            let p = arena.random_edge_point(&mut rng, SPAWN_PADDING);
            let on_vertical = p.x == SPAWN_PADDING || p.x == arena.width - SPAWN_PADDING;
            let on_horizontal = p.y == SPAWN_PADDING || p.y == arena.height - SPAWN_PADDING;
            assert!(on_vertical || on_horizontal, "{p:?}");
            assert!(p.x >= SPAWN_PADDING && p.x <= arena.width - SPAWN_PADDING);
            assert!(p.y >= SPAWN_PADDING && p.y <= arena.height - SPAWN_PADDING);
        }
    }
}
