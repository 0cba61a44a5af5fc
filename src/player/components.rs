//! Player-related components.

use bevy::prelude::*;

/// The player circle the enemies aim at. Position lives in `Transform`.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Player {
    pub radius: f32,
    /// Base movement speed in pixels per second
    pub speed: f32,
}

/// Temporary speed multiplier from a slowing skill.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct SlowDebuff {
    pub factor: f32,
    /// Seconds left
    pub remaining: f32,
}

impl Default for SlowDebuff {
    fn default() -> Self {
        Self {
            factor: 1.0,
            remaining: 0.0,
        }
    }
}

impl SlowDebuff {
    /// Stack a new slow on top of the current one. The stronger factor and
    /// the longer duration win.
    pub fn apply(&mut self, factor: f32, seconds: f32) {
        if self.remaining <= 0.0 {
            self.factor = factor;
            self.remaining = seconds;
        } else {
            self.factor = self.factor.min(factor);
            self.remaining = self.remaining.max(seconds);
        }
    }

    pub fn tick(&mut self, dt: f32) {
        if self.remaining > 0.0 {
            self.remaining -= dt;
            if self.remaining <= 0.0 {
                self.factor = 1.0;
                self.remaining = 0.0;
            }
        }
    }

    /// Multiplier to apply to the player's speed right now.
    pub fn multiplier(&self) -> f32 {
        if self.remaining > 0.0 {
            self.factor
        } else {
            1.0
        }
    }
}

/// Scripted movement for the headless player: follows a slow Lissajous
/// curve around the arena center.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Wander {
    /// Seconds along the curve
    pub clock: f32,
    /// Fraction of the half-extent used by the curve
    pub reach: f32,
}

impl Default for Wander {
    fn default() -> Self {
        Self {
            clock: 0.0,
            reach: 0.6,
        }
    }
}
