//! Projectiles fired by ranged skills.

use bevy::math::Vec2;

use super::skills::{Outcome, Severity, Telegraph};
use crate::geometry::{Circle, Shape};

/// Projectile body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProjectileShape {
    Disk { radius: f32 },
    Square { side: f32 },
}

/// Leg of a boomerang flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Leg {
    Outbound,
    Return,
}

/// How the projectile travels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Flight {
    /// One leg, then gone.
    Straight,
    /// Out for `range`, then back toward where the caster is at the turn,
    /// for the same distance, at `return_speed`.
    Boomerang { leg: Leg, return_speed: f32 },
}

/// Result of one projectile step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProjectileStep {
    Flying,
    /// Touched the player; the projectile is spent.
    Hit(Outcome),
    /// Ran out of range.
    Expired,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub skill: &'static str,
    pub pos: Vec2,
    pub vel: Vec2,
    pub shape: ProjectileShape,
    pub severity: Severity,
    /// Distance covered on the current leg.
    pub travelled: f32,
    pub range: f32,
    pub flight: Flight,
    /// Optional slow applied alongside the hit.
    pub slow: Option<(f32, f32)>,
}

impl Projectile {
    /// Straight projectile from `from` along `angle`.
    pub fn straight(
        skill: &'static str,
        from: Vec2,
        angle: f32,
        speed: f32,
        range: f32,
        shape: ProjectileShape,
        severity: Severity,
    ) -> Self {
        Self {
            skill,
            pos: from,
            vel: Vec2::from_angle(angle) * speed,
            shape,
            severity,
            travelled: 0.0,
            range,
            flight: Flight::Straight,
            slow: None,
        }
    }

    /// Turn a straight projectile into a boomerang.
    pub fn returning(mut self, return_speed: f32) -> Self {
        self.flight = Flight::Boomerang {
            leg: Leg::Outbound,
            return_speed,
        };
        self
    }

    pub fn with_slow(mut self, factor: f32, seconds: f32) -> Self {
        self.slow = Some((factor, seconds));
        self
    }

    pub fn body(&self) -> Shape {
        match self.shape {
            ProjectileShape::Disk { radius } => Shape::Disk {
                center: self.pos,
                radius,
            },
            ProjectileShape::Square { side } => Shape::Aabb {
                center: self.pos,
                half_extents: Vec2::splat(side * 0.5),
            },
        }
    }

    pub fn telegraph(&self) -> Telegraph {
        Telegraph {
            skill: self.skill,
            shape: self.body(),
            severity: self.severity,
        }
    }

    /// Advance one tick. `caster` is where the owner stands right now and is
    /// only read when a boomerang turns.
    ///
    /// Steps never overshoot the end of a leg, so the turn happens exactly
    /// at `range`.
    pub fn step(&mut self, dt: f32, player: Circle, caster: Vec2) -> ProjectileStep {
        let speed = self.vel.length();
        let advance = (speed * dt).min(self.range - self.travelled).max(0.0);
        if speed > 0.0 {
            self.pos += self.vel / speed * advance;
        }
        self.travelled += advance;

        if self.body().hits(player) {
            return ProjectileStep::Hit(Outcome::hit(self.severity, self.skill));
        }

        if self.travelled < self.range {
            return ProjectileStep::Flying;
        }

        match self.flight {
            Flight::Boomerang {
                leg: Leg::Outbound,
                return_speed,
            } => {
                let back = caster - self.pos;
                let dir = if back.length_squared() > 0.0 {
                    back.normalize()
                } else {
                    -self.vel.normalize_or_zero()
                };
                self.vel = dir * return_speed;
                self.travelled = 0.0;
                self.flight = Flight::Boomerang {
                    leg: Leg::Return,
                    return_speed,
                };
                ProjectileStep::Flying
            }
            _ => ProjectileStep::Expired,
        }
    }

    pub fn leg(&self) -> Option<Leg> {
        match self.flight {
            Flight::Straight => None,
            Flight::Boomerang { leg, .. } => Some(leg),
        }
    }
}

/// Step every projectile, dropping the ones that hit or expired.
pub fn step_all(
    projectiles: &mut Vec<Projectile>,
    dt: f32,
    player: Circle,
    caster: Vec2,
    outcomes: &mut Vec<Outcome>,
) {
    projectiles.retain_mut(|p| match p.step(dt, player, caster) {
        ProjectileStep::Flying => true,
        ProjectileStep::Hit(outcome) => {
            outcomes.push(outcome);
            if let Some((factor, seconds)) = p.slow {
                outcomes.push(Outcome::Slow { factor, seconds });
            }
            false
        }
        ProjectileStep::Expired => false,
    });
}
