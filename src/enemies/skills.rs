//! Skill definitions: shapes in meters, severities, and the outcomes a
//! resolved skill reports back to the game loop.

use bevy::math::Vec2;
use rand::{Rng, RngCore};
use serde::Deserialize;

use super::projectile::{Projectile, ProjectileShape};
use crate::geometry::{angle_to, direction, Circle, Shape};

/// How bad a hit is. Danger usually ends the run, caution accumulates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub enum Severity {
    Danger,
    Caution,
}

/// Something the game loop has to react to, returned from `Enemy::update`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
    Hit {
        severity: Severity,
        /// Name of the skill that landed.
        skill: &'static str,
    },
    /// Temporary speed multiplier for the player.
    Slow { factor: f32, seconds: f32 },
}

impl Outcome {
    pub fn hit(severity: Severity, skill: &'static str) -> Self {
        Outcome::Hit { severity, skill }
    }

    pub fn is_danger(&self) -> bool {
        matches!(
            self,
            Outcome::Hit {
                severity: Severity::Danger,
                ..
            }
        )
    }

    pub fn is_caution(&self) -> bool {
        matches!(
            self,
            Outcome::Hit {
                severity: Severity::Caution,
                ..
            }
        )
    }
}

/// Skill footprint with dimensions in meters.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub enum ShapeSpec {
    /// Anchored at the caster, extending forward.
    Rect { length: f32, width: f32 },
    /// Cone with its full aperture in degrees.
    Sector { radius: f32, aperture_deg: f32 },
    FrontSemicircle { radius: f32 },
    Disk { radius: f32 },
    /// Axis-aligned square, used by projectiles.
    Square { side: f32 },
    Trapezoid {
        depth: f32,
        near_width: f32,
        far_width: f32,
    },
}

impl ShapeSpec {
    /// Place the shape in pixel space.
    ///
    /// `anchor` is the base for rects, cones and semicircles and the center
    /// for disks, squares and trapezoids.
    pub fn place(&self, anchor: Vec2, angle: f32, meter: f32) -> Shape {
        match *self {
            ShapeSpec::Rect { length, width } => Shape::RotatedRect {
                origin: anchor,
                length: length * meter,
                width: width * meter,
                angle,
            },
            ShapeSpec::Sector {
                radius,
                aperture_deg,
            } => Shape::Sector {
                origin: anchor,
                radius: radius * meter,
                half_angle: aperture_deg.to_radians() * 0.5,
                angle,
            },
            ShapeSpec::FrontSemicircle { radius } => Shape::FrontSemicircle {
                origin: anchor,
                radius: radius * meter,
                angle,
            },
            ShapeSpec::Disk { radius } => Shape::Disk {
                center: anchor,
                radius: radius * meter,
            },
            ShapeSpec::Square { side } => Shape::Aabb {
                center: anchor,
                half_extents: Vec2::splat(side * meter * 0.5),
            },
            ShapeSpec::Trapezoid {
                depth,
                near_width,
                far_width,
            } => Shape::trapezoid(
                anchor,
                angle,
                depth * meter,
                near_width * meter,
                far_width * meter,
            ),
        }
    }

    /// Forward reach in meters, used by footprint triggers.
    pub fn reach(&self) -> f32 {
        match *self {
            ShapeSpec::Rect { length, .. } => length,
            ShapeSpec::Sector { radius, .. }
            | ShapeSpec::FrontSemicircle { radius }
            | ShapeSpec::Disk { radius } => radius,
            ShapeSpec::Square { side } => side * 0.5,
            ShapeSpec::Trapezoid { depth, .. } => depth,
        }
    }
}

/// A shape together with the severity it lands with.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct Strike {
    pub shape: ShapeSpec,
    pub severity: Severity,
}

impl Strike {
    pub const fn new(shape: ShapeSpec, severity: Severity) -> Self {
        Self { shape, severity }
    }

    pub fn place(&self, skill: &'static str, anchor: Vec2, angle: f32, meter: f32) -> Telegraph {
        Telegraph {
            skill,
            shape: self.shape.place(anchor, angle, meter),
            severity: self.severity,
        }
    }
}

/// A placed shape waiting to resolve. Also what renderers draw.
#[derive(Clone, Debug, PartialEq)]
pub struct Telegraph {
    pub skill: &'static str,
    pub shape: Shape,
    pub severity: Severity,
}

impl Telegraph {
    /// Hit test against the player's current circle.
    pub fn resolve(&self, player: Circle) -> Option<Outcome> {
        self.shape
            .hits(player)
            .then(|| Outcome::hit(self.severity, self.skill))
    }
}

/// Origin and aim captured when a cast starts. Never updated afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CastSnapshot {
    pub origin: Vec2,
    pub angle: f32,
}

impl CastSnapshot {
    /// Aim from `origin` at `target`. Coincident points aim along +X.
    pub fn aim(origin: Vec2, target: Vec2) -> Self {
        Self {
            origin,
            angle: angle_to(origin, target),
        }
    }

    pub fn direction(&self) -> Vec2 {
        direction(self.angle)
    }

    /// Point `distance` pixels ahead of the origin.
    pub fn ahead(&self, distance: f32) -> Vec2 {
        self.origin + self.direction() * distance
    }
}

/// Shared timing of a queued skill, in meters and seconds.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SkillTiming {
    /// Trigger distance to the player.
    pub trigger: f32,
    /// Upper bound of the uniformly sampled feint.
    pub feint_max: f32,
    pub cast: f32,
    pub post_wait: f32,
}

impl Default for SkillTiming {
    fn default() -> Self {
        Self {
            trigger: 5.0,
            feint_max: 0.5,
            cast: 0.3,
            post_wait: 0.1,
        }
    }
}

impl SkillTiming {
    pub const fn new(trigger: f32, feint_max: f32, cast: f32, post_wait: f32) -> Self {
        Self {
            trigger,
            feint_max,
            cast,
            post_wait,
        }
    }

    /// Whether `target` is within the trigger distance of `from`.
    pub fn in_range(&self, from: Vec2, target: Vec2, meter: f32) -> bool {
        let reach = self.trigger * meter;
        from.distance_squared(target) <= reach * reach
    }
}

/// Projectile parameters in meters. `shape` must be a disk or a square.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct ShotSpec {
    pub shape: ShapeSpec,
    /// Meters per second.
    pub speed: f32,
    /// Meters travelled before the projectile expires (or turns).
    pub range: f32,
    pub severity: Severity,
}

impl ShotSpec {
    pub fn fire(&self, skill: &'static str, from: Vec2, angle: f32, meter: f32) -> Projectile {
        let shape = match self.shape {
            ShapeSpec::Square { side } => ProjectileShape::Square { side: side * meter },
            other => ProjectileShape::Disk {
                radius: other.reach() * meter,
            },
        };
        Projectile::straight(
            skill,
            from,
            angle,
            self.speed * meter,
            self.range * meter,
            shape,
            self.severity,
        )
    }

    /// Rectangle covering the flight path, shown while winding up.
    pub fn lane(&self, skill: &'static str, origin: Vec2, angle: f32, meter: f32) -> Telegraph {
        let width = match self.shape {
            ShapeSpec::Square { side } => side,
            other => other.reach() * 2.0,
        };
        Strike::new(
            ShapeSpec::Rect {
                length: self.range,
                width,
            },
            self.severity,
        )
        .place(skill, origin, angle, meter)
    }
}

/// Uniform feint in `[0, max)`. Zero when the skill has no feint.
pub fn sample_feint(rng: &mut dyn RngCore, max: f32) -> f32 {
    if max <= 0.0 {
        0.0
    } else {
        rng.gen::<f32>() * max
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn rect_spec_scales_by_meter() {
        let shape = ShapeSpec::Rect {
            length: 2.0,
            width: 1.0,
        }
        .place(Vec2::ZERO, 0.0, 10.0);
        assert_eq!(
            shape,
            Shape::RotatedRect {
                origin: Vec2::ZERO,
                length: 20.0,
                width: 10.0,
                angle: 0.0
            }
        );
    }

    #[test]
    fn telegraph_reports_its_severity() {
        let strike = Strike::new(ShapeSpec::Disk { radius: 1.0 }, Severity::Caution);
        let tele = strike.place("orb", Vec2::new(100.0, 100.0), 0.0, 10.0);
        let inside = Circle::new(Vec2::new(105.0, 100.0), 0.0);
        let outside = Circle::new(Vec2::new(125.0, 100.0), 0.0);
        assert_eq!(tele.resolve(inside), Some(Outcome::hit(Severity::Caution, "orb")));
        assert_eq!(tele.resolve(outside), None);
    }

    #[test]
    fn feint_stays_in_window() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            let f = sample_feint(&mut rng, 0.5);
            assert!((0.0..0.5).contains(&f));
        }
        assert_eq!(sample_feint(&mut rng, 0.0), 0.0);
    }
}
