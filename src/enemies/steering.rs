//! Kinematic steering and scripted displacement.

use bevy::math::Vec2;

use super::components::{Body, Facing};
use crate::geometry::direction;
use crate::world::Arena;

/// Displacements shorter than this count as "did not move".
const STUCK: f32 = 1e-4;

/// Unit vector from `from` to `to`. Coincident points give zero.
fn heading(from: Vec2, to: Vec2) -> Vec2 {
    let d = to - from;
    let len = d.length();
    // treat a zero distance as 1 so nothing moves
    d / if len > 0.0 { len } else { 1.0 }
}

/// Move toward `target` at `speed` pixels per second, face it, stay in bounds.
pub fn steer_toward(body: &mut Body, target: Vec2, speed: f32, dt: f32, arena: &Arena) {
    let dir = heading(body.pos, target);
    body.facing = Facing::from_dx(target.x - body.pos.x);
    body.pos = arena.clamp(body.pos + dir * speed * dt);
}

/// Move away from `threat` while still facing it.
pub fn steer_away(body: &mut Body, threat: Vec2, speed: f32, dt: f32, arena: &Arena) {
    let dir = heading(threat, body.pos);
    body.pos = arena.clamp(body.pos + dir * speed * dt);
    body.facing = Facing::from_dx(threat.x - body.pos.x);
}

/// Instant scripted move of `distance` along `dir`, clamped to the arena.
/// Returns the distance actually travelled.
pub fn displace(body: &mut Body, dir: Vec2, distance: f32, arena: &Arena) -> f32 {
    let before = body.pos;
    body.pos = arena.clamp(body.pos + dir.normalize_or_zero() * distance);
    before.distance(body.pos)
}

/// Whether a dash is still running after a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DashStep {
    Moving,
    Finished,
}

/// Fixed-length dash along a locked direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dash {
    pub angle: f32,
    pub speed: f32,
    pub remaining: f32,
}

impl Dash {
    /// Dash of `distance` pixels completed in `duration` seconds.
    pub fn new(angle: f32, distance: f32, duration: f32) -> Self {
        Self::with_speed(angle, distance, distance / duration.max(1e-4))
    }

    pub fn with_speed(angle: f32, distance: f32, speed: f32) -> Self {
        Self {
            angle,
            speed,
            remaining: distance,
        }
    }

    pub fn direction(&self) -> Vec2 {
        direction(self.angle)
    }

    /// Advance the body. A wall ends the dash early.
    pub fn step(&mut self, body: &mut Body, dt: f32, arena: &Arena) -> DashStep {
        let want = (self.speed * dt).min(self.remaining);
        if want <= 0.0 {
            self.remaining = 0.0;
            return DashStep::Finished;
        }
        let moved = displace(body, self.direction(), want, arena);
        body.facing = Facing::along(self.angle);
        if moved <= STUCK {
            self.remaining = 0.0;
            return DashStep::Finished;
        }
        self.remaining = (self.remaining - moved).max(0.0);
        if self.remaining <= STUCK {
            DashStep::Finished
        } else {
            DashStep::Moving
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steer_moves_speed_times_dt() {
        let arena = Arena::default();
        let mut body = Body::new(Vec2::new(100.0, 100.0));
        steer_toward(&mut body, Vec2::new(200.0, 100.0), 50.0, 0.5, &arena);
        assert_eq!(body.pos, Vec2::new(125.0, 100.0));
        assert_eq!(body.facing, Facing::Right);

        steer_toward(&mut body, Vec2::new(0.0, 100.0), 50.0, 0.5, &arena);
        assert_eq!(body.facing, Facing::Left);
    }

    #[test]
    fn steer_on_top_of_target_stays_put() {
        let arena = Arena::default();
        let mut body = Body::new(Vec2::new(100.0, 100.0));
        steer_toward(&mut body, Vec2::new(100.0, 100.0), 50.0, 1.0, &arena);
        assert_eq!(body.pos, Vec2::new(100.0, 100.0));
        assert_eq!(body.facing, Facing::Right);
    }

    #[test]
    fn steer_faces_the_target_it_overshoots() {
        let arena = Arena::default();
        let mut body = Body::new(Vec2::new(100.0, 100.0));
        body.facing = Facing::Left;
        // one step carries her past the target
        steer_toward(&mut body, Vec2::new(104.0, 100.0), 50.0, 0.5, &arena);
        assert_eq!(body.pos, Vec2::new(125.0, 100.0));
        assert_eq!(body.facing, Facing::Right);
    }

    #[test]
    fn steer_is_clamped_to_arena() {
        let arena = Arena::default();
        let mut body = Body::new(Vec2::new(2.0, 100.0));
        steer_toward(&mut body, Vec2::new(-500.0, 100.0), 100.0, 1.0, &arena);
        assert_eq!(body.pos.x, 0.0);
    }

    #[test]
    fn steer_away_backs_off() {
        let arena = Arena::default();
        let mut body = Body::new(Vec2::new(100.0, 100.0));
        steer_away(&mut body, Vec2::new(150.0, 100.0), 10.0, 1.0, &arena);
        assert_eq!(body.pos, Vec2::new(90.0, 100.0));
        assert_eq!(body.facing, Facing::Right);
    }

    #[test]
    fn dash_covers_its_distance_exactly() {
        let arena = Arena::default();
        let mut body = Body::new(Vec2::new(100.0, 100.0));
        let mut dash = Dash::new(0.0, 60.0, 0.25);
        let mut steps = 0;
        while dash.step(&mut body, 1.0 / 120.0, &arena) == DashStep::Moving {
            steps += 1;
            assert!(steps < 100);
        }
        assert!((body.pos.x - 160.0).abs() < 1e-3);
    }

    #[test]
    fn dash_stops_at_wall() {
        let arena = Arena::default();
        let mut body = Body::new(Vec2::new(10.0, 100.0));
        let mut dash = Dash::new(std::f32::consts::PI, 100.0, 0.25);
        let mut steps = 0;
        while dash.step(&mut body, 1.0 / 120.0, &arena) == DashStep::Moving {
            steps += 1;
            assert!(steps < 100);
        }
        assert!(body.pos.x.abs() < 1e-3);
        assert_eq!(dash.remaining, 0.0);
    }
}
