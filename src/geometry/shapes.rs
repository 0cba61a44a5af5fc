//! Placed shapes in world (pixel) space.

use bevy::math::Vec2;

use super::collision::*;

/// A circle, used for the player and anything tested against skill shapes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// A skill footprint placed in the arena.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Beam or slash anchored at `origin`, extending `length` along `angle`.
    RotatedRect {
        origin: Vec2,
        length: f32,
        width: f32,
        angle: f32,
    },
    /// Cone opening `half_angle` to each side of `angle`.
    Sector {
        origin: Vec2,
        radius: f32,
        half_angle: f32,
        angle: f32,
    },
    FrontSemicircle {
        origin: Vec2,
        radius: f32,
        angle: f32,
    },
    Disk {
        center: Vec2,
        radius: f32,
    },
    /// Axis-aligned box, used for square projectiles.
    Aabb {
        center: Vec2,
        half_extents: Vec2,
    },
    /// Convex polygon in world coordinates.
    Polygon {
        vertices: Vec<Vec2>,
    },
}

impl Shape {
    /// Test the circle against this shape.
    pub fn hits(&self, target: Circle) -> bool {
        match self {
            Shape::RotatedRect {
                origin,
                length,
                width,
                angle,
            } => circle_vs_rotated_rect(target, *origin, *length, *width, *angle),
            Shape::Sector {
                origin,
                radius,
                half_angle,
                angle,
            } => circle_vs_sector(target, *origin, *radius, *half_angle, *angle),
            Shape::FrontSemicircle {
                origin,
                radius,
                angle,
            } => circle_vs_front_semicircle(target, *origin, *radius, *angle),
            Shape::Disk { center, radius } => circle_vs_disk(target, *center, *radius),
            Shape::Aabb {
                center,
                half_extents,
            } => circle_vs_aabb(target, *center, *half_extents),
            Shape::Polygon { vertices } => circle_vs_convex_polygon(target, vertices),
        }
    }

    /// Trapezoid centered on `center` whose axis points along `angle`.
    /// The near edge is `near_width` wide, the far edge `far_width`.
    pub fn trapezoid(center: Vec2, angle: f32, depth: f32, near_width: f32, far_width: f32) -> Self {
        let axis = direction(angle);
        let perp = axis.perp();
        let near = center - axis * (depth * 0.5);
        let far = center + axis * (depth * 0.5);
        let (nh, fh) = (near_width * 0.5, far_width * 0.5);
        Shape::Polygon {
            vertices: vec![near + perp * nh, near - perp * nh, far - perp * fh, far + perp * fh],
        }
    }

    /// Rectangle covering the straight path from `from` to `to`.
    pub fn swept(from: Vec2, to: Vec2, width: f32) -> Self {
        Shape::RotatedRect {
            origin: from,
            length: from.distance(to),
            width,
            angle: angle_to(from, to),
        }
    }

    /// Reference point of the shape, for logging and debug drawing.
    pub fn anchor(&self) -> Vec2 {
        match self {
            Shape::RotatedRect { origin, .. }
            | Shape::Sector { origin, .. }
            | Shape::FrontSemicircle { origin, .. } => *origin,
            Shape::Disk { center, .. } | Shape::Aabb { center, .. } => *center,
            Shape::Polygon { vertices } => {
                if vertices.is_empty() {
                    Vec2::ZERO
                } else {
                    vertices.iter().copied().sum::<Vec2>() / vertices.len() as f32
                }
            }
        }
    }
}
