//! Circle-vs-shape predicates.
//!
//! All predicates take the moving circle (usually the player) first and
//! return `true` on contact. Boundaries are inclusive.

use bevy::math::Vec2;

use super::shapes::Circle;

/// Guard added to the ray-cast denominator so horizontal edges never divide by zero.
const RAY_EPSILON: f32 = 1e-9;

/// Angle of the vector from `from` to `to`.
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit vector for an angle.
pub fn direction(angle: f32) -> Vec2 {
    Vec2::from_angle(angle)
}

/// Express `point` in the frame whose origin is `origin` and whose +X axis
/// points along `angle`.
pub fn to_local(point: Vec2, origin: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    let t = point - origin;
    Vec2::new(t.x * cos + t.y * sin, -t.x * sin + t.y * cos)
}

/// Rectangle anchored at `origin`, spanning `x ∈ [0, length]` and
/// `y ∈ [-width/2, width/2]` in its local frame.
pub fn circle_vs_rotated_rect(
    circle: Circle,
    origin: Vec2,
    length: f32,
    width: f32,
    angle: f32,
) -> bool {
    let local = to_local(circle.center, origin, angle);
    let half = width * 0.5;
    let nearest = Vec2::new(local.x.clamp(0.0, length), local.y.clamp(-half, half));
    local.distance_squared(nearest) <= circle.radius * circle.radius
}

/// Axis-aligned box given by its center and half extents.
pub fn circle_vs_aabb(circle: Circle, center: Vec2, half_extents: Vec2) -> bool {
    let nearest = circle
        .center
        .clamp(center - half_extents, center + half_extents);
    circle.center.distance_squared(nearest) <= circle.radius * circle.radius
}

/// Circular sector of `radius` opening `half_angle` to each side of `angle`.
///
/// The admissible angle is padded by the angular extent of the circle itself
/// (capped at `half_angle`), and the circle must reach the forward half-plane
/// so wide sectors never wrap behind their origin.
pub fn circle_vs_sector(
    circle: Circle,
    origin: Vec2,
    radius: f32,
    half_angle: f32,
    angle: f32,
) -> bool {
    let local = to_local(circle.center, origin, angle);
    let d = local.length();
    let r = circle.radius;
    if d > radius + r {
        return false;
    }
    let offset = local.y.atan2(local.x);
    let pad = half_angle.min((r / d.max(r)).min(1.0).asin());
    offset.abs() <= half_angle + pad && local.x + r >= 0.0
}

/// Disk of `radius` restricted to the half-plane in front of `origin`.
pub fn circle_vs_front_semicircle(circle: Circle, origin: Vec2, radius: f32, angle: f32) -> bool {
    let local = to_local(circle.center, origin, angle);
    let reach = radius + circle.radius;
    local.x + circle.radius >= 0.0 && local.length_squared() <= reach * reach
}

/// Plain disk overlap.
pub fn circle_vs_disk(circle: Circle, center: Vec2, radius: f32) -> bool {
    let reach = radius + circle.radius;
    circle.center.distance_squared(center) <= reach * reach
}

/// Even-odd point containment.
pub fn point_in_polygon(point: Vec2, vertices: &[Vec2]) -> bool {
    let mut inside = false;
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (vertices[i], vertices[j]);
        if (a.y > point.y) != (b.y > point.y) {
            let cross_x = (b.x - a.x) * (point.y - a.y) / (b.y - a.y + RAY_EPSILON) + a.x;
            if point.x < cross_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Distance from `point` to the segment `a..b` by clamped projection.
pub fn distance_to_segment(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

/// Hit if the center is inside the polygon or any edge is within the radius.
pub fn circle_vs_convex_polygon(circle: Circle, vertices: &[Vec2]) -> bool {
    if point_in_polygon(circle.center, vertices) {
        return true;
    }
    let n = vertices.len();
    (0..n).any(|i| {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        distance_to_segment(circle.center, a, b) <= circle.radius
    })
}
