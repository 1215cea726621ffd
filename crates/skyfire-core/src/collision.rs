//! Collision primitives: axis-aligned boxes, circles and beam segments.
//!
//! All checks are pure. Callers scan every (projectile, entity) pair each
//! tick, which is fine at the tens-of-entities scale the game runs at.

use glam::DVec2;

use crate::types::{Position, Rect};

/// True iff the rectangles intersect. Touching edges do not overlap.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Squared distance from `point` to the segment `start..end`.
pub fn point_segment_distance_sq(point: Position, start: Position, end: Position) -> f64 {
    let p = point.as_vec();
    let a = start.as_vec();
    let ab = end.as_vec() - a;
    let len_sq = ab.length_squared();
    if len_sq <= f64::EPSILON {
        return p.distance_squared(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance_squared(a + ab * t)
}

/// True iff `point` lies within `radius` of `center` (boundary inclusive).
pub fn within_radius(center: Position, radius: f64, point: Position) -> bool {
    center.distance_to(&point) <= radius
}

/// True iff the circle and the rectangle intersect.
pub fn circle_overlaps_rect(center: Position, radius: f64, rect: &Rect) -> bool {
    let nearest = DVec2::new(
        center.x.clamp(rect.x, rect.right()),
        center.y.clamp(rect.y, rect.bottom()),
    );
    nearest.distance_squared(center.as_vec()) < radius * radius
}

/// End point of a beam of `length` starting at `origin` along `angle`.
pub fn beam_end(origin: Position, angle: f64, length: f64) -> Position {
    origin.offset(angle.cos() * length, angle.sin() * length)
}
