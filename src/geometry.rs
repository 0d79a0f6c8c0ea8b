//! Geometry primitives shared by every drawable element.
//!
//! Points and sizes are plain `egui` value types (`Pos2`, `Vec2`). Angles are in
//! degrees, clockwise on screen (y grows downwards), and always rotate about the
//! centre of the owning frame.

use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Rotate `point` around `pivot` by `angle` degrees.
pub fn rotate_point(point: Pos2, pivot: Pos2, angle: f32) -> Pos2 {
    if angle == 0.0 {
        return point;
    }
    let (sin, cos) = angle.to_radians().sin_cos();
    let d = point - pivot;
    Pos2::new(
        pivot.x + d.x * cos - d.y * sin,
        pivot.y + d.x * sin + d.y * cos,
    )
}

/// Axis-aligned bounding box of a set of points, grown by `padding` on every side.
pub fn bounds_of(points: &[Pos2], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Rect::from_min_max(
        Pos2::new(min_x - padding, min_y - padding),
        Pos2::new(max_x + padding, max_y + padding),
    )
}

/// Position, size and rotation of a box-shaped element.
///
/// `origin` is the top-left corner of the unrotated box; `angle` rotates the box
/// about its centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub origin: Pos2,
    pub size: Vec2,
    #[serde(default)]
    pub angle: f32,
}

impl Frame {
    pub fn new(origin: Pos2, size: Vec2) -> Self {
        Self { origin, size, angle: 0.0 }
    }

    /// A frame of `size` whose centre sits on `center`.
    pub fn centered_at(center: Pos2, size: Vec2) -> Self {
        Self::new(center - size / 2.0, size)
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    /// The unrotated box.
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.origin, self.size)
    }

    pub fn center(&self) -> Pos2 {
        self.rect().center()
    }

    /// Corners in paint order (top-left, top-right, bottom-right, bottom-left), rotated.
    pub fn corners(&self) -> [Pos2; 4] {
        let rect = self.rect();
        let center = rect.center();
        [
            rect.left_top(),
            rect.right_top(),
            rect.right_bottom(),
            rect.left_bottom(),
        ]
        .map(|corner| rotate_point(corner, center, self.angle))
    }

    /// Axis-aligned bounds of the rotated box.
    pub fn bounds(&self) -> Rect {
        if self.angle == 0.0 {
            return self.rect();
        }
        bounds_of(&self.corners(), 0.0)
    }

    /// Map a scene point into the unrotated coordinate space of this frame.
    pub fn to_local(&self, pos: Pos2) -> Pos2 {
        rotate_point(pos, self.center(), -self.angle)
    }

    /// Map a point from the unrotated space of this frame back into the scene.
    pub fn to_scene(&self, pos: Pos2) -> Pos2 {
        rotate_point(pos, self.center(), self.angle)
    }

    pub fn contains(&self, pos: Pos2) -> bool {
        self.rect().contains(self.to_local(pos))
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.origin += delta;
    }
}

/// A straight segment between two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Pos2,
    pub end: Pos2,
}

impl Segment {
    pub fn new(start: Pos2, end: Pos2) -> Self {
        Self { start, end }
    }

    pub fn midpoint(&self) -> Pos2 {
        self.start.lerp(self.end, 0.5)
    }

    pub fn length(&self) -> f32 {
        (self.end - self.start).length()
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }

    pub fn rotated(&self, pivot: Pos2, angle: f32) -> Self {
        Self {
            start: rotate_point(self.start, pivot, angle),
            end: rotate_point(self.end, pivot, angle),
        }
    }

    /// Shortest distance from `point` to this segment.
    pub fn distance_to(&self, point: Pos2) -> f32 {
        let line_vec = self.end - self.start;
        let point_vec = point - self.start;

        let line_len = line_vec.length();
        if line_len == 0.0 {
            return point_vec.length();
        }

        let t = ((point_vec.x * line_vec.x + point_vec.y * line_vec.y) / line_len).clamp(0.0, line_len);
        let projection = self.start + (line_vec * t / line_len);
        (point - projection).length()
    }
}

/// Even-odd point-in-polygon test.
pub fn polygon_contains(polygon: &[Pos2], point: Pos2) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotating_a_quarter_turn_is_clockwise_on_screen() {
        let rotated = rotate_point(Pos2::new(10.0, 0.0), Pos2::ZERO, 90.0);
        assert!((rotated.x - 0.0).abs() < 1e-4);
        assert!((rotated.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn rotated_frame_contains_uses_local_space() {
        let frame = Frame::centered_at(Pos2::ZERO, Vec2::new(100.0, 10.0)).with_angle(90.0);
        assert!(frame.contains(Pos2::new(0.0, 40.0)));
        assert!(!frame.contains(Pos2::new(40.0, 0.0)));
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let segment = Segment::new(Pos2::new(0.0, 0.0), Pos2::new(10.0, 0.0));
        assert_eq!(segment.distance_to(Pos2::new(5.0, 3.0)), 3.0);
        assert_eq!(segment.distance_to(Pos2::new(13.0, 4.0)), 5.0);
    }
}
