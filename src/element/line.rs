use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use super::Element;
use crate::element::common;
use crate::geometry::{bounds_of, polygon_contains, rotate_point, Frame, Segment};
use crate::id_generator::ElementId;
use crate::style::{ShapeStyle, StylePatch, StyleSnapshot};

/// Straight line between two points, rotated about its midpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    #[serde(skip, default = "ElementId::generate")]
    id: ElementId,
    segment: Segment,
    #[serde(default)]
    angle: f32,
    style: ShapeStyle,
}

impl Line {
    pub fn new(segment: Segment, angle: f32, style: ShapeStyle) -> Self {
        Self {
            id: ElementId::generate(),
            segment,
            angle,
            style,
        }
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub(crate) fn set_id(&mut self, id: ElementId) {
        self.id = id;
    }

    /// Endpoints in scene coordinates.
    pub fn endpoints(&self) -> Segment {
        self.segment.rotated(self.segment.midpoint(), self.angle)
    }

    fn reach(&self) -> f32 {
        (self.style.stroke_width.get() / 2.0).max(common::HIT_TOLERANCE)
    }
}

impl Element for Line {
    fn id(&self) -> ElementId {
        self.id
    }

    fn element_type(&self) -> &'static str {
        "line"
    }

    fn rect(&self) -> Rect {
        let ends = self.endpoints();
        bounds_of(&[ends.start, ends.end], self.style.stroke_width.get() / 2.0)
    }

    fn hit_test(&self, pos: Pos2) -> bool {
        self.endpoints().distance_to(pos) <= self.reach()
    }

    fn translate(&mut self, delta: Vec2) {
        self.segment.translate(delta);
    }

    fn apply_patch(&mut self, patch: &StylePatch) -> bool {
        match patch {
            StylePatch::Stroke(color) => self.style.stroke = *color,
            StylePatch::Fill(color) => self.style.fill = *color,
            StylePatch::StrokeWidth(width) => self.style.stroke_width = *width,
            StylePatch::Opacity(opacity) => self.style.opacity = *opacity,
            StylePatch::Angle(angle) => self.angle = *angle,
            StylePatch::Background(_) | StylePatch::FontSize(_) | StylePatch::Content(_) => {
                return false;
            }
        }
        true
    }

    fn style_snapshot(&self) -> StyleSnapshot {
        StyleSnapshot {
            stroke: Some(self.style.stroke),
            fill: Some(self.style.fill),
            stroke_width: Some(self.style.stroke_width),
            opacity: self.style.opacity,
            ..Default::default()
        }
    }
}

/// Length of the arrow head along the shaft.
pub const ARROW_HEAD_LENGTH: f32 = 15.0;
/// Width of the arrow head across the shaft.
pub const ARROW_HEAD_WIDTH: f32 = 10.0;

/// A shaft and a triangular head grouped into one unit.
///
/// The children only exist inside the group: they share the group's style, move
/// together and rotate together about the centre of the group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    #[serde(skip, default = "ElementId::generate")]
    id: ElementId,
    shaft: Segment,
    head: Frame,
    #[serde(default)]
    angle: f32,
    style: ShapeStyle,
}

impl Arrow {
    /// Build an arrow pointing from `shaft.start` to `shaft.end`.
    pub fn new(shaft: Segment, style: ShapeStyle) -> Self {
        let direction = (shaft.end - shaft.start).normalized();
        // The head frame is an upright triangle turned to face along the shaft;
        // its apex overshoots the shaft end by a third of its length.
        let head_center = shaft.end - direction * (ARROW_HEAD_LENGTH / 6.0);
        let head_angle = direction.y.atan2(direction.x).to_degrees() + 90.0;
        let head = Frame::centered_at(head_center, Vec2::new(ARROW_HEAD_WIDTH, ARROW_HEAD_LENGTH))
            .with_angle(head_angle);
        Self {
            id: ElementId::generate(),
            shaft,
            head,
            angle: 0.0,
            style,
        }
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub(crate) fn set_id(&mut self, id: ElementId) {
        self.id = id;
    }

    fn pivot(&self) -> Pos2 {
        let mut points = vec![self.shaft.start, self.shaft.end];
        points.extend(self.head.corners());
        bounds_of(&points, 0.0).center()
    }

    /// Shaft endpoints in scene coordinates.
    pub fn shaft(&self) -> Segment {
        self.shaft.rotated(self.pivot(), self.angle)
    }

    /// Head triangle (apex first) in scene coordinates.
    pub fn head(&self) -> [Pos2; 3] {
        let pivot = self.pivot();
        let rect = self.head.rect();
        [rect.center_top(), rect.right_bottom(), rect.left_bottom()]
            .map(|p| rotate_point(self.head.to_scene(p), pivot, self.angle))
    }
}

impl Element for Arrow {
    fn id(&self) -> ElementId {
        self.id
    }

    fn element_type(&self) -> &'static str {
        "arrow"
    }

    fn rect(&self) -> Rect {
        let shaft = self.shaft();
        let mut points = vec![shaft.start, shaft.end];
        points.extend(self.head());
        bounds_of(&points, self.style.stroke_width.get() / 2.0)
    }

    fn hit_test(&self, pos: Pos2) -> bool {
        let reach = (self.style.stroke_width.get() / 2.0).max(common::HIT_TOLERANCE);
        self.shaft().distance_to(pos) <= reach || polygon_contains(&self.head(), pos)
    }

    fn translate(&mut self, delta: Vec2) {
        self.shaft.translate(delta);
        self.head.translate(delta);
    }

    fn apply_patch(&mut self, patch: &StylePatch) -> bool {
        match patch {
            StylePatch::Stroke(color) => self.style.stroke = *color,
            StylePatch::Fill(color) => self.style.fill = *color,
            StylePatch::StrokeWidth(width) => self.style.stroke_width = *width,
            StylePatch::Opacity(opacity) => self.style.opacity = *opacity,
            StylePatch::Angle(angle) => self.angle = *angle,
            StylePatch::Background(_) | StylePatch::FontSize(_) | StylePatch::Content(_) => {
                return false;
            }
        }
        true
    }

    fn style_snapshot(&self) -> StyleSnapshot {
        StyleSnapshot {
            stroke: Some(self.style.stroke),
            fill: Some(self.style.fill),
            stroke_width: Some(self.style.stroke_width),
            opacity: self.style.opacity,
            ..Default::default()
        }
    }
}
