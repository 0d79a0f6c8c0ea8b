use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use super::Element;
use crate::element::common;
use crate::geometry::{bounds_of, Segment};
use crate::id_generator::ElementId;
use crate::style::{BrushSettings, Color, Opacity, StrokeWidth, StylePatch, StyleSnapshot};

/// Freehand path captured from a pointer drag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Freehand {
    #[serde(skip, default = "ElementId::generate")]
    id: ElementId,
    points: Vec<Pos2>,
    stroke: Color,
    stroke_width: StrokeWidth,
    #[serde(default)]
    opacity: Opacity,
}

impl Freehand {
    pub fn new(points: Vec<Pos2>, brush: BrushSettings) -> Self {
        Self {
            id: ElementId::generate(),
            points,
            stroke: brush.color,
            stroke_width: brush.width,
            opacity: Opacity::OPAQUE,
        }
    }

    /// Get the samples that make up this path
    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn stroke(&self) -> Color {
        self.stroke
    }

    pub fn stroke_width(&self) -> StrokeWidth {
        self.stroke_width
    }

    pub fn opacity(&self) -> Opacity {
        self.opacity
    }

    pub(crate) fn set_id(&mut self, id: ElementId) {
        self.id = id;
    }
}

impl Element for Freehand {
    fn id(&self) -> ElementId {
        self.id
    }

    fn element_type(&self) -> &'static str {
        "freehand"
    }

    fn rect(&self) -> Rect {
        // Bounding box of the samples grown by half the visible stroke
        bounds_of(&self.points, self.stroke_width.get() / 2.0)
    }

    fn hit_test(&self, pos: Pos2) -> bool {
        let reach = (self.stroke_width.get() / 2.0).max(common::HIT_TOLERANCE);
        match self.points.as_slice() {
            [] => false,
            [only] => (pos - *only).length() <= reach,
            points => points
                .windows(2)
                .any(|pair| Segment::new(pair[0], pair[1]).distance_to(pos) <= reach),
        }
    }

    fn translate(&mut self, delta: Vec2) {
        for point in &mut self.points {
            *point += delta;
        }
    }

    fn apply_patch(&mut self, patch: &StylePatch) -> bool {
        match patch {
            StylePatch::Stroke(color) => self.stroke = *color,
            StylePatch::StrokeWidth(width) => self.stroke_width = *width,
            StylePatch::Opacity(opacity) => self.opacity = *opacity,
            _ => return false,
        }
        true
    }

    fn style_snapshot(&self) -> StyleSnapshot {
        StyleSnapshot {
            stroke: Some(self.stroke),
            stroke_width: Some(self.stroke_width),
            opacity: self.opacity,
            ..Default::default()
        }
    }
}
