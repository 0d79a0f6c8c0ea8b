use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use super::Element;
use crate::element::common;
use crate::geometry::{polygon_contains, Frame};
use crate::id_generator::ElementId;
use crate::style::{ShapeStyle, StylePatch, StyleSnapshot};

/// Geometric primitive placed from the shapes menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    Rect,
    Triangle,
}

impl ShapeKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Rect => "rect",
            Self::Triangle => "triangle",
        }
    }
}

/// Filled and outlined shape inside a (possibly rotated) frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    #[serde(skip, default = "ElementId::generate")]
    id: ElementId,
    kind: ShapeKind,
    frame: Frame,
    style: ShapeStyle,
}

impl Shape {
    pub fn new(kind: ShapeKind, frame: Frame, style: ShapeStyle) -> Self {
        Self {
            id: ElementId::generate(),
            kind,
            frame,
            style,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    pub(crate) fn set_id(&mut self, id: ElementId) {
        self.id = id;
    }

    /// Closed outline in scene coordinates, rotation applied.
    pub fn outline(&self) -> Vec<Pos2> {
        let rect = self.frame.rect();
        let local = match self.kind {
            ShapeKind::Rect => vec![
                rect.left_top(),
                rect.right_top(),
                rect.right_bottom(),
                rect.left_bottom(),
            ],
            ShapeKind::Triangle => vec![rect.center_top(), rect.right_bottom(), rect.left_bottom()],
            ShapeKind::Circle => common::ellipse_points(rect.center(), rect.size()),
        };
        local.into_iter().map(|p| self.frame.to_scene(p)).collect()
    }
}

impl Element for Shape {
    fn id(&self) -> ElementId {
        self.id
    }

    fn element_type(&self) -> &'static str {
        self.kind.name()
    }

    fn rect(&self) -> Rect {
        self.frame.bounds()
    }

    fn hit_test(&self, pos: Pos2) -> bool {
        let local = self.frame.to_local(pos);
        let rect = self.frame.rect().expand(common::HIT_TOLERANCE);
        match self.kind {
            ShapeKind::Rect => rect.contains(local),
            ShapeKind::Circle => {
                let radius = rect.size() / 2.0;
                if radius.x <= 0.0 || radius.y <= 0.0 {
                    return false;
                }
                let d = local - rect.center();
                (d.x / radius.x).powi(2) + (d.y / radius.y).powi(2) <= 1.0
            }
            ShapeKind::Triangle => polygon_contains(
                &[rect.center_top(), rect.right_bottom(), rect.left_bottom()],
                local,
            ),
        }
    }

    fn translate(&mut self, delta: Vec2) {
        self.frame.translate(delta);
    }

    fn apply_patch(&mut self, patch: &StylePatch) -> bool {
        match patch {
            StylePatch::Stroke(color) => self.style.stroke = *color,
            StylePatch::Fill(color) => self.style.fill = *color,
            StylePatch::StrokeWidth(width) => self.style.stroke_width = *width,
            StylePatch::Opacity(opacity) => self.style.opacity = *opacity,
            StylePatch::Angle(angle) => self.frame.angle = *angle,
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
