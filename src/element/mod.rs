use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

// Re-export concrete implementations
mod common;
pub(crate) mod freehand;
pub(crate) mod image;
pub(crate) mod line;
pub(crate) mod shape;
pub(crate) mod text;

pub use common::{HIT_TOLERANCE, MIN_ELEMENT_SIZE, TEXT_LINE_HEIGHT};
pub use freehand::Freehand;
pub use image::{Image, ImageData};
pub use line::{Arrow, Line};
pub use shape::{Shape, ShapeKind};
pub use text::{Sticky, Text};

use crate::id_generator::ElementId;
use crate::style::{StylePatch, StyleSnapshot};

/// Common trait that all drawable elements implement
pub trait Element {
    /// Get the unique identifier for this element
    fn id(&self) -> ElementId;

    /// Get the element type as a string
    fn element_type(&self) -> &'static str;

    /// Axis-aligned bounds in scene coordinates, rotation included
    fn rect(&self) -> Rect;

    /// Test if the element contains the given scene position
    fn hit_test(&self, pos: Pos2) -> bool;

    /// Translate the element by the given delta
    fn translate(&mut self, delta: Vec2);

    /// Apply one attribute change. Returns false when the variant has no such attribute.
    fn apply_patch(&mut self, patch: &StylePatch) -> bool;

    /// Style attributes for the property panel
    fn style_snapshot(&self) -> StyleSnapshot;
}

/// Enumeration of all element types on the board
///
/// The serialized form is tagged by `type` and carries only the attributes
/// needed to rebuild the element: identifiers and decoded image payloads are
/// left out and regenerated on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ElementType {
    Shape(Shape),
    Line(Line),
    Arrow(Arrow),
    Text(Text),
    Sticky(Sticky),
    Freehand(Freehand),
    Image(Image),
}

impl ElementType {
    /// Copy every attribute into a new element with a fresh id, moved by `offset`.
    pub fn duplicate(&self, offset: Vec2) -> ElementType {
        let mut copy = self.clone();
        copy.set_id(ElementId::generate());
        copy.translate(offset);
        copy
    }

    pub(crate) fn set_id(&mut self, id: ElementId) {
        match self {
            ElementType::Shape(s) => s.set_id(id),
            ElementType::Line(l) => l.set_id(id),
            ElementType::Arrow(a) => a.set_id(id),
            ElementType::Text(t) => t.set_id(id),
            ElementType::Sticky(s) => s.set_id(id),
            ElementType::Freehand(f) => f.set_id(id),
            ElementType::Image(i) => i.set_id(id),
        }
    }

    /// A copy of this element moved by `delta`, keeping its id.
    pub fn translated(&self, delta: Vec2) -> ElementType {
        let mut moved = self.clone();
        moved.translate(delta);
        moved
    }

    /// A copy of this element with `patch` applied, or `None` if the patch does not apply.
    pub fn patched(&self, patch: &StylePatch) -> Option<ElementType> {
        let mut patched = self.clone();
        patched.apply_patch(patch).then_some(patched)
    }

    pub fn as_image(&self) -> Option<&Image> {
        match self {
            ElementType::Image(image) => Some(image),
            _ => None,
        }
    }

    pub(crate) fn as_image_mut(&mut self) -> Option<&mut Image> {
        match self {
            ElementType::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn as_freehand(&self) -> Option<&Freehand> {
        match self {
            ElementType::Freehand(path) => Some(path),
            _ => None,
        }
    }
}

impl Element for ElementType {
    fn id(&self) -> ElementId {
        match self {
            ElementType::Shape(s) => s.id(),
            ElementType::Line(l) => l.id(),
            ElementType::Arrow(a) => a.id(),
            ElementType::Text(t) => t.id(),
            ElementType::Sticky(s) => s.id(),
            ElementType::Freehand(f) => f.id(),
            ElementType::Image(i) => i.id(),
        }
    }

    fn element_type(&self) -> &'static str {
        match self {
            ElementType::Shape(s) => s.element_type(),
            ElementType::Line(l) => l.element_type(),
            ElementType::Arrow(a) => a.element_type(),
            ElementType::Text(t) => t.element_type(),
            ElementType::Sticky(s) => s.element_type(),
            ElementType::Freehand(f) => f.element_type(),
            ElementType::Image(i) => i.element_type(),
        }
    }

    fn rect(&self) -> Rect {
        match self {
            ElementType::Shape(s) => s.rect(),
            ElementType::Line(l) => l.rect(),
            ElementType::Arrow(a) => a.rect(),
            ElementType::Text(t) => t.rect(),
            ElementType::Sticky(s) => s.rect(),
            ElementType::Freehand(f) => f.rect(),
            ElementType::Image(i) => i.rect(),
        }
    }

    fn hit_test(&self, pos: Pos2) -> bool {
        match self {
            ElementType::Shape(s) => s.hit_test(pos),
            ElementType::Line(l) => l.hit_test(pos),
            ElementType::Arrow(a) => a.hit_test(pos),
            ElementType::Text(t) => t.hit_test(pos),
            ElementType::Sticky(s) => s.hit_test(pos),
            ElementType::Freehand(f) => f.hit_test(pos),
            ElementType::Image(i) => i.hit_test(pos),
        }
    }

    fn translate(&mut self, delta: Vec2) {
        match self {
            ElementType::Shape(s) => s.translate(delta),
            ElementType::Line(l) => l.translate(delta),
            ElementType::Arrow(a) => a.translate(delta),
            ElementType::Text(t) => t.translate(delta),
            ElementType::Sticky(s) => s.translate(delta),
            ElementType::Freehand(f) => f.translate(delta),
            ElementType::Image(i) => i.translate(delta),
        }
    }

    fn apply_patch(&mut self, patch: &StylePatch) -> bool {
        match self {
            ElementType::Shape(s) => s.apply_patch(patch),
            ElementType::Line(l) => l.apply_patch(patch),
            ElementType::Arrow(a) => a.apply_patch(patch),
            ElementType::Text(t) => t.apply_patch(patch),
            ElementType::Sticky(s) => s.apply_patch(patch),
            ElementType::Freehand(f) => f.apply_patch(patch),
            ElementType::Image(i) => i.apply_patch(patch),
        }
    }

    fn style_snapshot(&self) -> StyleSnapshot {
        match self {
            ElementType::Shape(s) => s.style_snapshot(),
            ElementType::Line(l) => l.style_snapshot(),
            ElementType::Arrow(a) => a.style_snapshot(),
            ElementType::Text(t) => t.style_snapshot(),
            ElementType::Sticky(s) => s.style_snapshot(),
            ElementType::Freehand(f) => f.style_snapshot(),
            ElementType::Image(i) => i.style_snapshot(),
        }
    }
}

/// Factory functions for creating elements with the whiteboard's default geometry.
///
/// Every placed element is centred on the point it is given.
pub mod factory {
    use super::*;
    use crate::geometry::{Frame, Segment};
    use crate::style::{BrushSettings, Color, StyleDefaults, TextStyle};

    pub const CIRCLE_RADIUS: f32 = 70.0;
    pub const RECT_SIZE: Vec2 = Vec2::splat(100.0);
    pub const TRIANGLE_SIZE: Vec2 = Vec2::splat(100.0);
    pub const DEFAULT_TEXT: &str = "Your text here";
    pub const STICKY_BACKGROUND: Color = Color::rgb(0x8b, 0xc3, 0x4a);
    pub const STICKY_TEXT: Color = Color::WHITE;
    /// Half extent of the default line before rotation.
    pub const LINE_HALF_EXTENT: Vec2 = Vec2::new(75.0, 70.0);
    pub const LINE_ANGLE: f32 = 47.0;
    pub const ARROW_SHAFT_LENGTH: f32 = 150.0;

    pub fn create_shape(kind: ShapeKind, center: Pos2, style: &StyleDefaults) -> ElementType {
        let size = match kind {
            ShapeKind::Circle => Vec2::splat(CIRCLE_RADIUS * 2.0),
            ShapeKind::Rect => RECT_SIZE,
            ShapeKind::Triangle => TRIANGLE_SIZE,
        };
        ElementType::Shape(Shape::new(
            kind,
            Frame::centered_at(center, size),
            style.shape_style(),
        ))
    }

    pub fn create_line(center: Pos2, style: &StyleDefaults) -> ElementType {
        let segment = Segment::new(center - LINE_HALF_EXTENT, center + LINE_HALF_EXTENT);
        ElementType::Line(Line::new(segment, LINE_ANGLE, style.shape_style()))
    }

    pub fn create_arrow(center: Pos2, style: &StyleDefaults) -> ElementType {
        let half = Vec2::new(ARROW_SHAFT_LENGTH / 2.0, 0.0);
        ElementType::Arrow(Arrow::new(
            Segment::new(center - half, center + half),
            style.shape_style(),
        ))
    }

    pub fn create_text(center: Pos2, content: &str, style: &StyleDefaults) -> ElementType {
        let text_style = TextStyle {
            fill: style.stroke,
            font_size: style.font_size,
            background: None,
            opacity: style.opacity,
        };
        let mut text = Text::new(content, center, text_style);
        let size = text.frame().size;
        text.translate(-size / 2.0);
        ElementType::Text(text)
    }

    pub fn create_sticky(center: Pos2, content: &str, style: &StyleDefaults) -> ElementType {
        let text_style = TextStyle {
            fill: STICKY_TEXT,
            font_size: style.font_size,
            background: Some(STICKY_BACKGROUND),
            opacity: style.opacity,
        };
        ElementType::Sticky(Sticky::new(
            content,
            Frame::centered_at(center, Vec2::splat(text::STICKY_SIZE)),
            text::STICKY_PADDING,
            text_style,
        ))
    }

    pub fn create_freehand(points: Vec<Pos2>, brush: BrushSettings) -> ElementType {
        ElementType::Freehand(Freehand::new(points, brush))
    }

    /// Image element of `size`, centred on `center`.
    pub fn create_image(src: &str, data: Option<ImageData>, center: Pos2, size: Vec2) -> ElementType {
        let size = size.max(Vec2::splat(MIN_ELEMENT_SIZE));
        ElementType::Image(Image::new(src, Frame::centered_at(center, size), data))
    }
}
