use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use super::Element;
use crate::element::common;
use crate::geometry::Frame;
use crate::id_generator::ElementId;
use crate::style::{StylePatch, StyleSnapshot, TextStyle};

/// Free-standing text box sized to its content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    #[serde(skip, default = "ElementId::generate")]
    id: ElementId,
    content: String,
    frame: Frame,
    style: TextStyle,
}

impl Text {
    pub fn new(content: impl Into<String>, origin: Pos2, style: TextStyle) -> Self {
        let content = content.into();
        let size = common::measure_text(&content, style.font_size.get());
        Self {
            id: ElementId::generate(),
            content,
            frame: Frame::new(origin, size),
            style,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub(crate) fn set_id(&mut self, id: ElementId) {
        self.id = id;
    }

    fn remeasure(&mut self) {
        self.frame.size = common::measure_text(&self.content, self.style.font_size.get());
    }
}

impl Element for Text {
    fn id(&self) -> ElementId {
        self.id
    }

    fn element_type(&self) -> &'static str {
        "text"
    }

    fn rect(&self) -> Rect {
        self.frame.bounds()
    }

    fn hit_test(&self, pos: Pos2) -> bool {
        self.frame.contains(pos)
    }

    fn translate(&mut self, delta: Vec2) {
        self.frame.translate(delta);
    }

    fn apply_patch(&mut self, patch: &StylePatch) -> bool {
        match patch {
            StylePatch::Fill(color) => self.style.fill = *color,
            StylePatch::Background(color) => self.style.background = Some(*color),
            StylePatch::Opacity(opacity) => self.style.opacity = *opacity,
            StylePatch::Angle(angle) => self.frame.angle = *angle,
            StylePatch::FontSize(size) => {
                self.style.font_size = *size;
                self.remeasure();
            }
            StylePatch::Content(content) => {
                self.content = content.clone();
                self.remeasure();
            }
            StylePatch::Stroke(_) | StylePatch::StrokeWidth(_) => return false,
        }
        true
    }

    fn style_snapshot(&self) -> StyleSnapshot {
        StyleSnapshot {
            fill: Some(self.style.fill),
            background: self.style.background,
            font_size: Some(self.style.font_size),
            opacity: self.style.opacity,
            ..Default::default()
        }
    }
}

/// Default sticky note side length.
pub const STICKY_SIZE: f32 = 150.0;
/// Default gap between the note's edge and its text.
pub const STICKY_PADDING: f32 = 20.0;

/// Fixed-size note with a colored background; text wraps by character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sticky {
    #[serde(skip, default = "ElementId::generate")]
    id: ElementId,
    content: String,
    frame: Frame,
    padding: f32,
    style: TextStyle,
}

impl Sticky {
    pub fn new(content: impl Into<String>, frame: Frame, padding: f32, style: TextStyle) -> Self {
        Self {
            id: ElementId::generate(),
            content: content.into(),
            frame,
            padding: padding.max(0.0),
            style,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub(crate) fn set_id(&mut self, id: ElementId) {
        self.id = id;
    }

    /// The note including its padding, unrotated.
    pub fn outer_rect(&self) -> Rect {
        self.frame.rect().expand(self.padding)
    }

    /// Content split into the lines painted inside the note.
    pub fn wrapped_lines(&self) -> Vec<String> {
        common::wrap_by_character(&self.content, self.frame.size.x, self.style.font_size.get())
    }
}

impl Element for Sticky {
    fn id(&self) -> ElementId {
        self.id
    }

    fn element_type(&self) -> &'static str {
        "sticky"
    }

    fn rect(&self) -> Rect {
        let mut padded = self.frame;
        padded.origin -= Vec2::splat(self.padding);
        padded.size += Vec2::splat(self.padding * 2.0);
        padded.bounds()
    }

    fn hit_test(&self, pos: Pos2) -> bool {
        self.outer_rect().contains(self.frame.to_local(pos))
    }

    fn translate(&mut self, delta: Vec2) {
        self.frame.translate(delta);
    }

    fn apply_patch(&mut self, patch: &StylePatch) -> bool {
        match patch {
            StylePatch::Fill(color) => self.style.fill = *color,
            StylePatch::Background(color) => self.style.background = Some(*color),
            StylePatch::FontSize(size) => self.style.font_size = *size,
            StylePatch::Opacity(opacity) => self.style.opacity = *opacity,
            StylePatch::Angle(angle) => self.frame.angle = *angle,
            StylePatch::Content(content) => self.content = content.clone(),
            StylePatch::Stroke(_) | StylePatch::StrokeWidth(_) => return false,
        }
        true
    }

    fn style_snapshot(&self) -> StyleSnapshot {
        StyleSnapshot {
            fill: Some(self.style.fill),
            background: self.style.background,
            font_size: Some(self.style.font_size),
            opacity: self.style.opacity,
            ..Default::default()
        }
    }
}
