//! Style values and the closed per-variant style records.

use std::fmt;
use std::str::FromStr;

use egui::Color32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a style value fails validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StyleError {
    #[error("Invalid color: {0:?}")]
    InvalidColor(String),

    #[error("Stroke width must be a positive number, got {0}")]
    InvalidStrokeWidth(f32),

    #[error("Font size must be a positive number, got {0}")]
    InvalidFontSize(f32),
}

/// An sRGB color with straight (unmultiplied) alpha.
///
/// Parses `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)` and `rgba(r, g, b, a)`
/// with `a` in `[0, 1]`. Opaque colors print as `#rrggbb`, the rest as `rgba(..)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT_WHITE: Color = Color::rgba(255, 255, 255, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn parse(input: &str) -> Result<Self, StyleError> {
        let invalid = || StyleError::InvalidColor(input.to_owned());
        let text = input.trim();

        if let Some(hex) = text.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(invalid);
        }

        let lower = text.to_ascii_lowercase();
        let (body, has_alpha) = if let Some(body) = lower.strip_prefix("rgba(") {
            (body, true)
        } else if let Some(body) = lower.strip_prefix("rgb(") {
            (body, false)
        } else {
            return Err(invalid());
        };
        let body = body.strip_suffix(')').ok_or_else(invalid)?;
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        if parts.len() != if has_alpha { 4 } else { 3 } {
            return Err(invalid());
        }

        let channel = |s: &str| s.parse::<u8>().map_err(|_| invalid());
        let alpha = if has_alpha {
            let a: f32 = parts[3].parse().map_err(|_| invalid())?;
            if !(0.0..=1.0).contains(&a) {
                return Err(invalid());
            }
            (a * 255.0).round() as u8
        } else {
            255
        };

        Ok(Self::rgba(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?, alpha))
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Premultiplied color for painting.
    pub fn to_color32(self) -> Color32 {
        Color32::from_rgba_unmultiplied(self.r, self.g, self.b, self.a)
    }

    pub fn from_color32(color: Color32) -> Self {
        let [r, g, b, a] = color.to_srgba_unmultiplied();
        Self::rgba(r, g, b, a)
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let byte = |s: &str| u8::from_str_radix(s, 16).ok();
    let nibble = |c: char| c.to_digit(16).map(|v| (v * 17) as u8);
    match hex.len() {
        3 => {
            let mut chars = hex.chars();
            Some(Color::rgb(
                nibble(chars.next()?)?,
                nibble(chars.next()?)?,
                nibble(chars.next()?)?,
            ))
        }
        6 => Some(Color::rgb(byte(hex.get(0..2)?)?, byte(hex.get(2..4)?)?, byte(hex.get(4..6)?)?)),
        8 => Some(Color::rgba(
            byte(hex.get(0..2)?)?,
            byte(hex.get(2..4)?)?,
            byte(hex.get(4..6)?)?,
            byte(hex.get(6..8)?)?,
        )),
        _ => None,
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            return write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b);
        }
        // Three decimals are enough to recover the exact 8-bit alpha on parse.
        let alpha = format!("{:.3}", f32::from(self.a) / 255.0);
        let alpha = alpha.trim_end_matches('0').trim_end_matches('.');
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }
}

impl FromStr for Color {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Color {
    type Error = StyleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Strictly positive outline width.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct StrokeWidth(f32);

impl StrokeWidth {
    pub fn new(width: f32) -> Result<Self, StyleError> {
        if width.is_finite() && width > 0.0 {
            Ok(Self(width))
        } else {
            Err(StyleError::InvalidStrokeWidth(width))
        }
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl TryFrom<f32> for StrokeWidth {
    type Error = StyleError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StrokeWidth> for f32 {
    fn from(width: StrokeWidth) -> Self {
        width.0
    }
}

/// Strictly positive font size in scene units.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct FontSize(f32);

impl FontSize {
    pub fn new(size: f32) -> Result<Self, StyleError> {
        if size.is_finite() && size > 0.0 {
            Ok(Self(size))
        } else {
            Err(StyleError::InvalidFontSize(size))
        }
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl TryFrom<f32> for FontSize {
    type Error = StyleError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FontSize> for f32 {
    fn from(size: FontSize) -> Self {
        size.0
    }
}

/// Opacity, clamped into `[0, 1]`. Non-finite input becomes fully opaque.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct Opacity(f32);

impl Opacity {
    pub const OPAQUE: Opacity = Opacity(1.0);

    pub fn new(value: f32) -> Self {
        if value.is_finite() {
            Self(value.clamp(0.0, 1.0))
        } else {
            Self::OPAQUE
        }
    }

    pub fn get(self) -> f32 {
        self.0
    }

    /// Scale a color's alpha by this opacity.
    pub fn apply(self, color: Color) -> Color {
        color.with_alpha((f32::from(color.a) * self.0).round() as u8)
    }
}

impl Default for Opacity {
    fn default() -> Self {
        Self::OPAQUE
    }
}

impl From<f32> for Opacity {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<Opacity> for f32 {
    fn from(opacity: Opacity) -> Self {
        opacity.0
    }
}

/// Style of outlined geometry: shapes, lines and arrows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    pub stroke: Color,
    pub fill: Color,
    pub stroke_width: StrokeWidth,
    #[serde(default)]
    pub opacity: Opacity,
}

/// Style of text-bearing elements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub fill: Color,
    pub font_size: FontSize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
    #[serde(default)]
    pub opacity: Opacity,
}

/// A single attribute change routed through the scene's modify operation.
#[derive(Debug, Clone, PartialEq)]
pub enum StylePatch {
    Stroke(Color),
    Fill(Color),
    Background(Color),
    StrokeWidth(StrokeWidth),
    Opacity(Opacity),
    FontSize(FontSize),
    Angle(f32),
    Content(String),
}

impl StylePatch {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stroke(_) => "stroke",
            Self::Fill(_) => "fill",
            Self::Background(_) => "backgroundColor",
            Self::StrokeWidth(_) => "strokeWidth",
            Self::Opacity(_) => "opacity",
            Self::FontSize(_) => "fontSize",
            Self::Angle(_) => "angle",
            Self::Content(_) => "text",
        }
    }
}

/// Which color attribute the property panel's color picker edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorTarget {
    #[default]
    Background,
    Stroke,
    Fill,
}

impl ColorTarget {
    pub fn patch(self, color: Color) -> StylePatch {
        match self {
            Self::Background => StylePatch::Background(color),
            Self::Stroke => StylePatch::Stroke(color),
            Self::Fill => StylePatch::Fill(color),
        }
    }
}

/// Style applied to newly placed elements; tracks the last values edited in the
/// property panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleDefaults {
    pub stroke: Color,
    pub fill: Color,
    pub stroke_width: StrokeWidth,
    pub font_size: FontSize,
    pub opacity: Opacity,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            stroke: Color::BLACK,
            fill: Color::TRANSPARENT_WHITE,
            stroke_width: StrokeWidth(3.0),
            font_size: FontSize(22.0),
            opacity: Opacity::OPAQUE,
        }
    }
}

impl StyleDefaults {
    pub fn shape_style(&self) -> ShapeStyle {
        ShapeStyle {
            stroke: self.stroke,
            fill: self.fill,
            stroke_width: self.stroke_width,
            opacity: self.opacity,
        }
    }

    /// Fold a patch into the defaults. Attributes the defaults do not track are ignored.
    pub fn absorb(&mut self, patch: &StylePatch) {
        match patch {
            StylePatch::Stroke(color) => self.stroke = *color,
            StylePatch::Fill(color) => self.fill = *color,
            StylePatch::StrokeWidth(width) => self.stroke_width = *width,
            StylePatch::FontSize(size) => self.font_size = *size,
            StylePatch::Opacity(opacity) => self.opacity = *opacity,
            StylePatch::Background(_) | StylePatch::Angle(_) | StylePatch::Content(_) => {}
        }
    }
}

/// Freehand brush used while the Draw tool is active.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushSettings {
    pub color: Color,
    pub width: StrokeWidth,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: StrokeWidth(5.0),
        }
    }
}

/// Style attributes of one element, for syncing the property panel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StyleSnapshot {
    pub stroke: Option<Color>,
    pub fill: Option<Color>,
    pub background: Option<Color>,
    pub stroke_width: Option<StrokeWidth>,
    pub font_size: Option<FontSize>,
    pub opacity: Opacity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_rgba_forms() {
        assert_eq!(Color::parse("#fff").unwrap(), Color::WHITE);
        assert_eq!(Color::parse("#8bc34a").unwrap(), Color::rgb(0x8b, 0xc3, 0x4a));
        assert_eq!(
            Color::parse("rgba(255, 255, 255, 0.0)").unwrap(),
            Color::TRANSPARENT_WHITE
        );
        assert_eq!(Color::parse("rgb(1,2,3)").unwrap(), Color::rgb(1, 2, 3));
        assert!(Color::parse("rgba(1, 2, 3)").is_err());
        assert!(Color::parse("blue").is_err());
    }

    #[test]
    fn color_text_form_round_trips_every_alpha() {
        for a in 0..=255u8 {
            let color = Color::rgba(10, 20, 30, a);
            assert_eq!(Color::parse(&color.to_string()).unwrap(), color);
        }
    }

    #[test]
    fn stroke_width_rejects_non_positive() {
        assert!(StrokeWidth::new(0.0).is_err());
        assert!(StrokeWidth::new(-2.0).is_err());
        assert!(StrokeWidth::new(f32::NAN).is_err());
        assert_eq!(StrokeWidth::new(3.0).unwrap().get(), 3.0);
    }

    #[test]
    fn opacity_is_clamped() {
        assert_eq!(Opacity::new(1.5).get(), 1.0);
        assert_eq!(Opacity::new(-0.5).get(), 0.0);
    }
}
