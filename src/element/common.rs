use egui::{Pos2, Vec2};

// Common constants for all element types
pub const MIN_ELEMENT_SIZE: f32 = 2.0;
pub const HIT_TOLERANCE: f32 = 4.0;
pub const TEXT_LINE_HEIGHT: f32 = 1.16;
pub const CHAR_WIDTH_RATIO: f32 = 0.6;
pub const ELLIPSE_SEGMENTS: usize = 48;

/// Approximate box of a text block; glyph metrics are not available headless.
pub(crate) fn measure_text(content: &str, font_size: f32) -> Vec2 {
    let lines: Vec<&str> = content.split('\n').collect();
    let widest = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
    Vec2::new(
        (widest as f32 * font_size * CHAR_WIDTH_RATIO).max(font_size),
        lines.len() as f32 * font_size * TEXT_LINE_HEIGHT,
    )
}

/// Break `content` into lines of at most `width / char width` characters,
/// splitting anywhere (not only on whitespace).
pub(crate) fn wrap_by_character(content: &str, width: f32, font_size: f32) -> Vec<String> {
    let per_line = ((width / (font_size * CHAR_WIDTH_RATIO)).floor() as usize).max(1);
    let mut lines = Vec::new();
    for paragraph in content.split('\n') {
        let chars: Vec<char> = paragraph.chars().collect();
        if chars.is_empty() {
            lines.push(String::new());
            continue;
        }
        for chunk in chars.chunks(per_line) {
            lines.push(chunk.iter().collect());
        }
    }
    lines
}

/// Points on the ellipse inscribed in a `size` box centred on `center`.
pub(crate) fn ellipse_points(center: Pos2, size: Vec2) -> Vec<Pos2> {
    let radius = size / 2.0;
    (0..ELLIPSE_SEGMENTS)
        .map(|i| {
            let t = i as f32 / ELLIPSE_SEGMENTS as f32 * std::f32::consts::TAU;
            Pos2::new(center.x + radius.x * t.cos(), center.y + radius.y * t.sin())
        })
        .collect()
}
