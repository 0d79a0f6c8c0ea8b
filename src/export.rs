//! PNG export of the visible canvas.
//!
//! Geometry is filled and stroked as tiny-skia paths under the viewport
//! transform. Text is laid out as a small SVG fragment and rendered by resvg
//! with the proportional font egui ships, so exports look the same on every
//! machine.

use std::fmt::Write as _;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use egui::{Pos2, Vec2};
use image::{ImageFormat, RgbaImage};
use thiserror::Error;
use tiny_skia::{
    FillRule, FilterQuality, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapMut, PixmapPaint, Stroke,
    Transform,
};

use crate::element::{ElementType, ImageData, TEXT_LINE_HEIGHT};
use crate::geometry::Frame;
use crate::scene::Scene;
use crate::style::{Color, Opacity, TextStyle};
use crate::viewport::Viewport;

/// Distance from the top of a text line to its baseline, relative to the font size.
const BASELINE_RATIO: f32 = 0.8;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export: the canvas has no visible area")]
    EmptySurface,

    #[error("Failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

/// Render what the viewport shows into an image of the surface size.
pub fn rasterize(scene: &Scene, viewport: &Viewport) -> Result<RgbaImage, ExportError> {
    let size = viewport.surface_size();
    let (width, height) = (size.x.round() as u32, size.y.round() as u32);
    let mut pixmap = Pixmap::new(width, height).ok_or(ExportError::EmptySurface)?;
    pixmap.fill(skia_color(scene.background().unwrap_or(Color::WHITE)));

    let pan = viewport.pan();
    let view = Transform::from_row(viewport.zoom(), 0.0, 0.0, viewport.zoom(), pan.x, pan.y);
    let mut canvas = Canvas {
        pixmap: pixmap.as_mut(),
        view,
        fonts: None,
    };
    for element in scene.elements() {
        canvas.paint(element);
    }

    let mut rgba = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        rgba.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }
    RgbaImage::from_raw(width, height, rgba).ok_or(ExportError::EmptySurface)
}

/// [`rasterize`] and encode as PNG.
pub fn export_png(scene: &Scene, viewport: &Viewport) -> Result<Vec<u8>, ExportError> {
    let canvas = rasterize(scene, viewport)?;
    let mut bytes = Vec::new();
    canvas.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    log::info!("Exported {}x{} PNG ({} bytes)", canvas.width(), canvas.height(), bytes.len());
    Ok(bytes)
}

pub fn export_png_to_path(scene: &Scene, viewport: &Viewport, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let bytes = export_png(scene, viewport)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

fn skia_color(color: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn solid(color: Color, opacity: Opacity) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(skia_color(opacity.apply(color)));
    paint.anti_alias = true;
    paint
}

fn stroke(width: f32, cap: LineCap) -> Stroke {
    Stroke {
        width,
        line_cap: cap,
        line_join: LineJoin::Round,
        ..Default::default()
    }
}

fn polygon(points: &[Pos2]) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    let mut builder = PathBuilder::new();
    builder.move_to(first.x, first.y);
    for point in rest {
        builder.line_to(point.x, point.y);
    }
    builder.close();
    builder.finish()
}

fn polyline(points: &[Pos2]) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    let mut builder = PathBuilder::new();
    builder.move_to(first.x, first.y);
    for point in rest {
        builder.line_to(point.x, point.y);
    }
    builder.finish()
}

/// Rotation of `frame` about its centre, followed by `view`.
fn frame_transform(frame: &Frame, view: Transform) -> Transform {
    let center = frame.center();
    Transform::from_rotate_at(frame.angle, center.x, center.y).post_concat(view)
}

/// Premultiplied copy of straight-alpha image data.
fn image_pixmap(data: &ImageData) -> Option<Pixmap> {
    let [width, height] = data.pixel_size();
    let mut pixmap = Pixmap::new(width, height)?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(data.rgba().chunks_exact(4)) {
        *dst = tiny_skia::ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
    }
    Some(pixmap)
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Options whose font database holds egui's proportional font, and that font's family name.
fn text_options() -> Option<(usvg::Options<'static>, String)> {
    let definitions = egui::FontDefinitions::default();
    let name = definitions.families.get(&egui::FontFamily::Proportional)?.first()?;
    let data = definitions.font_data.get(name)?;

    let mut options = usvg::Options::default();
    let fontdb = Arc::make_mut(&mut options.fontdb);
    fontdb.load_font_data(data.font.to_vec());
    let family = fontdb.faces().next()?.families.first()?.0.clone();
    options.font_family = family.clone();
    Some((options, family))
}

struct Canvas<'a> {
    pixmap: PixmapMut<'a>,
    view: Transform,
    /// Loaded on the first text element
    fonts: Option<Option<(usvg::Options<'static>, String)>>,
}

impl Canvas<'_> {
    fn fill(&mut self, path: &tiny_skia::Path, color: Color, opacity: Opacity, transform: Transform) {
        self.pixmap
            .fill_path(path, &solid(color, opacity), FillRule::Winding, transform, None);
    }

    fn stroke(&mut self, path: &tiny_skia::Path, color: Color, opacity: Opacity, stroke: &Stroke) {
        self.pixmap
            .stroke_path(path, &solid(color, opacity), stroke, self.view, None);
    }

    fn paint(&mut self, element: &ElementType) {
        match element {
            ElementType::Shape(shape) => {
                let style = *shape.style();
                let Some(path) = polygon(&shape.outline()) else {
                    return;
                };
                self.fill(&path, style.fill, style.opacity, self.view);
                self.stroke(
                    &path,
                    style.stroke,
                    style.opacity,
                    &stroke(style.stroke_width.get(), LineCap::Butt),
                );
            }
            ElementType::Line(line) => {
                let style = *line.style();
                let segment = line.endpoints();
                if let Some(path) = polyline(&[segment.start, segment.end]) {
                    self.stroke(
                        &path,
                        style.stroke,
                        style.opacity,
                        &stroke(style.stroke_width.get(), LineCap::Butt),
                    );
                }
            }
            ElementType::Arrow(arrow) => {
                let style = *arrow.style();
                let outline = stroke(style.stroke_width.get(), LineCap::Butt);
                let shaft = arrow.shaft();
                if let Some(path) = polyline(&[shaft.start, shaft.end]) {
                    self.stroke(&path, style.stroke, style.opacity, &outline);
                }
                if let Some(head) = polygon(&arrow.head()) {
                    self.fill(&head, style.fill, style.opacity, self.view);
                    self.stroke(&head, style.stroke, style.opacity, &outline);
                }
            }
            ElementType::Freehand(path) => {
                let width = path.stroke_width().get();
                match path.points() {
                    [] => {}
                    [dot] => {
                        if let Some(circle) = PathBuilder::from_circle(dot.x, dot.y, width / 2.0) {
                            self.fill(&circle, path.stroke(), path.opacity(), self.view);
                        }
                    }
                    points => {
                        if let Some(line) = polyline(points) {
                            self.stroke(&line, path.stroke(), path.opacity(), &stroke(width, LineCap::Round));
                        }
                    }
                }
            }
            ElementType::Text(text) => {
                let style = *text.style();
                let frame = *text.frame();
                let transform = frame_transform(&frame, self.view);
                if let Some(background) = style.background {
                    if let Some(rect) = tiny_skia::Rect::from_xywh(
                        frame.origin.x,
                        frame.origin.y,
                        frame.size.x,
                        frame.size.y,
                    ) {
                        let path = PathBuilder::from_rect(rect);
                        self.fill(&path, background, style.opacity, transform);
                    }
                }
                let lines: Vec<&str> = text.content().lines().collect();
                self.paint_text(&lines, frame.origin, &style, transform);
            }
            ElementType::Sticky(sticky) => {
                let style = *sticky.style();
                let frame = *sticky.frame();
                let transform = frame_transform(&frame, self.view);
                if let Some(background) = style.background {
                    let outer = sticky.outer_rect();
                    if let Some(rect) = tiny_skia::Rect::from_ltrb(outer.min.x, outer.min.y, outer.max.x, outer.max.y) {
                        let path = PathBuilder::from_rect(rect);
                        self.fill(&path, background, style.opacity, transform);
                    }
                }
                let lines = sticky.wrapped_lines();
                let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
                self.paint_text(&lines, frame.origin, &style, transform);
            }
            ElementType::Image(image) => {
                let Some(pixels) = image.data().and_then(image_pixmap) else {
                    return;
                };
                let frame = *image.frame();
                let scale = Vec2::new(
                    frame.size.x / pixels.width() as f32,
                    frame.size.y / pixels.height() as f32,
                );
                let transform = Transform::from_row(scale.x, 0.0, 0.0, scale.y, frame.origin.x, frame.origin.y)
                    .post_concat(frame_transform(&frame, self.view));
                let paint = PixmapPaint {
                    opacity: image.opacity().get(),
                    quality: FilterQuality::Bilinear,
                    ..Default::default()
                };
                self.pixmap.draw_pixmap(0, 0, pixels.as_ref(), &paint, transform, None);
            }
        }
    }

    /// Lines stacked downwards from `origin` in unrotated scene space.
    fn paint_text(&mut self, lines: &[&str], origin: Pos2, style: &TextStyle, transform: Transform) {
        if lines.iter().all(|line| line.trim().is_empty()) {
            return;
        }
        let Some((options, family)) = self.fonts.get_or_insert_with(text_options) else {
            log::warn!("No font available for text export");
            return;
        };

        let font_size = style.font_size.get();
        let color = style.opacity.apply(style.fill);
        // Canvas of the fragment, large enough for every glyph
        let columns = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
        let width = (columns + 1) as f32 * font_size;
        let height = (lines.len() + 1) as f32 * font_size * TEXT_LINE_HEIGHT;
        let mut markup = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}"><text xml:space="preserve" font-family="{}" font-size="{}" fill="rgb({},{},{})" fill-opacity="{}">"#,
            width,
            height,
            escape_xml(family),
            font_size,
            color.r,
            color.g,
            color.b,
            f32::from(color.a) / 255.0
        );
        for (row, line) in lines.iter().enumerate() {
            let baseline = font_size * (BASELINE_RATIO + row as f32 * TEXT_LINE_HEIGHT);
            let _ = write!(markup, r#"<tspan x="0" y="{}">{}</tspan>"#, baseline, escape_xml(line));
        }
        markup.push_str("</text></svg>");

        match usvg::Tree::from_str(&markup, options) {
            Ok(tree) => {
                let transform = Transform::from_translate(origin.x, origin.y).post_concat(transform);
                resvg::render(&tree, transform, &mut self.pixmap);
            }
            Err(err) => log::warn!("Failed to lay out text for export: {}", err),
        }
    }
}
