use std::collections::HashMap;

use egui::epaint::{Mesh, TextShape};
use egui::emath::Rot2;
use egui::{Color32, ColorImage, FontId, Painter, Pos2, Rect, Shape, Stroke, TextureHandle, Vec2};

use crate::element::{Element, ElementType, ImageData, TEXT_LINE_HEIGHT};
use crate::id_generator::ElementId;
use crate::scene::Scene;
use crate::tools::ToolPreview;
use crate::viewport::Viewport;

/// Spacing of the background grid in scene units.
pub const GRID_SPACING: f32 = 50.0;

const SELECTION_COLOR: Color32 = Color32::from_rgb(0, 120, 215);
const GRID_COLOR: Color32 = Color32::from_gray(220);
const PLACEHOLDER_COLOR: Color32 = Color32::from_gray(160);

/// Paints a scene onto an egui canvas and caches image textures.
pub struct Renderer {
    ctx: egui::Context,
    textures: HashMap<ElementId, TextureHandle>,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("textures", &self.textures.len())
            .finish()
    }
}

/// Maps scene coordinates onto the canvas rectangle.
#[derive(Clone, Copy)]
struct Projection<'a> {
    viewport: &'a Viewport,
    origin: Pos2,
}

impl Projection<'_> {
    fn point(&self, world: Pos2) -> Pos2 {
        self.origin + self.viewport.world_to_screen(world).to_vec2()
    }

    fn length(&self, world: f32) -> f32 {
        world * self.viewport.zoom()
    }

    fn rect(&self, world: Rect) -> Rect {
        Rect::from_min_max(self.point(world.min), self.point(world.max))
    }
}

impl Renderer {
    pub fn new(ctx: &egui::Context) -> Self {
        Self {
            ctx: ctx.clone(),
            textures: HashMap::new(),
        }
    }

    /// Paint the whole canvas: background, grid, elements, selection and tool preview.
    pub fn render(
        &mut self,
        painter: &Painter,
        rect: Rect,
        scene: &Scene,
        viewport: &Viewport,
        preview: Option<ToolPreview<'_>>,
    ) {
        let projection = Projection {
            viewport,
            origin: rect.min,
        };
        let background = scene.background().map_or(Color32::WHITE, |color| color.to_color32());
        painter.rect_filled(rect, 0.0, background);

        if viewport.show_grid() {
            self.render_grid(painter, rect, projection);
        }

        let drag = match preview {
            Some(ToolPreview::Drag { id, offset }) => Some((id, offset)),
            _ => None,
        };
        for element in scene.elements() {
            match drag {
                Some((id, offset)) if id == element.id() => {
                    self.render_element(painter, projection, &element.translated(offset));
                }
                _ => self.render_element(painter, projection, element),
            }
        }

        if let Some(selected) = scene.selected_element() {
            let offset = drag.map_or(Vec2::ZERO, |(_, offset)| offset);
            let bounds = projection.rect(selected.rect().translate(offset)).expand(2.0);
            painter.rect_stroke(bounds, 0.0, Stroke::new(1.5, SELECTION_COLOR));
        }

        if let Some(ToolPreview::Stroke { points, brush }) = preview {
            let points: Vec<Pos2> = points.iter().map(|p| projection.point(*p)).collect();
            painter.add(Shape::line(
                points,
                Stroke::new(projection.length(brush.width.get()), brush.color.to_color32()),
            ));
        }

        self.prune_textures(scene);
    }

    fn render_grid(&self, painter: &Painter, rect: Rect, projection: Projection<'_>) {
        let step = projection.length(GRID_SPACING);
        if step < 4.0 {
            return;
        }
        let first = projection.point(Pos2::ZERO);
        let stroke = Stroke::new(1.0, GRID_COLOR);

        let mut x = rect.min.x + (first.x - rect.min.x).rem_euclid(step);
        while x < rect.max.x {
            painter.line_segment([Pos2::new(x, rect.min.y), Pos2::new(x, rect.max.y)], stroke);
            x += step;
        }
        let mut y = rect.min.y + (first.y - rect.min.y).rem_euclid(step);
        while y < rect.max.y {
            painter.line_segment([Pos2::new(rect.min.x, y), Pos2::new(rect.max.x, y)], stroke);
            y += step;
        }
    }

    fn render_element(&mut self, painter: &Painter, projection: Projection<'_>, element: &ElementType) {
        match element {
            ElementType::Shape(shape) => {
                let style = shape.style();
                let points = shape.outline().into_iter().map(|p| projection.point(p)).collect();
                painter.add(Shape::convex_polygon(
                    points,
                    style.opacity.apply(style.fill).to_color32(),
                    Stroke::new(
                        projection.length(style.stroke_width.get()),
                        style.opacity.apply(style.stroke).to_color32(),
                    ),
                ));
            }
            ElementType::Line(line) => {
                let style = line.style();
                let segment = line.endpoints();
                painter.line_segment(
                    [projection.point(segment.start), projection.point(segment.end)],
                    Stroke::new(
                        projection.length(style.stroke_width.get()),
                        style.opacity.apply(style.stroke).to_color32(),
                    ),
                );
            }
            ElementType::Arrow(arrow) => {
                let style = arrow.style();
                let stroke = Stroke::new(
                    projection.length(style.stroke_width.get()),
                    style.opacity.apply(style.stroke).to_color32(),
                );
                let shaft = arrow.shaft();
                painter.line_segment([projection.point(shaft.start), projection.point(shaft.end)], stroke);
                let head = arrow.head().iter().map(|p| projection.point(*p)).collect();
                painter.add(Shape::convex_polygon(
                    head,
                    style.opacity.apply(style.fill).to_color32(),
                    stroke,
                ));
            }
            ElementType::Freehand(path) => {
                let points = path.points().iter().map(|p| projection.point(*p)).collect();
                painter.add(Shape::line(
                    points,
                    Stroke::new(
                        projection.length(path.stroke_width().get()),
                        path.opacity().apply(path.stroke()).to_color32(),
                    ),
                ));
            }
            ElementType::Text(text) => {
                let style = text.style();
                let frame = text.frame();
                if let Some(background) = style.background {
                    let corners = frame.corners().iter().map(|p| projection.point(*p)).collect();
                    painter.add(Shape::convex_polygon(
                        corners,
                        style.opacity.apply(background).to_color32(),
                        Stroke::NONE,
                    ));
                }
                let color = style.opacity.apply(style.fill).to_color32();
                let font = FontId::proportional(projection.length(style.font_size.get()));
                let galley = painter.layout_no_wrap(text.content().to_owned(), font, color);
                let anchor = projection.point(frame.corners()[0]);
                painter.add(TextShape::new(anchor, galley, color).with_angle(frame.angle.to_radians()));
            }
            ElementType::Sticky(sticky) => {
                let style = sticky.style();
                let frame = sticky.frame();
                if let Some(background) = style.background {
                    let outer = sticky.outer_rect();
                    let corners = [
                        outer.left_top(),
                        outer.right_top(),
                        outer.right_bottom(),
                        outer.left_bottom(),
                    ]
                    .iter()
                    .map(|p| projection.point(frame.to_scene(*p)))
                    .collect();
                    painter.add(Shape::convex_polygon(
                        corners,
                        style.opacity.apply(background).to_color32(),
                        Stroke::NONE,
                    ));
                }
                let color = style.opacity.apply(style.fill).to_color32();
                let font_size = style.font_size.get();
                let line_height = font_size * TEXT_LINE_HEIGHT;
                let font = FontId::proportional(projection.length(font_size));
                for (row, line) in sticky.wrapped_lines().into_iter().enumerate() {
                    let local = frame.origin + Vec2::new(0.0, row as f32 * line_height);
                    let anchor = projection.point(frame.to_scene(local));
                    let galley = painter.layout_no_wrap(line, font.clone(), color);
                    painter.add(TextShape::new(anchor, galley, color).with_angle(frame.angle.to_radians()));
                }
            }
            ElementType::Image(image) => {
                let frame = image.frame();
                let texture = image.data().map(|data| self.texture_for(image.id(), data));
                let screen = Rect::from_min_size(
                    projection.point(frame.origin),
                    frame.size * projection.viewport.zoom(),
                );
                match texture {
                    Some(texture_id) => {
                        let tint = Color32::WHITE.gamma_multiply(image.opacity().get());
                        let mut mesh = Mesh::with_texture(texture_id);
                        mesh.add_rect_with_uv(screen, Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)), tint);
                        if frame.angle != 0.0 {
                            mesh.rotate(Rot2::from_angle(frame.angle.to_radians()), screen.center());
                        }
                        painter.add(Shape::mesh(mesh));
                    }
                    None => {
                        // Payload still loading
                        let corners = frame.corners().iter().map(|p| projection.point(*p)).collect();
                        painter.add(Shape::closed_line(corners, Stroke::new(1.0, PLACEHOLDER_COLOR)));
                    }
                }
            }
        }
    }

    /// Number of image textures currently uploaded.
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    fn texture_for(&mut self, id: ElementId, data: &ImageData) -> egui::TextureId {
        let texture = self.textures.entry(id).or_insert_with(|| {
            let [width, height] = data.pixel_size();
            let image = ColorImage::from_rgba_unmultiplied([width as usize, height as usize], data.rgba());
            self.ctx
                .load_texture(format!("image-{}", id), image, egui::TextureOptions::LINEAR)
        });
        texture.id()
    }

    /// Drop textures of images that left the scene.
    fn prune_textures(&mut self, scene: &Scene) {
        self.textures.retain(|id, _| scene.element(*id).is_some());
    }
}
