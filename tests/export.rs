use egui::{pos2, vec2};
use image::RgbaImage;
use whiteboard::assets::rasterize_svg;
use whiteboard::element::{factory, ShapeKind};
use whiteboard::export::{export_png, rasterize, ExportError};
use whiteboard::style::StyleDefaults;
use whiteboard::{Color, Scene, Viewport};

fn red_rect_scene() -> Scene {
    let style = StyleDefaults {
        fill: Color::rgb(255, 0, 0),
        ..Default::default()
    };
    let mut scene = Scene::new();
    scene.add(factory::create_shape(ShapeKind::Rect, pos2(100.0, 100.0), &style));
    scene
}

#[test]
fn test_rect_is_filled_and_outlined() {
    let viewport = Viewport::new(vec2(200.0, 200.0));

    let canvas = rasterize(&red_rect_scene(), &viewport).unwrap();

    assert_eq!(canvas.dimensions(), (200, 200));
    assert_eq!(canvas.get_pixel(100, 100).0, [255, 0, 0, 255]);
    assert_eq!(canvas.get_pixel(50, 100).0, [0, 0, 0, 255]);
    assert_eq!(canvas.get_pixel(10, 10).0, [255, 255, 255, 255]);
}

#[test]
fn test_background_fills_uncovered_pixels() {
    let mut scene = red_rect_scene();
    scene.set_background(Some(Color::rgb(0, 0, 255)));
    let viewport = Viewport::new(vec2(200.0, 200.0));

    let canvas = rasterize(&scene, &viewport).unwrap();

    assert_eq!(canvas.get_pixel(10, 10).0, [0, 0, 255, 255]);
    assert_eq!(canvas.get_pixel(100, 100).0, [255, 0, 0, 255]);
}

#[test]
fn test_export_follows_zoom() {
    let mut viewport = Viewport::new(vec2(200.0, 200.0)).with_pan_nudge(vec2(0.0, 0.0));
    viewport.set_zoom(0.5, pos2(0.0, 0.0));

    let canvas = rasterize(&red_rect_scene(), &viewport).unwrap();

    // The rect now spans 25..75 on screen
    assert_eq!(canvas.get_pixel(50, 50).0, [255, 0, 0, 255]);
    assert_eq!(canvas.get_pixel(100, 100).0, [255, 255, 255, 255]);
}

#[test]
fn test_empty_surface_cannot_be_exported() {
    let result = export_png(&red_rect_scene(), &Viewport::default());

    assert!(matches!(result, Err(ExportError::EmptySurface)));
}

#[test]
fn test_png_output_is_encoded() {
    let bytes = export_png(&red_rect_scene(), &Viewport::new(vec2(64.0, 48.0))).unwrap();

    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (64, 48));
}

fn count_pixels(canvas: &RgbaImage, region: std::ops::Range<u32>, test: impl Fn([u8; 4]) -> bool) -> usize {
    canvas
        .enumerate_pixels()
        .filter(|(x, y, _)| region.contains(x) && region.contains(y))
        .filter(|(_, _, pixel)| test(pixel.0))
        .count()
}

#[test]
fn test_text_glyphs_are_rasterized() {
    let mut scene = Scene::new();
    scene.add(factory::create_text(pos2(100.0, 100.0), "WWWWWWWW", &StyleDefaults::default()));

    let canvas = rasterize(&scene, &Viewport::new(vec2(200.0, 200.0))).unwrap();

    let inked = count_pixels(&canvas, 0..200, |[r, g, b, _]| r < 200 && g < 200 && b < 200);
    assert!(inked > 50, "only {} dark pixels", inked);
}

#[test]
fn test_sticky_text_is_drawn_over_its_note() {
    let mut scene = Scene::new();
    scene.add(factory::create_sticky(pos2(100.0, 100.0), "WWWW WWWW", &StyleDefaults::default()));

    let canvas = rasterize(&scene, &Viewport::new(vec2(200.0, 200.0))).unwrap();

    // White glyphs lift the blue channel well above the note's
    let glyphs = count_pixels(&canvas, 10..190, |[_, _, b, _]| b > 140);
    assert!(glyphs > 20, "only {} glyph pixels", glyphs);
    assert_eq!(canvas.get_pixel(15, 15).0, [0x8b, 0xc3, 0x4a, 255]);
}

#[test]
fn test_vector_images_are_exported() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10"><rect width="20" height="10" fill="#0000ff"/></svg>"##;
    let data = rasterize_svg(svg).unwrap();
    let mut scene = Scene::new();
    scene.add(factory::create_image("logo.svg", Some(data), pos2(100.0, 100.0), vec2(120.0, 60.0)));

    let canvas = rasterize(&scene, &Viewport::new(vec2(200.0, 200.0))).unwrap();

    assert_eq!(canvas.get_pixel(100, 100).0, [0, 0, 255, 255]);
    assert_eq!(canvas.get_pixel(100, 20).0, [255, 255, 255, 255]);
}
