use egui::{pos2, vec2};
use whiteboard::element::{factory, Element, ElementType, ImageData, ShapeKind, MIN_ELEMENT_SIZE};
use whiteboard::style::{BrushSettings, StrokeWidth, StyleDefaults};
use whiteboard::Color;

#[test]
fn test_rect_is_centred_with_default_size() {
    let rect = factory::create_shape(ShapeKind::Rect, pos2(200.0, 200.0), &StyleDefaults::default());

    let ElementType::Shape(shape) = &rect else {
        panic!("expected a shape");
    };
    assert_eq!(shape.kind(), ShapeKind::Rect);
    assert_eq!(shape.frame().origin, pos2(150.0, 150.0));
    assert_eq!(shape.frame().size, factory::RECT_SIZE);
}

#[test]
fn test_circle_uses_default_radius() {
    let circle = factory::create_shape(ShapeKind::Circle, pos2(0.0, 0.0), &StyleDefaults::default());

    assert_eq!(circle.rect().size(), vec2(140.0, 140.0));
    assert_eq!(circle.element_type(), "circle");
}

#[test]
fn test_shapes_take_the_current_style_defaults() {
    let style = StyleDefaults {
        stroke: Color::rgb(200, 0, 0),
        stroke_width: StrokeWidth::new(8.0).unwrap(),
        ..Default::default()
    };
    let triangle = factory::create_shape(ShapeKind::Triangle, pos2(0.0, 0.0), &style);
    let snapshot = triangle.style_snapshot();

    assert_eq!(snapshot.stroke, Some(Color::rgb(200, 0, 0)));
    assert_eq!(snapshot.stroke_width.map(StrokeWidth::get), Some(8.0));
    assert_eq!(snapshot.fill, Some(Color::TRANSPARENT_WHITE));
}

#[test]
fn test_text_defaults() {
    let text = factory::create_text(pos2(100.0, 100.0), factory::DEFAULT_TEXT, &StyleDefaults::default());

    let ElementType::Text(inner) = &text else {
        panic!("expected text");
    };
    assert_eq!(inner.content(), "Your text here");
    assert_eq!(inner.style().background, None);
    assert!((text.rect().center() - pos2(100.0, 100.0)).length() < 1e-3);
}

#[test]
fn test_sticky_defaults() {
    let sticky = factory::create_sticky(pos2(0.0, 0.0), "", &StyleDefaults::default());

    let ElementType::Sticky(inner) = &sticky else {
        panic!("expected a sticky note");
    };
    assert_eq!(inner.style().background, Some(factory::STICKY_BACKGROUND));
    assert_eq!(inner.style().fill, Color::WHITE);
    // Note body plus padding on both sides
    assert_eq!(sticky.rect().size(), vec2(190.0, 190.0));
}

#[test]
fn test_line_is_rotated_about_its_midpoint() {
    let line = factory::create_line(pos2(50.0, 50.0), &StyleDefaults::default());

    let ElementType::Line(inner) = &line else {
        panic!("expected a line");
    };
    assert_eq!(inner.angle(), factory::LINE_ANGLE);
    assert!((inner.endpoints().midpoint() - pos2(50.0, 50.0)).length() < 1e-3);
}

#[test]
fn test_arrow_head_overshoots_the_shaft() {
    let arrow = factory::create_arrow(pos2(0.0, 0.0), &StyleDefaults::default());

    let ElementType::Arrow(inner) = &arrow else {
        panic!("expected an arrow");
    };
    let shaft = inner.shaft();
    let apex = inner.head()[0];
    assert_eq!(shaft.length(), factory::ARROW_SHAFT_LENGTH);
    assert!((apex.x - (shaft.end.x + 5.0)).abs() < 1e-3);
    assert!(apex.y.abs() < 1e-3);
}

#[test]
fn test_freehand_takes_brush() {
    let brush = BrushSettings {
        color: Color::rgb(0, 0, 255),
        width: StrokeWidth::new(12.0).unwrap(),
    };
    let path = factory::create_freehand(vec![pos2(0.0, 0.0), pos2(1.0, 1.0)], brush);

    let freehand = path.as_freehand().unwrap();
    assert_eq!(freehand.stroke(), Color::rgb(0, 0, 255));
    assert_eq!(freehand.stroke_width().get(), 12.0);
    assert_eq!(freehand.points().len(), 2);
}

#[test]
fn test_image_is_centred_and_never_degenerate() {
    let data = ImageData::Bitmap {
        width: 1,
        height: 1,
        rgba: vec![0u8; 4].into(),
    };
    let image = factory::create_image("dot.png", Some(data), pos2(10.0, 10.0), vec2(0.0, 0.0));

    let inner = image.as_image().unwrap();
    assert_eq!(inner.size(), vec2(MIN_ELEMENT_SIZE, MIN_ELEMENT_SIZE));
    assert_eq!(inner.src(), "dot.png");
    assert!(inner.data().is_some());
}

#[test]
fn test_every_element_gets_a_unique_id() {
    let style = StyleDefaults::default();
    let ids: Vec<_> = (0..50)
        .map(|_| factory::create_shape(ShapeKind::Rect, pos2(0.0, 0.0), &style).id())
        .collect();

    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), ids.len());
}
