use egui::{pos2, vec2, Pos2};
use whiteboard::element::{factory, Element, ElementType, ImageData, ShapeKind};
use whiteboard::style::{FontSize, StrokeWidth, StyleDefaults, StylePatch};
use whiteboard::Color;

fn rect_at(center: Pos2) -> ElementType {
    factory::create_shape(ShapeKind::Rect, center, &StyleDefaults::default())
}

#[test]
fn test_rect_hit_test_includes_tolerance() {
    let rect = rect_at(pos2(100.0, 100.0));

    assert!(rect.hit_test(pos2(100.0, 100.0)));
    assert!(rect.hit_test(pos2(52.0, 100.0)));
    assert!(!rect.hit_test(pos2(40.0, 100.0)));
}

#[test]
fn test_circle_hit_test_excludes_box_corners() {
    let circle = factory::create_shape(ShapeKind::Circle, pos2(0.0, 0.0), &StyleDefaults::default());

    assert!(circle.hit_test(pos2(60.0, 0.0)));
    assert!(!circle.hit_test(pos2(65.0, 65.0)));
}

#[test]
fn test_rotated_shape_bounds_grow() {
    let rect = rect_at(pos2(0.0, 0.0));
    let rotated = rect.patched(&StylePatch::Angle(45.0)).unwrap();

    assert!(rotated.rect().width() > rect.rect().width() + 30.0);
    assert!((rotated.rect().center() - rect.rect().center()).length() < 1e-3);
}

#[test]
fn test_line_hit_test_follows_rotation() {
    let line = factory::create_line(pos2(0.0, 0.0), &StyleDefaults::default());
    let ElementType::Line(inner) = &line else {
        panic!("expected a line");
    };
    let ends = inner.endpoints();

    assert!(line.hit_test(ends.start));
    assert!(line.hit_test(ends.end));
    assert!(line.hit_test(pos2(0.0, 0.0)));
    assert!(!line.hit_test(pos2(60.0, -60.0)));
}

#[test]
fn test_arrow_moves_as_one_unit() {
    let arrow = factory::create_arrow(pos2(0.0, 0.0), &StyleDefaults::default());
    let moved = arrow.translated(vec2(30.0, 40.0));

    let (ElementType::Arrow(before), ElementType::Arrow(after)) = (&arrow, &moved) else {
        panic!("expected arrows");
    };
    assert_eq!(after.shaft().start, before.shaft().start + vec2(30.0, 40.0));
    for (a, b) in before.head().iter().zip(after.head().iter()) {
        assert!((*b - *a - vec2(30.0, 40.0)).length() < 1e-3);
    }
    assert_eq!(moved.id(), arrow.id());
}

#[test]
fn test_arrow_rotates_about_its_centre() {
    let arrow = factory::create_arrow(pos2(0.0, 0.0), &StyleDefaults::default());
    let turned = arrow.patched(&StylePatch::Angle(90.0)).unwrap();

    let ElementType::Arrow(turned) = &turned else {
        panic!("expected an arrow");
    };
    let shaft = turned.shaft();
    // Horizontal before, vertical after
    assert!((shaft.start.x - shaft.end.x).abs() < 1e-3);
    assert!((shaft.length() - factory::ARROW_SHAFT_LENGTH).abs() < 1e-3);
}

#[test]
fn test_freehand_hit_test_along_path() {
    let path = factory::create_freehand(
        vec![pos2(0.0, 0.0), pos2(100.0, 0.0), pos2(100.0, 100.0)],
        Default::default(),
    );

    assert!(path.hit_test(pos2(50.0, 2.0)));
    assert!(path.hit_test(pos2(101.0, 50.0)));
    assert!(!path.hit_test(pos2(50.0, 50.0)));
}

#[test]
fn test_freehand_rect_is_padded_by_half_the_stroke() {
    let path = factory::create_freehand(vec![pos2(10.0, 10.0), pos2(30.0, 30.0)], Default::default());
    let rect = path.rect();

    assert_eq!(rect.min, pos2(7.5, 7.5));
    assert_eq!(rect.max, pos2(32.5, 32.5));
}

#[test]
fn test_patch_rejected_by_variants_without_the_attribute() {
    let rect = rect_at(pos2(0.0, 0.0));
    assert!(rect.patched(&StylePatch::FontSize(FontSize::new(30.0).unwrap())).is_none());

    let image = factory::create_image("a.png", None, pos2(0.0, 0.0), vec2(50.0, 50.0));
    assert!(image.patched(&StylePatch::Stroke(Color::BLACK)).is_none());

    let path = factory::create_freehand(vec![pos2(0.0, 0.0), pos2(5.0, 5.0)], Default::default());
    assert!(path.patched(&StylePatch::Fill(Color::WHITE)).is_none());
    assert!(path.patched(&StylePatch::StrokeWidth(StrokeWidth::new(9.0).unwrap())).is_some());
}

#[test]
fn test_text_font_size_change_remeasures() {
    let text = factory::create_text(pos2(0.0, 0.0), "hello", &StyleDefaults::default());
    let bigger = text.patched(&StylePatch::FontSize(FontSize::new(44.0).unwrap())).unwrap();

    assert!(bigger.rect().width() > text.rect().width() * 1.9);
    assert!(bigger.rect().height() > text.rect().height() * 1.9);
}

#[test]
fn test_sticky_wraps_by_character() {
    let content = "abcdefghijklmnopqrstuvw";
    let sticky = factory::create_sticky(pos2(0.0, 0.0), content, &StyleDefaults::default());
    let ElementType::Sticky(sticky) = &sticky else {
        panic!("expected a sticky note");
    };

    let lines = sticky.wrapped_lines();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines.concat(), content);
}

#[test]
fn test_duplicate_gets_fresh_id_and_offset() {
    let original = rect_at(pos2(100.0, 100.0));
    let copy = original.duplicate(vec2(5.0, 5.0));

    assert_ne!(copy.id(), original.id());
    assert_eq!(copy.rect().min, original.rect().min + vec2(5.0, 5.0));
    assert_eq!(copy.style_snapshot(), original.style_snapshot());
    assert_eq!(copy.element_type(), "rect");
}

#[test]
fn test_image_data_is_not_dumped_in_debug_output() {
    let data = ImageData::Bitmap {
        width: 2,
        height: 2,
        rgba: vec![0u8; 16].into(),
    };
    let printed = format!("{:?}", data);

    assert!(printed.contains("data_len: 16"));
    assert_eq!(data.natural_size(), vec2(2.0, 2.0));
}
