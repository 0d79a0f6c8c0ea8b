use egui::{pos2, vec2};
use whiteboard::command::{Command, CommandError, CommandHistory};
use whiteboard::element::{factory, Element, ElementType, ShapeKind};
use whiteboard::style::{StrokeWidth, StyleDefaults, StylePatch};
use whiteboard::{Color, Scene};

fn rect_at(x: f32, y: f32) -> ElementType {
    factory::create_shape(ShapeKind::Rect, pos2(x, y), &StyleDefaults::default())
}

// Helper to create a scene with two recorded elements
fn create_test_scene() -> (Scene, CommandHistory) {
    let mut scene = Scene::new();
    let mut history = CommandHistory::new();

    history
        .execute(Command::add_element(rect_at(100.0, 100.0)), &mut scene)
        .unwrap();
    let stroke = factory::create_freehand(vec![pos2(10.0, 10.0), pos2(30.0, 30.0)], Default::default());
    history.execute(Command::add_element(stroke), &mut scene).unwrap();

    (scene, history)
}

#[test]
fn test_place_undo_redo_restores_identical_rect() {
    let mut scene = Scene::new();
    let mut history = CommandHistory::new();
    let rect = rect_at(100.0, 100.0);

    history.execute(Command::add_element(rect.clone()), &mut scene).unwrap();
    assert_eq!(history.undo_stack().len(), 1);
    assert_eq!(scene.len(), 1);

    assert!(history.undo(&mut scene));
    assert!(scene.is_empty());

    assert!(history.redo(&mut scene));
    assert_eq!(scene.elements(), &[rect]);
}

#[test]
fn test_undo_then_redo_reproduces_the_scene() {
    let (mut scene, mut history) = create_test_scene();
    let first = scene.elements()[0].id();
    let second = scene.elements()[1].id();

    let modify = Command::modify_element(&scene, first, &StylePatch::Stroke(Color::rgb(9, 9, 9))).unwrap();
    history.execute(modify, &mut scene).unwrap();
    let remove = Command::remove_element(&scene, second).unwrap();
    history.execute(remove, &mut scene).unwrap();
    let moved = Command::move_element(&scene, first, vec2(4.0, -2.0)).unwrap();
    history.execute(moved, &mut scene).unwrap();

    while history.can_undo() {
        let before = scene.elements().to_vec();
        assert!(history.undo(&mut scene));
        assert!(history.redo(&mut scene));
        assert_eq!(scene.elements(), before.as_slice());
        assert!(history.undo(&mut scene));
    }
    assert!(scene.is_empty());
}

#[test]
fn test_new_entry_after_undo_discards_redo() {
    let (mut scene, mut history) = create_test_scene();

    assert!(history.undo(&mut scene));
    assert!(history.can_redo());

    history.execute(Command::add_element(rect_at(0.0, 0.0)), &mut scene).unwrap();
    assert!(!history.can_redo());
    assert!(!history.redo(&mut scene));
}

#[test]
fn test_remove_undo_restores_z_order() {
    let (mut scene, mut history) = create_test_scene();
    let bottom = scene.elements()[0].id();

    let remove = Command::remove_element(&scene, bottom).unwrap();
    history.execute(remove, &mut scene).unwrap();
    assert_eq!(scene.len(), 1);

    history.undo(&mut scene);
    assert_eq!(scene.index_of(bottom), Some(0));
}

#[test]
fn test_move_command_snapshots_geometry() {
    let (mut scene, mut history) = create_test_scene();
    let id = scene.elements()[0].id();
    let original = scene.element(id).unwrap().rect();

    let cmd = Command::move_element(&scene, id, vec2(10.0, 20.0)).unwrap();
    history.execute(cmd, &mut scene).unwrap();
    assert_eq!(scene.element(id).unwrap().rect().min, original.min + vec2(10.0, 20.0));

    history.undo(&mut scene);
    assert_eq!(scene.element(id).unwrap().rect(), original);
}

#[test]
fn test_modify_of_unsupported_attribute_yields_no_command() {
    let (scene, _) = create_test_scene();
    let stroke_id = scene.elements()[1].id();

    assert!(Command::modify_element(&scene, stroke_id, &StylePatch::Fill(Color::WHITE)).is_none());
    assert!(
        Command::modify_element(&scene, stroke_id, &StylePatch::StrokeWidth(StrokeWidth::new(2.0).unwrap()))
            .is_some()
    );
}

#[test]
fn test_selection_is_never_recorded() {
    let (mut scene, mut history) = create_test_scene();
    let id = scene.elements()[0].id();

    history.execute(Command::SetSelection(Some(id)), &mut scene).unwrap();

    assert_eq!(scene.selected(), Some(id));
    assert_eq!(history.undo_stack().len(), 2);
}

#[test]
fn test_background_change_is_undoable() {
    let mut scene = Scene::new();
    let mut history = CommandHistory::new();

    let cmd = Command::set_background(&scene, Some(Color::rgb(1, 2, 3)));
    history.execute(cmd, &mut scene).unwrap();
    assert_eq!(scene.background(), Some(Color::rgb(1, 2, 3)));

    history.undo(&mut scene);
    assert_eq!(scene.background(), None);
}

#[test]
fn test_adding_a_present_element_fails_without_recording() {
    let (mut scene, mut history) = create_test_scene();
    let existing = scene.elements()[0].clone();

    let result = history.execute(Command::add_element(existing.clone()), &mut scene);

    assert_eq!(result, Err(CommandError::DuplicateElement(existing.id())));
    assert_eq!(history.undo_stack().len(), 2);
    assert_eq!(scene.len(), 2);
}

#[test]
fn test_stale_entry_is_discarded_on_undo() {
    let (mut scene, mut history) = create_test_scene();
    let top = scene.elements()[1].id();

    // Removed behind the history's back
    scene.remove(top);

    assert!(!history.undo(&mut scene));
    assert_eq!(history.undo_stack().len(), 1);
    assert!(!history.can_redo());
}

#[test]
fn test_history_is_bounded() {
    let mut scene = Scene::new();
    let mut history = CommandHistory::with_limit(3);

    for i in 0..5 {
        history
            .execute(Command::add_element(rect_at(i as f32, 0.0)), &mut scene)
            .unwrap();
    }

    assert_eq!(history.undo_stack().len(), 3);
    while history.undo(&mut scene) {}
    // The two oldest additions can no longer be undone
    assert_eq!(scene.len(), 2);
}

#[test]
fn test_clear_empties_both_stacks() {
    let (mut scene, mut history) = create_test_scene();
    history.undo(&mut scene);

    history.clear();

    assert!(!history.can_undo());
    assert!(!history.can_redo());
    assert!(!history.undo(&mut scene));
}
