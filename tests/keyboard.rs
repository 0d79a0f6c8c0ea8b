use std::cell::RefCell;
use std::rc::Rc;

use egui::{pos2, vec2, Key, Modifiers, Pos2};
use whiteboard::element::Element;
use whiteboard::input::{InputLocation, KeyChord, PanelKind};
use whiteboard::{EditorAction, EditorConfig, EditorContext, InputEvent, KeyBindings, ToolKind};

/// Editor with one rect placed at (400, 300) and selected.
fn editor_with_selected_rect() -> EditorContext {
    let mut editor = EditorContext::new(EditorConfig::default());
    editor.set_surface_size(vec2(800.0, 600.0));
    editor.choose_tool(ToolKind::Rect);
    editor.choose_tool(ToolKind::Select);
    let id = editor.scene().elements()[0].id();
    editor.execute(whiteboard::Command::SetSelection(Some(id))).unwrap();
    editor
}

#[test]
fn test_delete_removes_selected_element() {
    let mut editor = editor_with_selected_rect();
    let _mounted = editor.mount();

    assert_eq!(editor.handle_key(Key::Delete, Modifiers::NONE), Some(EditorAction::Delete));

    assert!(editor.scene().is_empty());
    assert_eq!(editor.history().undo_stack().len(), 2);
    assert!(editor.undo());
    assert_eq!(editor.scene().len(), 1);
}

#[test]
fn test_delete_without_selection_does_nothing() {
    let mut editor = editor_with_selected_rect();
    let _mounted = editor.mount();
    editor.choose_tool(ToolKind::Select);

    editor.handle_key(Key::Delete, Modifiers::NONE);

    assert_eq!(editor.scene().len(), 1);
    assert_eq!(editor.history().undo_stack().len(), 1);
}

#[test]
fn test_command_c_duplicates_with_offset() {
    let mut editor = editor_with_selected_rect();
    let _mounted = editor.mount();
    let original = editor.scene().elements()[0].clone();

    assert_eq!(editor.handle_key(Key::C, Modifiers::COMMAND), Some(EditorAction::Duplicate));

    assert_eq!(editor.scene().len(), 2);
    let copy = &editor.scene().elements()[1];
    assert_ne!(copy.id(), original.id());
    assert_eq!(copy.rect().min, original.rect().min + vec2(5.0, 5.0));
    assert_eq!(editor.scene().selected(), Some(copy.id()));
}

#[test]
fn test_duplicate_selection_survives_undo_and_redo() {
    let mut editor = editor_with_selected_rect();
    let _mounted = editor.mount();
    let original = editor.scene().elements()[0].id();

    editor.handle_key(Key::C, Modifiers::COMMAND);
    let copy = editor.scene().selected().unwrap();
    assert_ne!(copy, original);

    editor.handle_key(Key::Z, Modifiers::COMMAND);
    assert_eq!(editor.scene().len(), 1);
    assert_eq!(editor.scene().selected(), Some(original));

    editor.handle_key(Key::Y, Modifiers::COMMAND);
    assert_eq!(editor.scene().len(), 2);
    assert_eq!(editor.scene().selected(), Some(copy));
}

#[test]
fn test_extra_modifiers_do_not_fire_bindings() {
    let mut editor = editor_with_selected_rect();
    let _mounted = editor.mount();
    let saves = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&saves);
    editor.set_save_fn(Box::new(move |_: &str, _: &str| {
        *counter.borrow_mut() += 1;
        Ok(())
    }));

    assert_eq!(editor.handle_key(Key::S, Modifiers::COMMAND | Modifiers::SHIFT), None);
    assert_eq!(editor.handle_key(Key::Z, Modifiers::COMMAND | Modifiers::SHIFT), None);
    assert_eq!(editor.handle_key(Key::Delete, Modifiers::ALT), None);

    assert_eq!(*saves.borrow(), 0);
    assert_eq!(editor.scene().len(), 1);
}

#[test]
fn test_shifted_chords_can_be_bound() {
    let mut bindings = KeyBindings::default();
    bindings.bind(KeyChord::command(Key::Z).with_shift(), EditorAction::Redo);

    assert_eq!(
        bindings.action_for(Key::Z, Modifiers::COMMAND | Modifiers::SHIFT),
        Some(EditorAction::Redo)
    );
    assert_eq!(bindings.action_for(Key::Z, Modifiers::COMMAND), Some(EditorAction::Undo));
}

#[test]
fn test_plain_c_is_not_bound() {
    let mut editor = editor_with_selected_rect();
    let _mounted = editor.mount();

    assert_eq!(editor.handle_key(Key::C, Modifiers::NONE), None);
    assert_eq!(editor.scene().len(), 1);
}

#[test]
fn test_undo_and_redo_keys() {
    let mut editor = editor_with_selected_rect();
    let _mounted = editor.mount();

    editor.handle_key(Key::Z, Modifiers::COMMAND);
    assert!(editor.scene().is_empty());

    editor.handle_key(Key::Y, Modifiers::COMMAND);
    assert_eq!(editor.scene().len(), 1);
}

#[test]
fn test_command_s_hands_document_to_save_fn() {
    let mut editor = editor_with_selected_rect();
    let _mounted = editor.mount();
    let saved = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&saved);
    editor.set_save_fn(Box::new(move |json: &str, id: &str| {
        sink.borrow_mut().push((json.to_owned(), id.to_owned()));
        Ok(())
    }));

    editor.handle_key(Key::S, Modifiers::COMMAND);

    let saved = saved.borrow();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].0, editor.serialize().unwrap());
    assert_eq!(saved[0].1, "default");
}

#[test]
fn test_keys_are_ignored_while_unmounted() {
    let mut editor = editor_with_selected_rect();

    assert_eq!(editor.handle_key(Key::Delete, Modifiers::NONE), None);
    assert_eq!(editor.scene().len(), 1);

    let mounted = editor.mount();
    drop(mounted);
    assert_eq!(editor.handle_key(Key::Z, Modifiers::COMMAND), None);
    assert_eq!(editor.scene().len(), 1);
}

#[test]
fn test_copy_event_duplicates() {
    let mut editor = editor_with_selected_rect();
    let _mounted = editor.mount();

    editor.handle_input(&InputEvent::Copy, Pos2::ZERO);

    assert_eq!(editor.scene().len(), 2);
}

#[test]
fn test_pointer_events_are_relative_to_canvas_origin() {
    let mut editor = editor_with_selected_rect();
    let _mounted = editor.mount();
    let origin = pos2(100.0, 50.0);
    let at = |position: Pos2| InputLocation {
        position,
        panel: PanelKind::Canvas,
    };

    // A click outside the rect, once the origin is accounted for
    editor.handle_input(&InputEvent::PointerDown { location: at(pos2(120.0, 70.0)) }, origin);
    editor.handle_input(&InputEvent::PointerUp { location: at(pos2(120.0, 70.0)) }, origin);
    assert_eq!(editor.scene().selected(), None);

    editor.handle_input(&InputEvent::PointerDown { location: at(pos2(500.0, 350.0)) }, origin);
    editor.handle_input(&InputEvent::PointerUp { location: at(pos2(500.0, 350.0)) }, origin);
    assert!(editor.scene().selected().is_some());
}

#[test]
fn test_custom_bindings() {
    let mut bindings = KeyBindings::default();
    bindings.unbind(KeyChord::plain(Key::Delete));
    bindings.bind(KeyChord::plain(Key::Backspace), EditorAction::Delete);
    let config = EditorConfig {
        key_bindings: bindings,
        ..Default::default()
    };
    let mut editor = EditorContext::new(config);
    let _mounted = editor.mount();
    editor.choose_tool(ToolKind::Circle);
    let id = editor.scene().elements()[0].id();
    editor.execute(whiteboard::Command::SetSelection(Some(id))).unwrap();

    assert_eq!(editor.handle_key(Key::Delete, Modifiers::NONE), None);
    assert_eq!(editor.handle_key(Key::Backspace, Modifiers::NONE), Some(EditorAction::Delete));
    assert!(editor.scene().is_empty());
}

#[test]
fn test_chords_for_lists_every_binding_of_an_action() {
    let mut bindings = KeyBindings::default();
    bindings.bind(KeyChord::command(Key::R), EditorAction::Redo);

    let chords: Vec<_> = bindings.chords_for(EditorAction::Redo).collect();

    assert_eq!(chords, vec![KeyChord::command(Key::Y), KeyChord::command(Key::R)]);
}
