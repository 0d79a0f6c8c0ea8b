use whiteboard::element::ElementType;
use whiteboard::panels::{DragDraft, TextDraft};
use whiteboard::{Element, EditorConfig, EditorContext, ElementId, StylePatch, ToolKind};

#[test]
fn test_drag_commits_once_when_released() {
    let mut draft = DragDraft::default();
    let committed = 3.0;

    // Each frame the widget adds its delta to what it was shown
    let mut shown = draft.value(committed);
    for _ in 0..10 {
        shown += 0.5;
        assert_eq!(draft.step(committed, shown, true, true), None);
        shown = draft.value(committed);
    }
    assert_eq!(shown, 8.0);

    assert_eq!(draft.step(committed, shown, false, false), Some(8.0));
    assert_eq!(draft.value(committed), committed);
}

#[test]
fn test_drag_back_to_start_commits_nothing() {
    let mut draft = DragDraft::default();

    draft.step(3.0, 4.0, true, true);
    draft.step(3.0, 3.0, true, true);

    assert_eq!(draft.step(3.0, 3.0, false, false), None);
}

#[test]
fn test_typed_value_commits_immediately() {
    let mut draft = DragDraft::default();

    assert_eq!(draft.step(22.0, 30.0, false, true), Some(30.0));
    assert_eq!(draft.step(22.0, 22.0, false, false), None);
}

#[test]
fn test_stroke_width_drag_is_one_history_entry() {
    let mut editor = EditorContext::new(EditorConfig::default());
    editor.choose_tool(ToolKind::Rect);
    editor.choose_tool(ToolKind::Select);
    let id = editor.scene().elements()[0].id();
    editor.execute(whiteboard::Command::SetSelection(Some(id))).unwrap();
    let entries = editor.history().undo_stack().len();

    let mut draft = DragDraft::default();
    let committed = 3.0;
    let mut commits = Vec::new();
    for value in [3.5, 4.0, 4.5, 5.0] {
        commits.extend(draft.step(committed, value, true, true));
    }
    commits.extend(draft.step(committed, 5.0, false, false));
    for width in commits {
        editor.apply_patch(StylePatch::StrokeWidth(whiteboard::style::StrokeWidth::new(width).unwrap()));
    }

    assert_eq!(editor.history().undo_stack().len(), entries + 1);
    assert_eq!(
        editor.selected_style().and_then(|style| style.stroke_width).map(|w| w.get()),
        Some(5.0)
    );
}

fn content_of(editor: &EditorContext) -> String {
    match editor.scene().selected_element() {
        Some(ElementType::Text(text)) => text.content().to_owned(),
        other => panic!("expected selected text, got {:?}", other),
    }
}

#[test]
fn test_typed_text_survives_frames_until_focus_is_lost() {
    let mut editor = EditorContext::new(EditorConfig::default());
    editor.choose_tool(ToolKind::Text);
    editor.choose_tool(ToolKind::Select);
    let id = editor.scene().elements()[0].id();
    editor.execute(whiteboard::Command::SetSelection(Some(id))).unwrap();
    let original = content_of(&editor);
    let mut draft = TextDraft::default();

    // Three frames of typing with the field focused
    for key in ["a", "b", "c"] {
        let content = content_of(&editor);
        draft.buffer(id, &content).push_str(key);
        draft.set_editing(true);
    }
    assert_eq!(content_of(&editor), original);

    let content = content_of(&editor);
    assert_eq!(draft.buffer(id, &content), &format!("{}abc", original));
    let patch = draft.finish(&content).unwrap();
    assert!(editor.apply_patch(patch));

    assert_eq!(content_of(&editor), format!("{}abc", original));
}

#[test]
fn test_unfocused_buffer_follows_the_element() {
    let mut draft = TextDraft::default();
    let first = ElementId::generate();
    let second = ElementId::generate();

    assert_eq!(draft.buffer(first, "one"), "one");
    // Undo changed the content while the field was not being edited
    assert_eq!(draft.buffer(first, "uno"), "uno");
    assert_eq!(draft.buffer(second, "two"), "two");
    assert_eq!(draft.finish("two"), None);
}
