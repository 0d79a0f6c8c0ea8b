use egui::{vec2, Key};
use whiteboard::command::DEFAULT_HISTORY_LIMIT;
use whiteboard::input::KeyChord;
use whiteboard::state::ConfigError;
use whiteboard::{Color, EditorAction, EditorConfig, EditorContext, ToolKind};

#[test]
fn test_missing_fields_take_defaults() {
    let config = EditorConfig::from_json(r#"{ "documentId": "board-3" }"#).unwrap();

    assert_eq!(config.document_id, "board-3");
    assert_eq!(config.history_limit, DEFAULT_HISTORY_LIMIT);
    assert_eq!(config.duplicate_offset, vec2(5.0, 5.0));
    assert_eq!(config.zoom_pan_nudge, vec2(10.0, 0.0));
    assert_eq!(config.style, whiteboard::StyleDefaults::default());
}

#[test]
fn test_style_colors_accept_css_notation() {
    let config = EditorConfig::from_json(r##"{ "style": { "stroke": "#ff0000", "fill": "rgba(0, 0, 255, 0.5)" } }"##).unwrap();

    assert_eq!(config.style.stroke, Color::rgb(255, 0, 0));
    assert_eq!(config.style.fill.b, 255);
    assert!(!config.style.fill.is_opaque());
}

#[test]
fn test_invalid_values_are_rejected() {
    assert!(matches!(
        EditorConfig::from_json(r#"{ "historyLimit": 0 }"#),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
        EditorConfig::from_json(r#"{ "imageFootprint": -1.0 }"#),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
        EditorConfig::from_json(r#"{ "style": { "strokeWidth": 0 } }"#),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(EditorConfig::from_json("not json"), Err(ConfigError::Parse(_))));
}

#[test]
fn test_config_survives_json_round_trip() {
    let mut config = EditorConfig {
        document_id: "round-trip".to_owned(),
        history_limit: 12,
        ..Default::default()
    };
    config.key_bindings.bind(KeyChord::command(Key::D), EditorAction::Duplicate);

    let parsed = EditorConfig::from_json(&config.to_json().unwrap()).unwrap();

    assert_eq!(parsed, config);
}

#[test]
fn test_editor_honours_history_limit() {
    let config = EditorConfig {
        history_limit: 2,
        ..Default::default()
    };
    let mut editor = EditorContext::new(config);

    for _ in 0..4 {
        editor.choose_tool(ToolKind::Circle);
    }

    assert_eq!(editor.history().undo_stack().len(), 2);
    while editor.undo() {}
    assert_eq!(editor.scene().len(), 2);
}

#[test]
fn test_current_config_tracks_edited_style() {
    let mut editor = EditorContext::new(EditorConfig::default());
    editor.apply_color(Color::rgb(1, 2, 3));
    editor.set_color_target(whiteboard::ColorTarget::Stroke);
    editor.apply_color(Color::rgb(9, 8, 7));

    let config = editor.current_config();

    assert_eq!(config.style.stroke, Color::rgb(9, 8, 7));
    assert_eq!(config.document_id, editor.config().document_id);
}

#[test]
fn test_load_reads_file() {
    let path = std::env::temp_dir().join(format!("whiteboard-config-{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "historyLimit": 7 }"#).unwrap();

    let config = EditorConfig::load(&path).unwrap();

    assert_eq!(config.history_limit, 7);
    let _ = std::fs::remove_file(path);
    assert!(matches!(
        EditorConfig::load("/no/such/config.json"),
        Err(ConfigError::Io(_))
    ));
}
