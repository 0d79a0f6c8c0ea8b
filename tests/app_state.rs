use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use whiteboard::app::{store_config, CONFIG_KEY};
use whiteboard::{EditorConfig, EditorContext, ToolKind};

#[derive(Default)]
struct MemoryStorage(HashMap<String, String>);

impl eframe::Storage for MemoryStorage {
    fn get_string(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    fn set_string(&mut self, key: &str, value: String) {
        self.0.insert(key.to_owned(), value);
    }

    fn flush(&mut self) {}
}

#[test]
fn test_storing_config_never_saves_the_document() {
    let mut editor = EditorContext::new(EditorConfig::default());
    let saves = Rc::new(Cell::new(0));
    let counter = Rc::clone(&saves);
    editor.set_save_fn(Box::new(move |_: &str, _: &str| {
        counter.set(counter.get() + 1);
        Ok(())
    }));
    editor.choose_tool(ToolKind::Rect);
    assert!(editor.persistence().dirty());

    let mut storage = MemoryStorage::default();
    // eframe's auto-save timer fires repeatedly while the window is open
    for _ in 0..3 {
        store_config(&editor, &mut storage);
    }

    assert_eq!(saves.get(), 0);
    assert!(editor.persistence().dirty());
    let stored: Option<EditorConfig> = eframe::get_value(&storage, CONFIG_KEY);
    assert_eq!(stored, Some(editor.current_config()));
}
