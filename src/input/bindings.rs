use egui::{Key, Modifiers};
use serde::{Deserialize, Serialize};

/// Editor operations reachable from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditorAction {
    Delete,
    Duplicate,
    Save,
    Undo,
    Redo,
}

/// A key plus the modifiers that must be held with it.
///
/// `command` is the platform command modifier (Ctrl, or Cmd on macOS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyChord {
    pub key: Key,
    pub command: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
}

impl KeyChord {
    pub const fn plain(key: Key) -> Self {
        Self {
            key,
            command: false,
            shift: false,
            alt: false,
        }
    }

    pub const fn command(key: Key) -> Self {
        Self {
            command: true,
            ..Self::plain(key)
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    /// Exact match: modifiers not part of the chord must be released.
    pub fn matches(&self, key: Key, modifiers: Modifiers) -> bool {
        self.key == key
            && self.command == modifiers.command
            && self.shift == modifiers.shift
            && self.alt == modifiers.alt
    }
}

/// Declarative table of keyboard shortcuts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyBindings {
    bindings: Vec<(KeyChord, EditorAction)>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            bindings: vec![
                (KeyChord::plain(Key::Delete), EditorAction::Delete),
                (KeyChord::command(Key::C), EditorAction::Duplicate),
                (KeyChord::command(Key::S), EditorAction::Save),
                (KeyChord::command(Key::Z), EditorAction::Undo),
                (KeyChord::command(Key::Y), EditorAction::Redo),
            ],
        }
    }
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self { bindings: Vec::new() }
    }

    /// Add or rebind a chord.
    pub fn bind(&mut self, chord: KeyChord, action: EditorAction) {
        self.bindings.retain(|(existing, _)| *existing != chord);
        self.bindings.push((chord, action));
    }

    pub fn unbind(&mut self, chord: KeyChord) {
        self.bindings.retain(|(existing, _)| *existing != chord);
    }

    pub fn action_for(&self, key: Key, modifiers: Modifiers) -> Option<EditorAction> {
        self.bindings
            .iter()
            .find(|(chord, _)| chord.matches(key, modifiers))
            .map(|(_, action)| *action)
    }

    /// Chords bound to `action`, for menu hints.
    pub fn chords_for(&self, action: EditorAction) -> impl Iterator<Item = KeyChord> + '_ {
        self.bindings
            .iter()
            .filter(move |(_, bound)| *bound == action)
            .map(|(chord, _)| *chord)
    }
}
