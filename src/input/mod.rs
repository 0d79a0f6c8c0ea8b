use egui::{Context, Key, Modifiers, PointerButton, Pos2, Rect};

mod bindings;
pub use bindings::{EditorAction, KeyBindings, KeyChord};

/// Represents which panel an input event occurred in
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelKind {
    /// The drawing canvas
    Canvas,
    /// For events not associated with a specific panel (like keyboard shortcuts)
    Global,
}

/// Represents the location where an input event occurred
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputLocation {
    /// The position in screen coordinates
    pub position: Pos2,
    /// The panel in which the event occurred
    pub panel: PanelKind,
}

/// Represents different types of input events that can occur in the application
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Primary button was pressed
    PointerDown { location: InputLocation },
    /// Pointer moved while the primary button is held
    PointerMove { location: InputLocation },
    /// Primary button was released
    PointerUp { location: InputLocation },
    /// A key went down
    Key { key: Key, modifiers: Modifiers },
    /// The platform copy shortcut; egui reports Cmd/Ctrl+C this way
    Copy,
}

/// Handles converting raw egui input into our domain-specific InputEvents
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    canvas_rect: Option<Rect>,
    pressed_on_canvas: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the canvas rectangle
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = Some(rect);
    }

    /// Determine which panel a position is in
    fn determine_panel(&self, pos: Pos2) -> PanelKind {
        match self.canvas_rect {
            Some(rect) if rect.contains(pos) => PanelKind::Canvas,
            _ => PanelKind::Global,
        }
    }

    /// Creates an InputLocation from a position
    fn make_location(&self, pos: Pos2) -> InputLocation {
        InputLocation {
            position: pos,
            panel: self.determine_panel(pos),
        }
    }

    /// Process raw egui input and generate our InputEvents.
    ///
    /// Pointer events are reported only for gestures that start on the canvas;
    /// once started, moves and the release are reported wherever they happen.
    /// Keys are skipped while a text field has focus.
    pub fn process_input(&mut self, ctx: &Context) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let wants_keyboard = ctx.wants_keyboard_input();

        ctx.input(|input| {
            let pos = input.pointer.interact_pos();

            if input.pointer.button_pressed(PointerButton::Primary) {
                if let Some(pos) = pos {
                    let location = self.make_location(pos);
                    if location.panel == PanelKind::Canvas {
                        self.pressed_on_canvas = true;
                        events.push(InputEvent::PointerDown { location });
                    }
                }
            }

            if self.pressed_on_canvas {
                if let Some(pos) = pos {
                    if Some(pos) != self.last_pointer_pos && input.pointer.button_down(PointerButton::Primary) {
                        events.push(InputEvent::PointerMove {
                            location: self.make_location(pos),
                        });
                    }
                }
                if input.pointer.button_released(PointerButton::Primary) {
                    let last = pos.or(self.last_pointer_pos);
                    if let Some(pos) = last {
                        events.push(InputEvent::PointerUp {
                            location: self.make_location(pos),
                        });
                    }
                    self.pressed_on_canvas = false;
                }
            }
            self.last_pointer_pos = pos;

            if wants_keyboard {
                return;
            }
            for event in &input.events {
                match event {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        modifiers,
                        ..
                    } => events.push(InputEvent::Key {
                        key: *key,
                        modifiers: *modifiers,
                    }),
                    egui::Event::Copy => events.push(InputEvent::Copy),
                    _ => {}
                }
            }
        });

        // Some backends report Cmd/Ctrl+C both as a key and as a copy event
        let has_copy_key = events.iter().any(|event| {
            matches!(event, InputEvent::Key { key: Key::C, modifiers } if modifiers.command)
        });
        if has_copy_key {
            events.retain(|event| *event != InputEvent::Copy);
        }

        events
    }
}
