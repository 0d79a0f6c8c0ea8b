use egui::{Pos2, Vec2};
use log::debug;

use crate::command::Command;
use crate::id_generator::ElementId;
use crate::scene::Scene;
use crate::tools::{Tool, ToolPreview};

/// Pointer gesture state of the selection tool
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionState {
    Idle,
    /// Pointer went down on an element; `offset` is the drag so far
    Dragging {
        id: ElementId,
        start_pos: Pos2,
        offset: Vec2,
    },
}

/// Picks elements and drags them around.
///
/// The drag is previewed through [`Tool::preview`] and committed as a single
/// move command on release, so an aborted drag leaves the scene untouched.
#[derive(Debug, Clone)]
pub struct SelectionTool {
    state: SelectionState,
}

impl Default for SelectionTool {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionTool {
    pub fn new() -> Self {
        Self {
            state: SelectionState::Idle,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Abandon the current drag, if any.
    pub fn cancel(&mut self) {
        self.state = SelectionState::Idle;
    }
}

impl Tool for SelectionTool {
    fn name(&self) -> &'static str {
        "Selection"
    }

    fn deactivate(&mut self, _scene: &Scene) {
        self.cancel();
    }

    fn on_pointer_down(&mut self, pos: Pos2, scene: &Scene) -> Option<Command> {
        match scene.hit_test(pos) {
            Some(id) => {
                debug!("Pointer down on element {}", id);
                self.state = SelectionState::Dragging {
                    id,
                    start_pos: pos,
                    offset: Vec2::ZERO,
                };
                Some(Command::SetSelection(Some(id)))
            }
            None => {
                self.state = SelectionState::Idle;
                Some(Command::SetSelection(None))
            }
        }
    }

    fn on_pointer_move(&mut self, pos: Pos2, _scene: &Scene) -> Option<Command> {
        if let SelectionState::Dragging { start_pos, offset, .. } = &mut self.state {
            *offset = pos - *start_pos;
        }
        None
    }

    fn on_pointer_up(&mut self, pos: Pos2, scene: &Scene) -> Option<Command> {
        let SelectionState::Dragging { id, start_pos, .. } =
            std::mem::replace(&mut self.state, SelectionState::Idle)
        else {
            return None;
        };
        let delta = pos - start_pos;
        if delta == Vec2::ZERO {
            return None;
        }
        debug!("Finished dragging {} by {:?}", id, delta);
        Command::move_element(scene, id, delta)
    }

    fn preview(&self) -> Option<ToolPreview<'_>> {
        match &self.state {
            SelectionState::Dragging { id, offset, .. } if *offset != Vec2::ZERO => Some(ToolPreview::Drag {
                id: *id,
                offset: *offset,
            }),
            _ => None,
        }
    }
}
