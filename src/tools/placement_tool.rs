use egui::Pos2;

use crate::command::Command;
use crate::scene::Scene;
use crate::tools::{SelectionTool, Tool, ToolKind, ToolPreview};

/// Mode entered by choosing a shape, text, sticky, line or arrow.
///
/// The element itself is placed when the mode is chosen; afterwards the
/// canvas behaves as in select mode so the new element can be dragged.
#[derive(Debug, Clone)]
pub struct PlacementTool {
    kind: ToolKind,
    selection: SelectionTool,
}

impl PlacementTool {
    pub fn new(kind: ToolKind) -> Self {
        Self {
            kind,
            selection: SelectionTool::new(),
        }
    }

    pub fn kind(&self) -> ToolKind {
        self.kind
    }

    pub fn selection(&self) -> &SelectionTool {
        &self.selection
    }
}

impl Tool for PlacementTool {
    fn name(&self) -> &'static str {
        self.kind.name()
    }

    fn deactivate(&mut self, scene: &Scene) {
        self.selection.deactivate(scene);
    }

    fn on_pointer_down(&mut self, pos: Pos2, scene: &Scene) -> Option<Command> {
        self.selection.on_pointer_down(pos, scene)
    }

    fn on_pointer_move(&mut self, pos: Pos2, scene: &Scene) -> Option<Command> {
        self.selection.on_pointer_move(pos, scene)
    }

    fn on_pointer_up(&mut self, pos: Pos2, scene: &Scene) -> Option<Command> {
        self.selection.on_pointer_up(pos, scene)
    }

    fn preview(&self) -> Option<ToolPreview<'_>> {
        self.selection.preview()
    }
}
