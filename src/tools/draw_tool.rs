use egui::Pos2;

use crate::command::Command;
use crate::element::factory;
use crate::scene::Scene;
use crate::style::BrushSettings;
use crate::tools::{Tool, ToolPreview};

/// Capture state of the freehand tool
#[derive(Debug, Clone, PartialEq)]
pub enum DrawState {
    Idle,
    Capturing { points: Vec<Pos2> },
}

/// Freehand drawing with the current brush.
///
/// One drag becomes one path. Captures with fewer than two samples are
/// dropped.
#[derive(Debug, Clone)]
pub struct DrawTool {
    state: DrawState,
    brush: BrushSettings,
}

impl DrawTool {
    pub fn new(brush: BrushSettings) -> Self {
        Self {
            state: DrawState::Idle,
            brush,
        }
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    pub fn brush(&self) -> BrushSettings {
        self.brush
    }

    /// Change the brush. Applies to the capture in progress as well.
    pub fn set_brush(&mut self, brush: BrushSettings) {
        self.brush = brush;
    }
}

impl Tool for DrawTool {
    fn name(&self) -> &'static str {
        "Draw"
    }

    fn activate(&mut self, _scene: &Scene) {
        // Reset any in-progress path when activated
        self.state = DrawState::Idle;
    }

    fn deactivate(&mut self, _scene: &Scene) {
        // Clear any in-progress path when deactivated
        self.state = DrawState::Idle;
    }

    fn on_pointer_down(&mut self, pos: Pos2, _scene: &Scene) -> Option<Command> {
        self.state = DrawState::Capturing { points: vec![pos] };
        None // No command yet (not finalized)
    }

    fn on_pointer_move(&mut self, pos: Pos2, _scene: &Scene) -> Option<Command> {
        if let DrawState::Capturing { points } = &mut self.state {
            if points.last() != Some(&pos) {
                points.push(pos);
            }
        }
        None
    }

    fn on_pointer_up(&mut self, pos: Pos2, _scene: &Scene) -> Option<Command> {
        let DrawState::Capturing { mut points } = std::mem::replace(&mut self.state, DrawState::Idle) else {
            return None;
        };
        if points.last() != Some(&pos) {
            points.push(pos);
        }
        if points.len() < 2 {
            log::debug!("Dropping freehand capture with {} sample(s)", points.len());
            return None;
        }
        Some(Command::add_element(factory::create_freehand(points, self.brush)))
    }

    fn preview(&self) -> Option<ToolPreview<'_>> {
        match &self.state {
            DrawState::Capturing { points } => Some(ToolPreview::Stroke {
                points,
                brush: self.brush,
            }),
            DrawState::Idle => None,
        }
    }
}
