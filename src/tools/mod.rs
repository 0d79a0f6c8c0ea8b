use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::element::{factory, ElementType, ShapeKind};
use crate::id_generator::ElementId;
use crate::scene::Scene;
use crate::style::{BrushSettings, StyleDefaults};

/// Tool trait defines the interface for all canvas tools
///
/// Positions are in scene coordinates. A tool never mutates the scene itself;
/// it hands back at most one command per pointer event for the editor to run.
pub trait Tool {
    /// Return the name of the tool
    fn name(&self) -> &'static str;

    /// Called when the tool is selected (activated).
    fn activate(&mut self, _scene: &Scene) {
        // default: do nothing
    }

    /// Called when the tool is deselected. Discards any in-flight gesture.
    fn deactivate(&mut self, scene: &Scene);

    /// Handle pointer press on the canvas.
    fn on_pointer_down(&mut self, pos: Pos2, scene: &Scene) -> Option<Command>;

    /// Handle pointer movement while the pointer is held down.
    fn on_pointer_move(&mut self, pos: Pos2, scene: &Scene) -> Option<Command>;

    /// Handle pointer release. Returns the command that finalizes the gesture.
    fn on_pointer_up(&mut self, pos: Pos2, scene: &Scene) -> Option<Command>;

    /// Transient feedback for the gesture in progress.
    fn preview(&self) -> Option<ToolPreview<'_>> {
        None
    }
}

/// What the renderer should overlay while a gesture is in progress.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolPreview<'a> {
    /// An element being dragged, drawn at its scene position plus `offset`
    Drag { id: ElementId, offset: Vec2 },
    /// A freehand path being captured
    Stroke {
        points: &'a [Pos2],
        brush: BrushSettings,
    },
}

// Tool implementations
mod draw_tool;
mod placement_tool;
mod selection_tool;

pub use draw_tool::{DrawState, DrawTool};
pub use placement_tool::PlacementTool;
pub use selection_tool::{SelectionState, SelectionTool};

/// The toolbar modes. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ToolKind {
    #[default]
    Select,
    Draw,
    Text,
    Sticky,
    Arrow,
    Line,
    Circle,
    Rect,
    Triangle,
}

impl ToolKind {
    pub const ALL: [ToolKind; 9] = [
        ToolKind::Select,
        ToolKind::Draw,
        ToolKind::Text,
        ToolKind::Sticky,
        ToolKind::Arrow,
        ToolKind::Line,
        ToolKind::Circle,
        ToolKind::Rect,
        ToolKind::Triangle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "Select",
            ToolKind::Draw => "Draw",
            ToolKind::Text => "Text",
            ToolKind::Sticky => "Sticky",
            ToolKind::Arrow => "Arrow",
            ToolKind::Line => "Line",
            ToolKind::Circle => "Circle",
            ToolKind::Rect => "Rect",
            ToolKind::Triangle => "Triangle",
        }
    }

    /// True for the modes that place an element when chosen.
    pub fn is_placement(self) -> bool {
        !matches!(self, ToolKind::Select | ToolKind::Draw)
    }

    /// The element a placement mode drops onto the canvas, centred on `center`.
    pub fn placement_element(self, center: Pos2, style: &StyleDefaults) -> Option<ElementType> {
        let element = match self {
            ToolKind::Select | ToolKind::Draw => return None,
            ToolKind::Text => factory::create_text(center, factory::DEFAULT_TEXT, style),
            ToolKind::Sticky => factory::create_sticky(center, "", style),
            ToolKind::Arrow => factory::create_arrow(center, style),
            ToolKind::Line => factory::create_line(center, style),
            ToolKind::Circle => factory::create_shape(ShapeKind::Circle, center, style),
            ToolKind::Rect => factory::create_shape(ShapeKind::Rect, center, style),
            ToolKind::Triangle => factory::create_shape(ShapeKind::Triangle, center, style),
        };
        Some(element)
    }
}

/// Enum representing all available tool types
/// This allows us to avoid using Box<dyn Tool> and simplifies memory management
#[derive(Debug, Clone)]
pub enum ToolType {
    Selection(SelectionTool),
    Draw(DrawTool),
    Placement(PlacementTool),
}

impl Tool for ToolType {
    fn name(&self) -> &'static str {
        match self {
            Self::Selection(tool) => tool.name(),
            Self::Draw(tool) => tool.name(),
            Self::Placement(tool) => tool.name(),
        }
    }

    fn activate(&mut self, scene: &Scene) {
        match self {
            Self::Selection(tool) => tool.activate(scene),
            Self::Draw(tool) => tool.activate(scene),
            Self::Placement(tool) => tool.activate(scene),
        }
    }

    fn deactivate(&mut self, scene: &Scene) {
        match self {
            Self::Selection(tool) => tool.deactivate(scene),
            Self::Draw(tool) => tool.deactivate(scene),
            Self::Placement(tool) => tool.deactivate(scene),
        }
    }

    fn on_pointer_down(&mut self, pos: Pos2, scene: &Scene) -> Option<Command> {
        match self {
            Self::Selection(tool) => tool.on_pointer_down(pos, scene),
            Self::Draw(tool) => tool.on_pointer_down(pos, scene),
            Self::Placement(tool) => tool.on_pointer_down(pos, scene),
        }
    }

    fn on_pointer_move(&mut self, pos: Pos2, scene: &Scene) -> Option<Command> {
        match self {
            Self::Selection(tool) => tool.on_pointer_move(pos, scene),
            Self::Draw(tool) => tool.on_pointer_move(pos, scene),
            Self::Placement(tool) => tool.on_pointer_move(pos, scene),
        }
    }

    fn on_pointer_up(&mut self, pos: Pos2, scene: &Scene) -> Option<Command> {
        match self {
            Self::Selection(tool) => tool.on_pointer_up(pos, scene),
            Self::Draw(tool) => tool.on_pointer_up(pos, scene),
            Self::Placement(tool) => tool.on_pointer_up(pos, scene),
        }
    }

    fn preview(&self) -> Option<ToolPreview<'_>> {
        match self {
            Self::Selection(tool) => tool.preview(),
            Self::Draw(tool) => tool.preview(),
            Self::Placement(tool) => tool.preview(),
        }
    }
}

// Factory function to create the tool behind a toolbar mode
pub fn new_tool(kind: ToolKind, brush: BrushSettings) -> ToolType {
    match kind {
        ToolKind::Select => ToolType::Selection(SelectionTool::new()),
        ToolKind::Draw => ToolType::Draw(DrawTool::new(brush)),
        kind => ToolType::Placement(PlacementTool::new(kind)),
    }
}

// Helper methods for ToolType
impl ToolType {
    pub fn as_draw_tool_mut(&mut self) -> Option<&mut DrawTool> {
        match self {
            Self::Draw(tool) => Some(tool),
            _ => None,
        }
    }

    pub fn is_selection_tool(&self) -> bool {
        matches!(self, Self::Selection(_))
    }

    /// True while a drag or capture is underway.
    pub fn has_active_gesture(&self) -> bool {
        match self {
            Self::Selection(tool) => !matches!(tool.state(), SelectionState::Idle),
            Self::Draw(tool) => !matches!(tool.state(), DrawState::Idle),
            Self::Placement(tool) => !matches!(tool.selection().state(), SelectionState::Idle),
        }
    }
}
