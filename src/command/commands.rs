use egui::Vec2;

use super::{CommandError, CommandResult};
use crate::element::{Element, ElementType};
use crate::id_generator::ElementId;
use crate::scene::Scene;
use crate::style::{Color, StylePatch};

/// Reversible edits to the scene.
///
/// Each command carries full snapshots of what it changes, so undoing and then
/// redoing restores the scene exactly, ids included.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Insert an element; `None` places it on top of the z-order
    AddElement {
        element: ElementType,
        index: Option<usize>,
        /// When set, the new element is selected and undo restores this selection
        reselect: Option<Option<ElementId>>,
    },

    /// Remove an element, remembering where it sat in the z-order
    RemoveElement { element: ElementType, index: usize },

    /// Attribute change on one element
    ModifyElement {
        before: ElementType,
        after: ElementType,
    },

    /// Completed drag of one element
    MoveElement {
        before: ElementType,
        after: ElementType,
    },

    /// Change the canvas background
    SetBackground {
        before: Option<Color>,
        after: Option<Color>,
    },

    /// Change the selection; not recorded in history
    SetSelection(Option<ElementId>),
}

impl Command {
    pub fn add_element(element: ElementType) -> Self {
        Command::AddElement {
            element,
            index: None,
            reselect: None,
        }
    }

    /// Add `element` on top and select it. Undo puts back the current selection.
    pub fn add_selected(scene: &Scene, element: ElementType) -> Self {
        Command::AddElement {
            element,
            index: None,
            reselect: Some(scene.selected()),
        }
    }

    /// Snapshot the element for removal. `None` if the id is absent.
    pub fn remove_element(scene: &Scene, id: ElementId) -> Option<Self> {
        let index = scene.index_of(id)?;
        Some(Command::RemoveElement {
            element: scene.elements()[index].clone(),
            index,
        })
    }

    /// Snapshot the element before and after `patch`. `None` if the id is
    /// absent or the element has no such attribute.
    pub fn modify_element(scene: &Scene, id: ElementId, patch: &StylePatch) -> Option<Self> {
        let before = scene.element(id)?.clone();
        let after = before.patched(patch)?;
        Some(Command::ModifyElement { before, after })
    }

    /// Snapshot the element before and after moving it by `delta`.
    pub fn move_element(scene: &Scene, id: ElementId, delta: Vec2) -> Option<Self> {
        let before = scene.element(id)?.clone();
        let after = before.translated(delta);
        Some(Command::MoveElement { before, after })
    }

    pub fn set_background(scene: &Scene, color: Option<Color>) -> Self {
        Command::SetBackground {
            before: scene.background(),
            after: color,
        }
    }

    /// Execute the command against the scene
    pub fn execute(&self, scene: &mut Scene) -> CommandResult {
        match self {
            Command::AddElement {
                element,
                index,
                reselect,
            } => {
                let id = element.id();
                if scene.index_of(id).is_some() {
                    return Err(CommandError::DuplicateElement(id));
                }
                let index = index.unwrap_or(scene.len());
                scene.insert(index, element.clone());
                if reselect.is_some() {
                    scene.select(Some(id));
                }
                Ok(())
            }

            Command::RemoveElement { element, .. } => {
                let id = element.id();
                scene.remove(id).ok_or(CommandError::ElementNotFound(id))?;
                Ok(())
            }

            Command::ModifyElement { before, after } | Command::MoveElement { before, after } => {
                restore(scene, before, after)
            }

            Command::SetBackground { after, .. } => {
                scene.set_background(*after);
                Ok(())
            }

            Command::SetSelection(id) => {
                scene.select(*id);
                Ok(())
            }
        }
    }

    /// Revert the command's effect on the scene
    pub fn undo(&self, scene: &mut Scene) -> CommandResult {
        match self {
            Command::AddElement { element, reselect, .. } => {
                let id = element.id();
                scene.remove(id).ok_or(CommandError::ElementNotFound(id))?;
                if let Some(previous) = reselect {
                    scene.select(*previous);
                }
                Ok(())
            }

            Command::RemoveElement { element, index } => {
                let id = element.id();
                if scene.index_of(id).is_some() {
                    return Err(CommandError::DuplicateElement(id));
                }
                scene.insert(*index, element.clone());
                Ok(())
            }

            Command::ModifyElement { before, after } | Command::MoveElement { before, after } => {
                restore(scene, after, before)
            }

            Command::SetBackground { before, .. } => {
                scene.set_background(*before);
                Ok(())
            }

            // Selection is never recorded, so there is nothing to revert
            Command::SetSelection(_) => Ok(()),
        }
    }

    /// Returns true if the command is recorded in history
    pub fn can_undo(&self) -> bool {
        !matches!(self, Command::SetSelection(_))
    }

    /// Short label for logs and the history panel
    pub fn label(&self) -> &'static str {
        match self {
            Command::AddElement { .. } => "Add",
            Command::RemoveElement { .. } => "Remove",
            Command::ModifyElement { .. } => "Modify",
            Command::MoveElement { .. } => "Move",
            Command::SetBackground { .. } => "Background",
            Command::SetSelection(_) => "Select",
        }
    }
}

/// Swap the `from` snapshot for the `to` snapshot of the same element.
fn restore(scene: &mut Scene, from: &ElementType, to: &ElementType) -> CommandResult {
    let id = from.id();
    if to.id() != id {
        return Err(CommandError::SnapshotMismatch {
            before: id,
            after: to.id(),
        });
    }
    if scene.replace(id, to.clone()) {
        Ok(())
    } else {
        Err(CommandError::ElementNotFound(id))
    }
}
