mod commands;
mod history;

use thiserror::Error;

use crate::id_generator::ElementId;

pub use commands::Command;
pub use history::{CommandHistory, DEFAULT_HISTORY_LIMIT};

/// Result type for command operations
pub type CommandResult = Result<(), CommandError>;

/// Errors that can occur during command execution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The command refers to an element that is not in the scene
    #[error("Element {0} not found in scene")]
    ElementNotFound(ElementId),

    /// The element to add is already in the scene
    #[error("Element {0} is already in the scene")]
    DuplicateElement(ElementId),

    /// The before and after snapshots describe different elements
    #[error("Snapshot mismatch: {before} vs {after}")]
    SnapshotMismatch { before: ElementId, after: ElementId },
}
