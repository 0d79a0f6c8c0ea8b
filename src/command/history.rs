use super::{Command, CommandResult};
use crate::scene::Scene;

/// Number of undoable entries kept unless configured otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Manages the history of executed commands for undo/redo functionality
#[derive(Debug, Clone)]
pub struct CommandHistory {
    /// Stack of commands that can be undone
    undo_stack: Vec<Command>,
    /// Stack of commands that can be redone
    redo_stack: Vec<Command>,
    /// Oldest entries are dropped beyond this many
    limit: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandHistory {
    /// Creates a new empty command history
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit,
        }
    }

    /// Execute a command and add it to the history if successful
    pub fn execute(&mut self, command: Command, scene: &mut Scene) -> CommandResult {
        command.execute(scene)?;
        log::debug!("Executed {}", command.label());

        if command.can_undo() {
            self.record(command);
        }
        Ok(())
    }

    /// Record an already applied command. Clears the redo stack.
    pub fn record(&mut self, command: Command) {
        if !command.can_undo() {
            return;
        }
        self.redo_stack.clear();
        self.undo_stack.push(command);
        if self.undo_stack.len() > self.limit {
            let excess = self.undo_stack.len() - self.limit;
            self.undo_stack.drain(..excess);
        }
    }

    /// Undo the last executed command. Returns false when there is nothing to undo.
    pub fn undo(&mut self, scene: &mut Scene) -> bool {
        let Some(command) = self.undo_stack.pop() else {
            return false;
        };
        match command.undo(scene) {
            Ok(()) => {
                log::debug!("Undid {}", command.label());
                self.redo_stack.push(command);
                true
            }
            Err(err) => {
                log::warn!("Discarding history entry {}: {}", command.label(), err);
                false
            }
        }
    }

    /// Redo the last undone command. Returns false when there is nothing to redo.
    pub fn redo(&mut self, scene: &mut Scene) -> bool {
        let Some(command) = self.redo_stack.pop() else {
            return false;
        };
        match command.execute(scene) {
            Ok(()) => {
                log::debug!("Redid {}", command.label());
                self.undo_stack.push(command);
                true
            }
            Err(err) => {
                log::warn!("Discarding history entry {}: {}", command.label(), err);
                false
            }
        }
    }

    /// Returns true if there are commands that can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are commands that can be redone
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Clear the command history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn undo_stack(&self) -> &[Command] {
        &self.undo_stack
    }

    pub fn redo_stack(&self) -> &[Command] {
        &self.redo_stack
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
        if self.undo_stack.len() > limit {
            let excess = self.undo_stack.len() - limit;
            self.undo_stack.drain(..excess);
        }
    }
}
