use crate::id_generator::ElementId;
use crate::style::Color;

/// Change notification emitted by the scene after every mutating call.
///
/// Exactly one event per call; bulk operations (clear, load) report once.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    Added { id: ElementId, index: usize },
    Removed { id: ElementId, index: usize },
    Modified { id: ElementId },
    Cleared,
    Loaded { count: usize },
    BackgroundChanged { color: Option<Color> },
}

impl SceneEvent {
    /// The element this event is about, if it concerns a single element.
    pub fn element_id(&self) -> Option<ElementId> {
        match self {
            SceneEvent::Added { id, .. }
            | SceneEvent::Removed { id, .. }
            | SceneEvent::Modified { id } => Some(*id),
            SceneEvent::Cleared | SceneEvent::Loaded { .. } | SceneEvent::BackgroundChanged { .. } => None,
        }
    }
}
