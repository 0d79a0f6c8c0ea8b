use std::cell::{Cell, RefCell};

use crate::event::{SceneEvent, SceneObserver};
use crate::scene::Scene;

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(usize);

/// A simple event bus for broadcasting scene events to registered observers
pub struct EventBus {
    observers: RefCell<Vec<(ObserverId, Box<dyn SceneObserver>)>>,
    next_id: Cell<usize>,
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        // When cloning, create a new empty event bus
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("observers", &format!("<{} observers>", self.observers.borrow().len()))
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Creates a new event bus
    pub fn new() -> Self {
        Self {
            observers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Subscribe an observer to receive events
    pub fn subscribe(&self, observer: Box<dyn SceneObserver>) -> ObserverId {
        let id = ObserverId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.observers.borrow_mut().push((id, observer));
        id
    }

    /// Remove an observer. Returns false if it was not subscribed.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|(observer_id, _)| *observer_id != id);
        observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Emit an event to all registered observers, in subscription order
    pub fn emit(&self, event: &SceneEvent, scene: &Scene) {
        let Ok(mut observers) = self.observers.try_borrow_mut() else {
            log::warn!("Dropping re-entrant scene event {:?}", event);
            return;
        };
        for (_, observer) in observers.iter_mut() {
            observer.on_scene_event(event, scene);
        }
    }
}
