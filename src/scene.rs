//! The authoritative store of drawable elements.

use egui::Pos2;

use crate::element::{Element, ElementType};
use crate::event::{EventBus, ObserverId, SceneEvent, SceneObserver};
use crate::id_generator::ElementId;
use crate::style::{Color, StylePatch};

/// Ordered collection of elements (index 0 is the bottom of the z-order), the
/// current selection and the canvas background.
///
/// Every mutating call emits exactly one [`SceneEvent`] to the subscribed
/// observers once the mutation is complete. Selection changes are not
/// notified.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    elements: Vec<ElementType>,
    selected: Option<ElementId>,
    background: Option<Color>,
    generation: u64,
    events: EventBus,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Box<dyn SceneObserver>) -> ObserverId {
        self.events.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.events.unsubscribe(id)
    }

    fn notify(&self, event: SceneEvent) {
        log::debug!("Scene event: {:?}", event);
        self.events.emit(&event, self);
    }

    /// Append an element on top of the z-order.
    pub fn add(&mut self, element: ElementType) -> ElementId {
        let index = self.elements.len();
        self.insert(index, element)
    }

    /// Insert an element at `index` (clamped to the end).
    ///
    /// An element whose id is already present replaces the existing one in
    /// place instead, so ids stay unique.
    pub fn insert(&mut self, index: usize, element: ElementType) -> ElementId {
        let id = element.id();
        if self.index_of(id).is_some() {
            log::warn!("Element {} already in scene, replacing", id);
            self.replace(id, element);
            return id;
        }
        let index = index.min(self.elements.len());
        self.elements.insert(index, element);
        self.notify(SceneEvent::Added { id, index });
        id
    }

    /// Remove an element, returning it with the index it occupied.
    ///
    /// Absent ids are a silent no-op. Removing the selected element clears the
    /// selection.
    pub fn remove(&mut self, id: ElementId) -> Option<(usize, ElementType)> {
        let index = self.index_of(id)?;
        let element = self.elements.remove(index);
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.notify(SceneEvent::Removed { id, index });
        Some((index, element))
    }

    /// Apply an attribute change to one element. Returns false when the id is
    /// absent or the element has no such attribute.
    pub fn modify(&mut self, id: ElementId, patch: &StylePatch) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        if !self.elements[index].apply_patch(patch) {
            log::debug!("{} does not support {}", self.elements[index].element_type(), patch.name());
            return false;
        }
        self.notify(SceneEvent::Modified { id });
        true
    }

    /// Swap in a whole element snapshot for the element with the same id.
    pub fn replace(&mut self, id: ElementId, element: ElementType) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        debug_assert_eq!(element.id(), id);
        self.elements[index] = element;
        self.notify(SceneEvent::Modified { id });
        true
    }

    /// Set or clear the selection. Selecting an absent id clears it.
    pub fn select(&mut self, id: Option<ElementId>) {
        self.selected = id.filter(|id| self.index_of(*id).is_some());
    }

    /// Remove every element and the background. Invalidates in-flight asset loads.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.selected = None;
        self.background = None;
        self.generation += 1;
        self.notify(SceneEvent::Cleared);
    }

    /// Replace the whole document. Invalidates in-flight asset loads.
    pub fn replace_all(&mut self, elements: Vec<ElementType>, background: Option<Color>) {
        self.elements = elements;
        self.selected = None;
        self.background = background;
        self.generation += 1;
        self.notify(SceneEvent::Loaded {
            count: self.elements.len(),
        });
    }

    pub fn set_background(&mut self, color: Option<Color>) {
        self.background = color;
        self.notify(SceneEvent::BackgroundChanged { color });
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn element(&self, id: ElementId) -> Option<&ElementType> {
        self.elements.iter().find(|element| element.id() == id)
    }

    /// Elements bottom to top.
    pub fn elements(&self) -> &[ElementType] {
        &self.elements
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    pub fn selected_element(&self) -> Option<&ElementType> {
        self.selected.and_then(|id| self.element(id))
    }

    /// Topmost element under `pos`.
    pub fn hit_test(&self, pos: Pos2) -> Option<ElementId> {
        self.elements
            .iter()
            .rev()
            .find(|element| element.hit_test(pos))
            .map(|element| element.id())
    }

    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|element| element.id() == id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Bumped by [`clear`](Self::clear) and [`replace_all`](Self::replace_all).
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
