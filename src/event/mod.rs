mod bus;
mod events;

pub use bus::{EventBus, ObserverId};
pub use events::SceneEvent;

use crate::scene::Scene;

/// Receives scene change notifications synchronously, after the mutation.
pub trait SceneObserver {
    fn on_scene_event(&mut self, event: &SceneEvent, scene: &Scene);
}

impl<F> SceneObserver for F
where
    F: FnMut(&SceneEvent, &Scene),
{
    fn on_scene_event(&mut self, event: &SceneEvent, scene: &Scene) {
        self(event, scene)
    }
}
