use std::cell::Cell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::element::ElementType;
use crate::event::{SceneEvent, SceneObserver};
use crate::scene::Scene;
use crate::style::Color;

/// Version written into every serialized document.
pub const SCENE_VERSION: u32 = 1;

/// Errors that can occur during document persistence operations
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to (de)serialize document: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to access document file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unsupported scene version {0}")]
    UnsupportedVersion(u32),

    #[error("No save callback configured")]
    NoSaveTarget,

    #[error("Save callback failed: {0}")]
    SaveFailed(String),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// The serialized form of a scene.
///
/// Objects carry only the attributes needed to rebuild them: no identifiers
/// and no decoded image payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDocument {
    pub scene_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
    #[serde(default)]
    pub objects: Vec<ElementType>,
}

impl SceneDocument {
    pub fn from_scene(scene: &Scene) -> Self {
        Self {
            scene_version: SCENE_VERSION,
            background: scene.background(),
            objects: scene.elements().to_vec(),
        }
    }

    /// Parse a document. Blank input means "no document" and yields `None`.
    pub fn parse(text: &str) -> PersistenceResult<Option<Self>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        let document: SceneDocument = serde_json::from_str(text)?;
        if document.scene_version == 0 || document.scene_version > SCENE_VERSION {
            return Err(PersistenceError::UnsupportedVersion(document.scene_version));
        }
        Ok(Some(document))
    }
}

/// Serialize the whole scene, z-order preserved.
pub fn serialize(scene: &Scene) -> PersistenceResult<String> {
    Ok(serde_json::to_string(&SceneDocument::from_scene(scene))?)
}

/// Replace the scene's contents with a serialized document.
///
/// The text is fully parsed before the scene is touched, so a malformed
/// document leaves the scene as it was. Blank text is a no-op and returns
/// `None`; otherwise returns the number of loaded objects.
pub fn deserialize(text: &str, scene: &mut Scene) -> PersistenceResult<Option<usize>> {
    let Some(document) = SceneDocument::parse(text)? else {
        log::debug!("No document to load");
        return Ok(None);
    };
    let count = document.objects.len();
    scene.replace_all(document.objects, document.background);
    log::info!("Loaded document with {} objects", count);
    Ok(Some(count))
}

/// Write the scene as pretty-printed JSON.
pub fn save_to_path(scene: &Scene, path: impl AsRef<Path>) -> PersistenceResult<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(&SceneDocument::from_scene(scene))?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)?;
    log::info!("Exported document to {}", path.display());
    Ok(())
}

/// Load a document written by [`save_to_path`] (or any serialized document).
pub fn load_from_path(path: impl AsRef<Path>, scene: &mut Scene) -> PersistenceResult<Option<usize>> {
    let text = fs::read_to_string(path.as_ref())?;
    deserialize(&text, scene)
}

/// Callback receiving `(serialized document, document id)` on save.
pub type SaveFn = Box<dyn FnMut(&str, &str) -> PersistenceResult<()>>;

/// Callback receiving the serialized document after every scene mutation.
pub type ChangeFn = Box<dyn FnMut(&str)>;

/// Connects the scene to the host's storage.
///
/// Saving is explicit (Cmd/Ctrl+S or the Save button); the bridge only tracks
/// whether the scene changed since the last successful save.
pub struct PersistenceBridge {
    save_fn: Option<SaveFn>,
    document_id: String,
    dirty: Rc<Cell<bool>>,
}

impl std::fmt::Debug for PersistenceBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceBridge")
            .field("document_id", &self.document_id)
            .field("has_save_fn", &self.save_fn.is_some())
            .field("dirty", &self.dirty.get())
            .finish()
    }
}

impl PersistenceBridge {
    pub fn new(document_id: impl Into<String>) -> Self {
        Self {
            save_fn: None,
            document_id: document_id.into(),
            dirty: Rc::new(Cell::new(false)),
        }
    }

    pub fn with_save_fn(mut self, save_fn: SaveFn) -> Self {
        self.save_fn = Some(save_fn);
        self
    }

    pub fn set_save_fn(&mut self, save_fn: SaveFn) {
        self.save_fn = Some(save_fn);
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn set_document_id(&mut self, document_id: impl Into<String>) {
        self.document_id = document_id.into();
    }

    /// True when the scene changed since the last successful save.
    pub fn dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Serialize the scene and hand it to the save callback.
    pub fn save(&mut self, scene: &Scene) -> PersistenceResult<()> {
        let json = serialize(scene)?;
        self.write(&json)?;
        log::info!("Saved document {} ({} objects)", self.document_id, scene.len());
        Ok(())
    }

    /// Persist an empty document, as done when the canvas is cleared.
    pub fn clear_and_save(&mut self) -> PersistenceResult<()> {
        self.write(&serialize(&Scene::new())?)?;
        log::info!("Cleared document {}", self.document_id);
        Ok(())
    }

    fn write(&mut self, json: &str) -> PersistenceResult<()> {
        let save_fn = self.save_fn.as_mut().ok_or(PersistenceError::NoSaveTarget)?;
        save_fn(json, &self.document_id)?;
        self.dirty.set(false);
        Ok(())
    }

    /// Observer that marks this bridge dirty on every change and forwards the
    /// serialized scene to `on_change`, if given.
    pub fn change_forwarder(&self, on_change: Option<ChangeFn>) -> ChangeForwarder {
        ChangeForwarder {
            dirty: Rc::clone(&self.dirty),
            on_change,
        }
    }
}

/// Scene observer created by [`PersistenceBridge::change_forwarder`].
pub struct ChangeForwarder {
    dirty: Rc<Cell<bool>>,
    on_change: Option<ChangeFn>,
}

impl SceneObserver for ChangeForwarder {
    fn on_scene_event(&mut self, _event: &SceneEvent, scene: &Scene) {
        self.dirty.set(true);
        let Some(on_change) = self.on_change.as_mut() else {
            return;
        };
        match serialize(scene) {
            Ok(json) => on_change(&json),
            Err(err) => log::error!("Failed to serialize scene for change callback: {}", err),
        }
    }
}
