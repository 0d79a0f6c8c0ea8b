//! The editor instance: one scene with its history, tools, viewport, storage
//! bridge and asset loader.
//!
//! Every user intent (pointer gestures, shortcuts, toolbar and property panel
//! actions, loaded assets) goes through the `EditorContext`, which turns it into
//! commands against the scene. Nothing here is global; several editors can
//! live side by side.
//!
//! # Example
//!
//! ```rust
//! use whiteboard::{EditorConfig, EditorContext, ToolKind};
//!
//! let mut editor = EditorContext::new(EditorConfig::default());
//! let _mounted = editor.mount();
//!
//! editor.choose_tool(ToolKind::Rect);
//! assert_eq!(editor.scene().len(), 1);
//!
//! editor.undo();
//! assert!(editor.scene().is_empty());
//! ```

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use egui::{Key, Modifiers, Pos2, Vec2};
use futures::future::BoxFuture;

use crate::assets::{AssetCompletion, AssetLoader, AssetRequest, AssetTarget, DecodedAsset};
use crate::command::{Command, CommandHistory, CommandResult};
use crate::element::{factory, Element, ImageData};
use crate::event::{ObserverId, SceneObserver};
use crate::id_generator::ElementId;
use crate::input::{EditorAction, InputEvent, KeyBindings, PanelKind};
use crate::scene::Scene;
use crate::state::config::EditorConfig;
use crate::state::persistence::{self, ChangeFn, PersistenceBridge, PersistenceResult, SaveFn};
use crate::style::{BrushSettings, Color, ColorTarget, StyleDefaults, StylePatch, StyleSnapshot};
use crate::tools::{new_tool, Tool, ToolKind, ToolType};
use crate::viewport::Viewport;

#[derive(Debug, Default)]
struct MountState {
    count: Cell<usize>,
    cancel_pending: Cell<bool>,
}

/// Keeps the editor's keyboard and pointer handling attached while alive.
///
/// Dropping the last guard (on any exit path, unwinding included) detaches the
/// bindings and cancels any gesture in progress.
#[must_use = "the editor detaches as soon as the guard is dropped"]
#[derive(Debug)]
pub struct MountGuard {
    state: Rc<MountState>,
}

impl Drop for MountGuard {
    fn drop(&mut self) {
        let count = self.state.count.get().saturating_sub(1);
        self.state.count.set(count);
        if count == 0 {
            self.state.cancel_pending.set(true);
            log::debug!("Editor unmounted");
        }
    }
}

/// The main context for the whiteboard editor.
#[derive(Debug)]
pub struct EditorContext {
    scene: Scene,
    history: CommandHistory,
    viewport: Viewport,
    tool_kind: ToolKind,
    tool: ToolType,
    color_target: ColorTarget,
    style: StyleDefaults,
    brush: BrushSettings,
    config: EditorConfig,
    persistence: PersistenceBridge,
    on_change: Option<ObserverId>,
    assets: AssetLoader,
    /// Decoded payloads of rehydrated images. Snapshots in history predate
    /// them, so they are re-attached after undo and redo.
    image_payloads: HashMap<ElementId, ImageData>,
    mount: Rc<MountState>,
}

impl Default for EditorContext {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorContext {
    /// Creates an editor with an empty scene and the Select tool active.
    pub fn new(config: EditorConfig) -> Self {
        let mut scene = Scene::new();
        let persistence = PersistenceBridge::new(config.document_id.clone());
        scene.subscribe(Box::new(persistence.change_forwarder(None)));

        Self {
            scene,
            history: CommandHistory::with_limit(config.history_limit),
            viewport: Viewport::default().with_pan_nudge(config.zoom_pan_nudge),
            tool_kind: ToolKind::Select,
            tool: new_tool(ToolKind::Select, config.brush),
            color_target: ColorTarget::default(),
            style: config.style,
            brush: config.brush,
            config,
            persistence,
            on_change: None,
            assets: AssetLoader::new(),
            image_payloads: HashMap::new(),
            mount: Rc::new(MountState::default()),
        }
    }

    pub fn with_asset_loader(mut self, loader: AssetLoader) -> Self {
        self.assets = loader;
        self
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The configuration with the style and brush edited since startup folded in.
    pub fn current_config(&self) -> EditorConfig {
        EditorConfig {
            style: self.style,
            brush: self.brush,
            ..self.config.clone()
        }
    }

    pub fn key_bindings(&self) -> &KeyBindings {
        &self.config.key_bindings
    }

    pub fn tool_kind(&self) -> ToolKind {
        self.tool_kind
    }

    pub fn tool(&self) -> &ToolType {
        &self.tool
    }

    pub fn style_defaults(&self) -> &StyleDefaults {
        &self.style
    }

    pub fn brush(&self) -> BrushSettings {
        self.brush
    }

    pub fn color_target(&self) -> ColorTarget {
        self.color_target
    }

    pub fn set_color_target(&mut self, target: ColorTarget) {
        self.color_target = target;
    }

    pub fn persistence(&self) -> &PersistenceBridge {
        &self.persistence
    }

    pub fn asset_loader(&self) -> &AssetLoader {
        &self.assets
    }

    pub fn asset_loader_mut(&mut self) -> &mut AssetLoader {
        &mut self.assets
    }

    /// Host callback for Save: receives `(serialized scene, document id)`.
    pub fn set_save_fn(&mut self, save_fn: SaveFn) {
        self.persistence.set_save_fn(save_fn);
    }

    /// Host callback receiving the serialized scene after every change.
    pub fn set_on_change(&mut self, on_change: ChangeFn) {
        if let Some(previous) = self.on_change.take() {
            self.scene.unsubscribe(previous);
        }
        let forwarder = self.persistence.change_forwarder(Some(on_change));
        self.on_change = Some(self.scene.subscribe(Box::new(forwarder)));
    }

    pub fn subscribe(&mut self, observer: Box<dyn SceneObserver>) -> ObserverId {
        self.scene.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.scene.unsubscribe(id)
    }

    // Mounting

    /// Attach keyboard and pointer handling until the guard is dropped.
    pub fn mount(&mut self) -> MountGuard {
        self.sync_mount();
        self.mount.count.set(self.mount.count.get() + 1);
        log::debug!("Editor mounted");
        MountGuard {
            state: Rc::clone(&self.mount),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mount.count.get() > 0
    }

    /// Apply an unmount that happened since the last call.
    fn sync_mount(&mut self) {
        if self.mount.cancel_pending.replace(false) {
            self.cancel_gesture();
        }
    }

    /// Abandon any drag or freehand capture in progress.
    pub fn cancel_gesture(&mut self) {
        self.tool.deactivate(&self.scene);
        self.tool.activate(&self.scene);
    }

    /// True while a drag or capture is underway.
    pub fn has_active_gesture(&mut self) -> bool {
        self.sync_mount();
        self.tool.has_active_gesture()
    }

    // Commands

    /// Run a command and record it in history.
    pub fn execute(&mut self, command: Command) -> CommandResult {
        self.history.execute(command, &mut self.scene)
    }

    fn execute_logged(&mut self, command: Command) -> bool {
        let label = command.label();
        match self.execute(command) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("{} failed: {}", label, err);
                false
            }
        }
    }

    pub fn undo(&mut self) -> bool {
        self.cancel_gesture();
        let undone = self.history.undo(&mut self.scene);
        self.reattach_image_data();
        undone
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_gesture();
        let redone = self.history.redo(&mut self.scene);
        self.reattach_image_data();
        redone
    }

    // Tools

    /// Switch the active mode. Choosing a placement mode (again) places one
    /// element at the centre of the visible canvas.
    pub fn choose_tool(&mut self, kind: ToolKind) {
        self.tool.deactivate(&self.scene);
        if kind != self.tool_kind {
            log::info!("Tool changed: {} -> {}", self.tool_kind.name(), kind.name());
        }
        self.tool_kind = kind;
        self.tool = new_tool(kind, self.brush);
        self.tool.activate(&self.scene);

        if kind == ToolKind::Select {
            self.scene.select(None);
        }

        let center = self.viewport.visible_center();
        if let Some(element) = kind.placement_element(center, &self.style) {
            self.execute_logged(Command::add_element(element));
        }
    }

    pub fn pointer_down(&mut self, screen_pos: Pos2) {
        self.sync_mount();
        if !self.is_mounted() {
            return;
        }
        let pos = self.viewport.screen_to_world(screen_pos);
        if let Some(command) = self.tool.on_pointer_down(pos, &self.scene) {
            self.execute_logged(command);
        }
    }

    pub fn pointer_move(&mut self, screen_pos: Pos2) {
        self.sync_mount();
        if !self.is_mounted() {
            return;
        }
        let pos = self.viewport.screen_to_world(screen_pos);
        if let Some(command) = self.tool.on_pointer_move(pos, &self.scene) {
            self.execute_logged(command);
        }
    }

    pub fn pointer_up(&mut self, screen_pos: Pos2) {
        self.sync_mount();
        if !self.is_mounted() {
            return;
        }
        let pos = self.viewport.screen_to_world(screen_pos);
        if let Some(command) = self.tool.on_pointer_up(pos, &self.scene) {
            self.execute_logged(command);
        }
    }

    // Keyboard

    /// Dispatch a key press through the bindings table. Returns the action
    /// performed, if any. Ignored while unmounted.
    pub fn handle_key(&mut self, key: Key, modifiers: Modifiers) -> Option<EditorAction> {
        self.sync_mount();
        if !self.is_mounted() {
            return None;
        }
        let action = self.config.key_bindings.action_for(key, modifiers)?;
        self.perform(action);
        Some(action)
    }

    /// Route one input event. Pointer positions are relative to the canvas origin.
    pub fn handle_input(&mut self, event: &InputEvent, canvas_origin: Pos2) {
        match event {
            InputEvent::PointerDown { location } if location.panel == PanelKind::Canvas => {
                self.pointer_down(location.position - canvas_origin.to_vec2());
            }
            InputEvent::PointerDown { .. } => {}
            InputEvent::PointerMove { location } => {
                self.pointer_move(location.position - canvas_origin.to_vec2());
            }
            InputEvent::PointerUp { location } => {
                self.pointer_up(location.position - canvas_origin.to_vec2());
            }
            InputEvent::Key { key, modifiers } => {
                self.handle_key(*key, *modifiers);
            }
            InputEvent::Copy => {
                self.sync_mount();
                if self.is_mounted() {
                    self.perform(EditorAction::Duplicate);
                }
            }
        }
    }

    /// Run an editor action. Returns false when it had nothing to act on.
    pub fn perform(&mut self, action: EditorAction) -> bool {
        log::debug!("Action {:?}", action);
        match action {
            EditorAction::Delete => self.delete_selected(),
            EditorAction::Duplicate => self.duplicate_selected().is_some(),
            EditorAction::Save => match self.save() {
                Ok(()) => true,
                Err(err) => {
                    log::error!("Save failed: {}", err);
                    false
                }
            },
            EditorAction::Undo => self.undo(),
            EditorAction::Redo => self.redo(),
        }
    }

    /// Remove the selected element as one history entry.
    pub fn delete_selected(&mut self) -> bool {
        let Some(command) = self
            .scene
            .selected()
            .and_then(|id| Command::remove_element(&self.scene, id))
        else {
            return false;
        };
        self.cancel_gesture();
        self.execute_logged(command)
    }

    /// The toolbar's Erase button.
    pub fn erase(&mut self) -> bool {
        self.delete_selected()
    }

    /// Copy the selected element, offset by the configured amount, and select the copy.
    pub fn duplicate_selected(&mut self) -> Option<ElementId> {
        let copy = self.scene.selected_element()?.duplicate(self.config.duplicate_offset);
        let id = copy.id();
        let command = Command::add_selected(&self.scene, copy);
        self.execute_logged(command).then_some(id)
    }

    // Property panel

    /// Route a picked color: to the brush while drawing, to the selected
    /// element, or else to the canvas background when that is the target.
    pub fn apply_color(&mut self, color: Color) -> bool {
        if self.tool_kind == ToolKind::Draw {
            self.set_brush(BrushSettings { color, ..self.brush });
            return true;
        }
        let patch = self.color_target.patch(color);
        if let Some(id) = self.scene.selected() {
            self.style.absorb(&patch);
            return match Command::modify_element(&self.scene, id, &patch) {
                Some(command) => self.execute_logged(command),
                None => false,
            };
        }
        if self.color_target == ColorTarget::Background {
            let command = Command::set_background(&self.scene, Some(color));
            return self.execute_logged(command);
        }
        self.style.absorb(&patch);
        false
    }

    /// Apply a numeric or text attribute from the property panel.
    pub fn apply_patch(&mut self, patch: StylePatch) -> bool {
        if let (ToolKind::Draw, StylePatch::StrokeWidth(width)) = (self.tool_kind, &patch) {
            self.set_brush(BrushSettings { width: *width, ..self.brush });
            return true;
        }
        self.style.absorb(&patch);
        let Some(id) = self.scene.selected() else {
            return false;
        };
        match Command::modify_element(&self.scene, id, &patch) {
            Some(command) => self.execute_logged(command),
            None => false,
        }
    }

    pub fn set_brush(&mut self, brush: BrushSettings) {
        self.brush = brush;
        if let Some(tool) = self.tool.as_draw_tool_mut() {
            tool.set_brush(brush);
        }
    }

    /// Style of the selected element, for syncing the property panel.
    pub fn selected_style(&self) -> Option<StyleSnapshot> {
        self.scene.selected_element().map(|element| element.style_snapshot())
    }

    // Viewport

    /// Zoom about the centre of the canvas; the request snaps to a fixed level.
    pub fn set_zoom(&mut self, factor: f32) -> f32 {
        self.viewport.zoom_to_center(factor)
    }

    pub fn toggle_grid(&mut self) -> bool {
        self.viewport.toggle_grid()
    }

    pub fn set_surface_size(&mut self, size: Vec2) {
        self.viewport.set_surface_size(size);
    }

    // Persistence

    pub fn serialize(&self) -> PersistenceResult<String> {
        persistence::serialize(&self.scene)
    }

    /// Hand the serialized scene to the save callback.
    pub fn save(&mut self) -> PersistenceResult<()> {
        self.persistence.save(&self.scene)
    }

    /// Replace the scene with a serialized document and start over with an
    /// empty history. Blank text is a no-op; malformed text leaves everything
    /// untouched.
    pub fn load_document(&mut self, text: &str) -> PersistenceResult<Option<usize>> {
        let loaded = persistence::deserialize(text, &mut self.scene)?;
        if loaded.is_some() {
            self.history.clear();
            self.image_payloads.clear();
            self.cancel_gesture();
            self.rehydrate_images();
        }
        Ok(loaded)
    }

    /// Empty the canvas, forget history and persist the empty document.
    pub fn clear(&mut self) -> PersistenceResult<()> {
        self.cancel_gesture();
        self.scene.clear();
        self.history.clear();
        self.image_payloads.clear();
        self.persistence.clear_and_save()
    }

    /// Give image `id` its cached payload. False if it is absent or already has one.
    fn attach_image_data(&mut self, id: ElementId) -> bool {
        let Some(data) = self.image_payloads.get(&id) else {
            return false;
        };
        let Some(mut element) = self.scene.element(id).cloned() else {
            log::debug!("Image {} is not in the scene; keeping its payload", id);
            return false;
        };
        match element.as_image_mut() {
            Some(image) if image.data().is_none() => image.set_data(Some(data.clone())),
            _ => return false,
        }
        self.scene.replace(id, element)
    }

    /// Undo and redo restore snapshots taken before a payload arrived.
    fn reattach_image_data(&mut self) {
        if self.image_payloads.is_empty() {
            return;
        }
        let missing: Vec<ElementId> = self
            .scene
            .elements()
            .iter()
            .filter_map(|element| element.as_image())
            .filter(|image| image.data().is_none())
            .map(|image| image.id())
            .collect();
        for id in missing {
            self.attach_image_data(id);
        }
    }

    /// Ask the loader for the payload of every image that has none.
    fn rehydrate_images(&mut self) {
        let requests: Vec<AssetRequest> = self
            .scene
            .elements()
            .iter()
            .filter_map(|element| element.as_image())
            .filter(|image| image.data().is_none())
            .filter_map(|image| AssetRequest::rehydrate(image.id(), image.src()))
            .collect();
        for request in requests {
            self.request_asset(request);
        }
    }

    // Assets

    /// Start loading an asset in the background. Pick up the result with
    /// [`poll_assets`](Self::poll_assets).
    pub fn request_asset(&mut self, request: AssetRequest) {
        log::info!("Loading {}", request.source.label());
        self.assets.spawn(request, self.scene.generation());
    }

    /// The load as a future, for hosts that run their own executor.
    pub fn asset_future(&self, request: AssetRequest) -> BoxFuture<'static, ()> {
        self.assets.load(request, self.scene.generation())
    }

    /// Apply every finished load. Returns how many changed the scene.
    pub fn poll_assets(&mut self) -> usize {
        self.assets
            .drain()
            .into_iter()
            .filter(|completion| self.apply_asset(completion))
            .count()
    }

    fn apply_asset(&mut self, completion: &AssetCompletion) -> bool {
        if completion.generation != self.scene.generation() {
            log::info!("Discarding {}: scene was replaced while it loaded", completion.src);
            return false;
        }
        let decoded = match &completion.result {
            Ok(decoded) => decoded,
            Err(err) => {
                log::error!("Could not load {}: {}", completion.src, err);
                return false;
            }
        };

        match (decoded, completion.target) {
            (DecodedAsset::Image(data), AssetTarget::Insert) => {
                let size = image_footprint(data, self.config.image_footprint);
                let center = self.viewport.visible_center();
                let element = factory::create_image(&completion.src, Some(data.clone()), center, size);
                self.execute_logged(Command::add_element(element))
            }
            (DecodedAsset::Image(data), AssetTarget::Rehydrate(id)) => {
                // Kept even if the image was deleted meanwhile: undo may bring it back
                self.image_payloads.insert(id, data.clone());
                self.attach_image_data(id)
            }
            (DecodedAsset::Document(text), _) => match self.load_document(text) {
                Ok(loaded) => loaded.is_some(),
                Err(err) => {
                    log::error!("Could not load document {}: {}", completion.src, err);
                    false
                }
            },
        }
    }
}

/// Size an image element gets: bitmaps fill the square footprint, vector
/// graphics keep their aspect ratio at the footprint's height.
pub fn image_footprint(data: &ImageData, footprint: f32) -> Vec2 {
    match data {
        ImageData::Bitmap { .. } => Vec2::splat(footprint),
        ImageData::Vector { width, height, .. } => {
            if *height <= 0.0 {
                return Vec2::splat(footprint);
            }
            Vec2::new(width * footprint / height, footprint)
        }
    }
}
