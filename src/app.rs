use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::export;
use crate::file_handler::FileHandler;
use crate::input::InputHandler;
use crate::panels::{self, MenuAction, PropertyDrafts};
use crate::renderer::Renderer;
use crate::state::{persistence, EditorConfig, EditorContext, MountGuard};

/// Key under which the editor configuration is kept in eframe storage.
pub const CONFIG_KEY: &str = "whiteboard-config";

/// Path of the stored document `document_id` inside `data_dir`.
pub fn document_path(data_dir: &Path, document_id: &str) -> PathBuf {
    data_dir.join(format!("{}.json", document_id))
}

/// Remember the editor configuration in eframe storage.
///
/// Runs on eframe's auto-save timer and at shutdown. Never writes the
/// document; that only happens on explicit save actions.
pub fn store_config(editor: &EditorContext, storage: &mut dyn eframe::Storage) {
    eframe::set_value(storage, CONFIG_KEY, &editor.current_config());
}

/// Native whiteboard window: one editor, its panels and a document store on disk.
pub struct WhiteboardApp {
    editor: EditorContext,
    renderer: Renderer,
    input: InputHandler,
    file_handler: FileHandler,
    data_dir: PathBuf,
    show_properties: bool,
    drafts: PropertyDrafts,
    status: Option<String>,
    // Keeps keyboard and pointer handling attached for the lifetime of the window
    _mount: MountGuard,
}

impl WhiteboardApp {
    /// Called once before the first frame.
    ///
    /// `config` overrides whatever eframe storage remembered from the last run.
    pub fn new(cc: &eframe::CreationContext<'_>, data_dir: PathBuf, config: Option<EditorConfig>) -> Self {
        let config = config
            .or_else(|| cc.storage.and_then(|storage| eframe::get_value(storage, CONFIG_KEY)))
            .unwrap_or_default();

        let mut editor = EditorContext::new(config);

        let store_dir = data_dir.clone();
        editor.set_save_fn(Box::new(move |json: &str, document_id: &str| {
            fs::create_dir_all(&store_dir)?;
            fs::write(document_path(&store_dir, document_id), json)?;
            Ok(())
        }));

        let ctx = cc.egui_ctx.clone();
        editor
            .asset_loader_mut()
            .set_on_complete(Arc::new(move || ctx.request_repaint()));

        let path = document_path(&data_dir, editor.persistence().document_id());
        match fs::read_to_string(&path) {
            Ok(text) => match editor.load_document(&text) {
                Ok(Some(count)) => log::info!("Restored {} objects from {}", count, path.display()),
                Ok(None) => {}
                Err(err) => log::error!("Failed to restore {}: {}", path.display(), err),
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => log::error!("Failed to read {}: {}", path.display(), err),
        }

        let mount = editor.mount();
        Self {
            renderer: Renderer::new(&cc.egui_ctx),
            editor,
            input: InputHandler::new(),
            file_handler: FileHandler::new(),
            data_dir,
            show_properties: true,
            drafts: PropertyDrafts::default(),
            status: None,
            _mount: mount,
        }
    }

    pub fn editor(&self) -> &EditorContext {
        &self.editor
    }

    fn export_path(&self, extension: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}-export.{}", self.editor.persistence().document_id(), extension))
    }

    fn handle_menu_action(&mut self, action: MenuAction) {
        match action {
            MenuAction::ToggleProperties => self.show_properties = !self.show_properties,
            MenuAction::ExportPng => {
                let path = self.export_path("png");
                let result = fs::create_dir_all(&self.data_dir)
                    .map_err(export::ExportError::from)
                    .and_then(|()| {
                        export::export_png_to_path(self.editor.scene(), self.editor.viewport(), &path)
                    });
                self.status = Some(match result {
                    Ok(()) => format!("Exported {}", path.display()),
                    Err(err) => {
                        log::error!("PNG export failed: {}", err);
                        format!("Export failed: {}", err)
                    }
                });
            }
            MenuAction::ExportJson => {
                let path = self.export_path("json");
                let result = fs::create_dir_all(&self.data_dir)
                    .map_err(persistence::PersistenceError::from)
                    .and_then(|()| persistence::save_to_path(self.editor.scene(), &path));
                self.status = Some(match result {
                    Ok(()) => format!("Exported {}", path.display()),
                    Err(err) => {
                        log::error!("JSON export failed: {}", err);
                        format!("Export failed: {}", err)
                    }
                });
            }
            MenuAction::Clear => {
                if let Err(err) = self.editor.clear() {
                    log::error!("Failed to persist cleared document: {}", err);
                }
                self.status = None;
            }
        }
    }
}

impl eframe::App for WhiteboardApp {
    /// Called by the framework to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        store_config(&self.editor, storage);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.editor.poll_assets();

        if self.file_handler.check_for_dropped_files(ctx) {
            for request in self.file_handler.process_dropped_files() {
                self.editor.request_asset(request);
            }
        }

        if let Some(action) = panels::menu_panel(&mut self.editor, ctx, self.status.as_deref()) {
            self.handle_menu_action(action);
        }
        panels::tools_panel(&mut self.editor, ctx);
        if self.show_properties {
            panels::properties_panel(&mut self.editor, &mut self.drafts, ctx);
        }
        panels::central_panel(&mut self.editor, &mut self.renderer, &mut self.input, ctx);

        self.file_handler.preview_files_being_dropped(ctx);

        // Keep polling while assets are still loading
        if self.editor.asset_loader().in_flight() > 0 {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
