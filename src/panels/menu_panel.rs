use crate::state::EditorContext;

/// Bottom menu entries that need more than the editor to carry out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ToggleProperties,
    ExportPng,
    ExportJson,
    Clear,
}

pub fn menu_panel(editor: &mut EditorContext, ctx: &egui::Context, status: Option<&str>) -> Option<MenuAction> {
    let mut action = None;
    egui::TopBottomPanel::bottom("menu_panel").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if ui.button("Object options").clicked() {
                action = Some(MenuAction::ToggleProperties);
            }
            let grid_label = if editor.viewport().show_grid() { "Hide grid" } else { "Grid" };
            if ui.button(grid_label).clicked() {
                editor.toggle_grid();
            }
            let has_selection = editor.scene().selected().is_some();
            if ui.add_enabled(has_selection, egui::Button::new("Erase")).clicked() {
                editor.erase();
            }
            if ui
                .add_enabled(editor.history().can_undo(), egui::Button::new("Undo"))
                .clicked()
            {
                editor.undo();
            }
            if ui
                .add_enabled(editor.history().can_redo(), egui::Button::new("Redo"))
                .clicked()
            {
                editor.redo();
            }
            ui.separator();
            if ui.button("Save").clicked() {
                if let Err(err) = editor.save() {
                    log::error!("Save failed: {}", err);
                }
            }
            if ui.button("Export PNG").clicked() {
                action = Some(MenuAction::ExportPng);
            }
            if ui.button("Export JSON").clicked() {
                action = Some(MenuAction::ExportJson);
            }
            if ui.button("Clear").clicked() {
                action = Some(MenuAction::Clear);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let dirty = editor.persistence().dirty();
                ui.label(if dirty { "Unsaved changes" } else { "Saved" });
                if let Some(status) = status {
                    ui.separator();
                    ui.label(status);
                }
            });
        });
    });
    action
}
