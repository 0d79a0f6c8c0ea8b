use crate::state::EditorContext;
use crate::tools::{Tool, ToolKind};
use crate::viewport::ZOOM_LEVELS;

pub fn tools_panel(editor: &mut EditorContext, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(160.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            let active = editor.tool_kind();
            for kind in ToolKind::ALL {
                // Placement modes place another element when clicked again
                if ui.selectable_label(active == kind, kind.name()).clicked() {
                    log::info!("Tool selected from UI: {}", kind.name());
                    editor.choose_tool(kind);
                }
            }
            ui.separator();

            let zoom = editor.viewport().zoom();
            egui::ComboBox::from_label("Zoom")
                .selected_text(format!("{:.0}%", zoom * 100.0))
                .show_ui(ui, |ui| {
                    for level in ZOOM_LEVELS {
                        if ui
                            .selectable_label(level == zoom, format!("{:.0}%", level * 100.0))
                            .clicked()
                        {
                            editor.set_zoom(level);
                        }
                    }
                });
            ui.separator();

            ui.horizontal(|ui| {
                let can_undo = editor.history().can_undo();
                let can_redo = editor.history().can_redo();

                if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                    editor.undo();
                }
                if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                    editor.redo();
                }
            });

            let history = editor.history();
            ui.horizontal(|ui| {
                ui.label(format!("Undo stack size: {}", history.undo_stack().len()));
                ui.label(format!("Redo stack size: {}", history.redo_stack().len()));
            });

            egui::Grid::new("command_history_grid")
                .num_columns(2)
                .spacing([40.0, 4.0])
                .striped(true)
                .show(ui, |ui| {
                    ui.strong("Undo Stack");
                    ui.strong("Redo Stack");
                    ui.end_row();

                    let undo_stack = history.undo_stack();
                    let redo_stack = history.redo_stack();
                    for i in 0..undo_stack.len().max(redo_stack.len()) {
                        ui.label(undo_stack.get(i).map_or("", |command| command.label()));
                        ui.label(redo_stack.get(i).map_or("", |command| command.label()));
                        ui.end_row();
                    }
                });

            ui.separator();
            ui.label(format!("Mode: {}", editor.tool().name()));
        });
}
