use crate::input::InputHandler;
use crate::renderer::Renderer;
use crate::state::EditorContext;
use crate::tools::Tool;

/// The canvas: routes pointer and keyboard input to the editor, then paints the scene.
pub fn central_panel(
    editor: &mut EditorContext,
    renderer: &mut Renderer,
    input: &mut InputHandler,
    ctx: &egui::Context,
) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none())
        .show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;

            // Popups covering the canvas keep their clicks
            if response.hovered() || response.dragged() {
                input.set_canvas_rect(rect);
            } else {
                input.set_canvas_rect(egui::Rect::NOTHING);
            }
            editor.set_surface_size(rect.size());

            for event in input.process_input(ctx) {
                editor.handle_input(&event, rect.min);
            }

            let preview = editor.tool().preview();
            renderer.render(&painter, rect, editor.scene(), editor.viewport(), preview);
        });
}
