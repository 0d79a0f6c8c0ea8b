use egui::{DragValue, Slider};

use crate::element::{Element, ElementType};
use crate::id_generator::ElementId;
use crate::state::EditorContext;
use crate::style::{Color, ColorTarget, FontSize, Opacity, StrokeWidth, StylePatch};
use crate::tools::ToolKind;

/// A dragged number held back until the drag ends, so one drag is one edit.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct DragDraft {
    /// Value when the drag started, latest value
    pending: Option<(f32, f32)>,
}

impl DragDraft {
    /// What the widget shows: the dragged value while a drag is running.
    pub fn value(&self, committed: f32) -> f32 {
        self.pending.map_or(committed, |(_, latest)| latest)
    }

    /// Feed one frame of widget state. Returns the value to commit, if any.
    pub fn step(&mut self, committed: f32, value: f32, dragging: bool, changed: bool) -> Option<f32> {
        if dragging {
            let start = self.pending.map_or(committed, |(start, _)| start);
            self.pending = Some((start, value));
            return None;
        }
        match self.pending.take() {
            Some((start, _)) => (value != start).then_some(value),
            None => (changed && value != committed).then_some(value),
        }
    }

    fn update(&mut self, committed: f32, value: f32, response: &egui::Response) -> Option<f32> {
        self.step(committed, value, response.dragged(), response.changed())
    }
}

/// Edit buffer for the content of a text or sticky note.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TextDraft {
    target: Option<ElementId>,
    text: String,
    editing: bool,
}

impl TextDraft {
    /// Buffer for element `id`, re-seeded from `content` unless it is being typed into.
    pub fn buffer(&mut self, id: ElementId, content: &str) -> &mut String {
        if self.target != Some(id) || !self.editing {
            self.target = Some(id);
            self.text.clear();
            self.text.push_str(content);
        }
        &mut self.text
    }

    pub fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
    }

    /// Stop editing. The patch to apply when the buffer differs from `content`.
    pub fn finish(&mut self, content: &str) -> Option<StylePatch> {
        self.editing = false;
        (self.text != content).then(|| StylePatch::Content(self.text.clone()))
    }
}

/// Property panel state that outlives a frame.
#[derive(Debug, Default)]
pub struct PropertyDrafts {
    pub stroke_width: DragDraft,
    pub font_size: DragDraft,
    pub opacity: DragDraft,
    pub text: TextDraft,
}

/// The color currently shown in the picker for `target`.
fn current_color(editor: &EditorContext, target: ColorTarget) -> Color {
    if editor.tool_kind() == ToolKind::Draw {
        return editor.brush().color;
    }
    let defaults = editor.style_defaults();
    let selected = editor.selected_style();
    match target {
        ColorTarget::Background => selected
            .and_then(|style| style.background)
            .or(editor.scene().background())
            .unwrap_or(Color::WHITE),
        ColorTarget::Stroke => selected.and_then(|style| style.stroke).unwrap_or(defaults.stroke),
        ColorTarget::Fill => selected.and_then(|style| style.fill).unwrap_or(defaults.fill),
    }
}

pub fn properties_panel(editor: &mut EditorContext, drafts: &mut PropertyDrafts, ctx: &egui::Context) {
    egui::SidePanel::right("properties_panel")
        .resizable(false)
        .default_width(180.0)
        .show(ctx, |ui| {
            ui.heading("Object options");

            let drawing = editor.tool_kind() == ToolKind::Draw;
            let mut target = editor.color_target();
            ui.add_enabled_ui(!drawing, |ui| {
                ui.horizontal(|ui| {
                    ui.radio_value(&mut target, ColorTarget::Background, "Background");
                    ui.radio_value(&mut target, ColorTarget::Stroke, "Stroke");
                    ui.radio_value(&mut target, ColorTarget::Fill, "Fill");
                });
            });
            if target != editor.color_target() {
                editor.set_color_target(target);
            }

            let mut color = current_color(editor, target).to_color32();
            ui.horizontal(|ui| {
                ui.label(if drawing { "Brush" } else { "Color" });
                if ui.color_edit_button_srgba(&mut color).changed() {
                    editor.apply_color(Color::from_color32(color));
                }
            });
            ui.separator();

            let selected = editor.selected_style();
            let committed_width = if drawing {
                editor.brush().width.get()
            } else {
                selected
                    .and_then(|style| style.stroke_width)
                    .unwrap_or(editor.style_defaults().stroke_width)
                    .get()
            };
            let mut width = drafts.stroke_width.value(committed_width);
            ui.horizontal(|ui| {
                ui.label("Stroke width");
                let response = ui.add(DragValue::new(&mut width).range(1.0..=50.0).speed(0.2));
                if let Some(width) = drafts.stroke_width.update(committed_width, width, &response) {
                    match StrokeWidth::new(width) {
                        Ok(width) => {
                            editor.apply_patch(StylePatch::StrokeWidth(width));
                        }
                        Err(err) => log::warn!("{}", err),
                    }
                }
            });

            let committed_size = selected
                .and_then(|style| style.font_size)
                .unwrap_or(editor.style_defaults().font_size)
                .get();
            let mut font_size = drafts.font_size.value(committed_size);
            ui.horizontal(|ui| {
                ui.label("Font size");
                let response = ui.add(DragValue::new(&mut font_size).range(6.0..=200.0));
                if let Some(size) = drafts.font_size.update(committed_size, font_size, &response) {
                    match FontSize::new(size) {
                        Ok(size) => {
                            editor.apply_patch(StylePatch::FontSize(size));
                        }
                        Err(err) => log::warn!("{}", err),
                    }
                }
            });

            let committed_opacity = selected
                .map_or(editor.style_defaults().opacity, |style| style.opacity)
                .get();
            let mut opacity = drafts.opacity.value(committed_opacity);
            let response = ui.add(Slider::new(&mut opacity, 0.0..=1.0).text("Opacity"));
            if let Some(opacity) = drafts.opacity.update(committed_opacity, opacity, &response) {
                editor.apply_patch(StylePatch::Opacity(Opacity::new(opacity)));
            }

            text_editor(editor, &mut drafts.text, ui);
        });
}

/// Content field for a selected text or sticky note. Applied when the field loses focus.
fn text_editor(editor: &mut EditorContext, draft: &mut TextDraft, ui: &mut egui::Ui) {
    let (id, content) = match editor.scene().selected_element() {
        Some(ElementType::Text(text)) => (text.id(), text.content().to_owned()),
        Some(ElementType::Sticky(sticky)) => (sticky.id(), sticky.content().to_owned()),
        _ => return,
    };
    ui.separator();
    ui.label("Text");
    let response = ui.add(egui::TextEdit::multiline(draft.buffer(id, &content)).desired_rows(3));
    if response.lost_focus() {
        if let Some(patch) = draft.finish(&content) {
            editor.apply_patch(patch);
        }
    } else {
        draft.set_editing(response.has_focus());
    }
}
