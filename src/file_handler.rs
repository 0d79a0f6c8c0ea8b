use std::path::Path;
use std::sync::Arc;

use eframe::egui;

use crate::assets::{AssetKind, AssetRequest, AssetSource};

/// Turns files dropped onto the window into asset requests.
#[derive(Debug, Default)]
pub struct FileHandler {
    dropped_files: Vec<egui::DroppedFile>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect newly dropped files from the UI context.
    /// Returns true if any files arrived this frame.
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> bool {
        let mut new_dropped_files = false;

        ctx.input(|i| {
            if !i.raw.dropped_files.is_empty() {
                self.dropped_files = i.raw.dropped_files.clone();
                new_dropped_files = true;
            }
        });

        new_dropped_files
    }

    /// Drain the collected files into requests. Unsupported files are logged and skipped.
    pub fn process_dropped_files(&mut self) -> Vec<AssetRequest> {
        self.dropped_files
            .drain(..)
            .filter_map(|file| {
                let request = Self::request_for(&file);
                if request.is_none() {
                    log::warn!("Dropped file is not a supported type: {}", Self::file_name(&file));
                }
                request
            })
            .collect()
    }

    fn file_name(file: &egui::DroppedFile) -> String {
        if let Some(path) = &file.path {
            path.display().to_string()
        } else if !file.name.is_empty() {
            file.name.clone()
        } else {
            "unknown".to_owned()
        }
    }

    /// The mime type wins; the extension decides when the platform gives none.
    fn kind_of(file: &egui::DroppedFile) -> Option<AssetKind> {
        if !file.mime.is_empty() {
            return AssetKind::from_mime(&file.mime);
        }
        let name = file
            .path
            .as_deref()
            .and_then(Path::to_str)
            .unwrap_or(file.name.as_str());
        AssetKind::from_path(name)
    }

    fn request_for(file: &egui::DroppedFile) -> Option<AssetRequest> {
        let kind = Self::kind_of(file)?;
        let source = if let Some(bytes) = &file.bytes {
            log::info!("Dropped file from memory: {} ({} bytes)", Self::file_name(file), bytes.len());
            AssetSource::Bytes {
                name: Self::file_name(file),
                bytes: Arc::clone(bytes),
            }
        } else if let Some(path) = &file.path {
            log::info!("Dropped file from path: {}", path.display());
            AssetSource::Path(path.clone())
        } else {
            log::warn!("Dropped file has no accessible data: {}", Self::file_name(file));
            return None;
        };
        Some(AssetRequest::new(source, kind))
    }

    /// Preview files being dragged over the application
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, Id, LayerId, Order};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let text = ctx.input(|i| {
            let mut text = "Dropping files:\n".to_owned();
            for file in &i.raw.hovered_files {
                if let Some(path) = &file.path {
                    text += &format!("\n{}", path.display());
                } else if !file.mime.is_empty() {
                    text += &format!("\n{}", file.mime);
                } else {
                    text += "\n(Path not available)";
                }
            }
            text
        });

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));

        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            egui::TextStyle::Heading.resolve(&ctx.style()),
            Color32::WHITE,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dropped(name: &str, mime: &str, bytes: Option<&[u8]>) -> egui::DroppedFile {
        egui::DroppedFile {
            name: name.to_owned(),
            mime: mime.to_owned(),
            bytes: bytes.map(Arc::from),
            ..Default::default()
        }
    }

    #[test]
    fn mime_type_decides_the_kind() {
        let file = dropped("drawing.bin", "image/svg+xml", Some(b"<svg/>"));
        let request = FileHandler::request_for(&file).unwrap();
        assert_eq!(request.kind, AssetKind::Vector);
    }

    #[test]
    fn extension_is_used_without_a_mime_type() {
        let file = dropped("board.json", "", Some(b"{}"));
        let request = FileHandler::request_for(&file).unwrap();
        assert_eq!(request.kind, AssetKind::Document);
    }

    #[test]
    fn unsupported_files_are_skipped() {
        let mut handler = FileHandler::new();
        handler.dropped_files = vec![
            dropped("notes.txt", "text/plain", Some(b"hello")),
            dropped("photo.png", "image/png", Some(b"not really a png")),
        ];
        let requests = handler.process_dropped_files();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].kind, AssetKind::Image);
        assert!(handler.process_dropped_files().is_empty());
    }

    #[test]
    fn files_without_data_are_skipped() {
        let file = dropped("photo.png", "image/png", None);
        assert!(FileHandler::request_for(&file).is_none());
    }
}
