use std::sync::Arc;

use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use super::Element;
use crate::geometry::Frame;
use crate::id_generator::ElementId;
use crate::style::{Opacity, StylePatch, StyleSnapshot};

/// Decoded payload of an image element. Never persisted; only `src` is.
#[derive(Clone, PartialEq)]
pub enum ImageData {
    Bitmap {
        width: u32,
        height: u32,
        /// Straight-alpha RGBA8 pixels, row major.
        rgba: Arc<[u8]>,
    },
    Vector {
        /// Intrinsic size in SVG user units.
        width: f32,
        height: f32,
        /// Pixel size of `rgba`, the rasterized markup.
        raster: [u32; 2],
        rgba: Arc<[u8]>,
    },
}

impl ImageData {
    /// Intrinsic size of the asset.
    pub fn natural_size(&self) -> Vec2 {
        match self {
            Self::Bitmap { width, height, .. } => Vec2::new(*width as f32, *height as f32),
            Self::Vector { width, height, .. } => Vec2::new(*width, *height),
        }
    }

    /// Pixel dimensions of [`rgba`](Self::rgba).
    pub fn pixel_size(&self) -> [u32; 2] {
        match self {
            Self::Bitmap { width, height, .. } => [*width, *height],
            Self::Vector { raster, .. } => *raster,
        }
    }

    /// Straight-alpha RGBA8 pixels, row major.
    pub fn rgba(&self) -> &[u8] {
        match self {
            Self::Bitmap { rgba, .. } | Self::Vector { rgba, .. } => rgba,
        }
    }
}

// Custom Debug implementation so pixel buffers are not dumped into logs
impl std::fmt::Debug for ImageData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bitmap { width, height, rgba } => f
                .debug_struct("Bitmap")
                .field("width", width)
                .field("height", height)
                .field("data_len", &rgba.len())
                .finish(),
            Self::Vector {
                width,
                height,
                raster,
                rgba,
            } => f
                .debug_struct("Vector")
                .field("width", width)
                .field("height", height)
                .field("raster", raster)
                .field("data_len", &rgba.len())
                .finish(),
        }
    }
}

/// Image element representing a bitmap or vector asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(skip, default = "ElementId::generate")]
    id: ElementId,
    src: String,
    frame: Frame,
    #[serde(default)]
    opacity: Opacity,
    #[serde(skip)]
    data: Option<ImageData>,
}

impl Image {
    pub fn new(src: impl Into<String>, frame: Frame, data: Option<ImageData>) -> Self {
        Self {
            id: ElementId::generate(),
            src: src.into(),
            frame,
            opacity: Opacity::OPAQUE,
            data,
        }
    }

    /// Where the asset was loaded from (path or URL).
    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn opacity(&self) -> Opacity {
        self.opacity
    }

    /// Decoded payload, absent after a reload from a persisted document.
    pub fn data(&self) -> Option<&ImageData> {
        self.data.as_ref()
    }

    pub fn size(&self) -> Vec2 {
        self.frame.size
    }

    pub fn position(&self) -> Pos2 {
        self.frame.origin
    }

    pub(crate) fn set_id(&mut self, id: ElementId) {
        self.id = id;
    }

    pub(crate) fn set_data(&mut self, data: Option<ImageData>) {
        self.data = data;
    }
}

impl Element for Image {
    fn id(&self) -> ElementId {
        self.id
    }

    fn element_type(&self) -> &'static str {
        "image"
    }

    fn rect(&self) -> Rect {
        self.frame.bounds()
    }

    fn hit_test(&self, pos: Pos2) -> bool {
        self.frame.contains(pos)
    }

    fn translate(&mut self, delta: Vec2) {
        // Moving never touches the decoded payload
        self.frame.translate(delta);
    }

    fn apply_patch(&mut self, patch: &StylePatch) -> bool {
        match patch {
            StylePatch::Opacity(opacity) => self.opacity = *opacity,
            StylePatch::Angle(angle) => self.frame.angle = *angle,
            _ => return false,
        }
        true
    }

    fn style_snapshot(&self) -> StyleSnapshot {
        StyleSnapshot {
            opacity: self.opacity,
            ..Default::default()
        }
    }
}
