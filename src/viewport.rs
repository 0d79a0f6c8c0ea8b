//! Zoom, pan and grid state of the canvas.
//!
//! Screen positions are relative to the canvas' top-left corner:
//! `screen = world * zoom + pan`.

use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

/// The only zoom factors the canvas ever uses, ascending.
pub const ZOOM_LEVELS: [f32; 6] = [0.25, 0.5, 0.75, 1.0, 1.5, 2.0];

/// Pan applied after every zoom change.
pub const DEFAULT_PAN_NUDGE: Vec2 = Vec2::new(10.0, 0.0);

/// Snap a requested zoom factor to the nearest level. `None` for non-positive
/// or non-finite requests.
pub fn snap_zoom(factor: f32) -> Option<f32> {
    if !factor.is_finite() || factor <= 0.0 {
        return None;
    }
    ZOOM_LEVELS
        .iter()
        .copied()
        .min_by(|a, b| (a - factor).abs().total_cmp(&(b - factor).abs()))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Viewport {
    zoom: f32,
    pan: Vec2,
    surface_size: Vec2,
    show_grid: bool,
    pan_nudge: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
            surface_size: Vec2::ZERO,
            show_grid: false,
            pan_nudge: DEFAULT_PAN_NUDGE,
        }
    }
}

impl Viewport {
    pub fn new(surface_size: Vec2) -> Self {
        Self {
            surface_size,
            ..Self::default()
        }
    }

    pub fn with_pan_nudge(mut self, nudge: Vec2) -> Self {
        self.pan_nudge = nudge;
        self
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    pub fn surface_size(&self) -> Vec2 {
        self.surface_size
    }

    pub fn set_surface_size(&mut self, size: Vec2) {
        self.surface_size = size;
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn toggle_grid(&mut self) -> bool {
        self.show_grid = !self.show_grid;
        self.show_grid
    }

    pub fn pan_nudge(&self) -> Vec2 {
        self.pan_nudge
    }

    pub fn set_pan_nudge(&mut self, nudge: Vec2) {
        self.pan_nudge = nudge;
    }

    /// Zoom about `anchor` (screen space) to the level nearest `factor`, then
    /// apply the pan nudge. Returns the zoom in effect afterwards; invalid
    /// requests change nothing.
    pub fn set_zoom(&mut self, factor: f32, anchor: Pos2) -> f32 {
        let Some(level) = snap_zoom(factor) else {
            log::warn!("Ignoring invalid zoom factor {}", factor);
            return self.zoom;
        };
        // Keep the world point under the anchor fixed
        let anchor = anchor.to_vec2();
        self.pan = anchor - (anchor - self.pan) * (level / self.zoom);
        self.zoom = level;
        self.pan += self.pan_nudge;
        log::debug!("Zoom {} pan {:?}", self.zoom, self.pan);
        self.zoom
    }

    /// Zoom about the centre of the surface.
    pub fn zoom_to_center(&mut self, factor: f32) -> f32 {
        let center = (self.surface_size / 2.0).to_pos2();
        self.set_zoom(factor, center)
    }

    pub fn relative_pan(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    pub fn screen_to_world(&self, screen: Pos2) -> Pos2 {
        ((screen.to_vec2() - self.pan) / self.zoom).to_pos2()
    }

    pub fn world_to_screen(&self, world: Pos2) -> Pos2 {
        (world.to_vec2() * self.zoom + self.pan).to_pos2()
    }

    /// World point shown at the centre of the surface.
    pub fn visible_center(&self) -> Pos2 {
        self.screen_to_world((self.surface_size / 2.0).to_pos2())
    }

    /// Back to 100% with no pan; grid and surface size are kept.
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan = Vec2::ZERO;
    }
}
