//! Zoom, pan, and the client → plan mapping.

use serde::Serialize;
use sp_core::config::EditorConfig;
use sp_core::geometry::Bounds;

/// How the plan surface maps onto the page.
///
/// `plan = (client − origin − offset) / zoom`, where `origin` is the
/// surface's top-left corner in client pixels and `offset` the pan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub zoom: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub origin_x: f32,
    pub origin_y: f32,
    /// Surface size in client pixels.
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl Viewport {
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            zoom: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            origin_x: 0.0,
            origin_y: 0.0,
            width,
            height,
        }
    }

    /// Where the surface sits on the page, and how big it is.
    pub fn set_surface(&mut self, origin_x: f32, origin_y: f32, width: f32, height: f32) {
        self.origin_x = origin_x;
        self.origin_y = origin_y;
        self.width = width;
        self.height = height;
    }

    pub fn screen_to_plan(&self, client_x: f32, client_y: f32) -> (f32, f32) {
        (
            (client_x - self.origin_x - self.offset_x) / self.zoom,
            (client_y - self.origin_y - self.offset_y) / self.zoom,
        )
    }

    /// Surface-local pixel position of a plan point.
    pub fn plan_to_surface(&self, x: f32, y: f32) -> (f32, f32) {
        (x * self.zoom + self.offset_x, y * self.zoom + self.offset_y)
    }

    /// The plan-space rectangle currently on screen.
    pub fn visible_plan(&self) -> Bounds {
        let (x, y) = self.screen_to_plan(self.origin_x, self.origin_y);
        Bounds::new(x, y, self.width / self.zoom, self.height / self.zoom)
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    pub fn zoom_in(&mut self, config: &EditorConfig) {
        self.set_zoom(self.zoom + config.zoom_step, config);
    }

    pub fn zoom_out(&mut self, config: &EditorConfig) {
        self.set_zoom(self.zoom - config.zoom_step, config);
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = 1.0;
    }

    /// Clamp into the configured range and round off float drift from
    /// repeated steps.
    pub fn set_zoom(&mut self, zoom: f32, config: &EditorConfig) {
        let clamped = config.clamp_zoom(zoom);
        self.zoom = (clamped * 100.0).round() / 100.0;
    }
}
