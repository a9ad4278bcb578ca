//! Canvas zoom.

pub const DEFAULT_ZOOM: f64 = 1.0;
pub const MIN_ZOOM: f64 = 0.25;
pub const MAX_ZOOM: f64 = 4.0;
pub const ZOOM_STEP: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportController {
    zoom: f64,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self { zoom: DEFAULT_ZOOM }
    }
}

impl ViewportController {
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + ZOOM_STEP).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom - ZOOM_STEP).max(MIN_ZOOM);
    }

    pub fn zoom_to_fit(&mut self) {
        self.zoom = DEFAULT_ZOOM;
    }

    /// Zoom as a whole percentage for display (`1.0` → `100`).
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }
}
