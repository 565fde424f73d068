//! Display transform (zoom and pan) between screen and scene coordinates.
//!
//! The camera never changes the scene's logical size; it only decides where
//! the scene appears on screen.

use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Camera manages the view transform for the canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan), in screen units.
    pub offset: Vec2,
    /// Current zoom level (1.0 = one scene unit per screen pixel).
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: 0.1,
            max_zoom: 10.0,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Camera at the given zoom (clamped).
    pub fn with_zoom(zoom: f64) -> Self {
        let mut camera = Self::default();
        camera.set_zoom(zoom);
        camera
    }

    /// Scene to screen.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Screen to scene.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    pub fn screen_to_scene(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn scene_to_screen(&self, scene_point: Point) -> Point {
        self.transform() * scene_point
    }

    /// Set the zoom level, clamped to the allowed range.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        }
    }

    /// Zoom the camera, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let scene_point = self.screen_to_scene(screen_point);
        self.zoom = new_zoom;

        // Keep scene_point under screen_point
        let new_screen = self.scene_to_screen(scene_point);
        self.offset += screen_point - new_screen;
    }

    /// Center a `scene` sized surface in `viewport` at the current zoom.
    /// A scene larger than the viewport stays anchored at the top left.
    pub fn center_scene(&mut self, scene: Size, viewport: Size) {
        let display = self.display_size(scene);
        self.offset = Vec2::new(
            ((viewport.width - display.width) / 2.0).max(0.0),
            ((viewport.height - display.height) / 2.0).max(0.0),
        );
    }

    /// Size of the scene as displayed.
    pub fn display_size(&self, scene: Size) -> Size {
        Size::new(scene.width * self.zoom, scene.height * self.zoom)
    }
}
