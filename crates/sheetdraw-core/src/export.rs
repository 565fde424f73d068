//! Raster export interface.

use crate::error::ExportError;
use crate::pipeline::AssetResolver;
use crate::scene::Scene;
use kurbo::Size;

/// Turns a scene into encoded PNG bytes at a given logical size.
///
/// Asset objects only carry a source reference; their bytes come from `assets`.
pub trait Rasterizer {
    fn rasterize(&mut self, scene: &Scene, size: Size, assets: &dyn AssetResolver) -> Result<Vec<u8>, ExportError>;
}

/// Pixel dimensions for a logical size (at least 1x1).
pub fn pixel_size(size: Size) -> (u32, u32) {
    let width = size.width.round().max(1.0) as u32;
    let height = size.height.round().max(1.0) as u32;
    (width, height)
}
