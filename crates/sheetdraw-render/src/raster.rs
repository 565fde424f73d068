//! CPU rasterization of scenes into PNG bytes.

use crate::svg::scene_to_svg;
use kurbo::Size;
use resvg::{tiny_skia, usvg};
use sheetdraw_core::error::ExportError;
use sheetdraw_core::export::{Rasterizer, pixel_size};
use sheetdraw_core::pipeline::AssetResolver;
use sheetdraw_core::scene::Scene;

/// Renders scenes through an SVG document with resvg.
pub struct SvgRasterizer {
    options: usvg::Options<'static>,
}

impl Default for SvgRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgRasterizer {
    /// Create a rasterizer with the system fonts loaded.
    pub fn new() -> Self {
        let mut options = usvg::Options::default();
        options.fontdb_mut().load_system_fonts();
        log::debug!("Loaded {} font faces", options.fontdb.len());
        Self { options }
    }

    /// Rasterize an SVG document into PNG bytes.
    pub fn render_svg(&self, svg: &str, width: u32, height: u32) -> Result<Vec<u8>, ExportError> {
        let tree = usvg::Tree::from_str(svg, &self.options).map_err(|e| ExportError::Build(e.to_string()))?;
        let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or(ExportError::Allocation { width, height })?;
        resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

        let rgba: Vec<u8> = pixmap
            .pixels()
            .iter()
            .flat_map(|pixel| {
                let color = pixel.demultiply();
                [color.red(), color.green(), color.blue(), color.alpha()]
            })
            .collect();
        encode_png(&rgba, width, height)
    }
}

impl Rasterizer for SvgRasterizer {
    fn rasterize(&mut self, scene: &Scene, size: Size, assets: &dyn AssetResolver) -> Result<Vec<u8>, ExportError> {
        let (width, height) = pixel_size(size);
        let svg = scene_to_svg(scene, size, assets);
        self.render_svg(&svg, width, height)
    }
}

/// Encode RGBA8 pixels as PNG.
pub fn encode_png(rgba_data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ExportError> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder
            .write_header()
            .map_err(|e| ExportError::Encode(e.to_string()))?;
        writer
            .write_image_data(rgba_data)
            .map_err(|e| ExportError::Encode(e.to_string()))?;
        writer.finish().map_err(|e| ExportError::Encode(e.to_string()))?;
    }
    Ok(png_data)
}
