//! sheetdraw Render Library
//!
//! PNG export for sheetdraw scenes. Scenes are converted to SVG and
//! rasterized on the CPU with resvg.

mod raster;
pub mod svg;

pub use raster::{SvgRasterizer, encode_png};
pub use svg::scene_to_svg;
