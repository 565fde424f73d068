//! Editor configuration.

use crate::error::DocumentError;
use crate::objects::{FontWeight, SerializableColor};
use crate::pipeline::ResizeOptions;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Defaults applied to newly inserted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextDefaults {
    pub content: String,
    pub font_family: String,
    pub font_size: f64,
    pub color: SerializableColor,
    pub weight: FontWeight,
}

impl Default for TextDefaults {
    fn default() -> Self {
        Self {
            content: "New Text".to_string(),
            font_family: "arial".to_string(),
            font_size: 20.0,
            color: SerializableColor::black(),
            weight: FontWeight::Normal,
        }
    }
}

/// Configuration for a [`CanvasEditor`](crate::editor::CanvasEditor).
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Logical scene width, independent of zoom and display scale.
    pub scene_width: f64,
    /// Logical scene height.
    pub scene_height: f64,
    pub brush_width: f64,
    pub brush_color: SerializableColor,
    pub initial_zoom: f64,
    pub text: TextDefaults,
    /// Uploaded images are downscaled to fit within these bounds.
    pub image_max_width: u32,
    pub image_max_height: u32,
    /// JPEG re-encode quality (1-100).
    pub image_quality: u8,
    /// Fraction of the contain fit applied to inserted assets.
    pub asset_fit_multiplier: f64,
    /// Fraction of the contain fit applied to uploaded, pasted and dropped images.
    pub image_fit_multiplier: f64,
    /// Base directory for resolving asset sources. `None` = working directory.
    pub asset_root: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            scene_width: 800.0,
            scene_height: 600.0,
            brush_width: 20.0,
            brush_color: SerializableColor::black(),
            initial_zoom: 1.0,
            text: TextDefaults::default(),
            image_max_width: 512,
            image_max_height: 512,
            image_quality: 80,
            asset_fit_multiplier: 0.5,
            image_fit_multiplier: 1.0,
            asset_root: None,
        }
    }
}

impl EditorConfig {
    /// Parse a (possibly partial) JSON config.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the logical scene size.
    pub fn with_scene_size(mut self, width: f64, height: f64) -> Self {
        self.scene_width = width;
        self.scene_height = height;
        self
    }

    pub fn scene_size(&self) -> Size {
        Size::new(self.scene_width, self.scene_height)
    }

    pub fn resize_options(&self) -> ResizeOptions {
        ResizeOptions {
            max_width: self.image_max_width,
            max_height: self.image_max_height,
            quality: self.image_quality.clamp(1, 100),
        }
    }
}
