//! Bitmap-backed objects: uploaded images and decorative assets.

use super::{ObjectId, ObjectTrait, Transform};
use base64::{Engine, engine::general_purpose::STANDARD};
use kurbo::Size;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Image format for embedded image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }

    /// Accepts `image/png`, `image/jpeg` and the non-standard `image/jpg`.
    /// Parameters after `;` are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        match essence.as_str() {
            "image/png" => Some(ImageFormat::Png),
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }
        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        None
    }
}

/// `data:` URI for encoded PNG or JPEG bytes, sniffed from the header.
pub fn data_uri(bytes: &[u8]) -> Option<String> {
    let format = ImageFormat::from_magic_bytes(bytes)?;
    Some(format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(bytes)))
}

/// An image inserted by the user (upload, paste or drop), stored inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub(crate) id: ObjectId,
    pub transform: Transform,
    pub format: ImageFormat,
    /// Image bytes, base64-encoded so the scene stays plain JSON.
    pub data_base64: String,
    pub natural_width: u32,
    pub natural_height: u32,
}

impl Image {
    /// Create an image from encoded bytes and their decoded dimensions.
    pub fn new(data: &[u8], natural_width: u32, natural_height: u32, format: ImageFormat) -> Self {
        Self {
            id: Uuid::new_v4(),
            transform: Transform::default(),
            format,
            data_base64: STANDARD.encode(data),
            natural_width,
            natural_height,
        }
    }

    /// Get the raw image data (decoded from base64).
    pub fn data(&self) -> Option<Vec<u8>> {
        STANDARD.decode(&self.data_base64).ok()
    }

    /// `data:` URI suitable for an `href`.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.format.mime_type(), self.data_base64)
    }
}

impl ObjectTrait for Image {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    fn intrinsic_size(&self) -> Size {
        Size::new(f64::from(self.natural_width), f64::from(self.natural_height))
    }
}

/// A decorative image referenced by source (path or URL) rather than stored inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub(crate) id: ObjectId,
    pub transform: Transform,
    pub source: String,
    pub natural_width: u32,
    pub natural_height: u32,
}

impl Asset {
    pub fn new(source: impl Into<String>, natural_width: u32, natural_height: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            transform: Transform::default(),
            source: source.into(),
            natural_width,
            natural_height,
        }
    }
}

impl ObjectTrait for Asset {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    fn intrinsic_size(&self) -> Size {
        Size::new(f64::from(self.natural_width), f64::from(self.natural_height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    #[test]
    fn test_format_from_mime() {
        assert_eq!(ImageFormat::from_mime("image/png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_mime("image/jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_mime("image/jpg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_mime("IMAGE/PNG; charset=binary"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_mime("image/gif"), None);
        assert_eq!(ImageFormat::from_mime("text/plain"), None);
    }

    #[test]
    fn test_format_from_magic_bytes() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(ImageFormat::from_magic_bytes(&png), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_magic_bytes(b"GIF8"), None);
    }

    #[test]
    fn test_data_roundtrip() {
        let img = Image::new(&[1, 2, 3, 4], 2, 1, ImageFormat::Png);
        assert_eq!(img.data(), Some(vec![1, 2, 3, 4]));
        assert!(img.data_uri().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_data_uri_sniffs_format() {
        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00];
        assert_eq!(data_uri(&jpeg).as_deref(), Some("data:image/jpeg;base64,/9j/4AA="));
        assert_eq!(data_uri(b"GIF89a"), None);
    }

    #[test]
    fn test_bounds_from_natural_size() {
        let mut asset = Asset::new("icons/star.png", 100, 50);
        asset.transform.position = Point::new(300.0, 200.0);
        let bounds = asset.bounds();
        assert!((bounds.x0 - 250.0).abs() < 1e-9);
        assert!((bounds.y0 - 175.0).abs() < 1e-9);
        assert!((bounds.width() - 100.0).abs() < 1e-9);
    }
}
