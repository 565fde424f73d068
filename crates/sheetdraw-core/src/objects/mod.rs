//! Scene object definitions.

mod image;
mod stroke;
mod text;

pub use image::{Asset, Image, ImageFormat, data_uri};
pub use stroke::Stroke;
pub use text::{FontWeight, LINE_HEIGHT, Text};

use kurbo::{Affine, Point, Rect, Size, Vec2};
use peniko::Color;
use peniko::color::{Srgb, parse_color};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse a CSS color string (`#000000`, `white`, `rgb(...)`).
    pub fn parse(value: &str) -> Option<Self> {
        parse_color(value.trim())
            .ok()
            .map(|color| Self::from(color.to_alpha_color::<Srgb>()))
    }

    /// `#rrggbb` form, alpha dropped.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a 0..=1 opacity.
    pub fn opacity(&self) -> f64 {
        f64::from(self.a) / 255.0
    }
}

impl Default for SerializableColor {
    fn default() -> Self {
        Self::black()
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Unique identifier for scene objects.
pub type ObjectId = Uuid;

/// Which point of the object `Transform::position` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    #[default]
    Center,
    TopLeft,
}

/// Placement of an object in the scene.
///
/// Scales are stored as magnitudes; mirroring lives in the flip flags so that
/// toggling a flip never moves the object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    /// Anchor position in scene coordinates.
    pub position: Point,
    pub origin: Origin,
    pub scale_x: f64,
    pub scale_y: f64,
    pub flip_x: bool,
    pub flip_y: bool,
    /// Clockwise rotation in degrees, around the object's center.
    pub angle: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            origin: Origin::Center,
            scale_x: 1.0,
            scale_y: 1.0,
            flip_x: false,
            flip_y: false,
            angle: 0.0,
        }
    }
}

impl Transform {
    /// A center-anchored transform at `position`.
    pub fn at(position: Point) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Intrinsic size multiplied by the scale magnitudes.
    pub fn scaled_size(&self, size: Size) -> Size {
        Size::new(size.width * self.scale_x.abs(), size.height * self.scale_y.abs())
    }

    /// Scene-space center of an object with the given intrinsic size.
    pub fn center(&self, size: Size) -> Point {
        match self.origin {
            Origin::Center => self.position,
            Origin::TopLeft => self.position + self.half_extent(size),
        }
    }

    /// Move the object so its center lands on `center`.
    pub fn set_center(&mut self, size: Size, center: Point) {
        self.position = match self.origin {
            Origin::Center => center,
            Origin::TopLeft => center - self.half_extent(size),
        };
    }

    /// Affine from local coordinates (centered on the object) to scene coordinates.
    pub fn affine(&self, size: Size) -> Affine {
        let sx = if self.flip_x { -self.scale_x } else { self.scale_x };
        let sy = if self.flip_y { -self.scale_y } else { self.scale_y };
        Affine::translate(self.center(size).to_vec2())
            * Affine::rotate(self.angle.to_radians())
            * Affine::scale_non_uniform(sx, sy)
    }

    /// Axis-aligned bounding box of the transformed local box.
    pub fn bounds(&self, size: Size) -> Rect {
        self.affine(size)
            .transform_rect_bbox(Rect::from_center_size(Point::ZERO, size))
    }

    /// Offset from the top-left anchor to the center, rotated.
    fn half_extent(&self, size: Size) -> Vec2 {
        let scaled = self.scaled_size(size);
        let corner = Point::new(scaled.width / 2.0, scaled.height / 2.0);
        (Affine::rotate(self.angle.to_radians()) * corner).to_vec2()
    }
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    (point - proj).hypot()
}

/// Common geometry/transform behaviour of every scene object.
pub trait ObjectTrait {
    /// Get the unique identifier.
    fn id(&self) -> ObjectId;

    fn transform(&self) -> &Transform;

    fn transform_mut(&mut self) -> &mut Transform;

    /// Unscaled size of the object's local box.
    fn intrinsic_size(&self) -> Size;

    /// Size after scaling (before rotation).
    fn scaled_size(&self) -> Size {
        self.transform().scaled_size(self.intrinsic_size())
    }

    /// Scene-space center.
    fn center(&self) -> Point {
        self.transform().center(self.intrinsic_size())
    }

    /// Bounding box in scene coordinates.
    fn bounds(&self) -> Rect {
        self.transform().bounds(self.intrinsic_size())
    }

    /// Check if a scene point hits this object.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let size = self.intrinsic_size();
        let affine = self.transform().affine(size);
        if affine.determinant().abs() < f64::EPSILON {
            return false;
        }
        let local = affine.inverse() * point;
        Rect::from_center_size(Point::ZERO, size)
            .inflate(tolerance, tolerance)
            .contains(local)
    }
}

/// Every kind of object a scene can hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneObject {
    Stroke(Stroke),
    Image(Image),
    Text(Text),
    Asset(Asset),
}

impl SceneObject {
    fn inner(&self) -> &dyn ObjectTrait {
        match self {
            SceneObject::Stroke(s) => s,
            SceneObject::Image(s) => s,
            SceneObject::Text(s) => s,
            SceneObject::Asset(s) => s,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ObjectTrait {
        match self {
            SceneObject::Stroke(s) => s,
            SceneObject::Image(s) => s,
            SceneObject::Text(s) => s,
            SceneObject::Asset(s) => s,
        }
    }

    /// Short type name, as used in the serialized document.
    pub fn kind(&self) -> &'static str {
        match self {
            SceneObject::Stroke(_) => "stroke",
            SceneObject::Image(_) => "image",
            SceneObject::Text(_) => "text",
            SceneObject::Asset(_) => "asset",
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            SceneObject::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_stroke(&self) -> Option<&Stroke> {
        match self {
            SceneObject::Stroke(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this is a bitmap-backed object (uploaded image or asset).
    pub fn is_image_like(&self) -> bool {
        matches!(self, SceneObject::Image(_) | SceneObject::Asset(_))
    }
}

impl ObjectTrait for SceneObject {
    fn id(&self) -> ObjectId {
        self.inner().id()
    }

    fn transform(&self) -> &Transform {
        self.inner().transform()
    }

    fn transform_mut(&mut self) -> &mut Transform {
        self.inner_mut().transform_mut()
    }

    fn intrinsic_size(&self) -> Size {
        self.inner().intrinsic_size()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.inner().hit_test(point, tolerance)
    }
}

impl From<Stroke> for SceneObject {
    fn from(stroke: Stroke) -> Self {
        SceneObject::Stroke(stroke)
    }
}

impl From<Image> for SceneObject {
    fn from(image: Image) -> Self {
        SceneObject::Image(image)
    }
}

impl From<Text> for SceneObject {
    fn from(text: Text) -> Self {
        SceneObject::Text(text)
    }
}

impl From<Asset> for SceneObject {
    fn from(asset: Asset) -> Self {
        SceneObject::Asset(asset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parse() {
        assert_eq!(SerializableColor::parse("white"), Some(SerializableColor::white()));
        assert_eq!(SerializableColor::parse("#000000"), Some(SerializableColor::black()));
        assert_eq!(
            SerializableColor::parse("#ff8000"),
            Some(SerializableColor::new(255, 128, 0, 255))
        );
        assert!(SerializableColor::parse("not a color").is_none());
    }

    #[test]
    fn test_color_hex() {
        assert_eq!(SerializableColor::new(255, 128, 0, 255).to_hex(), "#ff8000");
        assert!((SerializableColor::transparent().opacity()).abs() < f64::EPSILON);
    }

    #[test]
    fn test_transform_bounds_centered() {
        let t = Transform::at(Point::new(100.0, 100.0));
        let bounds = t.bounds(Size::new(40.0, 20.0));
        assert!((bounds.x0 - 80.0).abs() < 1e-9);
        assert!((bounds.y0 - 90.0).abs() < 1e-9);
        assert!((bounds.x1 - 120.0).abs() < 1e-9);
        assert!((bounds.y1 - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_transform_bounds_scaled_and_rotated() {
        let mut t = Transform::at(Point::new(0.0, 0.0));
        t.scale_x = 2.0;
        t.angle = 90.0;
        let bounds = t.bounds(Size::new(10.0, 4.0));
        // 20x4 after scaling, rotated a quarter turn.
        assert!((bounds.width() - 4.0).abs() < 1e-9);
        assert!((bounds.height() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_flip_keeps_bounds() {
        let mut t = Transform::at(Point::new(50.0, 50.0));
        let before = t.bounds(Size::new(30.0, 10.0));
        t.flip_x = true;
        t.flip_y = true;
        let after = t.bounds(Size::new(30.0, 10.0));
        assert!((before.x0 - after.x0).abs() < 1e-9);
        assert!((before.y1 - after.y1).abs() < 1e-9);
    }

    #[test]
    fn test_top_left_origin_center() {
        let mut t = Transform::at(Point::new(10.0, 10.0));
        t.origin = Origin::TopLeft;
        let size = Size::new(20.0, 40.0);
        let center = t.center(size);
        assert!((center.x - 20.0).abs() < 1e-9);
        assert!((center.y - 30.0).abs() < 1e-9);

        t.set_center(size, Point::new(100.0, 100.0));
        assert!((t.position.x - 90.0).abs() < 1e-9);
        assert!((t.position.y - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_point_to_segment_dist() {
        let d = point_to_segment_dist(Point::new(5.0, 3.0), Point::ZERO, Point::new(10.0, 0.0));
        assert!((d - 3.0).abs() < 1e-9);
        let d = point_to_segment_dist(Point::new(-4.0, 3.0), Point::ZERO, Point::new(10.0, 0.0));
        assert!((d - 5.0).abs() < 1e-9);
    }
}
