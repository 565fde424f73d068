//! Text object.

use super::{ObjectId, ObjectTrait, SerializableColor, Transform};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT: f64 = 1.16;

/// Font weight options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    /// CSS `font-weight` value.
    pub fn css_value(&self) -> &'static str {
        match self {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
        }
    }
}

/// A text object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ObjectId,
    pub transform: Transform,
    pub content: String,
    pub font_family: String,
    /// Font size in logical units.
    pub font_size: f64,
    pub color: SerializableColor,
    #[serde(default)]
    pub font_weight: FontWeight,
}

impl Text {
    /// Default font size.
    pub const DEFAULT_FONT_SIZE: f64 = 20.0;

    /// Create a new center-anchored text object.
    pub fn new(position: Point, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            transform: Transform::at(position),
            content: content.into(),
            font_family: "arial".to_string(),
            font_size: Self::DEFAULT_FONT_SIZE,
            color: SerializableColor::black(),
            font_weight: FontWeight::Normal,
        }
    }

    pub fn with_font(mut self, family: impl Into<String>, size: f64, weight: FontWeight) -> Self {
        self.font_family = family.into();
        self.font_size = size;
        self.font_weight = weight;
        self
    }

    pub fn with_color(mut self, color: SerializableColor) -> Self {
        self.color = color;
        self
    }

    /// Lines of content (an empty string still occupies one line).
    pub fn lines(&self) -> Vec<&str> {
        let mut lines: Vec<&str> = self.content.split('\n').collect();
        if lines.is_empty() {
            lines.push("");
        }
        lines
    }

    /// Approximate width based on character count and font size.
    /// Actual width depends on the font; no shaping is done here.
    fn approximate_width(&self) -> f64 {
        let max_line_len = self
            .lines()
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);

        let char_width_factor = match self.font_weight {
            FontWeight::Normal => 0.55,
            FontWeight::Bold => 0.6,
        };

        (max_line_len as f64 * self.font_size * char_width_factor).max(self.font_size * 0.5)
    }

    fn approximate_height(&self) -> f64 {
        self.lines().len() as f64 * self.font_size * LINE_HEIGHT
    }
}

impl ObjectTrait for Text {
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
        Size::new(self.approximate_width(), self.approximate_height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_defaults() {
        let text = Text::new(Point::new(10.0, 10.0), "New Text");
        assert_eq!(text.font_family, "arial");
        assert_eq!(text.font_weight, FontWeight::Normal);
        assert!((text.font_size - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_multiline_size() {
        let one = Text::new(Point::ZERO, "abcd");
        let two = Text::new(Point::ZERO, "abcd\nab");
        assert!((one.intrinsic_size().width - two.intrinsic_size().width).abs() < f64::EPSILON);
        assert!((two.intrinsic_size().height - 2.0 * one.intrinsic_size().height).abs() < 1e-9);
    }

    #[test]
    fn test_empty_text_has_size() {
        let text = Text::new(Point::ZERO, "");
        let size = text.intrinsic_size();
        assert!(size.width > 0.0);
        assert!(size.height > 0.0);
    }

    #[test]
    fn test_bold_is_wider() {
        let normal = Text::new(Point::ZERO, "Hello");
        let bold = Text::new(Point::ZERO, "Hello").with_font("arial", 20.0, FontWeight::Bold);
        assert!(bold.intrinsic_size().width > normal.intrinsic_size().width);
    }
}
