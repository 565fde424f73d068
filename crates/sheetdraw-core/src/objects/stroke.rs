//! Freehand stroke object.

use super::{ObjectId, ObjectTrait, SerializableColor, Transform, point_to_segment_dist};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A freehand stroke (series of points).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub(crate) id: ObjectId,
    pub transform: Transform,
    /// Points relative to the stroke's center.
    pub points: Vec<Point>,
    pub stroke_color: SerializableColor,
    pub stroke_width: f64,
}

impl Stroke {
    /// Build a stroke from points captured in scene coordinates.
    ///
    /// The points are re-based on the center of their extent, which becomes
    /// the stroke's anchor.
    pub fn from_scene_points(points: &[Point], stroke_width: f64, stroke_color: SerializableColor) -> Self {
        let extent = point_extent(points);
        let center = extent.center();
        Self {
            id: Uuid::new_v4(),
            transform: Transform::at(center),
            points: points.iter().map(|p| Point::ORIGIN + (*p - center)).collect(),
            stroke_color,
            stroke_width,
        }
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the stroke has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points mapped into scene coordinates.
    pub fn scene_points(&self) -> Vec<Point> {
        let affine = self.transform.affine(self.intrinsic_size());
        self.points.iter().map(|p| affine * *p).collect()
    }
}

fn point_extent(points: &[Point]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::ZERO;
    };
    points
        .iter()
        .skip(1)
        .fold(Rect::from_points(*first, *first), |rect, p| rect.union_pt(*p))
}

impl ObjectTrait for Stroke {
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
        let extent = point_extent(&self.points);
        Size::new(
            extent.width() + self.stroke_width,
            extent.height() + self.stroke_width,
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let affine = self.transform.affine(self.intrinsic_size());
        if affine.determinant().abs() < f64::EPSILON {
            return false;
        }
        let local = affine.inverse() * point;
        let reach = tolerance + self.stroke_width / 2.0;

        match self.points.as_slice() {
            [] => false,
            [only] => (local - *only).hypot() <= reach,
            points => points
                .windows(2)
                .any(|w| point_to_segment_dist(local, w[0], w[1]) <= reach),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horizontal() -> Stroke {
        Stroke::from_scene_points(
            &[Point::new(100.0, 50.0), Point::new(200.0, 50.0)],
            4.0,
            SerializableColor::black(),
        )
    }

    #[test]
    fn test_points_are_rebased_on_center() {
        let stroke = horizontal();
        assert!((stroke.transform.position.x - 150.0).abs() < 1e-9);
        assert!((stroke.transform.position.y - 50.0).abs() < 1e-9);
        assert_eq!(stroke.points[0], Point::new(-50.0, 0.0));
        assert_eq!(stroke.points[1], Point::new(50.0, 0.0));
    }

    #[test]
    fn test_scene_points_roundtrip() {
        let stroke = horizontal();
        let scene = stroke.scene_points();
        assert!((scene[0].x - 100.0).abs() < 1e-9);
        assert!((scene[1].x - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_include_width() {
        let bounds = horizontal().bounds();
        assert!((bounds.x0 - 98.0).abs() < 1e-9);
        assert!((bounds.x1 - 202.0).abs() < 1e-9);
        assert!((bounds.height() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_hit_test() {
        let stroke = horizontal();
        assert!(stroke.hit_test(Point::new(150.0, 51.0), 0.0));
        assert!(!stroke.hit_test(Point::new(150.0, 70.0), 5.0));
    }

    #[test]
    fn test_single_point_stroke() {
        let stroke = Stroke::from_scene_points(&[Point::new(10.0, 10.0)], 6.0, SerializableColor::black());
        assert_eq!(stroke.len(), 1);
        assert!(stroke.hit_test(Point::new(12.0, 10.0), 0.0));
        assert!((stroke.intrinsic_size().width - 6.0).abs() < 1e-9);
    }
}
