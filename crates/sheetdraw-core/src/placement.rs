//! Fitting, centering and out-of-canvas checks.

use crate::objects::{ObjectTrait, SceneObject};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Objects whose bounds overlap the scene by less than this margin are evicted.
pub const EVICTION_MARGIN: f64 = 10.0;

/// Scaling policies, matching CSS `object-fit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectFit {
    #[default]
    Contain,
    Cover,
    Fill,
}

impl ObjectFit {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "contain" => Some(ObjectFit::Contain),
            "cover" => Some(ObjectFit::Cover),
            "fill" => Some(ObjectFit::Fill),
            _ => None,
        }
    }
}

/// Ratio that brings `object` (scaled size) to `canvas` under `fit`.
///
/// `contain` takes the smaller axis ratio; `cover` and `fill` both take the
/// larger one. Existing documents depend on `fill` behaving like `cover`.
pub fn fit_scale(object: Size, canvas: Size, fit: ObjectFit) -> f64 {
    let scale_width = canvas.width / object.width;
    let scale_height = canvas.height / object.height;
    match fit {
        ObjectFit::Contain => scale_width.min(scale_height),
        ObjectFit::Cover | ObjectFit::Fill => scale_width.max(scale_height),
    }
}

/// Rescale `object` to the canvas and recenter it.
///
/// The ratio is computed against the object's current scaled size and
/// multiplied into its scale, so re-applying the same fit is a no-op.
/// Returns false (leaving the object untouched) for degenerate sizes.
pub fn fit_object(object: &mut SceneObject, canvas: Size, fit: ObjectFit, multiplier: f64) -> bool {
    let scaled = object.scaled_size();
    if scaled.width <= 0.0 || scaled.height <= 0.0 {
        return false;
    }
    let factor = fit_scale(scaled, canvas, fit) * multiplier;
    if !factor.is_finite() || factor <= 0.0 {
        return false;
    }

    let transform = object.transform_mut();
    transform.scale_x *= factor;
    transform.scale_y *= factor;
    center_object(object, canvas);
    true
}

/// Move the object's center to the canvas center.
pub fn center_object(object: &mut SceneObject, canvas: Size) {
    let size = object.intrinsic_size();
    object
        .transform_mut()
        .set_center(size, Point::new(canvas.width / 2.0, canvas.height / 2.0));
}

/// Whether `bounds` has drifted off a `canvas`-sized scene.
pub fn is_out_of_canvas(bounds: Rect, canvas: Size) -> bool {
    bounds.x0 + bounds.width() - EVICTION_MARGIN < 0.0
        || bounds.x0 + EVICTION_MARGIN > canvas.width
        || bounds.y0 + bounds.height() - EVICTION_MARGIN < 0.0
        || bounds.y0 + EVICTION_MARGIN > canvas.height
}
