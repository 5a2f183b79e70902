//! Coordinate mapping between the host's screen space and canvas space.
//!
//! The host supplies its current screen transform (independent scale and
//! translation per axis, i.e. the `a`, `d`, `e`, `f` terms of a 2-D
//! affine matrix with no shear). Pointer positions are mapped back into
//! canvas space by inverting it.

use serde::{Deserialize, Serialize};

/// A point in either screen or canvas space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Neither coordinate is NaN or infinite. Only such points survive a
    /// JSON round trip.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Canvas → screen transform: `screen = canvas * scale + translate`, per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTransform {
    pub scale_x: f64,
    pub scale_y: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Default for ScreenTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ScreenTransform {
    pub const IDENTITY: Self = Self {
        scale_x: 1.0,
        scale_y: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    pub const fn new(scale_x: f64, scale_y: f64, translate_x: f64, translate_y: f64) -> Self {
        Self {
            scale_x,
            scale_y,
            translate_x,
            translate_y,
        }
    }

    /// Canvas point → screen point.
    pub fn apply(&self, canvas: Point) -> Point {
        Point::new(
            canvas.x * self.scale_x + self.translate_x,
            canvas.y * self.scale_y + self.translate_y,
        )
    }

    /// Screen point → canvas point. `None` if either axis is degenerate.
    pub fn invert(&self, screen: Point) -> Option<Point> {
        if !is_invertible(self.scale_x) || !is_invertible(self.scale_y) {
            return None;
        }
        Some(Point::new(
            (screen.x - self.translate_x) / self.scale_x,
            (screen.y - self.translate_y) / self.scale_y,
        ))
    }
}

fn is_invertible(scale: f64) -> bool {
    scale.is_finite() && scale.abs() > f64::EPSILON
}

/// Map a pointer position into canvas space.
///
/// Returns `None` when the host has no usable transform (not laid out
/// yet, or a zero scale); callers treat that as "ignore this event".
pub fn map_to_canvas(screen: Point, transform: Option<&ScreenTransform>) -> Option<Point> {
    transform?.invert(screen)
}

/// The point on segment `from → to` at `distance` from `from`.
///
/// Used to place port badges near, not on, the node markers. A
/// zero-length segment yields `from` unchanged.
pub fn point_along(from: Point, to: Point, distance: f64) -> Point {
    let length = from.distance_to(to);
    if length < f64::EPSILON {
        return from;
    }
    let t = distance / length;
    Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn invert_undoes_scale_and_translation() {
        let t = ScreenTransform::new(2.0, 0.5, 10.0, -4.0);
        let canvas = Point::new(30.0, 80.0);
        let screen = t.apply(canvas);
        let back = t.invert(screen).unwrap();
        assert!(close(back.x, 30.0));
        assert!(close(back.y, 80.0));
    }

    #[test]
    fn axes_are_independent() {
        let t = ScreenTransform::new(4.0, 1.0, 0.0, 0.0);
        let p = t.invert(Point::new(8.0, 8.0)).unwrap();
        assert_eq!(p, Point::new(2.0, 8.0));
    }

    #[test]
    fn missing_or_degenerate_transform_is_neutral() {
        assert!(map_to_canvas(Point::new(1.0, 1.0), None).is_none());
        let flat = ScreenTransform::new(0.0, 1.0, 0.0, 0.0);
        assert!(map_to_canvas(Point::new(1.0, 1.0), Some(&flat)).is_none());
        let id = ScreenTransform::IDENTITY;
        assert_eq!(
            map_to_canvas(Point::new(3.0, 4.0), Some(&id)),
            Some(Point::new(3.0, 4.0))
        );
    }

    #[test]
    fn zero_length_segment_returns_origin() {
        let a = Point::new(12.5, -3.0);
        assert_eq!(point_along(a, a, 55.0), a);
    }

    #[test]
    fn point_lies_at_requested_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(30.0, 40.0);
        let p = point_along(a, b, 10.0);
        assert!(close(p.x, 6.0));
        assert!(close(p.y, 8.0));
        assert!(close(a.distance_to(p), 10.0));
    }
}
