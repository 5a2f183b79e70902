//! Pan/zoom state of the canvas and its screen transform.
//!
//! Screen space is terminal cells relative to the canvas area's top-left
//! corner, y growing downward like canvas space. Cells are about twice
//! as tall as they are wide, so the vertical scale is half the
//! horizontal one.

use netsketch_core::{Point, ScreenTransform};

/// Canvas units covered by one cell column at zoom 1.
pub const UNITS_PER_CELL: f64 = 10.0;

const MIN_ZOOM: f64 = 0.25;
const MAX_ZOOM: f64 = 4.0;
const ZOOM_STEP: f64 = 1.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Canvas point shown at the top-left cell.
    pub origin: Point,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            origin: Point::new(0.0, 0.0),
            zoom: 1.0,
        }
    }
}

impl Viewport {
    fn scale_x(&self) -> f64 {
        self.zoom / UNITS_PER_CELL
    }

    fn scale_y(&self) -> f64 {
        self.scale_x() / 2.0
    }

    pub fn transform(&self) -> ScreenTransform {
        let (sx, sy) = (self.scale_x(), self.scale_y());
        ScreenTransform::new(sx, sy, -self.origin.x * sx, -self.origin.y * sy)
    }

    /// Shift the view by whole cells.
    pub fn pan_cells(&mut self, cols: f64, rows: f64) {
        self.origin.x += cols / self.scale_x();
        self.origin.y += rows / self.scale_y();
    }

    /// Zoom in (`steps > 0`) or out around the screen cell `anchor`,
    /// keeping the canvas point under it in place.
    pub fn zoom_by(&mut self, steps: i32, anchor: Point) {
        let Some(fixed) = self.transform().invert(anchor) else {
            return;
        };
        self.zoom = (self.zoom * ZOOM_STEP.powi(steps)).clamp(MIN_ZOOM, MAX_ZOOM);
        self.origin = Point::new(
            fixed.x - anchor.x / self.scale_x(),
            fixed.y - anchor.y / self.scale_y(),
        );
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use netsketch_core::map_to_canvas;

    fn close(a: Point, b: Point) -> bool {
        a.distance_to(b) < 1e-9
    }

    #[test]
    fn default_view_maps_spawn_point_into_the_terminal() {
        let t = Viewport::default().transform();
        assert!(close(t.apply(Point::new(150.0, 150.0)), Point::new(15.0, 7.5)));
    }

    #[test]
    fn screen_round_trip_through_the_mapper() {
        let mut vp = Viewport::default();
        vp.pan_cells(3.0, -2.0);
        vp.zoom_by(2, Point::new(10.0, 5.0));
        let t = vp.transform();

        let canvas = Point::new(240.0, 90.0);
        let back = map_to_canvas(t.apply(canvas), Some(&t)).unwrap();
        assert!(close(back, canvas));
    }

    #[test]
    fn panning_moves_the_origin_by_cells() {
        let mut vp = Viewport::default();
        vp.pan_cells(5.0, 5.0);
        assert_eq!(vp.origin, Point::new(50.0, 100.0));
    }

    #[test]
    fn zoom_keeps_anchor_fixed_and_clamps() {
        let mut vp = Viewport::default();
        let anchor = Point::new(20.0, 10.0);
        let before = vp.transform().invert(anchor).unwrap();
        vp.zoom_by(3, anchor);
        let after = vp.transform().invert(anchor).unwrap();
        assert!(close(before, after));

        vp.zoom_by(100, anchor);
        assert_eq!(vp.zoom, MAX_ZOOM);
        vp.zoom_by(-100, anchor);
        assert_eq!(vp.zoom, MIN_ZOOM);
    }
}
