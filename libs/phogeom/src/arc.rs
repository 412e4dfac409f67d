//! Discretization of circular arcs into polygon vertices.

use std::f64::consts::PI;

use crate::{Point, Polygon};

/// The largest angle spanned by a single chord of a discretized arc.
pub const MAX_ANGLE_STEP: f64 = PI / 180.;

/// Returns the number of chords used to approximate an arc spanning `sweep` radians.
pub fn num_chords(sweep: f64) -> usize {
    // Tolerate round-off so that whole-degree sweeps get whole-degree chords.
    ((sweep.abs() / MAX_ANGLE_STEP - 1e-9).ceil() as usize).max(1)
}

/// Returns the points along the arc of radius `radius` around `center`,
/// starting at `start_angle` and spanning `sweep` radians.
///
/// Both end points are included.
pub fn arc_points(center: Point, radius: f64, start_angle: f64, sweep: f64) -> Vec<Point> {
    let n = num_chords(sweep);
    (0..=n)
        .map(|i| center + Point::polar(radius, start_angle + sweep * i as f64 / n as f64))
        .collect()
}

/// Creates the polygon bounded by two concentric arcs.
///
/// The sector spans `sweep` radians from `start_angle`, between radii `r_inner` and `r_outer`.
/// The returned polygon is always wound counter-clockwise.
pub fn annular_sector(
    center: Point,
    r_inner: f64,
    r_outer: f64,
    start_angle: f64,
    sweep: f64,
) -> Polygon {
    let mut points = arc_points(center, r_outer, start_angle, sweep);
    let mut inner = arc_points(center, r_inner, start_angle, sweep);
    inner.reverse();
    points.extend(inner);
    let mut poly = Polygon::new(points);
    if poly.signed_area() < 0. {
        poly.points.reverse();
    }
    poly
}

/// Creates a closed ring as two half-annulus polygons.
///
/// GDSII boundaries cannot contain holes, so the ring is split along the x axis.
pub fn annulus(center: Point, r_inner: f64, r_outer: f64) -> [Polygon; 2] {
    [
        annular_sector(center, r_inner, r_outer, 0., PI),
        annular_sector(center, r_inner, r_outer, PI, PI),
    ]
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use float_eq::assert_float_eq;

    use super::*;
    use crate::bbox::BoundBox;

    #[test]
    fn arc_end_points() {
        let pts = arc_points(Point::new(1., 1.), 2., 0., FRAC_PI_2);
        assert_eq!(pts.len(), 91);
        assert_float_eq!(pts[0].x, 3., abs <= 1e-12);
        assert_float_eq!(pts[0].y, 1., abs <= 1e-12);
        assert_float_eq!(pts[90].x, 1., abs <= 1e-12);
        assert_float_eq!(pts[90].y, 3., abs <= 1e-12);
    }

    #[test]
    fn sector_is_counter_clockwise() {
        let poly = annular_sector(Point::zero(), 1., 2., 0., -FRAC_PI_2);
        assert!(poly.signed_area() > 0.);
        // Area of a quarter annulus.
        assert_float_eq!(poly.signed_area(), 3. * PI / 4., rmax <= 1e-3);
    }

    #[test]
    fn annulus_bounds() {
        let [top, bottom] = annulus(Point::new(0., 10.), 9.5, 10.);
        let b = top.bbox().union(bottom.bbox());
        assert_float_eq!(b.p0.y, 0., abs <= 1e-9);
        assert_float_eq!(b.p1.y, 20., abs <= 1e-9);
        assert_float_eq!(b.width(), 20., abs <= 1e-9);
    }
}
