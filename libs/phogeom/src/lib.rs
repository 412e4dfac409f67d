//! Planar geometry for photonic layout.
//!
//! Coordinates are `f64` micrometres and angles are radians. Curved waveguides
//! are discretized into polygons by [`arc`]; everything else is a [`Rect`] or a
//! [`Polygon`], wrapped in a [`Shape`] for storage.

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

use self::bbox::{Bbox, BoundBox};
use self::transform::{Transform, Transformation};

pub mod arc;
pub mod bbox;
pub mod pose;
pub mod transform;

pub use pose::Pose;

/// Rounds `val` to `digits` decimal places, never returning negative zero.
pub fn round_to(val: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    let rounded = (val * scale).round() / scale;
    if rounded == 0. {
        0.
    } else {
        rounded
    }
}

/// Rounds `pos` up to the next multiple of `grid`.
///
/// Values already on the grid are left untouched. `grid` must be positive.
pub fn snap_up(pos: f64, grid: f64) -> f64 {
    debug_assert!(grid > 0.);
    (pos / grid).ceil() * grid
}

/// A point, or a displacement, in the layout plane.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self::new(0., 0.)
    }

    /// The point at distance `r` from the origin in direction `angle`.
    #[inline]
    pub fn polar(r: f64, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(r * cos, r * sin)
    }

    #[inline]
    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// The direction of the vector from the origin to this point.
    #[inline]
    pub fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }

    #[inline]
    pub fn dot(&self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn rounded(&self, digits: i32) -> Self {
        Self::new(round_to(self.x, digits), round_to(self.y, digits))
    }
}

impl std::ops::Add for Point {
    type Output = Self;
    fn add(self, rhs: Point) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Self;
    fn sub(self, rhs: Point) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f64> for Point {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// A simple polygon. The closing edge from the last vertex back to the first is implied.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct Polygon {
    pub points: Vec<Point>,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Shoelace area; positive when the vertices wind counter-clockwise.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        let twice: f64 = (0..n)
            .map(|i| {
                let (p, q) = (self.points[i], self.points[(i + 1) % n]);
                p.x * q.y - q.x * p.y
            })
            .sum();
        twice / 2.
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    /// The lower-left corner.
    pub p0: Point,
    /// The upper-right corner.
    pub p1: Point,
}

impl Rect {
    /// Creates the rectangle spanned by two opposite corners, in any order.
    pub fn new(a: Point, b: Point) -> Self {
        let Bbox { p0, p1 } = Bbox::new(a, b);
        Self { p0, p1 }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.p1.x - self.p0.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.p1.y - self.p0.y
    }
}

/// A shape drawn on a mask layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[enum_dispatch(ShapeTrait)]
pub enum Shape {
    Rect(Rect),
    Polygon(Polygon),
}

impl Transform for Shape {
    fn transform(&self, trans: Transformation) -> Self {
        // A rotated rectangle is no longer axis-aligned.
        Self::Polygon(self.to_poly().transform(trans))
    }
}

impl BoundBox for Shape {
    fn bbox(&self) -> Bbox {
        match self {
            Shape::Rect(r) => r.bbox(),
            Shape::Polygon(p) => p.bbox(),
        }
    }
}

/// Operations shared by every [`Shape`] variant.
#[enum_dispatch]
pub trait ShapeTrait {
    /// The vertices of the shape, counter-clockwise for rectangles.
    fn to_poly(&self) -> Polygon;
}

impl ShapeTrait for Rect {
    fn to_poly(&self) -> Polygon {
        Polygon::new(vec![
            self.p0,
            Point::new(self.p1.x, self.p0.y),
            self.p1,
            Point::new(self.p0.x, self.p1.y),
        ])
    }
}

impl ShapeTrait for Polygon {
    fn to_poly(&self) -> Polygon {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use float_eq::assert_float_eq;

    use super::*;

    #[test]
    fn rotated_rect_becomes_polygon() {
        let shape = Shape::Rect(Rect::new(Point::zero(), Point::new(2., 1.)));
        let shape = shape.transform(Transformation::rotate(FRAC_PI_2));
        assert!(matches!(shape, Shape::Polygon(_)));
        let bbox = shape.bbox();
        assert_float_eq!(bbox.p0.x, -1., abs <= 1e-12);
        assert_float_eq!(bbox.p0.y, 0., abs <= 1e-12);
        assert_float_eq!(bbox.p1.x, 0., abs <= 1e-12);
        assert_float_eq!(bbox.p1.y, 2., abs <= 1e-12);
    }

    #[test]
    fn rounding() {
        assert_eq!(round_to(127.00000000000001, 9), 127.);
        assert_eq!(round_to(-1e-12, 9), 0.);
        assert!(round_to(-1e-12, 9).is_sign_positive());
        assert_eq!(round_to(0.1234567894, 9), 0.123456789);
    }

    #[test]
    fn snapping() {
        assert_eq!(snap_up(0., 10.), 0.);
        assert_eq!(snap_up(20., 10.), 20.);
        assert_eq!(snap_up(20.5, 10.), 30.);
    }

    #[test]
    fn winding_sign() {
        let square = Rect::new(Point::zero(), Point::new(2., 3.)).to_poly();
        assert_float_eq!(square.signed_area(), 6., abs <= 1e-12);
        let mut rev = square.clone();
        rev.points.reverse();
        assert_float_eq!(rev.signed_area(), -6., abs <= 1e-12);
    }
}
