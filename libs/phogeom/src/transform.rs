//! Rigid motions of the plane.
//!
//! Component geometry is drawn in a local frame with the entry port at the origin
//! heading along +x, then moved onto its pose. Only rotations and translations
//! occur, so polygon winding and arc radii are preserved.

use super::{Point, Polygon, Rect};

/// A rotation about the origin followed by a translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transformation {
    cos: f64,
    sin: f64,
    offset: Point,
}

impl Default for Transformation {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transformation {
    pub fn identity() -> Self {
        Self {
            cos: 1.,
            sin: 0.,
            offset: Point::zero(),
        }
    }

    /// A translation by `(x, y)`.
    pub fn translate(x: f64, y: f64) -> Self {
        Self {
            offset: Point::new(x, y),
            ..Self::identity()
        }
    }

    /// A counter-clockwise rotation by `angle` radians about the origin.
    pub fn rotate(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            cos,
            sin,
            offset: Point::zero(),
        }
    }

    /// The transformation applying `child` first, then `parent`.
    pub fn cascade(parent: Transformation, child: Transformation) -> Transformation {
        Self {
            cos: parent.cos * child.cos - parent.sin * child.sin,
            sin: parent.sin * child.cos + parent.cos * child.sin,
            offset: parent.apply(child.offset),
        }
    }

    /// The rotation angle in radians.
    #[inline]
    pub fn angle(&self) -> f64 {
        self.sin.atan2(self.cos)
    }

    /// Where the origin is sent.
    #[inline]
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Maps `p` through the transformation.
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.cos * p.x - self.sin * p.y + self.offset.x,
            self.sin * p.x + self.cos * p.y + self.offset.y,
        )
    }
}

/// Geometry that can be moved by a [`Transformation`].
pub trait Transform {
    /// Returns a copy of `self` moved by `trans`.
    fn transform(&self, trans: Transformation) -> Self;
}

impl Transform for Point {
    fn transform(&self, trans: Transformation) -> Self {
        trans.apply(*self)
    }
}

impl Transform for Polygon {
    fn transform(&self, trans: Transformation) -> Self {
        Polygon::new(self.points.iter().map(|p| trans.apply(*p)).collect())
    }
}

impl Transform for Rect {
    /// Moves the corners of the rectangle.
    ///
    /// Only meaningful for rotations by multiples of 90 degrees;
    /// [`Shape::transform`](super::Shape) handles arbitrary angles.
    fn transform(&self, trans: Transformation) -> Self {
        Rect::new(trans.apply(self.p0), trans.apply(self.p1))
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use float_eq::assert_float_eq;

    use super::*;

    #[test]
    fn cascade_applies_child_first() {
        let rot = Transformation::rotate(FRAC_PI_2);
        let shift = Transformation::translate(1., 0.);
        let p = Point::new(1., 0.);

        let a = p.transform(Transformation::cascade(rot, shift));
        assert_float_eq!(a.x, 0., abs <= 1e-12);
        assert_float_eq!(a.y, 2., abs <= 1e-12);

        let b = p.transform(Transformation::cascade(shift, rot));
        assert_float_eq!(b.x, 1., abs <= 1e-12);
        assert_float_eq!(b.y, 1., abs <= 1e-12);
    }

    #[test]
    fn rotate_half_turn() {
        let t = Transformation::rotate(PI);
        let p = Point::new(3., 1.).transform(t);
        assert_float_eq!(p.x, -3., abs <= 1e-12);
        assert_float_eq!(p.y, -1., abs <= 1e-12);
        assert_float_eq!(t.angle(), PI, abs <= 1e-12);
    }

    #[test]
    fn rotation_keeps_winding() {
        let poly = Polygon::new(vec![
            Point::zero(),
            Point::new(1., 0.),
            Point::new(1., 1.),
            Point::new(0., 1.),
        ]);
        let moved = poly.transform(Transformation::cascade(
            Transformation::translate(4., -2.),
            Transformation::rotate(2.),
        ));
        assert_float_eq!(moved.signed_area(), 1., abs <= 1e-12);
    }
}
