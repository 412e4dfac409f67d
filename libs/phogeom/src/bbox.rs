//! Axis-aligned bounding boxes.

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

use super::{Point, Polygon, Rect};

/// The smallest axis-aligned rectangle containing some geometry.
///
/// `p0` holds the minimum coordinates and `p1` the maximum. A box with `p0`
/// beyond `p1` on either axis is empty; [`Bbox::empty`] is the identity for
/// [`BoundBox::union`].
#[derive(Debug, Default, Copy, Clone, Deserialize, Serialize, PartialEq)]
pub struct Bbox {
    pub p0: Point,
    pub p1: Point,
}

impl Bbox {
    /// Creates the box spanned by two opposite corners, in any order.
    pub fn new(a: Point, b: Point) -> Self {
        Self {
            p0: Point::new(a.x.min(b.x), a.y.min(b.y)),
            p1: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn empty() -> Self {
        Self {
            p0: Point::new(f64::INFINITY, f64::INFINITY),
            p1: Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.p0.x > self.p1.x || self.p0.y > self.p1.y
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.p1.x - self.p0.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.p1.y - self.p0.y
    }

    pub fn center(&self) -> Point {
        (self.p0 + self.p1) * 0.5
    }

    /// Grows the box by `margin` on every side.
    pub fn expand(&mut self, margin: f64) {
        self.p0 = self.p0 - Point::new(margin, margin);
        self.p1 = self.p1 + Point::new(margin, margin);
    }

    /// Returns the box moved by `offset`. Empty boxes stay empty.
    pub fn translated(&self, offset: Point) -> Self {
        if self.is_empty() {
            return *self;
        }
        Self {
            p0: self.p0 + offset,
            p1: self.p1 + offset,
        }
    }
}

/// Geometry with a bounding box.
#[enum_dispatch]
pub trait BoundBox {
    fn bbox(&self) -> Bbox;

    /// The bounding box of `self` together with `bbox`.
    fn union(&self, bbox: Bbox) -> Bbox {
        self.bbox().union(bbox)
    }
}

impl<T: BoundBox> BoundBox for &T {
    fn bbox(&self) -> Bbox {
        T::bbox(*self)
    }
}

impl BoundBox for Bbox {
    fn bbox(&self) -> Bbox {
        *self
    }

    fn union(&self, other: Bbox) -> Bbox {
        match (self.is_empty(), other.is_empty()) {
            (_, true) => *self,
            (true, false) => other,
            (false, false) => Bbox {
                p0: Point::new(self.p0.x.min(other.p0.x), self.p0.y.min(other.p0.y)),
                p1: Point::new(self.p1.x.max(other.p1.x), self.p1.y.max(other.p1.y)),
            },
        }
    }
}

impl BoundBox for Point {
    fn bbox(&self) -> Bbox {
        Bbox { p0: *self, p1: *self }
    }
}

impl BoundBox for Rect {
    fn bbox(&self) -> Bbox {
        Bbox::new(self.p0, self.p1)
    }
}

impl BoundBox for Polygon {
    fn bbox(&self) -> Bbox {
        self.points.as_slice().bbox()
    }
}

impl BoundBox for [Point] {
    fn bbox(&self) -> Bbox {
        self.iter()
            .fold(Bbox::empty(), |bbox, pt| bbox.union(pt.bbox()))
    }
}
