//! Directed anchors: a position plus a heading.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::transform::{Transform, Transformation};
use crate::{round_to, Point};

/// Tolerance used when deciding whether two angles are the same direction.
pub const ANGLE_TOLERANCE: f64 = 1e-9;

/// Wraps an angle in radians to the half-open interval `(-pi, pi]`.
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Returns `true` if angles `a` and `b` point in the same direction, modulo a full turn.
pub fn angles_eq(a: f64, b: f64) -> bool {
    wrap_angle(a - b).abs() < ANGLE_TOLERANCE
}

/// A position in the plane together with a heading.
///
/// The heading is the direction of light propagation at the point,
/// in radians counter-clockwise from the positive x axis.
/// Poses are immutable: every derivation returns a new value.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Pose {
    x: f64,
    y: f64,
    heading: f64,
}

impl Pose {
    /// Creates a new [`Pose`], normalizing `heading` into `(-pi, pi]`.
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Self {
            x,
            y,
            heading: wrap_angle(heading),
        }
    }

    /// Creates a new [`Pose`] at `point`.
    #[inline]
    pub fn at(point: Point, heading: f64) -> Self {
        Self::new(point.x, point.y, heading)
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    /// The heading in radians, always within `(-pi, pi]`.
    #[inline]
    pub fn heading(&self) -> f64 {
        self.heading
    }

    #[inline]
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The unit vector along the heading.
    pub fn direction(&self) -> Point {
        Point::polar(1., self.heading)
    }

    /// The unit vector pointing 90 degrees counter-clockwise from the heading.
    pub fn left_normal(&self) -> Point {
        Point::polar(1., self.heading + PI / 2.)
    }

    /// Returns the pose moved `distance` along its heading.
    pub fn advanced(&self, distance: f64) -> Self {
        Self::at(self.point() + self.direction() * distance, self.heading)
    }

    /// Returns the pose moved `distance` along its left normal.
    pub fn shifted_left(&self, distance: f64) -> Self {
        Self::at(self.point() + self.left_normal() * distance, self.heading)
    }

    /// Returns the pose at the same position with its heading turned by `angle`.
    pub fn rotated(&self, angle: f64) -> Self {
        Self::new(self.x, self.y, self.heading + angle)
    }

    /// Returns the pose at the same position facing the opposite direction.
    pub fn reversed(&self) -> Self {
        self.rotated(PI)
    }

    /// Returns the pose with its position rounded to `digits` decimal places.
    pub fn rounded(&self, digits: i32) -> Self {
        Self::new(round_to(self.x, digits), round_to(self.y, digits), self.heading)
    }

    /// Returns `true` if the heading is parallel to the x axis.
    pub fn is_horizontal(&self) -> bool {
        self.heading.sin().abs() < ANGLE_TOLERANCE
    }

    /// Returns `true` if the heading is parallel to the y axis.
    pub fn is_vertical(&self) -> bool {
        self.heading.cos().abs() < ANGLE_TOLERANCE
    }

    /// The transformation mapping a local frame (origin at zero, heading along +x)
    /// onto this pose.
    pub fn frame(&self) -> Transformation {
        Transformation::cascade(
            Transformation::translate(self.x, self.y),
            Transformation::rotate(self.heading),
        )
    }

    /// Returns `true` if both poses coincide within `tol` and share a heading.
    pub fn approx_eq(&self, other: &Pose, tol: f64) -> bool {
        (self.x - other.x).abs() <= tol
            && (self.y - other.y).abs() <= tol
            && angles_eq(self.heading, other.heading)
    }
}

impl Transform for Pose {
    fn transform(&self, trans: Transformation) -> Self {
        Self::at(trans.apply(self.point()), self.heading + trans.angle())
    }
}
