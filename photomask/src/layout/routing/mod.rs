//! Waveguide routing.
//!
//! A [`Router`] is seeded at a [`Pose`] and grows a waveguide by appending
//! [`RoutePrimitive`]s. Each primitive is a pure function of the current pose,
//! so the centerline is fully determined by the seed and the ordered primitive list.
//! Once complete, [`Router::finalize`] freezes the trace into an immutable [`WaveguidePath`].

use std::f64::consts::FRAC_PI_2;

use phogeom::arc::annular_sector;
use phogeom::bbox::{Bbox, BoundBox};
use phogeom::{Point, Polygon, Pose};
use serde::{Deserialize, Serialize};

use self::error::{Axis, RoutingError};
use crate::log::warn;

pub mod error;
pub mod idioms;

/// Anything that can yield a directed anchor to route from or place at.
///
/// Routers yield their current pose; placed components yield their primary port.
pub trait PoseSource {
    fn pose(&self) -> Pose;
}

impl PoseSource for Pose {
    fn pose(&self) -> Pose {
        *self
    }
}

impl<T> PoseSource for &T
where
    T: PoseSource + ?Sized,
{
    fn pose(&self) -> Pose {
        T::pose(*self)
    }
}

/// A single routing step.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum RoutePrimitive {
    /// Advance along the current heading.
    Straight(f64),
    /// Advance along a horizontal heading until reaching the given x coordinate.
    StraightUntilX(f64),
    /// Advance along a vertical heading until reaching the given y coordinate.
    StraightUntilY(f64),
    /// Turn by `angle` radians (counter-clockwise positive) on a circle of radius `radius`.
    Bend { angle: f64, radius: f64 },
}

impl RoutePrimitive {
    /// Applies the primitive to `pose`, returning the resulting pose and the traced segment.
    pub fn apply(&self, pose: Pose) -> Result<(Pose, PathSegment), RoutingError> {
        match *self {
            RoutePrimitive::Straight(length) => {
                let end = pose.advanced(length);
                Ok((end, PathSegment::straight(pose, end)))
            }
            RoutePrimitive::StraightUntilX(x) => {
                if !pose.is_horizontal() {
                    return Err(RoutingError::NotAxisAligned {
                        axis: Axis::X,
                        target: x,
                        heading: pose.heading(),
                    });
                }
                // Land exactly on the target to keep accumulated round-off out of later steps.
                let end = Pose::new(x, pose.y(), pose.heading());
                Ok((end, PathSegment::straight(pose, end)))
            }
            RoutePrimitive::StraightUntilY(y) => {
                if !pose.is_vertical() {
                    return Err(RoutingError::NotAxisAligned {
                        axis: Axis::Y,
                        target: y,
                        heading: pose.heading(),
                    });
                }
                let end = Pose::new(pose.x(), y, pose.heading());
                Ok((end, PathSegment::straight(pose, end)))
            }
            RoutePrimitive::Bend { angle, radius } => {
                if !(radius > 0.) {
                    return Err(RoutingError::NonPositiveRadius { radius });
                }
                let sign = if angle < 0. { -1. } else { 1. };
                let center = pose.point() + pose.left_normal() * (sign * radius);
                let start_angle = (pose.point() - center).angle();
                let end_point = center + Point::polar(radius, start_angle + angle);
                let end = Pose::at(end_point, pose.heading() + angle);
                Ok((
                    end,
                    PathSegment::Arc {
                        center,
                        radius,
                        start_angle,
                        sweep: angle,
                    },
                ))
            }
        }
    }

    /// Returns the signed projection of the straight distance along `pose`'s heading.
    ///
    /// Only defined for straight primitives.
    pub fn straight_length(&self, pose: Pose) -> Option<f64> {
        match *self {
            RoutePrimitive::Straight(length) => Some(length),
            RoutePrimitive::StraightUntilX(x) => Some((x - pose.x()) * pose.heading().cos()),
            RoutePrimitive::StraightUntilY(y) => Some((y - pose.y()) * pose.heading().sin()),
            RoutePrimitive::Bend { .. } => None,
        }
    }
}

/// A traced piece of waveguide centerline.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum PathSegment {
    /// A straight run from `start` to `end`.
    ///
    /// `length` is signed: negative when the run points against the heading it was traced with.
    Straight {
        start: Point,
        end: Point,
        length: f64,
    },
    /// A circular arc.
    Arc {
        center: Point,
        radius: f64,
        /// Angle of the start point as seen from `center`.
        start_angle: f64,
        /// Signed angle swept, counter-clockwise positive.
        sweep: f64,
    },
}

impl PathSegment {
    fn straight(from: Pose, to: Pose) -> Self {
        let length = (to.point() - from.point()).dot(from.direction());
        PathSegment::Straight {
            start: from.point(),
            end: to.point(),
            length,
        }
    }

    /// The signed centerline length of the segment.
    pub fn length(&self) -> f64 {
        match *self {
            PathSegment::Straight { length, .. } => length,
            PathSegment::Arc { radius, sweep, .. } => radius * sweep.abs(),
        }
    }

    /// Renders the segment as a polygon of the given waveguide `width`.
    ///
    /// Returns [`None`] for degenerate segments that enclose no area.
    pub fn to_polygon(&self, width: f64) -> Option<Polygon> {
        match *self {
            PathSegment::Straight { start, end, .. } => {
                let delta = end - start;
                let len = delta.norm();
                if len < 1e-12 {
                    return None;
                }
                let n = Point::new(-delta.y, delta.x) * (width / 2. / len);
                Some(Polygon::new(vec![start - n, end - n, end + n, start + n]))
            }
            PathSegment::Arc {
                center,
                radius,
                start_angle,
                sweep,
            } => {
                if sweep.abs() < 1e-12 {
                    return None;
                }
                Some(annular_sector(
                    center,
                    radius - width / 2.,
                    radius + width / 2.,
                    start_angle,
                    sweep,
                ))
            }
        }
    }
}

/// An incremental waveguide builder.
///
/// Each call appends one primitive and advances the current pose.
/// Straight and bend calls chain:
/// `router.straight(10.).bend(-FRAC_PI_2, 25.)?.straight_until_x(127.)?`.
#[derive(Debug, Clone)]
pub struct Router {
    start: Pose,
    current: Pose,
    width: f64,
    segments: Vec<PathSegment>,
}

impl Router {
    /// Creates a router seeded at `start`.
    pub fn new(start: Pose, width: f64) -> Self {
        Self {
            start,
            current: start,
            width,
            segments: Vec::new(),
        }
    }

    /// Creates a router seeded at the pose yielded by `source`.
    pub fn start_at(source: &impl PoseSource, width: f64) -> Self {
        Self::new(source.pose(), width)
    }

    /// Applies a single primitive, advancing the current pose.
    ///
    /// On error the router is left unchanged.
    pub fn apply(&mut self, primitive: RoutePrimitive) -> Result<&mut Self, RoutingError> {
        let (next, segment) = primitive.apply(self.current)?;
        if let Some(length) = primitive.straight_length(self.current) {
            self.check_length(length);
        }
        self.segments.push(segment);
        self.current = next;
        Ok(self)
    }

    fn check_length(&self, length: f64) {
        if length < 0. {
            warn!(
                "negative straight waveguide length {length} at ({}, {}); geometry will fold back",
                self.current.x(),
                self.current.y()
            );
        }
    }

    /// Advances `length` along the current heading.
    ///
    /// Negative lengths are not rejected; they trace backwards and are logged.
    pub fn straight(&mut self, length: f64) -> &mut Self {
        self.check_length(length);
        let next = self.current.advanced(length);
        self.segments.push(PathSegment::straight(self.current, next));
        self.current = next;
        self
    }

    /// Turns by `angle` radians on a circle of radius `radius`.
    ///
    /// Positive angles turn counter-clockwise.
    pub fn bend(&mut self, angle: f64, radius: f64) -> Result<&mut Self, RoutingError> {
        self.apply(RoutePrimitive::Bend { angle, radius })
    }

    /// Turns left by 90 degrees.
    pub fn turn_left(&mut self, radius: f64) -> Result<&mut Self, RoutingError> {
        self.bend(FRAC_PI_2, radius)
    }

    /// Turns right by 90 degrees.
    pub fn turn_right(&mut self, radius: f64) -> Result<&mut Self, RoutingError> {
        self.bend(-FRAC_PI_2, radius)
    }

    /// Runs straight until the current x coordinate equals `x`.
    ///
    /// The current heading must be parallel to the x axis.
    pub fn straight_until_x(&mut self, x: f64) -> Result<&mut Self, RoutingError> {
        self.apply(RoutePrimitive::StraightUntilX(x))
    }

    /// Runs straight until the current y coordinate equals `y`.
    ///
    /// The current heading must be parallel to the y axis.
    pub fn straight_until_y(&mut self, y: f64) -> Result<&mut Self, RoutingError> {
        self.apply(RoutePrimitive::StraightUntilY(y))
    }

    /// The pose at the open end of the waveguide.
    #[inline]
    pub fn current_pose(&self) -> Pose {
        self.current
    }

    #[inline]
    pub fn start_pose(&self) -> Pose {
        self.start
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// The total centerline length traced so far.
    pub fn length(&self) -> f64 {
        self.segments.iter().map(PathSegment::length).sum()
    }

    #[inline]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Consumes the router, returning the traced waveguide.
    pub fn finalize(self) -> WaveguidePath {
        WaveguidePath {
            start: self.start,
            end: self.current,
            width: self.width,
            segments: self.segments,
        }
    }
}

impl PoseSource for Router {
    fn pose(&self) -> Pose {
        self.current
    }
}

/// A completed, immutable waveguide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveguidePath {
    start: Pose,
    end: Pose,
    width: f64,
    segments: Vec<PathSegment>,
}

impl WaveguidePath {
    #[inline]
    pub fn start(&self) -> Pose {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Pose {
        self.end
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn length(&self) -> f64 {
        self.segments.iter().map(PathSegment::length).sum()
    }

    /// Renders the waveguide as one polygon per non-degenerate segment.
    pub fn polygons(&self) -> impl Iterator<Item = Polygon> + '_ {
        self.segments
            .iter()
            .filter_map(|seg| seg.to_polygon(self.width))
    }
}

impl BoundBox for WaveguidePath {
    fn bbox(&self) -> Bbox {
        self.polygons()
            .fold(Bbox::empty(), |bbox, poly| bbox.union(poly.bbox()))
    }
}

impl PoseSource for WaveguidePath {
    fn pose(&self) -> Pose {
        self.end
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use float_eq::assert_float_eq;
    use phogeom::pose::angles_eq;

    use super::*;

    #[test]
    fn straight_bend_straight() {
        let mut router = Router::new(Pose::new(0., 0., FRAC_PI_2), 0.5);
        router
            .straight(10.)
            .bend(-FRAC_PI_2, 25.)
            .unwrap()
            .straight(77.);
        let end = router.current_pose();
        assert!(angles_eq(end.heading(), 0.));
        assert_float_eq!(end.x(), 102., abs <= 1e-9);
        assert_float_eq!(end.y(), 35., abs <= 1e-9);
        assert_float_eq!(router.length(), 87. + 25. * FRAC_PI_2, abs <= 1e-9);
    }

    #[test]
    fn straight_until_x_emits_delta() {
        let mut router = Router::new(Pose::new(3., 1., 0.), 0.5);
        router.straight_until_x(20.).unwrap();
        assert_eq!(router.segments().len(), 1);
        assert_float_eq!(router.segments()[0].length(), 17., abs <= 1e-12);
        assert_eq!(router.current_pose().x(), 20.);

        let mut router = Router::new(Pose::new(3., 1., PI), 0.5);
        router.straight_until_x(-7.).unwrap();
        assert_float_eq!(router.length(), 10., abs <= 1e-12);
    }

    #[test]
    fn straight_until_x_requires_horizontal_heading() {
        let mut router = Router::new(Pose::new(0., 0., FRAC_PI_2), 0.5);
        let err = router.straight_until_x(10.).unwrap_err();
        assert!(matches!(err, RoutingError::NotAxisAligned { axis: Axis::X, .. }));
        assert!(router.segments().is_empty());

        let err = Router::new(Pose::new(0., 0., 0.3), 0.5)
            .straight_until_y(10.)
            .unwrap_err();
        assert!(matches!(err, RoutingError::NotAxisAligned { axis: Axis::Y, .. }));
    }

    #[test]
    fn opposite_bends_restore_heading() {
        for theta in [0.1, FRAC_PI_2, 2.5, -1.2] {
            let mut router = Router::new(Pose::new(1., 2., 0.7), 0.5);
            router.bend(theta, 10.).unwrap().bend(-theta, 10.).unwrap();
            assert!(angles_eq(router.current_pose().heading(), 0.7));
        }
    }

    #[test]
    fn bend_geometry() {
        let mut router = Router::new(Pose::new(0., 0., 0.), 0.5);
        router.bend(FRAC_PI_2, 5.).unwrap();
        let end = router.current_pose();
        assert_float_eq!(end.x(), 5., abs <= 1e-12);
        assert_float_eq!(end.y(), 5., abs <= 1e-12);
        assert_float_eq!(end.heading(), FRAC_PI_2, abs <= 1e-12);

        router.bend(-PI, 5.).unwrap();
        let end = router.current_pose();
        assert_float_eq!(end.x(), 15., abs <= 1e-12);
        assert_float_eq!(end.y(), 5., abs <= 1e-12);
        assert_float_eq!(end.heading(), -FRAC_PI_2, abs <= 1e-12);
    }

    #[test]
    fn non_positive_radius_is_rejected() {
        let mut router = Router::new(Pose::default(), 0.5);
        assert_eq!(
            router.bend(FRAC_PI_2, 0.).unwrap_err(),
            RoutingError::NonPositiveRadius { radius: 0. }
        );
        assert!(router.bend(FRAC_PI_2, -3.).is_err());
        assert!(router.bend(FRAC_PI_2, f64::NAN).is_err());
    }

    #[test]
    fn negative_straight_is_traced() {
        let mut router = Router::new(Pose::default(), 0.5);
        router.straight(-4.);
        assert_float_eq!(router.current_pose().x(), -4., abs <= 1e-12);
        assert_float_eq!(router.length(), -4., abs <= 1e-12);
    }

    #[test]
    fn finalized_path_renders_polygons() {
        let mut router = Router::new(Pose::default(), 0.5);
        router.straight(10.).straight(0.).bend(FRAC_PI_2, 5.).unwrap();
        let path = router.finalize();
        assert_eq!(path.segments().len(), 3);
        // The zero-length straight encloses no area.
        assert_eq!(path.polygons().count(), 2);
        let bbox = path.bbox();
        assert_float_eq!(bbox.p0.y, -0.25, abs <= 1e-9);
        assert_float_eq!(bbox.p1.x, 15.25, abs <= 1e-9);
        assert_float_eq!(bbox.p1.y, 5., abs <= 1e-9);
    }
}
