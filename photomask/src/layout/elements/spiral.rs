//! Double spirals for long, compact delay lines.

use std::f64::consts::PI;

use arcstr::ArcStr;
use phogeom::bbox::{Bbox, BoundBox};
use phogeom::transform::Transform;
use phogeom::Pose;

use super::{ComponentKind, PlacedComponent, Primitives};
use crate::layout::element::Element;
use crate::layout::layers::Layer;
use crate::layout::routing::error::RoutingError;
use crate::layout::routing::{PoseSource, Router};

/// A placed spiral and its extent across the entry axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Spiral {
    component: PlacedComponent,
    size: f64,
}

impl Spiral {
    #[inline]
    pub fn component(&self) -> &PlacedComponent {
        &self.component
    }

    #[inline]
    pub fn into_component(self) -> PlacedComponent {
        self.component
    }

    /// Extent of the spiral perpendicular to the entry heading, waveguide width included.
    #[inline]
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Optical length from `in` to `out`.
    pub fn length(&self) -> f64 {
        self.component.length().unwrap_or_default()
    }

    /// The exit port.
    pub fn out_port(&self) -> Pose {
        self.component.ports()[1].1
    }
}

impl PoseSource for Spiral {
    fn pose(&self) -> Pose {
        self.out_port()
    }
}

impl Primitives {
    /// Places a point-symmetric double spiral entered at `at`.
    ///
    /// The waveguide winds inward through `2 * turns` semicircles to the right of the
    /// entry heading, reverses through an S-bend of radius `inner_gap / 4`, and winds
    /// back out between its own inward track. Adjacent tracks are separated by `gap`.
    /// The `out` port faces along the entry heading, displaced to the right of `in`
    /// by the full width of the winding.
    pub fn spiral(
        &self,
        at: &impl PoseSource,
        turns: usize,
        gap: f64,
        inner_gap: f64,
    ) -> Result<Spiral, RoutingError> {
        let w = self.process().waveguide_width;
        let pitch = gap + w;
        let inner = inner_gap / 4.;
        let n = 2 * turns;
        let outer = n as f64 * pitch + 2. * inner - pitch / 2.;
        let radii: Vec<f64> = (0..n).map(|k| outer - k as f64 * pitch).collect();

        let mut router = Router::new(Pose::new(0., 0., 0.), w);
        for &r in radii.iter() {
            router.bend(-PI, r)?;
        }
        router.bend(-PI, inner)?.bend(PI, inner)?;
        for &r in radii.iter().rev() {
            router.bend(PI, r)?;
        }
        let out = router.current_pose();
        let path = router.finalize();

        let frame = at.pose().frame();
        let local_bbox = path.bbox();
        let size = if local_bbox.is_empty() {
            0.
        } else {
            local_bbox.height()
        };

        let name = ArcStr::from(format!("SPIRAL_loops_{turns}_gap_{gap}_inner_{inner_gap}"));
        let mut spiral = PlacedComponent::new(name, ComponentKind::Spiral);
        for poly in path.polygons() {
            spiral.add_element(Element::new(Layer::Waveguide, poly.transform(frame)));
        }
        spiral.add_port("in", Pose::new(0., 0., PI).transform(frame));
        spiral.add_port("out", out.transform(frame));
        spiral.set_length(path.length());

        Ok(Spiral {
            component: spiral,
            size,
        })
    }
}

impl BoundBox for Spiral {
    fn bbox(&self) -> Bbox {
        self.component.bbox()
    }
}

#[cfg(test)]
mod tests {
    use float_eq::assert_float_eq;
    use phogeom::pose::angles_eq;

    use super::*;

    #[test]
    fn out_port_beside_entry() {
        let spiral = Primitives::default()
            .spiral(&Pose::new(0., 0., 0.), 2, 10., 15.)
            .unwrap();
        let delta = 10.5;
        let out = spiral.out_port();
        assert_float_eq!(out.x(), 0., abs <= 1e-9);
        assert_float_eq!(out.y(), -(8. * delta + 15.), abs <= 1e-9);
        assert_float_eq!(out.heading(), 0., abs <= 1e-9);
        assert_float_eq!(spiral.size(), 8. * delta + 15. + 0.5, abs <= 1e-6);
    }

    #[test]
    fn length_counts_every_semicircle() {
        let spiral = Primitives::default()
            .spiral(&Pose::new(0., 0., 0.), 1, 10., 20.)
            .unwrap();
        let d = 10.5;
        let r0 = 2. * d + 10. - d / 2.;
        let expected = PI * (2. * (r0 + (r0 - d)) + 10.);
        assert_float_eq!(spiral.length(), expected, abs <= 1e-9);
    }

    #[test]
    fn rotated_placement() {
        let spiral = Primitives::default()
            .spiral(&Pose::new(100., 50., PI), 1, 10., 15.)
            .unwrap();
        let out = spiral.out_port();
        // Heading west, the winding lies to the north.
        assert!(out.y() > 50.);
        assert_float_eq!(out.x(), 100., abs <= 1e-9);
        assert!(angles_eq(out.heading(), PI));
        let bbox = spiral.bbox();
        assert_float_eq!(bbox.height(), spiral.size(), abs <= 1e-6);
    }
}
