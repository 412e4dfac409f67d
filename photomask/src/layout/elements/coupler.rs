use std::f64::consts::PI;
use std::fmt::Display;

use arcstr::ArcStr;
use phogeom::transform::Transform;
use phogeom::{Point, Pose};
use serde::{Deserialize, Serialize};

use super::{ComponentKind, PlacedComponent, Primitives};
use crate::layout::element::Element;
use crate::layout::layers::Layer;
use crate::layout::routing::error::RoutingError;
use crate::layout::routing::{PoseSource, Router};

/// The input port of a directional coupler that is placed on the given pose.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum CouplerAnchor {
    /// The lower input, `l0`.
    #[default]
    L0,
    /// The upper input, `l1`.
    L1,
}

impl Display for CouplerAnchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CouplerAnchor::L0 => write!(f, "l0"),
            CouplerAnchor::L1 => write!(f, "l1"),
        }
    }
}

/// Lateral offset of one S-bend made of two arcs of `angle` on `radius`.
fn s_bend_offset(radius: f64, angle: f64) -> f64 {
    2. * radius * (1. - angle.cos())
}

impl Primitives {
    /// Places a directional coupler entered at `at`.
    ///
    /// Two arms approach each other through S-bends, run parallel for `length`
    /// with `gap` between their edges, and separate again. In the coupler frame
    /// the inputs `l0` (lower) and `l1` (upper) face back along the entry heading,
    /// and the outputs `r0` and `r1` face forward.
    pub fn directional_coupler(
        &self,
        at: &impl PoseSource,
        length: f64,
        gap: f64,
        bend_radius: f64,
        anchor: CouplerAnchor,
    ) -> Result<PlacedComponent, RoutingError> {
        let width = self.process().waveguide_width;
        let theta = self.process().coupler_bend_angle;
        let offset = s_bend_offset(bend_radius, theta);
        let separation = gap + width + 2. * offset;

        let mut lower = Router::new(Pose::new(0., 0., 0.), width);
        lower
            .bend(theta, bend_radius)?
            .bend(-theta, bend_radius)?
            .straight(length)
            .bend(-theta, bend_radius)?
            .bend(theta, bend_radius)?;

        let mut upper = Router::new(Pose::new(0., separation, 0.), width);
        upper
            .bend(-theta, bend_radius)?
            .bend(theta, bend_radius)?
            .straight(length)
            .bend(theta, bend_radius)?
            .bend(-theta, bend_radius)?;

        let arm_length = lower.length();
        let r0 = lower.current_pose();
        let r1 = upper.current_pose();

        let at = at.pose();
        let origin = match anchor {
            CouplerAnchor::L0 => at,
            CouplerAnchor::L1 => at.shifted_left(-separation),
        };
        let frame = origin.frame();

        let name = ArcStr::from(format!("DC_length_{length}_gap_{gap}"));
        let mut dc = PlacedComponent::new(name, ComponentKind::DirectionalCoupler);
        for arm in [lower.finalize(), upper.finalize()] {
            for poly in arm.polygons() {
                dc.add_element(Element::new(Layer::Waveguide, poly.transform(frame)));
            }
        }

        let local_ports = [
            ("l0", Pose::new(0., 0., PI)),
            ("l1", Pose::new(0., separation, PI)),
            ("r0", Pose::at(Point::new(r0.x(), 0.), 0.)),
            ("r1", Pose::at(Point::new(r1.x(), separation), 0.)),
        ];
        for (port, pose) in local_ports {
            dc.add_port(port, pose.transform(frame));
        }
        dc.set_length(arm_length);
        Ok(dc)
    }
}

/// Distance between the centerlines of the two ports on either side of a directional coupler.
pub fn coupler_port_separation(width: f64, gap: f64, bend_radius: f64, bend_angle: f64) -> f64 {
    gap + width + 2. * s_bend_offset(bend_radius, bend_angle)
}
