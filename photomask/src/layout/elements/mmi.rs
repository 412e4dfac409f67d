//! Multimode interference couplers.

use std::f64::consts::PI;

use arcstr::ArcStr;
use derive_builder::Builder;
use phogeom::transform::Transform;
use phogeom::{Point, Polygon, Pose, Rect};
use serde::{Deserialize, Serialize};

use super::{ComponentKind, PlacedComponent, PortError, Primitives};
use crate::layout::element::Element;
use crate::layout::layers::Layer;
use crate::layout::routing::PoseSource;

/// Dimensions of a tapered multimode interference section.
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MmiParams {
    /// Length of the multimode body.
    pub length: f64,
    /// Width of the multimode body.
    pub width: f64,
    /// Width of each access taper where it meets the body.
    pub taper_width: f64,
    pub taper_length: f64,
    #[builder(default = "1")]
    pub inputs: usize,
    #[builder(default = "2")]
    pub outputs: usize,
}

impl MmiParams {
    #[inline]
    pub fn builder() -> MmiParamsBuilder {
        MmiParamsBuilder::default()
    }

    /// Lateral position of port `k` of `n` ports spread evenly across the body.
    fn port_offset(&self, k: usize, n: usize) -> f64 {
        (k as f64 + 0.5) * self.width / n as f64 - self.width / 2.
    }

    /// Total extent along the propagation axis, tapers included.
    pub fn total_length(&self) -> f64 {
        self.length + 2. * self.taper_length
    }
}

fn taper(x0: f64, x1: f64, y: f64, w0: f64, w1: f64) -> Polygon {
    Polygon::new(vec![
        Point::new(x0, y - w0 / 2.),
        Point::new(x1, y - w1 / 2.),
        Point::new(x1, y + w1 / 2.),
        Point::new(x0, y + w0 / 2.),
    ])
}

impl Primitives {
    /// Places an MMI whose input `anchor_input` sits on `at`.
    ///
    /// Inputs are named `i0..`, outputs `o0..`; index 0 is the rightmost port
    /// when looking along the entry heading.
    pub fn mmi(
        &self,
        at: &impl PoseSource,
        params: &MmiParams,
        anchor_input: usize,
    ) -> Result<PlacedComponent, PortError> {
        let name = ArcStr::from(format!(
            "MMI_{}x{}_length_{}_width_{}",
            params.inputs, params.outputs, params.length, params.width
        ));
        if anchor_input >= params.inputs {
            return Err(PortError::IndexOutOfRange {
                component: name,
                index: anchor_input,
                count: params.inputs,
            });
        }

        let w = self.process().waveguide_width;
        let tl = params.taper_length;
        let x_out = params.total_length();
        let shift = params.port_offset(anchor_input, params.inputs);
        let frame = at.pose().shifted_left(-shift).frame();

        let mut mmi = PlacedComponent::new(name, ComponentKind::Mmi);
        let body = Rect::new(
            Point::new(tl, -params.width / 2.),
            Point::new(tl + params.length, params.width / 2.),
        );
        mmi.add_element(Element::new(Layer::Waveguide, body).transform(frame));

        for k in 0..params.inputs {
            let y = params.port_offset(k, params.inputs);
            let poly = taper(0., tl, y, w, params.taper_width);
            mmi.add_element(Element::new(Layer::Waveguide, poly.transform(frame)));
            mmi.add_port(format!("i{k}"), Pose::new(0., y, PI).transform(frame));
        }
        for k in 0..params.outputs {
            let y = params.port_offset(k, params.outputs);
            let poly = taper(x_out - tl, x_out, y, params.taper_width, w);
            mmi.add_element(Element::new(Layer::Waveguide, poly.transform(frame)));
            mmi.add_port(format!("o{k}"), Pose::new(x_out, y, 0.).transform(frame));
        }
        Ok(mmi)
    }
}
