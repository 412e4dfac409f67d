use std::f64::consts::TAU;

use arcstr::ArcStr;
use phogeom::arc::annulus;
use phogeom::transform::Transform;
use phogeom::Point;

use super::{ComponentKind, PlacedComponent, Primitives};
use crate::layout::element::Element;
use crate::layout::layers::Layer;
use crate::layout::routing::PoseSource;

impl Primitives {
    /// Places a ring resonator beside the bus waveguide passing through `at`.
    ///
    /// The ring lies to the left of the bus heading, with `gap` between the
    /// waveguide edges. The bus itself is not drawn.
    pub fn ring(&self, at: &impl PoseSource, gap: f64, radius: f64) -> PlacedComponent {
        let w = self.process().waveguide_width;
        let at = at.pose();
        let frame = at.frame();
        let center = Point::new(0., radius + gap + w);

        let name = ArcStr::from(format!("RING_radius_{radius}_gap_{gap}"));
        let mut ring = PlacedComponent::new(name, ComponentKind::Ring);
        for half in annulus(center, radius - w / 2., radius + w / 2.) {
            ring.add_element(Element::new(Layer::Waveguide, half.transform(frame)));
        }
        ring.add_port("bus", at);
        ring.set_length(TAU * radius);
        ring
    }
}
