//! The primitive factory: optical components placed at poses.
//!
//! Every factory method returns a [`PlacedComponent`], an immutable bundle of
//! drawable elements and named ports. Ports face out of the component.

use std::fmt::Display;

use arcstr::ArcStr;
use phogeom::bbox::{Bbox, BoundBox};
use phogeom::{Point, Pose};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::element::{Element, TextElement};
use super::layers::Layer;
use super::routing::PoseSource;
use crate::config::ProcessConfig;
use crate::naming::NameSeq;

pub mod coupler;
pub mod grating;
pub mod mmi;
pub mod ring;
pub mod spiral;

/// The kind of an optical component.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    GratingCoupler,
    DirectionalCoupler,
    Mmi,
    Ring,
    Spiral,
}

impl Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ComponentKind::GratingCoupler => "grating coupler",
            ComponentKind::DirectionalCoupler => "directional coupler",
            ComponentKind::Mmi => "MMI",
            ComponentKind::Ring => "ring",
            ComponentKind::Spiral => "spiral",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum PortError {
    #[error("component {component} has no port named {port}")]
    PortNotFound { component: ArcStr, port: ArcStr },
    #[error("component {component} has {count} input ports; port index {index} is out of range")]
    IndexOutOfRange {
        component: ArcStr,
        index: usize,
        count: usize,
    },
}

/// An optical component at a fixed location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedComponent {
    name: ArcStr,
    kind: ComponentKind,
    ports: Vec<(ArcStr, Pose)>,
    elements: Vec<Element>,
    /// Optical length of the component, where it is meaningful.
    length: Option<f64>,
}

impl PlacedComponent {
    pub(crate) fn new(name: impl Into<ArcStr>, kind: ComponentKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ports: Vec::new(),
            elements: Vec::new(),
            length: None,
        }
    }

    pub(crate) fn add_port(&mut self, name: impl Into<ArcStr>, pose: Pose) {
        self.ports.push((name.into(), pose));
    }

    pub(crate) fn add_element(&mut self, elem: Element) {
        self.elements.push(elem);
    }

    pub(crate) fn set_length(&mut self, length: f64) {
        self.length = Some(length);
    }

    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// Looks up the port named `name`.
    pub fn port(&self, name: &str) -> Result<Pose, PortError> {
        self.ports
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, pose)| *pose)
            .ok_or_else(|| PortError::PortNotFound {
                component: self.name.clone(),
                port: ArcStr::from(name),
            })
    }

    /// All ports in declaration order.
    #[inline]
    pub fn ports(&self) -> &[(ArcStr, Pose)] {
        &self.ports
    }

    #[inline]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    #[inline]
    pub fn length(&self) -> Option<f64> {
        self.length
    }
}

impl BoundBox for PlacedComponent {
    fn bbox(&self) -> Bbox {
        self.elements
            .iter()
            .fold(Bbox::empty(), |bbox, elem| bbox.union(elem.bbox()))
    }
}

/// A placed component yields its first declared port.
///
/// Every factory method in [`Primitives`] declares at least one port, so a
/// component always has a pose to route from.
impl PoseSource for PlacedComponent {
    fn pose(&self) -> Pose {
        debug_assert!(
            !self.ports.is_empty(),
            "component {} has no ports",
            self.name
        );
        self.ports
            .first()
            .map(|(_, pose)| *pose)
            .unwrap_or_default()
    }
}

/// Construction of a pose from a placed component's named anchor.
pub trait FromAnchor: Sized {
    fn from_anchor(component: &PlacedComponent, name: &str) -> Result<Self, PortError>;
}

impl FromAnchor for Pose {
    fn from_anchor(component: &PlacedComponent, name: &str) -> Result<Self, PortError> {
        component.port(name)
    }
}

/// Creates the primitive components that devices are assembled from.
///
/// Grating couplers draw their cell identifiers from the injected [`NameSeq`],
/// so every coupler produced by one factory (or by its clones) has a unique name.
#[derive(Debug, Clone, Default)]
pub struct Primitives {
    process: ProcessConfig,
    names: NameSeq,
}

impl Primitives {
    pub fn new(process: ProcessConfig, names: NameSeq) -> Self {
        Self { process, names }
    }

    #[inline]
    pub fn process(&self) -> &ProcessConfig {
        &self.process
    }

    #[inline]
    pub fn names(&self) -> &NameSeq {
        &self.names
    }

    /// Creates a text annotation on the label layer.
    pub fn text_label(
        &self,
        origin: Point,
        height: f64,
        angle: f64,
        text: impl Into<ArcStr>,
    ) -> TextElement {
        TextElement {
            string: text.into(),
            loc: origin,
            layer: Layer::Label,
            height,
            angle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::coupler::CouplerAnchor;
    use super::grating::GratingParams;
    use super::mmi::MmiParams;
    use super::*;

    #[test]
    fn every_primitive_routes_from_its_first_port() {
        let prims = Primitives::default();
        let at = Pose::new(10., -5., 0.3);
        let mmi = MmiParams::builder()
            .length(32.7)
            .width(6.)
            .taper_width(1.5)
            .taper_length(20.)
            .inputs(1)
            .outputs(2)
            .build()
            .unwrap();
        let components = [
            prims.grating_coupler(Point::new(1., 2.), &GratingParams::default()),
            prims
                .directional_coupler(&at, 1.27, 0.25, 25., CouplerAnchor::L0)
                .unwrap(),
            prims.mmi(&at, &mmi, 0).unwrap(),
            prims.ring(&at, 0.25, 20.),
            prims.spiral(&at, 3, 10., 15.).unwrap().into_component(),
        ];
        for component in components.iter() {
            let (name, first) = component
                .ports()
                .first()
                .unwrap_or_else(|| panic!("{} has no ports", component.name()));
            assert_eq!(component.pose(), *first, "{} routes from {name}", component.name());
        }
    }
}
