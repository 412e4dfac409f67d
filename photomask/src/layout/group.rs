//! Device groups: everything that makes up one test structure.

use arcstr::ArcStr;
use phogeom::bbox::{Bbox, BoundBox};

use super::element::{Element, TextElement};
use super::elements::{ComponentKind, PlacedComponent};
use super::layers::Layer;
use super::routing::{Router, WaveguidePath};
use super::validation::FiberPairReport;

/// A named collection of placed components, waveguides, and a label.
///
/// Device generators create an empty group and fill it with sequential `add_*` calls.
/// Grating couplers are kept apart from the other components
/// because each one is exported as its own cell.
#[derive(Debug, Clone, Default)]
pub struct DeviceGroup {
    name: ArcStr,
    gratings: Vec<PlacedComponent>,
    components: Vec<PlacedComponent>,
    paths: Vec<WaveguidePath>,
    label: Option<TextElement>,
    checks: Vec<FiberPairReport>,
}

impl DeviceGroup {
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    pub fn add_component(&mut self, component: PlacedComponent) {
        if component.kind() == ComponentKind::GratingCoupler {
            self.gratings.push(component);
        } else {
            self.components.push(component);
        }
    }

    pub fn add_path(&mut self, path: WaveguidePath) {
        self.paths.push(path);
    }

    /// Finalizes `router` and adds the traced waveguide.
    pub fn add_route(&mut self, router: Router) {
        self.add_path(router.finalize());
    }

    /// Sets the label, replacing any previous one.
    pub fn set_label(&mut self, label: TextElement) {
        self.label = Some(label);
    }

    pub fn add_check(&mut self, report: FiberPairReport) {
        self.checks.push(report);
    }

    /// Grating couplers, in placement order.
    #[inline]
    pub fn gratings(&self) -> &[PlacedComponent] {
        &self.gratings
    }

    /// Components other than grating couplers, in placement order.
    #[inline]
    pub fn components(&self) -> &[PlacedComponent] {
        &self.components
    }

    #[inline]
    pub fn paths(&self) -> &[WaveguidePath] {
        &self.paths
    }

    #[inline]
    pub fn label(&self) -> Option<&TextElement> {
        self.label.as_ref()
    }

    /// The fiber pair checks performed while building the device.
    #[inline]
    pub fn checks(&self) -> &[FiberPairReport] {
        &self.checks
    }

    pub fn has_pitch_warnings(&self) -> bool {
        self.checks.iter().any(|c| c.has_warnings())
    }

    /// All shapes owned directly by the device, excluding grating couplers.
    pub fn elements(&self) -> impl Iterator<Item = Element> + '_ {
        let components = self
            .components
            .iter()
            .flat_map(|c| c.elements().iter().cloned());
        let paths = self
            .paths
            .iter()
            .flat_map(|p| p.polygons().map(|poly| Element::new(Layer::Waveguide, poly)));
        components.chain(paths)
    }
}

impl BoundBox for DeviceGroup {
    fn bbox(&self) -> Bbox {
        let mut bbox = self
            .gratings
            .iter()
            .chain(self.components.iter())
            .fold(Bbox::empty(), |bbox, c| bbox.union(c.bbox()));
        bbox = self
            .paths
            .iter()
            .fold(bbox, |bbox, p| bbox.union(p.bbox()));
        if let Some(label) = &self.label {
            bbox = bbox.union(label.loc.bbox());
        }
        bbox
    }
}

#[cfg(test)]
mod tests {
    use phogeom::{Point, Pose};

    use super::*;
    use crate::layout::elements::grating::GratingParams;
    use crate::layout::elements::Primitives;

    #[test]
    fn gratings_kept_apart() {
        let prims = Primitives::default();
        let mut group = DeviceGroup::new("test");
        group.add_component(prims.grating_coupler(Point::zero(), &GratingParams::default()));
        group.add_component(prims.ring(&Pose::new(0., 50., 0.), 0.3, 20.));
        let mut router = Router::new(Pose::new(0., 0., 0.), 0.5);
        router.straight(10.);
        group.add_route(router);

        assert_eq!(group.gratings().len(), 1);
        assert_eq!(group.components().len(), 1);
        // Two ring halves and one straight.
        assert_eq!(group.elements().count(), 3);
        assert!(!group.bbox().is_empty());
    }
}
