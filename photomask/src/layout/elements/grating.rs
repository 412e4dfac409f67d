//! Focusing grating couplers.

use std::f64::consts::{FRAC_PI_2, PI};

use arcstr::ArcStr;
use derive_builder::Builder;
use phogeom::arc::{annular_sector, arc_points};
use phogeom::transform::{Transform, Transformation};
use phogeom::{Point, Polygon, Pose};
use serde::{Deserialize, Serialize};

use super::{ComponentKind, PlacedComponent, Primitives};
use crate::layout::element::Element;
use crate::layout::layers::Layer;
use crate::layout::routing::PoseSource;

/// Direction the teeth of a free-standing grating point to.
pub const DEFAULT_GRATING_ANGLE: f64 = -FRAC_PI_2;

/// Geometry of a focusing grating coupler.
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GratingParams {
    /// Width of the single-mode waveguide the taper starts from.
    #[builder(default = "0.5")]
    pub width: f64,
    /// Full opening angle of the fan, in radians.
    #[builder(default = "2.52f64.to_radians()")]
    pub opening_angle: f64,
    #[builder(default = "0.63")]
    pub period: f64,
    /// Fraction of each period that is left unetched.
    #[builder(default = "0.5")]
    pub fill_factor: f64,
    #[builder(default = "60")]
    pub periods: usize,
    #[builder(default = "350.")]
    pub taper_length: f64,
    /// Extra opening angle given to the etched teeth so they overlap the outline edges.
    #[builder(default = "0.35f64.to_radians()")]
    pub teeth_margin: f64,
}

impl Default for GratingParams {
    fn default() -> Self {
        Self {
            width: 0.5,
            opening_angle: 2.52f64.to_radians(),
            period: 0.63,
            fill_factor: 0.5,
            periods: 60,
            taper_length: 350.,
            teeth_margin: 0.35f64.to_radians(),
        }
    }
}

impl GratingParams {
    #[inline]
    pub fn builder() -> GratingParamsBuilder {
        GratingParamsBuilder::default()
    }

    /// Distance from the fan apex to the waveguide end of the taper.
    fn apex_offset(&self) -> f64 {
        (self.width / 2.) / (self.opening_angle / 2.).tan()
    }

    /// Distance from the port to the outer edge of the last tooth.
    pub fn total_length(&self) -> f64 {
        self.taper_length + self.periods as f64 * self.period
    }

    /// Outline and teeth polygons with the port at the origin and the teeth along +x.
    fn local_geometry(&self) -> (Polygon, Vec<Polygon>) {
        let a = self.apex_offset();
        let apex = Point::new(-a, 0.);
        let r_end = a + self.total_length();

        let mut outline = vec![Point::new(0., -self.width / 2.)];
        outline.extend(arc_points(
            apex,
            r_end,
            -self.opening_angle / 2.,
            self.opening_angle,
        ));
        outline.push(Point::new(0., self.width / 2.));

        let teeth_angle = self.opening_angle + self.teeth_margin;
        let teeth = (0..self.periods)
            .map(|k| {
                let r0 = a + self.taper_length + k as f64 * self.period;
                annular_sector(
                    apex,
                    r0 + self.fill_factor * self.period,
                    r0 + self.period,
                    -teeth_angle / 2.,
                    teeth_angle,
                )
            })
            .collect();

        (Polygon::new(outline), teeth)
    }
}

impl Primitives {
    /// Places a grating coupler with its port at `origin` and its teeth pointing down.
    pub fn grating_coupler(&self, origin: Point, params: &GratingParams) -> PlacedComponent {
        self.grating_coupler_facing(origin, DEFAULT_GRATING_ANGLE, params)
    }

    /// Terminates a waveguide with a grating coupler.
    ///
    /// The teeth continue along the heading of `source`,
    /// so the coupler's port coincides with the waveguide end.
    pub fn grating_coupler_at(
        &self,
        source: &impl PoseSource,
        params: &GratingParams,
    ) -> PlacedComponent {
        let pose = source.pose();
        self.grating_coupler_facing(pose.point(), pose.heading(), params)
    }

    /// Places a grating coupler whose teeth point in direction `angle`.
    pub fn grating_coupler_facing(
        &self,
        origin: Point,
        angle: f64,
        params: &GratingParams,
    ) -> PlacedComponent {
        let id = self.names().next_id();
        let name = ArcStr::from(format!(
            "GC_period_{}_coords_{}_{}_{}",
            params.period, origin.x, origin.y, id
        ));

        let frame = Transformation::cascade(
            Transformation::translate(origin.x, origin.y),
            Transformation::rotate(angle),
        );
        let (outline, teeth) = params.local_geometry();

        let mut gc = PlacedComponent::new(name, ComponentKind::GratingCoupler);
        gc.add_element(Element::new(Layer::Waveguide, outline.transform(frame)));
        for tooth in teeth {
            gc.add_element(Element::new(Layer::Grating, tooth.transform(frame)));
        }
        gc.add_port("port", Pose::at(origin, angle + PI));
        gc
    }
}

#[cfg(test)]
mod tests {
    use float_eq::assert_float_eq;
    use phogeom::bbox::BoundBox;

    use super::*;

    #[test]
    fn port_faces_away_from_teeth() {
        let prims = Primitives::default();
        let gc = prims.grating_coupler(Point::new(127., 0.), &GratingParams::default());
        let port = gc.port("port").unwrap();
        assert_eq!(port.point(), Point::new(127., 0.));
        assert_float_eq!(port.heading(), FRAC_PI_2, abs <= 1e-12);

        let bbox = gc.bbox();
        assert!(bbox.p1.y <= 1e-9);
        assert!(bbox.p0.y < -350.);
    }

    #[test]
    fn teeth_on_grating_layer() {
        let params = GratingParams::builder().periods(4).build().unwrap();
        let gc = Primitives::default().grating_coupler(Point::zero(), &params);
        let teeth = gc
            .elements()
            .iter()
            .filter(|e| e.layer == Layer::Grating)
            .count();
        assert_eq!(teeth, 4);
        assert_eq!(gc.elements().len(), 5);
    }

    #[test]
    fn names_are_unique() {
        let prims = Primitives::default();
        let params = GratingParams::default();
        let a = prims.grating_coupler(Point::zero(), &params);
        let b = prims.grating_coupler(Point::zero(), &params);
        assert_eq!(a.name(), "GC_period_0.63_coords_0_0_0");
        assert_eq!(b.name(), "GC_period_0.63_coords_0_0_1");
    }

    #[test]
    fn builder_defaults_match_default() {
        assert_eq!(
            GratingParams::builder().build().unwrap(),
            GratingParams::default()
        );
    }
}
