use std::f64::consts::FRAC_PI_2;

use arcstr::ArcStr;
use phogeom::Point;

use super::{generate, DeviceCtx};
use crate::error::Result;
use crate::layout::elements::grating::GratingParams;
use crate::layout::group::DeviceGroup;
use crate::layout::routing::idioms::taper_entry;

/// An all-pass ring resonator on a grating loopback.
///
/// The ring sits above the middle of the loopback's horizontal run.
pub fn ring_resonator(
    ctx: &DeviceCtx,
    gc: &GratingParams,
    gap: f64,
    radius: f64,
    position: Point,
    name: impl Into<ArcStr>,
) -> Result<DeviceGroup> {
    let name = name.into();
    generate(&name, "ring resonator", || {
        let process = ctx.process();
        let r = process.bend_radius;
        let half_run = (process.fiber_pitch - 2. * r) / 2.;
        let mut group = DeviceGroup::new(name.clone());

        let input = ctx.prims().grating_coupler(position, gc);
        let mut bus = ctx.router(&input);
        taper_entry(&mut bus, process.taper_route, -FRAC_PI_2, r)?.straight(half_run);

        let ring = ctx.prims().ring(&bus, gap, radius);

        bus.straight(half_run)
            .bend(-FRAC_PI_2, r)?
            .straight(process.taper_route);
        let output = ctx.prims().grating_coupler_at(&bus, gc);

        ctx.check_pair(&mut group, &input, &output);
        let label = ctx.label_config();
        ctx.add_label(&mut group, position, label.origin, label.height);
        for component in [input, ring, output] {
            group.add_component(component);
        }
        group.add_route(bus);
        Ok(group)
    })
}
