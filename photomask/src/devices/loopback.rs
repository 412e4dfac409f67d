use arcstr::ArcStr;
use phogeom::Point;

use super::{generate, DeviceCtx};
use crate::error::Result;
use crate::layout::elements::grating::GratingParams;
use crate::layout::group::DeviceGroup;

/// Two grating couplers one fiber pitch apart, joined by a U-shaped waveguide.
///
/// Light launched from one fiber returns through the neighboring fiber of the same array row.
pub fn grating_loopback(
    ctx: &DeviceCtx,
    gc: &GratingParams,
    taper_route: f64,
    position: Point,
    name: impl Into<ArcStr>,
) -> Result<DeviceGroup> {
    let name = name.into();
    generate(&name, "grating loopback", || {
        let process = ctx.process();
        let r = process.bend_radius;
        let mut group = DeviceGroup::new(name.clone());

        let left = ctx.prims().grating_coupler(position, gc);

        let mut wg = ctx.router(&left);
        wg.straight(taper_route)
            .turn_right(r)?
            .straight(process.fiber_pitch - 2. * r)
            .turn_right(r)?
            .straight(taper_route);

        let right = ctx.prims().grating_coupler_at(&wg, gc);

        ctx.check_pair(&mut group, &left, &right);
        let label = ctx.label_config();
        ctx.add_label(&mut group, position, label.origin, label.loopback_height);
        group.add_component(left);
        group.add_component(right);
        group.add_route(wg);
        Ok(group)
    })
}
