use std::f64::consts::FRAC_PI_2;

use arcstr::ArcStr;
use phogeom::{Point, Pose};

use super::{generate, DeviceCtx};
use crate::error::Result;
use crate::layout::elements::coupler::CouplerAnchor;
use crate::layout::elements::grating::GratingParams;
use crate::layout::elements::FromAnchor;
use crate::layout::group::DeviceGroup;
use crate::layout::routing::idioms::exit_to_slot;

/// A directional coupler between four grating couplers.
///
/// The couplers occupy fiber channels 0 to 3. Channel 1 feeds the lower input,
/// channel 0 the upper input; the lower and upper outputs return on channels 2 and 3.
pub fn directional_coupler(
    ctx: &DeviceCtx,
    gc: &GratingParams,
    coupling_length: f64,
    gap: f64,
    position: Point,
    name: impl Into<ArcStr>,
) -> Result<DeviceGroup> {
    let name = name.into();
    generate(&name, "directional coupler", || {
        let process = ctx.process();
        let r = process.bend_radius;
        let mut group = DeviceGroup::new(name.clone());

        let in0 = ctx.prims().grating_coupler(position, gc);
        let in1 = ctx.prims().grating_coupler(ctx.slot(position, 1), gc);

        let mut wg_lower = ctx.router(&in1);
        wg_lower
            .straight(process.taper_route)
            .bend(-FRAC_PI_2, r)?
            .straight(process.taper_route);

        let dc = ctx
            .prims()
            .directional_coupler(&wg_lower, coupling_length, gap, r, CouplerAnchor::L0)?;
        let l1 = Pose::from_anchor(&dc, "l1")?;

        let mut wg_upper = ctx.router(&in0);
        wg_upper
            .straight_until_y(l1.y() - r)?
            .bend(-FRAC_PI_2, r)?
            .straight_until_x(l1.x())?;

        let mut wg_out0 = ctx.router(&dc.port("r0")?);
        exit_to_slot(&mut wg_out0, ctx.slot(position, 2).x, position.y, r)?;
        let out0 = ctx.prims().grating_coupler(ctx.slot(position, 2), gc);

        let mut wg_out1 = ctx.router(&dc.port("r1")?);
        exit_to_slot(&mut wg_out1, ctx.slot(position, 3).x, position.y, r)?;
        let out1 = ctx.prims().grating_coupler_at(&wg_out1, gc);

        ctx.check_pair(&mut group, &in0, &in1);
        ctx.check_pair(&mut group, &in0, &out0);
        ctx.check_pair(&mut group, &in0, &out1);

        let label = ctx.label_config();
        ctx.add_label(&mut group, position, label.origin, label.height);
        for component in [in0, in1, dc, out0, out1] {
            group.add_component(component);
        }
        for wg in [wg_lower, wg_upper, wg_out0, wg_out1] {
            group.add_route(wg);
        }
        Ok(group)
    })
}
