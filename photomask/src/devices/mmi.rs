use std::f64::consts::FRAC_PI_2;

use arcstr::ArcStr;
use phogeom::Point;
use serde::{Deserialize, Serialize};

use super::{generate, DeviceCtx};
use crate::error::Result;
use crate::layout::elements::grating::GratingParams;
use crate::layout::elements::mmi::MmiParams;
use crate::layout::group::DeviceGroup;
use crate::layout::routing::idioms::{exit_to_slot, taper_entry};

/// Body and taper dimensions of an MMI, independent of its port count.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct MmiDims {
    pub length: f64,
    pub width: f64,
    pub taper_width: f64,
    pub taper_length: f64,
}

impl MmiDims {
    pub fn new(length: f64, width: f64, taper_width: f64, taper_length: f64) -> Self {
        Self {
            length,
            width,
            taper_width,
            taper_length,
        }
    }

    /// The MMI with `inputs` and `outputs` ports spread across the body.
    pub fn with_ports(&self, inputs: usize, outputs: usize) -> MmiParams {
        MmiParams {
            length: self.length,
            width: self.width,
            taper_width: self.taper_width,
            taper_length: self.taper_length,
            inputs,
            outputs,
        }
    }
}

/// A 1x2 MMI splitter fed from fiber channel 0, with outputs on channels 2 and 3.
pub fn mmi_1x2(
    ctx: &DeviceCtx,
    gc: &GratingParams,
    dims: &MmiDims,
    position: Point,
    name: impl Into<ArcStr>,
) -> Result<DeviceGroup> {
    let name = name.into();
    generate(&name, "1x2 MMI", || {
        let process = ctx.process();
        let r = process.bend_radius;
        let mut group = DeviceGroup::new(name.clone());

        let input = ctx.prims().grating_coupler(position, gc);
        let mut wg_in = ctx.router(&input);
        taper_entry(&mut wg_in, process.taper_route, -FRAC_PI_2, r)?.straight(process.taper_route);

        let mmi = ctx.prims().mmi(&wg_in, &dims.with_ports(1, 2), 0)?;

        let mut wg_out0 = ctx.router(&mmi.port("o0")?);
        exit_to_slot(&mut wg_out0, ctx.slot(position, 2).x, position.y, r)?;
        let out0 = ctx.prims().grating_coupler(ctx.slot(position, 2), gc);

        let mut wg_out1 = ctx.router(&mmi.port("o1")?);
        exit_to_slot(&mut wg_out1, ctx.slot(position, 3).x, position.y, r)?;
        let out1 = ctx.prims().grating_coupler_at(&wg_out1, gc);

        ctx.check_pair(&mut group, &input, &out0);
        ctx.check_pair(&mut group, &input, &out1);

        let label = ctx.label_config();
        ctx.add_label(&mut group, position, label.origin, label.height);
        for component in [input, mmi, out0, out1] {
            group.add_component(component);
        }
        for wg in [wg_in, wg_out0, wg_out1] {
            group.add_route(wg);
        }
        Ok(group)
    })
}

/// A 2x2 MMI coupler.
///
/// Inputs come from fiber channels 0 and 1, outputs return on channels 3 and 4.
/// The channel 0 feed passes above channel 1 before entering the lower input;
/// the upper input descends to channel 1 across that feed.
pub fn mmi_2x2(
    ctx: &DeviceCtx,
    gc: &GratingParams,
    dims: &MmiDims,
    position: Point,
    name: impl Into<ArcStr>,
) -> Result<DeviceGroup> {
    let name = name.into();
    generate(&name, "2x2 MMI", || {
        let process = ctx.process();
        let r = process.bend_radius;
        let t = process.taper_route;
        let mut group = DeviceGroup::new(name.clone());

        let in0 = ctx.prims().grating_coupler(position, gc);
        let in1 = ctx.prims().grating_coupler(ctx.slot(position, 1), gc);

        let mut wg_in0 = ctx.router(&in0);
        taper_entry(&mut wg_in0, 2. * t, -FRAC_PI_2, r)?.straight(process.fiber_pitch + t);

        let mmi = ctx.prims().mmi(&wg_in0, &dims.with_ports(2, 2), 0)?;

        let mut wg_in1 = ctx.router(&mmi.port("i1")?);
        wg_in1
            .straight_until_x(ctx.slot(position, 1).x + r)?
            .bend(FRAC_PI_2, r)?
            .straight_until_y(position.y)?;

        let mut wg_out0 = ctx.router(&mmi.port("o0")?);
        exit_to_slot(&mut wg_out0, ctx.slot(position, 3).x, position.y, r)?;
        let out0 = ctx.prims().grating_coupler(ctx.slot(position, 3), gc);

        let mut wg_out1 = ctx.router(&mmi.port("o1")?);
        exit_to_slot(&mut wg_out1, ctx.slot(position, 4).x, position.y, r)?;
        let out1 = ctx.prims().grating_coupler(ctx.slot(position, 4), gc);

        ctx.check_pair(&mut group, &in0, &in1);
        ctx.check_pair(&mut group, &in0, &out0);
        ctx.check_pair(&mut group, &in0, &out1);

        let label = ctx.label_config();
        ctx.add_label(&mut group, position, label.origin, label.height);
        for component in [in0, in1, mmi, out0, out1] {
            group.add_component(component);
        }
        for wg in [wg_in0, wg_in1, wg_out0, wg_out1] {
            group.add_route(wg);
        }
        Ok(group)
    })
}

#[cfg(test)]
mod tests {
    use float_eq::assert_float_eq;

    use super::*;

    fn dims() -> MmiDims {
        MmiDims::new(32.7, 6., 1.5, 20.)
    }

    #[test]
    fn splitter_outputs_land_on_pitch() {
        let ctx = DeviceCtx::default();
        let gc = GratingParams::default();
        let group = mmi_1x2(&ctx, &gc, &dims(), Point::new(0., 0.), "mmi").unwrap();

        assert_eq!(group.gratings().len(), 3);
        assert_eq!(group.checks().len(), 2);
        assert!(!group.has_pitch_warnings());
        let xs: Vec<f64> = group.checks().iter().map(|c| c.x_diff()).collect();
        assert_float_eq!(xs[0], -254., abs <= 1e-9);
        assert_float_eq!(xs[1], -381., abs <= 1e-9);
    }

    #[test]
    fn coupler_uses_five_channels() {
        let ctx = DeviceCtx::default();
        let gc = GratingParams::default();
        let group = mmi_2x2(&ctx, &gc, &dims(), Point::new(100., -50.), "mmi").unwrap();

        assert_eq!(group.gratings().len(), 4);
        assert!(!group.has_pitch_warnings());
        let last = group.checks().last().unwrap();
        assert_float_eq!(last.x_diff(), -508., abs <= 1e-9);
        assert_float_eq!(last.y_diff(), 0., abs <= 1e-9);
    }
}
