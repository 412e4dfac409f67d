//! Mach-Zehnder interferometers built from directional couplers.

use std::f64::consts::FRAC_PI_2;

use arcstr::ArcStr;
use derive_builder::Builder;
use phogeom::Point;
use serde::{Deserialize, Serialize};

use super::{generate, DeviceCtx};
use crate::error::{ErrorSource, PhotomaskError, Result};
use crate::layout::elements::coupler::CouplerAnchor;
use crate::layout::elements::grating::GratingParams;
use crate::layout::elements::PlacedComponent;
use crate::layout::group::DeviceGroup;
use crate::layout::routing::idioms::exit_to_pitch;
use crate::layout::routing::{PoseSource, Router};

/// Coupler and arm dimensions of one interferometer stage.
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MziParams {
    /// Length of the parallel section of each directional coupler.
    #[builder(default = "1.27")]
    pub coupling_length: f64,
    /// Edge-to-edge gap of each directional coupler.
    #[builder(default = "0.25")]
    pub gap: f64,
    /// Horizontal extent of both arms.
    pub arm_length: f64,
    /// Extra optical length of the upper arm.
    #[builder(default = "0.")]
    pub delta_length: f64,
}

impl MziParams {
    #[inline]
    pub fn builder() -> MziParamsBuilder {
        MziParamsBuilder::default()
    }
}

/// A coupler followed by the two interferometer arms leaving it.
#[derive(Debug, Clone)]
pub struct InterferometerStage {
    pub coupler: PlacedComponent,
    /// The straight arm, leaving `r0`.
    pub lower: Router,
    /// The delay arm, leaving `r1`.
    pub upper: Router,
}

/// Places a directional coupler at `anchor` and draws both arms behind it.
///
/// The upper arm carries a rectangular detour adding `delta_length` to its path;
/// both arms end level with each other, one coupler separation apart, so the next
/// coupler can be anchored on the lower arm.
pub fn interferometer_stage(
    ctx: &DeviceCtx,
    anchor: &impl PoseSource,
    params: &MziParams,
) -> Result<InterferometerStage> {
    let r = ctx.process().bend_radius;
    if params.arm_length < 4. * r {
        return Err(PhotomaskError::new(ErrorSource::InvalidArgs(format!(
            "interferometer arm length {} is shorter than four bend radii ({})",
            params.arm_length,
            4. * r
        ))));
    }

    let coupler = ctx.prims().directional_coupler(
        anchor,
        params.coupling_length,
        params.gap,
        r,
        CouplerAnchor::L0,
    )?;

    let mut lower = ctx.router(&coupler.port("r0")?);
    lower.straight(params.arm_length);

    let run = (params.arm_length - 4. * r) / 2.;
    let rise = params.delta_length / 2.;
    let mut upper = ctx.router(&coupler.port("r1")?);
    upper
        .straight(run)
        .bend(FRAC_PI_2, r)?
        .straight(rise)
        .bend(-FRAC_PI_2, r)?
        .bend(-FRAC_PI_2, r)?
        .straight(rise)
        .bend(FRAC_PI_2, r)?
        .straight(run);

    Ok(InterferometerStage {
        coupler,
        lower,
        upper,
    })
}

/// A single-stage Mach-Zehnder interferometer.
pub fn mach_zehnder(
    ctx: &DeviceCtx,
    gc: &GratingParams,
    params: &MziParams,
    position: Point,
    name: impl Into<ArcStr>,
) -> Result<DeviceGroup> {
    cascaded_mach_zehnder(ctx, gc, params, 1, position, name)
}

/// `stages` interferometers in series, sharing `stages + 1` directional couplers.
///
/// Inputs come from fiber channels 0 and 1 as for a directional coupler.
/// The outputs return on the first channels clear of the last coupler.
pub fn cascaded_mach_zehnder(
    ctx: &DeviceCtx,
    gc: &GratingParams,
    params: &MziParams,
    stages: usize,
    position: Point,
    name: impl Into<ArcStr>,
) -> Result<DeviceGroup> {
    let name = name.into();
    generate(&name, "Mach-Zehnder interferometer", || {
        if stages == 0 {
            return Err(ErrorSource::InvalidArgs(
                "an interferometer needs at least one stage".to_string(),
            )
            .into());
        }
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

        let mut anchor = wg_lower.current_pose();
        group.add_route(wg_lower);
        let mut upper_entry = None;

        for _ in 0..stages {
            let stage = interferometer_stage(ctx, &anchor, params)?;
            if upper_entry.is_none() {
                upper_entry = Some(stage.coupler.port("l1")?);
            }
            anchor = stage.lower.current_pose();
            group.add_component(stage.coupler);
            group.add_route(stage.lower);
            group.add_route(stage.upper);
        }

        let last = ctx.prims().directional_coupler(
            &anchor,
            params.coupling_length,
            params.gap,
            r,
            CouplerAnchor::L0,
        )?;

        if let Some(l1) = upper_entry {
            let mut wg_upper = ctx.router(&in0);
            wg_upper
                .straight_until_y(l1.y() - r)?
                .bend(-FRAC_PI_2, r)?
                .straight_until_x(l1.x())?;
            group.add_route(wg_upper);
        }

        let grid = ctx.pitch_grid(position);
        let mut wg_out0 = ctx.router(&last.port("r0")?);
        let j0 = exit_to_pitch(
            &mut wg_out0,
            &grid,
            position.x + process.fiber_pitch,
            position.y,
            r,
        )?;
        let out0 = ctx.prims().grating_coupler_at(&wg_out0, gc);

        let mut wg_out1 = ctx.router(&last.port("r1")?);
        exit_to_pitch(&mut wg_out1, &grid, grid.slot(j0), position.y, r)?;
        let out1 = ctx.prims().grating_coupler_at(&wg_out1, gc);

        ctx.check_pair(&mut group, &in0, &in1);
        ctx.check_pair(&mut group, &in0, &out0);
        ctx.check_pair(&mut group, &in0, &out1);

        let label = ctx.label_config();
        ctx.add_label(&mut group, position, label.origin, label.height);
        for component in [in0, in1, last, out0, out1] {
            group.add_component(component);
        }
        group.add_route(wg_out0);
        group.add_route(wg_out1);
        Ok(group)
    })
}
