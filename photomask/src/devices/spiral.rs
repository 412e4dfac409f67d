use std::f64::consts::{FRAC_PI_2, PI};

use arcstr::ArcStr;
use phogeom::Point;

use super::{generate, DeviceCtx};
use crate::error::Result;
use crate::layout::elements::grating::GratingParams;
use crate::layout::group::DeviceGroup;
use crate::layout::routing::idioms::{exit_to_pitch, taper_entry};

/// A delay spiral between two grating couplers.
///
/// The spiral hangs above channel 0. Its output doubles back over the winding
/// and descends to the first fiber channel clear of the spiral body.
pub fn spiral_loopback(
    ctx: &DeviceCtx,
    gc: &GratingParams,
    turns: usize,
    gap: f64,
    inner_gap: f64,
    position: Point,
    name: impl Into<ArcStr>,
) -> Result<DeviceGroup> {
    let name = name.into();
    generate(&name, "spiral loopback", || {
        let process = ctx.process();
        let r = process.bend_radius;
        let mut group = DeviceGroup::new(name.clone());

        let input = ctx.prims().grating_coupler(position, gc);
        let mut wg_in = ctx.router(&input);
        taper_entry(&mut wg_in, process.taper_route, FRAC_PI_2, r)?;

        let spiral = ctx.prims().spiral(&wg_in, turns, gap, inner_gap)?;

        let mut wg_out = ctx.router(&spiral);
        wg_out.straight(process.taper_route).bend(-PI, r)?;
        let clearance = position.x + spiral.size() / 2.;
        exit_to_pitch(
            &mut wg_out,
            &ctx.pitch_grid(position),
            clearance,
            position.y,
            r,
        )?;
        let output = ctx.prims().grating_coupler_at(&wg_out, gc);

        ctx.check_pair(&mut group, &input, &output);
        let label = ctx.label_config();
        ctx.add_label(&mut group, position, label.spiral_origin, label.height);
        for component in [input, spiral.into_component(), output] {
            group.add_component(component);
        }
        group.add_route(wg_in);
        group.add_route(wg_out);
        Ok(group)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_lands_on_a_channel() {
        let ctx = DeviceCtx::default();
        for turns in [17, 22, 28] {
            let group = spiral_loopback(
                &ctx,
                &GratingParams::default(),
                turns,
                10.,
                15.,
                Point::new(0., 0.),
                "spiral",
            )
            .unwrap();
            assert_eq!(group.checks().len(), 1);
            assert!(!group.has_pitch_warnings());
            assert!(group.checks()[0].x_diff() < 0.);
        }
    }

    #[test]
    fn oversized_spiral_runs_out_of_channels() {
        let ctx = DeviceCtx::default();
        let err = spiral_loopback(
            &ctx,
            &GratingParams::default(),
            120,
            10.,
            15.,
            Point::new(0., 0.),
            "huge",
        )
        .unwrap_err();
        assert!(err.to_string().contains("huge"));
    }
}
