use float_eq::assert_float_eq;
use photomask::devices::{
    self, directional_coupler, grating_loopback, mach_zehnder, mmi_1x2, ring_resonator,
    spiral_loopback, MmiDims, MziParams,
};
use photomask::geom::bbox::BoundBox;
use photomask::geom::Point;
use photomask::layout::group::DeviceGroup;

mod common;
use common::{grating, setup_ctx};

fn assert_on_pitch(group: &DeviceGroup) {
    assert!(!group.checks().is_empty(), "{} has no pair checks", group.name());
    for check in group.checks() {
        assert!(
            !check.has_warnings(),
            "{}: unexpected pitch warnings {:?}",
            group.name(),
            check.warnings()
        );
    }
}

#[test]
fn loopback_ports_are_one_pitch_apart() {
    let ctx = setup_ctx();
    let group = grating_loopback(&ctx, &grating(), 10., Point::zero(), "loopback").unwrap();

    assert_eq!(group.gratings().len(), 2);
    assert_eq!(group.checks().len(), 1);
    let check = &group.checks()[0];
    assert_float_eq!(check.x_diff(), -127., abs <= 1e-9);
    assert_float_eq!(check.y_diff(), 0., abs <= 1e-9);
    assert!(!check.has_warnings());

    let label = group.label().unwrap();
    assert_eq!(label.string, "loopback");
    assert_eq!(label.height, 10.);
}

#[test]
fn longer_taper_runs_only_stretch_the_loop() {
    let ctx = setup_ctx();
    let short = grating_loopback(&ctx, &grating(), 10., Point::zero(), "a").unwrap();
    let long = grating_loopback(&ctx, &grating(), 210., Point::zero(), "b").unwrap();
    assert_on_pitch(&long);
    assert_float_eq!(
        long.paths()[0].length() - short.paths()[0].length(),
        400.,
        abs <= 1e-9
    );
}

#[test]
fn mmi_outputs_share_the_input_row() {
    let ctx = setup_ctx();
    let dims = MmiDims::new(32.7, 6., 1.5, 20.);
    let group = mmi_1x2(&ctx, &grating(), &dims, Point::new(40., -12.), "1x2 MMI").unwrap();

    assert_eq!(group.gratings().len(), 3);
    assert_on_pitch(&group);
    for gc in group.gratings() {
        let port = gc.port("port").unwrap();
        assert_float_eq!(port.y(), -12., abs <= 1e-9);
    }
}

#[test]
fn generation_is_repeatable_with_fresh_names() {
    let ctx = setup_ctx();
    let a = directional_coupler(&ctx, &grating(), 1.27, 0.25, Point::zero(), "dc").unwrap();
    let b = directional_coupler(&ctx, &grating(), 1.27, 0.25, Point::zero(), "dc").unwrap();

    assert_eq!(a.bbox(), b.bbox());
    assert_eq!(a.paths().len(), b.paths().len());
    for (pa, pb) in a.paths().iter().zip(b.paths()) {
        assert_float_eq!(pa.length(), pb.length(), abs <= 1e-12);
    }
    for (ga, gb) in a.gratings().iter().zip(b.gratings()) {
        assert_eq!(ga.elements(), gb.elements());
        assert_ne!(ga.name(), gb.name());
    }
}

#[test]
fn coupler_outputs_return_to_the_array() {
    let ctx = setup_ctx();
    let group = directional_coupler(&ctx, &grating(), 1.27, 0.25, Point::zero(), "dc").unwrap();
    assert_eq!(group.gratings().len(), 4);
    assert_eq!(group.checks().len(), 3);
    assert_on_pitch(&group);
}

#[test]
fn every_device_family_lands_on_pitch() {
    let ctx = setup_ctx();
    let gc = grating();
    let position = Point::new(250., 80.);
    let mzi = MziParams::builder()
        .arm_length(150.)
        .delta_length(30.)
        .build()
        .unwrap();

    let groups = vec![
        ring_resonator(&ctx, &gc, 0.5, 95., position, "ring").unwrap(),
        spiral_loopback(&ctx, &gc, 17, 10., 15., position, "spiral").unwrap(),
        mach_zehnder(&ctx, &gc, &mzi, position, "mzi").unwrap(),
        devices::mmi_2x2(
            &ctx,
            &gc,
            &MmiDims::new(44.8, 6., 1.5, 20.),
            position,
            "2x2 MMI",
        )
        .unwrap(),
    ];
    for group in groups.iter() {
        assert_on_pitch(group);
    }
}

#[test]
fn fractional_origins_stay_on_pitch() {
    let ctx = setup_ctx();
    let gc = grating();
    let dims = MmiDims::new(32.7, 6., 1.5, 20.);

    let loopback = grating_loopback(&ctx, &gc, 10., Point::new(33.3, 0.), "loopback").unwrap();
    assert_eq!(loopback.checks()[0].x_diff(), -127.);
    assert_on_pitch(&loopback);

    let position = Point::new(250.3, 80.7);
    let groups = vec![
        mmi_1x2(&ctx, &gc, &dims, position, "1x2 MMI").unwrap(),
        directional_coupler(&ctx, &gc, 1.27, 0.25, position, "coupler").unwrap(),
        ring_resonator(&ctx, &gc, 0.5, 95., position, "ring").unwrap(),
        spiral_loopback(&ctx, &gc, 17, 10., 15., position, "spiral").unwrap(),
    ];
    for group in groups.iter() {
        assert_on_pitch(group);
    }
    assert_eq!(groups[0].checks()[1].x_diff(), -381.);
}

#[test]
fn failures_name_the_device() {
    let ctx = setup_ctx();
    let mzi = MziParams::builder().arm_length(10.).build().unwrap();
    let err = mach_zehnder(&ctx, &grating(), &mzi, Point::zero(), "short arms").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("short arms"), "{msg}");
    assert!(msg.contains("Mach-Zehnder"), "{msg}");
}
