use std::f64::consts::{FRAC_PI_2, PI};

use float_eq::assert_float_eq;
use photomask::geom::pose::angles_eq;
use photomask::geom::Pose;
use photomask::layout::routing::error::RoutingError;
use photomask::layout::routing::Router;

#[test]
fn right_turn_between_straights() {
    let mut router = Router::new(Pose::new(0., 0., FRAC_PI_2), 0.5);
    router
        .straight(10.)
        .bend(-FRAC_PI_2, 25.)
        .unwrap()
        .straight(77.);
    let end = router.current_pose();
    assert!(angles_eq(end.heading(), 0.));
    assert_float_eq!(end.x(), 102., abs <= 1e-9);
    assert_float_eq!(end.y(), 35., abs <= 1e-9);
    assert_float_eq!(router.length(), 87. + FRAC_PI_2 * 25., abs <= 1e-9);
}

#[test]
fn straight_until_x_emits_the_difference() {
    let mut router = Router::new(Pose::new(3., 1., 0.), 0.5);
    router.straight_until_x(40.).unwrap();
    assert_float_eq!(router.length(), 37., abs <= 1e-12);

    let mut west = Router::new(Pose::new(3., 1., PI), 0.5);
    west.straight_until_x(-7.).unwrap();
    assert_float_eq!(west.length(), 10., abs <= 1e-12);
}

#[test]
fn straight_until_x_requires_horizontal_heading() {
    let mut router = Router::new(Pose::new(0., 0., FRAC_PI_2), 0.5);
    assert!(matches!(
        router.straight_until_x(10.),
        Err(RoutingError::NotAxisAligned { .. })
    ));
}

#[test]
fn opposite_bends_restore_heading() {
    let start = Pose::new(5., -2., 0.3);
    let mut router = Router::new(start, 0.5);
    router.bend(0.7, 25.).unwrap().bend(-0.7, 25.).unwrap();
    assert_float_eq!(router.current_pose().heading(), 0.3, abs <= 1e-9);
}

#[test]
fn zero_radius_is_rejected() {
    let mut router = Router::new(Pose::default(), 0.5);
    assert!(matches!(
        router.bend(FRAC_PI_2, 0.),
        Err(RoutingError::NonPositiveRadius { .. })
    ));
}

#[test]
fn finalized_path_keeps_segments() {
    let start = Pose::new(0., 0., 0.);
    let mut router = Router::new(start, 0.5);
    router.straight(10.).turn_left(25.).unwrap();
    let path = router.finalize();
    assert_eq!(path.start(), start);
    assert_eq!(path.segments().len(), 2);
    assert_eq!(path.polygons().count(), 2);
    assert!(path.end().approx_eq(&Pose::new(35., 25., FRAC_PI_2), 1e-9));
}
