//! Recurring routing patterns between fiber couplers and devices.

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use super::error::RoutingError;
use super::Router;

/// Leaves a grating coupler: a straight taper run followed by a bend.
pub fn taper_entry(
    router: &mut Router,
    taper_route: f64,
    turn: f64,
    radius: f64,
) -> Result<&mut Router, RoutingError> {
    router.straight(taper_route).bend(turn, radius)
}

/// Routes an eastbound waveguide down into the fiber slot at `slot_x`.
///
/// Runs straight until one bend radius short of the slot, turns clockwise by 90 degrees,
/// and descends until `row_y`, arriving at `(slot_x, row_y)` heading south.
pub fn exit_to_slot(
    router: &mut Router,
    slot_x: f64,
    row_y: f64,
    radius: f64,
) -> Result<&mut Router, RoutingError> {
    router
        .straight_until_x(slot_x - radius)?
        .bend(-FRAC_PI_2, radius)?
        .straight_until_y(row_y)
}

/// The channel positions of a fiber array along a horizontal row.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchGrid {
    origin_x: f64,
    pitch: f64,
    channels: usize,
}

impl PitchGrid {
    /// Creates a grid with channel 0 at `origin_x`.
    pub fn new(origin_x: f64, pitch: f64, channels: usize) -> Self {
        Self {
            origin_x,
            pitch,
            channels,
        }
    }

    /// The x coordinate of channel `j`.
    #[inline]
    pub fn slot(&self, j: usize) -> f64 {
        self.origin_x + j as f64 * self.pitch
    }

    #[inline]
    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Finds the lowest channel whose x coordinate satisfies `accept`.
    pub fn find_slot(&self, accept: impl Fn(f64) -> bool) -> Result<usize, RoutingError> {
        (0..self.channels)
            .find(|&j| accept(self.slot(j)))
            .ok_or(RoutingError::NoPitchSlot {
                origin: self.origin_x,
                pitch: self.pitch,
                channels: self.channels,
            })
    }

    /// Finds the lowest channel strictly to the right of `x`.
    pub fn next_slot(&self, x: f64) -> Result<usize, RoutingError> {
        self.find_slot(|slot| slot > x)
    }
}

/// Routes an eastbound waveguide down into the first free fiber channel.
///
/// The chosen channel lies strictly beyond `clearance` and far enough right that the
/// descending bend starts no earlier than the router's current x.
/// Returns the chosen channel index.
pub fn exit_to_pitch(
    router: &mut Router,
    grid: &PitchGrid,
    clearance: f64,
    row_y: f64,
    radius: f64,
) -> Result<usize, RoutingError> {
    let x = router.current_pose().x();
    let j = grid.find_slot(|slot| slot > clearance && slot - radius >= x - 1e-9)?;
    exit_to_slot(router, grid.slot(j), row_y, radius)?;
    Ok(j)
}

#[cfg(test)]
mod tests {
    use float_eq::assert_float_eq;
    use phogeom::Pose;

    use super::*;

    #[test]
    fn exit_lands_on_slot() {
        let mut router = Router::new(Pose::new(200., 35., 0.), 0.5);
        exit_to_slot(&mut router, 254., 0., 25.).unwrap();
        let end = router.current_pose();
        assert_float_eq!(end.x(), 254., abs <= 1e-9);
        assert_eq!(end.y(), 0.);
        assert_float_eq!(end.heading(), -FRAC_PI_2, abs <= 1e-12);
    }

    #[test]
    fn slot_search() {
        let grid = PitchGrid::new(0., 127., 8);
        assert_eq!(grid.next_slot(0.).unwrap(), 1);
        assert_eq!(grid.next_slot(-1.).unwrap(), 0);
        assert_eq!(grid.next_slot(300.).unwrap(), 3);
        assert!(matches!(
            grid.next_slot(127. * 7.),
            Err(RoutingError::NoPitchSlot { channels: 8, .. })
        ));
    }

    #[test]
    fn exit_to_pitch_respects_bend_room() {
        let grid = PitchGrid::new(0., 127., 8);
        let mut router = Router::new(Pose::new(110., 40., 0.), 0.5);
        // Slot 1 is beyond the clearance but leaves no room for the bend.
        let j = exit_to_pitch(&mut router, &grid, 50., 0., 25.).unwrap();
        assert_eq!(j, 2);
        assert_float_eq!(router.current_pose().x(), 254., abs <= 1e-9);
    }

    #[test]
    fn taper_entry_turns() {
        let mut router = Router::new(Pose::new(0., 0., FRAC_PI_2), 0.5);
        taper_entry(&mut router, 10., -FRAC_PI_2, 25.).unwrap();
        let end = router.current_pose();
        assert_float_eq!(end.x(), 25., abs <= 1e-9);
        assert_float_eq!(end.y(), 35., abs <= 1e-9);
        assert_float_eq!(end.heading(), 0., abs <= 1e-12);
    }
}
