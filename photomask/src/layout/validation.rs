//! Verifies that fiber-facing ports line up with the fiber array.

use std::fmt::Display;

use phogeom::round_to;
use serde::{Deserialize, Serialize};

use super::routing::PoseSource;
use crate::log::Log;
use crate::validation::{Empty, ValidatorOutput};

/// Number of decimal places positions are rounded to before comparison.
pub const CHECK_DIGITS: i32 = 9;

/// The rounded separation between two fiber ports.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairSeparation {
    pub x_diff: f64,
    pub y_diff: f64,
}

impl Log for PairSeparation {
    fn log(&self) {
        use crate::log::debug;
        debug!(
            "fiber pair separation: x = {}, y = {}",
            self.x_diff, self.y_diff
        );
    }
}

/// A fiber pair that cannot be served by one row of the fiber array.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum PitchWarning {
    /// The ports are not on the same row.
    RowMismatch { y_diff: f64 },
    /// The horizontal separation is not a multiple of the pitch.
    OffGrid { x_diff: f64, pitch: f64 },
}

impl Display for PitchWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            PitchWarning::RowMismatch { y_diff } => write!(
                f,
                "the gratings being checked have a y separation of {y_diff}"
            ),
            PitchWarning::OffGrid { x_diff, pitch } => write!(
                f,
                "the gratings being checked have a x separation of {}. Recommended is {}, {}, {}, {}...",
                x_diff.abs(),
                pitch,
                2. * pitch,
                3. * pitch,
                4. * pitch
            ),
        }
    }
}

impl Log for PitchWarning {
    fn log(&self) {
        use crate::log::warn;
        warn!("{self}");
    }
}

pub type FiberPairReport = ValidatorOutput<PitchWarning, Empty, PairSeparation>;

impl FiberPairReport {
    #[inline]
    pub fn separation(&self) -> PairSeparation {
        self.data
    }

    #[inline]
    pub fn x_diff(&self) -> f64 {
        self.data.x_diff
    }

    #[inline]
    pub fn y_diff(&self) -> f64 {
        self.data.y_diff
    }
}

/// Checks that fiber ports `a` and `b` share a row and sit a whole number of pitches apart.
///
/// Never fails: violations are logged as warnings and recorded in the report.
pub fn check_fiber_pair(a: &impl PoseSource, b: &impl PoseSource, pitch: f64) -> FiberPairReport {
    let (a, b) = (a.pose().rounded(CHECK_DIGITS), b.pose().rounded(CHECK_DIGITS));
    // Differences of rounded values still carry last-bit error.
    let separation = PairSeparation {
        x_diff: round_to(a.x() - b.x(), CHECK_DIGITS),
        y_diff: round_to(a.y() - b.y(), CHECK_DIGITS),
    };

    let mut report = FiberPairReport::with_data(separation);
    if separation.y_diff != 0. {
        report.warnings.push(PitchWarning::RowMismatch {
            y_diff: separation.y_diff,
        });
    }
    let remainder = round_to(separation.x_diff.abs() % pitch, CHECK_DIGITS);
    if remainder != 0. && remainder != round_to(pitch, CHECK_DIGITS) {
        report.warnings.push(PitchWarning::OffGrid {
            x_diff: separation.x_diff,
            pitch,
        });
    }
    report.log();
    report
}

#[cfg(test)]
mod tests {
    use phogeom::Pose;

    use super::*;

    #[test]
    fn two_pitches_apart() {
        let report = check_fiber_pair(&Pose::new(0., 0., 0.), &Pose::new(254., 0., 0.), 127.);
        assert_eq!(report.x_diff(), -254.);
        assert_eq!(report.y_diff(), 0.);
        assert!(!report.has_warnings());
    }

    #[test]
    fn off_grid() {
        let report = check_fiber_pair(&Pose::new(0., 0., 0.), &Pose::new(200., 0., 0.), 127.);
        assert_eq!(
            report.warnings(),
            &[PitchWarning::OffGrid {
                x_diff: -200.,
                pitch: 127.
            }]
        );
    }

    #[test]
    fn row_mismatch() {
        let report = check_fiber_pair(&Pose::new(0., 0., 0.), &Pose::new(0., 5., 0.), 127.);
        assert_eq!(
            report.warnings(),
            &[PitchWarning::RowMismatch { y_diff: -5. }]
        );
    }

    #[test]
    fn rounding_absorbs_drift() {
        let report = check_fiber_pair(
            &Pose::new(127. + 3e-12, -2e-11, 0.),
            &Pose::new(0., 0., 0.),
            127.,
        );
        assert!(!report.has_warnings());
        assert_eq!(report.x_diff(), 127.);
    }

    #[test]
    fn fractional_coordinates_stay_on_grid() {
        let report = check_fiber_pair(&Pose::new(33.3, 0., 0.), &Pose::new(160.3, 0., 0.), 127.);
        assert_eq!(report.x_diff(), -127.);
        assert!(!report.has_warnings());

        let report = check_fiber_pair(
            &Pose::new(250.3, 80.7, 0.),
            &Pose::new(250.3 + 381., 80.7, 0.),
            127.,
        );
        assert_eq!(report.x_diff(), -381.);
        assert_eq!(report.y_diff(), 0.);
        assert!(!report.has_warnings());
    }

    #[test]
    fn message_lists_pitch_multiples() {
        let msg = PitchWarning::OffGrid {
            x_diff: -200.,
            pitch: 127.,
        }
        .to_string();
        assert!(msg.ends_with("Recommended is 127, 254, 381, 508..."));
    }
}
