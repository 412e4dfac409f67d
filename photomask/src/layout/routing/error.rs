use std::fmt::Display;

use thiserror::Error;

/// A coordinate axis.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// Errors that abort the construction of a waveguide route.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoutingError {
    #[error("bend radius must be positive (got {radius})")]
    NonPositiveRadius { radius: f64 },

    #[error("cannot run straight until {axis} = {target}: heading {heading} rad is not parallel to the {axis} axis")]
    NotAxisAligned { axis: Axis, target: f64, heading: f64 },

    #[error("no fiber array channel satisfies the placement (origin x = {origin}, pitch {pitch}, {channels} channels)")]
    NoPitchSlot {
        origin: f64,
        pitch: f64,
        channels: usize,
    },
}
