//! Conversion of mask layouts to foreign formats.

pub mod error;
pub mod gds;
