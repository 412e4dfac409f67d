//! Photonic integrated-circuit mask generation.
//!
//! Devices are assembled from grating couplers and optical components
//! connected by routed waveguides, packed onto a chip canvas, and written to GDSII.

pub mod config;
pub mod design;
pub mod devices;
pub mod error;
pub mod io;
pub mod layout;
pub mod naming;
pub mod validation;

pub use arcstr;
pub use phogeom as geom;

pub(crate) mod log;
