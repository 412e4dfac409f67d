//! Device generators.
//!
//! Each generator places input grating couplers on one fiber array row,
//! routes them into an optical component, routes the component outputs back
//! down to the same row, and returns everything as a [`DeviceGroup`].
//! Every pair of fiber ports is checked against the fiber pitch on the way.

use arcstr::ArcStr;
use phogeom::Point;

use crate::config::{LabelConfig, MaskConfig, ProcessConfig};
use crate::error::{with_err_context, ErrorContext, Result};
use crate::layout::group::DeviceGroup;
use crate::layout::elements::Primitives;
use crate::layout::routing::idioms::PitchGrid;
use crate::layout::routing::{PoseSource, Router};
use crate::layout::validation::check_fiber_pair;
use crate::naming::NameSeq;

pub mod coupler;
pub mod loopback;
pub mod mmi;
pub mod mzi;
pub mod ring;
pub mod spiral;

pub use coupler::directional_coupler;
pub use loopback::grating_loopback;
pub use mmi::{mmi_1x2, mmi_2x2, MmiDims};
pub use mzi::{cascaded_mach_zehnder, interferometer_stage, mach_zehnder, MziParams};
pub use ring::ring_resonator;
pub use spiral::spiral_loopback;

/// Shared state for device generation.
#[derive(Debug, Clone, Default)]
pub struct DeviceCtx {
    prims: Primitives,
    label: LabelConfig,
}

impl DeviceCtx {
    pub fn new(prims: Primitives, label: LabelConfig) -> Self {
        Self { prims, label }
    }

    /// Creates a context from `config` that draws grating identifiers from `names`.
    pub fn from_config(config: &MaskConfig, names: NameSeq) -> Self {
        Self::new(
            Primitives::new(config.process.clone(), names),
            config.label.clone(),
        )
    }

    #[inline]
    pub fn prims(&self) -> &Primitives {
        &self.prims
    }

    #[inline]
    pub fn process(&self) -> &ProcessConfig {
        self.prims.process()
    }

    #[inline]
    pub fn label_config(&self) -> &LabelConfig {
        &self.label
    }

    /// Starts a waveguide of the process width at `source`.
    pub(crate) fn router(&self, source: &impl PoseSource) -> Router {
        Router::start_at(source, self.process().waveguide_width)
    }

    /// The fiber array channels of a device whose first coupler sits at `position`.
    pub(crate) fn pitch_grid(&self, position: Point) -> PitchGrid {
        PitchGrid::new(
            position.x,
            self.process().fiber_pitch,
            self.process().fiber_channels,
        )
    }

    /// The fiber port position of channel `k`, counting from `position`.
    pub(crate) fn slot(&self, position: Point, k: usize) -> Point {
        Point::new(
            position.x + k as f64 * self.process().fiber_pitch,
            position.y,
        )
    }

    /// Labels `group` with its own name at `origin` relative to `position`.
    pub(crate) fn add_label(
        &self,
        group: &mut DeviceGroup,
        position: Point,
        origin: Point,
        height: f64,
    ) {
        let text = self.prims.text_label(
            position + origin,
            height,
            self.label.angle,
            group.name().clone(),
        );
        group.set_label(text);
    }

    /// Checks a pair of fiber ports and records the report in `group`.
    pub(crate) fn check_pair(
        &self,
        group: &mut DeviceGroup,
        a: &impl PoseSource,
        b: &impl PoseSource,
    ) {
        group.add_check(check_fiber_pair(a, b, self.process().fiber_pitch));
    }
}

/// Runs a device generator, attaching the device name and kind to any error.
pub(crate) fn generate(
    name: &ArcStr,
    kind: &'static str,
    build: impl FnOnce() -> Result<DeviceGroup>,
) -> Result<DeviceGroup> {
    with_err_context(build(), || ErrorContext::GenDevice {
        name: name.clone(),
        kind: ArcStr::from(kind),
    })
}
