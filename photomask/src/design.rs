//! The default chip: parameter sweeps of every device type, packed onto one canvas.

use std::fmt::Display;
use std::str::FromStr;

use arcstr::ArcStr;
use itertools::iproduct;
use phogeom::bbox::BoundBox;
use phogeom::{Point, Rect};
use serde::{Deserialize, Serialize};

use crate::config::{ChipConfig, MaskConfig};
use crate::devices::{self, DeviceCtx, MmiDims, MziParams};
use crate::error::{with_err_context, ErrorContext, ErrorSource, PhotomaskError, Result};
use crate::layout::element::Element;
use crate::layout::group::DeviceGroup;
use crate::layout::layers::Layer;
use crate::layout::placement::grid::{GridLayout, Placement};
use crate::layout::MaskLayout;
use crate::log::info;
use crate::naming::NameSeq;

/// Title written above the device rows.
pub const LAYOUT_TITLE: &str = "Example_SOI_Devices_Zhaojin_2023";
/// Name of the top-level cell.
pub const TOP_CELL_NAME: &str = "Cell0_University_of_Bristol_Nanofab_2024_ZL";

/// A family of devices generated over a parameter sweep.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepKind {
    /// Grating loopbacks with varying taper runs.
    Grating,
    /// A single reference grating loopback.
    Test,
    Coupler,
    Mmi1x2,
    Mmi2x2,
    Ring,
    Spiral,
    Mzi,
}

impl SweepKind {
    pub const ALL: [SweepKind; 8] = [
        SweepKind::Grating,
        SweepKind::Test,
        SweepKind::Coupler,
        SweepKind::Mmi1x2,
        SweepKind::Mmi2x2,
        SweepKind::Ring,
        SweepKind::Spiral,
        SweepKind::Mzi,
    ];

    /// The sweeps placed on the default chip, one row group each, top to bottom.
    pub const DEFAULT: [SweepKind; 3] = [SweepKind::Spiral, SweepKind::Ring, SweepKind::Grating];

    pub fn as_str(&self) -> &'static str {
        match self {
            SweepKind::Grating => "grating",
            SweepKind::Test => "test",
            SweepKind::Coupler => "coupler",
            SweepKind::Mmi1x2 => "mmi1x2",
            SweepKind::Mmi2x2 => "mmi2x2",
            SweepKind::Ring => "ring",
            SweepKind::Spiral => "spiral",
            SweepKind::Mzi => "mzi",
        }
    }
}

impl Display for SweepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SweepKind {
    type Err = PhotomaskError;

    fn from_str(s: &str) -> Result<Self> {
        SweepKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                ErrorSource::InvalidArgs(format!(
                    "unknown sweep {s:?}; expected one of {}",
                    SweepKind::ALL.map(|k| k.as_str()).join(", ")
                ))
                .into()
            })
    }
}

/// `steps` evenly spaced values from `start` to `stop` inclusive.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Linspace {
    pub start: f64,
    pub stop: f64,
    pub steps: usize,
}

impl Linspace {
    pub fn new(start: f64, stop: f64, steps: usize) -> Self {
        Self { start, stop, steps }
    }

    pub fn values(&self) -> Vec<f64> {
        match self.steps {
            0 => Vec::new(),
            1 => vec![self.start],
            n => {
                let step = (self.stop - self.start) / (n - 1) as f64;
                (0..n)
                    .map(|i| {
                        if i == n - 1 {
                            self.stop
                        } else {
                            self.start + i as f64 * step
                        }
                    })
                    .collect()
            }
        }
    }
}

/// One point of the directional coupler sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouplerVariant {
    pub gap: f64,
    pub coupling_length: f64,
    /// Nominal power splitting ratio, used in the device name.
    pub ratio: ArcStr,
}

/// Parameter lists swept by each [`SweepKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepParams {
    /// Taper runs of the grating loopback sweep.
    pub grating_taper_routes: Vec<f64>,
    pub couplers: Vec<CouplerVariant>,
    pub mmi_1x2: MmiDims,
    pub mmi_2x2: MmiDims,
    pub ring_radii: Linspace,
    pub ring_gaps: Linspace,
    pub spiral_turns: Vec<usize>,
    pub spiral_gaps: Vec<f64>,
    pub spiral_inner_gaps: Vec<f64>,
    pub mzi_arm_length: f64,
    pub mzi_delta_lengths: Vec<f64>,
    pub mzi_stages: Vec<usize>,
}

impl Default for SweepParams {
    fn default() -> Self {
        Self {
            grating_taper_routes: vec![
                10., 110., 210., 150., 100., 80., 160., 200., 140., 101., 111., 211., 151., 81.,
                161., 201., 141.,
            ],
            couplers: vec![CouplerVariant {
                gap: 0.25,
                coupling_length: 1.27,
                ratio: arcstr::literal!("90 : 10"),
            }],
            mmi_1x2: MmiDims::new(32.7, 6., 1.5, 20.),
            mmi_2x2: MmiDims::new(44.8, 6., 1.5, 20.),
            ring_radii: Linspace::new(70., 120., 3),
            ring_gaps: Linspace::new(0.25, 0.75, 3),
            spiral_turns: vec![17, 22, 28],
            spiral_gaps: vec![10.],
            spiral_inner_gaps: vec![15.],
            mzi_arm_length: 120.,
            mzi_delta_lengths: vec![0., 20., 40.],
            mzi_stages: vec![1, 2],
        }
    }
}

/// Fills canvas rows left to right, wrapping when the running width passes the chip width.
struct RowPacker {
    grid: GridLayout,
    chip_width: f64,
    horizontal_spacing: f64,
    horizontal_alignment: f64,
    current_width: f64,
}

impl RowPacker {
    fn new(title: &str, chip: &ChipConfig) -> Self {
        Self {
            grid: GridLayout::new(title, chip.into()),
            chip_width: chip.width,
            horizontal_spacing: chip.horizontal_spacing,
            horizontal_alignment: chip.horizontal_alignment,
            current_width: chip.horizontal_alignment,
        }
    }

    fn begin_new_row(&mut self) {
        self.grid.begin_new_row();
        self.current_width = self.horizontal_alignment;
    }

    fn add(&mut self, group: DeviceGroup) {
        let bbox = group.bbox();
        let width = if bbox.is_empty() { 0. } else { bbox.width() };
        self.current_width += width + self.horizontal_spacing * 1.5;
        if self.current_width > self.chip_width {
            self.grid.begin_new_row();
            self.grid.add_to_row(group);
            self.current_width = width + self.horizontal_alignment + self.horizontal_spacing;
        } else {
            self.grid.add_to_row(group);
        }
    }
}

/// A chip populated with device sweeps.
#[derive(Debug, Clone)]
pub struct DesignSpace {
    config: MaskConfig,
    sweeps: Vec<SweepKind>,
    names: NameSeq,
}

impl DesignSpace {
    /// A design space with the default sweeps.
    pub fn new(config: MaskConfig) -> Self {
        Self {
            config,
            sweeps: SweepKind::DEFAULT.to_vec(),
            names: NameSeq::new(),
        }
    }

    /// Replaces the sweeps to place, in order.
    pub fn with_sweeps(mut self, sweeps: impl IntoIterator<Item = SweepKind>) -> Self {
        self.sweeps = sweeps.into_iter().collect();
        self
    }

    #[inline]
    pub fn config(&self) -> &MaskConfig {
        &self.config
    }

    #[inline]
    pub fn sweeps(&self) -> &[SweepKind] {
        &self.sweeps
    }

    /// Generates every device of one sweep at the origin.
    pub fn sweep(&self, kind: SweepKind, ctx: &DeviceCtx) -> Result<Vec<DeviceGroup>> {
        let result = self.sweep_inner(kind, ctx);
        with_err_context(result, || {
            ErrorContext::Task(arcstr::format!("generating {} sweep", kind))
        })
    }

    fn sweep_inner(&self, kind: SweepKind, ctx: &DeviceCtx) -> Result<Vec<DeviceGroup>> {
        let gc = &self.config.grating;
        let sweeps = &self.config.sweeps;
        let origin = Point::zero();

        match kind {
            SweepKind::Grating => sweeps
                .grating_taper_routes
                .iter()
                .map(|&length| {
                    let name = format!(
                        "Grating Loopback_ZL\nAdded Length {length}um\nWidth {}um\nPeriod {}um\nff {}",
                        gc.width,
                        phogeom::round_to(gc.period, 3),
                        gc.fill_factor
                    );
                    devices::grating_loopback(ctx, gc, length, origin, name)
                })
                .collect(),
            SweepKind::Test => {
                let name = format!(
                    "TEST Grating Loopback\nPeriod {}um  ff {}\nGrating Taper Length {}um",
                    gc.period, gc.fill_factor, gc.taper_length
                );
                let taper_route = ctx.process().taper_route;
                Ok(vec![devices::grating_loopback(
                    ctx,
                    gc,
                    taper_route,
                    origin,
                    name,
                )?])
            }
            SweepKind::Coupler => sweeps
                .couplers
                .iter()
                .map(|v| {
                    let name = format!(
                        "Directional Coupler  {}\nGap {}um\nCoupling Length {}um",
                        v.ratio, v.gap, v.coupling_length
                    );
                    devices::directional_coupler(ctx, gc, v.coupling_length, v.gap, origin, name)
                })
                .collect(),
            SweepKind::Mmi1x2 => Ok(vec![devices::mmi_1x2(
                ctx,
                gc,
                &sweeps.mmi_1x2,
                origin,
                "1x2 MMI",
            )?]),
            SweepKind::Mmi2x2 => Ok(vec![devices::mmi_2x2(
                ctx,
                gc,
                &sweeps.mmi_2x2,
                origin,
                "2x2 MMI",
            )?]),
            SweepKind::Ring => iproduct!(sweeps.ring_radii.values(), sweeps.ring_gaps.values())
                .map(|(radius, gap)| {
                    let name = format!("Ring_Resonator_ZL\nRadius_{radius:?}\nGap_{gap:?}");
                    devices::ring_resonator(ctx, gc, gap, radius, origin, name)
                })
                .collect(),
            SweepKind::Spiral => iproduct!(
                sweeps.spiral_turns.iter().copied(),
                sweeps.spiral_gaps.iter().copied(),
                sweeps.spiral_inner_gaps.iter().copied()
            )
            .map(|(turns, gap, inner_gap)| {
                let name = format!(
                    "SB_Spiral\nNo._loops_{turns}\nGap_between_waveguides_{gap}\nInner_circle_radius_{inner_gap}"
                );
                devices::spiral_loopback(ctx, gc, turns, gap, inner_gap, origin, name)
            })
            .collect(),
            SweepKind::Mzi => iproduct!(
                sweeps.mzi_stages.iter().copied(),
                sweeps.mzi_delta_lengths.iter().copied()
            )
            .map(|(stages, delta_length)| {
                let params = MziParams {
                    coupling_length: sweeps.couplers.first().map_or(1.27, |v| v.coupling_length),
                    gap: sweeps.couplers.first().map_or(0.25, |v| v.gap),
                    arm_length: sweeps.mzi_arm_length,
                    delta_length,
                };
                let name = format!(
                    "MZI_ZL\nStages_{stages}\nArm_length_{}um\nDelta_length_{delta_length}um",
                    params.arm_length
                );
                devices::cascaded_mach_zehnder(ctx, gc, &params, stages, origin, name)
            })
            .collect(),
        }
    }

    /// Generates all sweeps and packs them onto the chip.
    ///
    /// Each sweep starts a new row. The chip outline spans the canvas below the title,
    /// from the origin to `(width, -height)`.
    pub fn generate(&self) -> Result<(MaskLayout, Vec<Placement>)> {
        let ctx = DeviceCtx::from_config(&self.config, self.names.clone());
        let chip = &self.config.chip;
        let mut packer = RowPacker::new(LAYOUT_TITLE, chip);

        for &kind in self.sweeps.iter() {
            packer.begin_new_row();
            let groups = self.sweep(kind, &ctx)?;
            info!("generated {} devices for the {} sweep", groups.len(), kind);
            for group in groups {
                packer.add(group);
            }
        }

        let (mut layout, placements) = packer.grid.generate_layout(TOP_CELL_NAME);
        layout.add_element(Element::new(
            Layer::Outline,
            Rect::new(Point::new(0., -chip.height), Point::new(chip.width, 0.)),
        ));

        let warned = layout
            .devices()
            .iter()
            .filter(|d| d.group.has_pitch_warnings())
            .count();
        info!(
            "placed {} devices in {} rows ({} with fiber pitch warnings)",
            placements.len(),
            placements.iter().map(|p| p.row + 1).max().unwrap_or(0),
            warned
        );
        Ok((layout, placements))
    }
}
