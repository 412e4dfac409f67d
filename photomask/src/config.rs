//! Process, chip, and labeling parameters.
//!
//! Every field has a default, so a TOML file only needs to list the values it overrides.

use std::f64::consts::{FRAC_PI_2, PI};
use std::path::Path;

use phogeom::Point;
use serde::{Deserialize, Serialize};

use crate::design::SweepParams;
use crate::error::{with_err_context, ErrorContext, Result};
use crate::layout::elements::grating::GratingParams;
use crate::layout::layers::LayerMap;

/// The complete set of parameters used to generate a mask.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskConfig {
    pub process: ProcessConfig,
    pub grating: GratingParams,
    pub label: LabelConfig,
    pub chip: ChipConfig,
    pub layers: LayerMap,
    /// Parameters of the device sweeps on the default chip.
    pub sweeps: SweepParams,
}

impl MaskConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Reads a configuration from the TOML file at `path`.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = crate::io::read_to_string(path)?;
        with_err_context(Self::from_toml_str(&data), || {
            ErrorContext::ReadFile(path.to_path_buf())
        })
    }

    /// Serializes the configuration to TOML text.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Waveguide and fiber-array parameters shared by every device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    /// Single-mode waveguide width.
    pub waveguide_width: f64,
    /// Minimum bend radius.
    pub bend_radius: f64,
    /// Straight run between a grating coupler and the first bend.
    pub taper_route: f64,
    /// Center-to-center spacing of the fiber array.
    pub fiber_pitch: f64,
    /// Number of channels of the fiber array.
    pub fiber_channels: usize,
    /// Angle of each S-bend arc in a directional coupler, in radians.
    pub coupler_bend_angle: f64,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            waveguide_width: 0.5,
            bend_radius: 25.,
            taper_route: 10.,
            fiber_pitch: 127.,
            fiber_channels: 8,
            coupler_bend_angle: PI / 10.,
        }
    }
}

/// Placement of the text label attached to each device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Label anchor relative to the device position.
    pub origin: Point,
    pub height: f64,
    /// Rotation of the text, in radians.
    pub angle: f64,
    /// Character height used on grating loopback labels.
    pub loopback_height: f64,
    /// Label anchor used by spiral devices, whose bodies occupy the default anchor.
    pub spiral_origin: Point,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            origin: Point::new(90., -385.),
            height: 15.,
            angle: FRAC_PI_2,
            loopback_height: 10.,
            spiral_origin: Point::new(150., -385.),
        }
    }
}

/// Canvas dimensions and device packing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChipConfig {
    pub width: f64,
    pub height: f64,
    pub vertical_spacing: f64,
    pub horizontal_spacing: f64,
    /// Grid that the left edge of every placed device snaps to.
    pub horizontal_alignment: f64,
    /// Character height of the chip title.
    pub title_height: f64,
}

impl Default for ChipConfig {
    fn default() -> Self {
        Self {
            width: 6000.,
            height: 3000.,
            vertical_spacing: 20.,
            horizontal_spacing: 10.,
            horizontal_alignment: 10.,
            title_height: 120.,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = MaskConfig::from_toml_str(
            r#"
            [process]
            bend_radius = 30.0

            [chip]
            width = 5000.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.process.bend_radius, 30.);
        assert_eq!(cfg.process.fiber_pitch, 127.);
        assert_eq!(cfg.chip.width, 5000.);
        assert_eq!(cfg.chip.height, 3000.);
        assert_eq!(cfg.grating, GratingParams::default());
    }

    #[test]
    fn toml_round_trip() {
        let cfg = MaskConfig::default();
        let text = cfg.to_toml_string().unwrap();
        assert_eq!(MaskConfig::from_toml_str(&text).unwrap(), cfg);
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(MaskConfig::from_toml_str("process = 3").is_err());
    }
}
