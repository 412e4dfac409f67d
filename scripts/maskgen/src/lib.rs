use std::path::{Path, PathBuf};

use anyhow::Context;
use log::info;
use photomask::config::MaskConfig;
use photomask::design::{DesignSpace, SweepKind};

/// Loads the mask configuration from `path`, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<MaskConfig> {
    match path {
        Some(path) => Ok(MaskConfig::from_toml_file(path)?),
        None => Ok(MaskConfig::default()),
    }
}

/// Generates the chip and writes it to `output`.
///
/// An empty `sweeps` list places the default sweeps. When `mapping` is given,
/// the device placements are written there as JSON.
pub fn generate(
    config: MaskConfig,
    sweeps: &[SweepKind],
    output: impl AsRef<Path>,
    mapping: Option<PathBuf>,
) -> anyhow::Result<()> {
    let output = output.as_ref();
    let mut space = DesignSpace::new(config);
    if !sweeps.is_empty() {
        space = space.with_sweeps(sweeps.iter().copied());
    }

    let (layout, placements) = space.generate()?;
    layout.save(output, &space.config().layers)?;
    info!("wrote {} devices to {:?}", placements.len(), output);

    if let Some(mapping) = mapping {
        let file = photomask::io::create_file(&mapping)?;
        serde_json::to_writer_pretty(file, &placements)
            .with_context(|| format!("failed to write placements to {mapping:?}"))?;
        info!("wrote placements to {:?}", mapping);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn build_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("build")
    }

    #[test]
    fn missing_config_uses_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config, MaskConfig::default());
    }

    #[test]
    fn writes_gds_and_mapping() {
        let dir = build_dir().join("writes_gds_and_mapping");
        let gds = dir.join("chip.gds");
        let mapping = dir.join("placements.json");
        generate(
            MaskConfig::default(),
            &[SweepKind::Test],
            &gds,
            Some(mapping.clone()),
        )
        .unwrap();

        assert!(gds.exists());
        let placements: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(mapping).unwrap()).unwrap();
        assert_eq!(placements.as_array().map(Vec::len), Some(1));
    }
}
