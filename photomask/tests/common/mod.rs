#![allow(dead_code)]

use std::path::PathBuf;

use photomask::config::MaskConfig;
use photomask::devices::DeviceCtx;
use photomask::layout::elements::grating::GratingParams;
use photomask::naming::NameSeq;

pub const BUILD_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/build");

pub fn out_path(test_name: &str, file_name: &str) -> PathBuf {
    PathBuf::from(BUILD_DIR).join(format!("tests/{test_name}/{file_name}"))
}

/// A device context with default process parameters and a fresh naming sequence.
pub fn setup_ctx() -> DeviceCtx {
    DeviceCtx::from_config(&MaskConfig::default(), NameSeq::new())
}

pub fn grating() -> GratingParams {
    GratingParams::default()
}
