use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use maskgen::{generate, load_config};
use photomask::design::SweepKind;

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Generate a photonic test chip of grating-coupled device sweeps as GDSII"
)]
pub struct Args {
    /// The output GDS file.
    #[arg(short, long, required_unless_present = "dump_config")]
    output: Option<PathBuf>,
    /// A TOML file overriding the default mask parameters.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// The sweeps to place, in order. Defaults to spiral, ring and grating.
    #[arg(short, long, value_delimiter = ',')]
    sweep: Vec<SweepKind>,
    /// Writes device placements to this JSON file.
    #[arg(short, long)]
    mapping: Option<PathBuf>,
    /// Prints the effective configuration as TOML and exits.
    #[arg(long)]
    dump_config: bool,
}

pub fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = load_config(args.config.as_deref())
        .with_context(|| format!("failed to load configuration {:?}", args.config))?;
    if args.dump_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let output = args.output.context("no output file given")?;
    generate(config, &args.sweep, &output, args.mapping)
        .with_context(|| format!("failed to generate {output:?}"))
}
