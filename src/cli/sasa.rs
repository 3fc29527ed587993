use super::{load_target, GlobalArgs};
use clap::{Parser, ValueEnum};
use pdbprobe::settings::{PROBE_RADIUS, SPHERE_POINTS};
use pdbprobe::{get_atom_sasa, get_chain_sasa, get_residue_sasa, write_df_to_file, DataFrameFileType, Result};
use polars::prelude::*;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info, trace};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SasaLevel {
    Atom,
    Residue,
    Chain,
}

impl fmt::Display for SasaLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SasaLevel::Atom => write!(f, "atom"),
            SasaLevel::Residue => write!(f, "residue"),
            SasaLevel::Chain => write!(f, "chain"),
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// PDB identifier or path to the PDB or mmCIF file to be analyzed
    #[arg(short, long)]
    input: String,

    /// Output directory
    #[arg(short = 'd', long = "out-dir", default_value = ".")]
    out_dir: PathBuf,

    /// Name of the output file
    #[arg(short = 'f', long = "filename", default_value_t = String::from("sasa"))]
    filename: String,

    /// Output file type
    #[arg(short = 't', long, default_value_t = DataFrameFileType::Csv)]
    output_format: DataFrameFileType,

    /// Aggregate atom SASA up to this level
    #[arg(short, long, default_value_t = SasaLevel::Atom)]
    level: SasaLevel,

    /// Probe radius r (smaller r detects more surface details and reports a larger surface)
    #[arg(short = 'r', long = "probe-radius", default_value_t = PROBE_RADIUS)]
    probe_radius: f32,

    /// Number of points sampled on each atom sphere
    #[arg(short = 'n', long = "num-points", default_value_t = SPHERE_POINTS)]
    n_points: usize,
}

pub(crate) fn run(args: &Args, global: &GlobalArgs) -> Result<()> {
    trace!("{args:?}");
    let analyzer = global.analyzer()?;
    let structure = load_target(&analyzer, &args.input)?;

    let mut df_sasa = match args.level {
        SasaLevel::Atom => get_atom_sasa(&structure, args.probe_radius, args.n_points)?,
        SasaLevel::Residue => get_residue_sasa(&structure, args.probe_radius, args.n_points)?,
        SasaLevel::Chain => get_chain_sasa(&structure, args.probe_radius, args.n_points)?,
    };

    let exposed = df_sasa
        .clone()
        .lazy()
        .filter(col("sasa").gt(lit(0.0)))
        .collect()?;
    debug!(
        "{} of {} rows at {} level have non-zero SASA",
        exposed.height(),
        df_sasa.height(),
        args.level
    );

    std::fs::create_dir_all(&args.out_dir)?;
    let output_file = args
        .out_dir
        .join(&args.filename)
        .with_extension(args.output_format.to_string());
    write_df_to_file(&mut df_sasa, &output_file, args.output_format)?;
    info!("Results saved to {}", output_file.display());
    Ok(())
}
