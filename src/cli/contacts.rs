use super::{load_target, GlobalArgs};
use clap::Parser;
use pdbprobe::settings::{DISULFIDE_DIST, SALT_BRIDGE_DIST};
use pdbprobe::{
    find_disulfide_bonds, find_salt_bridges, interactions_to_df, write_df_to_file, DataFrameFileType,
    Result,
};
use std::path::PathBuf;
use tracing::{debug, info, trace};

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
    #[arg(short = 'f', long = "filename", default_value_t = String::from("contacts"))]
    filename: String,

    /// Output file type
    #[arg(short = 't', long, default_value_t = DataFrameFileType::Csv)]
    output_format: DataFrameFileType,

    /// Maximum SG-SG distance of a disulfide bond
    #[arg(long, default_value_t = DISULFIDE_DIST)]
    disulfide_cutoff: f64,

    /// Maximum distance between oppositely charged side-chain atoms
    #[arg(long, default_value_t = SALT_BRIDGE_DIST)]
    salt_bridge_cutoff: f64,
}

pub(crate) fn run(args: &Args, global: &GlobalArgs) -> Result<()> {
    trace!("{args:?}");
    let analyzer = global.analyzer()?;
    let structure = load_target(&analyzer, &args.input)?;

    let (mut contacts, salt_bridges) = rayon::join(
        || find_disulfide_bonds(&structure, args.disulfide_cutoff),
        || find_salt_bridges(&structure, args.salt_bridge_cutoff),
    );
    debug!(
        "Found {} disulfide bonds and {} salt bridges",
        contacts.len(),
        salt_bridges.len()
    );
    contacts.extend(salt_bridges);
    let mut df_contacts = interactions_to_df(&contacts)?;

    std::fs::create_dir_all(&args.out_dir)?;
    let output_file = args
        .out_dir
        .join(&args.filename)
        .with_extension(args.output_format.to_string());
    write_df_to_file(&mut df_contacts, &output_file, args.output_format)?;
    info!("Results saved to {}", output_file.display());
    Ok(())
}
