use super::{emit, GlobalArgs};
use clap::Parser;
use pdbprobe::{Outcome, Result};
use tracing::trace;

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// PDB identifier
    pdb_id: String,

    /// UniProt accession of the reference sequence; looked up from the entry if omitted
    #[arg(short, long)]
    uniprot_id: Option<String>,
}

pub(crate) fn run(args: &Args, global: &GlobalArgs) -> Result<()> {
    trace!("{args:?}");
    let analyzer = global.analyzer()?;
    let res = analyzer.align(&args.pdb_id, args.uniprot_id.as_deref());
    emit(&Outcome::from(res), global.output.as_deref())
}
