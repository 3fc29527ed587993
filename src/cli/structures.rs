use super::{emit, GlobalArgs};
use clap::Parser;
use pdbprobe::analysis::{DEFAULT_MAX_STRUCTURES, DEFAULT_SPECIES};
use pdbprobe::Result;
use tracing::trace;

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// Gene name, e.g. TP53
    gene: String,

    /// Species of the gene product
    #[arg(short, long, default_value_t = String::from(DEFAULT_SPECIES))]
    species: String,

    /// Maximum number of structures to report
    #[arg(short = 'm', long, default_value_t = DEFAULT_MAX_STRUCTURES)]
    max_structures: usize,
}

pub(crate) fn run(args: &Args, global: &GlobalArgs) -> Result<()> {
    trace!("{args:?}");
    let analyzer = global.analyzer()?;
    let hits = analyzer.structures(&args.gene, &args.species, args.max_structures);
    emit(&hits, global.output.as_deref())
}
