use super::{emit, for_each_target, GlobalArgs};
use clap::Parser;
use pdbprobe::Result;
use tracing::trace;

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// PDB identifiers, e.g. 1UBQ
    #[arg(required = true)]
    pdb_ids: Vec<String>,
}

pub(crate) fn run(args: &Args, global: &GlobalArgs) -> Result<()> {
    trace!("{args:?}");
    let analyzer = global.analyzer()?;
    let res = for_each_target(&args.pdb_ids, |id| analyzer.info(id));
    emit(&res, global.output.as_deref())
}
