use super::{emit, GlobalArgs};
use clap::Parser;
use pdbprobe::Result;
use tracing::trace;

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// A PDB identifier (four alphanumeric characters) or a gene name
    term: String,
}

pub(crate) fn run(args: &Args, global: &GlobalArgs) -> Result<()> {
    trace!("{args:?}");
    let analyzer = global.analyzer()?;
    emit(&analyzer.quick(&args.term), global.output.as_deref())
}
