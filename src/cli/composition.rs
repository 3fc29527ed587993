use super::{emit, for_each_target, load_target, GlobalArgs};
use clap::Parser;
use pdbprobe::{sequence_composition, Result};
use tracing::trace;

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// PDB identifiers or paths to PDB/mmCIF files
    #[arg(required = true)]
    targets: Vec<String>,
}

pub(crate) fn run(args: &Args, global: &GlobalArgs) -> Result<()> {
    trace!("{args:?}");
    let analyzer = global.analyzer()?;
    let res = for_each_target(&args.targets, |target| {
        Ok(sequence_composition(&load_target(&analyzer, target)?))
    });
    emit(&res, global.output.as_deref())
}
