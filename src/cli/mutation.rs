use super::{emit, GlobalArgs};
use clap::Parser;
use pdbprobe::{Outcome, Result, Structure};
use std::path::PathBuf;
use tracing::trace;

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// Mutation as <chain>:<wild type><position><mutant>, e.g. A:K33E
    mutation: String,

    /// PDB identifier of the structure carrying the mutated residue
    #[arg(short, long, conflicts_with = "input")]
    pdb_id: Option<String>,

    /// Local PDB/mmCIF file to check the mutation against
    #[arg(short, long)]
    input: Option<PathBuf>,
}

pub(crate) fn run(args: &Args, global: &GlobalArgs) -> Result<()> {
    trace!("{args:?}");
    let analyzer = global.analyzer()?;
    let res = match &args.input {
        Some(path) => Structure::from_file(path, None)
            .and_then(|s| analyzer.mutation_in_structure(&s, &args.mutation)),
        None => analyzer.mutation(args.pdb_id.as_deref(), &args.mutation),
    };
    emit(&Outcome::from(res), global.output.as_deref())
}
