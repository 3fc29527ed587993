mod cli;

use clap::{Parser, Subcommand};
use pdbprobe::{AnalysisError, Result};
use tracing::{debug, error, info};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: cli::GlobalArgs,

    /// Verbosity of the program:
    /// -v for info, -vv for debug, and -vvv for trace
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of threads to use for parallel processing; all cores if omitted
    #[arg(short = 'j', long = "num-threads", global = true)]
    threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Entry metadata for PDB identifiers
    Info(cli::info::Args),
    /// Chain, residue and atom counts with a secondary-structure summary
    Analyze(cli::analyze::Args),
    /// Disulfides, salt bridges, hydrogen bonds, SASA and hydrophobicity
    Advanced(cli::advanced::Args),
    /// Score the impact of a point mutation
    Mutation(cli::mutation::Args),
    /// Amino-acid composition of every chain
    Composition(cli::composition::Args),
    /// Align chain sequences against the UniProt reference
    Align(cli::align::Args),
    /// Structures solved for a gene, best resolution first
    Structures(cli::structures::Args),
    /// Resolve a PDB identifier or gene name and run the basic analysis
    Quick(cli::quick::Args),
    /// Write disulfide bonds and salt bridges to a table
    Contacts(cli::contacts::Args),
    /// Write solvent accessible surface areas to a table
    Sasa(cli::sasa::Args),
}

fn run_app(cli: Cli) -> Result<()> {
    if let Some(num_threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| AnalysisError::InvalidInput(format!("thread pool: {e}")))?;
    }
    debug!("Using {} thread(s)", rayon::current_num_threads());

    let global = &cli.global;
    match &cli.command {
        Commands::Info(args) => cli::info::run(args, global),
        Commands::Analyze(args) => cli::analyze::run(args, global),
        Commands::Advanced(args) => cli::advanced::run(args, global),
        Commands::Mutation(args) => cli::mutation::run(args, global),
        Commands::Composition(args) => cli::composition::run(args, global),
        Commands::Align(args) => cli::align::run(args, global),
        Commands::Structures(args) => cli::structures::run(args, global),
        Commands::Quick(args) => cli::quick::run(args, global),
        Commands::Contacts(args) => cli::contacts::run(args, global),
        Commands::Sasa(args) => cli::sasa::run(args, global),
    }
}

fn main() {
    let cli = Cli::parse();
    cli::setup_logging(cli.verbose);
    info!("pdbprobe v{} starting up", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_app(cli) {
        error!("{e}");
        std::process::exit(1);
    }
}
