use super::{emit, for_each_target, load_target, GlobalArgs};
use clap::Parser;
use pdbprobe::Result;
use tracing::trace;

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// PDB identifiers or paths to PDB/mmCIF files
    #[arg(required = true)]
    targets: Vec<String>,

    /// Maximum distance between oppositely charged atoms of a salt bridge
    #[arg(long, default_value_t = pdbprobe::settings::SALT_BRIDGE_DIST)]
    salt_bridge_cutoff: f64,

    /// Probe radius for the SASA calculation
    #[arg(short = 'r', long = "probe-radius", default_value_t = pdbprobe::settings::PROBE_RADIUS)]
    probe_radius: f32,

    /// Number of points sampled on each atom sphere
    #[arg(short = 'n', long = "num-points", default_value_t = pdbprobe::settings::SPHERE_POINTS)]
    n_points: usize,
}

pub(crate) fn run(args: &Args, global: &GlobalArgs) -> Result<()> {
    trace!("{args:?}");
    let mut settings = global.settings();
    settings.salt_bridge_cutoff = args.salt_bridge_cutoff;
    settings.probe_radius = args.probe_radius;
    settings.n_points = args.n_points;
    let analyzer = pdbprobe::Analyzer::new(pdbprobe::Collaborators::web(&settings)?, settings);

    let res = for_each_target(&args.targets, |target| {
        let structure = load_target(&analyzer, target)?;
        Ok(analyzer.advanced_structure(&structure))
    });
    emit(&res, global.output.as_deref())
}
