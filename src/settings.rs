//! Analysis settings.

use std::path::PathBuf;
use std::time::Duration;

/// Covalent S–S bond length is ~2.05 Å; the cutoff leaves room for refinement error.
pub const DISULFIDE_DIST: f64 = 2.5;
/// Maximum distance between oppositely charged side-chain atoms.
pub const SALT_BRIDGE_DIST: f64 = 4.0;
/// Kabsch & Sander (1983): a backbone hydrogen bond has E < -0.5 kcal/mol
pub const HBOND_ENERGY_CUTOFF: f64 = -0.5;
/// Shrake & Rupley (1973) water probe
pub const PROBE_RADIUS: f32 = 1.4;
pub const SPHERE_POINTS: usize = 100;
pub const REMOTE_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct Settings {
    /// Distance cutoff for disulfide bonds (strict `<`)
    pub disulfide_cutoff: f64,
    /// Distance cutoff for salt bridges (inclusive)
    pub salt_bridge_cutoff: f64,
    /// Energy below which a backbone N-H...O=C pair counts as bonded
    pub hbond_energy_cutoff: f64,
    /// Probe radius for the rolling-ball SASA
    pub probe_radius: f32,
    /// Number of points sampled on each atom sphere
    pub n_points: usize,
    /// Upper bound for every remote call
    pub timeout: Duration,
    /// Try remote annotation services before the local estimators
    pub use_remote_annotation: bool,
    /// Where downloaded coordinate files are staged
    pub staging_dir: PathBuf,
    pub rcsb_data_url: String,
    pub rcsb_files_url: String,
    pub pdbe_api_url: String,
    pub uniprot_api_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            disulfide_cutoff: DISULFIDE_DIST,
            salt_bridge_cutoff: SALT_BRIDGE_DIST,
            hbond_energy_cutoff: HBOND_ENERGY_CUTOFF,
            probe_radius: PROBE_RADIUS,
            n_points: SPHERE_POINTS,
            timeout: Duration::from_secs(REMOTE_TIMEOUT_SECS),
            use_remote_annotation: true,
            staging_dir: std::env::temp_dir().join("pdbprobe"),
            rcsb_data_url: "https://data.rcsb.org/rest/v1".to_string(),
            rcsb_files_url: "https://files.rcsb.org/download".to_string(),
            pdbe_api_url: "https://www.ebi.ac.uk/pdbe/api".to_string(),
            uniprot_api_url: "https://rest.uniprot.org/uniprotkb".to_string(),
        }
    }
}
