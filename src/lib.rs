//! # pdbprobe
//!
//! Structural feature extraction and mutation-impact scoring for protein
//! structures from the Protein Data Bank.
//!
//! Structures are fetched by identifier (or read from local PDB/mmCIF files)
//! and analysed with [`pdbtbx`]: secondary structure and backbone hydrogen
//! bonds through a remote-then-local fallback, disulfide bonds, salt bridges,
//! per-chain solvent accessible surface area and hydrophobicity, sequence
//! composition, alignment against the UniProt reference sequence and a
//! heuristic score for point mutations.
//!
//! Every record serializes with [`serde`]. Fields that can fail on their own
//! are wrapped in [`Outcome`]; values that could not be determined serialize as
//! `"N/A"` through [`Metric`].
//!
//! ```no_run
//! use pdbprobe::{Analyzer, Collaborators, Settings};
//!
//! let settings = Settings::default();
//! let analyzer = Analyzer::new(Collaborators::web(&settings).unwrap(), settings);
//! let basic = analyzer.analyze("1UBQ").unwrap();
//! println!("{}", serde_json::to_string_pretty(&basic).unwrap());
//! ```

pub mod alignment;
pub mod amino_acids;
pub mod analysis;
mod chains;
pub mod composition;
pub mod error;
pub mod interactions;
pub mod mutation;
pub mod remote;
mod residues;
pub mod sasa;
pub mod secondary;
pub mod settings;
pub mod structure;
mod utils;

#[cfg(test)]
mod test_utils;

pub use alignment::{align_chains, global_align, AlignmentOutcome, AlignmentReport};
pub use analysis::{
    AdvancedAnalysis, Analyzer, BasicAnalysis, Collaborators, InputType, QuickAnalysis,
};
pub use chains::ChainExt;
pub use composition::{hydrophobicity_per_chain, sequence_composition, SequenceComposition};
pub use error::{AnalysisError, ErrorKind, Metric, Outcome, Result};
pub use interactions::{
    find_disulfide_bonds, find_salt_bridges, interactions_to_df, InteractingEntity, Interaction,
    ResultEntry,
};
pub use mutation::{MutationImpact, MutationSpec};
pub use residues::{ResidueExt, ResidueId};
pub use sasa::{get_atom_sasa, get_chain_sasa, get_residue_sasa, sasa_per_chain};
pub use secondary::{HydrogenBondSummary, SecondaryStructureSummary};
pub use settings::Settings;
pub use structure::Structure;
pub use utils::{load_model, write_df_to_file, DataFrameFileType};
