//! Secondary-structure and backbone hydrogen-bond summaries.
//!
//! Each summary is produced by an ordered list of strategies. The first one
//! that yields a value wins; a strategy that has nothing to say or fails is
//! logged and the next one is tried. If none succeeds the summary is marked
//! unavailable instead of being left out.

pub mod dssp;
pub mod remote;

pub use dssp::{assign, DsspAssignment, SecondaryClass};
pub use remote::{RemoteHydrogenBonds, RemoteSecondaryStructure};

use crate::error::{Metric, Result};
use crate::structure::Structure;
use crate::utils::{percent, round_to};
use serde::Serialize;
use tracing::{debug, warn};

/// Where a summary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    RemoteEstimate,
    LocalComputed,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecondaryStructureSummary {
    pub helix: Metric<usize>,
    pub beta_sheet: Metric<usize>,
    pub coil: Metric<usize>,
    pub helix_pct: Metric<f64>,
    pub beta_pct: Metric<f64>,
    pub coil_pct: Metric<f64>,
    pub source: Source,
    pub provider: Metric<String>,
    pub note: Option<String>,
}

impl SecondaryStructureSummary {
    pub fn unavailable(note: String) -> Self {
        Self {
            helix: Metric::na(),
            beta_sheet: Metric::na(),
            coil: Metric::na(),
            helix_pct: Metric::na(),
            beta_pct: Metric::na(),
            coil_pct: Metric::na(),
            source: Source::Unavailable,
            provider: Metric::na(),
            note: Some(note),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HydrogenBondSummary {
    pub backbone_hbonds: Metric<usize>,
    pub total: Metric<usize>,
    pub donor_residues: Metric<usize>,
    pub acceptor_residues: Metric<usize>,
    /// True when the counts are derived from residue numbers rather than geometry
    pub estimated: bool,
    pub source: Source,
    pub provider: Metric<String>,
    pub note: Option<String>,
}

impl HydrogenBondSummary {
    pub fn unavailable(note: String) -> Self {
        Self {
            backbone_hbonds: Metric::na(),
            total: Metric::na(),
            donor_residues: Metric::na(),
            acceptor_residues: Metric::na(),
            estimated: false,
            source: Source::Unavailable,
            provider: Metric::na(),
            note: Some(note),
        }
    }
}

/// One way of producing a summary for a structure.
///
/// `None` means the source has no data for this structure; `Some(Err(_))`
/// means it failed. Both make the caller move on to the next strategy.
pub trait Strategy<T> {
    fn provider(&self) -> &str;

    fn run(&self, structure: &Structure) -> Option<Result<T>>;
}

/// Run the strategies in order and return the first value, or the reasons every one missed.
pub fn first_available<T>(
    strategies: &[Box<dyn Strategy<T> + '_>],
    structure: &Structure,
) -> std::result::Result<T, Vec<String>> {
    let mut misses = Vec::with_capacity(strategies.len());
    for strategy in strategies.iter() {
        match strategy.run(structure) {
            Some(Ok(value)) => {
                debug!("{} answered for {}", strategy.provider(), structure.id());
                return Ok(value);
            }
            Some(Err(e)) => {
                warn!("{} failed for {}: {e}", strategy.provider(), structure.id());
                misses.push(format!("{}: {e}", strategy.provider()));
            }
            None => {
                warn!("{} has no data for {}", strategy.provider(), structure.id());
                misses.push(format!("{}: no data", strategy.provider()));
            }
        }
    }
    Err(misses)
}

fn unavailable_note(misses: &[String]) -> String {
    if misses.is_empty() {
        "no source configured".to_string()
    } else {
        format!("no source could provide a value ({})", misses.join("; "))
    }
}

pub fn summarize_secondary_structure(
    strategies: &[Box<dyn Strategy<SecondaryStructureSummary> + '_>],
    structure: &Structure,
) -> SecondaryStructureSummary {
    first_available(strategies, structure)
        .unwrap_or_else(|misses| SecondaryStructureSummary::unavailable(unavailable_note(&misses)))
}

pub fn summarize_hydrogen_bonds(
    strategies: &[Box<dyn Strategy<HydrogenBondSummary> + '_>],
    structure: &Structure,
) -> HydrogenBondSummary {
    first_available(strategies, structure)
        .unwrap_or_else(|misses| HydrogenBondSummary::unavailable(unavailable_note(&misses)))
}

/// Class of a residue in a local assignment, used for mutation context.
pub fn residue_class(assignment: &DsspAssignment, chain: &str, number: isize) -> Option<SecondaryClass> {
    assignment.class_of(chain, number)
}

pub const LOCAL_PROVIDER: &str = "local DSSP";

/// Bucket the eight classes into helix, sheet and coil over all assigned residues.
pub fn local_secondary_summary(assignment: &DsspAssignment) -> SecondaryStructureSummary {
    let total = assignment.residues.len();
    let helix = assignment.residues.iter().filter(|r| r.class.is_helix()).count();
    let beta = assignment.residues.iter().filter(|r| r.class.is_beta()).count();
    let coil = total - helix - beta;

    SecondaryStructureSummary {
        helix: helix.into(),
        beta_sheet: beta.into(),
        coil: coil.into(),
        helix_pct: round_to(percent(helix, total), 1).into(),
        beta_pct: round_to(percent(beta, total), 1).into(),
        coil_pct: round_to(percent(coil, total), 1).into(),
        source: Source::LocalComputed,
        provider: LOCAL_PROVIDER.to_string().into(),
        note: None,
    }
}

/// Residues bonded as donor plus residues bonded as acceptor; a residue in
/// both directions counts twice.
pub fn local_hbond_summary(assignment: &DsspAssignment) -> HydrogenBondSummary {
    let donors = assignment.donor_residues();
    let acceptors = assignment.acceptor_residues();
    HydrogenBondSummary {
        backbone_hbonds: (donors + acceptors).into(),
        total: (donors + acceptors).into(),
        donor_residues: donors.into(),
        acceptor_residues: acceptors.into(),
        estimated: false,
        source: Source::LocalComputed,
        provider: LOCAL_PROVIDER.to_string().into(),
        note: None,
    }
}

/// Secondary structure from the local DSSP assignment.
pub struct LocalSecondaryStructure {
    pub energy_cutoff: f64,
}

impl Strategy<SecondaryStructureSummary> for LocalSecondaryStructure {
    fn provider(&self) -> &str {
        LOCAL_PROVIDER
    }

    fn run(&self, structure: &Structure) -> Option<Result<SecondaryStructureSummary>> {
        Some(assign(structure, self.energy_cutoff).map(|a| local_secondary_summary(&a)))
    }
}

/// Backbone hydrogen bonds from the local DSSP assignment.
pub struct LocalHydrogenBonds {
    pub energy_cutoff: f64,
}

impl Strategy<HydrogenBondSummary> for LocalHydrogenBonds {
    fn provider(&self) -> &str {
        LOCAL_PROVIDER
    }

    fn run(&self, structure: &Structure) -> Option<Result<HydrogenBondSummary>> {
        Some(assign(structure, self.energy_cutoff).map(|a| local_hbond_summary(&a)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::settings::HBOND_ENERGY_CUTOFF;
    use crate::test_utils::{ideal_backbone, peptide, PdbBuilder};

    struct Fixed(Option<Result<SecondaryStructureSummary>>);

    impl Strategy<SecondaryStructureSummary> for Fixed {
        fn provider(&self) -> &str {
            "fixed"
        }

        fn run(&self, _: &Structure) -> Option<Result<SecondaryStructureSummary>> {
            match &self.0 {
                None => None,
                Some(Ok(s)) => Some(Ok(s.clone())),
                Some(Err(e)) => Some(Err(AnalysisError::UpstreamUnavailable(e.to_string()))),
            }
        }
    }

    fn helix() -> Structure {
        peptide("A", 1, &ideal_backbone(16, -57.0, -47.0)).build("1hlx")
    }

    #[test]
    fn local_helix_summary() {
        let assignment = assign(&helix(), HBOND_ENERGY_CUTOFF).unwrap();
        let summary = local_secondary_summary(&assignment);
        let helix = *summary.helix.value().unwrap();
        let beta = *summary.beta_sheet.value().unwrap();
        let coil = *summary.coil.value().unwrap();
        assert_eq!(helix + beta + coil, 16);
        assert!(helix >= 10, "expected a mostly helical peptide, got {helix}");
        assert_eq!(summary.source, Source::LocalComputed);

        let pct = summary.helix_pct.value().unwrap()
            + summary.beta_pct.value().unwrap()
            + summary.coil_pct.value().unwrap();
        assert!((pct - 100.0).abs() <= 0.2);

        let hbonds = local_hbond_summary(&assignment);
        assert!(*hbonds.backbone_hbonds.value().unwrap() > 0);
        assert!(!hbonds.estimated);
        assert_eq!(residue_class(&assignment, "A", 8), Some(SecondaryClass::AlphaHelix));
    }

    #[test]
    fn hbond_count_sums_both_directions() {
        let assignment = assign(&helix(), HBOND_ENERGY_CUTOFF).unwrap();
        let hbonds = local_hbond_summary(&assignment);
        let donors = *hbonds.donor_residues.value().unwrap();
        let acceptors = *hbonds.acceptor_residues.value().unwrap();
        assert!(donors > 0 && acceptors > 0);
        assert_eq!(hbonds.backbone_hbonds.value(), Some(&(donors + acceptors)));
        assert_eq!(hbonds.backbone_hbonds, hbonds.total);
    }

    #[test]
    fn empty_remote_falls_back_to_local() {
        let structure = helix();
        let strategies: Vec<Box<dyn Strategy<SecondaryStructureSummary>>> = vec![
            Box::new(Fixed(None)),
            Box::new(LocalSecondaryStructure {
                energy_cutoff: HBOND_ENERGY_CUTOFF,
            }),
        ];
        let summary = summarize_secondary_structure(&strategies, &structure);
        assert_eq!(summary.source, Source::LocalComputed);
    }

    #[test]
    fn all_strategies_missing_is_unavailable() {
        // CA-only trace: the local estimator cannot run
        let structure = PdbBuilder::new()
            .atom("A", 1, "ALA", "CA", "C", [0.0, 0.0, 0.0])
            .atom("A", 2, "ALA", "CA", "C", [3.8, 0.0, 0.0])
            .build("1caa");
        let strategies: Vec<Box<dyn Strategy<SecondaryStructureSummary>>> = vec![
            Box::new(Fixed(Some(Err(AnalysisError::UpstreamUnavailable("timeout".into()))))),
            Box::new(LocalSecondaryStructure {
                energy_cutoff: HBOND_ENERGY_CUTOFF,
            }),
        ];
        let summary = summarize_secondary_structure(&strategies, &structure);
        assert_eq!(summary.source, Source::Unavailable);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["helix"], "N/A");
        assert_eq!(json["source"], "unavailable");
        assert!(json["note"].as_str().unwrap().contains("timeout"));
    }
}
