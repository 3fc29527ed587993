//! Summaries from the remote annotation service.

use super::{HydrogenBondSummary, SecondaryStructureSummary, Source, Strategy};
use crate::error::{Metric, Result};
use crate::remote::{AnnotationService, ChainSegments};
use crate::structure::Structure;
use crate::utils::{percent, round_to};
use tracing::warn;

/// Average number of backbone hydrogen bonds per residue in folded proteins
pub const HBONDS_PER_RESIDUE: f64 = 0.85;

pub const REMOTE_PROVIDER: &str = "PDBe/RCSB annotation";

/// Helix and strand totals over all annotated chains, scaled by the deposited residue count.
///
/// Returns `None` when the annotation marks no residue as helix or strand.
pub fn remote_secondary_summary(
    segments: &[ChainSegments],
    total_residues: Option<usize>,
) -> Option<SecondaryStructureSummary> {
    let helix: usize = segments.iter().map(ChainSegments::helix_residues).sum();
    let strand: usize = segments.iter().map(ChainSegments::strand_residues).sum();
    if helix == 0 && strand == 0 {
        return None;
    }

    let total = total_residues.filter(|&n| n > 0);
    let coil = total.map(|n| n.saturating_sub(helix + strand));
    let pct = |count: usize| Metric(total.map(|n| round_to(percent(count, n), 1)));

    Some(SecondaryStructureSummary {
        helix: helix.into(),
        beta_sheet: strand.into(),
        coil: Metric(coil),
        helix_pct: pct(helix),
        beta_pct: pct(strand),
        coil_pct: coil.map(pct).unwrap_or_default(),
        source: Source::RemoteEstimate,
        provider: REMOTE_PROVIDER.to_string().into(),
        note: total
            .is_none()
            .then(|| "deposited residue count unavailable; percentages omitted".to_string()),
    })
}

/// Rough backbone hydrogen-bond count from the deposited residue count.
pub fn remote_hbond_estimate(total_residues: usize) -> Option<HydrogenBondSummary> {
    if total_residues == 0 {
        return None;
    }
    let estimate = (total_residues as f64 * HBONDS_PER_RESIDUE).floor() as usize;
    Some(HydrogenBondSummary {
        backbone_hbonds: estimate.into(),
        total: estimate.into(),
        donor_residues: Metric::na(),
        acceptor_residues: Metric::na(),
        estimated: true,
        source: Source::RemoteEstimate,
        provider: REMOTE_PROVIDER.to_string().into(),
        note: Some(format!(
            "estimated as {HBONDS_PER_RESIDUE} x {total_residues} residues; run locally for measured values"
        )),
    })
}

pub struct RemoteSecondaryStructure<'a> {
    pub service: &'a dyn AnnotationService,
}

impl Strategy<SecondaryStructureSummary> for RemoteSecondaryStructure<'_> {
    fn provider(&self) -> &str {
        REMOTE_PROVIDER
    }

    fn run(&self, structure: &Structure) -> Option<Result<SecondaryStructureSummary>> {
        let segments = match self.service.secondary_structure(structure.id()) {
            Ok(segments) => segments,
            Err(e) => return Some(Err(e)),
        };
        let total = self
            .service
            .polymer_residue_count(structure.id())
            .inspect_err(|e| warn!("No residue count for {}: {e}", structure.id()))
            .ok();
        remote_secondary_summary(&segments, total).map(Ok)
    }
}

pub struct RemoteHydrogenBonds<'a> {
    pub service: &'a dyn AnnotationService,
}

impl Strategy<HydrogenBondSummary> for RemoteHydrogenBonds<'_> {
    fn provider(&self) -> &str {
        REMOTE_PROVIDER
    }

    fn run(&self, structure: &Structure) -> Option<Result<HydrogenBondSummary>> {
        match self.service.polymer_residue_count(structure.id()) {
            Ok(n) => remote_hbond_estimate(n).map(Ok),
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ubiquitin() -> Vec<ChainSegments> {
        vec![ChainSegments {
            chain: "A".into(),
            helices: vec![(23, 34), (56, 59)],
            strands: vec![(1, 7), (10, 17), (40, 45), (48, 49), (66, 72)],
        }]
    }

    #[test]
    fn remote_percentages() {
        let summary = remote_secondary_summary(&ubiquitin(), Some(76)).unwrap();
        assert_eq!(summary.helix.value(), Some(&16));
        assert_eq!(summary.beta_sheet.value(), Some(&30));
        assert_eq!(summary.coil.value(), Some(&30));
        assert_eq!(summary.helix_pct.value(), Some(&21.1));
        assert_eq!(summary.beta_pct.value(), Some(&39.5));
        assert_eq!(summary.coil_pct.value(), Some(&39.5));
        assert_eq!(summary.source, Source::RemoteEstimate);
    }

    #[test]
    fn unknown_total_keeps_counts() {
        let summary = remote_secondary_summary(&ubiquitin(), None).unwrap();
        assert_eq!(summary.helix.value(), Some(&16));
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["coil"], "N/A");
        assert_eq!(json["helix_pct"], "N/A");
        assert_eq!(json["source"], "remote-estimate");
    }

    #[test]
    fn empty_annotation_is_no_data() {
        assert!(remote_secondary_summary(&[], Some(100)).is_none());
    }

    #[test]
    fn hbond_estimate() {
        let summary = remote_hbond_estimate(76).unwrap();
        assert_eq!(summary.backbone_hbonds.value(), Some(&64));
        assert!(summary.estimated);
        assert!(remote_hbond_estimate(0).is_none());
    }
}
