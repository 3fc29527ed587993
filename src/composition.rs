//! Per-chain residue composition.

use crate::amino_acids::AMINO_ACIDS;
use crate::chains::ChainExt;
use crate::residues::ResidueExt;
use crate::structure::Structure;
use crate::utils::{percent, round_to};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HydrophobicityStats {
    pub hydrophobic_count: usize,
    pub hydrophilic_count: usize,
    /// Percentage of hydrophobic residues
    pub hydrophobic_ratio: f64,
    /// Percentage of hydrophilic residues
    pub hydrophilic_ratio: f64,
    pub total_residues: usize,
}

/// Hydrophobic/hydrophilic split of the standard residues of each chain.
/// Chains without standard residues are omitted.
pub fn hydrophobicity_per_chain(structure: &Structure) -> BTreeMap<String, HydrophobicityStats> {
    structure
        .pdb()
        .chains()
        .filter_map(|chain| {
            let props: Vec<_> = chain.residues().filter_map(|r| r.property()).collect();
            if props.is_empty() {
                return None;
            }
            let total = props.len();
            let hydrophobic = props.iter().filter(|p| p.hydrophobic).count();
            let hydrophilic = total - hydrophobic;
            Some((
                chain.id().to_string(),
                HydrophobicityStats {
                    hydrophobic_count: hydrophobic,
                    hydrophilic_count: hydrophilic,
                    hydrophobic_ratio: round_to(percent(hydrophobic, total), 2),
                    hydrophilic_ratio: round_to(percent(hydrophilic, total), 2),
                    total_residues: total,
                },
            ))
        })
        .collect()
}

/// Residue categories reported alongside the raw composition.
const CHARGED_POSITIVE: &str = "KRH";
const CHARGED_NEGATIVE: &str = "DE";
const HYDROPHOBIC: &str = "AVLIMFWP";
const POLAR_UNCHARGED: &str = "STNQYC";
const AROMATIC: &str = "FYW";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStatistics {
    pub charged_positive: usize,
    pub charged_positive_pct: f64,
    pub charged_negative: usize,
    pub charged_negative_pct: f64,
    pub hydrophobic: usize,
    pub hydrophobic_pct: f64,
    pub polar_uncharged: usize,
    pub polar_uncharged_pct: f64,
    pub aromatic: usize,
    pub aromatic_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainComposition {
    pub sequence: String,
    pub length: usize,
    pub amino_acid_counts: BTreeMap<char, usize>,
    pub amino_acid_percentages: BTreeMap<char, f64>,
    pub category_statistics: CategoryStatistics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequenceComposition {
    pub pdb_id: String,
    pub chains: BTreeMap<String, ChainComposition>,
}

impl ChainComposition {
    /// `None` when the sequence is empty.
    pub fn from_sequence(sequence: &str) -> Option<Self> {
        let total = sequence.chars().count();
        if total == 0 {
            return None;
        }
        let mut counts: BTreeMap<char, usize> = AMINO_ACIDS.iter().map(|p| (p.code, 0)).collect();
        for aa in sequence.chars() {
            if let Some(count) = counts.get_mut(&aa) {
                *count += 1;
            }
        }
        let percentages = counts
            .iter()
            .map(|(&aa, &n)| (aa, round_to(percent(n, total), 2)))
            .collect();

        let category = |members: &str| -> (usize, f64) {
            let n = members.chars().map(|aa| counts.get(&aa).copied().unwrap_or(0)).sum();
            (n, round_to(percent(n, total), 2))
        };
        let (charged_positive, charged_positive_pct) = category(CHARGED_POSITIVE);
        let (charged_negative, charged_negative_pct) = category(CHARGED_NEGATIVE);
        let (hydrophobic, hydrophobic_pct) = category(HYDROPHOBIC);
        let (polar_uncharged, polar_uncharged_pct) = category(POLAR_UNCHARGED);
        let (aromatic, aromatic_pct) = category(AROMATIC);

        Some(Self {
            sequence: sequence.to_string(),
            length: total,
            amino_acid_counts: counts,
            amino_acid_percentages: percentages,
            category_statistics: CategoryStatistics {
                charged_positive,
                charged_positive_pct,
                charged_negative,
                charged_negative_pct,
                hydrophobic,
                hydrophobic_pct,
                polar_uncharged,
                polar_uncharged_pct,
                aromatic,
                aromatic_pct,
            },
        })
    }
}

/// Amino-acid composition of each chain with at least one standard residue.
pub fn sequence_composition(structure: &Structure) -> SequenceComposition {
    let chains = structure
        .pdb()
        .chains()
        .filter_map(|chain| {
            ChainComposition::from_sequence(&chain.pdb_seq())
                .map(|comp| (chain.id().to_string(), comp))
        })
        .collect();
    SequenceComposition {
        pdb_id: structure.id().to_string(),
        chains,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::PdbBuilder;

    #[test]
    fn percentages_sum_to_100() {
        let comp = ChainComposition::from_sequence("MQIFVKTLTGKTITLEVEPSDTIENVKAKIQDKEGIPPDQQRLIFAGK").unwrap();
        let sum: f64 = comp.amino_acid_percentages.values().sum();
        assert!((sum - 100.0).abs() <= 0.1, "{sum}");
        assert_eq!(comp.amino_acid_counts.len(), 20);
        assert_eq!(comp.length, 48);
    }

    #[test]
    fn category_counts() {
        let comp = ChainComposition::from_sequence("KRHDEFYWSG").unwrap();
        let stats = &comp.category_statistics;
        assert_eq!(stats.charged_positive, 3);
        assert_eq!(stats.charged_positive_pct, 30.0);
        assert_eq!(stats.charged_negative, 2);
        assert_eq!(stats.aromatic, 3);
        // F and W are hydrophobic, Y is not
        assert_eq!(stats.hydrophobic, 2);
        assert_eq!(stats.polar_uncharged, 2);
    }

    #[test]
    fn non_standard_chain_is_omitted() {
        let builder = (1..=100).fold(PdbBuilder::new(), |b, i| {
            b.hetatm("B", i, "MSE", "CA", "C", [i as f64 * 3.8, 0.0, 0.0])
        });
        let structure = builder
            .atom("A", 1, "LEU", "CA", "C", [0.0, 10.0, 0.0])
            .atom("A", 2, "LYS", "CA", "C", [3.8, 10.0, 0.0])
            .build("1abc");

        let comp = sequence_composition(&structure);
        assert_eq!(comp.pdb_id, "1ABC");
        assert_eq!(comp.chains.keys().collect::<Vec<_>>(), vec!["A"]);

        let hydro = hydrophobicity_per_chain(&structure);
        assert!(!hydro.contains_key("B"));
        assert_eq!(hydro["A"].hydrophobic_count, 1);
        assert_eq!(hydro["A"].hydrophilic_ratio, 50.0);
        assert_eq!(hydro["A"].total_residues, 2);
    }
}
