//! Point-mutation impact scoring.
//!
//! A mutation is written `<chain>:<wild type><position><mutant>`, e.g. `A:K33E`.
//! The score adds up property changes between the two residues and a bonus
//! when the position sits in a helix or strand.

use crate::amino_acids::{property, AminoAcidProperty};
use crate::error::{AnalysisError, Outcome};
use crate::residues::ResidueExt;
use crate::secondary::{residue_class, DsspAssignment, SecondaryClass};
use crate::structure::Structure;
use crate::utils::round_to;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

const CHARGE_THRESHOLD: f64 = 1.0;
const LARGE_VOLUME_CHANGE: f64 = 50.0;
const MODERATE_VOLUME_CHANGE: f64 = 20.0;

const CHARGE_POINTS: u32 = 3;
const LARGE_VOLUME_POINTS: u32 = 2;
const MODERATE_VOLUME_POINTS: u32 = 1;
const HYDROPHOBICITY_POINTS: u32 = 2;
const POLARITY_POINTS: u32 = 1;
const CORE_POINTS: u32 = 1;

const HIGH_SCORE: u32 = 5;
const MEDIUM_SCORE: u32 = 3;

/// A validated point mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MutationSpec {
    pub chain: char,
    pub position: isize,
    pub wild_type: &'static AminoAcidProperty,
    pub mutant: &'static AminoAcidProperty,
}

impl MutationSpec {
    pub fn chain_id(&self) -> String {
        self.chain.to_string()
    }
}

impl fmt::Display for MutationSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}:{}{}{}",
            self.chain, self.wild_type.code, self.position, self.mutant.code
        )
    }
}

fn format_error(input: &str) -> AnalysisError {
    AnalysisError::InvalidInput(format!(
        "invalid mutation format '{input}', expected <chain>:<wild type><position><mutant> such as A:K33E"
    ))
}

impl FromStr for MutationSpec {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        let (chain, change) = upper.split_once(':').ok_or_else(|| format_error(s))?;

        let mut chain_chars = chain.chars();
        let chain = match (chain_chars.next(), chain_chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => c,
            _ => return Err(format_error(s)),
        };

        let mut chars = change.chars();
        let (Some(wt), Some(mt)) = (chars.next(), chars.next_back()) else {
            return Err(format_error(s));
        };
        let digits = chars.as_str();
        if !wt.is_ascii_uppercase()
            || !mt.is_ascii_uppercase()
            || digits.is_empty()
            || !digits.chars().all(|c| c.is_ascii_digit())
        {
            return Err(format_error(s));
        }
        let position: isize = digits.parse().map_err(|_| format_error(s))?;
        if position < 1 {
            return Err(format_error(s));
        }

        match (property(wt), property(mt)) {
            (Some(wild_type), Some(mutant)) => Ok(Self {
                chain,
                position,
                wild_type,
                mutant,
            }),
            _ => Err(AnalysisError::InvalidInput(format!(
                "invalid amino acid code: {wt} or {mt}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PropertyChanges {
    pub charge_change: f64,
    pub volume_change: f64,
    pub hydrophobicity_change: bool,
    pub polarity_change: bool,
}

impl PropertyChanges {
    pub fn between(wild_type: &AminoAcidProperty, mutant: &AminoAcidProperty) -> Self {
        Self {
            charge_change: mutant.charge - wild_type.charge,
            volume_change: round_to(mutant.volume - wild_type.volume, 2),
            hydrophobicity_change: mutant.hydrophobic != wild_type.hydrophobic,
            polarity_change: mutant.polar != wild_type.polar,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    High,
    Medium,
    Low,
}

impl ImpactLevel {
    pub fn from_score(score: u32) -> Self {
        if score >= HIGH_SCORE {
            ImpactLevel::High
        } else if score >= MEDIUM_SCORE {
            ImpactLevel::Medium
        } else {
            ImpactLevel::Low
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ImpactLevel::High => "The mutation is likely to severely affect protein structure or function",
            ImpactLevel::Medium => "The mutation may have a moderate effect on the protein",
            ImpactLevel::Low => "The mutation is likely a conservative substitution with little effect",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactAssessment {
    pub score: u32,
    pub level: ImpactLevel,
    pub description: &'static str,
    pub reasons: Vec<String>,
}

/// What the structure says about the mutated position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuralContext {
    pub found_residue: Option<char>,
    pub matches_wt: bool,
    pub position_valid: bool,
    pub warning: Option<String>,
    pub error: Option<String>,
    pub secondary_structure: Option<SecondaryClass>,
}

/// Check the position against the structure and look up its secondary structure.
pub fn structural_context(
    structure: &Structure,
    spec: &MutationSpec,
    assignment: Option<&DsspAssignment>,
) -> StructuralContext {
    let chain = spec.chain_id();
    let Some(residue) = structure.residue(&chain, spec.position) else {
        return StructuralContext {
            found_residue: None,
            matches_wt: false,
            position_valid: false,
            warning: None,
            error: Some(format!(
                "chain {chain} or position {} not found in {}",
                spec.position,
                structure.id()
            )),
            secondary_structure: None,
        };
    };

    let found = residue.resn();
    let matches_wt = found == Some(spec.wild_type.code);
    let warning = (!matches_wt).then(|| {
        format!(
            "residue at this position is {} rather than {}",
            found.map_or_else(|| residue.name().unwrap_or("?").to_string(), String::from),
            spec.wild_type.code
        )
    });

    StructuralContext {
        found_residue: found,
        matches_wt,
        position_valid: true,
        warning,
        error: None,
        secondary_structure: assignment.and_then(|a| residue_class(a, &chain, spec.position)),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MutationImpact {
    pub mutation: String,
    pub pdb_id: Option<String>,
    pub wild_type: AminoAcidProperty,
    pub mutant: AminoAcidProperty,
    pub changes: PropertyChanges,
    pub impact_assessment: ImpactAssessment,
    pub structural_context: Outcome<StructuralContext>,
}

fn signed(value: f64) -> String {
    format!("{value:+}")
}

/// Score a mutation. Only α-helix and strand positions earn the structural bonus.
pub fn score_mutation(
    spec: &MutationSpec,
    pdb_id: Option<&str>,
    context: Outcome<StructuralContext>,
) -> MutationImpact {
    let (wt, mt) = (spec.wild_type, spec.mutant);
    let changes = PropertyChanges::between(wt, mt);
    let mut score = 0;
    let mut reasons = Vec::new();

    if changes.charge_change.abs() >= CHARGE_THRESHOLD {
        score += CHARGE_POINTS;
        reasons.push(format!("Charge change: {}", signed(changes.charge_change)));
    }

    let volume = mt.volume - wt.volume;
    if volume.abs() > LARGE_VOLUME_CHANGE {
        score += LARGE_VOLUME_POINTS;
        reasons.push(format!("Volume change: {volume:+.1} Å³"));
    } else if volume.abs() > MODERATE_VOLUME_CHANGE {
        score += MODERATE_VOLUME_POINTS;
        reasons.push(format!("Moderate volume change: {volume:+.1} Å³"));
    }

    if changes.hydrophobicity_change {
        score += HYDROPHOBICITY_POINTS;
        reasons.push(if wt.hydrophobic {
            "Hydrophobic → hydrophilic (may affect folding)".to_string()
        } else {
            "Hydrophilic → hydrophobic (may affect solubility)".to_string()
        });
    }

    if changes.polarity_change {
        score += POLARITY_POINTS;
        reasons.push("Polarity change".to_string());
    }

    let class = context.ok().and_then(|c| c.secondary_structure);
    match class {
        Some(SecondaryClass::AlphaHelix) => {
            score += CORE_POINTS;
            reasons.push("Located in α-helix core region".to_string());
        }
        Some(SecondaryClass::Strand) => {
            score += CORE_POINTS;
            reasons.push("Located in β-strand core region".to_string());
        }
        _ => {}
    }

    let level = ImpactLevel::from_score(score);
    MutationImpact {
        mutation: spec.to_string(),
        pdb_id: pdb_id.map(str::to_uppercase),
        wild_type: *wt,
        mutant: *mt,
        changes,
        impact_assessment: ImpactAssessment {
            score,
            level,
            description: level.description(),
            reasons,
        },
        structural_context: context,
    }
}
