//! Local secondary-structure assignment from backbone geometry.
//!
//! Follows Kabsch & Sander (1983): backbone hydrogen bonds are scored with an
//! electrostatic model, then n-turns, helices, bridges and ladders are derived
//! from the bond pattern.

use crate::error::{AnalysisError, Result};
use crate::residues::ResidueExt;
use crate::structure::Structure;
use nalgebra::Vector3;
use pdbtbx::*;
use rayon::prelude::*;
use rstar::primitives::GeomWithData;
use rstar::RTree;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// q1 * q2 * f in kcal/mol·Å, with partial charges 0.42e and 0.20e
const COUPLING: f64 = 0.084 * 332.0;
const MIN_ENERGY: f64 = -9.9;
const MIN_DISTANCE: f64 = 0.5;
/// Donor and acceptor Cα atoms further apart than this never bond
const CA_CUTOFF: f64 = 9.0;
/// Longest C(i-1)-N(i) distance still treated as a peptide bond
const PEPTIDE_BOND_MAX: f64 = 2.5;
const BEND_ANGLE: f64 = 70.0;

/// DSSP secondary-structure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SecondaryClass {
    /// `H`
    AlphaHelix,
    /// `G`
    Helix310,
    /// `I`
    PiHelix,
    /// `E`, extended strand in a ladder
    Strand,
    /// `B`, isolated beta bridge
    Bridge,
    /// `T`
    Turn,
    /// `S`
    Bend,
    /// `-`
    Coil,
}

impl SecondaryClass {
    pub fn code(&self) -> char {
        match self {
            SecondaryClass::AlphaHelix => 'H',
            SecondaryClass::Helix310 => 'G',
            SecondaryClass::PiHelix => 'I',
            SecondaryClass::Strand => 'E',
            SecondaryClass::Bridge => 'B',
            SecondaryClass::Turn => 'T',
            SecondaryClass::Bend => 'S',
            SecondaryClass::Coil => '-',
        }
    }

    pub fn is_helix(&self) -> bool {
        matches!(
            self,
            SecondaryClass::AlphaHelix | SecondaryClass::Helix310 | SecondaryClass::PiHelix
        )
    }

    pub fn is_beta(&self) -> bool {
        matches!(self, SecondaryClass::Strand | SecondaryClass::Bridge)
    }
}

/// Backbone atoms of one residue plus the placed amide hydrogen.
#[derive(Debug, Clone)]
struct BackboneResidue {
    chain: String,
    resi: isize,
    insertion: String,
    n: Vector3<f64>,
    ca: Vector3<f64>,
    c: Vector3<f64>,
    o: Vector3<f64>,
    /// `None` for prolines and residues after a chain break
    h: Option<Vector3<f64>>,
    break_before: bool,
}

fn pos_vec(atom: &Atom) -> Vector3<f64> {
    let (x, y, z) = atom.pos();
    Vector3::new(x, y, z)
}

/// Collect residues with a complete backbone, in chain order.
fn backbone_residues(structure: &Structure) -> Vec<BackboneResidue> {
    let mut out = Vec::new();
    for chain in structure.pdb().chains() {
        // (C, O) of the previous residue, if it had a complete backbone
        let mut prev: Option<(Vector3<f64>, Vector3<f64>)> = None;
        for residue in chain.residues() {
            let atoms = ["N", "CA", "C", "O"].map(|name| residue.atom_named(name).map(pos_vec));
            let [Some(n), Some(ca), Some(c), Some(o)] = atoms else {
                prev = None;
                continue;
            };

            let break_before = prev.is_none_or(|(prev_c, _)| (n - prev_c).norm() > PEPTIDE_BOND_MAX);
            let is_proline = residue.name() == Some("PRO");
            let h = match prev {
                Some((prev_c, prev_o)) if !break_before && !is_proline => {
                    Some(n + (prev_c - prev_o).normalize())
                }
                _ => None,
            };

            let (resi, insertion) = residue.id();
            out.push(BackboneResidue {
                chain: chain.id().to_string(),
                resi,
                insertion: insertion.unwrap_or("").to_string(),
                n,
                ca,
                c,
                o,
                h,
                break_before,
            });
            prev = Some((c, o));
        }
    }
    out
}

/// Electrostatic energy of the N-H(donor)...O=C(acceptor) bond in kcal/mol.
fn hbond_energy(donor: &BackboneResidue, acceptor: &BackboneResidue) -> Option<f64> {
    let h = donor.h?;
    let r_on = (acceptor.o - donor.n).norm();
    let r_ch = (acceptor.c - h).norm();
    let r_oh = (acceptor.o - h).norm();
    let r_cn = (acceptor.c - donor.n).norm();

    if [r_on, r_ch, r_oh, r_cn].iter().any(|&d| d < MIN_DISTANCE) {
        return Some(MIN_ENERGY);
    }
    let energy = COUPLING * (1.0 / r_on + 1.0 / r_ch - 1.0 / r_oh - 1.0 / r_cn);
    Some(energy.max(MIN_ENERGY))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BackboneHBond {
    /// Index of the residue donating N-H
    pub donor: usize,
    /// Index of the residue accepting on C=O
    pub acceptor: usize,
    pub energy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignedResidue {
    pub chain: String,
    pub resi: isize,
    pub insertion: String,
    pub class: SecondaryClass,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DsspAssignment {
    pub residues: Vec<AssignedResidue>,
    /// The (up to two) strongest bonds of each donor below the energy cutoff
    pub hbonds: Vec<BackboneHBond>,
}

impl DsspAssignment {
    /// Class of the residue at `chain`/`resi`; the first match wins for insertion codes.
    pub fn class_of(&self, chain: &str, resi: isize) -> Option<SecondaryClass> {
        self.residues
            .iter()
            .find(|r| r.chain == chain && r.resi == resi)
            .map(|r| r.class)
    }

    /// Number of residues per class code.
    pub fn class_counts(&self) -> BTreeMap<char, usize> {
        let mut counts = BTreeMap::new();
        for r in self.residues.iter() {
            *counts.entry(r.class.code()).or_insert(0) += 1;
        }
        counts
    }

    /// Residues whose N-H takes part in at least one bond.
    pub fn donor_residues(&self) -> usize {
        let mut donors: Vec<usize> = self.hbonds.iter().map(|b| b.donor).collect();
        donors.sort_unstable();
        donors.dedup();
        donors.len()
    }

    /// Residues whose C=O takes part in at least one bond.
    pub fn acceptor_residues(&self) -> usize {
        let mut acceptors: Vec<usize> = self.hbonds.iter().map(|b| b.acceptor).collect();
        acceptors.sort_unstable();
        acceptors.dedup();
        acceptors.len()
    }

    /// DSSP string over all assigned residues.
    pub fn to_dssp_string(&self) -> String {
        self.residues.iter().map(|r| r.class.code()).collect()
    }
}

/// Assign secondary structure to every residue with a complete backbone.
///
/// Fails with [`AnalysisError::ComputationDegraded`] if no residue has all of N, CA, C and O.
pub fn assign(structure: &Structure, energy_cutoff: f64) -> Result<DsspAssignment> {
    let residues = backbone_residues(structure);
    if residues.is_empty() {
        return Err(AnalysisError::ComputationDegraded(format!(
            "no residue of {} has a complete backbone",
            structure.id()
        )));
    }
    let len = residues.len();

    // Candidate partners are found through a Cα tree
    let tree = RTree::bulk_load(
        residues
            .iter()
            .enumerate()
            .map(|(i, r)| GeomWithData::new([r.ca.x, r.ca.y, r.ca.z], i))
            .collect(),
    );
    let acceptors: Vec<Vec<BackboneHBond>> = residues
        .par_iter()
        .enumerate()
        .map(|(i, donor)| {
            if donor.h.is_none() {
                return vec![];
            }
            let mut bonds: Vec<BackboneHBond> = tree
                .locate_within_distance([donor.ca.x, donor.ca.y, donor.ca.z], CA_CUTOFF * CA_CUTOFF)
                .map(|g| g.data)
                .filter(|&j| j != i && j + 1 != i)
                .filter_map(|j| {
                    hbond_energy(donor, &residues[j]).map(|energy| BackboneHBond {
                        donor: i,
                        acceptor: j,
                        energy,
                    })
                })
                .filter(|b| b.energy < energy_cutoff)
                .collect();
            bonds.sort_by(|a, b| a.energy.total_cmp(&b.energy));
            bonds.truncate(2);
            bonds
        })
        .collect();

    // Segment index increments at every chain break
    let segment: Vec<usize> = residues
        .iter()
        .scan(0usize, |seg, r| {
            if r.break_before {
                *seg += 1;
            }
            Some(*seg)
        })
        .collect();
    let no_break = |i: usize, j: usize| i < len && j < len && segment[i] == segment[j];

    // C=O of `i` accepts from N-H of `j`
    let hbond = |i: usize, j: usize| -> bool {
        i < len && j < len && acceptors[j].iter().any(|b| b.acceptor == i)
    };

    let turn = |n: usize, i: usize| i + n < len && no_break(i, i + n) && hbond(i, i + n);

    let mut helix = [vec![false; len], vec![false; len], vec![false; len]];
    let mut in_turn = vec![false; len];
    for (slot, n) in [3usize, 4, 5].into_iter().enumerate() {
        for i in 0..len {
            if !turn(n, i) {
                continue;
            }
            (i + 1..i + n).for_each(|k| in_turn[k] = true);
            // Two consecutive n-turns make a minimal helix
            if i > 0 && turn(n, i - 1) {
                (i..i + n).for_each(|k| helix[slot][k] = true);
            }
        }
    }

    let mut bridged = vec![false; len];
    for i in 1..len.saturating_sub(1) {
        if !no_break(i - 1, i + 1) {
            continue;
        }
        for j in (i + 3)..len.saturating_sub(1) {
            if !no_break(j - 1, j + 1) {
                continue;
            }
            let parallel =
                (hbond(i - 1, j) && hbond(j, i + 1)) || (hbond(j - 1, i) && hbond(i, j + 1));
            let antiparallel =
                (hbond(i, j) && hbond(j, i)) || (hbond(i - 1, j + 1) && hbond(j - 1, i + 1));
            if parallel || antiparallel {
                bridged[i] = true;
                bridged[j] = true;
            }
        }
    }

    let bend: Vec<bool> = (0..len)
        .map(|k| {
            if k < 2 || k + 2 >= len || !no_break(k - 2, k + 2) {
                return false;
            }
            let v1 = residues[k].ca - residues[k - 2].ca;
            let v2 = residues[k + 2].ca - residues[k].ca;
            v1.angle(&v2).to_degrees() > BEND_ANGLE
        })
        .collect();

    let assigned: Vec<AssignedResidue> = residues
        .iter()
        .enumerate()
        .map(|(k, r)| {
            let ladder = (k > 0 && bridged[k - 1] && no_break(k - 1, k))
                || (k + 1 < len && bridged[k + 1] && no_break(k, k + 1));
            let class = if helix[1][k] {
                SecondaryClass::AlphaHelix
            } else if bridged[k] && ladder {
                SecondaryClass::Strand
            } else if bridged[k] {
                SecondaryClass::Bridge
            } else if helix[0][k] {
                SecondaryClass::Helix310
            } else if helix[2][k] {
                SecondaryClass::PiHelix
            } else if in_turn[k] {
                SecondaryClass::Turn
            } else if bend[k] {
                SecondaryClass::Bend
            } else {
                SecondaryClass::Coil
            };
            AssignedResidue {
                chain: r.chain.clone(),
                resi: r.resi,
                insertion: r.insertion.clone(),
                class,
            }
        })
        .collect();

    let hbonds: Vec<BackboneHBond> = acceptors.into_iter().flatten().collect();
    debug!(
        "Assigned {} residues of {} with {} backbone hydrogen bonds",
        assigned.len(),
        structure.id(),
        hbonds.len()
    );
    Ok(DsspAssignment {
        residues: assigned,
        hbonds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ideal_backbone, peptide, PdbBuilder};

    fn residue_at(n: [f64; 3], h: [f64; 3], c: [f64; 3], o: [f64; 3]) -> BackboneResidue {
        BackboneResidue {
            chain: "A".to_string(),
            resi: 1,
            insertion: String::new(),
            n: Vector3::from(n),
            ca: Vector3::zeros(),
            c: Vector3::from(c),
            o: Vector3::from(o),
            h: Some(Vector3::from(h)),
            break_before: false,
        }
    }

    #[test]
    fn linear_hydrogen_bond_energy() {
        let donor = residue_at([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0; 3], [0.0; 3]);
        let acceptor = residue_at([9.0; 3], [9.0; 3], [4.13, 0.0, 0.0], [2.9, 0.0, 0.0]);
        let energy = hbond_energy(&donor, &acceptor).unwrap();
        assert!((energy + 2.9).abs() < 0.1, "{energy}");

        let mut proline = donor.clone();
        proline.h = None;
        assert!(hbond_energy(&proline, &acceptor).is_none());
    }

    #[test]
    fn ideal_alpha_helix() {
        let structure = peptide("A", 1, &ideal_backbone(16, -57.0, -47.0)).build("1hlx");
        let assignment = assign(&structure, -0.5).unwrap();

        assert_eq!(assignment.residues.len(), 16);
        let interior = &assignment.residues[2..14];
        let helical = interior
            .iter()
            .filter(|r| r.class == SecondaryClass::AlphaHelix)
            .count();
        assert!(
            helical >= 10,
            "expected a helix, got {}",
            assignment.to_dssp_string()
        );
        assert_eq!(assignment.class_of("A", 8), Some(SecondaryClass::AlphaHelix));
        assert!(assignment.donor_residues() > 0);
        assert!(assignment.acceptor_residues() > 0);
    }

    #[test]
    fn extended_chain_has_no_helix() {
        let structure = peptide("A", 1, &ideal_backbone(12, -120.0, 130.0)).build("1ext");
        let assignment = assign(&structure, -0.5).unwrap();
        assert!(
            assignment.residues.iter().all(|r| !r.class.is_helix()),
            "{}",
            assignment.to_dssp_string()
        );
    }

    #[test]
    fn chain_break_removes_amide_hydrogen() {
        let backbone = ideal_backbone(2, -120.0, 130.0);
        let shift = |p: [f64; 3]| [p[0] + 20.0, p[1], p[2]];
        let far = backbone[1].map(shift);
        let structure = PdbBuilder::new()
            .backbone("A", 1, "ALA", backbone[0])
            .backbone("A", 2, "ALA", far)
            .build("1brk");

        let residues = backbone_residues(&structure);
        assert_eq!(residues.len(), 2);
        assert!(residues[1].break_before);
        assert!(residues[1].h.is_none());
    }

    #[test]
    fn ca_only_model_cannot_be_assigned() {
        let structure = PdbBuilder::new()
            .atom("A", 1, "ALA", "CA", "C", [0.0, 0.0, 0.0])
            .atom("A", 2, "ALA", "CA", "C", [3.8, 0.0, 0.0])
            .build("1caa");
        let err = assign(&structure, -0.5).unwrap_err();
        assert!(matches!(err, AnalysisError::ComputationDegraded(_)));
    }
}
