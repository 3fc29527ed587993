use super::structs::{InteractingEntity, Interaction, ResultEntry};
use crate::residues::ResidueId;
use crate::structure::Structure;

use pdbtbx::*;
use std::collections::HashMap;

/// Check if the entity contains ionizable groups that are positively charged at pH 7.0.
fn is_pos_ionizable(res_name: &str, atom_name: &str) -> bool {
    matches!(
        (res_name, atom_name),
        ("ARG", "NE")
            | ("ARG", "NH1")
            | ("ARG", "NH2")
            | ("HIS", "ND1")
            | ("HIS", "NE2")
            | ("LYS", "NZ")
    )
}

/// Check if the entity contains ionizable groups that are negatively charged at pH 7.0.
fn is_neg_ionizable(res_name: &str, atom_name: &str) -> bool {
    matches!(
        (res_name, atom_name),
        ("ASP", "OD1") | ("ASP", "OD2") | ("GLU", "OE1") | ("GLU", "OE2")
    )
}

/// Position of every residue in the order it appears in the model.
fn residue_order(pdb: &PDB) -> HashMap<ResidueId<'_>, usize> {
    pdb.chains()
        .flat_map(|chain| {
            chain
                .residues()
                .map(move |residue| ResidueId::from_residue(chain.id(), residue))
        })
        .enumerate()
        .map(|(i, id)| (id, i))
        .collect()
}

/// Search for salt bridges.
///
/// A positive and a negative ionizable atom interact if they are at most `cutoff`
/// apart. Each residue pair is reported once, represented by its closest atom pair,
/// ordered by where the positive residue appears in the structure and then the
/// negative one.
pub fn find_salt_bridges(structure: &Structure, cutoff: f64) -> Vec<ResultEntry> {
    let tree = structure.pdb().create_hierarchy_rtree();
    let max_radius_squared = cutoff * cutoff;

    let mut closest: HashMap<(ResidueId, ResidueId), ResultEntry> = HashMap::new();
    for pos in tree
        .iter()
        .filter(|x| is_pos_ionizable(x.conformer().name(), x.atom().name()))
    {
        for neg in tree
            .locate_within_distance(pos.atom().pos(), max_radius_squared)
            .filter(|y| is_neg_ionizable(y.conformer().name(), y.atom().name()))
        {
            let dist = pos.atom().distance(neg.atom());
            if dist > cutoff {
                continue;
            }
            let key = (ResidueId::from_hier(pos), ResidueId::from_hier(neg));
            let better = closest.get(&key).is_none_or(|prev| dist < prev.distance);
            if better {
                closest.insert(
                    key,
                    ResultEntry {
                        interaction: Interaction::SaltBridge,
                        ligand: InteractingEntity::from_hier(pos),
                        receptor: InteractingEntity::from_hier(neg),
                        distance: dist,
                    },
                );
            }
        }
    }

    let order = residue_order(structure.pdb());
    let mut bridges: Vec<_> = closest.into_iter().collect();
    bridges.sort_by_key(|((pos, neg), _)| {
        (
            order.get(pos).copied().unwrap_or(usize::MAX),
            order.get(neg).copied().unwrap_or(usize::MAX),
        )
    });
    bridges.into_iter().map(|(_, entry)| entry).collect()
}
