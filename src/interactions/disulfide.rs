use super::structs::{InteractingEntity, Interaction, ResultEntry};
use crate::structure::Structure;

use pdbtbx::*;

/// Check if the atom is the sulfur of a cysteine side chain.
fn is_cys_sulfur(hier: &AtomConformerResidueChainModel) -> bool {
    hier.conformer().name() == "CYS" && hier.atom().name() == "SG"
}

/// Search for disulfide bonds.
///
/// Every unordered pair of cysteine SG atoms is compared once; pairs closer than
/// `cutoff` (strictly) are reported in structure order.
pub fn find_disulfide_bonds(structure: &Structure, cutoff: f64) -> Vec<ResultEntry> {
    let mut seen = std::collections::HashSet::new();
    // Only the first SG of each cysteine counts; alternate conformers are ignored
    let sulfurs: Vec<AtomConformerResidueChainModel> = structure
        .pdb()
        .atoms_with_hierarchy()
        .filter(is_cys_sulfur)
        .filter(|x| {
            seen.insert((
                x.chain().id().to_string(),
                x.residue().id().0,
                x.residue().id().1.map(str::to_string),
            ))
        })
        .collect();

    let mut bonds = Vec::new();
    for (i, sg1) in sulfurs.iter().enumerate() {
        for sg2 in sulfurs.iter().skip(i + 1) {
            let dist = sg1.atom().distance(sg2.atom());
            if dist < cutoff {
                bonds.push(ResultEntry {
                    interaction: Interaction::Disulfide,
                    ligand: InteractingEntity::from_hier(sg1),
                    receptor: InteractingEntity::from_hier(sg2),
                    distance: dist,
                });
            }
        }
    }
    bonds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactions::DisulfideReport;
    use crate::test_utils::PdbBuilder;

    fn two_cysteines(dist: f64, swap: bool) -> Structure {
        let (a, b) = if swap { (dist, 0.0) } else { (0.0, dist) };
        PdbBuilder::new()
            .atom("A", 22, "CYS", "CA", "C", [a, 2.0, 0.0])
            .atom("A", 22, "CYS", "SG", "S", [a, 0.0, 0.0])
            .atom("A", 95, "CYS", "CA", "C", [b, -2.0, 0.0])
            .atom("A", 95, "CYS", "SG", "S", [b, 0.0, 0.0])
            .build("1abc")
    }

    #[test]
    fn close_sulfurs_are_bonded() {
        let structure = two_cysteines(2.04, false);
        let entries = find_disulfide_bonds(&structure, 2.5);
        let report = DisulfideReport::from(entries.as_slice());

        assert_eq!(report.count, 1);
        assert_eq!(report.bonds[0].cys1, "A:22");
        assert_eq!(report.bonds[0].cys2, "A:95");
        assert_eq!(report.bonds[0].distance, 2.04);
    }

    #[test]
    fn cutoff_is_strict_and_symmetric() {
        for swap in [false, true] {
            assert_eq!(find_disulfide_bonds(&two_cysteines(2.49, swap), 2.5).len(), 1);
            assert!(find_disulfide_bonds(&two_cysteines(2.5, swap), 2.5).is_empty());
            assert!(find_disulfide_bonds(&two_cysteines(3.1, swap), 2.5).is_empty());
        }
    }

    #[test]
    fn non_cysteine_sulfur_is_ignored() {
        let structure = PdbBuilder::new()
            .atom("A", 1, "CYS", "SG", "S", [0.0, 0.0, 0.0])
            .atom("A", 2, "MET", "SD", "S", [2.0, 0.0, 0.0])
            .build("1abc");
        assert!(find_disulfide_bonds(&structure, 2.5).is_empty());
    }

    #[test]
    fn cysteine_without_sulfur_is_skipped() {
        let structure = PdbBuilder::new()
            .atom("A", 22, "CYS", "CA", "C", [0.0, 2.0, 0.0])
            .atom("A", 22, "CYS", "CB", "C", [0.0, 0.5, 0.0])
            .atom("A", 95, "CYS", "CA", "C", [2.0, -2.0, 0.0])
            .atom("A", 95, "CYS", "SG", "S", [2.0, 0.0, 0.0])
            .build("1abc");
        assert!(find_disulfide_bonds(&structure, 2.5).is_empty());
        assert!(find_disulfide_bonds(&structure, 10.0).is_empty());
    }
}
