use crate::amino_acids::{property, three_to_one, AminoAcidProperty};
use pdbtbx::*;
use std::fmt;

/// The struct for a residue identifier
#[derive(Debug, Hash, PartialEq, Eq, Clone, PartialOrd, Ord)]
pub struct ResidueId<'a> {
    /// Chain identifier
    pub chain: &'a str,
    /// Residue index
    pub resi: isize,
    /// Residue insertion code
    pub insertion: &'a str,
    /// Residue name
    pub resn: &'a str,
}

impl<'a> ResidueId<'a> {
    pub fn new(chain: &'a str, resi: isize, insertion: &'a str, resn: &'a str) -> Self {
        Self {
            chain,
            resi,
            insertion,
            resn,
        }
    }

    /// Helper function to convert an [`pdbtbx::AtomConformerResidueChainModel`] to a residue identifier
    pub fn from_hier(hier: &'a AtomConformerResidueChainModel) -> Self {
        Self::from_residue(hier.chain().id(), hier.residue())
    }

    pub fn from_residue(chain: &'a str, residue: &'a Residue) -> Self {
        let (resi, insertion) = residue.id();
        Self::new(
            chain,
            resi,
            insertion.unwrap_or(""),
            residue.name().unwrap_or(""),
        )
    }

    /// `<chain>:<number>`, e.g. `A:22`
    pub fn position_label(&self) -> String {
        format!("{}:{}{}", self.chain, self.resi, self.insertion)
    }

    /// `<chain>:<RES><number>`, e.g. `A:LYS33`
    pub fn named_label(&self) -> String {
        format!("{}:{}{}{}", self.chain, self.resn, self.resi, self.insertion)
    }
}

impl fmt::Display for ResidueId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Chain {chain}, Residue {resn} {resi}{insertion}",
            chain = self.chain,
            resn = self.resn,
            resi = self.resi,
            insertion = self.insertion,
        )
    }
}

/// Names accepted as water in deposited coordinate files.
const WATER_NAMES: [&str; 4] = ["HOH", "WAT", "DOD", "H2O"];

pub trait ResidueExt {
    /// The residue one-letter code, or `None` if it's not a standard amino acid.
    fn resn(&self) -> Option<char>;

    /// Physicochemical properties of the residue, if it is a standard amino acid.
    fn property(&self) -> Option<&'static AminoAcidProperty>;

    fn is_water(&self) -> bool;

    /// The first atom with the given name, taken from the first conformer
    /// that has it (alternate locations beyond the first are ignored).
    fn atom_named(&self, name: &str) -> Option<&Atom>;
}

impl ResidueExt for Residue {
    fn resn(&self) -> Option<char> {
        self.name().and_then(three_to_one)
    }

    fn property(&self) -> Option<&'static AminoAcidProperty> {
        self.resn().and_then(property)
    }

    fn is_water(&self) -> bool {
        self.name()
            .is_some_and(|n| WATER_NAMES.contains(&n.trim().to_uppercase().as_str()))
    }

    fn atom_named(&self, name: &str) -> Option<&Atom> {
        self.conformers()
            .flat_map(|c| c.atoms())
            .find(|atom| atom.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::PdbBuilder;

    #[test]
    fn residue_labels() {
        let structure = PdbBuilder::new()
            .atom("A", 33, "LYS", "NZ", "N", [0.0, 0.0, 0.0])
            .build("1abc");
        let chain = structure.pdb().chains().next().unwrap();
        let residue = chain.residues().next().unwrap();
        let id = ResidueId::from_residue(chain.id(), residue);

        assert_eq!(id.position_label(), "A:33");
        assert_eq!(id.named_label(), "A:LYS33");
        assert_eq!(residue.resn(), Some('K'));
        assert_eq!(residue.property().unwrap().charge, 1.0);
        assert!(residue.atom_named("NZ").is_some());
        assert!(residue.atom_named("CA").is_none());
    }

    #[test]
    fn non_standard_residue_has_no_code() {
        let structure = PdbBuilder::new()
            .hetatm("A", 1, "MSE", "SE", "SE", [0.0, 0.0, 0.0])
            .build("1abc");
        let residue = structure.pdb().residues().next().unwrap();
        assert_eq!(residue.resn(), None);
        assert!(!residue.is_water());
    }
}
