use crate::residues::ResidueExt;
use pdbtbx::*;

pub trait ChainExt {
    /// Observed one-letter sequence of the standard residues in the chain.
    fn pdb_seq(&self) -> String;

    /// Residues of the chain that map to one of the 20 standard amino acids.
    fn standard_residues(&self) -> Vec<&Residue>;
}

impl ChainExt for Chain {
    fn pdb_seq(&self) -> String {
        // Non-standard residues and ligands are skipped
        self.residues().filter_map(|res| res.resn()).collect()
    }

    fn standard_residues(&self) -> Vec<&Residue> {
        self.residues().filter(|res| res.resn().is_some()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::PdbBuilder;

    #[test]
    fn sequence_skips_ligands() {
        let structure = PdbBuilder::new()
            .atom("A", 1, "MET", "CA", "C", [0.0, 0.0, 0.0])
            .atom("A", 2, "LYS", "CA", "C", [3.8, 0.0, 0.0])
            .hetatm("A", 3, "MSE", "CA", "C", [7.6, 0.0, 0.0])
            .atom("A", 4, "TRP", "CA", "C", [11.4, 0.0, 0.0])
            .build("1abc");
        let chain = structure.pdb().chains().next().unwrap();
        assert_eq!(chain.pdb_seq(), "MKW");
        assert_eq!(chain.standard_residues().len(), 3);
    }
}
