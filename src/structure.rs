//! A parsed coordinate model tagged with its PDB identifier.

use crate::chains::ChainExt;
use crate::error::Result;
use crate::utils::{load_model, log_pdb_errors};
use pdbtbx::*;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// First model of a deposited structure, waters removed.
#[derive(Debug, Clone)]
pub struct Structure {
    id: String,
    pdb: PDB,
}

impl Structure {
    pub fn new(id: &str, pdb: PDB) -> Self {
        Self {
            id: id.to_uppercase(),
            pdb,
        }
    }

    /// Load a PDB or mmCIF file. The identifier defaults to the file stem.
    pub fn from_file(path: &Path, id: Option<&str>) -> Result<Self> {
        let (pdb, warnings) = load_model(path)?;
        log_pdb_errors(&warnings);

        let id = match id {
            Some(id) => id.to_string(),
            None => path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default(),
        };
        debug!(
            "Loaded {id} with {} chains, {} residues and {} atoms",
            pdb.chain_count(),
            pdb.residue_count(),
            pdb.atom_count()
        );
        Ok(Self::new(&id, pdb))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn pdb(&self) -> &PDB {
        &self.pdb
    }

    /// Find a residue by chain identifier and author residue number.
    /// Residues without an insertion code are preferred.
    pub fn residue(&self, chain: &str, number: isize) -> Option<&Residue> {
        let chain = self.pdb.chains().find(|c| c.id() == chain)?;
        let mut candidates = chain.residues().filter(|r| r.serial_number() == number);
        let first = candidates.next()?;
        if first.insertion_code().is_none() {
            return Some(first);
        }
        candidates
            .find(|r| r.insertion_code().is_none())
            .or(Some(first))
    }

    pub fn has_chain(&self, chain: &str) -> bool {
        self.pdb.chains().any(|c| c.id() == chain)
    }

    /// Observed one-letter sequence per chain; chains without standard residues are left out.
    pub fn chain_sequences(&self) -> BTreeMap<String, String> {
        self.pdb
            .chains()
            .map(|c| (c.id().to_string(), c.pdb_seq()))
            .filter(|(_, seq)| !seq.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::PdbBuilder;

    #[test]
    fn residue_lookup() {
        let structure = PdbBuilder::new()
            .atom("A", 10, "ALA", "CA", "C", [0.0, 0.0, 0.0])
            .atom("B", 10, "CYS", "CA", "C", [3.8, 0.0, 0.0])
            .build("1abc");

        assert_eq!(structure.id(), "1ABC");
        assert_eq!(structure.residue("B", 10).unwrap().name(), Some("CYS"));
        assert!(structure.residue("A", 11).is_none());
        assert!(structure.residue("C", 10).is_none());
        assert!(structure.has_chain("A"));
        assert_eq!(structure.chain_sequences()["A"], "A");
    }
}
