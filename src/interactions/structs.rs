use crate::utils::round_to;
use core::fmt;
use pdbtbx::*;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// Covalent S-S bond between two cysteine SG atoms
    Disulfide,
    /// Oppositely charged side-chain atoms in close contact
    SaltBridge,
}

impl fmt::Display for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interaction::Disulfide => write!(f, "Disulfide"),
            Interaction::SaltBridge => write!(f, "SaltBridge"),
        }
    }
}

#[derive(Debug, Hash, PartialEq, Eq, Clone)]
pub struct InteractingEntity {
    pub chain: String,
    pub resn: String,
    pub resi: isize,
    pub insertion: String,
    pub atomn: String,
    pub atomi: usize,
}

impl InteractingEntity {
    pub fn from_hier(hierarchy: &AtomConformerResidueChainModel<'_>) -> Self {
        let (resi, insertion) = hierarchy.residue().id();
        Self {
            chain: hierarchy.chain().id().to_string(),
            resn: hierarchy.residue().name().unwrap_or("").to_string(),
            resi,
            insertion: insertion.unwrap_or("").to_string(),
            atomn: hierarchy.atom().name().to_string(),
            atomi: hierarchy.atom().serial_number(),
        }
    }

    /// `<chain>:<number>`
    pub fn position_label(&self) -> String {
        format!("{}:{}{}", self.chain, self.resi, self.insertion)
    }

    /// `<chain>:<RES><number>`
    pub fn named_label(&self) -> String {
        format!("{}:{}{}{}", self.chain, self.resn, self.resi, self.insertion)
    }
}

#[derive(Debug, Clone)]
pub struct ResultEntry {
    pub interaction: Interaction,
    pub ligand: InteractingEntity,
    pub receptor: InteractingEntity,
    pub distance: f64,
}

impl fmt::Display for InteractingEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Chain {chain}, Residue {resn} {resi}{insertion}, Atom {atom_name} {atom_idx}",
            chain = self.chain,
            resn = self.resn,
            resi = self.resi,
            insertion = self.insertion,
            atom_name = self.atomn,
            atom_idx = self.atomi
        )
    }
}

impl fmt::Display for ResultEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{ligand}] has {intxn} with [{receptor}] at {dist:.2} Å",
            ligand = self.ligand,
            intxn = self.interaction,
            receptor = self.receptor,
            dist = self.distance,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisulfideBond {
    pub cys1: String,
    pub cys2: String,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisulfideReport {
    pub count: usize,
    pub bonds: Vec<DisulfideBond>,
}

impl From<&[ResultEntry]> for DisulfideReport {
    fn from(entries: &[ResultEntry]) -> Self {
        let bonds: Vec<DisulfideBond> = entries
            .iter()
            .filter(|e| e.interaction == Interaction::Disulfide)
            .map(|e| DisulfideBond {
                cys1: e.ligand.position_label(),
                cys2: e.receptor.position_label(),
                distance: round_to(e.distance, 2),
            })
            .collect();
        Self {
            count: bonds.len(),
            bonds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaltBridge {
    pub positive: String,
    pub negative: String,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaltBridgeReport {
    pub count: usize,
    pub bridges: Vec<SaltBridge>,
}

impl From<&[ResultEntry]> for SaltBridgeReport {
    fn from(entries: &[ResultEntry]) -> Self {
        let bridges: Vec<SaltBridge> = entries
            .iter()
            .filter(|e| e.interaction == Interaction::SaltBridge)
            .map(|e| SaltBridge {
                positive: e.ligand.named_label(),
                negative: e.receptor.named_label(),
                distance: round_to(e.distance, 2),
            })
            .collect();
        Self {
            count: bridges.len(),
            bridges,
        }
    }
}
