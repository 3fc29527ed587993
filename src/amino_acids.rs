//! Static amino-acid property table.
//!
//! Charges are formal charges at pH 7 (histidine counted as half-protonated),
//! volumes are van der Waals volumes in Å³ (Zamyatnin, 1972).

use serde::Serialize;

/// Physicochemical properties of one standard amino acid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AminoAcidProperty {
    /// One-letter code
    pub code: char,
    /// Three-letter residue name
    pub resn: &'static str,
    pub name: &'static str,
    pub charge: f64,
    pub hydrophobic: bool,
    pub polar: bool,
    pub volume: f64,
}

const fn aa(
    code: char,
    resn: &'static str,
    name: &'static str,
    charge: f64,
    hydrophobic: bool,
    polar: bool,
    volume: f64,
) -> AminoAcidProperty {
    AminoAcidProperty {
        code,
        resn,
        name,
        charge,
        hydrophobic,
        polar,
        volume,
    }
}

/// All 20 standard amino acids in alphabetical order of their one-letter code.
pub const AMINO_ACIDS: [AminoAcidProperty; 20] = [
    aa('A', "ALA", "Alanine", 0.0, true, false, 88.6),
    aa('C', "CYS", "Cysteine", 0.0, true, false, 108.5),
    aa('D', "ASP", "Aspartic acid", -1.0, false, true, 111.1),
    aa('E', "GLU", "Glutamic acid", -1.0, false, true, 138.4),
    aa('F', "PHE", "Phenylalanine", 0.0, true, false, 189.9),
    aa('G', "GLY", "Glycine", 0.0, true, false, 60.1),
    aa('H', "HIS", "Histidine", 0.5, false, true, 153.2),
    aa('I', "ILE", "Isoleucine", 0.0, true, false, 166.7),
    aa('K', "LYS", "Lysine", 1.0, false, true, 168.6),
    aa('L', "LEU", "Leucine", 0.0, true, false, 166.7),
    aa('M', "MET", "Methionine", 0.0, true, false, 162.9),
    aa('N', "ASN", "Asparagine", 0.0, false, true, 114.1),
    aa('P', "PRO", "Proline", 0.0, true, false, 112.7),
    aa('Q', "GLN", "Glutamine", 0.0, false, true, 143.8),
    aa('R', "ARG", "Arginine", 1.0, false, true, 173.4),
    aa('S', "SER", "Serine", 0.0, false, true, 89.0),
    aa('T', "THR", "Threonine", 0.0, false, true, 116.1),
    aa('V', "VAL", "Valine", 0.0, true, false, 140.0),
    aa('W', "TRP", "Tryptophan", 0.0, true, false, 227.8),
    aa('Y', "TYR", "Tyrosine", 0.0, false, true, 193.6),
];

/// Look up the properties of a one-letter code (case-insensitive).
pub fn property(code: char) -> Option<&'static AminoAcidProperty> {
    let code = code.to_ascii_uppercase();
    AMINO_ACIDS.iter().find(|p| p.code == code)
}

/// Map a three-letter residue name to its one-letter code.
/// Returns `None` for water, ligands and non-standard residues.
pub fn three_to_one(resn: &str) -> Option<char> {
    let code = match resn.trim().to_uppercase().as_str() {
        "ALA" => 'A',
        "ARG" => 'R',
        "ASN" => 'N',
        "ASP" => 'D',
        "CYS" => 'C',
        "GLN" => 'Q',
        "GLU" => 'E',
        "GLY" => 'G',
        "HIS" => 'H',
        "ILE" => 'I',
        "LEU" => 'L',
        "LYS" => 'K',
        "MET" => 'M',
        "PHE" => 'F',
        "PRO" => 'P',
        "SER" => 'S',
        "THR" => 'T',
        "TRP" => 'W',
        "TYR" => 'Y',
        "VAL" => 'V',
        _ => return None,
    };
    Some(code)
}
