//! Fixtures: small structures written as PDB text and loaded through [`Structure::from_file`].

use crate::structure::Structure;
use std::io::Write;

#[derive(Default)]
pub struct PdbBuilder {
    lines: Vec<String>,
    serial: usize,
}

impl PdbBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn atom(
        self,
        chain: &str,
        resi: isize,
        resn: &str,
        name: &str,
        element: &str,
        pos: [f64; 3],
    ) -> Self {
        self.record("ATOM  ", chain, resi, resn, name, element, pos)
    }

    pub fn hetatm(
        self,
        chain: &str,
        resi: isize,
        resn: &str,
        name: &str,
        element: &str,
        pos: [f64; 3],
    ) -> Self {
        self.record("HETATM", chain, resi, resn, name, element, pos)
    }

    /// Add all backbone atoms of a residue.
    pub fn backbone(self, chain: &str, resi: isize, resn: &str, bb: [[f64; 3]; 4]) -> Self {
        self.atom(chain, resi, resn, "N", "N", bb[0])
            .atom(chain, resi, resn, "CA", "C", bb[1])
            .atom(chain, resi, resn, "C", "C", bb[2])
            .atom(chain, resi, resn, "O", "O", bb[3])
    }

    pub fn model(mut self, serial: usize) -> Self {
        self.lines.push(format!("MODEL     {serial:>4}"));
        self
    }

    pub fn end_model(mut self) -> Self {
        self.lines.push("ENDMDL".to_string());
        self
    }

    #[allow(clippy::too_many_arguments)]
    fn record(
        mut self,
        kind: &str,
        chain: &str,
        resi: isize,
        resn: &str,
        name: &str,
        element: &str,
        pos: [f64; 3],
    ) -> Self {
        self.serial += 1;
        let name = if name.len() < 4 && element.len() == 1 {
            format!(" {name:<3}")
        } else {
            format!("{name:<4}")
        };
        self.lines.push(format!(
            "{kind}{serial:>5} {name}{alt:1}{resn:>3} {chain:1}{resi:>4}{icode:1}   {x:>8.3}{y:>8.3}{z:>8.3}{occ:>6.2}{b:>6.2}          {element:>2}",
            serial = self.serial,
            alt = "",
            icode = "",
            x = pos[0],
            y = pos[1],
            z = pos[2],
            occ = 1.0,
            b = 20.0,
        ));
        self
    }

    pub fn to_pdb_string(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push_str("\nEND\n");
        text
    }

    /// Write the records to a temporary `.pdb` file and load them.
    pub fn build(&self, id: &str) -> Structure {
        let mut file = tempfile::Builder::new()
            .suffix(".pdb")
            .tempfile()
            .unwrap();
        file.write_all(self.to_pdb_string().as_bytes()).unwrap();
        file.flush().unwrap();
        Structure::from_file(file.path(), Some(id)).unwrap()
    }
}

/// Internal coordinates to Cartesian (natural extension reference frame).
///
/// Places `d` such that |cd| = `bond`, angle bcd = `angle` and dihedral abcd = `torsion`
/// (angles in degrees).
pub fn place_atom(a: [f64; 3], b: [f64; 3], c: [f64; 3], bond: f64, angle: f64, torsion: f64) -> [f64; 3] {
    use nalgebra::Vector3;
    let a = Vector3::from(a);
    let b = Vector3::from(b);
    let c = Vector3::from(c);
    let bc = (c - b).normalize();
    let n = (b - a).cross(&bc).normalize();
    let m = n.cross(&bc);

    let (angle, torsion) = (angle.to_radians(), torsion.to_radians());
    let d2 = Vector3::new(
        -bond * angle.cos(),
        bond * angle.sin() * torsion.cos(),
        bond * angle.sin() * torsion.sin(),
    );
    let d = c + bc * d2.x + m * d2.y + n * d2.z;
    [d.x, d.y, d.z]
}

/// Backbone (N, CA, C, O) of an ideal peptide with constant phi/psi.
pub fn ideal_backbone(n_residues: usize, phi: f64, psi: f64) -> Vec<[[f64; 3]; 4]> {
    const N_CA: f64 = 1.458;
    const CA_C: f64 = 1.525;
    const C_N: f64 = 1.329;
    const C_O: f64 = 1.231;
    const N_CA_C: f64 = 111.2;
    const CA_C_N: f64 = 116.2;
    const C_N_CA: f64 = 121.7;
    const CA_C_O: f64 = 120.5;
    const OMEGA: f64 = 180.0;

    let mut residues: Vec<[[f64; 3]; 4]> = Vec::with_capacity(n_residues);
    let mut n = [0.0, 0.0, 0.0];
    let mut ca = [N_CA, 0.0, 0.0];
    let ang = (180.0 - N_CA_C).to_radians();
    let mut c = [
        ca[0] + CA_C * ang.cos(),
        CA_C * ang.sin(),
        0.0,
    ];
    for i in 0..n_residues {
        if i > 0 {
            let prev = residues[i - 1];
            let (pn, pca, pc): ([f64; 3], [f64; 3], [f64; 3]) = (prev[0], prev[1], prev[2]);
            n = place_atom(pn, pca, pc, C_N, CA_C_N, psi);
            ca = place_atom(pca, pc, n, N_CA, C_N_CA, OMEGA);
            c = place_atom(pc, n, ca, CA_C, N_CA_C, phi);
        }
        // The carbonyl O sits opposite the next N
        let o = place_atom(n, ca, c, C_O, CA_C_O, psi + 180.0);
        residues.push([n, ca, c, o]);
    }
    residues
}

/// A chain of alanines with the given backbone.
pub fn peptide(chain: &str, first: isize, backbone: &[[[f64; 3]; 4]]) -> PdbBuilder {
    backbone
        .iter()
        .enumerate()
        .fold(PdbBuilder::new(), |builder, (i, bb)| {
            builder.backbone(chain, first + i as isize, "ALA", *bb)
        })
}
