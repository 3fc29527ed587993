//! Solvent accessible surface area with the Shrake-Rupley algorithm.

use crate::error::{AnalysisError, Outcome, Result};
use crate::interactions::InteractingEntity;
use crate::settings::Settings;
use crate::structure::Structure;
use crate::utils::round_to;
use pdbtbx::*;
use polars::prelude::*;
use rust_sasa::calculate_sasa_internal;
use rust_sasa::Atom as SASAAtom;
use std::collections::BTreeMap;
use tracing::debug;

/// Convert atoms to the rust-sasa representation.
/// Fails if any atom lacks an element or a van der Waals radius.
fn to_sasa_atoms<'a>(
    atoms: impl Iterator<Item = AtomConformerResidueChainModel<'a>>,
) -> Result<(Vec<SASAAtom>, Vec<InteractingEntity>)> {
    let mut sasa_atoms = Vec::new();
    let mut annotations = Vec::new();
    for x in atoms {
        let radius = x
            .atom()
            .element()
            .and_then(|e| e.atomic_radius().van_der_waals)
            .ok_or_else(|| {
                AnalysisError::ComputationDegraded(format!(
                    "no van der Waals radius for atom {} ({})",
                    x.atom().serial_number(),
                    x.atom().name()
                ))
            })?;
        let (x_pos, y_pos, z_pos) = x.atom().pos();
        sasa_atoms.push(SASAAtom {
            position: nalgebra::Point3::new(x_pos as f32, y_pos as f32, z_pos as f32),
            radius: radius as f32,
            id: x.atom().serial_number(),
            parent_id: None,
        });
        annotations.push(InteractingEntity::from_hier(&x));
    }
    Ok((sasa_atoms, annotations))
}

/// Calculate the SASA of every atom in the structure.
///
/// Columns: `chain, resn, resi, insertion, atomn, atomi, sasa`.
pub fn get_atom_sasa(structure: &Structure, probe_radius: f32, n_points: usize) -> Result<DataFrame> {
    let (atoms, annotations) = to_sasa_atoms(structure.pdb().atoms_with_hierarchy())?;
    let atom_sasa = calculate_sasa_internal(&atoms, Some(probe_radius), Some(n_points));

    let df = df!(
        "chain" => annotations.iter().map(|x| x.chain.to_owned()).collect::<Vec<String>>(),
        "resn" => annotations.iter().map(|x| x.resn.to_owned()).collect::<Vec<String>>(),
        "resi" => annotations.iter().map(|x| x.resi as i64).collect::<Vec<i64>>(),
        "insertion" => annotations.iter().map(|x| x.insertion.to_owned()).collect::<Vec<String>>(),
        "atomn" => annotations.iter().map(|x| x.atomn.to_owned()).collect::<Vec<String>>(),
        "atomi" => annotations.iter().map(|x| x.atomi as i64).collect::<Vec<i64>>(),
        "sasa" => atom_sasa,
    )?;
    Ok(df)
}

/// Sum atom SASA by residue.
pub fn get_residue_sasa(
    structure: &Structure,
    probe_radius: f32,
    n_points: usize,
) -> Result<DataFrame> {
    let df = get_atom_sasa(structure, probe_radius, n_points)?
        .lazy()
        .group_by_stable([col("chain"), col("resn"), col("resi"), col("insertion")])
        .agg([col("sasa").cast(DataType::Float64).sum()])
        .collect()?;
    Ok(df)
}

/// Sum atom SASA by chain, with all chains present (complex context).
pub fn get_chain_sasa(structure: &Structure, probe_radius: f32, n_points: usize) -> Result<DataFrame> {
    let df = get_atom_sasa(structure, probe_radius, n_points)?
        .lazy()
        .group_by_stable([col("chain")])
        .agg([col("sasa").cast(DataType::Float64).sum()])
        .sort(["chain"], Default::default())
        .collect()?;
    Ok(df)
}

/// Total SASA of each chain in the context of the whole model, rounded to 2 decimals.
pub fn sasa_per_chain(structure: &Structure, settings: &Settings) -> Outcome<BTreeMap<String, f64>> {
    let totals = || -> Result<BTreeMap<String, f64>> {
        let df = get_chain_sasa(structure, settings.probe_radius, settings.n_points)?;
        let chains = df.column("chain")?.str()?;
        let sasa = df.column("sasa")?.f64()?;
        let totals: BTreeMap<String, f64> = chains
            .into_iter()
            .zip(sasa.into_iter())
            .filter_map(|(chain, sasa)| Some((chain?.to_string(), round_to(sasa?, 2))))
            .collect();
        for (chain, total) in totals.iter() {
            debug!("Chain {chain} has a SASA of {total:.2} Å²");
        }
        Ok(totals)
    };
    totals().into()
}
