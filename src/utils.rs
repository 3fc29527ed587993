use crate::error::{AnalysisError, Result};
use crate::residues::ResidueExt;
use pdbtbx::*;
use polars::prelude::*;
use std::path::Path;
use tracing::{error, warn};

/// Open an atomic data file with [`pdbtbx::ReadOptions`], keep only the first
/// model and strip water molecules.
///
/// Ligands and non-standard residues are kept so that downstream classifiers
/// can skip them explicitly.
pub fn load_model(input_file: &Path) -> Result<(PDB, Vec<PDBError>)> {
    if !input_file.exists() {
        return Err(AnalysisError::NotFound(format!(
            "coordinate file {}",
            input_file.display()
        )));
    }
    let path = input_file
        .to_str()
        .ok_or_else(|| AnalysisError::InvalidInput(format!("{}", input_file.display())))?;

    // Load file as complex structure
    let (mut pdb, errors) = pdbtbx::ReadOptions::default()
        .set_only_atomic_coords(true)
        .set_level(pdbtbx::StrictnessLevel::Loose)
        .read(path)
        .map_err(|errs| {
            let msg = errs
                .iter()
                .map(|e| e.short_description().to_string())
                .collect::<Vec<_>>()
                .join("; ");
            AnalysisError::InvalidInput(format!("{path}: {msg}"))
        })?;

    let first_model = pdb.models().next().map(|m| m.serial_number());
    if let Some(first) = first_model {
        pdb.remove_models_by(|m| m.serial_number() != first);
    }
    pdb.remove_residues_by(|res| res.is_water());

    Ok((pdb, errors))
}

/// Log parse problems reported by pdbtbx by severity.
pub fn log_pdb_errors(errors: &[PDBError]) {
    errors.iter().for_each(|e| match e.level() {
        pdbtbx::ErrorLevel::BreakingError => error!("{e}"),
        pdbtbx::ErrorLevel::InvalidatingError => error!("{e}"),
        _ => warn!("{e}"),
    });
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Percentage of `part` in `whole`, or 0 when `whole` is empty.
pub fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Write a DataFrame to disk in the given format.
///
/// The extension of `file_path` is replaced by the one matching `file_type`.
pub fn write_df_to_file(
    df: &mut DataFrame,
    file_path: &Path,
    file_type: DataFrameFileType,
) -> Result<()> {
    let file_suffix = file_type.to_string();
    let mut file = std::fs::File::create(file_path.with_extension(file_suffix))?;
    match file_type {
        DataFrameFileType::Csv => {
            CsvWriter::new(&mut file).finish(df)?;
        }
        DataFrameFileType::Parquet => {
            ParquetWriter::new(&mut file).finish(df)?;
        }
        DataFrameFileType::Json => {
            JsonWriter::new(&mut file)
                .with_json_format(JsonFormat::Json)
                .finish(df)?;
        }
        DataFrameFileType::NDJson => {
            JsonWriter::new(&mut file)
                .with_json_format(JsonFormat::JsonLines)
                .finish(df)?;
        }
    }
    Ok(())
}

/// File format for writing DataFrames.
#[derive(clap::ValueEnum, Clone, Debug, Copy)]
pub enum DataFrameFileType {
    /// Comma-separated values
    Csv,
    /// Parquet columnar storage
    Parquet,
    /// Standard JSON
    Json,
    /// Newline-delimited JSON
    NDJson,
}

impl std::fmt::Display for DataFrameFileType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DataFrameFileType::Csv => write!(f, "csv"),
            DataFrameFileType::Parquet => write!(f, "parquet"),
            DataFrameFileType::Json => write!(f, "json"),
            DataFrameFileType::NDJson => write!(f, "ndjson"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::PdbBuilder;

    #[test]
    fn rounding() {
        assert_eq!(round_to(12.3456, 2), 12.35);
        assert_eq!(round_to(-30.24, 1), -30.2);
        assert_eq!(percent(1, 3), 100.0 / 3.0);
        assert_eq!(percent(5, 0), 0.0);
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_model(Path::new("/definitely/not/here.pdb")).unwrap_err();
        assert!(matches!(err, AnalysisError::NotFound(_)));
    }

    #[test]
    fn waters_are_removed_and_ligands_kept() {
        let structure = PdbBuilder::new()
            .atom("A", 1, "GLY", "CA", "C", [0.0, 0.0, 0.0])
            .hetatm("A", 101, "HOH", "O", "O", [5.0, 0.0, 0.0])
            .hetatm("A", 102, "SO4", "S", "S", [8.0, 0.0, 0.0])
            .build("1abc");

        let names: Vec<&str> = structure
            .pdb()
            .residues()
            .filter_map(|r| r.name())
            .collect();
        assert_eq!(names, vec!["GLY", "SO4"]);
    }

    #[test]
    fn only_first_model_is_kept() {
        let structure = PdbBuilder::new()
            .model(1)
            .atom("A", 1, "GLY", "CA", "C", [0.0, 0.0, 0.0])
            .end_model()
            .model(2)
            .atom("A", 1, "GLY", "CA", "C", [1.0, 0.0, 0.0])
            .end_model()
            .build("1abc");

        assert_eq!(structure.pdb().model_count(), 1);
        assert_eq!(structure.pdb().atom_count(), 1);
    }

    #[test]
    fn dataframe_export_replaces_extension() {
        let dir = tempfile::tempdir().unwrap();
        let mut df = df!("chain" => ["A", "B"], "sasa" => [1.0f64, 2.0]).unwrap();
        write_df_to_file(&mut df, &dir.path().join("out.txt"), DataFrameFileType::Csv).unwrap();

        let written = std::fs::read_to_string(dir.path().join("out.csv")).unwrap();
        assert!(written.starts_with("chain,sasa"));
    }
}
