//! RCSB PDB: coordinate downloads and entry metadata.

use super::http::{build_client, get_json, get_text};
use super::{is_pdb_id, EntryInfo, Staging, StructureSource};
use crate::error::{AnalysisError, Metric, Result};
use crate::settings::Settings;
use crate::structure::Structure;
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::{info, warn};

pub struct RcsbClient {
    client: Client,
    data_url: String,
    files_url: String,
    staging: Staging,
}

impl RcsbClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            client: build_client(settings.timeout)?,
            data_url: settings.rcsb_data_url.trim_end_matches('/').to_string(),
            files_url: settings.rcsb_files_url.trim_end_matches('/').to_string(),
            staging: Staging::new(&settings.staging_dir),
        })
    }

    pub fn entry(&self, pdb_id: &str) -> Result<Value> {
        get_json(&self.client, &format!("{}/core/entry/{pdb_id}", self.data_url))
    }

    pub fn polymer_entity(&self, pdb_id: &str, entity: usize) -> Result<Value> {
        get_json(
            &self.client,
            &format!("{}/core/polymer_entity/{pdb_id}/{entity}", self.data_url),
        )
    }

    pub fn polymer_residue_count(&self, pdb_id: &str) -> Result<usize> {
        parse_polymer_residue_count(&self.entry(pdb_id)?).ok_or_else(|| {
            AnalysisError::UpstreamUnavailable(format!("no polymer residue count for {pdb_id}"))
        })
    }

    /// Entry metadata; organism and sequence come from the first polymer entity.
    pub fn entry_info(&self, pdb_id: &str) -> Result<EntryInfo> {
        let entry = self.entry(pdb_id)?;
        let polymer = self
            .polymer_entity(pdb_id, 1)
            .inspect_err(|e| warn!("No polymer entity for {pdb_id}: {e}"))
            .ok();
        Ok(parse_entry_info(pdb_id, &entry, polymer.as_ref()))
    }

    fn download(&self, pdb_id: &str) -> Result<String> {
        let url = format!("{}/{}.pdb", self.files_url, pdb_id.to_uppercase());
        info!("Downloading {url}");
        get_text(&self.client, &url)
    }
}

impl StructureSource for RcsbClient {
    fn fetch(&self, pdb_id: &str) -> Result<Structure> {
        if !is_pdb_id(pdb_id) {
            return Err(AnalysisError::InvalidInput(format!(
                "'{pdb_id}' is not a PDB identifier"
            )));
        }
        let path = self
            .staging
            .stage(pdb_id, "pdb", || self.download(pdb_id))?;
        Structure::from_file(&path, Some(pdb_id))
    }
}

fn text_at(value: &Value, pointer: &str) -> Metric<String> {
    Metric(
        value
            .pointer(pointer)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
    )
}

pub fn parse_polymer_residue_count(entry: &Value) -> Option<usize> {
    entry
        .pointer("/rcsb_entry_info/deposited_polymer_monomer_count")
        .and_then(Value::as_u64)
        .map(|n| n as usize)
}

pub fn parse_entry_info(pdb_id: &str, entry: &Value, polymer: Option<&Value>) -> EntryInfo {
    let sequence = polymer
        .map(|p| text_at(p, "/entity_poly/pdbx_seq_one_letter_code_can"))
        .unwrap_or_default();
    // Source organism first, expression host otherwise
    let organism = polymer
        .map(|p| {
            let source = text_at(p, "/rcsb_entity_source_organism/0/scientific_name");
            if source.value().is_some() {
                source
            } else {
                text_at(p, "/rcsb_entity_host_organism/0/scientific_name")
            }
        })
        .unwrap_or_default();
    let length = sequence.value().map(|s| s.chars().count()).unwrap_or(0);

    EntryInfo {
        pdb_id: pdb_id.to_uppercase(),
        title: text_at(entry, "/struct/title"),
        resolution: Metric(
            entry
                .pointer("/rcsb_entry_info/resolution_combined/0")
                .and_then(Value::as_f64),
        ),
        method: text_at(entry, "/exptl/0/method"),
        organism,
        release_date: text_at(entry, "/rcsb_accession_info/deposit_date"),
        sequence,
        length,
    }
}
