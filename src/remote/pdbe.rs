//! PDBe REST API: secondary-structure annotation and UniProt mappings.

use super::http::{build_client, get_json};
use super::{sort_by_resolution, ChainSegments, StructureHit};
use crate::error::{AnalysisError, Result};
use crate::settings::Settings;
use reqwest::blocking::Client;
use serde_json::Value;

pub struct PdbeClient {
    client: Client,
    api_url: String,
}

impl PdbeClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            client: build_client(settings.timeout)?,
            api_url: settings.pdbe_api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn secondary_structure(&self, pdb_id: &str) -> Result<Vec<ChainSegments>> {
        let id = pdb_id.to_lowercase();
        let json = get_json(
            &self.client,
            &format!("{}/pdb/entry/secondary_structure/{id}", self.api_url),
        )?;
        Ok(parse_secondary_structure(&id, &json))
    }

    pub fn first_accession(&self, pdb_id: &str) -> Result<String> {
        let id = pdb_id.to_lowercase();
        let json = get_json(&self.client, &format!("{}/mappings/uniprot/{id}", self.api_url))?;
        parse_uniprot_accessions(&id, &json)
            .into_iter()
            .next()
            .ok_or_else(|| AnalysisError::NotFound(format!("UniProt mapping for {pdb_id}")))
    }

    pub fn best_structures(&self, accession: &str) -> Result<Vec<StructureHit>> {
        let json = get_json(
            &self.client,
            &format!("{}/mappings/best_structures/{accession}", self.api_url),
        )?;
        Ok(parse_best_structures(accession, &json))
    }
}

fn residue_number(segment: &Value, end: &str) -> Option<isize> {
    segment
        .get(end)
        .and_then(|e| e.get("author_residue_number").or_else(|| e.get("residue_number")))
        .and_then(Value::as_i64)
        .map(|n| n as isize)
}

fn ranges(segments: Option<&Value>) -> Vec<(isize, isize)> {
    segments
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(|s| Some((residue_number(s, "start")?, residue_number(s, "end")?)))
                .collect()
        })
        .unwrap_or_default()
}

/// `{id: {molecules: [{chains: [{chain_id, secondary_structure: {helices, strands}}]}]}}`
pub fn parse_secondary_structure(pdb_id: &str, json: &Value) -> Vec<ChainSegments> {
    let molecules = json
        .get(pdb_id)
        .and_then(|entry| entry.get("molecules"))
        .and_then(Value::as_array);
    let Some(molecules) = molecules else {
        return vec![];
    };

    molecules
        .iter()
        .filter_map(|m| m.get("chains").and_then(Value::as_array))
        .flatten()
        .map(|chain| {
            let ss = chain.get("secondary_structure");
            ChainSegments {
                chain: chain
                    .get("chain_id")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
                helices: ranges(ss.and_then(|s| s.get("helices"))),
                strands: ranges(ss.and_then(|s| s.get("strands"))),
            }
        })
        .filter(|c| !c.helices.is_empty() || !c.strands.is_empty())
        .collect()
}

/// `{id: {UniProt: {accession: {...}}}}`
pub fn parse_uniprot_accessions(pdb_id: &str, json: &Value) -> Vec<String> {
    json.get(pdb_id)
        .and_then(|entry| entry.get("UniProt"))
        .and_then(Value::as_object)
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default()
}

/// `{accession: [{pdb_id, chain_id, resolution}]}`, sorted by resolution.
pub fn parse_best_structures(accession: &str, json: &Value) -> Vec<StructureHit> {
    let mut hits: Vec<StructureHit> = json
        .get(accession)
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(|s| {
                    Some(StructureHit {
                        pdb_id: s.get("pdb_id")?.as_str()?.to_string(),
                        chain_id: s.get("chain_id").and_then(Value::as_str).map(str::to_string),
                        resolution: s.get("resolution").and_then(Value::as_f64),
                    })
                })
                .collect()
        })
        .unwrap_or_default();
    sort_by_resolution(&mut hits);
    hits
}
