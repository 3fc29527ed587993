//! UniProt REST API: canonical sequences and gene lookups.

use super::http::{build_client, get_json, get_text, with_query};
use crate::error::{AnalysisError, Result};
use crate::settings::Settings;
use reqwest::blocking::Client;
use serde_json::Value;

pub struct UniprotClient {
    client: Client,
    api_url: String,
}

impl UniprotClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            client: build_client(settings.timeout)?,
            api_url: settings.uniprot_api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn canonical_sequence(&self, accession: &str) -> Result<String> {
        let fasta = get_text(&self.client, &format!("{}/{accession}.fasta", self.api_url))?;
        let sequence = parse_fasta(&fasta);
        if sequence.is_empty() {
            return Err(AnalysisError::NotFound(format!("sequence of {accession}")));
        }
        Ok(sequence)
    }

    /// Primary accession of the first reviewed-or-not hit for the gene.
    pub fn accession_for_gene(&self, gene: &str, species: &str) -> Result<String> {
        let url = with_query(
            &format!("{}/search", self.api_url),
            &[
                ("query", &format!("gene:{gene} AND organism_name:{species}")),
                ("format", "json"),
                ("size", "1"),
            ],
        )?;
        let json = get_json(&self.client, &url)?;
        parse_search_accession(&json)
            .ok_or_else(|| AnalysisError::NotFound(format!("UniProt entry for {gene} ({species})")))
    }
}

/// Concatenate the sequence lines of the first FASTA record.
pub fn parse_fasta(fasta: &str) -> String {
    fasta
        .lines()
        .skip_while(|l| !l.starts_with('>'))
        .skip(1)
        .take_while(|l| !l.starts_with('>'))
        .map(str::trim)
        .collect()
}

pub fn parse_search_accession(json: &Value) -> Option<String> {
    json.pointer("/results/0/primaryAccession")
        .and_then(Value::as_str)
        .map(str::to_string)
}
