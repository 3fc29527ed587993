//! External collaborators: coordinate files, annotations, reference sequences
//! and gene-to-structure resolution.
//!
//! Each concern is a trait so the analysis layer can be driven by the web
//! clients below or by in-memory fakes.

pub mod http;
pub mod pdbe;
pub mod rcsb;
pub mod staging;
pub mod uniprot;

pub use pdbe::PdbeClient;
pub use rcsb::RcsbClient;
pub use staging::Staging;
pub use uniprot::UniprotClient;

use crate::error::{Metric, Result};
use crate::settings::Settings;
use crate::structure::Structure;
use serde::Serialize;

/// Four alphanumeric characters, e.g. `1UBQ`.
pub fn is_pdb_id(term: &str) -> bool {
    term.len() == 4 && term.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Helix and strand residue ranges (inclusive, author numbering) of one chain.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ChainSegments {
    pub chain: String,
    pub helices: Vec<(isize, isize)>,
    pub strands: Vec<(isize, isize)>,
}

impl ChainSegments {
    pub fn helix_residues(&self) -> usize {
        span_total(&self.helices)
    }

    pub fn strand_residues(&self) -> usize {
        span_total(&self.strands)
    }
}

fn span_total(spans: &[(isize, isize)]) -> usize {
    spans
        .iter()
        .filter(|(start, end)| end >= start)
        .map(|(start, end)| (end - start + 1) as usize)
        .sum()
}

/// Entry-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryInfo {
    pub pdb_id: String,
    pub title: Metric<String>,
    pub resolution: Metric<f64>,
    pub method: Metric<String>,
    pub organism: Metric<String>,
    pub release_date: Metric<String>,
    pub sequence: Metric<String>,
    pub length: usize,
}

/// A structure mapped to a reference protein.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructureHit {
    pub pdb_id: String,
    pub chain_id: Option<String>,
    pub resolution: Option<f64>,
}

/// Sort by ascending resolution; entries without one go last.
pub fn sort_by_resolution(hits: &mut [StructureHit]) {
    hits.sort_by(|a, b| match (a.resolution, b.resolution) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

pub trait StructureSource: Send + Sync {
    /// Parsed first model of the entry.
    fn fetch(&self, pdb_id: &str) -> Result<Structure>;
}

pub trait AnnotationService: Send + Sync {
    /// Per-chain helix and strand ranges; empty if the entry has no annotation.
    fn secondary_structure(&self, pdb_id: &str) -> Result<Vec<ChainSegments>>;

    /// Number of deposited polymer residues.
    fn polymer_residue_count(&self, pdb_id: &str) -> Result<usize>;

    fn entry_info(&self, pdb_id: &str) -> Result<EntryInfo>;
}

pub trait ReferenceSequenceService: Send + Sync {
    /// Canonical amino-acid sequence of an accession.
    fn canonical_sequence(&self, accession: &str) -> Result<String>;

    /// First reference accession mapped to the entry.
    fn accession_for_structure(&self, pdb_id: &str) -> Result<String>;
}

pub trait IdentifierResolver: Send + Sync {
    /// Structures of the gene product, best resolution first.
    fn structures_for_gene(&self, gene: &str, species: &str) -> Result<Vec<StructureHit>>;
}

/// The public web services bundled behind the collaborator traits.
pub struct WebServices {
    pub rcsb: RcsbClient,
    pub pdbe: PdbeClient,
    pub uniprot: UniprotClient,
}

impl WebServices {
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            rcsb: RcsbClient::new(settings)?,
            pdbe: PdbeClient::new(settings)?,
            uniprot: UniprotClient::new(settings)?,
        })
    }
}

impl AnnotationService for WebServices {
    fn secondary_structure(&self, pdb_id: &str) -> Result<Vec<ChainSegments>> {
        self.pdbe.secondary_structure(pdb_id)
    }

    fn polymer_residue_count(&self, pdb_id: &str) -> Result<usize> {
        self.rcsb.polymer_residue_count(pdb_id)
    }

    fn entry_info(&self, pdb_id: &str) -> Result<EntryInfo> {
        self.rcsb.entry_info(pdb_id)
    }
}

impl ReferenceSequenceService for WebServices {
    fn canonical_sequence(&self, accession: &str) -> Result<String> {
        self.uniprot.canonical_sequence(accession)
    }

    fn accession_for_structure(&self, pdb_id: &str) -> Result<String> {
        self.pdbe.first_accession(pdb_id)
    }
}

impl IdentifierResolver for WebServices {
    fn structures_for_gene(&self, gene: &str, species: &str) -> Result<Vec<StructureHit>> {
        let accession = self.uniprot.accession_for_gene(gene, species)?;
        self.pdbe.best_structures(&accession)
    }
}

impl StructureSource for WebServices {
    fn fetch(&self, pdb_id: &str) -> Result<Structure> {
        self.rcsb.fetch(pdb_id)
    }
}
