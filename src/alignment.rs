//! Global alignment of observed chain sequences against a reference sequence.

use crate::error::{AnalysisError, ErrorKind, Result};
use crate::utils::{percent, round_to};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Chains shorter than this are not aligned
pub const MIN_CHAIN_LENGTH: usize = 10;

const GAP: u8 = b'-';

/// Substitution and affine gap scores. A gap of length `n` costs
/// `gap_open + (n - 1) * gap_extend`; end gaps are not free.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentScoring {
    pub match_score: f64,
    pub mismatch_score: f64,
    pub gap_open: f64,
    pub gap_extend: f64,
}

impl Default for AlignmentScoring {
    fn default() -> Self {
        Self {
            match_score: 2.0,
            mismatch_score: -1.0,
            gap_open: -2.0,
            gap_extend: -0.5,
        }
    }
}

impl AlignmentScoring {
    fn pair(&self, a: u8, b: u8) -> f64 {
        if a.eq_ignore_ascii_case(&b) {
            self.match_score
        } else {
            self.mismatch_score
        }
    }
}

/// Gapped reference and observed rows of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    pub score: f64,
    pub reference: Vec<u8>,
    pub observed: Vec<u8>,
}

/// A run of reference residues with no observed counterpart, 1-based and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MissingRegion {
    pub start: usize,
    pub end: usize,
    pub length: usize,
}

impl Alignment {
    pub fn matches(&self) -> usize {
        self.reference
            .iter()
            .zip(self.observed.iter())
            .filter(|(r, o)| **r != GAP && r.eq_ignore_ascii_case(o))
            .count()
    }

    /// Reference intervals aligned to gaps, including leading and trailing ones.
    pub fn missing_regions(&self) -> Vec<MissingRegion> {
        let mut regions = Vec::new();
        let mut ref_pos = 0;
        let mut open: Option<usize> = None;
        for (r, o) in self.reference.iter().zip(self.observed.iter()) {
            if *r == GAP {
                continue;
            }
            ref_pos += 1;
            match (*o == GAP, open) {
                (true, None) => open = Some(ref_pos),
                (false, Some(start)) => {
                    regions.push(MissingRegion {
                        start,
                        end: ref_pos - 1,
                        length: ref_pos - start,
                    });
                    open = None;
                }
                _ => {}
            }
        }
        if let Some(start) = open {
            regions.push(MissingRegion {
                start,
                end: ref_pos,
                length: ref_pos - start + 1,
            });
        }
        regions
    }
}

// Traceback byte: low two bits say where the best score of a cell came from,
// the flag bits whether the gap state at that cell was opened rather than extended.
const FROM_DIAG: u8 = 0;
const FROM_INSERT: u8 = 1;
const FROM_DELETE: u8 = 2;
const SOURCE_MASK: u8 = 3;
const INSERT_OPENED: u8 = 4;
const DELETE_OPENED: u8 = 8;

/// Gotoh global alignment.
///
/// Scores are kept for two rows at a time; memory is dominated by the
/// one-byte-per-cell traceback.
///
/// Rows walk the reference, columns the observed sequence. A deletion consumes
/// a reference residue (missing from the observed chain), an insertion consumes
/// an observed residue absent from the reference.
pub fn global_align(reference: &str, observed: &str, scoring: &AlignmentScoring) -> Result<Alignment> {
    let (a, b) = (reference.as_bytes(), observed.as_bytes());
    let (m, n) = (a.len(), b.len());
    if m == 0 || n == 0 {
        return Err(AnalysisError::InvalidInput(
            "cannot align an empty sequence".to_string(),
        ));
    }

    // Score rows are rolled; only the traceback keeps the full matrix
    let cols = n + 1;
    let idx = |i: usize, j: usize| i * cols + j;
    let mut trace = vec![0u8; (m + 1) * cols];
    let mut prev_h = vec![f64::NEG_INFINITY; cols];
    let mut prev_del = vec![f64::NEG_INFINITY; cols];
    let mut cur_h = vec![f64::NEG_INFINITY; cols];
    let mut cur_ins = vec![f64::NEG_INFINITY; cols];
    let mut cur_del = vec![f64::NEG_INFINITY; cols];

    prev_h[0] = 0.0;
    for j in 1..=n {
        prev_h[j] = scoring.gap_open + (j - 1) as f64 * scoring.gap_extend;
        trace[idx(0, j)] = FROM_INSERT | if j == 1 { INSERT_OPENED } else { 0 };
    }

    for i in 1..=m {
        cur_del[0] = scoring.gap_open + (i - 1) as f64 * scoring.gap_extend;
        cur_h[0] = cur_del[0];
        cur_ins[0] = f64::NEG_INFINITY;
        trace[idx(i, 0)] = FROM_DELETE | if i == 1 { DELETE_OPENED } else { 0 };

        for j in 1..=n {
            let mut tb = 0;

            let open = cur_h[j - 1] + scoring.gap_open;
            let extend = cur_ins[j - 1] + scoring.gap_extend;
            if open >= extend {
                tb |= INSERT_OPENED;
            }
            cur_ins[j] = open.max(extend);

            let open = prev_h[j] + scoring.gap_open;
            let extend = prev_del[j] + scoring.gap_extend;
            if open >= extend {
                tb |= DELETE_OPENED;
            }
            cur_del[j] = open.max(extend);

            let diag = prev_h[j - 1] + scoring.pair(a[i - 1], b[j - 1]);
            let (best, source) = if diag >= cur_ins[j] && diag >= cur_del[j] {
                (diag, FROM_DIAG)
            } else if cur_ins[j] >= cur_del[j] {
                (cur_ins[j], FROM_INSERT)
            } else {
                (cur_del[j], FROM_DELETE)
            };
            cur_h[j] = best;
            trace[idx(i, j)] = tb | source;
        }
        std::mem::swap(&mut prev_h, &mut cur_h);
        std::mem::swap(&mut prev_del, &mut cur_del);
    }
    let score = prev_h[n];

    let mut ref_row = Vec::with_capacity(m + n);
    let mut obs_row = Vec::with_capacity(m + n);
    let (mut i, mut j) = (m, n);
    let mut state = FROM_DIAG;
    while i > 0 || j > 0 {
        let tb = trace[idx(i, j)];
        if state == FROM_DIAG {
            state = if i > 0 && j > 0 { tb & SOURCE_MASK } else if i > 0 { FROM_DELETE } else { FROM_INSERT };
        }
        match state {
            FROM_DIAG => {
                ref_row.push(a[i - 1]);
                obs_row.push(b[j - 1]);
                i -= 1;
                j -= 1;
            }
            FROM_INSERT => {
                ref_row.push(GAP);
                obs_row.push(b[j - 1]);
                j -= 1;
                if tb & INSERT_OPENED != 0 {
                    state = FROM_DIAG;
                }
            }
            _ => {
                ref_row.push(a[i - 1]);
                obs_row.push(GAP);
                i -= 1;
                if tb & DELETE_OPENED != 0 {
                    state = FROM_DIAG;
                }
            }
        }
    }
    ref_row.reverse();
    obs_row.reverse();

    Ok(Alignment {
        score,
        reference: ref_row,
        observed: obs_row,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainAlignment {
    pub pdb_length: usize,
    /// Identical positions over the reference length
    pub identity_percent: f64,
    /// Observed length over the reference length
    pub coverage_percent: f64,
    pub missing_regions: Vec<MissingRegion>,
    pub alignment_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentReport {
    pub pdb_id: String,
    pub uniprot_id: String,
    pub uniprot_length: usize,
    pub chain_alignments: BTreeMap<String, ChainAlignment>,
}

/// Alignment result, or the reason it could not be computed together with
/// the observed sequences.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AlignmentOutcome {
    Report(AlignmentReport),
    Failed {
        error: String,
        kind: ErrorKind,
        pdb_sequences: BTreeMap<String, String>,
    },
}

pub fn align_chain(reference: &str, observed: &str, scoring: &AlignmentScoring) -> Result<ChainAlignment> {
    let alignment = global_align(reference, observed, scoring)?;
    let ref_len = reference.len();
    Ok(ChainAlignment {
        pdb_length: observed.len(),
        identity_percent: round_to(percent(alignment.matches(), ref_len), 2),
        coverage_percent: round_to(percent(observed.len(), ref_len), 2),
        missing_regions: alignment.missing_regions(),
        alignment_score: alignment.score,
    })
}

/// Align every chain of at least [`MIN_CHAIN_LENGTH`] residues against the reference.
pub fn align_chains(
    pdb_id: &str,
    accession: &str,
    reference: &str,
    chains: &BTreeMap<String, String>,
) -> Result<AlignmentReport> {
    let scoring = AlignmentScoring::default();
    let chain_alignments = chains
        .par_iter()
        .filter(|(chain, seq)| {
            let keep = seq.len() >= MIN_CHAIN_LENGTH;
            if !keep {
                debug!("Skipping chain {chain} of {pdb_id}: {} residues", seq.len());
            }
            keep
        })
        .map(|(chain, seq)| Ok((chain.clone(), align_chain(reference, seq, &scoring)?)))
        .collect::<Result<BTreeMap<_, _>>>()?;

    Ok(AlignmentReport {
        pdb_id: pdb_id.to_uppercase(),
        uniprot_id: accession.to_string(),
        uniprot_length: reference.len(),
        chain_alignments,
    })
}
