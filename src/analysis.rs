//! The analysis service: wires the collaborators into the user-facing operations.
//!
//! An [`Analyzer`] holds no per-request state. Every operation fetches a fresh
//! structure, derives what it needs and returns a serializable record in which
//! each field fails on its own.

use crate::alignment::{align_chains, AlignmentOutcome};
use crate::composition::{
    hydrophobicity_per_chain, sequence_composition, HydrophobicityStats, SequenceComposition,
};
use crate::error::{AnalysisError, Outcome, Result};
use crate::interactions::{
    find_disulfide_bonds, find_salt_bridges, DisulfideReport, SaltBridgeReport,
};
use crate::mutation::{
    score_mutation, structural_context, MutationImpact, MutationSpec, StructuralContext,
};
use crate::remote::{
    is_pdb_id, AnnotationService, EntryInfo, IdentifierResolver, ReferenceSequenceService,
    StructureHit, StructureSource, WebServices,
};
use crate::sasa::sasa_per_chain;
use crate::secondary::{
    assign, summarize_hydrogen_bonds, summarize_secondary_structure, HydrogenBondSummary,
    LocalHydrogenBonds, LocalSecondaryStructure, RemoteHydrogenBonds, RemoteSecondaryStructure,
    SecondaryStructureSummary, Strategy,
};
use crate::settings::Settings;
use crate::structure::Structure;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_MAX_STRUCTURES: usize = 5;
pub const DEFAULT_SPECIES: &str = "human";

/// The external services an [`Analyzer`] depends on.
#[derive(Clone)]
pub struct Collaborators {
    pub structures: Arc<dyn StructureSource>,
    pub annotations: Arc<dyn AnnotationService>,
    pub sequences: Arc<dyn ReferenceSequenceService>,
    pub resolver: Arc<dyn IdentifierResolver>,
}

impl Collaborators {
    /// RCSB, PDBe and UniProt behind one set of HTTP clients.
    pub fn web(settings: &Settings) -> Result<Self> {
        let web = Arc::new(WebServices::new(settings)?);
        Ok(Self {
            structures: web.clone(),
            annotations: web.clone(),
            sequences: web.clone(),
            resolver: web,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BasicAnalysis {
    pub pdb_id: String,
    pub num_chains: usize,
    pub num_residues: usize,
    pub num_atoms: usize,
    pub secondary_structure: SecondaryStructureSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdvancedAnalysis {
    pub pdb_id: String,
    pub disulfide_bonds: Outcome<DisulfideReport>,
    pub salt_bridges: Outcome<SaltBridgeReport>,
    pub hydrogen_bonds: HydrogenBondSummary,
    pub sasa_per_chain: Outcome<BTreeMap<String, f64>>,
    pub hydrophobicity_per_chain: Outcome<BTreeMap<String, HydrophobicityStats>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    PdbId,
    Gene,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuickAnalysis {
    #[serde(rename = "type")]
    pub input_type: InputType,
    pub gene_name: Option<String>,
    pub pdb_ids: Vec<String>,
    pub info: Option<Outcome<EntryInfo>>,
    pub analysis: Option<Outcome<BasicAnalysis>>,
}

pub struct Analyzer {
    services: Collaborators,
    settings: Settings,
}

impl Analyzer {
    pub fn new(services: Collaborators, settings: Settings) -> Self {
        Self { services, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn fetch(&self, pdb_id: &str) -> Result<Structure> {
        self.services.structures.fetch(pdb_id)
    }

    fn secondary_strategies(&self) -> Vec<Box<dyn Strategy<SecondaryStructureSummary> + '_>> {
        let mut strategies: Vec<Box<dyn Strategy<SecondaryStructureSummary> + '_>> = Vec::new();
        if self.settings.use_remote_annotation {
            strategies.push(Box::new(RemoteSecondaryStructure {
                service: self.services.annotations.as_ref(),
            }));
        }
        strategies.push(Box::new(LocalSecondaryStructure {
            energy_cutoff: self.settings.hbond_energy_cutoff,
        }));
        strategies
    }

    fn hbond_strategies(&self) -> Vec<Box<dyn Strategy<HydrogenBondSummary> + '_>> {
        let mut strategies: Vec<Box<dyn Strategy<HydrogenBondSummary> + '_>> = Vec::new();
        if self.settings.use_remote_annotation {
            strategies.push(Box::new(RemoteHydrogenBonds {
                service: self.services.annotations.as_ref(),
            }));
        }
        strategies.push(Box::new(LocalHydrogenBonds {
            energy_cutoff: self.settings.hbond_energy_cutoff,
        }));
        strategies
    }

    /// Entry metadata from the annotation service.
    pub fn info(&self, pdb_id: &str) -> Result<EntryInfo> {
        self.services.annotations.entry_info(pdb_id)
    }

    pub fn analyze(&self, pdb_id: &str) -> Result<BasicAnalysis> {
        Ok(self.analyze_structure(&self.fetch(pdb_id)?))
    }

    /// Chain, residue and atom counts plus the secondary-structure summary.
    pub fn analyze_structure(&self, structure: &Structure) -> BasicAnalysis {
        let pdb = structure.pdb();
        BasicAnalysis {
            pdb_id: structure.id().to_string(),
            num_chains: pdb.chain_count(),
            num_residues: pdb.residue_count(),
            num_atoms: pdb.atom_count(),
            secondary_structure: summarize_secondary_structure(&self.secondary_strategies(), structure),
        }
    }

    pub fn advanced(&self, pdb_id: &str) -> Result<AdvancedAnalysis> {
        Ok(self.advanced_structure(&self.fetch(pdb_id)?))
    }

    pub fn advanced_structure(&self, structure: &Structure) -> AdvancedAnalysis {
        let disulfides = find_disulfide_bonds(structure, self.settings.disulfide_cutoff);
        let bridges = find_salt_bridges(structure, self.settings.salt_bridge_cutoff);
        let (hydrogen_bonds, sasa) = rayon::join(
            || summarize_hydrogen_bonds(&self.hbond_strategies(), structure),
            || sasa_per_chain(structure, &self.settings),
        );
        if let Outcome::Failed { error, .. } = &sasa {
            warn!("SASA of {} degraded: {error}", structure.id());
        }

        AdvancedAnalysis {
            pdb_id: structure.id().to_string(),
            disulfide_bonds: Outcome::Ok(DisulfideReport::from(disulfides.as_slice())),
            salt_bridges: Outcome::Ok(SaltBridgeReport::from(bridges.as_slice())),
            hydrogen_bonds,
            sasa_per_chain: sasa,
            hydrophobicity_per_chain: Outcome::Ok(hydrophobicity_per_chain(structure)),
        }
    }

    /// Score a mutation, checking it against the structure when an identifier is given.
    ///
    /// Malformed mutations fail outright; a structure that cannot be fetched only
    /// degrades the structural context.
    pub fn mutation(&self, pdb_id: Option<&str>, mutation: &str) -> Result<MutationImpact> {
        let spec: MutationSpec = mutation.parse()?;
        let context: Outcome<StructuralContext> = match pdb_id {
            Some(id) => self
                .fetch(id)
                .map(|structure| self.context_for(&structure, &spec))
                .inspect_err(|e| warn!("No structural context for {spec}: {e}"))
                .into(),
            None => Outcome::from(Err::<StructuralContext, _>(AnalysisError::NotFound(
                "no structure supplied".to_string(),
            ))),
        };
        Ok(score_mutation(&spec, pdb_id, context))
    }

    pub fn mutation_in_structure(&self, structure: &Structure, mutation: &str) -> Result<MutationImpact> {
        let spec: MutationSpec = mutation.parse()?;
        let context = Outcome::Ok(self.context_for(structure, &spec));
        Ok(score_mutation(&spec, Some(structure.id()), context))
    }

    fn context_for(&self, structure: &Structure, spec: &MutationSpec) -> StructuralContext {
        let assignment = assign(structure, self.settings.hbond_energy_cutoff)
            .inspect_err(|e| warn!("Secondary structure unavailable for {}: {e}", structure.id()))
            .ok();
        structural_context(structure, spec, assignment.as_ref())
    }

    pub fn composition(&self, pdb_id: &str) -> Result<SequenceComposition> {
        Ok(sequence_composition(&self.fetch(pdb_id)?))
    }

    /// Align each chain against the reference sequence of `accession`, or of the
    /// first accession mapped to the entry when none is given.
    pub fn align(&self, pdb_id: &str, accession: Option<&str>) -> Result<AlignmentOutcome> {
        let structure = self.fetch(pdb_id)?;
        let pdb_sequences = structure.chain_sequences();
        if pdb_sequences.is_empty() {
            return Err(AnalysisError::NotFound(format!(
                "no amino-acid chains in {pdb_id}"
            )));
        }

        let reference = accession
            .map(|acc| Ok(acc.to_string()))
            .unwrap_or_else(|| self.services.sequences.accession_for_structure(pdb_id))
            .and_then(|acc| {
                let seq = self.services.sequences.canonical_sequence(&acc)?;
                Ok((acc, seq))
            });

        match reference {
            Ok((acc, seq)) => {
                debug!("Aligning {pdb_id} against {acc} ({} residues)", seq.len());
                Ok(AlignmentOutcome::Report(align_chains(
                    pdb_id,
                    &acc,
                    &seq,
                    &pdb_sequences,
                )?))
            }
            Err(e) => {
                warn!("No reference sequence for {pdb_id}: {e}");
                Ok(AlignmentOutcome::Failed {
                    error: e.to_string(),
                    kind: e.kind(),
                    pdb_sequences,
                })
            }
        }
    }

    /// Structures of a gene product, best resolution first. Lookup failures give an empty list.
    pub fn structures(&self, gene: &str, species: &str, max_structures: usize) -> Vec<StructureHit> {
        match self.services.resolver.structures_for_gene(gene, species) {
            Ok(mut hits) => {
                hits.truncate(max_structures);
                info!("Found {} structures for {gene}", hits.len());
                hits
            }
            Err(e) => {
                warn!("No structures for {gene} ({species}): {e}");
                vec![]
            }
        }
    }

    /// Treat a four-character alphanumeric term as a PDB identifier, anything
    /// else as a gene name whose best structure is analysed.
    pub fn quick(&self, term: &str) -> QuickAnalysis {
        let (input_type, gene_name, pdb_ids) = if is_pdb_id(term) {
            (InputType::PdbId, None, vec![term.to_uppercase()])
        } else {
            let ids = self
                .structures(term, DEFAULT_SPECIES, DEFAULT_MAX_STRUCTURES)
                .into_iter()
                .map(|hit| hit.pdb_id.to_uppercase())
                .collect();
            (InputType::Gene, Some(term.to_string()), ids)
        };

        let (info, analysis) = match pdb_ids.first() {
            Some(id) => (
                Some(self.info(id).into()),
                Some(self.analyze(id).into()),
            ),
            None => (None, None),
        };
        QuickAnalysis {
            input_type,
            gene_name,
            pdb_ids,
            info,
            analysis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, Metric};
    use crate::remote::ChainSegments;
    use crate::secondary::Source;
    use crate::test_utils::{ideal_backbone, peptide};

    /// In-memory stand-ins for the web services.
    struct Fake {
        structure: Structure,
        segments: Vec<ChainSegments>,
        residue_count: Result<usize>,
        accession: Option<String>,
        hits: Vec<StructureHit>,
    }

    fn upstream(what: &str) -> AnalysisError {
        AnalysisError::UpstreamUnavailable(what.to_string())
    }

    impl StructureSource for Fake {
        fn fetch(&self, pdb_id: &str) -> Result<Structure> {
            if pdb_id.eq_ignore_ascii_case(self.structure.id()) {
                Ok(self.structure.clone())
            } else {
                Err(AnalysisError::NotFound(pdb_id.to_string()))
            }
        }
    }

    impl AnnotationService for Fake {
        fn secondary_structure(&self, _: &str) -> Result<Vec<ChainSegments>> {
            Ok(self.segments.clone())
        }

        fn polymer_residue_count(&self, _: &str) -> Result<usize> {
            match &self.residue_count {
                Ok(n) => Ok(*n),
                Err(_) => Err(upstream("timeout")),
            }
        }

        fn entry_info(&self, pdb_id: &str) -> Result<EntryInfo> {
            Ok(EntryInfo {
                pdb_id: pdb_id.to_uppercase(),
                title: "TEST HELIX".to_string().into(),
                resolution: Metric::na(),
                method: "SOLUTION NMR".to_string().into(),
                organism: Metric::na(),
                release_date: Metric::na(),
                sequence: Metric::na(),
                length: 0,
            })
        }
    }

    impl ReferenceSequenceService for Fake {
        fn canonical_sequence(&self, _: &str) -> Result<String> {
            Ok("MAAAAAAAAAAAAAAAAG".to_string())
        }

        fn accession_for_structure(&self, pdb_id: &str) -> Result<String> {
            self.accession
                .clone()
                .ok_or_else(|| AnalysisError::NotFound(format!("UniProt mapping for {pdb_id}")))
        }
    }

    impl IdentifierResolver for Fake {
        fn structures_for_gene(&self, gene: &str, _: &str) -> Result<Vec<StructureHit>> {
            if gene == "HLX1" {
                Ok(self.hits.clone())
            } else {
                Err(AnalysisError::NotFound(gene.to_string()))
            }
        }
    }

    fn fake() -> Fake {
        Fake {
            structure: peptide("A", 1, &ideal_backbone(16, -57.0, -47.0)).build("1hlx"),
            segments: vec![],
            residue_count: Ok(16),
            accession: None,
            hits: (0..7)
                .map(|i| StructureHit {
                    pdb_id: if i == 0 { "1hlx".to_string() } else { format!("{i}xyz") },
                    chain_id: Some("A".to_string()),
                    resolution: Some(1.0 + i as f64),
                })
                .collect(),
        }
    }

    fn analyzer(fake: Fake, settings: Settings) -> Analyzer {
        let fake = Arc::new(fake);
        Analyzer::new(
            Collaborators {
                structures: fake.clone(),
                annotations: fake.clone(),
                sequences: fake.clone(),
                resolver: fake,
            },
            settings,
        )
    }

    #[test]
    fn empty_remote_annotation_falls_back_to_local() {
        let analysis = analyzer(fake(), Settings::default()).analyze("1HLX").unwrap();
        assert_eq!(analysis.num_chains, 1);
        assert_eq!(analysis.num_residues, 16);
        assert_eq!(analysis.num_atoms, 64);
        assert_eq!(analysis.secondary_structure.source, Source::LocalComputed);
    }

    #[test]
    fn remote_annotation_wins() {
        let mut services = fake();
        services.segments = vec![ChainSegments {
            chain: "A".into(),
            helices: vec![(2, 15)],
            strands: vec![],
        }];
        let analysis = analyzer(services, Settings::default()).analyze("1hlx").unwrap();
        let ss = analysis.secondary_structure;
        assert_eq!(ss.source, Source::RemoteEstimate);
        assert_eq!(ss.helix.value(), Some(&14));
        assert_eq!(ss.coil.value(), Some(&2));
        assert_eq!(ss.helix_pct.value(), Some(&87.5));
    }

    #[test]
    fn offline_uses_local_estimators() {
        let mut services = fake();
        services.segments = vec![ChainSegments {
            chain: "A".into(),
            helices: vec![(2, 15)],
            strands: vec![],
        }];
        let settings = Settings {
            use_remote_annotation: false,
            ..Settings::default()
        };
        let analyzer = analyzer(services, settings);
        let analysis = analyzer.analyze("1hlx").unwrap();
        assert_eq!(analysis.secondary_structure.source, Source::LocalComputed);

        let advanced = analyzer.advanced("1hlx").unwrap();
        assert_eq!(advanced.hydrogen_bonds.source, Source::LocalComputed);
        assert!(!advanced.hydrogen_bonds.estimated);
    }

    #[test]
    fn advanced_fields_are_all_present() {
        let advanced = analyzer(fake(), Settings::default()).advanced("1hlx").unwrap();
        assert_eq!(advanced.hydrogen_bonds.source, Source::RemoteEstimate);
        assert_eq!(advanced.hydrogen_bonds.backbone_hbonds.value(), Some(&13));
        assert!(advanced.sasa_per_chain.is_ok());

        let json = serde_json::to_value(&advanced).unwrap();
        for key in [
            "disulfide_bonds",
            "salt_bridges",
            "hydrogen_bonds",
            "sasa_per_chain",
            "hydrophobicity_per_chain",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["disulfide_bonds"]["count"], 0);
        assert_eq!(json["hydrophobicity_per_chain"]["A"]["hydrophobic_count"], 16);
    }

    #[test]
    fn failed_residue_count_falls_back_for_hbonds() {
        let mut services = fake();
        services.residue_count = Err(upstream("timeout"));
        let advanced = analyzer(services, Settings::default()).advanced("1hlx").unwrap();
        assert_eq!(advanced.hydrogen_bonds.source, Source::LocalComputed);
    }

    #[test]
    fn mutation_in_helix() {
        let analyzer = analyzer(fake(), Settings::default());
        let impact = analyzer.mutation(Some("1hlx"), "A:A8E").unwrap();
        let ctx = impact.structural_context.ok().unwrap();
        assert!(ctx.matches_wt);
        assert_eq!(
            ctx.secondary_structure,
            Some(crate::secondary::SecondaryClass::AlphaHelix)
        );
        // charge, moderate volume, hydrophobicity and polarity flips, helix
        assert_eq!(impact.impact_assessment.score, 3 + 1 + 2 + 1 + 1);
    }

    #[test]
    fn mutation_without_structure_still_scores() {
        let analyzer = analyzer(fake(), Settings::default());
        let impact = analyzer.mutation(Some("9zzz"), "A:K33E").unwrap();
        assert_eq!(impact.impact_assessment.score, 4);
        let json = serde_json::to_value(&impact).unwrap();
        assert_eq!(json["structural_context"]["kind"], "not_found");

        assert!(analyzer.mutation(None, "K33E").is_err());
    }

    #[test]
    fn unresolved_accession_keeps_sequences() {
        let analyzer = analyzer(fake(), Settings::default());
        match analyzer.align("1hlx", None).unwrap() {
            AlignmentOutcome::Failed {
                kind, pdb_sequences, ..
            } => {
                assert_eq!(kind, ErrorKind::NotFound);
                assert_eq!(pdb_sequences["A"], "A".repeat(16));
            }
            AlignmentOutcome::Report(_) => panic!("expected a failure"),
        }

        match analyzer.align("1hlx", Some("P00001")).unwrap() {
            AlignmentOutcome::Report(report) => {
                let chain = &report.chain_alignments["A"];
                assert_eq!(report.uniprot_length, 18);
                assert_eq!(chain.pdb_length, 16);
                assert_eq!(chain.missing_regions.len(), 2);
            }
            AlignmentOutcome::Failed { error, .. } => panic!("{error}"),
        }
    }

    #[test]
    fn structure_lookup() {
        let analyzer = analyzer(fake(), Settings::default());
        assert_eq!(analyzer.structures("HLX1", "human", 5).len(), 5);
        assert!(analyzer.structures("NOPE", "human", 5).is_empty());
    }

    #[test]
    fn quick_analysis_detects_input_type() {
        let analyzer = analyzer(fake(), Settings::default());

        let by_id = analyzer.quick("1hlx");
        assert_eq!(by_id.input_type, InputType::PdbId);
        assert!(by_id.analysis.unwrap().is_ok());

        let by_gene = analyzer.quick("HLX1");
        assert_eq!(by_gene.input_type, InputType::Gene);
        assert_eq!(by_gene.pdb_ids.len(), 5);
        assert_eq!(by_gene.pdb_ids[0], "1HLX");
        assert!(by_gene.info.unwrap().is_ok());

        let unknown = analyzer.quick("NOPE1");
        assert!(unknown.pdb_ids.is_empty());
        assert!(unknown.analysis.is_none());
    }
}
