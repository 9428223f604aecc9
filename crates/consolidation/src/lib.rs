//! Combines glycosite abundances from every protein, condition, and replicate of a batch into occupancy reports

mod accession;
mod batch;
mod cohort;
pub mod errors;
mod fasta;
mod protein_names;
mod report;
mod tables;

// Standard Library Imports
use std::path::{Path, PathBuf};

// External Crate Imports
use glycochem::MonosaccharideDatabase;
use glycosite::{Abundances, AnalysisSettings};
use tracing::{debug, info};

// Public Re-exports
pub use accession::{MasterId, has_accession, master_id};
pub use batch::{load_batch, split_components};
pub use cohort::{CohortAggregator, Reports, filter_u_only, filter_with_u};
pub use errors::{ConsolidationError, Result};
pub use fasta::{load_fasta, parse_fasta};
pub use protein_names::{FastaNames, NameTable, ProteinAnnotator, ProteinNameCache, SearchResultNames};
pub use report::{ColumnKey, Label, ReportTable, RowKey};
pub use tables::{load_spectra, read_table};

// Constants ===========================================================================================================

const DECOY_PREFIX: &str = ">Reverse";
const CONTAMINANT_SUFFIX: &str = "(Common contaminant protein)";
const SCAN_NUMBER_REGEX: &str = r"scan=(\d+)";

struct IdentificationColumns;
impl IdentificationColumns {
    const ALL: [&str; 9] = [
        Self::PEPTIDE,
        Self::GLYCANS,
        Self::START,
        Self::SCAN_TIME,
        Self::CHARGE,
        Self::SCORE,
        Self::PROTEIN,
        Self::SCAN,
        Self::MASS,
    ];
    const PEPTIDE: &str = "Peptide\n< ProteinMetrics Confidential >";
    const GLYCANS: &str = "Glycans\nNHFAGNa";
    const START: &str = "Starting\nposition";
    const SCAN_TIME: &str = "Scan Time";
    const CHARGE: &str = "z";
    const SCORE: &str = "Score";
    const PROTEIN: &str = "Protein Name";
    const SCAN: &str = "Scan #";
    const MASS: &str = "Calc.\nmass (M+H)";
}

struct QuantitationColumns;
impl QuantitationColumns {
    const ALL: [&str; 2] = [Self::FIRST_SCAN, Self::AREA];
    const FIRST_SCAN: &str = "First Scan";
    const AREA: &str = "Area";
}

struct BatchColumns;
impl BatchColumns {
    const ALL: [&str; 4] = [
        Self::IDENTIFICATIONS,
        Self::QUANTITATION,
        Self::CONDITION,
        Self::REPLICATE,
    ];
    const IDENTIFICATIONS: &str = "filename";
    const QUANTITATION: &str = "area_filename";
    const CONDITION: &str = "condition_id";
    const REPLICATE: &str = "replicate_id";
}

struct NameTableColumns;
impl NameTableColumns {
    const ALL: [&str; 2] = [Self::ENTRY, Self::NAMES];
    const ENTRY: &str = "Entry";
    const NAMES: &str = "Protein names";
}

struct TemporaryColumns;
impl TemporaryColumns {
    const ROW: &str = "Row";
    const SCAN_NUMBER: &str = "Scan number";
}

struct OutputColumns;
impl OutputColumns {
    const PROTEIN: &str = "Protein";
    const PROTEIN_NAMES: &str = "Protein names";
    const SITE: &str = "Glycosylated positions in peptide";
    const PEPTIDE_POSITION: &str = "Position peptide N-terminus";
    const PEPTIDES: &str = "Peptides";
    const GLYCANS: &str = "Glycans";
}

// Public API ==========================================================================================================

/// One replicate of one condition: a search-result table and the quantitation table holding its peak areas
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct BatchEntry {
    pub identifications: PathBuf,
    pub quantitation: PathBuf,
    pub condition: String,
    pub replicate: String,
}

#[derive(Clone, PartialEq, Debug)]
pub struct BatchSettings {
    pub analysis: AnalysisSettings,
    /// Analyse only this protein, rather than splitting spectra by the accession of their protein
    pub protein: Option<String>,
    /// Merge the isoforms of a UniProt accession (like `P02787-2`) into their canonical protein
    pub combine_isoforms: bool,
}

/// The abundances of one protein in one replicate of one condition
#[derive(Clone, PartialEq, Debug)]
pub struct AnalyzedComponent {
    pub protein: String,
    pub condition: String,
    pub replicate: String,
    pub abundances: Abundances,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            analysis: AnalysisSettings::default(),
            protein: None,
            combine_isoforms: true,
        }
    }
}

/// Runs every entry of a batch file through glycosite analysis, then builds the four reports
///
/// Protein names come from `annotator` when one is given, otherwise from the protein descriptions found in the
/// search results themselves.
pub fn analyze_batch(
    batch_file: impl AsRef<Path>,
    settings: &BatchSettings,
    db: &MonosaccharideDatabase,
    annotator: Option<&dyn ProteinAnnotator>,
) -> Result<Reports> {
    let entries = load_batch(batch_file)?;

    let mut search_result_names = SearchResultNames::default();
    let mut aggregator = CohortAggregator::new(settings.analysis.trust_localization);
    for entry in &entries {
        let spectra = load_spectra(&entry.identifications, &entry.quantitation)?;
        info!(
            condition = %entry.condition,
            replicate = %entry.replicate,
            spectra = spectra.len(),
            "loaded search results"
        );

        for component in split_components(entry, spectra, settings, &mut search_result_names) {
            let abundances = component.process(db).analyze();
            debug!(
                protein = component.protein(),
                condition = component.condition(),
                replicate = component.replicate(),
                rows = abundances.len(),
                "analyzed component"
            );
            aggregator.add(AnalyzedComponent {
                protein: component.protein().to_owned(),
                condition: entry.condition.clone(),
                replicate: entry.replicate.clone(),
                abundances,
            });
        }
    }

    let mut names = ProteinNameCache::new();
    names.populate(
        annotator.unwrap_or(&search_result_names),
        &aggregator.accessions(),
    )?;
    info!(proteins = names.len(), "annotated proteins");

    Ok(aggregator.reports(&names))
}
