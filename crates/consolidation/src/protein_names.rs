// Standard Library Imports
use std::{
    collections::{BTreeMap, BTreeSet},
    path::Path,
};

// External Crate Imports
use ahash::HashMap;
use itertools::izip;
use polars::prelude::*;

// Local Crate Imports
use crate::{
    NameTableColumns, Result, load_fasta, parse_fasta,
    tables::{read_table, require_columns},
};

// Public API ==========================================================================================================

/// A source of human-readable protein names
pub trait ProteinAnnotator {
    /// Returns `(accession, name)` pairs for any of `accessions` this source knows about
    ///
    /// Accessions without a name may be left out. When an accession appears more than once, the first pair is used.
    fn annotate(&self, accessions: &BTreeSet<String>) -> Result<Vec<(String, String)>>;
}

/// Looks up protein names once per batch, then answers every later lookup from memory
#[derive(Clone, Debug, Default)]
pub struct ProteinNameCache {
    names: Option<HashMap<String, String>>,
}

/// The protein descriptions written in the search results, keyed by the component they were grouped under
#[derive(Clone, Debug, Default)]
pub struct SearchResultNames {
    names: BTreeMap<String, String>,
}

/// Protein names read from a UniProt-style table with `Entry` and `Protein names` columns
#[derive(Clone, Debug)]
pub struct NameTable {
    names: Vec<(String, String)>,
}

/// Protein names taken from the headers of a FASTA file
///
/// Records are keyed by the accession in a `db|ACCESSION|NAME` header, or by the first word of any other header.
#[derive(Clone, Debug)]
pub struct FastaNames {
    names: Vec<(String, String)>,
}

impl ProteinNameCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills the cache from `annotator`, unless it has already been filled
    pub fn populate(
        &mut self,
        annotator: &dyn ProteinAnnotator,
        accessions: &BTreeSet<String>,
    ) -> Result<()> {
        if self.names.is_some() {
            return Ok(());
        }

        let mut names = HashMap::default();
        for (accession, name) in annotator.annotate(accessions)? {
            names.entry(accession).or_insert(name);
        }
        self.names = Some(names);
        Ok(())
    }

    #[must_use]
    pub const fn is_populated(&self) -> bool {
        self.names.is_some()
    }

    #[must_use]
    pub fn name(&self, accession: &str) -> Option<&str> {
        self.names.as_ref()?.get(accession).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.as_ref().map_or(0, HashMap::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SearchResultNames {
    /// Remembers `protein` as the name of `accession`, unless a name was already seen for it
    pub fn observe(&mut self, accession: &str, protein: &str) {
        if !self.names.contains_key(accession) {
            self.names.insert(accession.to_owned(), protein.to_owned());
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl ProteinAnnotator for SearchResultNames {
    fn annotate(&self, accessions: &BTreeSet<String>) -> Result<Vec<(String, String)>> {
        Ok(known_names(&self.names, accessions))
    }
}

impl NameTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let df = read_table(path)?;
        require_columns(&df, path, &NameTableColumns::ALL)?;
        Ok(Self::from_table(&df)?)
    }

    pub fn from_table(df: &DataFrame) -> PolarsResult<Self> {
        let column = |name| df.column(name)?.cast(&DataType::String);
        let (entries, names) = (column(NameTableColumns::ENTRY)?, column(NameTableColumns::NAMES)?);

        let names = izip!(
            entries.as_materialized_series().str()?,
            names.as_materialized_series().str()?
        )
        .filter_map(|(entry, name)| Some((entry?.to_owned(), name?.to_owned())))
        .collect();
        Ok(Self { names })
    }
}

impl ProteinAnnotator for NameTable {
    fn annotate(&self, accessions: &BTreeSet<String>) -> Result<Vec<(String, String)>> {
        Ok(self
            .names
            .iter()
            .filter(|(accession, _)| accessions.contains(accession))
            .cloned()
            .collect())
    }
}

impl FastaNames {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let records = load_fasta(path, None, "")?;
        Ok(Self::from_headers(records.into_keys()))
    }

    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self::from_headers(parse_fasta(text, None, "").into_keys())
    }

    fn from_headers(headers: impl IntoIterator<Item = String>) -> Self {
        let names = headers
            .into_iter()
            .filter_map(|header| Some((header_accession(&header)?.to_owned(), header)))
            .collect();
        Self { names }
    }
}

impl ProteinAnnotator for FastaNames {
    fn annotate(&self, accessions: &BTreeSet<String>) -> Result<Vec<(String, String)>> {
        Ok(self
            .names
            .iter()
            .filter(|(accession, _)| accessions.contains(accession))
            .cloned()
            .collect())
    }
}

// Private Functions ===================================================================================================

fn known_names(names: &BTreeMap<String, String>, accessions: &BTreeSet<String>) -> Vec<(String, String)> {
    accessions
        .iter()
        .filter_map(|accession| Some((accession.clone(), names.get(accession)?.clone())))
        .collect()
}

fn header_accession(header: &str) -> Option<&str> {
    let mut fields = header.split('|');
    match (fields.next(), fields.next(), fields.next()) {
        (Some(_), Some(accession), Some(_)) => Some(accession),
        _ => header.split_whitespace().next(),
    }
}

// Module Tests ========================================================================================================
