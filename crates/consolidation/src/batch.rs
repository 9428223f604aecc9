// Standard Library Imports
use std::{collections::BTreeMap, path::Path};

// External Crate Imports
use glycosite::{Component, Spectrum};
use itertools::{Itertools, izip};
use polars::prelude::*;
use tracing::info;

// Local Crate Imports
use crate::{
    BatchColumns, BatchEntry, BatchSettings, ConsolidationError, DECOY_PREFIX, Result, SearchResultNames,
    has_accession, master_id,
    tables::{read_table, separator},
};

// Public API ==========================================================================================================

/// Reads the list of replicates to analyse from a `.csv`, `.tsv`, or `.txt` batch file
///
/// Relative table paths are resolved against the directory containing the batch file. Each (condition, replicate)
/// pair may only appear once.
pub fn load_batch(path: impl AsRef<Path>) -> Result<Vec<BatchEntry>> {
    let path = path.as_ref();
    let invalid = |reason: String| ConsolidationError::InvalidBatch {
        path: path.to_owned(),
        reason,
    };

    if separator(path).is_none() {
        return Err(invalid(
            "batch files must be .csv, .tsv, or .txt tables".to_owned(),
        ));
    }

    let df = read_table(path)?;
    if let Some(column) = BatchColumns::ALL.iter().find(|&&c| df.column(c).is_err()) {
        return Err(invalid(format!("the {column:?} column is missing")));
    }

    let df = df
        .lazy()
        .select(BatchColumns::ALL.map(|c| col(c).cast(DataType::String)))
        .collect()?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));

    let entries: Vec<_> = izip!(
        string_column(&df, BatchColumns::IDENTIFICATIONS)?,
        string_column(&df, BatchColumns::QUANTITATION)?,
        string_column(&df, BatchColumns::CONDITION)?,
        string_column(&df, BatchColumns::REPLICATE)?,
    )
    .enumerate()
    .map(|(row, fields)| {
        let (Some(identifications), Some(quantitation), Some(condition), Some(replicate)) = fields else {
            return Err(invalid(format!("row {} is missing a value", row + 1)));
        };
        Ok(BatchEntry {
            identifications: base_dir.join(identifications),
            quantitation: base_dir.join(quantitation),
            condition: condition.to_owned(),
            replicate: replicate.to_owned(),
        })
    })
    .collect::<Result<_>>()?;

    if let Some((condition, replicate)) = entries
        .iter()
        .duplicates_by(|e| (e.condition.clone(), e.replicate.clone()))
        .map(|e| (&e.condition, &e.replicate))
        .next()
    {
        return Err(invalid(format!(
            "condition {condition:?} replicate {replicate:?} appears more than once"
        )));
    }

    Ok(entries)
}

/// Splits the spectra of one batch entry into a component per protein, recording the descriptions of proteins with a
/// UniProt accession along the way
///
/// Decoy and contaminant proteins never become components, and components left without spectra are dropped.
pub fn split_components(
    entry: &BatchEntry,
    spectra: Vec<Spectrum>,
    settings: &BatchSettings,
    names: &mut SearchResultNames,
) -> Vec<Component> {
    let component = |protein: String, spectra| {
        Component::new(
            protein,
            &entry.condition,
            &entry.replicate,
            settings.analysis,
            spectra,
        )
    };

    let components: Vec<_> = if let Some(protein) = &settings.protein {
        for spectrum in &spectra {
            let protein_name = &spectrum.protein;
            if protein_name.contains(protein.as_str())
                && !protein_name.starts_with(DECOY_PREFIX)
                && has_accession(protein_name)
            {
                names.observe(protein, protein_name);
            }
        }
        vec![component(protein.clone(), spectra)]
    } else {
        let mut proteins: BTreeMap<String, Vec<Spectrum>> = BTreeMap::new();
        for spectrum in spectra {
            let master_id = master_id(&spectrum.protein, settings.combine_isoforms);
            let Some(id) = master_id.component_id() else {
                continue;
            };
            if has_accession(&spectrum.protein) {
                names.observe(id, &spectrum.protein);
            }
            proteins.entry(id.to_owned()).or_default().push(spectrum);
        }
        proteins
            .into_iter()
            .map(|(protein, spectra)| component(protein, spectra))
            .collect()
    };

    let components: Vec<_> = components.into_iter().filter(|c| !c.is_empty()).collect();
    info!(
        condition = %entry.condition,
        replicate = %entry.replicate,
        components = components.len(),
        "split spectra into components"
    );
    components
}

// Private Functions ===================================================================================================

fn string_column<'df>(df: &'df DataFrame, name: &str) -> PolarsResult<&'df StringChunked> {
    df.column(name)?.as_materialized_series().str()
}

// Module Tests ========================================================================================================
