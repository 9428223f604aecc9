// Standard Library Imports
use std::{fs, io::Cursor, path::Path};

// External Crate Imports
use glycosite::Spectrum;
use itertools::izip;
use polars::prelude::*;
use tracing::debug;

// Local Crate Imports
use crate::{
    ConsolidationError, IdentificationColumns, QuantitationColumns, Result, SCAN_NUMBER_REGEX,
    TemporaryColumns,
};

// Public API ==========================================================================================================

/// Reads a comma-separated (`.csv`) or tab-separated (`.tsv` or `.txt`) table
pub fn read_table(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let separator = separator(path).ok_or_else(|| ConsolidationError::UnsupportedTable {
        path: path.to_owned(),
    })?;
    let text = fs::read(path).map_err(|e| ConsolidationError::io(path, e))?;
    Ok(parse_table(&text, separator)?)
}

/// Loads the spectra of a search-result table, matched by scan number to the peak areas of a quantitation table
///
/// Spectra without a matching peak area are dropped, as are rows missing a peptide, starting position, or protein.
pub fn load_spectra(
    identifications: impl AsRef<Path>,
    quantitation: impl AsRef<Path>,
) -> Result<Vec<Spectrum>> {
    let (identifications, quantitation) = (identifications.as_ref(), quantitation.as_ref());
    let id_table = read_table(identifications)?;
    require_columns(&id_table, identifications, &IdentificationColumns::ALL)?;
    let quant_table = read_table(quantitation)?;
    require_columns(&quant_table, quantitation, &QuantitationColumns::ALL)?;

    let joined = join_on_scan_number(id_table, quant_table)?;
    Ok(spectra(&joined)?)
}

// Private Functions ===================================================================================================

pub(crate) fn separator(path: &Path) -> Option<u8> {
    match path.extension()?.to_str()? {
        "csv" => Some(b','),
        "tsv" | "txt" => Some(b'\t'),
        _ => None,
    }
}

pub(crate) fn parse_table(text: &[u8], separator: u8) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_separator(separator))
        .into_reader_with_file_handle(Cursor::new(text))
        .finish()
}

pub(crate) fn require_columns(df: &DataFrame, table: &Path, columns: &[&str]) -> Result<()> {
    match columns.iter().find(|&&c| df.column(c).is_err()) {
        Some(&column) => Err(ConsolidationError::MissingColumn {
            table: table.to_owned(),
            column: column.to_owned(),
        }),
        None => Ok(()),
    }
}

fn join_on_scan_number(identifications: DataFrame, quantitation: DataFrame) -> PolarsResult<DataFrame> {
    let identifications = identifications
        .lazy()
        .with_row_index(TemporaryColumns::ROW, None)
        .with_column(
            col(IdentificationColumns::SCAN)
                .cast(DataType::String)
                .str()
                .extract(lit(SCAN_NUMBER_REGEX), 1)
                .cast(DataType::Int64)
                .alias(TemporaryColumns::SCAN_NUMBER),
        );
    let quantitation = quantitation.lazy().select([
        col(QuantitationColumns::FIRST_SCAN).cast(DataType::Int64),
        col(QuantitationColumns::AREA).cast(DataType::Float64),
    ]);

    identifications
        .join(
            quantitation,
            [col(TemporaryColumns::SCAN_NUMBER)],
            [col(QuantitationColumns::FIRST_SCAN)],
            JoinArgs::new(JoinType::Inner),
        )
        .sort([TemporaryColumns::ROW], SortMultipleOptions::default())
        .select([
            col(IdentificationColumns::PEPTIDE).cast(DataType::String),
            col(IdentificationColumns::GLYCANS).cast(DataType::String),
            col(IdentificationColumns::START).cast(DataType::Int64),
            col(IdentificationColumns::SCAN_TIME).cast(DataType::Float64),
            col(IdentificationColumns::CHARGE).cast(DataType::Int64),
            col(IdentificationColumns::SCORE).cast(DataType::Float64),
            col(IdentificationColumns::PROTEIN).cast(DataType::String),
            col(IdentificationColumns::SCAN).cast(DataType::String),
            col(IdentificationColumns::MASS).cast(DataType::Float64),
            col(QuantitationColumns::AREA),
        ])
        .collect()
}

fn spectra(df: &DataFrame) -> PolarsResult<Vec<Spectrum>> {
    let column = |name| df.column(name).map(Column::as_materialized_series);
    let peptides = column(IdentificationColumns::PEPTIDE)?.str()?;
    let glycans = column(IdentificationColumns::GLYCANS)?.str()?;
    let starts = column(IdentificationColumns::START)?.i64()?;
    let scan_times = column(IdentificationColumns::SCAN_TIME)?.f64()?;
    let charges = column(IdentificationColumns::CHARGE)?.i64()?;
    let scores = column(IdentificationColumns::SCORE)?.f64()?;
    let proteins = column(IdentificationColumns::PROTEIN)?.str()?;
    let scans = column(IdentificationColumns::SCAN)?.str()?;
    let masses = column(IdentificationColumns::MASS)?.f64()?;
    let areas = column(QuantitationColumns::AREA)?.f64()?;

    let rows = izip!(
        peptides, glycans, starts, scan_times, charges, scores, proteins, scans, masses, areas
    );
    let spectra: Vec<_> = rows
        .filter_map(
            |(peptide, glycans, start, scan_time, charge, score, protein, scan, mass, area)| {
                Some(Spectrum {
                    peptide: peptide?.to_owned(),
                    start: start.and_then(|s| u32::try_from(s).ok())?,
                    charge: charge.unwrap_or_default(),
                    scan_time: scan_time.unwrap_or(f64::NAN),
                    score: score.unwrap_or(f64::NAN),
                    glycans: glycans.map(split_glycans).unwrap_or_default(),
                    scan: scan.unwrap_or_default().to_owned(),
                    observed_mass: mass.unwrap_or(f64::NAN),
                    protein: protein?.to_owned(),
                    area,
                })
            },
        )
        .collect();

    let skipped = df.height() - spectra.len();
    if skipped > 0 {
        debug!(skipped, "skipped rows missing a peptide, starting position, or protein");
    }
    Ok(spectra)
}

fn split_glycans(glycans: &str) -> Vec<String> {
    glycans
        .split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

// Module Tests ========================================================================================================
