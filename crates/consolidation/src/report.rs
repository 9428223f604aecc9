// Standard Library Imports
use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet},
};

// External Crate Imports
use derive_more::Display;
use glycosite::{GlycanLabel, SiteKey};
use polars::prelude::*;

// Local Crate Imports
use crate::{OutputColumns, Result};

// Public API ==========================================================================================================

/// Whether a column holds summed peak areas or their share of a site's total
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display)]
pub enum Label {
    Proportion,
    Raw,
}

/// Orders by label, then condition, then replicate. Numeric ids sort by value, ahead of any other ids
#[derive(Clone, Eq, PartialEq, Hash, Debug, Display)]
#[display("{label} {condition} {replicate}")]
pub struct ColumnKey {
    pub label: Label,
    pub condition: String,
    pub replicate: String,
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct RowKey {
    pub protein: String,
    pub name: String,
    pub key: SiteKey,
    pub glycan: GlycanLabel,
}

/// A sparse, sorted matrix of abundances: one row per (protein, site or peptide, glycan), one column per
/// (label, condition, replicate)
#[derive(Clone, PartialEq, Debug)]
pub struct ReportTable {
    trusted: bool,
    cells: BTreeMap<RowKey, BTreeMap<ColumnKey, f64>>,
    columns: BTreeSet<ColumnKey>,
}

impl ReportTable {
    /// `trusted` tables are keyed by localized sites, otherwise by peptide and starting position
    #[must_use]
    pub const fn new(trusted: bool) -> Self {
        Self {
            trusted,
            cells: BTreeMap::new(),
            columns: BTreeSet::new(),
        }
    }

    /// Adds `value` to a cell, creating its row and column if needed
    pub fn insert(&mut self, row: RowKey, column: ColumnKey, value: f64) {
        *self
            .cells
            .entry(row)
            .or_default()
            .entry(column.clone())
            .or_default() += value;
        self.columns.insert(column);
    }

    #[must_use]
    pub fn get(&self, row: &RowKey, column: &ColumnKey) -> Option<f64> {
        self.cells.get(row)?.get(column).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &RowKey> {
        self.cells.keys()
    }

    pub fn columns(&self) -> impl Iterator<Item = &ColumnKey> {
        self.columns.iter()
    }

    #[must_use]
    pub const fn is_trusted(&self) -> bool {
        self.trusted
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Combines the rows and columns of two tables, summing any cells they share
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut union = self.clone();
        for (row, cells) in &other.cells {
            for (column, &value) in cells {
                union.insert(row.clone(), column.clone(), value);
            }
        }
        union
    }

    /// Lays the table out as row-key columns followed by one `Float64` column per column key
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let rows: Vec<_> = self.cells.keys().collect();
        let key_column = |name: &str, values: Vec<String>| Column::new(name.into(), values);

        let mut columns = vec![
            key_column(OutputColumns::PROTEIN, rows.iter().map(|r| r.protein.clone()).collect()),
            key_column(OutputColumns::PROTEIN_NAMES, rows.iter().map(|r| r.name.clone()).collect()),
        ];
        if self.trusted {
            columns.push(key_column(
                OutputColumns::SITE,
                rows.iter().map(|r| r.key.to_string()).collect(),
            ));
        } else {
            let positions: Vec<_> = rows.iter().map(|r| r.key.position()).collect();
            columns.push(Column::new(OutputColumns::PEPTIDE_POSITION.into(), positions));
            columns.push(key_column(
                OutputColumns::PEPTIDES,
                rows.iter().map(|r| r.key.to_string()).collect(),
            ));
        }
        columns.push(key_column(
            OutputColumns::GLYCANS,
            rows.iter().map(|r| r.glycan.to_string()).collect(),
        ));

        for column in &self.columns {
            let values: Vec<_> = rows.iter().map(|&row| self.get(row, column)).collect();
            columns.push(Column::new(column.to_string().into(), values));
        }

        DataFrame::new(columns)
    }

    pub fn to_csv(&self) -> Result<String> {
        let mut result = Vec::new();
        CsvWriter::new(&mut result).finish(&mut self.to_dataframe()?)?;
        // SAFETY: The `CsvWriter` should always return valid UTF-8
        Ok(String::from_utf8(result).unwrap())
    }
}

impl Ord for ColumnKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.label
            .cmp(&other.label)
            .then_with(|| natural_key(&self.condition).cmp(&natural_key(&other.condition)))
            .then_with(|| natural_key(&self.replicate).cmp(&natural_key(&other.replicate)))
    }
}

impl PartialOrd for ColumnKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Private Functions ===================================================================================================

// NOTE: The trailing `&str` keeps ids like `1` and `01` distinct
fn natural_key(id: &str) -> (bool, Option<u64>, &str) {
    let number = id.parse().ok();
    (number.is_none(), number, id)
}

// Module Tests ========================================================================================================
