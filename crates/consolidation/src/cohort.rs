// Standard Library Imports
use std::collections::BTreeSet;

// External Crate Imports
use ahash::HashMap;
use glycosite::{Abundances, GlycanLabel, SiteKey};

// Local Crate Imports
use crate::{AnalyzedComponent, ColumnKey, Label, ProteinNameCache, ReportTable, RowKey};

// Public API ==========================================================================================================

/// Collects the abundances of every component in a batch, then lays them out as the four occupancy reports
#[derive(Clone, Debug)]
pub struct CohortAggregator {
    trusted: bool,
    components: Vec<AnalyzedComponent>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Reports {
    /// The raw abundance and share of each glycoform among the glycosylated forms of a site
    pub glycoforms: ReportTable,
    /// Raw abundances and occupancy proportions, including unoccupied (`U`) rows
    pub occupancy: ReportTable,
    /// Only the unoccupied rows of sites seen both with and without a glycan
    pub occupancy_with_u: ReportTable,
    pub occupancy_without_proportion_u: ReportTable,
}

/// Keeps a site unless the only label it was ever seen with is `U`
#[must_use]
pub fn filter_u_only(labels: &BTreeSet<&GlycanLabel>) -> bool {
    labels.len() > 1 || !labels.iter().any(|l| l.is_unoccupied())
}

/// Keeps a site if it was seen both unoccupied (`U`) and with at least one glycan
#[must_use]
pub fn filter_with_u(labels: &BTreeSet<&GlycanLabel>) -> bool {
    labels.len() > 1 && labels.iter().any(|l| l.is_unoccupied())
}

impl CohortAggregator {
    /// `trusted` reports are keyed by localized sites, otherwise by peptide and starting position
    #[must_use]
    pub const fn new(trusted: bool) -> Self {
        Self {
            trusted,
            components: Vec::new(),
        }
    }

    /// Components without any abundances are skipped
    pub fn add(&mut self, component: AnalyzedComponent) {
        if !component.abundances.is_empty() {
            self.components.push(component);
        }
    }

    /// Every protein that contributed abundances, to be looked up in a [`ProteinNameCache`]
    #[must_use]
    pub fn accessions(&self) -> BTreeSet<String> {
        self.components.iter().map(|c| c.protein.clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Builds the reports, dropping any protein that `names` has no name for
    #[must_use]
    pub fn reports(&self, names: &ProteinNameCache) -> Reports {
        let occupancy = self.long_rows(names, Variant::Occupancy);
        let glycoforms = self.long_rows(names, Variant::Glycoform);

        let glycoforms = self.pivot(filtered(&glycoforms, filter_u_only));
        let occupancy_with_u =
            self.pivot(filtered(&occupancy, filter_with_u).filter(|r| r.row.glycan.is_unoccupied()));
        let occupancy = self.pivot(filtered(&occupancy, filter_u_only));
        let occupancy_without_proportion_u = glycoforms.union(&occupancy_with_u);

        Reports {
            glycoforms,
            occupancy,
            occupancy_with_u,
            occupancy_without_proportion_u,
        }
    }
}

impl Reports {
    pub const GLYCOFORMS: &str = "Glycoforms";
    pub const OCCUPANCY: &str = "Occupancy";
    pub const OCCUPANCY_WITH_U: &str = "Occupancy_With_U";
    pub const OCCUPANCY_WITHOUT_PROPORTION_U: &str = "Occupancy_Without_Proportion_U";

    /// Each report paired with the name it's written out under
    #[must_use]
    pub const fn tables(&self) -> [(&'static str, &ReportTable); 4] {
        [
            (Self::GLYCOFORMS, &self.glycoforms),
            (Self::OCCUPANCY, &self.occupancy),
            (Self::OCCUPANCY_WITH_U, &self.occupancy_with_u),
            (Self::OCCUPANCY_WITHOUT_PROPORTION_U, &self.occupancy_without_proportion_u),
        ]
    }
}

// Private Types =======================================================================================================

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Variant {
    /// Raw rows include `U`, and proportions are of all forms of a site
    Occupancy,
    /// Raw rows exclude `U`, and proportions are of only the glycosylated forms of a site
    Glycoform,
}

#[derive(Clone, PartialEq, Debug)]
struct LongRow {
    row: RowKey,
    column: ColumnKey,
    value: f64,
}

// Private Functions ===================================================================================================

impl CohortAggregator {
    fn long_rows(&self, names: &ProteinNameCache, variant: Variant) -> Vec<LongRow> {
        let mut rows = Vec::new();
        for component in &self.components {
            let Some(name) = names.name(&component.protein) else {
                continue;
            };

            let abundances = &component.abundances;
            let (raw, proportion) = match variant {
                Variant::Occupancy => (abundances.clone(), abundances.calculate_proportion(true)),
                Variant::Glycoform => (
                    abundances.without_unoccupied(),
                    abundances.calculate_proportion(false),
                ),
            };

            for (label, abundances) in [(Label::Raw, raw), (Label::Proportion, proportion)] {
                rows.extend(component_rows(component, name, label, &abundances));
            }
        }
        rows
    }

    fn pivot<'r>(&self, rows: impl Iterator<Item = &'r LongRow>) -> ReportTable {
        let mut table = ReportTable::new(self.trusted);
        for LongRow { row, column, value } in rows {
            table.insert(row.clone(), column.clone(), *value);
        }
        table
    }
}

fn component_rows<'a>(
    component: &'a AnalyzedComponent,
    name: &'a str,
    label: Label,
    abundances: &'a Abundances,
) -> impl Iterator<Item = LongRow> + 'a {
    abundances.rows().iter().map(move |r| LongRow {
        row: RowKey {
            protein: component.protein.clone(),
            name: name.to_owned(),
            key: r.key.clone(),
            glycan: r.glycan.clone(),
        },
        column: ColumnKey {
            label,
            condition: component.condition.clone(),
            replicate: component.replicate.clone(),
        },
        value: r.value,
    })
}

/// Applies a label-set filter to every (protein, site or peptide) group, across all conditions and replicates
fn filtered(
    rows: &[LongRow],
    filter: fn(&BTreeSet<&GlycanLabel>) -> bool,
) -> impl Iterator<Item = &LongRow> {
    let mut labels: HashMap<_, BTreeSet<&GlycanLabel>> = HashMap::default();
    for row in rows {
        labels.entry(group_key(row)).or_default().insert(&row.row.glycan);
    }

    rows.iter().filter(move |r| filter(&labels[&group_key(r)]))
}

fn group_key(row: &LongRow) -> (&str, &str, &SiteKey) {
    (&row.row.protein, &row.row.name, &row.row.key)
}

// Module Tests ========================================================================================================
