// Standard Library Imports
use std::collections::BTreeMap;

// External Crate Imports
use ahash::HashMap;

// Local Crate Imports
use crate::{AbundanceRow, Abundances, GlycanLabel, SiteKey};

// Public API ==========================================================================================================

impl Abundances {
    #[must_use]
    pub fn rows(&self) -> &[AbundanceRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The raw abundances of every glycoform, leaving out unoccupied (`U`) rows
    #[must_use]
    pub fn without_unoccupied(&self) -> Self {
        let rows = self
            .rows
            .iter()
            .filter(|r| !r.glycan.is_unoccupied())
            .cloned()
            .collect();
        Self { rows }
    }

    /// Divides each abundance by the total of its site (or peptide), so that every site's values sum to one
    ///
    /// When `occupancy` is `false`, unoccupied (`U`) rows are dropped first, giving the proportion of each glycoform
    /// among only the glycosylated forms of a site.
    #[must_use]
    pub fn calculate_proportion(&self, occupancy: bool) -> Self {
        let counted = if occupancy {
            self.clone()
        } else {
            self.without_unoccupied()
        };

        let mut totals: HashMap<&SiteKey, f64> = HashMap::default();
        for row in &counted.rows {
            *totals.entry(&row.key).or_default() += row.value;
        }

        let rows = counted
            .rows
            .iter()
            .map(|row| AbundanceRow {
                value: row.value / totals[&row.key],
                ..row.clone()
            })
            .collect();
        Self { rows }
    }
}

/// Sums the values of rows sharing a key and glycan
impl FromIterator<AbundanceRow> for Abundances {
    fn from_iter<T: IntoIterator<Item = AbundanceRow>>(iter: T) -> Self {
        let mut summed: BTreeMap<(SiteKey, GlycanLabel), f64> = BTreeMap::new();
        for AbundanceRow { key, glycan, value } in iter {
            *summed.entry((key, glycan)).or_default() += value;
        }

        let rows = summed
            .into_iter()
            .map(|((key, glycan), value)| AbundanceRow { key, glycan, value })
            .collect();
        Self { rows }
    }
}

// Module Tests ========================================================================================================
