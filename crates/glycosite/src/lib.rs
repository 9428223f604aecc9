//! Localizes glycans on peptide residues and turns search results into per-site abundances

mod abundances;
mod analysis;
mod component;
pub mod errors;
mod localization;
#[cfg(test)]
mod testing_tools;

// Standard Library Imports
use std::{cmp::Ordering, collections::BTreeSet};

// External Crate Imports
use derive_more::Display;
use glycochem::Mass;

// Public Re-exports
pub use errors::{GlycositeError, Result};
pub use localization::{GlycanMassMap, glycoprofile, localize};

// Public API ==========================================================================================================

/// The protein substring marking a decoy hit, which is never analysed
pub const DECOY_MARKER: &str = ">Reverse";

/// One identified MS/MS scan, joined with the MS1 peak area of its precursor
#[derive(Clone, PartialEq, Debug)]
pub struct Spectrum {
    /// The peptide as written by the search engine, like `K.N[+203.079]GTR.S`
    pub peptide: String,
    /// 1-based position of the first peptide residue on its protein
    pub start: u32,
    pub charge: i64,
    pub scan_time: f64,
    pub score: f64,
    pub glycans: Vec<String>,
    pub scan: String,
    pub observed_mass: f64,
    pub protein: String,
    pub area: Option<f64>,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Display)]
pub enum MassCollisionPolicy {
    /// The glycan listed last claims the shared mass
    #[default]
    #[display("last-wins")]
    LastWins,
    /// The glycan listed first claims the shared mass
    #[display("first-wins")]
    FirstWins,
    /// Two different glycans sharing a mass exclude the spectrum from analysis
    #[display("reject")]
    Reject,
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct AnalysisSettings {
    pub minimum_score: f64,
    /// Trust the search engine's placement of glycans on residues, reporting per-site (rather than per-peptide)
    /// abundances
    pub trust_localization: bool,
    pub mass_collision: MassCollisionPolicy,
}

/// A residue that carries a glycan, placed on its parent protein
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct LocalizedSite {
    /// Counts up from 1 in the order sites appear along the peptide
    pub ordinal: usize,
    pub residue: char,
    pub position: u32,
    pub glycan: String,
    pub modification_mass: Mass,
}

/// All of the spectra for one protein in one replicate of one condition
#[derive(Clone, Debug)]
pub struct Component {
    protein: String,
    condition: String,
    replicate: String,
    settings: AnalysisSettings,
    spectra: Vec<Spectrum>,
}

/// A spectrum after its peptide has been parsed and (in trusted mode) its glycans localized
#[derive(Clone, PartialEq, Debug)]
pub struct AnnotatedSpectrum<'s> {
    pub spectrum: &'s Spectrum,
    pub area: f64,
    pub stripped: String,
    /// One past the last residue of the peptide on its protein
    pub end: u32,
    pub sites: Vec<LocalizedSite>,
    pub glycoprofile: String,
    /// Reordered to follow `sites` in trusted mode, otherwise sorted
    pub glycans: Vec<String>,
    pub glycosylated: bool,
}

#[derive(Clone, Debug)]
pub struct ProcessedComponent<'c> {
    component: &'c Component,
    annotated: Vec<AnnotatedSpectrum<'c>>,
    glycosites: BTreeSet<u32>,
}

/// Where an abundance was measured: a localized residue, or an entire peptide starting at some position
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display)]
pub enum SiteKey {
    #[display("{residue}{position}")]
    Site { position: u32, residue: char },
    #[display("{peptide}")]
    Peptide { position: u32, peptide: String },
}

#[derive(Clone, Eq, PartialEq, Hash, Debug, Display)]
pub enum GlycanLabel {
    #[display("U")]
    Unoccupied,
    #[display("{_0}")]
    Composition(String),
}

#[derive(Clone, PartialEq, Debug)]
pub struct AbundanceRow {
    pub key: SiteKey,
    pub glycan: GlycanLabel,
    pub value: f64,
}

/// Summed abundances for every (site or peptide, glycan) pair of one component, sorted by that pair
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Abundances {
    rows: Vec<AbundanceRow>,
}

// ---------------------------------------------------------------------------------------------------------------------

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            minimum_score: 0.0,
            trust_localization: false,
            mass_collision: MassCollisionPolicy::default(),
        }
    }
}

impl SiteKey {
    #[must_use]
    pub const fn position(&self) -> u32 {
        match self {
            Self::Site { position, .. } | Self::Peptide { position, .. } => *position,
        }
    }
}

impl GlycanLabel {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unoccupied => "U",
            Self::Composition(composition) => composition,
        }
    }

    #[must_use]
    pub const fn is_unoccupied(&self) -> bool {
        matches!(self, Self::Unoccupied)
    }
}

// NOTE: Labels sort as their text would, so `U` falls between compositions rather than at either end
impl Ord for GlycanLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for GlycanLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Module Tests ========================================================================================================
