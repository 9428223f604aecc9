//! Monosaccharide masses, glycan compositions, and modification-tagged peptide sequences

pub mod errors;
mod glycan;
mod monosaccharide_database;
pub mod parsers;
mod peptide;

// External Crate Imports
use ahash::HashMap;
use rust_decimal::Decimal;

// Public Re-exports
pub use errors::{GlycochemError, Result};
pub use glycan::composition_terms;

// Public API ==========================================================================================================

/// A monoisotopic mass (or mass delta) in Daltons
pub type Mass = Decimal;

/// Residue masses of the monosaccharides that glycan compositions are built from
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct MonosaccharideDatabase {
    monosaccharides: HashMap<String, MonosaccharideDescription>,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct MonosaccharideDescription {
    pub name: String,
    pub mass: Mass,
}

/// A peptide sequence parsed from a search-engine token like `K.N[+203.079]GTR.S`
///
/// Only the residues between the two delimiting dots are kept. The flanking residues are context from the parent
/// protein and are never part of the identified peptide.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Peptide {
    residues: Vec<Residue>,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Residue {
    code: char,
    modifications: Vec<Mass>,
    annotation: Option<Annotation>,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Annotation {
    Glycosylated,
}
