use std::ops::Range;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

pub type Result<T, E = Box<GlycochemError>> = std::result::Result<T, E>;

#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
pub enum GlycochemError {
    #[diagnostic(help(
        "peptides must be written with delimiting dots around the identified sequence, like K.N[+203.079]GTR.S"
    ))]
    #[error("no dot-delimited peptide sequence could be found in {peptide:?}")]
    MissingPeptide { peptide: String },

    #[diagnostic(help(
        "residues must be uppercase letters, optionally followed by signed mass deltas like [+203.079] or +15.995"
    ))]
    #[error("the peptide sequence {peptide:?} could not be parsed")]
    MalformedPeptide {
        #[source_code]
        peptide: String,
        #[label("input was valid up until this point")]
        span: SourceSpan,
    },
}

impl GlycochemError {
    pub(crate) fn missing_peptide(peptide: &str) -> Self {
        let peptide = peptide.to_owned();

        Self::MissingPeptide { peptide }
    }

    pub(crate) fn malformed_peptide(peptide: &str, invalid: Range<usize>) -> Self {
        let span = SourceSpan::from(invalid);
        let peptide = peptide.to_owned();

        Self::MalformedPeptide { peptide, span }
    }
}
