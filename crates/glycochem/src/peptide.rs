// External Crate Imports
use nom::Err as NomErr;

// Local Crate Imports
use crate::{
    Annotation, GlycochemError, Mass, Peptide, Residue, Result,
    parsers::{peptide_token, residues},
};

// Public API ==========================================================================================================

impl Peptide {
    pub fn parse(peptide: &str) -> Result<Self> {
        let token = peptide_token(peptide).ok_or_else(|| GlycochemError::missing_peptide(peptide))?;
        let interior = &peptide[token.clone()];

        let residues = match residues(interior) {
            Ok((_, residues)) => residues,
            Err(NomErr::Error(e) | NomErr::Failure(e)) => {
                let valid_until = token.start + interior.len() - e.input.len();
                return Err(Box::new(GlycochemError::malformed_peptide(
                    peptide,
                    valid_until..token.end,
                )));
            }
            Err(NomErr::Incomplete(_)) => {
                return Err(Box::new(GlycochemError::malformed_peptide(peptide, token)));
            }
        };

        let residues = residues
            .into_iter()
            .map(|(code, modifications)| Residue {
                code,
                modifications,
                annotation: None,
            })
            .collect();

        Ok(Self { residues })
    }

    #[must_use]
    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn residues_mut(&mut self) -> &mut [Residue] {
        &mut self.residues
    }

    /// The one-letter residue codes with every modification removed
    #[must_use]
    pub fn stripped(&self) -> String {
        self.residues.iter().map(|r| r.code).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}

impl Residue {
    #[must_use]
    pub const fn code(&self) -> char {
        self.code
    }

    #[must_use]
    pub fn modifications(&self) -> &[Mass] {
        &self.modifications
    }

    /// Only the first modification attached to a residue is considered when matching glycan masses
    #[must_use]
    pub fn modification_mass(&self) -> Option<Mass> {
        self.modifications.first().copied()
    }

    #[must_use]
    pub const fn annotation(&self) -> Option<Annotation> {
        self.annotation
    }

    pub fn annotate(&mut self, annotation: Annotation) {
        self.annotation = Some(annotation);
    }
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use miette::SourceSpan;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parse_flanked_peptide() {
        let peptide = Peptide::parse("N.AB[+203.079]CD.E").unwrap();
        assert_eq!(peptide.len(), 4);
        assert_eq!(peptide.stripped(), "ABCD");

        let masses: Vec<_> = peptide.residues().iter().map(Residue::modification_mass).collect();
        assert_eq!(masses, vec![None, Some(dec!(203.079)), None, None]);
        assert!(peptide.residues().iter().all(|r| r.annotation().is_none()));
    }

    #[test]
    fn only_first_modification_is_used() {
        let peptide = Peptide::parse("K.M[+15.995][+0.984]ANK.G").unwrap();
        let first = &peptide.residues()[0];
        assert_eq!(first.code(), 'M');
        assert_eq!(first.modifications(), &[dec!(15.995), dec!(0.984)]);
        assert_eq!(first.modification_mass(), Some(dec!(15.995)));
    }

    #[test]
    fn flanking_residues_are_dropped() {
        let with_flanks = Peptide::parse("K.NGTR.S").unwrap();
        let protein_termini = Peptide::parse("-.NGTR.-").unwrap();
        assert_eq!(with_flanks, protein_termini);
        assert_eq!(with_flanks.stripped(), "NGTR");
    }

    #[test]
    fn annotate_residues() {
        let mut peptide = Peptide::parse("K.N+203.079GTR.S").unwrap();
        peptide.residues_mut()[0].annotate(Annotation::Glycosylated);
        assert_eq!(
            peptide.residues()[0].annotation(),
            Some(Annotation::Glycosylated)
        );
        assert_eq!(peptide.residues()[1].annotation(), None);
    }

    #[test]
    fn missing_peptide() {
        let error = Peptide::parse("NGTR").unwrap_err();
        assert_eq!(
            *error,
            GlycochemError::MissingPeptide {
                peptide: "NGTR".to_owned()
            }
        );
    }

    #[test]
    fn malformed_peptide() {
        let error = Peptide::parse("K.NG*TR.S").unwrap_err();
        assert_eq!(
            *error,
            GlycochemError::MalformedPeptide {
                peptide: "K.NG*TR.S".to_owned(),
                span: SourceSpan::from(4..7),
            }
        );
        assert_eq!(
            error.to_string(),
            r#"the peptide sequence "K.NG*TR.S" could not be parsed"#
        );
    }

    #[test]
    fn empty_peptide() {
        assert!(matches!(
            *Peptide::parse("K..S").unwrap_err(),
            GlycochemError::MalformedPeptide { .. }
        ));
    }
}
