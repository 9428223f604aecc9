// Standard Library Imports
use std::sync::LazyLock;

// External Crate Imports
use regex::Regex;

// Local Crate Imports
use crate::{CONTAMINANT_SUFFIX, DECOY_PREFIX};

// Constants ===========================================================================================================

static UNIPROT_ACCESSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<accession>[OPQ][0-9][A-Z0-9]{3}[0-9]|[A-NR-Z][0-9]([A-Z][A-Z0-9]{2}[0-9]){1,2})(?P<isoform>-\d)?",
    )
    .unwrap()
});

// Public API ==========================================================================================================

/// The protein a spectrum is grouped under when a batch is split into components
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum MasterId {
    /// A UniProt accession and the isoform number that followed it (1 when no isoform was given)
    Accession { accession: String, isoform: u32 },
    /// Protein strings with no accession, and isoforms that are being kept separate, are grouped as written
    Raw(String),
    Decoy(String),
    Contaminant(String),
}

impl MasterId {
    /// The identifier the component is named by, or `None` for decoys and contaminants that are never analysed
    #[must_use]
    pub fn component_id(&self) -> Option<&str> {
        match self {
            Self::Accession { accession, .. } => Some(accession),
            Self::Raw(protein) => Some(protein),
            Self::Decoy(_) | Self::Contaminant(_) => None,
        }
    }
}

/// Reduces a search-engine protein string to the protein its spectra should be analysed under
#[must_use]
pub fn master_id(protein: &str, combine_isoforms: bool) -> MasterId {
    if protein.starts_with(DECOY_PREFIX) {
        return MasterId::Decoy(protein.to_owned());
    }
    if protein.ends_with(CONTAMINANT_SUFFIX) {
        return MasterId::Contaminant(protein.to_owned());
    }

    let Some(captures) = UNIPROT_ACCESSION_RE.captures(protein).filter(|_| combine_isoforms) else {
        return MasterId::Raw(protein.to_owned());
    };

    let isoform = captures
        .name("isoform")
        .and_then(|i| i.as_str()[1..].parse().ok())
        .unwrap_or(1);
    MasterId::Accession {
        accession: captures["accession"].to_owned(),
        isoform,
    }
}

/// Whether `protein` mentions a UniProt accession that a protein name can be looked up by
#[must_use]
pub fn has_accession(protein: &str) -> bool {
    UNIPROT_ACCESSION_RE.is_match(protein)
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn accession(accession: &str, isoform: u32) -> MasterId {
        MasterId::Accession {
            accession: accession.to_owned(),
            isoform,
        }
    }

    #[test]
    fn uniprot_accessions() {
        let id = |p| master_id(p, true);
        // Swiss-Prot and TrEMBL Accessions
        assert_eq!(
            id(">sp|P02787|TRFE_HUMAN Serotransferrin OS=Homo sapiens"),
            accession("P02787", 1)
        );
        assert_eq!(id(">tr|A0A024R161|A0A024R161_HUMAN"), accession("A0A024R161", 1));
        assert_eq!(id(">sp|Q9Y6R7|FCGBP_HUMAN"), accession("Q9Y6R7", 1));
        // Isoforms
        assert_eq!(
            id(">sp|P02787-2|TRFE_HUMAN Isoform 2 of Serotransferrin"),
            accession("P02787", 2)
        );
        // No Accession
        assert_eq!(id(">my_protein"), MasterId::Raw(">my_protein".to_owned()));
    }

    #[test]
    fn accession_detection() {
        assert!(has_accession(">sp|P02787-2|TRFE_HUMAN Isoform 2 of Serotransferrin"));
        assert!(has_accession(">tr|A0A024R161|A0A024R161_HUMAN"));
        assert!(!has_accession(">unannotated protein"));
        assert!(!has_accession(""));
    }

    #[test]
    fn separate_isoforms() {
        let protein = ">sp|P02787-2|TRFE_HUMAN Isoform 2 of Serotransferrin";
        assert_eq!(master_id(protein, false), MasterId::Raw(protein.to_owned()));
    }

    #[test]
    fn decoys_and_contaminants() {
        let decoy = ">Reverse sp|P02787|TRFE_HUMAN";
        let contaminant = ">sp|P02768|ALBU_HUMAN Serum albumin (Common contaminant protein)";
        for combine_isoforms in [true, false] {
            assert_eq!(
                master_id(decoy, combine_isoforms),
                MasterId::Decoy(decoy.to_owned())
            );
            assert_eq!(
                master_id(contaminant, combine_isoforms),
                MasterId::Contaminant(contaminant.to_owned())
            );
        }
    }

    #[test]
    fn component_ids() {
        assert_eq!(accession("P02787", 2).component_id(), Some("P02787"));
        assert_eq!(MasterId::Raw("Thing".to_owned()).component_id(), Some("Thing"));
        assert_eq!(MasterId::Decoy(">Reverse".to_owned()).component_id(), None);
        assert_eq!(MasterId::Contaminant(String::new()).component_id(), None);
    }
}
