use crate::Spectrum;

pub const PROTEIN: &str = ">sp|P12345|GLYC_HUMAN Glycoprotein";

/// A charge 2+ spectrum of `PROTEIN` starting at residue 10, which tests can tweak with struct-update syntax
pub fn spectrum(peptide: &str, glycans: &[&str], area: f64) -> Spectrum {
    Spectrum {
        peptide: peptide.to_owned(),
        start: 10,
        charge: 2,
        scan_time: 31.4,
        score: 250.0,
        glycans: glycans.iter().map(|&g| g.to_owned()).collect(),
        scan: "controllerType=0 controllerNumber=1 scan=1001".to_owned(),
        observed_mass: 500.2,
        protein: PROTEIN.to_owned(),
        area: Some(area),
    }
}
