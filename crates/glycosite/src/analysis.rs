// External Crate Imports
use itertools::Itertools;
use ordered_float::OrderedFloat;

// Local Crate Imports
use crate::{AbundanceRow, Abundances, AnnotatedSpectrum, GlycanLabel, ProcessedComponent, SiteKey};

// Public API ==========================================================================================================

impl ProcessedComponent<'_> {
    /// Collapses redundant spectra of the same glycopeptide down to their most abundant representative, then sums the
    /// areas of those representatives per site (trusted localization) or per peptide (untrusted)
    #[must_use]
    pub fn analyze(&self) -> Abundances {
        let ranked = self.ranked();
        if self.component.settings().trust_localization {
            ranked
                .into_iter()
                .unique_by(|s| {
                    (
                        s.stripped.clone(),
                        s.spectrum.charge,
                        s.glycoprofile.clone(),
                        OrderedFloat(s.spectrum.observed_mass),
                    )
                })
                .flat_map(|representative| self.site_abundances(representative))
                .collect()
        } else {
            ranked
                .into_iter()
                .unique_by(|s| {
                    (
                        s.stripped.clone(),
                        s.spectrum.charge,
                        s.canonical_glycans(),
                        s.spectrum.start,
                        OrderedFloat(s.spectrum.observed_mass),
                    )
                })
                .map(peptide_abundance)
                .collect()
        }
    }
}

// Private Methods =====================================================================================================

impl<'c> ProcessedComponent<'c> {
    // NOTE: The sort is stable, so spectra tied on both area and score keep their input order
    fn ranked(&self) -> Vec<&AnnotatedSpectrum<'c>> {
        self.annotated
            .iter()
            .sorted_by(|a, b| {
                b.area
                    .total_cmp(&a.area)
                    .then(b.spectrum.score.total_cmp(&a.spectrum.score))
            })
            .collect()
    }

    fn site_abundances(&self, representative: &AnnotatedSpectrum) -> Vec<AbundanceRow> {
        let start = representative.spectrum.start;
        let mut unoccupied: Vec<_> = self
            .glycosites
            .range(start..representative.end)
            .filter_map(|&position| {
                let offset = usize::try_from(position - start).ok()?;
                let residue = representative.stripped.chars().nth(offset)?;
                Some(SiteKey::Site { position, residue })
            })
            .collect();

        let mut rows = Vec::with_capacity(unoccupied.len() + representative.sites.len());
        for site in &representative.sites {
            let key = SiteKey::Site {
                position: site.position,
                residue: site.residue,
            };
            unoccupied.retain(|k| k != &key);
            rows.push(AbundanceRow {
                key,
                glycan: GlycanLabel::Composition(site.glycan.clone()),
                value: representative.area,
            });
        }

        rows.extend(unoccupied.into_iter().map(|key| AbundanceRow {
            key,
            glycan: GlycanLabel::Unoccupied,
            value: representative.area,
        }));
        rows
    }
}

fn peptide_abundance(representative: &AnnotatedSpectrum) -> AbundanceRow {
    let glycan = representative
        .canonical_glycans()
        .map_or(GlycanLabel::Unoccupied, GlycanLabel::Composition);
    AbundanceRow {
        key: SiteKey::Peptide {
            position: representative.spectrum.start,
            peptide: representative.stripped.clone(),
        },
        glycan,
        value: representative.area,
    }
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use assert_float_eq::assert_float_absolute_eq;
    use glycochem::MonosaccharideDatabase;

    use super::*;
    use crate::{AnalysisSettings, Component, MassCollisionPolicy, Spectrum, testing_tools::spectrum};

    static DB: LazyLock<MonosaccharideDatabase> = LazyLock::new(MonosaccharideDatabase::default);

    const TRUSTED: AnalysisSettings = AnalysisSettings {
        minimum_score: 0.0,
        trust_localization: true,
        mass_collision: MassCollisionPolicy::LastWins,
    };

    fn analyze(settings: AnalysisSettings, spectra: Vec<Spectrum>) -> Vec<(String, String, f64)> {
        let component = Component::new("P12345", "WT", "1", settings, spectra);
        component
            .process(&DB)
            .analyze()
            .rows()
            .iter()
            .map(|r| (r.key.to_string(), r.glycan.to_string(), r.value))
            .collect()
    }

    fn row(key: &str, glycan: &str, value: f64) -> (String, String, f64) {
        (key.to_owned(), glycan.to_owned(), value)
    }

    #[test]
    fn trusted_occupancy() {
        let spectra = vec![
            spectrum("N.AB[+203.079]CD.E", &["HexNAc(1)"], 1000.0),
            spectrum("N.ABCD.E", &[], 200.0),
        ];
        assert_eq!(
            analyze(TRUSTED, spectra),
            vec![row("B11", "HexNAc(1)", 1000.0), row("B11", "U", 200.0)]
        );
    }

    #[test]
    fn untrusted_occupancy() {
        let spectra = vec![
            spectrum("N.AB[+203.079]CD.E", &["HexNAc(1)"], 1000.0),
            spectrum("N.ABCD.E", &[], 200.0),
        ];
        assert_eq!(
            analyze(AnalysisSettings::default(), spectra),
            vec![row("ABCD", "HexNAc(1)", 1000.0), row("ABCD", "U", 200.0)]
        );
    }

    #[test]
    fn representatives_have_the_greatest_area() {
        let spectra = vec![
            spectrum("N.AB[+203.079]CD.E", &["HexNAc(1)"], 500.0),
            spectrum("N.AB[+203.079]CD.E", &["HexNAc(1)"], 900.0),
            spectrum("N.AB[+203.079]CD.E", &["HexNAc(1)"], 700.0),
        ];
        assert_eq!(
            analyze(TRUSTED, spectra.clone()),
            vec![row("B11", "HexNAc(1)", 900.0)]
        );
        assert_eq!(
            analyze(AnalysisSettings::default(), spectra),
            vec![row("ABCD", "HexNAc(1)", 900.0)]
        );
    }

    #[test]
    fn tied_areas_are_broken_by_score() {
        // Both unglycosylated spectra share a glycoprofile, but start at different positions
        let spectra = vec![
            spectrum("N.AB[+203.079]CD.E", &["HexNAc(1)"], 1000.0),
            Spectrum {
                start: 30,
                observed_mass: 800.4,
                ..spectrum("N.AB[+203.079]CD.E", &["HexNAc(1)"], 1000.0)
            },
            Spectrum {
                score: 100.0,
                ..spectrum("N.ABCD.E", &[], 400.0)
            },
            Spectrum {
                start: 30,
                score: 300.0,
                ..spectrum("N.ABCD.E", &[], 400.0)
            },
        ];
        assert_eq!(
            analyze(TRUSTED, spectra),
            vec![
                row("B11", "HexNAc(1)", 1000.0),
                row("B31", "HexNAc(1)", 1000.0),
                row("B31", "U", 400.0),
            ]
        );
    }

    #[test]
    fn full_ties_keep_the_earliest_spectrum() {
        let glycosylated = vec![
            spectrum("N.AB[+203.079]CD.E", &["HexNAc(1)"], 1000.0),
            Spectrum {
                start: 30,
                observed_mass: 800.4,
                ..spectrum("N.AB[+203.079]CD.E", &["HexNAc(1)"], 1000.0)
            },
        ];
        let unoccupied = |start| Spectrum {
            start,
            ..spectrum("N.ABCD.E", &[], 400.0)
        };

        let spectra = [glycosylated.clone(), vec![unoccupied(30), unoccupied(10)]].concat();
        assert_eq!(
            analyze(TRUSTED, spectra),
            vec![
                row("B11", "HexNAc(1)", 1000.0),
                row("B31", "HexNAc(1)", 1000.0),
                row("B31", "U", 400.0),
            ]
        );

        let spectra = [glycosylated, vec![unoccupied(10), unoccupied(30)]].concat();
        assert_eq!(
            analyze(TRUSTED, spectra),
            vec![
                row("B11", "HexNAc(1)", 1000.0),
                row("B11", "U", 400.0),
                row("B31", "HexNAc(1)", 1000.0),
            ]
        );
    }

    #[test]
    fn distinct_charges_are_summed() {
        let spectra = vec![
            spectrum("N.AB[+203.079]CD.E", &["HexNAc(1)"], 1000.0),
            Spectrum {
                charge: 3,
                ..spectrum("N.AB[+203.079]CD.E", &["HexNAc(1)"], 300.0)
            },
            Spectrum {
                observed_mass: 500.3,
                ..spectrum("N.ABCD.E", &[], 20.0)
            },
            spectrum("N.ABCD.E", &[], 200.0),
        ];
        assert_eq!(
            analyze(TRUSTED, spectra.clone()),
            vec![row("B11", "HexNAc(1)", 1300.0), row("B11", "U", 220.0)]
        );
        assert_eq!(
            analyze(AnalysisSettings::default(), spectra),
            vec![row("ABCD", "HexNAc(1)", 1300.0), row("ABCD", "U", 220.0)]
        );
    }

    #[test]
    fn multiply_glycosylated_peptides() {
        let spectra = vec![
            spectrum("K.N[+892.317]ASN[+203.079]K.T", &["HexNAc(2)Hex(3)", "HexNAc(1)"], 50.0),
            spectrum("K.NASN[+203.079]K.T", &["HexNAc(1)"], 30.0),
            spectrum("K.NASNK.T", &[], 20.0),
        ];
        assert_eq!(
            analyze(TRUSTED, spectra.clone()),
            vec![
                row("N10", "HexNAc(2)Hex(3)", 50.0),
                row("N10", "U", 50.0),
                row("N13", "HexNAc(1)", 80.0),
                row("N13", "U", 20.0),
            ]
        );
        assert_eq!(
            analyze(AnalysisSettings::default(), spectra),
            vec![
                row("NASNK", "HexNAc(1)", 30.0),
                row("NASNK", "HexNAc(1),HexNAc(2)Hex(3)", 50.0),
                row("NASNK", "U", 20.0),
            ]
        );
    }

    #[test]
    fn untrusted_peptides_are_keyed_by_position() {
        let spectra = vec![
            spectrum("K.NGTR.S", &[], 10.0),
            Spectrum {
                start: 50,
                ..spectrum("K.NGTR.S", &[], 20.0)
            },
        ];
        let component = Component::new("P12345", "WT", "1", AnalysisSettings::default(), spectra);
        let abundances = component.process(&DB).analyze();
        let keys: Vec<_> = abundances.rows().iter().map(|r| r.key.position()).collect();
        assert_eq!(keys, vec![10, 50]);
        assert_float_absolute_eq!(abundances.rows()[1].value, 20.0);
    }
}
