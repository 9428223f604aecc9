// Standard Library Imports
use std::collections::BTreeSet;

// External Crate Imports
use glycochem::{MonosaccharideDatabase, Peptide};
use itertools::Itertools;
use tracing::{debug, warn};

// Local Crate Imports
use crate::{
    AnalysisSettings, AnnotatedSpectrum, Component, DECOY_MARKER, GlycanMassMap, ProcessedComponent, Spectrum,
    glycoprofile, localize,
};

// Public API ==========================================================================================================

impl Component {
    /// Keeps the spectra that matched a peak area, scored at least `settings.minimum_score`, and were assigned to a
    /// (non-decoy) protein containing `protein`
    pub fn new(
        protein: impl Into<String>,
        condition: impl Into<String>,
        replicate: impl Into<String>,
        settings: AnalysisSettings,
        spectra: impl IntoIterator<Item = Spectrum>,
    ) -> Self {
        let protein = protein.into();
        let spectra = spectra
            .into_iter()
            .filter(|s| {
                s.area.is_some()
                    && s.score >= settings.minimum_score
                    && s.protein.contains(&protein)
                    && !s.protein.contains(DECOY_MARKER)
            })
            .collect();

        Self {
            protein,
            condition: condition.into(),
            replicate: replicate.into(),
            settings,
            spectra,
        }
    }

    #[must_use]
    pub fn protein(&self) -> &str {
        &self.protein
    }

    #[must_use]
    pub fn condition(&self) -> &str {
        &self.condition
    }

    #[must_use]
    pub fn replicate(&self) -> &str {
        &self.replicate
    }

    #[must_use]
    pub const fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    #[must_use]
    pub fn spectra(&self) -> &[Spectrum] {
        &self.spectra
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.spectra.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spectra.is_empty()
    }

    /// Parses every peptide and, when localization is trusted, places each glycan on its residue
    ///
    /// Spectra with peptides that can't be parsed, or whose glycans collide under [`MassCollisionPolicy::Reject`],
    /// are left out of the result.
    ///
    /// [`MassCollisionPolicy::Reject`]: crate::MassCollisionPolicy::Reject
    #[must_use]
    pub fn process(&self, db: &MonosaccharideDatabase) -> ProcessedComponent<'_> {
        let mut glycosites = BTreeSet::new();
        let annotated: Vec<_> = self
            .spectra
            .iter()
            .filter_map(|spectrum| self.annotate(db, spectrum, &mut glycosites))
            .collect();

        debug!(
            protein = %self.protein,
            condition = %self.condition,
            replicate = %self.replicate,
            spectra = annotated.len(),
            glycosites = glycosites.len(),
            "processed component"
        );

        ProcessedComponent {
            component: self,
            annotated,
            glycosites,
        }
    }
}

impl<'c> ProcessedComponent<'c> {
    #[must_use]
    pub const fn component(&self) -> &'c Component {
        self.component
    }

    #[must_use]
    pub fn annotated(&self) -> &[AnnotatedSpectrum<'c>] {
        &self.annotated
    }

    /// Every protein position that any spectrum of the component localized a glycan to
    #[must_use]
    pub const fn glycosites(&self) -> &BTreeSet<u32> {
        &self.glycosites
    }
}

impl AnnotatedSpectrum<'_> {
    /// The glycans joined with commas, or `None` for an unglycosylated peptide
    #[must_use]
    pub fn canonical_glycans(&self) -> Option<String> {
        self.glycosylated.then(|| self.glycans.join(","))
    }
}

// Private Methods =====================================================================================================

impl Component {
    fn annotate<'s>(
        &self,
        db: &MonosaccharideDatabase,
        spectrum: &'s Spectrum,
        glycosites: &mut BTreeSet<u32>,
    ) -> Option<AnnotatedSpectrum<'s>> {
        let area = spectrum.area?;
        let mut peptide = Peptide::parse(&spectrum.peptide)
            .inspect_err(|error| {
                debug!(peptide = %spectrum.peptide, %error, "skipping spectrum with an unparsable peptide");
            })
            .ok()?;

        let stripped = peptide.stripped();
        let length = u32::try_from(peptide.len()).unwrap_or(u32::MAX);
        let end = spectrum.start.saturating_add(length);

        let (sites, glycans) = if self.settings.trust_localization {
            let glycan_masses = GlycanMassMap::new(
                db,
                spectrum.glycans.iter().map(String::as_str),
                self.settings.mass_collision,
            )
            .inspect_err(|error| {
                warn!(peptide = %spectrum.peptide, scan = %spectrum.scan, %error, "skipping spectrum");
            })
            .ok()?;

            let sites = localize(&mut peptide, spectrum.start, &glycan_masses);
            glycosites.extend(sites.iter().map(|s| s.position));
            let glycans = sites.iter().map(|s| s.glycan.clone()).collect();
            (sites, glycans)
        } else {
            (Vec::new(), spectrum.glycans.iter().cloned().sorted().collect_vec())
        };

        Some(AnnotatedSpectrum {
            spectrum,
            area,
            stripped,
            end,
            glycoprofile: glycoprofile(&sites),
            glycosylated: !glycans.is_empty(),
            sites,
            glycans,
        })
    }
}

// Module Tests ========================================================================================================
