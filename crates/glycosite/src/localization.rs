// Standard Library Imports
use std::{
    collections::{BTreeMap, btree_map::Entry},
    str::FromStr,
};

// External Crate Imports
use glycochem::{Annotation, Mass, MonosaccharideDatabase, Peptide};
use itertools::Itertools;

// Local Crate Imports
use crate::{GlycositeError, LocalizedSite, MassCollisionPolicy, Result};

// Constants ===========================================================================================================

const MATCHING_DECIMAL_PLACES: u32 = 3;

// Public API ==========================================================================================================

/// Candidate glycans of a single spectrum, keyed by their mass rounded to three decimal places
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct GlycanMassMap {
    glycans: BTreeMap<Mass, String>,
}

impl GlycanMassMap {
    pub fn new<'g>(
        db: &MonosaccharideDatabase,
        glycans: impl IntoIterator<Item = &'g str>,
        policy: MassCollisionPolicy,
    ) -> Result<Self> {
        let mut map = BTreeMap::new();
        for glycan in glycans {
            let mass = db.glycan_mass(glycan).round_dp(MATCHING_DECIMAL_PLACES);
            match map.entry(mass) {
                Entry::Vacant(e) => {
                    e.insert(glycan.to_owned());
                }
                Entry::Occupied(e) if e.get() == glycan => (),
                Entry::Occupied(mut e) => match policy {
                    MassCollisionPolicy::LastWins => {
                        e.insert(glycan.to_owned());
                    }
                    MassCollisionPolicy::FirstWins => (),
                    MassCollisionPolicy::Reject => {
                        return Err(Box::new(GlycositeError::MassCollision {
                            mass,
                            kept: e.get().clone(),
                            rejected: glycan.to_owned(),
                        }));
                    }
                },
            }
        }
        Ok(Self { glycans: map })
    }

    /// Looks up the glycan whose rounded mass equals the rounded `mass`
    #[must_use]
    pub fn get(&self, mass: Mass) -> Option<&str> {
        self.glycans
            .get(&mass.round_dp(MATCHING_DECIMAL_PLACES))
            .map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.glycans.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glycans.is_empty()
    }
}

/// Marks every residue whose first modification matches a candidate glycan as glycosylated, returning those sites in
/// peptide order
///
/// `start` is the 1-based protein position of the peptide's first residue. Residues that would fall past `u32::MAX`
/// are never localized.
pub fn localize(peptide: &mut Peptide, start: u32, glycans: &GlycanMassMap) -> Vec<LocalizedSite> {
    let mut sites = Vec::new();
    for (position, residue) in (start..=u32::MAX).zip(peptide.residues_mut()) {
        let Some(mass) = residue.modification_mass() else {
            continue;
        };
        let Some(glycan) = glycans.get(mass) else {
            continue;
        };

        residue.annotate(Annotation::Glycosylated);
        sites.push(LocalizedSite {
            ordinal: sites.len() + 1,
            residue: residue.code(),
            position,
            glycan: glycan.to_owned(),
            modification_mass: mass,
        });
    }
    sites
}

/// Summarises sites as `N123_203;S130_365`: each residue and position, followed by its mass delta rounded to a whole
/// number of Daltons
#[must_use]
pub fn glycoprofile(sites: &[LocalizedSite]) -> String {
    sites
        .iter()
        .map(|site| {
            format!(
                "{}{}_{}",
                site.residue,
                site.position,
                site.modification_mass.round()
            )
        })
        .join(";")
}

impl FromStr for MassCollisionPolicy {
    type Err = GlycositeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "last-wins" => Ok(Self::LastWins),
            "first-wins" => Ok(Self::FirstWins),
            "reject" => Ok(Self::Reject),
            _ => Err(GlycositeError::UnknownCollisionPolicy {
                policy: s.to_owned(),
            }),
        }
    }
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use rust_decimal_macros::dec;

    use super::*;

    static DB: LazyLock<MonosaccharideDatabase> = LazyLock::new(MonosaccharideDatabase::default);

    fn mass_map(glycans: &[&str], policy: MassCollisionPolicy) -> Result<GlycanMassMap> {
        GlycanMassMap::new(&DB, glycans.iter().copied(), policy)
    }

    #[test]
    fn glycan_mass_lookup() {
        let map = mass_map(&["HexNAc(1)", "HexNAc(2)Hex(3)"], MassCollisionPolicy::default()).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(dec!(203.079)), Some("HexNAc(1)"));
        assert_eq!(map.get(dec!(203.0794)), Some("HexNAc(1)"));
        assert_eq!(map.get(dec!(892.317)), Some("HexNAc(2)Hex(3)"));
        assert_eq!(map.get(dec!(203.08)), None);
        assert_eq!(map.get(dec!(15.995)), None);
    }

    #[test]
    fn repeated_glycans_are_not_collisions() {
        let map = mass_map(&["HexNAc(1)", "HexNAc(1)"], MassCollisionPolicy::Reject).unwrap();
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn mass_collision_policies() {
        let glycans = ["HexNAc(2)Fuc(1)", "HexNAc(2)dHex(1)"];
        let shared_mass = dec!(552.217);

        let last = mass_map(&glycans, MassCollisionPolicy::LastWins).unwrap();
        assert_eq!(last.get(shared_mass), Some("HexNAc(2)dHex(1)"));

        let first = mass_map(&glycans, MassCollisionPolicy::FirstWins).unwrap();
        assert_eq!(first.get(shared_mass), Some("HexNAc(2)Fuc(1)"));

        let error = mass_map(&glycans, MassCollisionPolicy::Reject).unwrap_err();
        assert_eq!(
            *error,
            GlycositeError::MassCollision {
                mass: shared_mass,
                kept: "HexNAc(2)Fuc(1)".to_owned(),
                rejected: "HexNAc(2)dHex(1)".to_owned(),
            }
        );
        assert_eq!(
            error.to_string(),
            r#"the glycans "HexNAc(2)Fuc(1)" and "HexNAc(2)dHex(1)" both have a mass of 552.217 Da"#
        );
    }

    #[test]
    fn localize_single_site() {
        let mut peptide = Peptide::parse("N.AB[+203.079]CD.E").unwrap();
        let map = mass_map(&["HexNAc(1)"], MassCollisionPolicy::default()).unwrap();

        let sites = localize(&mut peptide, 10, &map);
        assert_eq!(
            sites,
            vec![LocalizedSite {
                ordinal: 1,
                residue: 'B',
                position: 11,
                glycan: "HexNAc(1)".to_owned(),
                modification_mass: dec!(203.079),
            }]
        );
        assert_eq!(glycoprofile(&sites), "B11_203");

        let annotations: Vec<_> = peptide.residues().iter().map(|r| r.annotation()).collect();
        assert_eq!(
            annotations,
            vec![None, Some(Annotation::Glycosylated), None, None]
        );
    }

    #[test]
    fn localize_multiple_sites() {
        let mut peptide =
            Peptide::parse("K.N[+892.317]ASM[+15.995]N[+203.079]K.T").unwrap();
        let map = mass_map(&["HexNAc(1)", "HexNAc(2)Hex(3)"], MassCollisionPolicy::default()).unwrap();

        let sites = localize(&mut peptide, 100, &map);
        let summary: Vec<_> = sites
            .iter()
            .map(|s| (s.ordinal, s.residue, s.position, s.glycan.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![(1, 'N', 100, "HexNAc(2)Hex(3)"), (2, 'N', 104, "HexNAc(1)")]
        );
        assert_eq!(glycoprofile(&sites), "N100_892;N104_203");
        assert_eq!(peptide.residues()[3].annotation(), None);
    }

    #[test]
    fn localize_near_the_last_position() {
        let mut peptide =
            Peptide::parse("K.N[+892.317]ASM[+15.995]N[+203.079]K.T").unwrap();
        let map = mass_map(&["HexNAc(1)", "HexNAc(2)Hex(3)"], MassCollisionPolicy::default()).unwrap();

        let sites = localize(&mut peptide, u32::MAX - 2, &map);
        let positions: Vec<_> = sites.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![u32::MAX - 2]);
        assert_eq!(peptide.residues()[4].annotation(), None);
    }

    #[test]
    fn unmatched_modifications_are_ignored() {
        let mut peptide = Peptide::parse("K.NGM[+15.995]TR.S").unwrap();
        let map = mass_map(&["HexNAc(1)"], MassCollisionPolicy::default()).unwrap();
        assert!(localize(&mut peptide, 1, &map).is_empty());
        assert!(peptide.residues().iter().all(|r| r.annotation().is_none()));

        let mut peptide = Peptide::parse("K.N[+203.079]GTR.S").unwrap();
        assert!(localize(&mut peptide, 1, &GlycanMassMap::default()).is_empty());
    }

    #[test]
    fn glycoprofile_rounding() {
        let site = |residue, position, modification_mass| LocalizedSite {
            ordinal: 1,
            residue,
            position,
            glycan: String::new(),
            modification_mass,
        };
        assert_eq!(glycoprofile(&[]), "");
        assert_eq!(
            glycoprofile(&[site('N', 7, dec!(1216.423)), site('S', 9, dec!(-18.5))]),
            "N7_1216;S9_-18"
        );
        assert_eq!(glycoprofile(&[site('T', 3, dec!(2350.5))]), "T3_2350");
    }

    #[test]
    fn parse_collision_policy() {
        assert_eq!("last-wins".parse::<MassCollisionPolicy>(), Ok(MassCollisionPolicy::LastWins));
        assert_eq!("first-wins".parse::<MassCollisionPolicy>(), Ok(MassCollisionPolicy::FirstWins));
        assert_eq!("reject".parse::<MassCollisionPolicy>(), Ok(MassCollisionPolicy::Reject));
        assert_eq!(
            "Reject".parse::<MassCollisionPolicy>(),
            Err(GlycositeError::UnknownCollisionPolicy {
                policy: "Reject".to_owned()
            })
        );
    }
}
