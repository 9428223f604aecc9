// Standard Library Imports
use std::sync::LazyLock;

// External Crate Imports
use regex::Regex;

// Local Crate Imports
use crate::{Mass, MonosaccharideDatabase};

// Constants ===========================================================================================================

static COMPOSITION_TERM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)\((\d+)\)").unwrap());

// Public API ==========================================================================================================

impl MonosaccharideDatabase {
    /// Sums the masses of every `Monosaccharide(count)` term in a glycan composition like `HexNAc(4)Hex(5)Fuc(1)`
    ///
    /// Monosaccharides missing from the database contribute nothing, as do trailing terms that are never closed with
    /// a `)`.
    #[must_use]
    pub fn glycan_mass(&self, composition: &str) -> Mass {
        composition_terms(composition)
            .filter_map(|(abbr, count)| self.mass(abbr).map(|mass| mass * Mass::from(count)))
            .sum()
    }
}

/// Glycan Composition = { Term } ;
/// Term = Monosaccharide , "(" , Count , ")" ;
///
/// The composition is read left-to-right in chunks that each end with a `)`, and the first term found in each chunk
/// is yielded. Chunks without a recognisable term (and any unterminated remainder) are skipped.
pub fn composition_terms(composition: &str) -> impl Iterator<Item = (&str, u32)> {
    composition
        .split_inclusive(')')
        .filter(|chunk| chunk.ends_with(')'))
        .filter_map(|chunk| {
            let captures = COMPOSITION_TERM_RE.captures(chunk)?;
            let abbr = captures.get(1)?.as_str();
            let count = captures.get(2)?.as_str().parse().ok()?;
            Some((abbr, count))
        })
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use rust_decimal_macros::dec;

    use super::*;

    static DB: LazyLock<MonosaccharideDatabase> = LazyLock::new(MonosaccharideDatabase::default);

    #[test]
    fn test_composition_terms() {
        let terms = |c| -> Vec<_> { composition_terms(c).collect() };
        // Well-formed Compositions
        assert_eq!(terms("HexNAc(1)"), vec![("HexNAc", 1)]);
        assert_eq!(
            terms("HexNAc(4)Hex(5)Fuc(1)NeuAc(2)"),
            vec![("HexNAc", 4), ("Hex", 5), ("Fuc", 1), ("NeuAc", 2)]
        );
        assert_eq!(terms("HexNAc(12)"), vec![("HexNAc", 12)]);
        // Junk Between Terms
        assert_eq!(terms(" HexNAc(2) Hex(3)"), vec![("HexNAc", 2), ("Hex", 3)]);
        // Malformed Compositions
        assert_eq!(terms(""), vec![]);
        assert_eq!(terms("HexNAc"), vec![]);
        assert_eq!(terms("HexNAc(2"), vec![]);
        assert_eq!(terms("HexNAc(2)Hex(3"), vec![("HexNAc", 2)]);
        assert_eq!(terms("HexNAc(x)Hex(3)"), vec![("Hex", 3)]);
        assert_eq!(terms("(2)"), vec![]);
    }

    #[test]
    fn test_glycan_mass() {
        assert_eq!(DB.glycan_mass("HexNAc(1)"), dec!(203.079373));
        assert_eq!(DB.glycan_mass("HexNAc(2)"), dec!(406.158746));
        assert_eq!(
            DB.glycan_mass("HexNAc(2)Hex(3)"),
            dec!(406.158746) + dec!(486.158472)
        );
        assert_eq!(
            DB.glycan_mass("HexNAc(4)Hex(5)Fuc(1)NeuAc(2)").round_dp(3),
            dec!(2350.830)
        );
    }

    #[test]
    fn glycan_mass_is_order_independent() {
        let compositions = [
            "HexNAc(4)Hex(5)Fuc(1)NeuAc(2)",
            "NeuAc(2)Fuc(1)Hex(5)HexNAc(4)",
            "Hex(5)NeuAc(2)HexNAc(4)Fuc(1)",
            "Fuc(1)HexNAc(4)NeuAc(2)Hex(5)",
        ];
        let masses: Vec<_> = compositions.map(|c| DB.glycan_mass(c)).to_vec();
        assert!(masses.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn unknown_monosaccharides_are_skipped() {
        assert_eq!(DB.glycan_mass("Xyl(1)"), dec!(0));
        assert_eq!(DB.glycan_mass("Xyl(1)Hex(1)"), DB.glycan_mass("Hex(1)"));
        assert_eq!(DB.glycan_mass("hexnac(1)"), dec!(0));
    }

    #[test]
    fn unterminated_compositions_weigh_nothing() {
        assert_eq!(DB.glycan_mass("HexNAc(2"), dec!(0));
        assert_eq!(DB.glycan_mass("HexNAc(2)Hex(3"), dec!(406.158746));
        assert_eq!(DB.glycan_mass(""), dec!(0));
    }
}
