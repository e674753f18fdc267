//! Isotope and unit catalogs.
//!
//! Measurement results are only accepted when their isotope and unit appear
//! in these fixed lists, which are compiled into the binary. The lists must
//! stay in sync with the document schema of the deployed database.

use std::{collections::HashSet, sync::OnceLock};

/// Raw comma-separated isotope catalog.
const ISOTOPES_CSV: &str = include_str!("../data/isotopes.csv");

/// Raw comma-separated unit catalog.
const UNITS_CSV: &str = include_str!("../data/units.csv");

/// Splits a one-line comma-separated catalog file.
fn parse_catalog(raw: &'static str) -> HashSet<&'static str> {
    raw.trim().split(',').map(str::trim).collect()
}

/// Returns the set of recognized isotope names.
pub fn isotopes() -> &'static HashSet<&'static str> {
    static ISOTOPES: OnceLock<HashSet<&'static str>> = OnceLock::new();
    ISOTOPES.get_or_init(|| parse_catalog(ISOTOPES_CSV))
}

/// Returns the set of recognized measurement units.
pub fn units() -> &'static HashSet<&'static str> {
    static UNITS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    UNITS.get_or_init(|| parse_catalog(UNITS_CSV))
}

/// Checks whether `name` is a recognized isotope.
pub fn is_isotope(name: &str) -> bool {
    isotopes().contains(name)
}

/// Checks whether `name` is a recognized measurement unit.
pub fn is_unit(name: &str) -> bool {
    units().contains(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_isotopes() {
        assert!(is_isotope("K-40"));
        assert!(is_isotope("U-238"));
        assert!(!is_isotope("K40"));
        assert!(!is_isotope("potassium"));
    }

    #[test]
    fn known_units() {
        assert!(is_unit("ppm"));
        assert!(is_unit("mBq/kg"));
        assert!(!is_unit("parsecs"));
    }

    #[test]
    fn catalogs_nonempty() {
        assert!(isotopes().len() > 10);
        assert!(units().len() > 10);
    }
}
