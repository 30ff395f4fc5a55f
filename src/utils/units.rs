//! Unit Conversion
//!
//! Converts upstream masses (hectograms) into animal crackers.
//! No rounding happens here; formatting is a display concern.

use crate::error::{CalcError, CalcResult};

/// Average weight of an animal cracker in grams
pub const DEFAULT_CRACKER_WEIGHT_G: f64 = 2.0;

const GRAMS_PER_HECTOGRAM: f64 = 10.0;

/// Check a reference unit mass. Non-positive or non-finite values are fatal.
pub fn validate_unit_mass(unit_mass_g: f64) -> CalcResult<()> {
    if !unit_mass_g.is_finite() || unit_mass_g <= 0.0 {
        return Err(CalcError::InvalidConfiguration(format!(
            "unit mass must be a positive number of grams, got {}",
            unit_mass_g
        )));
    }
    Ok(())
}

/// Mass in hectograms → equivalent count of `unit_mass_g`-gram units.
///
/// `grams = mass_hg * 10`, `units = grams / unit_mass_g`.
pub fn to_novelty_units(mass_hg: f64, unit_mass_g: f64) -> CalcResult<f64> {
    validate_unit_mass(unit_mass_g)?;
    if !mass_hg.is_finite() || mass_hg < 0.0 {
        return Err(CalcError::MalformedRecord(format!(
            "mass must be a finite, non-negative number of hectograms, got {}",
            mass_hg
        )));
    }

    let mass_g = mass_hg * GRAMS_PER_HECTOGRAM;
    Ok(mass_g / unit_mass_g)
}

/// Hectograms to kilograms, for display.
pub fn mass_kg(mass_hg: f64) -> f64 {
    mass_hg / 10.0
}
