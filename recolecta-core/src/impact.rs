//! Avoided and incurred CO2 for collected material and truck travel.

use crate::calibration::{CalcError, Calibration};
use crate::model::WasteCategory;

/// kg CO2e avoided by diverting `quantity` units of `category`.
///
/// # Errors
///
/// Returns [`CalcError::UnknownCategory`] when the calibration has no factor for the category.
pub fn avoided_co2(
    category: WasteCategory,
    quantity: f64,
    calibration: &Calibration,
) -> Result<f64, CalcError> {
    Ok(quantity * calibration.emission_factor(category)?)
}

/// kg CO2 emitted driving `distance_km`.
#[must_use]
pub fn transport_emissions(distance_km: f64, calibration: &Calibration) -> f64 {
    distance_km * calibration.truck_emission_per_km
}
