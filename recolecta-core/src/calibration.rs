//! Tunable pricing and emission tables used by the route metrics engine.
//!
//! Defaults carry the reference calibration. A JSON file may override any
//! subset of them; map entries are merged over the defaults key by key.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::economics::{EconomicKind, default_economic_kind};
use crate::model::WasteCategory;

/// Logistics cost per kilometer driven, in COP.
pub const DEFAULT_LOGISTICS_RATE_PER_KM: f64 = 2500.0;
/// kg CO2 emitted per kilometer by a light-duty diesel truck.
pub const DEFAULT_TRUCK_EMISSION_PER_KM: f64 = 0.25;
/// Routes with more sites than this get the volume discount.
pub const DEFAULT_DISCOUNT_THRESHOLD: usize = 2;
/// Fraction taken off the logistics cost once the threshold is passed.
pub const DEFAULT_DISCOUNT_RATE: f64 = 0.10;

/// kg CO2e avoided per declared unit of `category` diverted from disposal.
#[must_use]
pub fn default_emission_factor(category: WasteCategory) -> f64 {
    match category {
        WasteCategory::CookingOil => 1.2,
        WasteCategory::Glass => 0.3,
        WasteCategory::Plastic => 1.5,
        WasteCategory::Cardboard => 0.9,
        WasteCategory::Metal => 4.0,
        WasteCategory::Organic => 0.5,
        WasteCategory::Electronic => 2.0,
        WasteCategory::Textile => 3.0,
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Errors raised while computing metrics.
pub enum CalcError {
    /// The calibration has no entry for the category.
    #[error("No calibration entry for waste category {0}")]
    UnknownCategory(WasteCategory),
}

#[derive(thiserror::Error, Debug)]
/// Errors raised while loading calibration overrides.
pub enum CalibrationError {
    /// Reading the overrides file failed.
    #[error("Could not read calibration file: {0}")]
    Io(#[from] std::io::Error),
    /// The overrides were not valid JSON for this schema.
    #[error("Could not decode calibration: {0}")]
    Decode(#[from] serde_json::Error),
    /// A value was out of range.
    #[error("Invalid calibration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Complete set of calibration tables and scalars.
pub struct Calibration {
    /// kg CO2e avoided per unit, per category.
    pub emission_factors: HashMap<WasteCategory, f64>,
    /// Pricing regime per category.
    pub economic_models: HashMap<WasteCategory, EconomicKind>,
    /// COP per kilometer driven.
    pub logistics_rate_per_km: f64,
    /// kg CO2 per kilometer driven.
    pub truck_emission_per_km: f64,
    /// Discount applies when the route has strictly more sites than this.
    pub discount_threshold: usize,
    /// Fraction in `[0, 1]` taken off the logistics cost.
    pub discount_rate: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            emission_factors: WasteCategory::ALL
                .into_iter()
                .map(|category| (category, default_emission_factor(category)))
                .collect(),
            economic_models: WasteCategory::ALL
                .into_iter()
                .map(|category| (category, default_economic_kind(category)))
                .collect(),
            logistics_rate_per_km: DEFAULT_LOGISTICS_RATE_PER_KM,
            truck_emission_per_km: DEFAULT_TRUCK_EMISSION_PER_KM,
            discount_threshold: DEFAULT_DISCOUNT_THRESHOLD,
            discount_rate: DEFAULT_DISCOUNT_RATE,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CalibrationOverrides {
    emission_factors: HashMap<WasteCategory, f64>,
    economic_models: HashMap<WasteCategory, EconomicKind>,
    logistics_rate_per_km: Option<f64>,
    truck_emission_per_km: Option<f64>,
    discount_threshold: Option<usize>,
    discount_rate: Option<f64>,
}

impl Calibration {
    /// Apply JSON overrides on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::Decode`] for malformed JSON or unknown keys and
    /// [`CalibrationError::Invalid`] when a value is out of range.
    pub fn from_json_str(json: &str) -> Result<Self, CalibrationError> {
        let overrides: CalibrationOverrides = serde_json::from_str(json)?;
        let mut calibration = Self::default();

        calibration.emission_factors.extend(overrides.emission_factors);
        calibration.economic_models.extend(overrides.economic_models);
        if let Some(rate) = overrides.logistics_rate_per_km {
            calibration.logistics_rate_per_km = rate;
        }
        if let Some(factor) = overrides.truck_emission_per_km {
            calibration.truck_emission_per_km = factor;
        }
        if let Some(threshold) = overrides.discount_threshold {
            calibration.discount_threshold = threshold;
        }
        if let Some(rate) = overrides.discount_rate {
            calibration.discount_rate = rate;
        }

        calibration.validate()?;
        Ok(calibration)
    }

    /// Load overrides from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::Io`] when the file cannot be read, otherwise see
    /// [`Calibration::from_json_str`].
    pub fn from_path(path: &Path) -> Result<Self, CalibrationError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check every scalar and factor is in range.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), CalibrationError> {
        let non_negative = |value: f64| value.is_finite() && value >= 0.0;

        if !non_negative(self.logistics_rate_per_km) {
            return Err(CalibrationError::Invalid(format!(
                "logistics_rate_per_km must be non-negative, got {}",
                self.logistics_rate_per_km
            )));
        }
        if !non_negative(self.truck_emission_per_km) {
            return Err(CalibrationError::Invalid(format!(
                "truck_emission_per_km must be non-negative, got {}",
                self.truck_emission_per_km
            )));
        }
        if !(0.0..=1.0).contains(&self.discount_rate) {
            return Err(CalibrationError::Invalid(format!(
                "discount_rate must be within [0, 1], got {}",
                self.discount_rate
            )));
        }
        if let Some((category, factor)) = self
            .emission_factors
            .iter()
            .find(|(_, factor)| !(factor.is_finite() && **factor > 0.0))
        {
            return Err(CalibrationError::Invalid(format!(
                "emission factor for {category} must be positive, got {factor}"
            )));
        }
        Ok(())
    }

    /// Emission factor configured for `category`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::UnknownCategory`] when the table has no entry.
    pub fn emission_factor(&self, category: WasteCategory) -> Result<f64, CalcError> {
        self.emission_factors
            .get(&category)
            .copied()
            .ok_or(CalcError::UnknownCategory(category))
    }

    /// Pricing regime configured for `category`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::UnknownCategory`] when the table has no entry.
    pub fn economic_kind(&self, category: WasteCategory) -> Result<EconomicKind, CalcError> {
        self.economic_models
            .get(&category)
            .copied()
            .ok_or(CalcError::UnknownCategory(category))
    }

    /// Whether a route of `site_count` sites earns the volume discount.
    #[must_use]
    pub fn qualifies_for_discount(&self, site_count: usize) -> bool {
        site_count > self.discount_threshold
    }

    /// Multiplier applied to the base logistics cost for a route of `site_count` sites.
    #[must_use]
    pub fn discount_multiplier(&self, site_count: usize) -> f64 {
        if self.qualifies_for_discount(site_count) {
            1.0 - self.discount_rate
        } else {
            1.0
        }
    }
}
