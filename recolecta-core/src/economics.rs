//! Pricing regimes deciding who pays whom for a collected category.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calibration::{CalcError, Calibration};
use crate::model::WasteCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Direction of payment between generator and processor.
pub enum EconomicKind {
    /// The processor pays the generator for the material.
    Revenue,
    /// Material changes hands without payment.
    Free,
    /// The generator pays the processor to take the material.
    Cost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Display sign of a regime, from the generator's point of view.
pub enum Sign {
    /// Generator receives money.
    Plus,
    /// Generator pays money.
    Minus,
    /// No money moves.
    None,
}

impl fmt::Display for Sign {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Sign::Plus => "+",
            Sign::Minus => "-",
            Sign::None => "",
        };
        write!(formatter, "{symbol}")
    }
}

impl EconomicKind {
    /// Label shown on listing cards.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            EconomicKind::Revenue => "Processor pays",
            EconomicKind::Free => "Free pickup",
            EconomicKind::Cost => "Generator pays",
        }
    }

    /// Display sign.
    #[must_use]
    pub fn sign(self) -> Sign {
        match self {
            EconomicKind::Revenue => Sign::Plus,
            EconomicKind::Free => Sign::None,
            EconomicKind::Cost => Sign::Minus,
        }
    }

    /// Hex display color.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            EconomicKind::Revenue => "#16a34a",
            EconomicKind::Free => "#2563eb",
            EconomicKind::Cost => "#dc2626",
        }
    }
}

/// Reference regime for each category.
#[must_use]
pub fn default_economic_kind(category: WasteCategory) -> EconomicKind {
    match category {
        WasteCategory::Glass
        | WasteCategory::Plastic
        | WasteCategory::Cardboard
        | WasteCategory::Metal => EconomicKind::Revenue,
        WasteCategory::Organic | WasteCategory::Textile => EconomicKind::Free,
        WasteCategory::CookingOil | WasteCategory::Electronic => EconomicKind::Cost,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
/// Resolved regime with its display attributes.
pub struct EconomicModel {
    /// Payment direction, the only field arithmetic looks at.
    pub kind: EconomicKind,
    /// Card label.
    pub label: &'static str,
    /// Display sign.
    pub sign: Sign,
    /// Hex display color.
    pub color: &'static str,
}

impl From<EconomicKind> for EconomicModel {
    fn from(kind: EconomicKind) -> Self {
        Self {
            kind,
            label: kind.label(),
            sign: kind.sign(),
            color: kind.color(),
        }
    }
}

/// Resolve the pricing regime for `category` from the calibration tables.
///
/// # Errors
///
/// Returns [`CalcError::UnknownCategory`] when the calibration does not map the category.
pub fn resolve_economic_model(
    category: WasteCategory,
    calibration: &Calibration,
) -> Result<EconomicModel, CalcError> {
    calibration.economic_kind(category).map(EconomicModel::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_resolves() {
        let calibration = Calibration::default();
        for category in WasteCategory::ALL {
            let model = resolve_economic_model(category, &calibration)
                .expect("default calibration covers every category");
            assert_eq!(model.kind, default_economic_kind(category));
        }
    }

    #[test]
    fn resolution_is_stable() {
        let calibration = Calibration::default();
        for category in WasteCategory::ALL {
            let first = resolve_economic_model(category, &calibration).ok();
            let second = resolve_economic_model(category, &calibration).ok();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn reference_regimes() {
        assert_eq!(default_economic_kind(WasteCategory::CookingOil), EconomicKind::Cost);
        assert_eq!(default_economic_kind(WasteCategory::Glass), EconomicKind::Revenue);
        assert_eq!(default_economic_kind(WasteCategory::Organic), EconomicKind::Free);
    }

    #[test]
    fn display_attributes_follow_kind() {
        let model = EconomicModel::from(EconomicKind::Cost);
        assert_eq!(model.sign, Sign::Minus);
        assert_eq!(model.sign.to_string(), "-");
        assert_eq!(model.label, "Generator pays");
        assert_eq!(EconomicModel::from(EconomicKind::Free).sign.to_string(), "");
    }

    #[test]
    fn unmapped_category_fails() {
        let mut calibration = Calibration::default();
        calibration.economic_models.remove(&WasteCategory::Metal);
        assert_eq!(
            resolve_economic_model(WasteCategory::Metal, &calibration),
            Err(CalcError::UnknownCategory(WasteCategory::Metal))
        );
    }
}
