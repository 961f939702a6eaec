//! Folds an ordered route into distance, cost, material balance, and CO2 figures.

use serde::Serialize;
use tracing::debug;

use crate::calibration::{CalcError, Calibration};
use crate::economics::{EconomicKind, resolve_economic_model};
use crate::geo::path_distance_km;
use crate::impact::{avoided_co2, transport_emissions};
use crate::model::{Coordinates, Site};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
/// Unrounded aggregate figures for a route.
pub struct RouteMetrics {
    /// Number of sites folded into the figures.
    pub site_count: usize,
    /// Sum of leg distances in visiting order, km.
    pub distance_km: f64,
    /// Distance times the per-km rate, COP.
    pub base_cost: f64,
    /// Whether the route passed the site-count threshold for the volume discount.
    pub discounted: bool,
    /// Amount taken off the base cost by the volume discount, COP.
    pub discount: f64,
    /// Base cost minus discount, COP.
    pub logistics_cost: f64,
    /// Revenue paid out to generators minus fees collected from them, COP.
    pub material_balance: f64,
    /// kg CO2e avoided by the collected material.
    pub gross_avoided_co2: f64,
    /// kg CO2 emitted by the truck.
    pub transport_co2: f64,
    /// Avoided minus transport emissions; negative when the trip costs more than it saves.
    pub net_esg_impact: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
/// Route figures rounded to display precision.
pub struct RoundedMetrics {
    /// Number of sites.
    pub site_count: usize,
    /// km, 2 decimals.
    pub distance_km: f64,
    /// Whole COP.
    pub base_cost: f64,
    /// Volume discount applied.
    pub discounted: bool,
    /// Whole COP.
    pub discount: f64,
    /// Whole COP.
    pub logistics_cost: f64,
    /// Whole COP.
    pub material_balance: f64,
    /// kg, 1 decimal.
    pub gross_avoided_co2: f64,
    /// kg, 1 decimal.
    pub transport_co2: f64,
    /// kg, 1 decimal.
    pub net_esg_impact: f64,
}

impl RouteMetrics {
    /// Whether the volume discount was applied.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.discounted
    }

    /// Round every figure to its display precision.
    ///
    /// The stored figures stay untouched, so formatting twice never compounds error.
    #[must_use]
    pub fn rounded(&self) -> RoundedMetrics {
        RoundedMetrics {
            site_count: self.site_count,
            distance_km: round_to(self.distance_km, 2),
            base_cost: round_to(self.base_cost, 0),
            discounted: self.discounted,
            discount: round_to(self.discount, 0),
            logistics_cost: round_to(self.logistics_cost, 0),
            material_balance: round_to(self.material_balance, 0),
            gross_avoided_co2: round_to(self.gross_avoided_co2, 1),
            transport_co2: round_to(self.transport_co2, 1),
            net_esg_impact: round_to(self.net_esg_impact, 1),
        }
    }
}

/// Round half away from zero to `places` decimals.
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10_f64.powi(places);
    // adding 0.0 turns -0.0 into 0.0
    (value * scale).round() / scale + 0.0
}

/// Compute route figures for `sites` in the given visiting order.
///
/// Fewer than two sites yields all-zero metrics. The order is respected as
/// given; no resequencing is attempted.
///
/// # Errors
///
/// Returns [`CalcError::UnknownCategory`] when a site's primary category is missing
/// from the calibration tables.
pub fn compute_route_metrics(
    sites: &[&Site],
    calibration: &Calibration,
) -> Result<RouteMetrics, CalcError> {
    if sites.len() < 2 {
        return Ok(RouteMetrics::default());
    }

    let path: Vec<Coordinates> = sites.iter().map(|site| site.location).collect();
    let distance = path_distance_km(&path);

    let base_cost = distance * calibration.logistics_rate_per_km;
    let logistics_cost = base_cost * calibration.discount_multiplier(sites.len());

    let mut material_balance = 0.0;
    let mut gross_avoided_co2 = 0.0;
    for site in sites {
        let (balance, avoided) = site_contribution(site, calibration)?;
        material_balance += balance;
        gross_avoided_co2 += avoided;
    }

    let transport_co2 = transport_emissions(distance, calibration);

    let metrics = RouteMetrics {
        site_count: sites.len(),
        distance_km: distance,
        base_cost,
        discounted: calibration.qualifies_for_discount(sites.len()),
        discount: base_cost - logistics_cost,
        logistics_cost,
        material_balance,
        gross_avoided_co2,
        transport_co2,
        net_esg_impact: gross_avoided_co2 - transport_co2,
    };
    debug!(?metrics, "computed route metrics");
    Ok(metrics)
}

/// Balance and avoided CO2 contributed by one site, from its primary category only.
fn site_contribution(site: &Site, calibration: &Calibration) -> Result<(f64, f64), CalcError> {
    let Some(category) = site.primary_category() else {
        return Ok((0.0, 0.0));
    };

    let balance = match resolve_economic_model(category, calibration)?.kind {
        EconomicKind::Revenue => site.material_value(),
        EconomicKind::Cost => -site.material_value(),
        EconomicKind::Free => 0.0,
    };
    let avoided = avoided_co2(category, site.available_quantity, calibration)?;

    Ok((balance, avoided))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::site;
    use crate::model::{Role, Unit, WasteCategory};

    fn reference_pair() -> (Site, Site) {
        let mut oil = site("A", WasteCategory::CookingOil, 4.6097, -74.0817);
        oil.available_quantity = 20.0;
        oil.unit = Unit::Liter;
        oil.price_per_unit = 5000.0;

        let mut glass = site("B", WasteCategory::Glass, 4.6322, -74.0817);
        glass.available_quantity = 45.0;
        glass.unit = Unit::Unit;
        glass.price_per_unit = 200.0;

        (oil, glass)
    }

    #[test]
    fn empty_and_single_site_routes_are_zero() {
        let calibration = Calibration::default();
        let (oil, _) = reference_pair();

        let empty = compute_route_metrics(&[], &calibration).expect("empty route");
        assert_eq!(empty, RouteMetrics::default());

        let single = compute_route_metrics(&[&oil], &calibration).expect("single site");
        assert_eq!(single, RouteMetrics::default());
        assert_eq!(single.site_count, 0);
    }

    #[test]
    fn reference_pair_end_to_end() {
        let calibration = Calibration::default();
        let (oil, glass) = reference_pair();

        let metrics = compute_route_metrics(&[&oil, &glass], &calibration).expect("metrics");

        assert_eq!(metrics.site_count, 2);
        assert!((metrics.distance_km - 2.5).abs() < 0.1, "distance {}", metrics.distance_km);
        assert!((metrics.base_cost - 6250.0).abs() < 250.0, "cost {}", metrics.base_cost);
        assert!(!metrics.is_discounted());
        assert!((metrics.logistics_cost - metrics.base_cost).abs() < f64::EPSILON);
        assert!((metrics.material_balance - -91_000.0).abs() < 1e-6);
        assert!((metrics.gross_avoided_co2 - 37.5).abs() < 1e-9);
        assert!((metrics.transport_co2 - 0.625).abs() < 0.03);

        let rounded = metrics.rounded();
        assert!((rounded.net_esg_impact - 36.9).abs() < 1e-9);
        assert!((rounded.material_balance - -91_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn order_is_respected() {
        let calibration = Calibration::default();
        let first = site("1", WasteCategory::Glass, 4.60, -74.08);
        let second = site("2", WasteCategory::Glass, 4.70, -74.08);
        let third = site("3", WasteCategory::Glass, 4.61, -74.08);

        let zigzag = compute_route_metrics(&[&first, &second, &third], &calibration)
            .expect("zigzag");
        let straight = compute_route_metrics(&[&first, &third, &second], &calibration)
            .expect("straight");

        assert!(zigzag.distance_km > straight.distance_km);
        assert!((zigzag.material_balance - straight.material_balance).abs() < 1e-9);
    }

    #[test]
    fn discount_applies_only_above_threshold() {
        let calibration = Calibration::default();
        let first = site("1", WasteCategory::Plastic, 4.60, -74.08);
        let second = site("2", WasteCategory::Plastic, 4.62, -74.08);
        let third = site("3", WasteCategory::Plastic, 4.64, -74.08);

        let pair = compute_route_metrics(&[&first, &second], &calibration).expect("pair");
        assert!((pair.logistics_cost - pair.distance_km * 2500.0).abs() < 1e-6);

        let trio = compute_route_metrics(&[&first, &second, &third], &calibration).expect("trio");
        assert!(trio.is_discounted());
        assert!((trio.logistics_cost - 0.9 * trio.distance_km * 2500.0).abs() < 1e-6);
        assert!((trio.discount - 0.1 * trio.base_cost).abs() < 1e-6);
    }

    #[test]
    fn third_site_beats_linear_extension() {
        let calibration = Calibration::default();
        let first = site("1", WasteCategory::Metal, 4.60, -74.08);
        let second = site("2", WasteCategory::Metal, 4.62, -74.06);
        let third = site("3", WasteCategory::Metal, 4.65, -74.05);

        let trio = compute_route_metrics(&[&first, &second, &third], &calibration).expect("trio");
        let undiscounted = trio.distance_km * calibration.logistics_rate_per_km;
        assert!(trio.logistics_cost < undiscounted);
    }

    #[test]
    fn discount_flag_follows_site_count_not_amount() {
        let calibration = Calibration::default();
        let first = site("1", WasteCategory::Glass, 4.60, -74.08);
        let second = site("2", WasteCategory::Glass, 4.60, -74.08);
        let third = site("3", WasteCategory::Glass, 4.60, -74.08);

        let stacked = compute_route_metrics(&[&first, &second, &third], &calibration)
            .expect("stacked");
        assert!(stacked.distance_km.abs() < f64::EPSILON);
        assert!(stacked.is_discounted());
        assert!(stacked.rounded().discounted);

        let mut no_rate = Calibration::default();
        no_rate.discount_rate = 0.0;
        let spread = site("4", WasteCategory::Glass, 4.65, -74.08);
        let flat = compute_route_metrics(&[&first, &second, &spread], &no_rate).expect("flat");
        assert!(flat.is_discounted());
        assert!(flat.discount.abs() < f64::EPSILON);
    }

    #[test]
    fn free_regime_contributes_nothing_to_balance() {
        let calibration = Calibration::default();
        let compost = site("1", WasteCategory::Organic, 4.60, -74.08);
        let clothes = site("2", WasteCategory::Textile, 4.61, -74.08);

        let metrics = compute_route_metrics(&[&compost, &clothes], &calibration).expect("metrics");
        assert!(metrics.material_balance.abs() < f64::EPSILON);
        assert!(metrics.gross_avoided_co2 > 0.0);
    }

    #[test]
    fn accounting_uses_primary_category_only() {
        let calibration = Calibration::default();
        let mut mixed = site("1", WasteCategory::Glass, 4.60, -74.08);
        mixed.waste_types.push(WasteCategory::CookingOil);
        let other = site("2", WasteCategory::Organic, 4.61, -74.08);

        let metrics = compute_route_metrics(&[&mixed, &other], &calibration).expect("metrics");
        assert!((metrics.material_balance - mixed.material_value()).abs() < 1e-9);
    }

    #[test]
    fn sites_without_category_are_neutral() {
        let calibration = Calibration::default();
        let mut plant = site("P", WasteCategory::Glass, 4.60, -74.08);
        plant.role = Role::Processor;
        plant.waste_types.clear();
        let glass = site("1", WasteCategory::Glass, 4.61, -74.08);

        let metrics = compute_route_metrics(&[&plant, &glass], &calibration).expect("metrics");
        assert!((metrics.material_balance - glass.material_value()).abs() < 1e-9);
        assert!((metrics.gross_avoided_co2 - 3.0).abs() < 1e-9);
    }

    #[test]
    fn net_impact_can_go_negative() {
        let calibration = Calibration::default();
        let mut near = site("1", WasteCategory::Glass, 4.60, -74.08);
        near.available_quantity = 1.0;
        let mut far = site("2", WasteCategory::Glass, 10.96, -74.80);
        far.available_quantity = 1.0;

        let metrics = compute_route_metrics(&[&near, &far], &calibration).expect("metrics");
        let expected = metrics.gross_avoided_co2 - metrics.distance_km * 0.25;
        assert!((metrics.net_esg_impact - expected).abs() < 1e-9);
        assert!(metrics.net_esg_impact < 0.0);
    }

    #[test]
    fn missing_calibration_entry_fails_fast() {
        let mut calibration = Calibration::default();
        calibration.economic_models.remove(&WasteCategory::Glass);
        let first = site("1", WasteCategory::Glass, 4.60, -74.08);
        let second = site("2", WasteCategory::Glass, 4.61, -74.08);

        assert_eq!(
            compute_route_metrics(&[&first, &second], &calibration),
            Err(CalcError::UnknownCategory(WasteCategory::Glass))
        );
    }

    #[test]
    fn rounding_policy() {
        assert!((round_to(2.345_67, 2) - 2.35).abs() < 1e-12);
        assert!((round_to(6254.5, 0) - 6255.0).abs() < f64::EPSILON);
        assert!((round_to(36.874, 1) - 36.9).abs() < 1e-12);
        assert_eq!(round_to(-0.04, 1).to_bits(), 0.0_f64.to_bits());
    }

    #[test]
    fn rounding_does_not_touch_stored_values() {
        let calibration = Calibration::default();
        let (oil, glass) = reference_pair();
        let metrics = compute_route_metrics(&[&oil, &glass], &calibration).expect("metrics");

        let once = metrics.rounded();
        let twice = metrics.rounded();
        assert_eq!(once, twice);
        assert!((metrics.distance_km - once.distance_km).abs() > 0.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn discount_is_a_step_on_site_count(count in 0_usize..12) {
                let calibration = Calibration::default();
                let sites: Vec<Site> = (0..count)
                    .map(|idx| {
                        let offset = f64::from(u32::try_from(idx).unwrap_or_default()) * 0.01;
                        site(&idx.to_string(), WasteCategory::Cardboard, 4.6 + offset, -74.08)
                    })
                    .collect();
                let refs: Vec<&Site> = sites.iter().collect();

                let metrics = compute_route_metrics(&refs, &calibration).expect("metrics");
                if count > 2 {
                    prop_assert!(metrics.is_discounted());
                    prop_assert!((metrics.logistics_cost - 0.9 * metrics.base_cost).abs() < 1e-6);
                } else {
                    prop_assert!(!metrics.is_discounted());
                    prop_assert!((metrics.logistics_cost - metrics.base_cost).abs() < 1e-9);
                }
            }
        }
    }
}
