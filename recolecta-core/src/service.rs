//! High-level service facade used by presentation clients.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::calibration::{CalcError, Calibration};
use crate::catalog::Catalog;
use crate::economics::{EconomicModel, resolve_economic_model};
use crate::filter::{CategoryFilter, filter_by_category};
use crate::metrics::{RouteMetrics, compute_route_metrics};
use crate::model::{Site, SiteId, WasteCategory};
use crate::plugin::SourceRegistry;
use crate::ports::{PortError, SourceId};

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Metrics for a selection plus the ids that had to be dropped.
pub struct RoutePlan {
    /// Figures for the sites that resolved.
    pub metrics: RouteMetrics,
    /// Selected ids absent from the catalog, in selection order.
    pub skipped: Vec<SiteId>,
    /// Catalog version the plan was computed against.
    pub catalog_version: u64,
}

/// Public entry point for loading catalogs and planning routes.
pub struct PlannerService {
    registry: Arc<SourceRegistry>,
    calibration: Calibration,
}

impl PlannerService {
    /// Create a new service bound to the provided registry and calibration.
    #[must_use]
    pub fn new(registry: Arc<SourceRegistry>, calibration: Calibration) -> Self {
        Self {
            registry,
            calibration,
        }
    }

    /// Calibration used for every computation.
    #[must_use]
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// List all available sources and their display names.
    #[must_use]
    pub fn sources(&self) -> Vec<(SourceId, String)> {
        self.registry
            .sources()
            .into_iter()
            .map(|meta| (meta.id, meta.name))
            .collect()
    }

    /// Load a fresh catalog snapshot from `source`.
    ///
    /// The returned catalog's version is `previous_version + 1`.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the source is unsupported, the load fails,
    /// or the loaded records are invalid.
    pub async fn load_catalog(
        &self,
        source: &SourceId,
        previous_version: u64,
    ) -> Result<Catalog, PortError> {
        let plugin = self.registry.plugin(source)?;
        let sites = plugin.catalog_port.load().await?;
        let catalog = Catalog::new(previous_version.saturating_add(1), sites)?;
        info!(
            source = %source,
            version = catalog.version(),
            sites = catalog.len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    /// Sites of `catalog` passing `filter`, in catalog order.
    #[must_use]
    pub fn filter<'catalog>(
        &self,
        catalog: &'catalog Catalog,
        filter: CategoryFilter,
    ) -> Vec<&'catalog Site> {
        filter_by_category(catalog.sites(), filter)
    }

    /// Compute metrics for `selection` visited in order.
    ///
    /// Ids the catalog does not list are left out of the computation and
    /// returned in [`RoutePlan::skipped`].
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::UnknownCategory`] when the calibration lacks an entry
    /// for a selected site's primary category.
    pub fn plan_route(
        &self,
        catalog: &Catalog,
        selection: &[SiteId],
    ) -> Result<RoutePlan, CalcError> {
        let resolution = catalog.resolve(selection);
        for id in &resolution.missing {
            warn!(
                site = %id,
                catalog_version = catalog.version(),
                "selected site is not in the catalog, skipping"
            );
        }

        let metrics = compute_route_metrics(&resolution.sites, &self.calibration)?;
        Ok(RoutePlan {
            metrics,
            skipped: resolution.missing,
            catalog_version: catalog.version(),
        })
    }

    /// Pricing regime for `category` under the service calibration.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::UnknownCategory`] when the calibration does not map the category.
    pub fn economic_model(&self, category: WasteCategory) -> Result<EconomicModel, CalcError> {
        resolve_economic_model(category, &self.calibration)
    }
}
