//! Versioned, read-only snapshot of the sites a source listed.

use std::collections::HashSet;

use crate::model::{Site, SiteId};
use crate::ports::PortError;

#[derive(Debug, Clone, Default)]
/// Validated list of sites, tagged with a version that changes on every reload.
pub struct Catalog {
    version: u64,
    sites: Vec<Site>,
}

#[derive(Debug, Clone, Default)]
/// Outcome of resolving a route selection against a catalog.
pub struct Resolution<'catalog> {
    /// Sites found, in selection order.
    pub sites: Vec<&'catalog Site>,
    /// Selected ids the catalog does not list, in selection order.
    pub missing: Vec<SiteId>,
}

impl Catalog {
    /// Build a catalog after checking every record and id uniqueness.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::InvalidSite`] for a record breaking an invariant and
    /// [`PortError::DuplicateSite`] when two records share an id.
    pub fn new(version: u64, sites: Vec<Site>) -> Result<Self, PortError> {
        let mut seen = HashSet::with_capacity(sites.len());
        for site in &sites {
            site.validate()?;
            if !seen.insert(&site.id) {
                return Err(PortError::DuplicateSite(site.id.clone()));
            }
        }
        Ok(Self { version, sites })
    }

    /// Version of this snapshot.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// All sites in source order.
    #[must_use]
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// Number of sites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// Whether the catalog lists no site.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Look a site up by id.
    #[must_use]
    pub fn get(&self, id: &SiteId) -> Option<&Site> {
        self.sites.iter().find(|site| &site.id == id)
    }

    /// Map selected ids onto sites, keeping order and duplicates, setting aside unknown ids.
    #[must_use]
    pub fn resolve(&self, selection: &[SiteId]) -> Resolution<'_> {
        let mut resolution = Resolution::default();
        for id in selection {
            match self.get(id) {
                Some(site) => resolution.sites.push(site),
                None => resolution.missing.push(id.clone()),
            }
        }
        resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WasteCategory;
    use crate::model::tests::site;

    fn catalog() -> Catalog {
        Catalog::new(
            1,
            vec![
                site("a", WasteCategory::Glass, 4.60, -74.08),
                site("b", WasteCategory::Metal, 4.61, -74.08),
            ],
        )
        .expect("valid catalog")
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = Catalog::new(
            1,
            vec![
                site("a", WasteCategory::Glass, 4.60, -74.08),
                site("a", WasteCategory::Metal, 4.61, -74.08),
            ],
        );
        assert!(matches!(result, Err(PortError::DuplicateSite(id)) if id.0 == "a"));
    }

    #[test]
    fn rejects_invalid_sites() {
        let mut bad = site("a", WasteCategory::Glass, 4.60, -74.08);
        bad.price_per_unit = f64::NAN;
        assert!(matches!(
            Catalog::new(1, vec![bad]),
            Err(PortError::InvalidSite { .. })
        ));
    }

    #[test]
    fn resolve_keeps_order_and_reports_missing() {
        let catalog = catalog();
        let selection = [
            SiteId::from("b"),
            SiteId::from("ghost"),
            SiteId::from("a"),
            SiteId::from("b"),
        ];

        let resolution = catalog.resolve(&selection);
        let found: Vec<&str> = resolution.sites.iter().map(|site| site.id.0.as_str()).collect();
        assert_eq!(found, vec!["b", "a", "b"]);
        assert_eq!(resolution.missing, vec![SiteId::from("ghost")]);
    }

    #[test]
    fn lookup_and_metadata() {
        let catalog = catalog();
        assert_eq!(catalog.version(), 1);
        assert_eq!(catalog.len(), 2);
        assert!(!catalog.is_empty());
        assert!(catalog.get(&SiteId::from("a")).is_some());
        assert!(catalog.get(&SiteId::from("z")).is_none());
    }
}
