//! Category filtering over the catalog.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{Site, WasteCategory};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Category filter chosen by the user.
pub enum CategoryFilter {
    /// No filtering.
    #[default]
    All,
    /// Sites that handle this category, primary or not.
    Only(WasteCategory),
}

impl CategoryFilter {
    /// Whether `site` passes the filter.
    #[must_use]
    pub fn matches(self, site: &Site) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => site.handles(category),
        }
    }

    /// Next filter in the cycle `All`, each category in order, back to `All`.
    #[must_use]
    pub fn next(self) -> Self {
        let position = match self {
            CategoryFilter::All => 0,
            CategoryFilter::Only(current) => WasteCategory::ALL
                .iter()
                .position(|category| *category == current)
                .map_or(0, |idx| idx + 1),
        };
        WasteCategory::ALL
            .get(position)
            .copied()
            .map_or(CategoryFilter::All, CategoryFilter::Only)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => write!(formatter, "ALL"),
            CategoryFilter::Only(category) => write!(formatter, "{category}"),
        }
    }
}

/// Sites passing `filter`, in catalog order.
#[must_use]
pub fn filter_by_category(sites: &[Site], filter: CategoryFilter) -> Vec<&Site> {
    sites.iter().filter(|site| filter.matches(site)).collect()
}
