//! Registry for all catalog sources and their ports.

use std::collections::HashMap;
use std::sync::Arc;

use crate::ports::{CatalogPort, PortError, SourceId, SourceMeta};

/// A catalog source bundled with its metadata.
pub struct SourcePlugin {
    /// Static metadata describing the source.
    pub meta: SourceMeta,
    /// Implementation for loading the catalog.
    pub catalog_port: Arc<dyn CatalogPort>,
}

/// Registry that resolves plugins by source identifier.
pub struct SourceRegistry {
    plugins: HashMap<SourceId, SourcePlugin>,
}

impl SourceRegistry {
    /// Build a registry from the provided plugin list.
    #[must_use]
    pub fn new(plugins: Vec<SourcePlugin>) -> Self {
        let plugins_map = plugins
            .into_iter()
            .map(|plugin| (plugin.meta.id.clone(), plugin))
            .collect();
        Self {
            plugins: plugins_map,
        }
    }

    /// Return metadata for all registered sources, sorted by display name.
    #[must_use]
    pub fn sources(&self) -> Vec<SourceMeta> {
        let mut sources: Vec<SourceMeta> = self
            .plugins
            .values()
            .map(|plugin| plugin.meta.clone())
            .collect();
        sources.sort_by(|left, right| left.name.cmp(&right.name));
        sources
    }

    /// Look up a plugin for the given source.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::UnsupportedSource`] when no plugin is registered.
    pub fn plugin(&self, source: &SourceId) -> Result<&SourcePlugin, PortError> {
        self.plugins.get(source).ok_or(PortError::UnsupportedSource)
    }
}
