//! Traits describing catalog sources and the errors they report.

use std::fmt;

use async_trait::async_trait;
use chrono::ParseError as ChronoParseError;
use reqwest::Error as ReqwestError;
use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;

use crate::model::{Site, SiteId};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while loading a catalog from a source.
pub enum PortError {
    /// Network layer failed.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// Failed to parse a date from a record.
    #[error("Parse error: {0}")]
    Parse(#[from] ChronoParseError),
    /// Payload could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] JsonError),
    /// A record used a waste category code outside the known set.
    #[error("Unknown waste category: {0}")]
    UnknownCategory(String),
    /// A record could not be mapped onto a site.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    /// A site broke a record invariant.
    #[error("Invalid site {id}: {reason}")]
    InvalidSite {
        /// Offending site.
        id: SiteId,
        /// What was wrong with it.
        reason: String,
    },
    /// Two records share the same identifier.
    #[error("Duplicate site id: {0}")]
    DuplicateSite(SiteId),
    /// No source is registered under the requested identifier.
    #[error("Unsupported source")]
    UnsupportedSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier for a catalog source.
pub struct SourceId(pub String);

impl fmt::Display for SourceId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Metadata describing a catalog source.
pub struct SourceMeta {
    /// Unique identifier.
    pub id: SourceId,
    /// Display name.
    pub name: String,
}

#[async_trait]
/// Trait for backends that supply the site catalog.
pub trait CatalogPort: Send + Sync {
    /// Metadata describing this source.
    fn source(&self) -> &SourceMeta;

    /// Load every site the source currently lists.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the source cannot be reached or a record is malformed.
    async fn load(&self) -> Result<Vec<Site>, PortError>;
}
