//! Provider loading marketplace listings from a JSON endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use tracing::debug;

use recolecta_core::{
    model::{Coordinates, Role, Site, SiteId, Unit, WasteCategory},
    plugin::SourcePlugin,
    ports::{CatalogPort, PortError, SourceId, SourceMeta},
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Single listing as served by the marketplace API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SiteRecord {
    id: String,
    name: String,
    role: String,
    #[serde(default)]
    address: String,
    #[serde(default)]
    waste_types: Vec<String>,
    #[serde(default)]
    quantity: String,
    // required for generators, optional for every other role
    #[serde(default)]
    available_quantity: Option<f64>,
    unit: String,
    #[serde(default)]
    price_per_unit: Option<f64>,
    last_update: String,
    lat: f64,
    lng: f64,
    #[serde(default)]
    verified: bool,
    // named after the marketplace's ledger field, the value is only a display token
    #[serde(default)]
    blockchain_hash: String,
}

/// Catalog port fetching listings from an HTTP endpoint.
pub struct RemoteCatalogPort {
    client: Client,
    url: String,
    meta: SourceMeta,
}

impl RemoteCatalogPort {
    /// Create a new port bound to the given HTTP client and listings URL.
    #[must_use]
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            meta: source_meta(),
        }
    }
}

#[async_trait]
impl CatalogPort for RemoteCatalogPort {
    fn source(&self) -> &SourceMeta {
        &self.meta
    }

    async fn load(&self) -> Result<Vec<Site>, PortError> {
        let body = fetch_text(self.client.get(&self.url)).await?;
        let sites = decode_sites(&body)?;
        debug!(url = %self.url, sites = sites.len(), "decoded remote listings");
        Ok(sites)
    }
}

/// Build the plugin bundle for the remote provider.
#[must_use]
pub fn plugin(client: Client, url: impl Into<String>) -> SourcePlugin {
    SourcePlugin {
        meta: source_meta(),
        catalog_port: Arc::new(RemoteCatalogPort::new(client, url)),
    }
}

/// Identifier the remote source registers under.
#[must_use]
pub fn source_id() -> SourceId {
    SourceId(String::from("remote"))
}

fn source_meta() -> SourceMeta {
    SourceMeta {
        id: source_id(),
        name: String::from("Marketplace listings"),
    }
}

/// Decode a JSON array of listings into sites.
fn decode_sites(body: &str) -> Result<Vec<Site>, PortError> {
    let records: Vec<SiteRecord> = serde_json::from_str(body)?;
    records.into_iter().map(map_record).collect()
}

fn map_record(record: SiteRecord) -> Result<Site, PortError> {
    let waste_types = record
        .waste_types
        .iter()
        .map(|code| code.parse::<WasteCategory>())
        .collect::<Result<Vec<_>, _>>()?;

    let role = map_role(&record.role)?;
    let (available_quantity, price_per_unit) =
        match (role, record.available_quantity, record.price_per_unit) {
            (_, Some(quantity), Some(price)) => (quantity, price),
            (Role::Generator, quantity, price) => {
                let missing = [
                    quantity.is_none().then_some("availableQuantity"),
                    price.is_none().then_some("pricePerUnit"),
                ]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(", ");
                return Err(PortError::InvalidRecord(format!(
                    "generator {} is missing {missing}",
                    record.id
                )));
            }
            (_, quantity, price) => (quantity.unwrap_or(0.0), price.unwrap_or(0.0)),
        };

    Ok(Site {
        role,
        unit: map_unit(&record.unit)?,
        last_update: NaiveDate::parse_from_str(&record.last_update, DATE_FORMAT)?,
        id: SiteId(record.id),
        name: record.name,
        address: record.address,
        waste_types,
        quantity_label: record.quantity,
        available_quantity,
        price_per_unit,
        location: Coordinates::new(record.lat, record.lng),
        verified: record.verified,
        trace_token: record.blockchain_hash,
    })
}

/// Map API role strings (Spanish or English) to [`Role`].
fn map_role(raw: &str) -> Result<Role, PortError> {
    match raw.trim().to_lowercase().as_str() {
        "generator" | "generador" => Ok(Role::Generator),
        "processor" | "gestor" => Ok(Role::Processor),
        "authority" | "autoridad" => Ok(Role::Authority),
        "admin" => Ok(Role::Admin),
        _ => Err(PortError::InvalidRecord(format!("unknown role {raw}"))),
    }
}

/// Map API unit strings to [`Unit`].
fn map_unit(raw: &str) -> Result<Unit, PortError> {
    match raw.trim().to_lowercase().as_str() {
        "kg" => Ok(Unit::Kilogram),
        "l" | "lt" => Ok(Unit::Liter),
        "und" | "unidad" | "unit" => Ok(Unit::Unit),
        _ => Err(PortError::InvalidRecord(format!("unknown unit {raw}"))),
    }
}

// Fetch the body as text so decode failures surface as `PortError::Decode`.
async fn fetch_text(req: RequestBuilder) -> Result<String, PortError> {
    req.send()
        .await
        .map_err(PortError::from)?
        .error_for_status()
        .map_err(PortError::from)?
        .text()
        .await
        .map_err(PortError::from)
}
