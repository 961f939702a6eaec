//! Provider serving the built-in Bogotá seed catalog.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use recolecta_core::{
    model::{Coordinates, Role, Site, SiteId, Unit, WasteCategory},
    plugin::SourcePlugin,
    ports::{CatalogPort, PortError, SourceId, SourceMeta},
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Static listing, converted into a [`Site`] on load.
struct SeedRecord {
    id: &'static str,
    name: &'static str,
    role: Role,
    address: &'static str,
    waste_types: &'static [WasteCategory],
    quantity_label: &'static str,
    available_quantity: f64,
    unit: Unit,
    price_per_unit: f64,
    last_update: &'static str,
    lat: f64,
    lon: f64,
    verified: bool,
    trace_token: &'static str,
}

const SEED: &[SeedRecord] = &[
    SeedRecord {
        id: "gen-001",
        name: "Restaurante La Candelaria",
        role: Role::Generator,
        address: "Calle 11 # 4-21, La Candelaria",
        waste_types: &[WasteCategory::CookingOil],
        quantity_label: "20 L / semana",
        available_quantity: 20.0,
        unit: Unit::Liter,
        price_per_unit: 5000.0,
        last_update: "2024-05-02",
        lat: 4.6097,
        lon: -74.0817,
        verified: true,
        trace_token: "0x7f3a91c2e4b8",
    },
    SeedRecord {
        id: "gen-002",
        name: "Hotel Teusaquillo",
        role: Role::Generator,
        address: "Carrera 17 # 36-40, Teusaquillo",
        waste_types: &[WasteCategory::Glass, WasteCategory::Cardboard],
        quantity_label: "45 botellas",
        available_quantity: 45.0,
        unit: Unit::Unit,
        price_per_unit: 200.0,
        last_update: "2024-05-03",
        lat: 4.6322,
        lon: -74.0817,
        verified: true,
        trace_token: "0x1bd04e77a9f0",
    },
    SeedRecord {
        id: "gen-003",
        name: "Supermercado Chapinero",
        role: Role::Generator,
        address: "Calle 57 # 9-12, Chapinero",
        waste_types: &[WasteCategory::Cardboard, WasteCategory::Plastic],
        quantity_label: "180 kg / semana",
        available_quantity: 180.0,
        unit: Unit::Kilogram,
        price_per_unit: 350.0,
        last_update: "2024-04-28",
        lat: 4.6413,
        lon: -74.0636,
        verified: false,
        trace_token: "0x9c2f5d10be33",
    },
    SeedRecord {
        id: "gen-004",
        name: "Plaza de Mercado Paloquemao",
        role: Role::Generator,
        address: "Avenida Calle 19 # 25-04, Paloquemao",
        waste_types: &[WasteCategory::Organic],
        quantity_label: "600 kg / día",
        available_quantity: 600.0,
        unit: Unit::Kilogram,
        price_per_unit: 0.0,
        last_update: "2024-05-04",
        lat: 4.6156,
        lon: -74.0857,
        verified: true,
        trace_token: "0x44e8a3b0d7c1",
    },
    SeedRecord {
        id: "gen-005",
        name: "Oficinas Centro Internacional",
        role: Role::Generator,
        address: "Carrera 7 # 32-16, Centro Internacional",
        waste_types: &[WasteCategory::Electronic],
        quantity_label: "35 kg de equipos",
        available_quantity: 35.0,
        unit: Unit::Kilogram,
        price_per_unit: 1500.0,
        last_update: "2024-04-20",
        lat: 4.6162,
        lon: -74.0694,
        verified: false,
        trace_token: "0xa0b7c6d5e4f3",
    },
    SeedRecord {
        id: "gen-006",
        name: "Taller Metalmecánico Puente Aranda",
        role: Role::Generator,
        address: "Calle 13 # 65-30, Puente Aranda",
        waste_types: &[WasteCategory::Metal],
        quantity_label: "250 kg de chatarra",
        available_quantity: 250.0,
        unit: Unit::Kilogram,
        price_per_unit: 900.0,
        last_update: "2024-05-01",
        lat: 4.6231,
        lon: -74.1205,
        verified: true,
        trace_token: "0x5e6f708192a3",
    },
    SeedRecord {
        id: "gen-007",
        name: "Confecciones Restrepo",
        role: Role::Generator,
        address: "Carrera 19 # 18-40 Sur, Restrepo",
        waste_types: &[WasteCategory::Textile],
        quantity_label: "60 kg de retazos",
        available_quantity: 60.0,
        unit: Unit::Kilogram,
        price_per_unit: 0.0,
        last_update: "2024-04-25",
        lat: 4.5889,
        lon: -74.1007,
        verified: false,
        trace_token: "0xb1c2d3e4f506",
    },
    SeedRecord {
        id: "proc-001",
        name: "EcoGestores Bogotá",
        role: Role::Processor,
        address: "Autopista Sur # 66-78, Bosa",
        waste_types: &[
            WasteCategory::Glass,
            WasteCategory::Plastic,
            WasteCategory::Cardboard,
            WasteCategory::Metal,
        ],
        quantity_label: "Capacidad 5 t / día",
        available_quantity: 0.0,
        unit: Unit::Kilogram,
        price_per_unit: 0.0,
        last_update: "2024-05-05",
        lat: 4.5951,
        lon: -74.1702,
        verified: true,
        trace_token: "0xc0ffee112233",
    },
    SeedRecord {
        id: "proc-002",
        name: "BioCombustibles de la Sabana",
        role: Role::Processor,
        address: "Calle 80 # 69Q-50, Engativá",
        waste_types: &[],
        quantity_label: "Capacidad 2000 L / día",
        available_quantity: 0.0,
        unit: Unit::Liter,
        price_per_unit: 0.0,
        last_update: "2024-05-05",
        lat: 4.6917,
        lon: -74.0836,
        verified: true,
        trace_token: "0xdeadbeef0042",
    },
    SeedRecord {
        id: "auth-001",
        name: "Secretaría Distrital de Ambiente",
        role: Role::Authority,
        address: "Avenida Caracas # 54-38",
        waste_types: &[],
        quantity_label: "",
        available_quantity: 0.0,
        unit: Unit::Unit,
        price_per_unit: 0.0,
        last_update: "2024-05-01",
        lat: 4.6402,
        lon: -74.0660,
        verified: true,
        trace_token: "",
    },
];

impl SeedRecord {
    fn to_site(&self) -> Result<Site, PortError> {
        Ok(Site {
            id: SiteId(self.id.to_owned()),
            name: self.name.to_owned(),
            role: self.role,
            address: self.address.to_owned(),
            waste_types: self.waste_types.to_vec(),
            quantity_label: self.quantity_label.to_owned(),
            available_quantity: self.available_quantity,
            unit: self.unit,
            price_per_unit: self.price_per_unit,
            last_update: NaiveDate::parse_from_str(self.last_update, DATE_FORMAT)?,
            location: Coordinates::new(self.lat, self.lon),
            verified: self.verified,
            trace_token: self.trace_token.to_owned(),
        })
    }
}

/// The seed dataset as sites, in listing order.
///
/// # Errors
///
/// Returns [`PortError::Parse`] if a seed date is malformed.
pub fn seed_sites() -> Result<Vec<Site>, PortError> {
    SEED.iter().map(SeedRecord::to_site).collect()
}

/// Catalog port returning the seed dataset.
pub struct SeedCatalogPort {
    meta: SourceMeta,
}

impl SeedCatalogPort {
    /// Create a new seed port.
    #[must_use]
    pub fn new() -> Self {
        Self {
            meta: source_meta(),
        }
    }
}

impl Default for SeedCatalogPort {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogPort for SeedCatalogPort {
    fn source(&self) -> &SourceMeta {
        &self.meta
    }

    async fn load(&self) -> Result<Vec<Site>, PortError> {
        seed_sites()
    }
}

/// Build the plugin bundle for the seed provider.
#[must_use]
pub fn plugin() -> SourcePlugin {
    SourcePlugin {
        meta: source_meta(),
        catalog_port: Arc::new(SeedCatalogPort::new()),
    }
}

/// Identifier the seed source registers under.
#[must_use]
pub fn source_id() -> SourceId {
    SourceId(String::from("seed"))
}

fn source_meta() -> SourceMeta {
    SourceMeta {
        id: source_id(),
        name: String::from("Bogotá demo catalog"),
    }
}
