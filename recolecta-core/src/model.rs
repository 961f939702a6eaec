//! Domain data structures for marketplace sites, waste categories, and coordinates.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ports::PortError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// Identifier for a site in the catalog.
pub struct SiteId(pub String);

impl fmt::Display for SiteId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl From<&str> for SiteId {
    fn from(raw: &str) -> Self {
        SiteId(raw.to_owned())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Part a site plays in the marketplace.
pub enum Role {
    /// Produces waste that is collected.
    Generator,
    /// Licensed manager that buys, receives, or treats collected material.
    Processor,
    /// Environmental oversight body.
    Authority,
    /// Platform administrator.
    Admin,
}

impl Role {
    /// Human-friendly label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Role::Generator => "Generator",
            Role::Processor => "Processor",
            Role::Authority => "Authority",
            Role::Admin => "Admin",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Unit the available quantity and unit price are expressed in.
pub enum Unit {
    /// Mass in kilograms.
    Kilogram,
    /// Volume in liters.
    Liter,
    /// Countable items.
    Unit,
}

impl Unit {
    /// Short symbol used next to quantities.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Kilogram => "kg",
            Unit::Liter => "L",
            Unit::Unit => "und",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// Waste categories traded on the marketplace.
///
/// The set is closed: every table keyed by category is expected to cover
/// all of [`WasteCategory::ALL`].
pub enum WasteCategory {
    /// Used cooking oil and fats.
    #[serde(rename = "GRASAS")]
    CookingOil,
    /// Glass containers.
    #[serde(rename = "VIDRIO")]
    Glass,
    /// Plastics and light packaging.
    #[serde(rename = "PLASTICO")]
    Plastic,
    /// Paper and cardboard.
    #[serde(rename = "CARTON")]
    Cardboard,
    /// Scrap metal and cans.
    #[serde(rename = "METAL")]
    Metal,
    /// Organic and food waste.
    #[serde(rename = "ORGANICO")]
    Organic,
    /// Electrical and electronic equipment waste.
    #[serde(rename = "RAEE")]
    Electronic,
    /// Textiles and clothing.
    #[serde(rename = "TEXTIL")]
    Textile,
}

impl WasteCategory {
    /// Every category, in display order.
    pub const ALL: [WasteCategory; 8] = [
        WasteCategory::CookingOil,
        WasteCategory::Glass,
        WasteCategory::Plastic,
        WasteCategory::Cardboard,
        WasteCategory::Metal,
        WasteCategory::Organic,
        WasteCategory::Electronic,
        WasteCategory::Textile,
    ];

    /// Wire code used by catalog data.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            WasteCategory::CookingOil => "GRASAS",
            WasteCategory::Glass => "VIDRIO",
            WasteCategory::Plastic => "PLASTICO",
            WasteCategory::Cardboard => "CARTON",
            WasteCategory::Metal => "METAL",
            WasteCategory::Organic => "ORGANICO",
            WasteCategory::Electronic => "RAEE",
            WasteCategory::Textile => "TEXTIL",
        }
    }

    /// Human-friendly label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            WasteCategory::CookingOil => "Used cooking oil",
            WasteCategory::Glass => "Glass",
            WasteCategory::Plastic => "Plastics",
            WasteCategory::Cardboard => "Paper / cardboard",
            WasteCategory::Metal => "Metal",
            WasteCategory::Organic => "Organic",
            WasteCategory::Electronic => "E-waste",
            WasteCategory::Textile => "Textiles",
        }
    }
}

impl fmt::Display for WasteCategory {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.code())
    }
}

impl FromStr for WasteCategory {
    type Err = PortError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let code = raw.trim();
        WasteCategory::ALL
            .into_iter()
            .find(|category| category.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| PortError::UnknownCategory(raw.to_owned()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Geographic position in decimal degrees.
pub struct Coordinates {
    /// Latitude, -90 to 90.
    pub lat: f64,
    /// Longitude, -180 to 180.
    pub lon: f64,
}

impl Coordinates {
    /// Construct a coordinate pair.
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A generator, processor, or oversight entity listed in the catalog.
pub struct Site {
    /// Unique identifier.
    pub id: SiteId,
    /// Display name.
    pub name: String,
    /// Marketplace role.
    pub role: Role,
    /// Street address.
    pub address: String,
    /// Handled categories; the first one is the primary category.
    pub waste_types: Vec<WasteCategory>,
    /// Human-readable quantity such as "20 L / month".
    pub quantity_label: String,
    /// Quantity available for collection, in `unit`.
    pub available_quantity: f64,
    /// Unit of `available_quantity` and `price_per_unit`.
    pub unit: Unit,
    /// Price per unit in COP.
    pub price_per_unit: f64,
    /// Date the listing was last updated.
    pub last_update: NaiveDate,
    /// Location of the site.
    pub location: Coordinates,
    /// Whether the authority verified the listing.
    pub verified: bool,
    /// Cosmetic traceability token shown next to verified listings.
    pub trace_token: String,
}

impl Site {
    /// Category used for pricing and impact.
    #[must_use]
    pub fn primary_category(&self) -> Option<WasteCategory> {
        self.waste_types.first().copied()
    }

    /// Whether the site lists `category` anywhere in its categories.
    #[must_use]
    pub fn handles(&self, category: WasteCategory) -> bool {
        self.waste_types.contains(&category)
    }

    /// Quantity times unit price, the amount that changes hands for this site.
    #[must_use]
    pub fn material_value(&self) -> f64 {
        self.available_quantity * self.price_per_unit
    }

    /// Check the record invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::InvalidSite`] when quantity or price is negative or not finite,
    /// or when a generator declares no waste category.
    pub fn validate(&self) -> Result<(), PortError> {
        let reason = if !self.available_quantity.is_finite() || self.available_quantity < 0.0 {
            Some("available quantity must be a non-negative number")
        } else if !self.price_per_unit.is_finite() || self.price_per_unit < 0.0 {
            Some("price per unit must be a non-negative number")
        } else if self.role == Role::Generator && self.waste_types.is_empty() {
            Some("generators must declare at least one waste category")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(PortError::InvalidSite {
                id: self.id.clone(),
                reason: reason.to_owned(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn site(id: &str, category: WasteCategory, lat: f64, lon: f64) -> Site {
        Site {
            id: SiteId::from(id),
            name: format!("Site {id}"),
            role: Role::Generator,
            address: String::from("Calle 1 # 2-3"),
            waste_types: vec![category],
            quantity_label: String::from("10 kg"),
            available_quantity: 10.0,
            unit: Unit::Kilogram,
            price_per_unit: 100.0,
            last_update: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap_or_default(),
            location: Coordinates::new(lat, lon),
            verified: false,
            trace_token: String::new(),
        }
    }

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!("vidrio".parse::<WasteCategory>().ok(), Some(WasteCategory::Glass));
        assert_eq!(" GRASAS ".parse::<WasteCategory>().ok(), Some(WasteCategory::CookingOil));
        for category in WasteCategory::ALL {
            assert_eq!(category.code().parse::<WasteCategory>().ok(), Some(category));
        }
    }

    // Exhaustive match: a new variant fails to compile here until it is placed in `ALL`.
    fn position_in_all(category: WasteCategory) -> usize {
        match category {
            WasteCategory::CookingOil => 0,
            WasteCategory::Glass => 1,
            WasteCategory::Plastic => 2,
            WasteCategory::Cardboard => 3,
            WasteCategory::Metal => 4,
            WasteCategory::Organic => 5,
            WasteCategory::Electronic => 6,
            WasteCategory::Textile => 7,
        }
    }

    #[test]
    fn all_lists_every_variant_once() {
        for (idx, category) in WasteCategory::ALL.into_iter().enumerate() {
            assert_eq!(position_in_all(category), idx, "{category} is out of place");
        }
        let highest = WasteCategory::ALL
            .into_iter()
            .map(position_in_all)
            .max()
            .unwrap_or_default();
        assert_eq!(highest + 1, WasteCategory::ALL.len());
    }

    #[test]
    fn rejects_unknown_code() {
        let err = "ASBESTO".parse::<WasteCategory>();
        assert!(matches!(err, Err(PortError::UnknownCategory(code)) if code == "ASBESTO"));
    }

    #[test]
    fn serde_uses_wire_codes() {
        let json = serde_json::to_string(&WasteCategory::Electronic).unwrap_or_default();
        assert_eq!(json, "\"RAEE\"");
    }

    #[test]
    fn primary_category_is_first_listed() {
        let mut record = site("a", WasteCategory::Plastic, 4.6, -74.1);
        record.waste_types.push(WasteCategory::Glass);
        assert_eq!(record.primary_category(), Some(WasteCategory::Plastic));
        assert!(record.handles(WasteCategory::Glass));
        assert!(!record.handles(WasteCategory::Metal));
    }

    #[test]
    fn validate_rejects_negative_quantity() {
        let mut record = site("a", WasteCategory::Plastic, 4.6, -74.1);
        record.available_quantity = -1.0;
        assert!(matches!(record.validate(), Err(PortError::InvalidSite { .. })));
    }

    #[test]
    fn validate_rejects_generator_without_category() {
        let mut record = site("a", WasteCategory::Plastic, 4.6, -74.1);
        record.waste_types.clear();
        assert!(record.validate().is_err());

        record.role = Role::Processor;
        assert!(record.validate().is_ok());
    }
}
