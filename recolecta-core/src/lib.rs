//! Core types, route metrics engine, and service wiring for the recolecta route planner.

/// Tunable pricing and emission tables.
pub mod calibration;
/// Versioned catalog snapshots and selection resolution.
pub mod catalog;
/// Pricing regimes per waste category.
pub mod economics;
/// Category filtering.
pub mod filter;
/// Great-circle distance.
pub mod geo;
/// Avoided and transport emissions.
pub mod impact;
/// Route metrics engine.
pub mod metrics;
/// Domain models and identifiers shared by all sources.
pub mod model;
/// Registry for plugging catalog sources into the service.
pub mod plugin;
/// Traits describing catalog sources.
pub mod ports;
/// High-level service facade used by clients.
pub mod service;

pub use calibration::*;
pub use catalog::*;
pub use economics::*;
pub use filter::*;
pub use geo::*;
pub use impact::*;
pub use metrics::*;
pub use model::*;
pub use plugin::*;
pub use ports::*;
pub use service::*;
