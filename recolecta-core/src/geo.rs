//! Great-circle distance between catalog coordinates.

use crate::model::Coordinates;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points in kilometers.
///
/// Inputs are not validated; out-of-range degrees still produce a number.
#[must_use]
pub fn distance_km(from: Coordinates, to: Coordinates) -> f64 {
    let lat_from = from.lat.to_radians();
    let lat_to = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lon = (to.lon - from.lon).to_radians();

    let sin_dlat = (delta_lat / 2.0).sin();
    let sin_dlon = (delta_lon / 2.0).sin();

    let hav = sin_dlat * sin_dlat + lat_from.cos() * lat_to.cos() * sin_dlon * sin_dlon;
    // rounding can push `hav` past 1 for antipodal points
    2.0 * EARTH_RADIUS_KM * hav.sqrt().min(1.0).asin()
}

/// Sum of leg distances along `path`, in visiting order.
#[must_use]
pub fn path_distance_km(path: &[Coordinates]) -> f64 {
    path.windows(2)
        .map(|leg| match leg {
            [from, to] => distance_km(*from, *to),
            _ => 0.0,
        })
        .sum()
}
