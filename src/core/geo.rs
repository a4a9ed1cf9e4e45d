//! Great-circle distance on a spherical Earth.
//!
//! Coordinates are `[latitude, longitude]` pairs in degrees. Latitude always
//! comes first; this is not an `(x, y)` ordering.

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance in meters between two `[latitude, longitude]` pairs.
///
/// Inputs are in degrees and converted to radians before use. The result is
/// non-negative, symmetric, and exactly `0.0` for identical points.
///
/// Non-finite inputs produce `NaN`; callers that accept untrusted coordinates
/// should check them first (see [`is_valid_coordinate`]).
///
/// # Example
///
/// ```
/// use aerial_clustering::core::geo::haversine_distance;
///
/// let d = haversine_distance([-2.968123, 104.800199], [-2.96525, 104.79828]);
/// assert!(d > 380.0 && d < 400.0);
/// ```
#[inline]
pub fn haversine_distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    let lat1 = a[0].to_radians();
    let lat2 = b[0].to_radians();
    let dlat = (b[0] - a[0]).to_radians();
    let dlon = (b[1] - a[1]).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    // Rounding can push h a hair past 1.0 for antipodal points
    2.0 * EARTH_RADIUS_M * h.clamp(0.0, 1.0).sqrt().asin()
}

/// Returns true if both components are finite numbers.
///
/// Range is deliberately not checked.
#[inline]
pub fn is_valid_coordinate(coord: [f64; 2]) -> bool {
    coord[0].is_finite() && coord[1].is_finite()
}
