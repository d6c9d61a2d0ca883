//! Geographic coordinate type.
//!
//! Parking coordinates come from surveyed docking points, so `GeoPoint`
//! stores `f64` latitude/longitude.  The road graph's spatial index works in
//! `f32`; see [`GeoPoint::as_f32_pair`].

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        const R: f64 = 6_371_000.0; // mean Earth radius, metres

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        R * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
    }

    /// `[lat, lon]` narrowed to `f32` for the R-tree.
    #[inline]
    pub fn as_f32_pair(self) -> [f32; 2] {
        [self.lat as f32, self.lon as f32]
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}
