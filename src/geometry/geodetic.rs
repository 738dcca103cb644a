use std::fmt::Display;

/// Lowest altitude above the ellipsoid accepted for a target, in metres.
const MIN_ALTITUDE_M: f64 = -1_000.0;
/// Highest altitude above the ellipsoid accepted for a target, in metres.
const MAX_ALTITUDE_M: f64 = 100_000.0;

/// A geodetic location on (or near) the Earth ellipsoid.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct GeodeticPoint {
    /// Geodetic latitude in degrees, positive north.
    lat_deg: f64,
    /// Longitude in degrees, positive east.
    lon_deg: f64,
    /// Height above the ellipsoid in metres.
    alt_m: f64,
}

impl GeodeticPoint {
    pub const fn new(lat_deg: f64, lon_deg: f64, alt_m: f64) -> Self { Self { lat_deg, lon_deg, alt_m } }

    pub const fn lat_deg(&self) -> f64 { self.lat_deg }
    pub const fn lon_deg(&self) -> f64 { self.lon_deg }
    pub const fn alt_m(&self) -> f64 { self.alt_m }

    /// Returns `true` if the point describes a place that can exist at all: finite values,
    /// latitude within `[-90, 90]`, longitude within `[-180, 180]` and a plausible altitude.
    pub fn is_valid(&self) -> bool {
        self.lat_deg.is_finite()
            && self.lon_deg.is_finite()
            && self.alt_m.is_finite()
            && (-90.0..=90.0).contains(&self.lat_deg)
            && (-180.0..=180.0).contains(&self.lon_deg)
            && (MIN_ALTITUDE_M..=MAX_ALTITUDE_M).contains(&self.alt_m)
    }
}

impl Display for GeodeticPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}°, {:.4}°, {:.0} m)", self.lat_deg, self.lon_deg, self.alt_m)
    }
}
