use super::{GeodeticPoint, ReferenceFrame, Vec3D};

/// A one-axis (oblate) Earth ellipsoid attached to a body frame.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Ellipsoid {
    /// Equatorial radius in metres.
    equatorial_radius: f64,
    /// Flattening `(a - b) / a`.
    flattening: f64,
    /// The frame the ellipsoid rotates with.
    body_frame: ReferenceFrame,
}

impl Ellipsoid {
    /// WGS-84 equatorial radius in metres.
    pub const WGS84_EQUATORIAL_RADIUS: f64 = 6_378_137.0;
    /// WGS-84 flattening.
    pub const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;

    /// Creates a new ellipsoid from its equatorial radius and flattening.
    pub const fn new(equatorial_radius: f64, flattening: f64, body_frame: ReferenceFrame) -> Self {
        Self { equatorial_radius, flattening, body_frame }
    }

    /// The WGS-84 ellipsoid attached to `body_frame`.
    pub const fn wgs84(body_frame: ReferenceFrame) -> Self {
        Self::new(Self::WGS84_EQUATORIAL_RADIUS, Self::WGS84_FLATTENING, body_frame)
    }

    pub const fn equatorial_radius(&self) -> f64 { self.equatorial_radius }
    pub const fn flattening(&self) -> f64 { self.flattening }
    pub const fn body_frame(&self) -> ReferenceFrame { self.body_frame }

    /// Squared first eccentricity.
    fn e2(&self) -> f64 { self.flattening * (2.0 - self.flattening) }

    /// Converts a geodetic point into cartesian coordinates of the body frame.
    pub fn to_cartesian(&self, point: &GeodeticPoint) -> Vec3D {
        let (sin_lat, cos_lat) = point.lat_deg().to_radians().sin_cos();
        let (sin_lon, cos_lon) = point.lon_deg().to_radians().sin_cos();
        let n = self.equatorial_radius / (1.0 - self.e2() * sin_lat * sin_lat).sqrt();
        let h = point.alt_m();
        Vec3D::new(
            (n + h) * cos_lat * cos_lon,
            (n + h) * cos_lat * sin_lon,
            (n * (1.0 - self.e2()) + h) * sin_lat,
        )
    }

    /// Unit vector normal to the ellipsoid surface at `point`, pointing away from the Earth.
    pub fn zenith(point: &GeodeticPoint) -> Vec3D {
        let (sin_lat, cos_lat) = point.lat_deg().to_radians().sin_cos();
        let (sin_lon, cos_lon) = point.lon_deg().to_radians().sin_cos();
        Vec3D::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
    }

    /// Elevation of `observed` above the local horizon of `point`, in degrees.
    ///
    /// # Returns
    /// `None` if `observed` coincides with `point`.
    pub fn elevation_deg(&self, point: &GeodeticPoint, observed: &Vec3D) -> Option<f64> {
        let line_of_sight = self.to_cartesian(point).to(observed);
        let zenith_angle = Self::zenith(point).angle_to_deg(&line_of_sight)?;
        Some(90.0 - zenith_angle)
    }

    /// Checks whether `observed` is strictly above `mask_deg` as seen from `point`.
    pub fn is_visible(&self, point: &GeodeticPoint, observed: &Vec3D, mask_deg: f64) -> bool {
        self.elevation_deg(point, observed).is_some_and(|el| el > mask_deg)
    }
}
