//! Earth geometry used by the feasibility checks: reference frame handles, the ellipsoid
//! model, geodetic points and the provider interface that delivers them together with the
//! current UTC time.

mod ellipsoid;
mod geodetic;
mod provider;
mod reference_frame;
mod vec3d;

#[cfg(test)]
mod tests;

pub use ellipsoid::Ellipsoid;
pub use geodetic::GeodeticPoint;
pub use provider::{
    GeometryContext, GeometryError, GeometryProvider, Wgs84GeometryProvider, truncate_to_ms,
};
pub use reference_frame::ReferenceFrame;
pub use vec3d::Vec3D;
