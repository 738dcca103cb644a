use super::*;
use chrono::{DateTime, TimeDelta, Timelike, Utc};
use rand::Rng;
use std::str::FromStr;
use std::sync::Arc;

const LEO_ALT_M: f64 = 500_000.0;

struct MismatchedProvider;

impl GeometryProvider for MismatchedProvider {
    fn reference_frame(&self) -> Result<ReferenceFrame, GeometryError> { Ok(ReferenceFrame::Eme2000) }
    fn ellipsoid_model(&self) -> Result<Ellipsoid, GeometryError> { Ok(Ellipsoid::wgs84(ReferenceFrame::Itrf)) }
    fn current_utc_timestamp(&self) -> Result<DateTime<Utc>, GeometryError> { Ok(Utc::now()) }
}

struct NoDataProvider;

impl GeometryProvider for NoDataProvider {
    fn reference_frame(&self) -> Result<ReferenceFrame, GeometryError> { Err(GeometryError::DataUnavailable) }
    fn ellipsoid_model(&self) -> Result<Ellipsoid, GeometryError> { Err(GeometryError::DataUnavailable) }
    fn current_utc_timestamp(&self) -> Result<DateTime<Utc>, GeometryError> { Ok(Utc::now()) }
}

fn wgs84() -> Ellipsoid { Ellipsoid::wgs84(ReferenceFrame::Itrf) }

fn above(point: &GeodeticPoint, alt_m: f64) -> Vec3D {
    wgs84().to_cartesian(&GeodeticPoint::new(point.lat_deg(), point.lon_deg(), alt_m))
}

#[test]
fn test_cartesian_reference_points() {
    let e = wgs84();
    let equator = e.to_cartesian(&GeodeticPoint::new(0.0, 0.0, 0.0));
    assert!((equator.x() - Ellipsoid::WGS84_EQUATORIAL_RADIUS).abs() < 1e-6);
    assert!(equator.y().abs() < 1e-6 && equator.z().abs() < 1e-6);

    let pole = e.to_cartesian(&GeodeticPoint::new(90.0, 0.0, 0.0));
    let polar_radius = Ellipsoid::WGS84_EQUATORIAL_RADIUS * (1.0 - Ellipsoid::WGS84_FLATTENING);
    assert!((pole.z() - polar_radius).abs() < 1e-3);
    assert!(pole.x().abs() < 1e-3);
}

#[test]
fn test_zenith_is_straight_up() {
    let mut rng = rand::rng();
    for _ in 0..100 {
        let p = GeodeticPoint::new(rng.random_range(-89.0..89.0), rng.random_range(-180.0..180.0), 0.0);
        let el = wgs84().elevation_deg(&p, &above(&p, LEO_ALT_M)).unwrap();
        assert!((el - 90.0).abs() < 1e-4, "elevation {el} for {p}");
    }
}

#[test]
fn test_antipode_below_horizon() {
    let p = GeodeticPoint::new(48.0, 11.0, 0.0);
    let antipode = GeodeticPoint::new(-48.0, -169.0, 0.0);
    let sat = above(&antipode, LEO_ALT_M);
    assert!(!wgs84().is_visible(&p, &sat, 0.0));
    assert!(wgs84().elevation_deg(&p, &sat).unwrap() < -45.0);
}

#[test]
fn test_elevation_mask_applies() {
    let p = GeodeticPoint::new(0.0, 0.0, 0.0);
    // ~15° of arc away at LEO altitude ends up at a low but positive elevation
    let sat = above(&GeodeticPoint::new(0.0, 15.0, 0.0), LEO_ALT_M);
    let el = wgs84().elevation_deg(&p, &sat).unwrap();
    assert!(el > 0.0 && el < 30.0, "elevation {el}");
    assert!(wgs84().is_visible(&p, &sat, 0.0));
    assert!(!wgs84().is_visible(&p, &sat, el + 1.0));
}

#[test]
fn test_coincident_point_has_no_elevation() {
    let p = GeodeticPoint::new(10.0, 10.0, 0.0);
    let same = wgs84().to_cartesian(&p);
    assert!(wgs84().elevation_deg(&p, &same).is_none());
    assert!(!wgs84().is_visible(&p, &same, -90.0));
}

#[test]
fn test_geodetic_validity() {
    assert!(GeodeticPoint::new(52.5, 13.4, 34.0).is_valid());
    assert!(GeodeticPoint::new(-90.0, 180.0, 0.0).is_valid());
    assert!(!GeodeticPoint::new(90.5, 0.0, 0.0).is_valid());
    assert!(!GeodeticPoint::new(0.0, -181.0, 0.0).is_valid());
    assert!(!GeodeticPoint::new(f64::NAN, 0.0, 0.0).is_valid());
    assert!(!GeodeticPoint::new(0.0, 0.0, 1.0e7).is_valid());
}

#[test]
fn test_context_acquisition() {
    let ctx = GeometryContext::acquire(Arc::new(Wgs84GeometryProvider::new(ReferenceFrame::Itrf))).unwrap();
    assert_eq!(ctx.frame(), ReferenceFrame::Itrf);
    assert_eq!(ctx.ellipsoid().body_frame(), ReferenceFrame::Itrf);
    assert_eq!(ctx.now().unwrap().nanosecond() % 1_000_000, 0);

    assert!(matches!(
        GeometryContext::acquire(Arc::new(MismatchedProvider)),
        Err(GeometryError::FrameMismatch)
    ));
    assert!(matches!(
        GeometryContext::acquire(Arc::new(NoDataProvider)),
        Err(GeometryError::DataUnavailable)
    ));
}

#[test]
fn test_truncate_to_ms() {
    let t = Utc::now().with_nanosecond(123_456_789).unwrap();
    let truncated = truncate_to_ms(t).unwrap();
    assert_eq!(truncated.nanosecond(), 123_000_000);
    assert_eq!(t - truncated, TimeDelta::nanoseconds(456_789));
}

#[test]
fn test_frame_names() {
    assert_eq!(ReferenceFrame::from_str("EME2000").unwrap(), ReferenceFrame::Eme2000);
    assert_eq!(ReferenceFrame::Itrf.to_string(), "ITRF");
}
