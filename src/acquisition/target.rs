use crate::geometry::GeodeticPoint;
use crate::mc::{AttributeError, AttributeValue};
use chrono::{DateTime, Utc};
use std::fmt::Display;

/// What an action asks the camera to point at.
#[derive(Debug, Clone, PartialEq)]
pub enum AcquisitionTarget {
    /// A geodetic location, optionally with a latest acceptable execution time.
    Location { point: GeodeticPoint, deadline: Option<DateTime<Utc>> },
    /// Sentinel for "photograph now": whatever is in view at the current attitude.
    CurrentPosition,
}

impl AcquisitionTarget {
    /// Minimum number of arguments of a location action (latitude, longitude).
    pub const MIN_LOCATION_ARGS: usize = 2;
    /// Maximum number of arguments of a location action (+ altitude, deadline).
    pub const MAX_LOCATION_ARGS: usize = 4;

    /// Parses the arguments of a location action.
    ///
    /// Layout: `latitude [deg], longitude [deg], altitude [m]?, deadline?`. Angles and the
    /// altitude accept doubles or longs, the deadline must be a time attribute. Range checks
    /// are not done here, an out-of-range location is a structurally invalid target and is
    /// rejected by the feasibility check instead.
    ///
    /// # Errors
    /// [`AttributeError::WrongCount`] or [`AttributeError::WrongType`].
    pub fn location_from_attributes(attributes: &[AttributeValue]) -> Result<Self, AttributeError> {
        if !(Self::MIN_LOCATION_ARGS..=Self::MAX_LOCATION_ARGS).contains(&attributes.len()) {
            return Err(AttributeError::WrongCount {
                expected: Self::MIN_LOCATION_ARGS,
                got: attributes.len(),
            });
        }
        let numeric = |i: usize| attributes[i].as_f64().ok_or(AttributeError::WrongType { index: i });
        let lat = numeric(0)?;
        let lon = numeric(1)?;
        let alt = if attributes.len() > 2 { numeric(2)? } else { 0.0 };
        let deadline = match attributes.get(3) {
            Some(attr) => Some(attr.as_time().ok_or(AttributeError::WrongType { index: 3 })?),
            None => None,
        };
        Ok(Self::Location { point: GeodeticPoint::new(lat, lon, alt), deadline })
    }

    /// Returns the target location, `None` for [`AcquisitionTarget::CurrentPosition`].
    pub fn point(&self) -> Option<&GeodeticPoint> {
        match self {
            AcquisitionTarget::Location { point, .. } => Some(point),
            AcquisitionTarget::CurrentPosition => None,
        }
    }
}

impl Display for AcquisitionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AcquisitionTarget::Location { point, deadline: Some(d) } => {
                write!(f, "location {point} until {}", d.format("%d %H:%M:%S%.3f"))
            }
            AcquisitionTarget::Location { point, deadline: None } => write!(f, "location {point}"),
            AcquisitionTarget::CurrentPosition => write!(f, "current position"),
        }
    }
}
