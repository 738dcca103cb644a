use crate::geometry::Vec3D;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use strum_macros::Display;

/// One sample of the spacecraft attitude state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttitudeState {
    /// Spacecraft position in the geometry context frame, metres.
    position: Vec3D,
    /// Direction the camera boresight currently points at (not necessarily normalized).
    boresight: Vec3D,
    /// Time the sample was taken.
    timestamp: DateTime<Utc>,
}

impl AttitudeState {
    pub fn new(position: Vec3D, boresight: Vec3D, timestamp: DateTime<Utc>) -> Self {
        Self { position, boresight, timestamp }
    }

    pub fn position(&self) -> Vec3D { self.position }
    pub fn boresight(&self) -> Vec3D { self.boresight }
    pub fn timestamp(&self) -> DateTime<Utc> { self.timestamp }

    /// Angle in degrees the boresight has to be slewed to point at `target`.
    pub fn slew_angle_deg(&self, target: &Vec3D) -> Option<f64> {
        self.boresight.angle_to_deg(&self.position.to(target))
    }
}

/// Errors raised while sampling the attitude state.
#[derive(Debug, Display)]
pub enum AttitudeError {
    /// The attitude source could not be reached.
    Unavailable,
    /// The source answered with something that is not a usable attitude.
    Malformed,
}

impl std::error::Error for AttitudeError {}

/// Delivers the current attitude state of the spacecraft.
#[async_trait]
pub trait AttitudeSource: Send + Sync {
    async fn current_attitude(&self) -> Result<AttitudeState, AttitudeError>;
}
