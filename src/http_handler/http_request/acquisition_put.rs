use super::acquisition::AcquisitionResponse;
use super::request_common::{HTTPRequestMethod, HTTPRequestType, JSONBodyHTTPRequestType};
use crate::acquisition::{AcquisitionTarget, CaptureCommand};

/// What the camera shall point at, as understood by the backend.
#[derive(serde::Serialize, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(crate) enum TargetBody {
    /// Geodetic location in degrees and metres.
    Location { latitude: f64, longitude: f64, altitude: f64 },
    /// Whatever is in view at the current attitude.
    Now,
}

/// Request type for the /acquisition endpoint.
#[derive(serde::Serialize, Debug)]
pub(crate) struct AcquisitionRequest {
    /// Action instance the capture belongs to.
    pub(crate) instance_id: i64,
    /// 1-based attempt number.
    pub(crate) attempt: u32,
    pub(crate) target: TargetBody,
    /// Earliest execution time, serialized as RFC 3339.
    pub(crate) execute_at: chrono::DateTime<chrono::Utc>,
}

impl From<&CaptureCommand> for AcquisitionRequest {
    fn from(command: &CaptureCommand) -> Self {
        let target = match command.target() {
            AcquisitionTarget::Location { point, .. } => TargetBody::Location {
                latitude: point.lat_deg(),
                longitude: point.lon_deg(),
                altitude: point.alt_m(),
            },
            AcquisitionTarget::CurrentPosition => TargetBody::Now,
        };
        Self {
            instance_id: command.instance_id(),
            attempt: command.attempt(),
            target,
            execute_at: command.execute_at(),
        }
    }
}

impl JSONBodyHTTPRequestType for AcquisitionRequest {
    type Body = AcquisitionRequest;
    fn body(&self) -> &Self::Body { self }
}

impl HTTPRequestType for AcquisitionRequest {
    type Response = AcquisitionResponse;
    fn endpoint(&self) -> &'static str { "/acquisition" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Put }
}
