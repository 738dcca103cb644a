use crate::geometry::Vec3D;
use crate::http_handler::http_response::response_common::SerdeJSONBodyHTTPResponseType;

/// Response type for the /attitude endpoint.
#[derive(serde::Deserialize, Debug)]
pub(crate) struct AttitudeResponse {
    /// Spacecraft position in metres, in the geometry context's frame.
    position: Vec3D,
    /// Camera boresight, not necessarily normalized by the backend.
    boresight: Vec3D,
    timestamp: chrono::DateTime<chrono::Utc>,
}

impl SerdeJSONBodyHTTPResponseType for AttitudeResponse {}

impl AttitudeResponse {
    pub(crate) fn position(&self) -> Vec3D { self.position }
    pub(crate) fn boresight(&self) -> Vec3D { self.boresight }
    pub(crate) fn timestamp(&self) -> chrono::DateTime<chrono::Utc> { self.timestamp }
}
