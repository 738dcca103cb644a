use crate::http_handler::http_response::response_common::SerdeJSONBodyHTTPResponseType;

/// Response type for the /acquisition endpoint.
#[derive(serde::Deserialize, Debug)]
pub(crate) struct AcquisitionResponse {
    /// Whether the camera took the image.
    accepted: bool,
    /// Backend id of the stored image.
    #[serde(default)]
    image_id: Option<String>,
    /// Refusal reason given by the backend.
    #[serde(default)]
    reason: Option<String>,
}

impl SerdeJSONBodyHTTPResponseType for AcquisitionResponse {}

impl AcquisitionResponse {
    pub(crate) fn accepted(&self) -> bool { self.accepted }
    pub(crate) fn image_id(&self) -> Option<&str> { self.image_id.as_deref() }
    pub(crate) fn reason(&self) -> Option<&str> { self.reason.as_deref() }
}
