use super::attitude::AttitudeResponse;
use super::request_common::{HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType};

/// Request type for the /attitude endpoint.
#[derive(Debug)]
pub(crate) struct AttitudeRequest {}

impl NoBodyHTTPRequestType for AttitudeRequest {}

impl HTTPRequestType for AttitudeRequest {
    type Response = AttitudeResponse;
    fn endpoint(&self) -> &'static str { "/attitude" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
}
