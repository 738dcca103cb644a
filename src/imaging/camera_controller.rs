use crate::acquisition::{CaptureCommand, CaptureError, CaptureHandler, CaptureReceipt};
use crate::http_handler::{
    HTTPError,
    http_client::HTTPClient,
    http_request::{acquisition_put::AcquisitionRequest, request_common::JSONBodyHTTPRequestType},
    http_response::response_common::ResponseError,
};
use crate::{acq, warn};
use async_trait::async_trait;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

/// Hands scheduled captures to the backend's `/acquisition` endpoint.
///
/// The backend answers once the image is taken (or refused), so the client used here needs
/// a timeout covering the full maneuver.
#[derive(Debug)]
pub struct CameraController {
    request_client: Arc<HTTPClient>,
    /// Number of images confirmed by the backend since startup.
    images_taken: AtomicU64,
}

impl CameraController {
    pub(crate) fn new(request_client: Arc<HTTPClient>) -> Self {
        Self { request_client, images_taken: AtomicU64::new(0) }
    }

    pub fn images_taken(&self) -> u64 { self.images_taken.load(Ordering::Relaxed) }

    fn map_http_error(err: &HTTPError) -> CaptureError {
        match err {
            HTTPError::HTTPRequestError(_) | HTTPError::HTTPResponseError(ResponseError::NoConnection) => {
                CaptureError::Unreachable
            }
            HTTPError::HTTPResponseError(ResponseError::BadRequest(_)) => CaptureError::Rejected,
            HTTPError::HTTPResponseError(_) => CaptureError::HardwareFault,
        }
    }
}

#[async_trait]
impl CaptureHandler for CameraController {
    async fn capture(&self, command: CaptureCommand) -> Result<CaptureReceipt, CaptureError> {
        let request = AcquisitionRequest::from(&command);
        let response = request.send_request(&self.request_client).await.map_err(|e| {
            warn!("[{}] Capture request failed: {e}", command.instance_id());
            Self::map_http_error(&e)
        })?;

        if !response.accepted() {
            warn!(
                "[{}] Camera refused attempt {}: {}",
                command.instance_id(),
                command.attempt(),
                response.reason().unwrap_or("no reason given")
            );
            return Err(CaptureError::Rejected);
        }
        self.images_taken.fetch_add(1, Ordering::Relaxed);
        acq!(
            "[{}] Image {} taken for attempt {}.",
            command.instance_id(),
            response.image_id().unwrap_or("<unnamed>"),
            command.attempt()
        );
        Ok(CaptureReceipt::new(response.image_id().map(str::to_string)))
    }
}
