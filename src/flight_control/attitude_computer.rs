use crate::acquisition::{AttitudeError, AttitudeSource, AttitudeState};
use crate::http_handler::{
    http_client::HTTPClient,
    http_request::{attitude_get::AttitudeRequest, request_common::NoBodyHTTPRequestType},
};
use crate::{event, warn};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Samples the spacecraft attitude from the backend's `/attitude` endpoint.
///
/// Every call performs a fresh request, the last valid sample is only kept for inspection.
#[derive(Debug)]
pub struct AttitudeComputer {
    request_client: Arc<HTTPClient>,
    last_sample: RwLock<Option<AttitudeState>>,
}

impl AttitudeComputer {
    pub(crate) fn new(request_client: Arc<HTTPClient>) -> Self {
        Self { request_client, last_sample: RwLock::new(None) }
    }

    /// The most recent valid attitude sample, if any.
    pub async fn last_sample(&self) -> Option<AttitudeState> { *self.last_sample.read().await }
}

#[async_trait]
impl AttitudeSource for AttitudeComputer {
    async fn current_attitude(&self) -> Result<AttitudeState, AttitudeError> {
        let response = AttitudeRequest {}.send_request(&self.request_client).await.map_err(|e| {
            warn!("Attitude request failed: {e}");
            AttitudeError::Unavailable
        })?;

        let position = response.position();
        let Some(boresight) = response.boresight().normalize() else {
            return Err(AttitudeError::Malformed);
        };
        if !position.is_finite() {
            return Err(AttitudeError::Malformed);
        }
        let state = AttitudeState::new(position, boresight, response.timestamp());
        event!("Attitude at {}: pos {position}, boresight {boresight}.", state.timestamp().format("%H:%M:%S%.3f"));
        *self.last_sample.write().await = Some(state);
        Ok(state)
    }
}
