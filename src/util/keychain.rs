use crate::acquisition::{
    AttitudeSource, CaptureHandler, FeasibilityEvaluator, RetryController, RetryPolicy, TimingProfile,
};
use crate::flight_control::AttitudeComputer;
use crate::geometry::GeometryContext;
use crate::http_handler::http_client::HTTPClient;
use crate::imaging::CameraController;
use crate::mc::{ActionDispatcher, CameraAcquisitorAdapter};
use crate::util::AdapterConfig;
use std::sync::Arc;

/// Key components of the service, wired together once at startup.
///
/// # Fields
/// - `geometry`: The geometry context every feasibility check is evaluated in.
/// - `a_comp`: The attitude computer sampling the spacecraft attitude.
/// - `c_cont`: The camera controller issuing captures.
/// - `adapter`: The adapter the control substrate talks to.
#[derive(Clone)]
pub struct Keychain {
    geometry: Arc<GeometryContext>,
    a_comp: Arc<AttitudeComputer>,
    c_cont: Arc<CameraController>,
    adapter: Arc<CameraAcquisitorAdapter>,
}

impl Keychain {
    /// Builds all subsystems from `config`.
    ///
    /// Attitude requests use the default request timeout, capture requests wait up to the
    /// configured capture ceiling since the backend answers after the exposure.
    ///
    /// # Errors
    /// Fails if an HTTP client cannot be built or the timing profile is invalid.
    pub fn new(config: &AdapterConfig, geometry: GeometryContext) -> Result<Self, Box<dyn std::error::Error>> {
        let geometry = Arc::new(geometry);
        let attitude_client = Arc::new(HTTPClient::new(config.spacecraft_url())?);
        let capture_client = Arc::new(HTTPClient::with_timeout(config.spacecraft_url(), config.capture_timeout())?);
        let a_comp = Arc::new(AttitudeComputer::new(attitude_client));
        let c_cont = Arc::new(CameraController::new(capture_client));

        let profile = TimingProfile::new(config.worst_case_rotation(), config.attitude_margin(), config.max_retries())?;
        let evaluator = FeasibilityEvaluator::new(profile, Arc::clone(&geometry), config.elevation_mask_deg());
        let policy = RetryPolicy::new(config.min_retry_delay(), Some(config.capture_timeout()));
        let controller = RetryController::new(
            evaluator,
            Arc::clone(&geometry),
            Arc::clone(&a_comp) as Arc<dyn AttitudeSource>,
            Arc::clone(&c_cont) as Arc<dyn CaptureHandler>,
            policy,
        );
        let adapter = Arc::new(CameraAcquisitorAdapter::new(ActionDispatcher::new(controller, profile.max_retries())));
        Ok(Self { geometry, a_comp, c_cont, adapter })
    }

    /// Provides a cloned reference to the geometry context.
    pub fn geometry(&self) -> Arc<GeometryContext> { Arc::clone(&self.geometry) }

    /// Provides a cloned reference to the attitude computer.
    pub fn a_comp(&self) -> Arc<AttitudeComputer> { Arc::clone(&self.a_comp) }

    /// Provides a cloned reference to the camera controller.
    pub fn c_cont(&self) -> Arc<CameraController> { Arc::clone(&self.c_cont) }

    /// Provides a cloned reference to the adapter.
    pub fn adapter(&self) -> Arc<CameraAcquisitorAdapter> { Arc::clone(&self.adapter) }
}
