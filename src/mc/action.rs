use super::AttributeValue;
use crate::acquisition::{AttemptOutcome, ProgressStage};
use async_trait::async_trait;
use std::sync::Arc;
use strum_macros::{Display, EnumIter, EnumString};

/// Actions this subsystem registers with the control substrate.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display, EnumString, EnumIter)]
pub enum ActionName {
    /// Photograph a geodetic location.
    #[strum(serialize = "PHOTOGRAPH_LOCATION")]
    PhotographLocation,
    /// Photograph whatever is currently in view.
    #[strum(serialize = "PHOTOGRAPH_NOW")]
    PhotographNow,
}

/// Terminal status of an action, reported exactly once per request.
#[derive(Debug, Display, PartialEq, Eq, Clone, Copy)]
#[repr(u32)]
pub enum StatusCode {
    /// No action name, nothing was done.
    Acknowledged = 0,
    Success = 1,
    ExhaustedRetries = 2,
    Fatal = 3,
    InvalidArguments = 4,
    Unsupported = 5,
    Cancelled = 6,
    /// The instance id is already in flight.
    DuplicateInstance = 7,
}

impl StatusCode {
    pub fn code(self) -> u32 { self as u32 }
}

impl From<AttemptOutcome> for StatusCode {
    fn from(value: AttemptOutcome) -> Self {
        match value {
            AttemptOutcome::Success => StatusCode::Success,
            AttemptOutcome::ExhaustedRetries => StatusCode::ExhaustedRetries,
            AttemptOutcome::Fatal => StatusCode::Fatal,
            AttemptOutcome::Cancelled => StatusCode::Cancelled,
        }
    }
}

/// Reply channel of a single interaction with the control substrate.
#[async_trait]
pub trait InteractionHandle: Send + Sync {
    async fn report_progress(&self, instance_id: i64, stage: ProgressStage);
    async fn report_result(&self, instance_id: i64, code: StatusCode);
}

/// An action delivered by the control substrate.
pub struct ActionRequest {
    /// Action name, `None` for liveness probes.
    name: Option<String>,
    /// Action arguments in definition order.
    attributes: Vec<AttributeValue>,
    /// Unique among in-flight requests.
    instance_id: i64,
    /// Whether intermediate progress has to be reported.
    report_progress: bool,
    interaction: Arc<dyn InteractionHandle>,
}

impl ActionRequest {
    pub fn new(
        name: Option<String>,
        attributes: Vec<AttributeValue>,
        instance_id: i64,
        report_progress: bool,
        interaction: Arc<dyn InteractionHandle>,
    ) -> Self {
        Self { name, attributes, instance_id, report_progress, interaction }
    }

    pub fn name(&self) -> Option<&str> { self.name.as_deref() }
    pub fn attributes(&self) -> &[AttributeValue] { &self.attributes }
    pub fn instance_id(&self) -> i64 { self.instance_id }
    pub fn report_progress(&self) -> bool { self.report_progress }
    pub fn interaction(&self) -> &Arc<dyn InteractionHandle> { &self.interaction }
}
