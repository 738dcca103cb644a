use super::AcquisitionTarget;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use strum_macros::Display;

/// A fully scheduled capture handed to the camera boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureCommand {
    /// Action instance the capture belongs to.
    instance_id: i64,
    /// 1-based attempt number within the action.
    attempt: u32,
    /// What to point at.
    target: AcquisitionTarget,
    /// Earliest time the camera may fire.
    execute_at: DateTime<Utc>,
}

impl CaptureCommand {
    pub fn new(instance_id: i64, attempt: u32, target: AcquisitionTarget, execute_at: DateTime<Utc>) -> Self {
        Self { instance_id, attempt, target, execute_at }
    }

    pub fn instance_id(&self) -> i64 { self.instance_id }
    pub fn attempt(&self) -> u32 { self.attempt }
    pub fn target(&self) -> &AcquisitionTarget { &self.target }
    pub fn execute_at(&self) -> DateTime<Utc> { self.execute_at }
}

/// Confirmation of a successful capture.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CaptureReceipt {
    image_id: Option<String>,
}

impl CaptureReceipt {
    pub fn new(image_id: Option<String>) -> Self { Self { image_id } }
    pub fn image_id(&self) -> Option<&str> { self.image_id.as_deref() }
}

/// Reasons a capture invocation did not produce an image.
#[derive(Debug, Display, PartialEq, Eq, Clone, Copy)]
pub enum CaptureError {
    /// The camera refused the command.
    Rejected,
    /// The camera accepted but failed while executing.
    HardwareFault,
    /// The camera could not be reached at all.
    Unreachable,
    /// No answer within the configured ceiling.
    TimedOut,
}

impl std::error::Error for CaptureError {}

/// Boundary towards the camera hardware.
///
/// An invocation may take as long as the maneuver plus the exposure. Once issued it is never
/// aborted by the caller, even if the caller stops waiting for it.
#[async_trait]
pub trait CaptureHandler: Send + Sync {
    async fn capture(&self, command: CaptureCommand) -> Result<CaptureReceipt, CaptureError>;
}
