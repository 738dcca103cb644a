//! The acquisition core: timing profile, targets, the feasibility evaluator and the retry
//! controller, together with the attitude and capture boundaries they depend on.

mod attitude;
mod capture;
mod feasibility;
mod retry_controller;
mod target;
mod timing_profile;


pub use attitude::{AttitudeError, AttitudeSource, AttitudeState};
pub use capture::{CaptureCommand, CaptureError, CaptureHandler, CaptureReceipt};
pub use feasibility::{FeasibilityEvaluator, FeasibilityResult, InfeasibleReason};
pub use retry_controller::{
    AttemptOutcome, AttemptReport, ProgressSink, ProgressStage, RetryController, RetryPolicy,
};
pub use target::AcquisitionTarget;
pub use timing_profile::TimingProfile;
