use super::{
    AcquisitionTarget, AttitudeSource, CaptureCommand, CaptureError, CaptureHandler, CaptureReceipt,
    FeasibilityEvaluator, FeasibilityResult,
};
use crate::geometry::GeometryContext;
use crate::{acq, event, log, warn};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{sync::Arc, time::Duration};
use strum_macros::Display;
use tokio_util::sync::CancellationToken;

/// Terminal state of one [`RetryController::attempt`] run.
#[derive(Debug, Display, PartialEq, Eq, Clone, Copy)]
pub enum AttemptOutcome {
    /// A capture was confirmed.
    Success,
    /// Every attempt was consumed without a confirmed capture.
    ExhaustedRetries,
    /// The target is structurally invalid, remaining attempts were skipped.
    Fatal,
    /// Interest in the action was withdrawn before a capture succeeded.
    Cancelled,
}

/// Intermediate states reported while an action is being worked on.
#[derive(Debug, Display, PartialEq, Eq, Clone, Copy)]
#[repr(u32)]
pub enum ProgressStage {
    /// The action was accepted and will be executed.
    Accepted = 0,
    /// An attempt started, time and attitude are being sampled.
    Evaluating = 1,
    /// The target is feasible, a capture time was computed.
    Scheduled = 2,
    /// The capture invocation was issued.
    Capturing = 3,
    /// The previous attempt failed, the next one starts after the retry delay.
    RetryPending = 4,
}

impl ProgressStage {
    pub fn code(self) -> u32 { self as u32 }
}

/// Receives [`ProgressStage`] updates of a running attempt.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn progress(&self, stage: ProgressStage);
}

/// Policy knobs of the retry loop beyond the attempt budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryPolicy {
    /// Pause between consecutive attempts.
    min_retry_delay: Duration,
    /// Ceiling for a single capture invocation, `None` waits indefinitely.
    capture_timeout: Option<Duration>,
}

impl RetryPolicy {
    pub fn new(min_retry_delay: Duration, capture_timeout: Option<Duration>) -> Self {
        Self { min_retry_delay, capture_timeout }
    }

    pub fn min_retry_delay(&self) -> Duration { self.min_retry_delay }
    pub fn capture_timeout(&self) -> Option<Duration> { self.capture_timeout }
}

/// Summary of one [`RetryController::attempt`] run.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptReport {
    outcome: AttemptOutcome,
    /// Attempts consumed, the first try included.
    attempts: u32,
    /// Capture invocations issued.
    captures: u32,
    /// Execution time computed by the first feasible evaluation.
    first_schedule: Option<DateTime<Utc>>,
    /// Receipt of the successful capture.
    receipt: Option<CaptureReceipt>,
}

impl AttemptReport {
    fn new() -> Self {
        Self {
            outcome: AttemptOutcome::ExhaustedRetries,
            attempts: 0,
            captures: 0,
            first_schedule: None,
            receipt: None,
        }
    }

    fn finish(mut self, outcome: AttemptOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    pub fn outcome(&self) -> AttemptOutcome { self.outcome }
    pub fn attempts(&self) -> u32 { self.attempts }
    pub fn captures(&self) -> u32 { self.captures }
    pub fn first_schedule(&self) -> Option<DateTime<Utc>> { self.first_schedule }
    pub fn receipt(&self) -> Option<&CaptureReceipt> { self.receipt.as_ref() }
}

/// Runs feasibility check and capture under a bounded retry budget.
///
/// Every attempt re-samples the clock and the attitude. Infeasibility, a failed sample and a
/// failed capture all consume exactly one attempt. Only a structurally invalid target ends
/// the run early. Holds no per-request state, a single instance serves any number of
/// concurrent runs.
pub struct RetryController {
    evaluator: FeasibilityEvaluator,
    geometry: Arc<GeometryContext>,
    attitude: Arc<dyn AttitudeSource>,
    camera: Arc<dyn CaptureHandler>,
    policy: RetryPolicy,
}

impl RetryController {
    pub fn new(
        evaluator: FeasibilityEvaluator,
        geometry: Arc<GeometryContext>,
        attitude: Arc<dyn AttitudeSource>,
        camera: Arc<dyn CaptureHandler>,
        policy: RetryPolicy,
    ) -> Self {
        Self { evaluator, geometry, attitude, camera, policy }
    }

    pub fn evaluator(&self) -> &FeasibilityEvaluator { &self.evaluator }

    /// Tries to capture `target` at most `max_retries` times.
    ///
    /// # Arguments
    /// * `instance_id` – The action instance this run belongs to, forwarded to the camera.
    /// * `target` – What to capture.
    /// * `max_retries` – Attempt budget, the first try included.
    /// * `cancel` – Checked before every capture invocation and during retry pauses.
    /// * `progress` – Receives the stage of every attempt.
    pub async fn attempt(
        &self,
        instance_id: i64,
        target: &AcquisitionTarget,
        max_retries: u32,
        cancel: &CancellationToken,
        progress: &dyn ProgressSink,
    ) -> AttemptReport {
        let mut report = AttemptReport::new();
        for attempt in 1..=max_retries {
            if attempt > 1 && !self.policy.min_retry_delay.is_zero() {
                progress.progress(ProgressStage::RetryPending).await;
                tokio::select! {
                    () = tokio::time::sleep(self.policy.min_retry_delay) => {}
                    () = cancel.cancelled() => return report.finish(AttemptOutcome::Cancelled),
                }
            }
            if cancel.is_cancelled() {
                return report.finish(AttemptOutcome::Cancelled);
            }
            report.attempts = attempt;
            progress.progress(ProgressStage::Evaluating).await;

            let now = match self.geometry.now() {
                Ok(now) => now,
                Err(e) => {
                    warn!("[{instance_id}] Attempt {attempt}/{max_retries}: no clock sample ({e}).");
                    continue;
                }
            };
            let attitude = match self.attitude.current_attitude().await {
                Ok(att) => att,
                Err(e) => {
                    warn!("[{instance_id}] Attempt {attempt}/{max_retries}: no attitude sample ({e}).");
                    continue;
                }
            };

            let (execute_at, slew_deg) = match self.evaluator.evaluate(target, &attitude, now) {
                FeasibilityResult::Infeasible(reason) if reason.is_permanent() => {
                    acq!("[{instance_id}] Target {target} is {reason}, giving up.");
                    return report.finish(AttemptOutcome::Fatal);
                }
                FeasibilityResult::Infeasible(reason) => {
                    log!("[{instance_id}] Attempt {attempt}/{max_retries}: infeasible, {reason}.");
                    continue;
                }
                FeasibilityResult::Feasible { execute_at, slew_deg } => (execute_at, slew_deg),
            };
            report.first_schedule.get_or_insert(execute_at);
            event!(
                "[{instance_id}] Attempt {attempt}: slew {:.2}°, capture at {}.",
                slew_deg.unwrap_or(f64::NAN),
                execute_at.format("%H:%M:%S%.3f")
            );
            progress.progress(ProgressStage::Scheduled).await;

            if cancel.is_cancelled() {
                return report.finish(AttemptOutcome::Cancelled);
            }
            progress.progress(ProgressStage::Capturing).await;
            report.captures += 1;
            let command = CaptureCommand::new(instance_id, attempt, target.clone(), execute_at);
            match self.invoke_capture(command).await {
                Ok(receipt) => {
                    acq!("[{instance_id}] Capture confirmed on attempt {attempt}/{max_retries}.");
                    report.receipt = Some(receipt);
                    return report.finish(AttemptOutcome::Success);
                }
                Err(e) => warn!("[{instance_id}] Attempt {attempt}/{max_retries}: capture failed ({e})."),
            }
        }
        report.finish(AttemptOutcome::ExhaustedRetries)
    }

    /// Issues `command` on its own task so a timed-out invocation keeps running detached
    /// instead of being dropped mid-flight.
    async fn invoke_capture(&self, command: CaptureCommand) -> Result<CaptureReceipt, CaptureError> {
        let camera = Arc::clone(&self.camera);
        let handle = tokio::spawn(async move { camera.capture(command).await });
        let joined = match self.policy.capture_timeout {
            Some(ceiling) => tokio::time::timeout(ceiling, handle).await.map_err(|_| CaptureError::TimedOut)?,
            None => handle.await,
        };
        joined.map_err(|_| CaptureError::HardwareFault)?
    }
}
