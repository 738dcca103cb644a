use super::{ActionName, ActionRequest, InteractionHandle, StatusCode};
use crate::acquisition::{AcquisitionTarget, ProgressSink, ProgressStage, RetryController};
use crate::{acq, event, log, warn};
use async_trait::async_trait;
use std::{
    collections::HashMap,
    str::FromStr,
    sync::{Arc, Mutex, PoisonError},
};
use tokio_util::sync::CancellationToken;

/// Cancellation tokens of all in-flight action instances.
type InFlightTable = Arc<Mutex<HashMap<i64, CancellationToken>>>;

/// Demultiplexes action requests onto the acquisition core and turns every outcome into
/// exactly one [`StatusCode`].
pub struct ActionDispatcher {
    controller: RetryController,
    max_retries: u32,
    in_flight: InFlightTable,
}

/// Removes an instance from the in-flight table when its run ends, however it ends.
struct InFlightGuard {
    table: InFlightTable,
    instance_id: i64,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.table.lock().unwrap_or_else(PoisonError::into_inner).remove(&self.instance_id);
    }
}

/// Forwards controller progress to the interaction handle if the caller asked for it.
struct RequestProgress<'a> {
    interaction: &'a dyn InteractionHandle,
    instance_id: i64,
    enabled: bool,
}

impl<'a> RequestProgress<'a> {
    fn of(request: &'a ActionRequest) -> Self {
        Self {
            interaction: request.interaction().as_ref(),
            instance_id: request.instance_id(),
            enabled: request.report_progress(),
        }
    }
}

#[async_trait]
impl ProgressSink for RequestProgress<'_> {
    async fn progress(&self, stage: ProgressStage) {
        if self.enabled {
            self.interaction.report_progress(self.instance_id, stage).await;
        }
    }
}

impl ActionDispatcher {
    pub fn new(controller: RetryController, max_retries: u32) -> Self {
        Self { controller, max_retries, in_flight: Arc::new(Mutex::new(HashMap::new())) }
    }

    /// Handles `request` to completion.
    ///
    /// The returned code is also reported through the request's interaction handle, except
    /// for [`StatusCode::DuplicateInstance`]: the instance id belongs to the run already in
    /// flight, so the rejection is only returned. With progress requested, every reported
    /// result is preceded by [`ProgressStage::Accepted`], rejections included.
    pub async fn dispatch(&self, request: ActionRequest) -> StatusCode {
        let instance_id = request.instance_id();
        let Some(name) = request.name() else {
            event!("[{instance_id}] Action without name, acknowledging.");
            return Self::reject(&request, StatusCode::Acknowledged).await;
        };
        log!("[{instance_id}] Action '{name}' arrived with {} arguments.", request.attributes().len());

        let Ok(action) = ActionName::from_str(name) else {
            warn!("[{instance_id}] Unsupported action '{name}'.");
            return Self::reject(&request, StatusCode::Unsupported).await;
        };
        let target = match action {
            ActionName::PhotographLocation => match AcquisitionTarget::location_from_attributes(request.attributes()) {
                Ok(target) => target,
                Err(e) => {
                    warn!("[{instance_id}] Invalid arguments for {action}: {e}.");
                    return Self::reject(&request, StatusCode::InvalidArguments).await;
                }
            },
            ActionName::PhotographNow => {
                if !request.attributes().is_empty() {
                    event!("[{instance_id}] Ignoring {} arguments of {action}.", request.attributes().len());
                }
                AcquisitionTarget::CurrentPosition
            }
        };

        let Some((cancel, guard)) = self.register(instance_id) else {
            warn!("[{instance_id}] Instance already in flight, rejecting.");
            return StatusCode::DuplicateInstance;
        };
        acq!("[{instance_id}] {action}: {target}, {} attempts.", self.max_retries);

        let progress = RequestProgress::of(&request);
        progress.progress(ProgressStage::Accepted).await;
        let report = self.controller.attempt(instance_id, &target, self.max_retries, &cancel, &progress).await;

        drop(guard);
        let code = StatusCode::from(report.outcome());
        acq!(
            "[{instance_id}] {action} finished: {} after {} attempts, {} captures.",
            report.outcome(),
            report.attempts(),
            report.captures()
        );
        Self::finish(&request, code).await
    }

    /// Stops issuing captures for `instance_id`.
    ///
    /// # Returns
    /// `true` if the instance was in flight.
    pub fn withdraw(&self, instance_id: i64) -> bool {
        let token = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner).get(&instance_id).cloned();
        if let Some(token) = token {
            acq!("[{instance_id}] Withdrawn, no further captures will be issued.");
            token.cancel();
            true
        } else {
            false
        }
    }

    /// Number of actions currently being worked on.
    pub fn in_flight(&self) -> usize { self.in_flight.lock().unwrap_or_else(PoisonError::into_inner).len() }

    fn register(&self, instance_id: i64) -> Option<(CancellationToken, InFlightGuard)> {
        // entries stay consistent across a panic, the guard only ever removes its own id
        let mut table = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if table.contains_key(&instance_id) {
            return None;
        }
        let token = CancellationToken::new();
        table.insert(instance_id, token.clone());
        Some((token, InFlightGuard { table: Arc::clone(&self.in_flight), instance_id }))
    }

    /// Ends a request before it reaches the acquisition core.
    async fn reject(request: &ActionRequest, code: StatusCode) -> StatusCode {
        RequestProgress::of(request).progress(ProgressStage::Accepted).await;
        Self::finish(request, code).await
    }

    async fn finish(request: &ActionRequest, code: StatusCode) -> StatusCode {
        request.interaction().report_result(request.instance_id(), code).await;
        code
    }

    /// Leaves the in-flight table poisoned, as after a panic while it was held.
    #[cfg(test)]
    pub(super) fn poison_in_flight(&self) {
        let table = Arc::clone(&self.in_flight);
        let _ = std::thread::spawn(move || {
            let _held = table.lock().unwrap_or_else(PoisonError::into_inner);
            panic!("in-flight table poisoned");
        })
        .join();
    }
}
