use super::{Ellipsoid, ReferenceFrame};
use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use std::sync::Arc;
use strum_macros::Display;

/// Errors raised while querying a [`GeometryProvider`].
#[derive(Debug, Display)]
pub enum GeometryError {
    /// The provider has no frame/ellipsoid data loaded.
    DataUnavailable,
    /// Frame and ellipsoid delivered by the provider do not belong together.
    FrameMismatch,
    /// No usable UTC clock sample could be taken.
    ClockUnavailable,
}

impl std::error::Error for GeometryError {}

/// Query interface of the external orbital-frame and Earth-ellipsoid data provider.
///
/// Implementations must be cheap to query concurrently, the acquisition core calls
/// [`GeometryProvider::current_utc_timestamp`] once per attempt.
pub trait GeometryProvider: Send + Sync {
    fn reference_frame(&self) -> Result<ReferenceFrame, GeometryError>;
    fn ellipsoid_model(&self) -> Result<Ellipsoid, GeometryError>;
    fn current_utc_timestamp(&self) -> Result<DateTime<Utc>, GeometryError>;
}

/// Default provider: WGS-84 attached to a fixed frame, clock taken from the system.
#[derive(Debug, Clone, Copy)]
pub struct Wgs84GeometryProvider {
    frame: ReferenceFrame,
}

impl Wgs84GeometryProvider {
    pub fn new(frame: ReferenceFrame) -> Self { Self { frame } }
}

impl GeometryProvider for Wgs84GeometryProvider {
    fn reference_frame(&self) -> Result<ReferenceFrame, GeometryError> { Ok(self.frame) }

    fn ellipsoid_model(&self) -> Result<Ellipsoid, GeometryError> { Ok(Ellipsoid::wgs84(self.frame)) }

    fn current_utc_timestamp(&self) -> Result<DateTime<Utc>, GeometryError> { Ok(Utc::now()) }
}

/// Frame and ellipsoid acquired once at startup and held for the process lifetime.
///
/// Read-only after construction, shared between concurrent evaluations without locking.
#[derive(Clone)]
pub struct GeometryContext {
    /// The frame every position handed to the acquisition core is expressed in.
    frame: ReferenceFrame,
    /// The Earth model used for horizon checks.
    ellipsoid: Ellipsoid,
    /// The provider used for clock samples.
    provider: Arc<dyn GeometryProvider>,
}

impl GeometryContext {
    /// Loads frame and ellipsoid from `provider`.
    ///
    /// # Errors
    /// Propagates provider failures and returns [`GeometryError::FrameMismatch`] if the
    /// ellipsoid is not attached to the provider's reference frame. Callers treat any error
    /// as fatal, there is no meaningful default.
    pub fn acquire(provider: Arc<dyn GeometryProvider>) -> Result<Self, GeometryError> {
        let frame = provider.reference_frame()?;
        let ellipsoid = provider.ellipsoid_model()?;
        if ellipsoid.body_frame() != frame {
            return Err(GeometryError::FrameMismatch);
        }
        // the clock has to work as well before the context may be handed out
        provider.current_utc_timestamp()?;
        Ok(Self { frame, ellipsoid, provider })
    }

    pub fn frame(&self) -> ReferenceFrame { self.frame }
    pub fn ellipsoid(&self) -> &Ellipsoid { &self.ellipsoid }

    /// Samples the provider clock, truncated to whole milliseconds.
    ///
    /// # Errors
    /// [`GeometryError::ClockUnavailable`] if the provider fails or delivers a timestamp
    /// that cannot be truncated.
    pub fn now(&self) -> Result<DateTime<Utc>, GeometryError> {
        let now = self.provider.current_utc_timestamp()?;
        truncate_to_ms(now).ok_or(GeometryError::ClockUnavailable)
    }
}

/// Truncates `t` to the millisecond granularity used by all acquisition time arithmetic.
pub fn truncate_to_ms(t: DateTime<Utc>) -> Option<DateTime<Utc>> {
    t.duration_trunc(TimeDelta::milliseconds(1)).ok()
}
