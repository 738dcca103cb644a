use crate::util::ConfigError;
use chrono::TimeDelta;

/// Immutable per-mission timing constants shared by every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingProfile {
    /// Upper bound for any reorientation of the spacecraft.
    worst_case_rotation: TimeDelta,
    /// Added after every reorientation before the camera may fire.
    safety_margin: TimeDelta,
    /// Attempts per action, the first try included.
    max_retries: u32,
}

impl TimingProfile {
    /// Longest accepted rotation or margin, one week.
    pub const MAX_DURATION_MS: i64 = 7 * 24 * 3_600_000;

    /// Creates a new [`TimingProfile`].
    ///
    /// # Errors
    /// [`ConfigError::NonPositive`] if any of the values is zero or negative,
    /// [`ConfigError::InvalidValue`] if a duration is not a whole number of milliseconds,
    /// [`ConfigError::TooLarge`] if a duration exceeds [`Self::MAX_DURATION_MS`].
    pub fn new(worst_case_rotation: TimeDelta, safety_margin: TimeDelta, max_retries: u32) -> Result<Self, ConfigError> {
        Self::check_duration(worst_case_rotation, "worst_case_rotation")?;
        Self::check_duration(safety_margin, "safety_margin")?;
        if max_retries == 0 {
            return Err(ConfigError::NonPositive { key: "max_retries" });
        }
        Ok(Self { worst_case_rotation, safety_margin, max_retries })
    }

    fn check_duration(value: TimeDelta, key: &'static str) -> Result<(), ConfigError> {
        if value <= TimeDelta::zero() {
            Err(ConfigError::NonPositive { key })
        } else if value.subsec_nanos() % 1_000_000 != 0 {
            Err(ConfigError::InvalidValue { key })
        } else if value > TimeDelta::milliseconds(Self::MAX_DURATION_MS) {
            Err(ConfigError::TooLarge { key })
        } else {
            Ok(())
        }
    }

    /// Convenience constructor taking milliseconds.
    pub fn from_millis(rotation_ms: i64, margin_ms: i64, max_retries: u32) -> Result<Self, ConfigError> {
        let rotation = TimeDelta::try_milliseconds(rotation_ms).ok_or(ConfigError::InvalidValue { key: "worst_case_rotation" })?;
        let margin = TimeDelta::try_milliseconds(margin_ms).ok_or(ConfigError::InvalidValue { key: "safety_margin" })?;
        Self::new(rotation, margin, max_retries)
    }

    pub fn worst_case_rotation(&self) -> TimeDelta { self.worst_case_rotation }
    pub fn safety_margin(&self) -> TimeDelta { self.safety_margin }
    pub fn max_retries(&self) -> u32 { self.max_retries }

    /// Time from a clock sample until the camera may fire after a full reorientation.
    pub fn maneuver_lead(&self) -> TimeDelta { self.worst_case_rotation + self.safety_margin }
}
