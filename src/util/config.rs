use crate::acquisition::TimingProfile;
use chrono::TimeDelta;
use std::{env, str::FromStr, time::Duration};
use strum_macros::Display;

/// Errors raised while reading the adapter configuration.
#[derive(Debug, Display)]
pub enum ConfigError {
    #[strum(to_string = "invalid value for {key}")]
    InvalidValue { key: &'static str },
    #[strum(to_string = "{key} must be positive")]
    NonPositive { key: &'static str },
    #[strum(to_string = "{key} exceeds the supported maximum")]
    TooLarge { key: &'static str },
}

impl std::error::Error for ConfigError {}

/// Runtime configuration of the camera acquisitor, read once at startup.
///
/// Every value has a default so the service starts without any environment set up.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    /// Worst-case duration of any attitude maneuver in ms.
    worst_case_rotation_ms: i64,
    /// Safety margin added on top of every maneuver in ms.
    attitude_margin_ms: i64,
    /// Attempts per action, the first try included.
    max_retries: u32,
    /// Pause between two attempts.
    min_retry_delay: Duration,
    /// Wall-clock ceiling for a single capture invocation.
    capture_timeout: Duration,
    /// Minimum elevation of the spacecraft above a target's horizon in degrees.
    elevation_mask_deg: f64,
    /// Base URL of the spacecraft REST backend (attitude + camera).
    spacecraft_url: String,
    /// Bind address of the control substrate endpoint.
    control_addr: String,
}

impl AdapterConfig {
    const DEF_WORST_CASE_ROTATION_MS: i64 = 1_000_000;
    const DEF_ATTITUDE_MARGIN_MS: i64 = 20_000;
    const DEF_MAX_RETRIES: u32 = 1;
    /// Added to rotation and margin for the default capture ceiling.
    const DEF_CAPTURE_GRACE_MS: i64 = 30_000;
    const DEF_SPACECRAFT_URL: &'static str = "http://localhost:33000";
    const DEF_CONTROL_ADDR: &'static str = "0.0.0.0:1337";

    /// Reads the configuration from `CAS_*` environment variables.
    ///
    /// # Errors
    /// [`ConfigError`] if a variable is set but unparseable or out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where F: Fn(&str) -> Option<String> {
        let parse = |key: &'static str| -> Result<Option<i64>, ConfigError> {
            lookup(key).map(|v| v.trim().parse::<i64>()).transpose().map_err(|_| ConfigError::InvalidValue { key })
        };
        let positive = |key: &'static str, def: i64| -> Result<i64, ConfigError> {
            let val = parse(key)?.unwrap_or(def);
            if val > 0 { Ok(val) } else { Err(ConfigError::NonPositive { key }) }
        };
        let bounded = |key: &'static str, def: i64| -> Result<i64, ConfigError> {
            let val = positive(key, def)?;
            if val <= TimingProfile::MAX_DURATION_MS { Ok(val) } else { Err(ConfigError::TooLarge { key }) }
        };

        let worst_case_rotation_ms = bounded("CAS_WORST_CASE_ROTATION_MS", Self::DEF_WORST_CASE_ROTATION_MS)?;
        let attitude_margin_ms = bounded("CAS_ATTITUDE_MARGIN_MS", Self::DEF_ATTITUDE_MARGIN_MS)?;
        let max_retries = u32::try_from(positive("CAS_MAX_RETRIES", i64::from(Self::DEF_MAX_RETRIES))?)
            .map_err(|_| ConfigError::InvalidValue { key: "CAS_MAX_RETRIES" })?;
        let min_retry_delay_ms = parse("CAS_MIN_RETRY_DELAY_MS")?.unwrap_or(0);
        let min_retry_delay = u64::try_from(min_retry_delay_ms)
            .map(Duration::from_millis)
            .map_err(|_| ConfigError::InvalidValue { key: "CAS_MIN_RETRY_DELAY_MS" })?;
        let default_capture_timeout_ms = worst_case_rotation_ms
            .checked_add(attitude_margin_ms)
            .and_then(|lead| lead.checked_add(Self::DEF_CAPTURE_GRACE_MS))
            .ok_or(ConfigError::InvalidValue { key: "CAS_CAPTURE_TIMEOUT_MS" })?;
        let capture_timeout_ms = positive("CAS_CAPTURE_TIMEOUT_MS", default_capture_timeout_ms)?;
        let elevation_mask_deg = match lookup("CAS_ELEVATION_MASK_DEG") {
            Some(v) => parse_from_str(&v, "CAS_ELEVATION_MASK_DEG")?,
            None => 0.0,
        };
        if !(-90.0..90.0).contains(&elevation_mask_deg) {
            return Err(ConfigError::InvalidValue { key: "CAS_ELEVATION_MASK_DEG" });
        }

        Ok(Self {
            worst_case_rotation_ms,
            attitude_margin_ms,
            max_retries,
            min_retry_delay,
            capture_timeout: Duration::from_millis(capture_timeout_ms.unsigned_abs()),
            elevation_mask_deg,
            spacecraft_url: lookup("CAS_SPACECRAFT_URL").unwrap_or_else(|| Self::DEF_SPACECRAFT_URL.to_string()),
            control_addr: lookup("CAS_CONTROL_ADDR").unwrap_or_else(|| Self::DEF_CONTROL_ADDR.to_string()),
        })
    }

    pub fn worst_case_rotation(&self) -> TimeDelta { TimeDelta::milliseconds(self.worst_case_rotation_ms) }
    pub fn attitude_margin(&self) -> TimeDelta { TimeDelta::milliseconds(self.attitude_margin_ms) }
    pub fn max_retries(&self) -> u32 { self.max_retries }
    pub fn min_retry_delay(&self) -> Duration { self.min_retry_delay }
    pub fn capture_timeout(&self) -> Duration { self.capture_timeout }
    pub fn elevation_mask_deg(&self) -> f64 { self.elevation_mask_deg }
    pub fn spacecraft_url(&self) -> &str { &self.spacecraft_url }
    pub fn control_addr(&self) -> &str { &self.control_addr }
}

fn parse_from_str<T: FromStr>(value: &str, key: &'static str) -> Result<T, ConfigError> {
    value.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue { key })
}
