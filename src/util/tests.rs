use super::*;
use crate::acquisition::TimingProfile;
use chrono::TimeDelta;
use std::collections::HashMap;
use std::time::Duration;

fn config_from(vars: &[(&str, &str)]) -> Result<AdapterConfig, ConfigError> {
    let vars: HashMap<String, String> = vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
    AdapterConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn test_defaults() {
    let config = config_from(&[]).unwrap();
    assert_eq!(config.worst_case_rotation(), TimeDelta::milliseconds(1_000_000));
    assert_eq!(config.attitude_margin(), TimeDelta::milliseconds(20_000));
    assert_eq!(config.max_retries(), 1);
    assert_eq!(config.min_retry_delay(), Duration::ZERO);
    assert_eq!(config.capture_timeout(), Duration::from_millis(1_050_000));
    assert!(config.elevation_mask_deg().abs() < f64::EPSILON);
    assert_eq!(config.spacecraft_url(), "http://localhost:33000");
    assert_eq!(config.control_addr(), "0.0.0.0:1337");
}

#[test]
fn test_overrides() {
    let config = config_from(&[
        ("CAS_WORST_CASE_ROTATION_MS", "1000"),
        ("CAS_ATTITUDE_MARGIN_MS", " 200 "),
        ("CAS_MAX_RETRIES", "3"),
        ("CAS_MIN_RETRY_DELAY_MS", "50"),
        ("CAS_ELEVATION_MASK_DEG", "10.5"),
        ("CAS_SPACECRAFT_URL", "http://10.0.0.2:8080"),
    ])
    .unwrap();
    assert_eq!(config.worst_case_rotation(), TimeDelta::milliseconds(1000));
    assert_eq!(config.attitude_margin(), TimeDelta::milliseconds(200));
    assert_eq!(config.max_retries(), 3);
    assert_eq!(config.min_retry_delay(), Duration::from_millis(50));
    // the default ceiling follows the configured timing
    assert_eq!(config.capture_timeout(), Duration::from_millis(31_200));
    assert!((config.elevation_mask_deg() - 10.5).abs() < f64::EPSILON);
    assert_eq!(config.spacecraft_url(), "http://10.0.0.2:8080");

    let config = config_from(&[("CAS_CAPTURE_TIMEOUT_MS", "5000")]).unwrap();
    assert_eq!(config.capture_timeout(), Duration::from_secs(5));
}

#[test]
fn test_invalid_values() {
    let err = config_from(&[("CAS_MAX_RETRIES", "0")]).unwrap_err();
    assert_eq!(err.to_string(), "CAS_MAX_RETRIES must be positive");
    assert!(matches!(
        config_from(&[("CAS_WORST_CASE_ROTATION_MS", "-5")]),
        Err(ConfigError::NonPositive { key: "CAS_WORST_CASE_ROTATION_MS" })
    ));
    assert!(matches!(
        config_from(&[("CAS_ATTITUDE_MARGIN_MS", "20s")]),
        Err(ConfigError::InvalidValue { key: "CAS_ATTITUDE_MARGIN_MS" })
    ));
    assert!(matches!(
        config_from(&[("CAS_MIN_RETRY_DELAY_MS", "-1")]),
        Err(ConfigError::InvalidValue { key: "CAS_MIN_RETRY_DELAY_MS" })
    ));
    assert!(matches!(
        config_from(&[("CAS_ELEVATION_MASK_DEG", "95")]),
        Err(ConfigError::InvalidValue { key: "CAS_ELEVATION_MASK_DEG" })
    ));
    assert!(config_from(&[("CAS_MAX_RETRIES", "5000000000")]).is_err());
}

#[test]
fn test_oversized_timing_rejected() {
    assert!(matches!(
        config_from(&[("CAS_WORST_CASE_ROTATION_MS", "9223372036854775807")]),
        Err(ConfigError::TooLarge { key: "CAS_WORST_CASE_ROTATION_MS" })
    ));
    assert!(matches!(
        config_from(&[("CAS_ATTITUDE_MARGIN_MS", "9000000000000000")]),
        Err(ConfigError::TooLarge { key: "CAS_ATTITUDE_MARGIN_MS" })
    ));
    // a week of rotation plus a week of margin still yields a default ceiling
    let week = TimingProfile::MAX_DURATION_MS.to_string();
    let config = config_from(&[("CAS_WORST_CASE_ROTATION_MS", &week), ("CAS_ATTITUDE_MARGIN_MS", &week)]).unwrap();
    assert_eq!(config.capture_timeout(), Duration::from_millis(2 * 604_800_000 + 30_000));
}
