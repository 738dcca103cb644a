use chrono::{DateTime, Utc};
use strum_macros::Display;

/// A typed value carried by an action argument or a parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Double(f64),
    Long(i64),
    String(String),
    Boolean(bool),
    Time(DateTime<Utc>),
}

impl AttributeValue {
    /// Numeric view of the value, longs are widened.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Double(v) => Some(*v),
            AttributeValue::Long(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<DateTime<Utc>> {
        match self {
            AttributeValue::Time(t) => Some(*t),
            _ => None,
        }
    }
}

/// Type tags used in parameter and action definitions.
#[derive(Debug, Display, PartialEq, Eq, Clone, Copy)]
pub enum AttributeType {
    Double,
    Long,
    String,
    Boolean,
    Time,
}

/// Structural problems with the arguments of an action.
#[derive(Debug, Display, PartialEq, Eq, Clone, Copy)]
pub enum AttributeError {
    #[strum(to_string = "expected at least {expected} arguments, got {got}")]
    WrongCount { expected: usize, got: usize },
    #[strum(to_string = "argument {index} has the wrong type")]
    WrongType { index: usize },
    #[strum(to_string = "argument {index} carries no value")]
    Missing { index: usize },
}

impl std::error::Error for AttributeError {}
