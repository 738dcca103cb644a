use super::http_response::{acquisition, attitude};

pub mod acquisition_put;
pub mod attitude_get;
pub mod request_common;
