pub mod acquisition;
pub mod attitude;
pub mod response_common;
