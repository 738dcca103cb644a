mod config;
mod keychain;
pub mod logger;

#[cfg(test)]
mod tests;

pub use config::{AdapterConfig, ConfigError};
pub use keychain::Keychain;
