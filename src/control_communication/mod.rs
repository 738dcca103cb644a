//! TCP bridge standing in for the monitor-and-control substrate on the spacecraft bus.
//! The `control_endpoint` module owns the sockets and the length-prefixed framing,
//! `control_messenger` routes upstream messages into the adapter and `control_messages`
//! defines the `prost` wire format.

mod control_endpoint;
mod control_messages;
mod control_messenger;

#[cfg(test)]
mod tests;

pub use control_endpoint::{ControlEndpoint, ControlEvent};
pub use control_messages::{DownstreamContent, Registered};
pub use control_messenger::ControlMessenger;
