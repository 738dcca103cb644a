#![allow(clippy::similar_names)]
#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]
mod acquisition;
mod control_communication;
mod flight_control;
mod geometry;
mod http_handler;
mod imaging;
mod mc;
mod util;

use crate::control_communication::{ControlEndpoint, ControlMessenger, DownstreamContent, Registered};
use crate::geometry::{GeometryContext, ReferenceFrame, Wgs84GeometryProvider};
use crate::mc::{MonitorAndControlAdapter, RegistrationTable};
use crate::util::{AdapterConfig, Keychain};
use std::sync::Arc;

#[cfg(all(feature = "profiling", not(target_env = "msvc")))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() {
    let config = AdapterConfig::from_env().unwrap_or_else(|e| fatal!("Invalid configuration: {e}"));
    info!(
        "Starting camera acquisitor: rotation {} ms, margin {} ms, {} attempts per action.",
        config.worst_case_rotation().num_milliseconds(),
        config.attitude_margin().num_milliseconds(),
        config.max_retries()
    );

    let provider = Arc::new(Wgs84GeometryProvider::new(ReferenceFrame::Itrf));
    let geometry =
        GeometryContext::acquire(provider).unwrap_or_else(|e| fatal!("Geometry context unavailable: {e}"));
    let keychain = Keychain::new(&config, geometry).unwrap_or_else(|e| fatal!("Initialization failed: {e}"));
    info!("Geometry context ready in {}.", keychain.geometry().frame());

    let mut table = RegistrationTable::new();
    keychain.adapter().initial_registrations(&mut table);
    info!("Registered actions {:?}, parameters {:?}.", table.action_names(), table.parameter_names());

    let greeting = DownstreamContent::Registered(Registered::from(&table));
    let endpoint = ControlEndpoint::start(config.control_addr(), greeting)
        .await
        .unwrap_or_else(|e| fatal!("Cannot bind control endpoint {}: {e}", config.control_addr()));
    let messenger = ControlMessenger::start(Arc::new(endpoint), keychain.adapter());
    info!("Waiting for control clients on {}.", messenger.endpoint().local_addr());

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Cannot listen for shutdown signal: {e}");
    }
    let in_flight = keychain.adapter().dispatcher().in_flight();
    if in_flight > 0 {
        warn!("Shutting down with {in_flight} actions in flight.");
    }
    if let Some(last) = keychain.a_comp().last_sample().await {
        log!("Last attitude sample at {}.", last.timestamp().format("%H:%M:%S%.3f"));
    }
    info!("Shutting down after {} images.", keychain.c_cont().images_taken());
}
