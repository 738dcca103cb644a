//! Monitor-and-control surface: attribute values, action requests and status codes, the
//! action dispatcher and the registration interface towards the control substrate.

mod action;
mod adapter;
mod attribute;
mod dispatcher;
mod registration;


pub use action::{ActionName, ActionRequest, InteractionHandle, StatusCode};
pub use adapter::{CameraAcquisitorAdapter, MonitorAndControlAdapter};
pub use attribute::{AttributeError, AttributeType, AttributeValue};
pub use dispatcher::ActionDispatcher;
pub use registration::{
    ActionDefinition, ArgumentDefinition, ParameterDefinition, Registration, RegistrationMode,
    RegistrationTable,
};
