use super::{
    ActionDefinition, ActionDispatcher, ActionName, ActionRequest, ArgumentDefinition, AttributeType,
    AttributeValue, ParameterDefinition, Registration, RegistrationMode, StatusCode,
};
use crate::info;
use async_trait::async_trait;

/// Capabilities a monitor-and-control host runtime calls into.
///
/// A host registers one implementer and forwards its callbacks, the implementer does not
/// depend on the host's lifecycle.
#[async_trait]
pub trait MonitorAndControlAdapter: Send + Sync {
    /// Declares parameters and actions once at startup.
    fn initial_registrations(&self, registration: &mut dyn Registration);
    /// Current value of a parameter, `None` if unknown.
    fn on_get_value(&self, identifier: &str) -> Option<AttributeValue>;
    /// Sets parameters, returns `true` if all of them were accepted.
    fn on_set_value(&self, identifiers: &[String], values: &[AttributeValue]) -> bool;
    /// Executes an action and reports its progress and result through the request.
    async fn action_arrived(&self, request: ActionRequest) -> StatusCode;
    /// The substrate lost interest in an action instance.
    fn withdraw_action(&self, instance_id: i64) -> bool;
}

/// Adapter exposing the camera target acquisition to the control substrate.
pub struct CameraAcquisitorAdapter {
    dispatcher: ActionDispatcher,
}

impl CameraAcquisitorAdapter {
    pub fn new(dispatcher: ActionDispatcher) -> Self { Self { dispatcher } }

    pub fn dispatcher(&self) -> &ActionDispatcher { &self.dispatcher }

    /// No camera parameters (exposure, gain, resolution) are exposed yet.
    fn parameter_definitions() -> Vec<ParameterDefinition> { Vec::new() }

    fn action_definitions() -> Vec<ActionDefinition> {
        vec![
            ActionDefinition {
                name: ActionName::PhotographLocation.to_string(),
                description: "Photograph a geodetic location as soon as it is reachable".to_string(),
                arguments: vec![
                    ArgumentDefinition::required("latitude", AttributeType::Double),
                    ArgumentDefinition::required("longitude", AttributeType::Double),
                    ArgumentDefinition::optional("altitude", AttributeType::Double),
                    ArgumentDefinition::optional("deadline", AttributeType::Time),
                ],
            },
            ActionDefinition {
                name: ActionName::PhotographNow.to_string(),
                description: "Photograph whatever is currently in view".to_string(),
                arguments: Vec::new(),
            },
        ]
    }
}

#[async_trait]
impl MonitorAndControlAdapter for CameraAcquisitorAdapter {
    fn initial_registrations(&self, registration: &mut dyn Registration) {
        // keep definitions of previous runs
        registration.set_mode(RegistrationMode::DontUpdateIfExists);
        info!("Registering parameters");
        registration.register_parameters(Self::parameter_definitions());
        info!("Registering camera actions");
        registration.register_actions(Self::action_definitions());
    }

    fn on_get_value(&self, _identifier: &str) -> Option<AttributeValue> { None }

    fn on_set_value(&self, _identifiers: &[String], _values: &[AttributeValue]) -> bool { false }

    async fn action_arrived(&self, request: ActionRequest) -> StatusCode { self.dispatcher.dispatch(request).await }

    fn withdraw_action(&self, instance_id: i64) -> bool { self.dispatcher.withdraw(instance_id) }
}
