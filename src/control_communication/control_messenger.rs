use super::control_endpoint::{ControlEndpoint, ControlEvent};
use super::control_messages::{
    ActionArrived, ActionProgress, ActionResult, Attribute, DownstreamContent, Pong, UpstreamContent, ValueReply,
    attributes_from_wire,
};
use crate::acquisition::ProgressStage;
use crate::mc::{ActionRequest, InteractionHandle, MonitorAndControlAdapter, StatusCode};
use crate::{error, event, info, log, warn};
use async_trait::async_trait;
use std::sync::Arc;

/// Writes progress and results of one action back to the control clients.
struct EndpointInteraction {
    endpoint: Arc<ControlEndpoint>,
}

#[async_trait]
impl InteractionHandle for EndpointInteraction {
    async fn report_progress(&self, instance_id: i64, stage: ProgressStage) {
        self.endpoint.send_downstream(DownstreamContent::ActionProgress(ActionProgress {
            instance_id,
            stage: stage.code(),
        }));
    }

    async fn report_result(&self, instance_id: i64, code: StatusCode) {
        self.endpoint.send_downstream(DownstreamContent::ActionResult(ActionResult { instance_id, code: code.code() }));
    }
}

/// Routes upstream control messages into the adapter.
pub struct ControlMessenger {
    endpoint: Arc<ControlEndpoint>,
}

impl ControlMessenger {
    pub fn start(endpoint: Arc<ControlEndpoint>, adapter: Arc<dyn MonitorAndControlAdapter>) -> Self {
        let Some(mut receiver) = endpoint.take_events() else {
            error!("Control endpoint already has a messenger attached.");
            return Self { endpoint };
        };
        let endpoint_local = Arc::clone(&endpoint);

        tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                match event {
                    ControlEvent::Connected => info!("Control client connected."),
                    ControlEvent::Disconnected => info!("Control client disconnected."),
                    ControlEvent::Message(UpstreamContent::Ping(ping)) => {
                        endpoint_local.send_downstream(DownstreamContent::Pong(Pong { echo: ping.echo }));
                    }
                    ControlEvent::Message(UpstreamContent::ActionArrived(action)) => {
                        Self::spawn_action(&endpoint_local, &adapter, action);
                    }
                    ControlEvent::Message(UpstreamContent::WithdrawAction(withdraw)) => {
                        if !adapter.withdraw_action(withdraw.instance_id) {
                            event!("[{}] Withdraw for unknown instance ignored.", withdraw.instance_id);
                        }
                    }
                    ControlEvent::Message(UpstreamContent::GetValue(get)) => {
                        let value = adapter.on_get_value(&get.name).as_ref().map(Attribute::from);
                        endpoint_local.send_downstream(DownstreamContent::ValueReply(ValueReply { name: get.name, value }));
                    }
                }
            }
            log!("Control messenger stopped.");
        });

        Self { endpoint }
    }

    fn spawn_action(endpoint: &Arc<ControlEndpoint>, adapter: &Arc<dyn MonitorAndControlAdapter>, action: ActionArrived) {
        let instance_id = action.instance_id;
        let attributes = match attributes_from_wire(action.attributes) {
            Ok(attributes) => attributes,
            Err(e) => {
                warn!("[{instance_id}] Undecodable action arguments: {e}.");
                if action.report_progress {
                    endpoint.send_downstream(DownstreamContent::ActionProgress(ActionProgress {
                        instance_id,
                        stage: ProgressStage::Accepted.code(),
                    }));
                }
                endpoint.send_downstream(DownstreamContent::ActionResult(ActionResult {
                    instance_id,
                    code: StatusCode::InvalidArguments.code(),
                }));
                return;
            }
        };
        let interaction = Arc::new(EndpointInteraction { endpoint: Arc::clone(endpoint) });
        let request = ActionRequest::new(action.name, attributes, instance_id, action.report_progress, interaction);
        let adapter_local = Arc::clone(adapter);
        tokio::spawn(async move {
            // the run already holding this id keeps reporting, so nothing goes downstream here
            if adapter_local.action_arrived(request).await == StatusCode::DuplicateInstance {
                warn!("[{instance_id}] Action rejected, instance id already in flight.");
            }
        });
    }

    pub fn endpoint(&self) -> Arc<ControlEndpoint> { Arc::clone(&self.endpoint) }
}
