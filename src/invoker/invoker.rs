use crate::invoker::{InvocationError, InvocationInput, InvocationOutput, ServiceRegistry, ViewUpdate};

/// ViewStampedInvoker dispatches inbound calls to registered services and stamps each reply with
/// the service's current view whenever the caller's view is stale.
///
/// This is how view changes reach clients: piggybacked on replies to calls they were making
/// anyway. A client's view lags until its next call, which is good enough for load balancing.
#[derive(Clone)]
pub struct ViewStampedInvoker {
    logger: slog::Logger,
    registry: ServiceRegistry,
}

impl ViewStampedInvoker {
    pub fn new(logger: slog::Logger, registry: ServiceRegistry) -> Self {
        ViewStampedInvoker { logger, registry }
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    pub async fn handle(&self, input: InvocationInput) -> Result<InvocationOutput, InvocationError> {
        let client_view_id = input
            .client_view_id
            .ok_or_else(|| InvocationError::InvalidEnvelope("Missing client view id".into()))?;
        if input.service_name.is_empty() {
            return Err(InvocationError::InvalidEnvelope("Missing service name".into()));
        }

        let service = self
            .registry
            .lookup(&input.service_name)
            .ok_or_else(|| InvocationError::TargetGone(input.service_name.clone()))?;
        let target_set = service.target_set();

        if !target_set.invocations_allowed() {
            // Withdrawn targets also report `false`, so tell the two apart.
            return match target_set.current_view() {
                Ok(_) => Err(InvocationError::InvocationsDisabled(input.service_name)),
                Err(_) => Err(InvocationError::TargetGone(input.service_name)),
            };
        }

        let service_name = input.service_name;
        let result = service.handler().handle(input.payload).await;

        // Read the view after the call, so the stamp is never older than the call itself.
        let current_view = match target_set.current_view() {
            Ok(view) => view,
            Err(_) => return Err(InvocationError::TargetGone(service_name)),
        };

        let view_update = if current_view.view_id() != client_view_id {
            slog::debug!(
                self.logger,
                "Client view {:?} of '{}' is stale. Attaching view {:?}.",
                client_view_id,
                service_name,
                current_view.view_id()
            );
            Some(ViewUpdate::from(current_view.as_ref()))
        } else {
            None
        };

        Ok(InvocationOutput { result, view_update })
    }
}
