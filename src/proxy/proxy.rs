use crate::cluster::{ReplicaEndpoint, ReplicaId, View};
use crate::invoker::{BusinessFault, InvocationError, InvocationInput};
use crate::proxy::interceptor::{Next, ProxyCall, ProxyInterceptor};
use crate::proxy::view_cache::ViewCache;
use crate::proxy::{LoadBalancePolicy, SendError, Transport};
use bytes::Bytes;
use std::collections::HashSet;
use std::sync::Arc;

/// InvokeError is everything a caller of `LoadBalancingProxy::invoke()` can see. Transport
/// failures of individual attempts are never surfaced; they are retried on other replicas.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum InvokeError {
    /// The service itself failed. Retrying is the caller's call.
    #[error(transparent)]
    BusinessFault(BusinessFault),

    #[error("No replicas known for service '{0}'")]
    NoReplicasKnown(String),

    #[error("No reachable replica for service '{service_name}' after {attempts} attempts")]
    NoReachableReplica { service_name: String, attempts: usize },

    /// The service has been withdrawn. Stop calling it.
    #[error("Target for service '{0}' is gone")]
    TargetGone(String),

    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    /// An interceptor refused the call.
    #[error("Call aborted: {0}")]
    Aborted(String),
}

pub struct LoadBalancingProxyConfig {
    pub logger: slog::Logger,
    pub service_name: String,
    pub initial_view: View,
    pub policy: Box<dyn LoadBalancePolicy>,
    pub transport: Arc<dyn Transport>,
    pub interceptors: Vec<Arc<dyn ProxyInterceptor>>,
}

/// LoadBalancingProxy presents one logical service backed by a set of replicas.
///
/// Each call goes to one replica picked by the policy. The call carries the proxy's cached view
/// id; if the replica knows a newer view it sends it back and the proxy adopts it. If a replica
/// can't be reached, the call moves on to another one until every cached replica has been tried.
///
/// Clones share the cache, policy and transport, so a proxy can be handed to many tasks.
#[derive(Clone)]
pub struct LoadBalancingProxy {
    inner: Arc<ProxyInner>,
}

struct ProxyInner {
    core: ProxyCore,
    interceptors: Vec<Arc<dyn ProxyInterceptor>>,
}

pub(crate) struct ProxyCore {
    logger: slog::Logger,
    service_name: Arc<str>,
    cache: ViewCache,
    policy: Box<dyn LoadBalancePolicy>,
    transport: Arc<dyn Transport>,
}

impl LoadBalancingProxy {
    pub fn new(config: LoadBalancingProxyConfig) -> Self {
        let logger = config
            .logger
            .new(slog::o!("Service" => config.service_name.clone()));

        LoadBalancingProxy {
            inner: Arc::new(ProxyInner {
                core: ProxyCore {
                    logger,
                    service_name: Arc::from(config.service_name),
                    cache: ViewCache::new(config.initial_view),
                    policy: config.policy,
                    transport: config.transport,
                },
                interceptors: config.interceptors,
            }),
        }
    }

    pub fn service_name(&self) -> &str {
        &self.inner.core.service_name
    }

    /// The last view this proxy has observed.
    pub fn cached_view(&self) -> Arc<View> {
        self.inner.core.cache.snapshot()
    }

    pub async fn invoke(&self, payload: Bytes) -> Result<Bytes, InvokeError> {
        let call = ProxyCall::new(self.inner.core.service_name.clone(), payload);
        Next::new(&self.inner.interceptors, &self.inner.core).run(call).await
    }
}

impl ProxyCore {
    pub(crate) async fn invoke_with_failover(&self, payload: Bytes) -> Result<Bytes, InvokeError> {
        let mut failed: HashSet<ReplicaId> = HashSet::new();

        loop {
            // Re-read every attempt: a concurrent call may have installed a newer view.
            let view = self.cache.snapshot();
            if view.replicas().is_empty() && failed.is_empty() {
                return Err(InvokeError::NoReplicasKnown(self.service_name.to_string()));
            }

            let candidates: Vec<ReplicaEndpoint> = view
                .replicas()
                .iter()
                .filter(|replica| !failed.contains(&replica.replica_id))
                .cloned()
                .collect();
            let target = match self.policy.choose(&candidates) {
                Some(target) => target.clone(),
                None => {
                    slog::warn!(self.logger, "All {} attempted replicas failed", failed.len());
                    return Err(InvokeError::NoReachableReplica {
                        service_name: self.service_name.to_string(),
                        attempts: failed.len(),
                    });
                }
            };

            let input = InvocationInput {
                service_name: self.service_name.to_string(),
                client_view_id: Some(view.view_id()),
                payload: payload.clone(),
            };

            match self.transport.send(&target, input).await {
                Ok(output) => {
                    if let Some(view_update) = output.view_update {
                        let new_view = View::from(view_update);
                        let new_view_id = new_view.view_id();
                        if self.cache.compare_and_set(view.view_id(), new_view.clone()) {
                            self.transport.retain_replicas(new_view.replicas());
                            slog::info!(
                                self.logger,
                                "Adopted view {:?} (was {:?}) from {:?}",
                                new_view_id,
                                view.view_id(),
                                target.replica_id
                            );
                        }
                    }
                    return output.result.map_err(InvokeError::BusinessFault);
                }
                Err(SendError::Transport(reason)) => {
                    slog::warn!(
                        self.logger,
                        "Failing over. Replica {:?} unreachable: {}",
                        target.replica_id,
                        reason
                    );
                    failed.insert(target.replica_id);
                }
                Err(SendError::Rejected(InvocationError::InvocationsDisabled(_))) => {
                    // The call never ran there, so another replica may take it.
                    slog::info!(
                        self.logger,
                        "Failing over. Replica {:?} refuses invocations",
                        target.replica_id
                    );
                    failed.insert(target.replica_id);
                }
                Err(SendError::Rejected(InvocationError::TargetGone(service_name))) => {
                    return Err(InvokeError::TargetGone(service_name));
                }
                Err(SendError::Rejected(InvocationError::InvalidEnvelope(message))) => {
                    return Err(InvokeError::ProtocolViolation(message));
                }
                Err(SendError::MalformedReply(message)) => {
                    return Err(InvokeError::ProtocolViolation(message));
                }
            }
        }
    }
}
