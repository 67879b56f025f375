use crate::cluster::ReplicaEndpoint;
use crate::invoker::{InvocationError, InvocationInput, InvocationOutput};

/// Transport delivers one call envelope to one replica. Implementations own connection handling
/// and per-attempt timeouts; the proxy owns replica selection and failover.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, target: &ReplicaEndpoint, input: InvocationInput) -> Result<InvocationOutput, SendError>;

    /// Called after the proxy installs a new view. Connection state for endpoints outside
    /// `replicas` can be released.
    fn retain_replicas(&self, _replicas: &[ReplicaEndpoint]) {}
}

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    /// The replica was reached and refused the call.
    #[error("Replica rejected the call: {0}")]
    Rejected(InvocationError),

    /// The replica replied with something we can't make sense of.
    #[error("Malformed reply: {0}")]
    MalformedReply(String),

    /// Timeout, connection refused, broken connection and so on. Retryable on another replica.
    #[error("Transport failure: {0}")]
    Transport(String),
}
