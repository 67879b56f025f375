use crate::cluster::{ReplicaEndpoint, View, ViewId};
use bytes::Bytes;

/// InvocationInput is the call envelope a proxy sends to a replica.
#[derive(Clone, Debug)]
pub struct InvocationInput {
    pub service_name: String,
    /// The view the caller believes is current. Required; `None` is a protocol violation.
    pub client_view_id: Option<ViewId>,
    pub payload: Bytes,
}

/// InvocationOutput is the envelope a replica sends back for a call it dispatched.
#[derive(Clone, Debug, PartialEq)]
pub struct InvocationOutput {
    pub result: Result<Bytes, BusinessFault>,
    /// Present only if the caller's view was stale.
    pub view_update: Option<ViewUpdate>,
}

/// ViewUpdate carries a newer view back to a caller. Bundling the id with the replicas means one
/// can never be sent without the other.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ViewUpdate {
    pub view_id: ViewId,
    pub replicas: Vec<ReplicaEndpoint>,
}

impl From<&View> for ViewUpdate {
    fn from(view: &View) -> Self {
        ViewUpdate {
            view_id: view.view_id(),
            replicas: view.replicas().to_vec(),
        }
    }
}

impl From<ViewUpdate> for View {
    fn from(update: ViewUpdate) -> Self {
        View::new(update.view_id, update.replicas)
    }
}

/// BusinessFault is a logical failure raised by the service itself. It is passed through to the
/// caller untouched and never retried.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("Business fault: {message}")]
pub struct BusinessFault {
    pub message: String,
    pub details: Bytes,
}

impl BusinessFault {
    pub fn new(message: impl Into<String>) -> Self {
        BusinessFault {
            message: message.into(),
            details: Bytes::new(),
        }
    }

    pub fn with_details(message: impl Into<String>, details: Bytes) -> Self {
        BusinessFault {
            message: message.into(),
            details,
        }
    }
}

/// InvocationError covers every way a replica can refuse a call before (or instead of) returning
/// a business result.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum InvocationError {
    /// Protocol violation. Fatal to the request, not retried.
    #[error("Invalid invocation envelope: {0}")]
    InvalidEnvelope(String),

    /// The service has been withdrawn (or was never published). Callers should stop calling it.
    #[error("Target for service '{0}' is gone")]
    TargetGone(String),

    /// The service exists but is refusing calls for now. The call was not executed, so it's safe
    /// to try another replica.
    #[error("Invocations of service '{0}' are disabled")]
    InvocationsDisabled(String),
}
