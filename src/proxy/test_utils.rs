use crate::cluster::{ReplicaEndpoint, ReplicaId};
use crate::invoker::{InvocationInput, InvocationOutput, ViewStampedInvoker};
use crate::proxy::{SendError, Transport};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

type UnreachableHook = Box<dyn Fn() + Send + Sync>;

/// LocalTransport wires proxies straight to in-process invokers. Replicas can be marked
/// unreachable to simulate transport failures, and every attempt is recorded.
pub(crate) struct LocalTransport {
    invokers: Mutex<HashMap<ReplicaId, ViewStampedInvoker>>,
    unreachable: Mutex<HashSet<ReplicaId>>,
    attempts: Mutex<Vec<ReplicaId>>,
    retained: Mutex<Vec<Vec<ReplicaId>>>,
    on_unreachable: Mutex<Option<UnreachableHook>>,
}

impl LocalTransport {
    pub(crate) fn new() -> Self {
        LocalTransport {
            invokers: Mutex::new(HashMap::new()),
            unreachable: Mutex::new(HashSet::new()),
            attempts: Mutex::new(vec![]),
            retained: Mutex::new(vec![]),
            on_unreachable: Mutex::new(None),
        }
    }

    pub(crate) fn add_replica(&self, replica_id: ReplicaId, invoker: ViewStampedInvoker) {
        self.invokers.lock().unwrap().insert(replica_id, invoker);
    }

    pub(crate) fn set_reachable(&self, replica_id: &ReplicaId, reachable: bool) {
        let mut unreachable = self.unreachable.lock().unwrap();
        if reachable {
            unreachable.remove(replica_id);
        } else {
            unreachable.insert(replica_id.clone());
        }
    }

    /// Runs `hook` during every attempt at an unreachable replica, before the failure is returned.
    pub(crate) fn on_unreachable(&self, hook: impl Fn() + Send + Sync + 'static) {
        self.on_unreachable.lock().unwrap().replace(Box::new(hook));
    }

    pub(crate) fn attempts(&self) -> Vec<ReplicaId> {
        self.attempts.lock().unwrap().clone()
    }

    /// Replica lists handed to `retain_replicas()`, oldest first.
    pub(crate) fn retained(&self) -> Vec<Vec<ReplicaId>> {
        self.retained.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Transport for LocalTransport {
    async fn send(&self, target: &ReplicaEndpoint, input: InvocationInput) -> Result<InvocationOutput, SendError> {
        self.attempts.lock().unwrap().push(target.replica_id.clone());

        if self.unreachable.lock().unwrap().contains(&target.replica_id) {
            if let Some(hook) = self.on_unreachable.lock().unwrap().as_ref() {
                hook();
            }
            return Err(SendError::Transport("Connection refused".into()));
        }

        let invoker = self.invokers.lock().unwrap().get(&target.replica_id).cloned();
        match invoker {
            Some(invoker) => invoker.handle(input).await.map_err(SendError::Rejected),
            None => Err(SendError::Transport("No such replica".into())),
        }
    }

    fn retain_replicas(&self, replicas: &[ReplicaEndpoint]) {
        self.retained
            .lock()
            .unwrap()
            .push(replicas.iter().map(|r| r.replica_id.clone()).collect());
    }
}
