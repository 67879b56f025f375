use crate::cluster::ReplicaEndpoint;
use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};

/// LoadBalancePolicy picks the replica that the next call attempt goes to.
///
/// `replicas` only contains candidates that haven't failed yet during the current call, so a
/// policy never needs to track failures itself. Return `None` only if `replicas` is empty.
pub trait LoadBalancePolicy: Send + Sync {
    fn choose<'a>(&self, replicas: &'a [ReplicaEndpoint]) -> Option<&'a ReplicaEndpoint>;
}

/// RoundRobin cycles through the replicas. The cursor belongs to a single proxy instance.
#[derive(Default)]
pub struct RoundRobin {
    cursor: AtomicUsize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LoadBalancePolicy for RoundRobin {
    fn choose<'a>(&self, replicas: &'a [ReplicaEndpoint]) -> Option<&'a ReplicaEndpoint> {
        if replicas.is_empty() {
            return None;
        }
        let position = self.cursor.fetch_add(1, Ordering::Relaxed);
        replicas.get(position % replicas.len())
    }
}

/// RandomRobin picks uniformly at random.
#[derive(Default)]
pub struct RandomRobin;

impl LoadBalancePolicy for RandomRobin {
    fn choose<'a>(&self, replicas: &'a [ReplicaEndpoint]) -> Option<&'a ReplicaEndpoint> {
        if replicas.is_empty() {
            return None;
        }
        replicas.get(rand::thread_rng().gen_range(0..replicas.len()))
    }
}

/// FirstAvailable always picks the first replica in view order.
#[derive(Default)]
pub struct FirstAvailable;

impl LoadBalancePolicy for FirstAvailable {
    fn choose<'a>(&self, replicas: &'a [ReplicaEndpoint]) -> Option<&'a ReplicaEndpoint> {
        replicas.first()
    }
}
