use std::collections::HashSet;
use std::fmt;
use std::net::Ipv4Addr;

/// ViewId identifies one membership configuration of a replicated target. It only ever moves
/// forward, one step per membership change.
#[derive(Copy, Clone, Eq, Hash, Ord, PartialOrd, PartialEq)]
pub struct ViewId(u64);

impl ViewId {
    pub fn new(view_id: u64) -> Self {
        ViewId(view_id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Returns `None` instead of wrapping around.
    pub(crate) fn checked_next(&self) -> Option<ViewId> {
        self.0.checked_add(1).map(ViewId)
    }
}

impl fmt::Debug for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct ReplicaId(String);

impl ReplicaId {
    pub fn new(replica_id: impl Into<String>) -> Self {
        ReplicaId(replica_id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// ReplicaEndpoint is a network location that can serve calls for a logical service.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReplicaEndpoint {
    pub replica_id: ReplicaId,
    pub ip_addr: Ipv4Addr,
    pub port: u16,
}

impl ReplicaEndpoint {
    pub fn new(replica_id: impl Into<String>, ip_addr: Ipv4Addr, port: u16) -> Self {
        ReplicaEndpoint {
            replica_id: ReplicaId::new(replica_id),
            ip_addr,
            port,
        }
    }
}

/// View pairs a view id with the replica list that was current for that id. It is immutable;
/// a membership change installs a whole new View.
///
/// Replica ids are unique within a view. If a list names the same replica twice, the first entry
/// wins.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct View {
    view_id: ViewId,
    replicas: Vec<ReplicaEndpoint>,
}

impl View {
    pub fn new(view_id: ViewId, mut replicas: Vec<ReplicaEndpoint>) -> Self {
        let mut seen = HashSet::with_capacity(replicas.len());
        replicas.retain(|replica| seen.insert(replica.replica_id.clone()));

        View { view_id, replicas }
    }

    pub fn view_id(&self) -> ViewId {
        self.view_id
    }

    pub fn replicas(&self) -> &[ReplicaEndpoint] {
        &self.replicas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(replica_id: &str, port: u16) -> ReplicaEndpoint {
        ReplicaEndpoint::new(replica_id, Ipv4Addr::LOCALHOST, port)
    }

    #[test]
    fn repeated_replica_id_keeps_first_entry() {
        let view = View::new(
            ViewId::new(3),
            vec![endpoint("R1", 7001), endpoint("R2", 7002), endpoint("R1", 7003)],
        );

        assert_eq!(view.replicas(), &[endpoint("R1", 7001), endpoint("R2", 7002)]);
    }
}
