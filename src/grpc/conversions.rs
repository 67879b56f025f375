use crate::cluster::{ReplicaEndpoint, ViewId};
use crate::grpc::{ProtoReplicaEndpoint, ProtoViewId, ProtoViewUpdate};
use crate::invoker::ViewUpdate;
use std::convert::TryFrom;
use std::net::Ipv4Addr;

/// A wire message that decoded fine but can't be represented by our types.
#[derive(Debug, thiserror::Error)]
#[error("Malformed proto: {0}")]
pub struct MalformedProto(pub String);

impl From<ViewId> for ProtoViewId {
    fn from(view_id: ViewId) -> Self {
        ProtoViewId { id: view_id.as_u64() }
    }
}

impl From<ProtoViewId> for ViewId {
    fn from(proto: ProtoViewId) -> Self {
        ViewId::new(proto.id)
    }
}

impl From<&ReplicaEndpoint> for ProtoReplicaEndpoint {
    fn from(endpoint: &ReplicaEndpoint) -> Self {
        ProtoReplicaEndpoint {
            replica_id: endpoint.replica_id.as_str().to_string(),
            ipv4_addr: u32::from(endpoint.ip_addr),
            port: endpoint.port as u32,
        }
    }
}

impl TryFrom<ProtoReplicaEndpoint> for ReplicaEndpoint {
    type Error = MalformedProto;

    fn try_from(proto: ProtoReplicaEndpoint) -> Result<Self, Self::Error> {
        if proto.replica_id.is_empty() {
            return Err(MalformedProto("Replica endpoint without replica id".into()));
        }
        let port = u16::try_from(proto.port)
            .map_err(|_| MalformedProto(format!("Replica port {} out of range", proto.port)))?;

        Ok(ReplicaEndpoint::new(proto.replica_id, Ipv4Addr::from(proto.ipv4_addr), port))
    }
}

impl From<ViewUpdate> for ProtoViewUpdate {
    fn from(update: ViewUpdate) -> Self {
        ProtoViewUpdate {
            view_id: update.view_id.as_u64(),
            replicas: update.replicas.iter().map(ProtoReplicaEndpoint::from).collect(),
        }
    }
}

impl TryFrom<ProtoViewUpdate> for ViewUpdate {
    type Error = MalformedProto;

    fn try_from(proto: ProtoViewUpdate) -> Result<Self, Self::Error> {
        let mut replicas = Vec::with_capacity(proto.replicas.len());
        for proto_replica in proto.replicas {
            replicas.push(ReplicaEndpoint::try_from(proto_replica)?);
        }

        Ok(ViewUpdate {
            view_id: ViewId::new(proto.view_id),
            replicas,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_port_is_malformed() {
        let proto = ProtoReplicaEndpoint {
            replica_id: "R1".into(),
            ipv4_addr: u32::from(Ipv4Addr::LOCALHOST),
            port: 70_000,
        };

        assert!(ReplicaEndpoint::try_from(proto).is_err());
    }

    #[test]
    fn missing_replica_id_is_malformed() {
        let proto = ProtoReplicaEndpoint {
            replica_id: "".into(),
            ipv4_addr: u32::from(Ipv4Addr::LOCALHOST),
            port: 7001,
        };

        assert!(ReplicaEndpoint::try_from(proto).is_err());
    }

    #[test]
    fn view_update_keeps_replica_order() {
        let update = ViewUpdate {
            view_id: ViewId::new(3),
            replicas: vec![
                ReplicaEndpoint::new("R2", Ipv4Addr::new(10, 0, 0, 2), 7002),
                ReplicaEndpoint::new("R1", Ipv4Addr::new(10, 0, 0, 1), 7001),
            ],
        };

        let decoded = ViewUpdate::try_from(ProtoViewUpdate::from(update.clone())).unwrap();
        assert_eq!(decoded, update);
    }
}
