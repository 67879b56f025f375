use crate::cluster::{ReplicaEndpoint, ReplicaId};
use crate::grpc::grpc_ha_invoker_client::GrpcHaInvokerClient;
use crate::grpc::{
    proto_invocation_error, proto_invocation_result, ProtoInvocationError, ProtoInvocationReq, ProtoInvocationResult,
    ProtoViewId,
};
use crate::invoker::{BusinessFault, InvocationError, InvocationInput, InvocationOutput, ViewUpdate};
use crate::proxy::{SendError, Transport};
use bytes::Bytes;
use std::collections::HashMap;
use std::convert::TryFrom;
use std::sync::Mutex;
use tokio::time::error::Elapsed;
use tokio::time::Duration;
use tonic::transport::{Channel, Endpoint};
use tonic::{Response, Status};

/// GrpcTransport sends call envelopes to `RpcServer`s. It keeps one channel per replica and drops
/// it on any transport failure, so the next attempt at that replica reconnects.
///
/// A channel is only reused for the exact address it was opened to. A replica that shows up at a
/// new address in a later view gets a new channel.
pub struct GrpcTransport {
    logger: slog::Logger,
    rpc_timeout: Duration,
    connect_timeout: Duration,
    clients: Mutex<HashMap<ReplicaId, CachedClient>>,
}

struct CachedClient {
    endpoint: ReplicaEndpoint,
    client: GrpcHaInvokerClient<Channel>,
}

impl GrpcTransport {
    pub fn new(logger: slog::Logger, rpc_timeout: Duration, connect_timeout: Duration) -> Self {
        GrpcTransport {
            logger,
            rpc_timeout,
            connect_timeout,
            clients: Mutex::new(HashMap::new()),
        }
    }

    async fn client(&self, target: &ReplicaEndpoint) -> Result<GrpcHaInvokerClient<Channel>, SendError> {
        if let Some(client) = self.cached_client(target) {
            return Ok(client);
        }

        let url = format!("http://{}:{}", target.ip_addr, target.port);
        slog::debug!(self.logger, "Connecting to {} ...", url);
        let endpoint = Endpoint::from_shared(url)
            .map_err(|e| SendError::Transport(format!("Invalid replica uri: {}", e)))?
            .timeout(self.rpc_timeout);

        let channel = match tokio::time::timeout(self.connect_timeout, endpoint.connect()).await {
            Ok(Ok(channel)) => channel,
            Ok(Err(e)) => return Err(SendError::Transport(format!("Failed to connect: {}", e))),
            Err(_timeout) => return Err(SendError::Transport("Timed out connecting".into())),
        };

        let client = GrpcHaInvokerClient::new(channel);
        self.clients
            .lock()
            .expect("GrpcTransport.client() mutex guard poison")
            .insert(
                target.replica_id.clone(),
                CachedClient {
                    endpoint: target.clone(),
                    client: client.clone(),
                },
            );

        Ok(client)
    }

    fn cached_client(&self, target: &ReplicaEndpoint) -> Option<GrpcHaInvokerClient<Channel>> {
        self.clients
            .lock()
            .expect("GrpcTransport.cached_client() mutex guard poison")
            .get(&target.replica_id)
            .filter(|cached| cached.endpoint == *target)
            .map(|cached| cached.client.clone())
    }

    fn evict(&self, replica_id: &ReplicaId) {
        self.clients
            .lock()
            .expect("GrpcTransport.evict() mutex guard poison")
            .remove(replica_id);
    }

    fn convert_invocation_input(input: InvocationInput) -> ProtoInvocationReq {
        ProtoInvocationReq {
            service_name: input.service_name,
            client_view: input.client_view_id.map(ProtoViewId::from),
            payload: input.payload.to_vec(),
        }
    }

    fn convert_invocation_rpc_reply(
        rpc_reply: Result<Result<Response<ProtoInvocationResult>, Status>, Elapsed>,
    ) -> Result<InvocationOutput, SendError> {
        let rpc_result = match rpc_reply {
            Ok(Ok(rpc_result)) => rpc_result.into_inner(),
            Ok(Err(rpc_status)) => {
                return Err(SendError::Transport(format!(
                    "Un-modeled failure from Invoke RPC call: {:?}",
                    rpc_status
                )))
            }
            Err(_timeout) => return Err(SendError::Transport("Timed out calling Invoke".into())),
        };

        let view_update = rpc_result
            .view_update
            .map(ViewUpdate::try_from)
            .transpose()
            .map_err(|e| SendError::MalformedReply(e.to_string()))?;

        let result = match rpc_result.result {
            Some(proto_invocation_result::Result::Ok(success)) => Ok(Bytes::from(success.payload)),
            Some(proto_invocation_result::Result::Err(ProtoInvocationError { err: Some(err) })) => match err {
                proto_invocation_error::Err::BusinessFault(fault) => Err(BusinessFault::with_details(
                    fault.message,
                    Bytes::from(fault.details),
                )),
                proto_invocation_error::Err::InvalidEnvelope(payload) => {
                    return Err(SendError::Rejected(InvocationError::InvalidEnvelope(payload.message)))
                }
                proto_invocation_error::Err::TargetGone(payload) => {
                    return Err(SendError::Rejected(InvocationError::TargetGone(payload.service_name)))
                }
                proto_invocation_error::Err::InvocationsDisabled(payload) => {
                    return Err(SendError::Rejected(InvocationError::InvocationsDisabled(
                        payload.service_name,
                    )))
                }
            },
            Some(proto_invocation_result::Result::Err(ProtoInvocationError { err: None })) => {
                return Err(SendError::MalformedReply("Malformed Invoke Err".into()))
            }
            None => return Err(SendError::MalformedReply("Malformed Invoke Result".into())),
        };

        Ok(InvocationOutput { result, view_update })
    }
}

#[async_trait::async_trait]
impl Transport for GrpcTransport {
    async fn send(&self, target: &ReplicaEndpoint, input: InvocationInput) -> Result<InvocationOutput, SendError> {
        let logger = self.logger.new(slog::o!("Replica" => target.replica_id.as_str().to_string()));

        let mut client = match self.client(target).await {
            Ok(client) => client,
            Err(e) => {
                slog::debug!(logger, "ClientWire - {:?}", e);
                return Err(e);
            }
        };

        let rpc_request = Self::convert_invocation_input(input);
        slog::debug!(logger, "ClientWire - {:?}", rpc_request);
        let rpc_reply = tokio::time::timeout(self.rpc_timeout, client.invoke(rpc_request)).await;
        slog::debug!(logger, "ClientWire - {:?}", rpc_reply);

        let result = Self::convert_invocation_rpc_reply(rpc_reply);
        if let Err(SendError::Transport(_)) = &result {
            self.evict(&target.replica_id);
        }

        result
    }

    fn retain_replicas(&self, replicas: &[ReplicaEndpoint]) {
        self.clients
            .lock()
            .expect("GrpcTransport.retain_replicas() mutex guard poison")
            .retain(|_, cached| replicas.contains(&cached.endpoint));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{try_create_invoker_server, InvokerServer, InvokerServerConfig};
    use crate::cluster::ViewId;
    use crate::grpc::{
        ProtoBusinessFault, ProtoInvocationSuccess, ProtoReplicaEndpoint, ProtoTargetGone, ProtoViewUpdate,
    };
    use crate::invoker::{ServiceHandler, ServiceRegistry};
    use std::net::{Ipv4Addr, SocketAddr};
    use std::sync::Arc;
    use tokio::time::Instant;

    struct Named(&'static str);

    #[async_trait::async_trait]
    impl ServiceHandler for Named {
        async fn handle(&self, payload: Bytes) -> Result<Bytes, BusinessFault> {
            Ok(Bytes::from(format!("{}:{}", self.0, String::from_utf8_lossy(&payload))))
        }
    }

    fn logger() -> slog::Logger {
        slog::Logger::root(slog::Discard, slog::o!())
    }

    fn transport() -> GrpcTransport {
        GrpcTransport::new(logger(), Duration::from_millis(1000), Duration::from_millis(300))
    }

    async fn start_server(port: u16, name: &'static str) -> InvokerServer {
        let registry = ServiceRegistry::new(logger());
        registry.publish("svc", Arc::new(Named(name)), vec![]).unwrap();
        let server = try_create_invoker_server(InvokerServerConfig {
            listen_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, port)),
            registry,
            info_logger: logger(),
        })
        .await
        .unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while tokio::net::TcpStream::connect(server.listen_addr()).await.is_err() {
            assert!(Instant::now() < deadline, "Server on port {} never came up", port);
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        server
    }

    fn input(payload: &'static str) -> InvocationInput {
        InvocationInput {
            service_name: "svc".into(),
            client_view_id: Some(ViewId::new(0)),
            payload: Bytes::from(payload),
        }
    }

    fn reply(result: Option<proto_invocation_result::Result>, view_update: Option<ProtoViewUpdate>) -> ProtoInvocationResult {
        ProtoInvocationResult { result, view_update }
    }

    #[test]
    fn success_with_view_update() {
        let rpc_reply = Ok(Ok(Response::new(reply(
            Some(proto_invocation_result::Result::Ok(ProtoInvocationSuccess {
                payload: b"pong".to_vec(),
            })),
            Some(ProtoViewUpdate {
                view_id: 4,
                replicas: vec![ProtoReplicaEndpoint {
                    replica_id: "R1".into(),
                    ipv4_addr: u32::from(Ipv4Addr::LOCALHOST),
                    port: 7001,
                }],
            }),
        ))));

        let output = GrpcTransport::convert_invocation_rpc_reply(rpc_reply).unwrap();

        assert_eq!(output.result, Ok(Bytes::from("pong")));
        assert_eq!(
            output.view_update,
            Some(ViewUpdate {
                view_id: ViewId::new(4),
                replicas: vec![ReplicaEndpoint::new("R1", Ipv4Addr::LOCALHOST, 7001)],
            })
        );
    }

    #[test]
    fn business_fault_is_a_normal_output() {
        let rpc_reply = Ok(Ok(Response::new(reply(
            Some(proto_invocation_result::Result::Err(ProtoInvocationError {
                err: Some(proto_invocation_error::Err::BusinessFault(ProtoBusinessFault {
                    message: "bad input".into(),
                    details: vec![],
                })),
            })),
            None,
        ))));

        let output = GrpcTransport::convert_invocation_rpc_reply(rpc_reply).unwrap();

        assert_eq!(output.result, Err(BusinessFault::new("bad input")));
    }

    #[test]
    fn target_gone_is_a_rejection() {
        let rpc_reply = Ok(Ok(Response::new(reply(
            Some(proto_invocation_result::Result::Err(ProtoInvocationError {
                err: Some(proto_invocation_error::Err::TargetGone(ProtoTargetGone {
                    service_name: "svc".into(),
                })),
            })),
            None,
        ))));

        assert!(matches!(
            GrpcTransport::convert_invocation_rpc_reply(rpc_reply),
            Err(SendError::Rejected(InvocationError::TargetGone(_)))
        ));
    }

    #[test]
    fn status_is_a_transport_failure() {
        let rpc_reply = Ok(Err(Status::unavailable("connection reset")));

        assert!(matches!(
            GrpcTransport::convert_invocation_rpc_reply(rpc_reply),
            Err(SendError::Transport(_))
        ));
    }

    #[test]
    fn missing_result_is_malformed() {
        let rpc_reply = Ok(Ok(Response::new(reply(None, None))));

        assert!(matches!(
            GrpcTransport::convert_invocation_rpc_reply(rpc_reply),
            Err(SendError::MalformedReply(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_replica_is_a_transport_failure() {
        let transport = GrpcTransport::new(
            slog::Logger::root(slog::Discard, slog::o!()),
            Duration::from_millis(500),
            Duration::from_millis(200),
        );
        // Nothing listens on port 1.
        let target = ReplicaEndpoint::new("R1", Ipv4Addr::LOCALHOST, 1);
        let input = InvocationInput {
            service_name: "svc".into(),
            client_view_id: Some(ViewId::new(0)),
            payload: Bytes::new(),
        };

        let result = transport.send(&target, input).await;

        assert!(matches!(result, Err(SendError::Transport(_))));
        assert!(transport.cached_client(&target).is_none());
    }

    #[tokio::test]
    async fn replica_at_new_address_gets_new_channel() {
        let _old_host = start_server(47610, "old-host").await;
        let _new_host = start_server(47611, "new-host").await;
        let transport = transport();
        let before = ReplicaEndpoint::new("mover", Ipv4Addr::LOCALHOST, 47610);
        let after = ReplicaEndpoint::new("mover", Ipv4Addr::LOCALHOST, 47611);

        let output = transport.send(&before, input("z")).await.unwrap();
        assert_eq!(output.result, Ok(Bytes::from("old-host:z")));

        let output = transport.send(&after, input("z")).await.unwrap();
        assert_eq!(output.result, Ok(Bytes::from("new-host:z")));
        assert!(transport.cached_client(&before).is_none());
        assert!(transport.cached_client(&after).is_some());
    }

    #[tokio::test]
    async fn retain_drops_channels_outside_view() {
        let _host_1 = start_server(47612, "host-1").await;
        let _host_2 = start_server(47613, "host-2").await;
        let transport = transport();
        let r1 = ReplicaEndpoint::new("R1", Ipv4Addr::LOCALHOST, 47612);
        let r2 = ReplicaEndpoint::new("R2", Ipv4Addr::LOCALHOST, 47613);
        transport.send(&r1, input("a")).await.unwrap();
        transport.send(&r2, input("b")).await.unwrap();

        transport.retain_replicas(&[r2.clone()]);

        assert!(transport.cached_client(&r1).is_none());
        assert!(transport.cached_client(&r2).is_some());
    }
}
