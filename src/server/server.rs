use crate::cluster::ViewId;
use crate::grpc::grpc_ha_invoker_server::{GrpcHaInvoker, GrpcHaInvokerServer};
use crate::grpc::{
    proto_invocation_error, proto_invocation_result, ProtoBusinessFault, ProtoInvalidEnvelope, ProtoInvocationError,
    ProtoInvocationReq, ProtoInvocationResult, ProtoInvocationSuccess, ProtoInvocationsDisabled, ProtoTargetGone,
    ProtoViewUpdate,
};
use crate::invoker::{InvocationError, InvocationInput, InvocationOutput, ViewStampedInvoker};
use bytes::Bytes;
use std::net::SocketAddr;
use tokio::sync::oneshot;
use tonic::transport::Server;
use tonic::{Request, Response, Status};

/// RpcServer exposes a `ViewStampedInvoker` over gRPC.
///
/// Every outcome of the invoker, including refusals, is encoded in the reply message. A gRPC
/// `Status` error therefore always means something went wrong below us (transport, codec), which
/// lets clients treat it as a transport failure.
pub(crate) struct RpcServer {
    logger: slog::Logger,
    invoker: ViewStampedInvoker,
}

impl RpcServer {
    pub(crate) fn new(logger: slog::Logger, invoker: ViewStampedInvoker) -> Self {
        RpcServer { logger, invoker }
    }

    /// Serves until `shutdown` fires or its sender is dropped.
    pub(crate) async fn run(self, socket_addr: SocketAddr, shutdown: oneshot::Receiver<()>) {
        let logger = self.logger.clone();
        slog::info!(logger, "Listening on '{:?}'", socket_addr);

        // TODO:2 if server port is unavailable, signal back to caller.
        let result = Server::builder()
            .add_service(GrpcHaInvokerServer::new(self))
            .serve_with_shutdown(socket_addr, async move {
                let _ = shutdown.await;
            })
            .await;

        slog::info!(logger, "Server run() has exited: {:?}", result);
    }

    async fn handle_invoke(&self, rpc_request: ProtoInvocationReq) -> ProtoInvocationResult {
        let app_input = Self::convert_invocation_input(rpc_request);
        let app_result = self.invoker.handle(app_input).await;
        Self::convert_invocation_result(app_result)
    }

    fn convert_invocation_input(rpc_request: ProtoInvocationReq) -> InvocationInput {
        InvocationInput {
            service_name: rpc_request.service_name,
            client_view_id: rpc_request.client_view.map(ViewId::from),
            payload: Bytes::from(rpc_request.payload),
        }
    }

    fn convert_invocation_result(app_result: Result<InvocationOutput, InvocationError>) -> ProtoInvocationResult {
        match app_result {
            Ok(output) => {
                let view_update = output.view_update.map(ProtoViewUpdate::from);
                let result = match output.result {
                    Ok(payload) => proto_invocation_result::Result::Ok(ProtoInvocationSuccess {
                        payload: payload.to_vec(),
                    }),
                    Err(fault) => Self::error_result(proto_invocation_error::Err::BusinessFault(ProtoBusinessFault {
                        message: fault.message,
                        details: fault.details.to_vec(),
                    })),
                };

                ProtoInvocationResult {
                    result: Some(result),
                    view_update,
                }
            }
            Err(InvocationError::InvalidEnvelope(message)) => ProtoInvocationResult {
                result: Some(Self::error_result(proto_invocation_error::Err::InvalidEnvelope(
                    ProtoInvalidEnvelope { message },
                ))),
                view_update: None,
            },
            Err(InvocationError::TargetGone(service_name)) => ProtoInvocationResult {
                result: Some(Self::error_result(proto_invocation_error::Err::TargetGone(
                    ProtoTargetGone { service_name },
                ))),
                view_update: None,
            },
            Err(InvocationError::InvocationsDisabled(service_name)) => ProtoInvocationResult {
                result: Some(Self::error_result(proto_invocation_error::Err::InvocationsDisabled(
                    ProtoInvocationsDisabled { service_name },
                ))),
                view_update: None,
            },
        }
    }

    fn error_result(err: proto_invocation_error::Err) -> proto_invocation_result::Result {
        proto_invocation_result::Result::Err(ProtoInvocationError { err: Some(err) })
    }
}

#[async_trait::async_trait]
impl GrpcHaInvoker for RpcServer {
    async fn invoke(
        &self,
        rpc_request_wrapped: Request<ProtoInvocationReq>,
    ) -> Result<Response<ProtoInvocationResult>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();

        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request);
        let rpc_result = self.handle_invoke(rpc_request).await;
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_result);

        Ok(Response::new(rpc_result))
    }
}
