/// A message wrapper so that a missing view id is distinguishable from view 0.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoViewId {
    #[prost(uint64, tag = "1")]
    pub id: u64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoReplicaEndpoint {
    #[prost(string, tag = "1")]
    pub replica_id: ::prost::alloc::string::String,
    #[prost(fixed32, tag = "2")]
    pub ipv4_addr: u32,
    /// Must fit in a u16.
    #[prost(uint32, tag = "3")]
    pub port: u32,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoInvocationReq {
    #[prost(string, tag = "1")]
    pub service_name: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "2")]
    pub client_view: ::core::option::Option<ProtoViewId>,
    #[prost(bytes = "vec", tag = "3")]
    pub payload: ::prost::alloc::vec::Vec<u8>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoViewUpdate {
    #[prost(uint64, tag = "1")]
    pub view_id: u64,
    #[prost(message, repeated, tag = "2")]
    pub replicas: ::prost::alloc::vec::Vec<ProtoReplicaEndpoint>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoInvocationResult {
    /// Only present if the client's view id was stale.
    #[prost(message, optional, tag = "3")]
    pub view_update: ::core::option::Option<ProtoViewUpdate>,
    #[prost(oneof = "proto_invocation_result::Result", tags = "1, 2")]
    pub result: ::core::option::Option<proto_invocation_result::Result>,
}
/// Nested message and enum types in `ProtoInvocationResult`.
pub mod proto_invocation_result {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Result {
        #[prost(message, tag = "1")]
        Ok(super::ProtoInvocationSuccess),
        #[prost(message, tag = "2")]
        Err(super::ProtoInvocationError),
    }
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoInvocationSuccess {
    #[prost(bytes = "vec", tag = "1")]
    pub payload: ::prost::alloc::vec::Vec<u8>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoInvocationError {
    #[prost(oneof = "proto_invocation_error::Err", tags = "1, 2, 3, 4")]
    pub err: ::core::option::Option<proto_invocation_error::Err>,
}
/// Nested message and enum types in `ProtoInvocationError`.
pub mod proto_invocation_error {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Err {
        #[prost(message, tag = "1")]
        BusinessFault(super::ProtoBusinessFault),
        #[prost(message, tag = "2")]
        InvalidEnvelope(super::ProtoInvalidEnvelope),
        #[prost(message, tag = "3")]
        TargetGone(super::ProtoTargetGone),
        #[prost(message, tag = "4")]
        InvocationsDisabled(super::ProtoInvocationsDisabled),
    }
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoBusinessFault {
    #[prost(string, tag = "1")]
    pub message: ::prost::alloc::string::String,
    #[prost(bytes = "vec", tag = "2")]
    pub details: ::prost::alloc::vec::Vec<u8>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoInvalidEnvelope {
    #[prost(string, tag = "1")]
    pub message: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoTargetGone {
    #[prost(string, tag = "1")]
    pub service_name: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoInvocationsDisabled {
    #[prost(string, tag = "1")]
    pub service_name: ::prost::alloc::string::String,
}
#[doc = r" Generated client implementations."]
pub mod grpc_ha_invoker_client {
    #![allow(unused_variables, dead_code, missing_docs)]
    use tonic::codegen::*;
    pub struct GrpcHaInvokerClient<T> {
        inner: tonic::client::Grpc<T>,
    }
    impl GrpcHaInvokerClient<tonic::transport::Channel> {
        #[doc = r" Attempt to create a new client by connecting to a given endpoint."]
        pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
        where
            D: std::convert::TryInto<tonic::transport::Endpoint>,
            D::Error: Into<StdError>,
        {
            let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
            Ok(Self::new(conn))
        }
    }
    impl<T> GrpcHaInvokerClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::BoxBody>,
        T::ResponseBody: Body + HttpBody + Send + 'static,
        T::Error: Into<StdError>,
        <T::ResponseBody as HttpBody>::Error: Into<StdError> + Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }
        pub fn with_interceptor(inner: T, interceptor: impl Into<tonic::Interceptor>) -> Self {
            let inner = tonic::client::Grpc::with_interceptor(inner, interceptor);
            Self { inner }
        }
        pub async fn invoke(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoInvocationReq>,
        ) -> Result<tonic::Response<super::ProtoInvocationResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/ha_invoker.GrpcHaInvoker/Invoke");
            self.inner.unary(request.into_request(), path, codec).await
        }
    }
    impl<T: Clone> Clone for GrpcHaInvokerClient<T> {
        fn clone(&self) -> Self {
            Self {
                inner: self.inner.clone(),
            }
        }
    }
    impl<T> std::fmt::Debug for GrpcHaInvokerClient<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "GrpcHaInvokerClient {{ ... }}")
        }
    }
}
#[doc = r" Generated server implementations."]
pub mod grpc_ha_invoker_server {
    #![allow(unused_variables, dead_code, missing_docs)]
    use tonic::codegen::*;
    #[doc = "Generated trait containing gRPC methods that should be implemented for use with GrpcHaInvokerServer."]
    #[async_trait]
    pub trait GrpcHaInvoker: Send + Sync + 'static {
        async fn invoke(
            &self,
            request: tonic::Request<super::ProtoInvocationReq>,
        ) -> Result<tonic::Response<super::ProtoInvocationResult>, tonic::Status>;
    }
    #[derive(Debug)]
    pub struct GrpcHaInvokerServer<T: GrpcHaInvoker> {
        inner: _Inner<T>,
    }
    struct _Inner<T>(Arc<T>, Option<tonic::Interceptor>);
    impl<T: GrpcHaInvoker> GrpcHaInvokerServer<T> {
        pub fn new(inner: T) -> Self {
            let inner = Arc::new(inner);
            let inner = _Inner(inner, None);
            Self { inner }
        }
        pub fn with_interceptor(inner: T, interceptor: impl Into<tonic::Interceptor>) -> Self {
            let inner = Arc::new(inner);
            let inner = _Inner(inner, Some(interceptor.into()));
            Self { inner }
        }
    }
    impl<T, B> Service<http::Request<B>> for GrpcHaInvokerServer<T>
    where
        T: GrpcHaInvoker,
        B: HttpBody + Send + Sync + 'static,
        B::Error: Into<StdError> + Send + 'static,
    {
        type Response = http::Response<tonic::body::BoxBody>;
        type Error = Never;
        type Future = BoxFuture<Self::Response, Self::Error>;
        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }
        fn call(&mut self, req: http::Request<B>) -> Self::Future {
            let inner = self.inner.clone();
            match req.uri().path() {
                "/ha_invoker.GrpcHaInvoker/Invoke" => {
                    #[allow(non_camel_case_types)]
                    struct InvokeSvc<T: GrpcHaInvoker>(pub Arc<T>);
                    impl<T: GrpcHaInvoker> tonic::server::UnaryService<super::ProtoInvocationReq> for InvokeSvc<T> {
                        type Response = super::ProtoInvocationResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoInvocationReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).invoke(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = InvokeSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                _ => Box::pin(async move {
                    Ok(http::Response::builder()
                        .status(200)
                        .header("grpc-status", "12")
                        .header("content-type", "application/grpc")
                        .body(tonic::body::BoxBody::empty())
                        .unwrap())
                }),
            }
        }
    }
    impl<T: GrpcHaInvoker> Clone for GrpcHaInvokerServer<T> {
        fn clone(&self) -> Self {
            let inner = self.inner.clone();
            Self { inner }
        }
    }
    impl<T: GrpcHaInvoker> Clone for _Inner<T> {
        fn clone(&self) -> Self {
            Self(self.0.clone(), self.1.clone())
        }
    }
    impl<T: std::fmt::Debug> std::fmt::Debug for _Inner<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self.0)
        }
    }
    impl<T: GrpcHaInvoker> tonic::transport::NamedService for GrpcHaInvokerServer<T> {
        const NAME: &'static str = "ha_invoker.GrpcHaInvoker";
    }
}
