mod api;
mod cluster;
mod grpc;
mod invoker;
mod proxy;
mod server;

pub use api::try_create_invoker_server;
pub use api::try_create_proxy;
pub use api::InvokerServer;
pub use api::InvokerServerConfig;
pub use api::InvokerServerCreationError;
pub use api::LoadBalancePolicyConfig;
pub use api::ProxyConfig;
pub use api::ProxyCreationError;
pub use api::ProxyOptions;
pub use cluster::ReplicaEndpoint;
pub use cluster::ReplicaId;
pub use cluster::TargetSet;
pub use cluster::TargetSetError;
pub use cluster::View;
pub use cluster::ViewChange;
pub use cluster::ViewChangeListener;
pub use cluster::ViewId;
pub use invoker::BusinessFault;
pub use invoker::InvocationError;
pub use invoker::InvocationInput;
pub use invoker::InvocationOutput;
pub use invoker::PublishedService;
pub use invoker::RegistryError;
pub use invoker::ServiceHandler;
pub use invoker::ServiceRegistry;
pub use invoker::ViewStampedInvoker;
pub use invoker::ViewUpdate;
pub use proxy::FirstAvailable;
pub use proxy::GrpcTransport;
pub use proxy::InvokeError;
pub use proxy::LoadBalancePolicy;
pub use proxy::LoadBalancingProxy;
pub use proxy::LoadBalancingProxyConfig;
pub use proxy::Next;
pub use proxy::ProxyCall;
pub use proxy::ProxyInterceptor;
pub use proxy::RandomRobin;
pub use proxy::RoundRobin;
pub use proxy::SendError;
pub use proxy::Transport;

// `crate::{root_mod}` holds no code, only `mod` and `pub use` statements. Modules are never
// `pub`; everything public is exported here one item at a time.
