mod grpc_transport;
mod interceptor;
mod policy;
mod proxy;
mod transport;
mod view_cache;

#[cfg(test)]
mod test_utils;

pub use grpc_transport::GrpcTransport;
pub use interceptor::Next;
pub use interceptor::ProxyCall;
pub use interceptor::ProxyInterceptor;
pub use policy::FirstAvailable;
pub use policy::LoadBalancePolicy;
pub use policy::RandomRobin;
pub use policy::RoundRobin;
pub use proxy::InvokeError;
pub use proxy::LoadBalancingProxy;
pub use proxy::LoadBalancingProxyConfig;
pub use transport::SendError;
pub use transport::Transport;
