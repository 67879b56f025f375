//! This mod holds the crate's client-facing configuration and factory functions.
mod options;
mod wiring;

pub use options::LoadBalancePolicyConfig;
pub use options::ProxyOptions;
pub use wiring::try_create_invoker_server;
pub use wiring::try_create_proxy;
pub use wiring::InvokerServer;
pub use wiring::InvokerServerConfig;
pub use wiring::InvokerServerCreationError;
pub use wiring::ProxyConfig;
pub use wiring::ProxyCreationError;
