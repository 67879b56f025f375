use crate::api::options::{LoadBalancePolicyConfig, ProxyOptions, ProxyOptionsValidated};
use crate::cluster::View;
use crate::invoker::{ServiceRegistry, ViewStampedInvoker};
use crate::proxy::{GrpcTransport, LoadBalancingProxy, LoadBalancingProxyConfig, ProxyInterceptor};
use crate::server::RpcServer;
use std::convert::TryFrom;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;

pub struct InvokerServerConfig {
    pub listen_addr: SocketAddr,
    pub registry: ServiceRegistry,
    pub info_logger: slog::Logger,
}

#[derive(Debug, thiserror::Error)]
pub enum InvokerServerCreationError {
    #[error("Illegal listen address '{0}': {1}")]
    IllegalListenAddr(SocketAddr, String),
}

/// InvokerServer serves every service of its registry over gRPC. Dropping it stops the server.
pub struct InvokerServer {
    registry: ServiceRegistry,
    listen_addr: SocketAddr,
    _shutdown: oneshot::Sender<()>,
}

impl InvokerServer {
    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    pub fn listen_addr(&self) -> SocketAddr {
        self.listen_addr
    }
}

/// Must be called from within a tokio runtime; the server runs as a spawned task.
pub async fn try_create_invoker_server(
    config: InvokerServerConfig,
) -> Result<InvokerServer, InvokerServerCreationError> {
    // Replicas advertise their port to clients, so it has to be known up front.
    if config.listen_addr.port() == 0 {
        return Err(InvokerServerCreationError::IllegalListenAddr(
            config.listen_addr,
            "port must be non-zero".into(),
        ));
    }

    let root_logger = config
        .info_logger
        .new(slog::o!("ListenAddr" => config.listen_addr.to_string()));

    let invoker = ViewStampedInvoker::new(root_logger.clone(), config.registry.clone());
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let rpc_server = RpcServer::new(root_logger, invoker);
    tokio::spawn(rpc_server.run(config.listen_addr, shutdown_rx));

    Ok(InvokerServer {
        registry: config.registry,
        listen_addr: config.listen_addr,
        _shutdown: shutdown_tx,
    })
}

pub struct ProxyConfig {
    pub service_name: String,
    /// Usually the target set's current view at the time the proxy is handed out.
    pub initial_view: View,
    pub policy: LoadBalancePolicyConfig,
    pub interceptors: Vec<Arc<dyn ProxyInterceptor>>,
    pub info_logger: slog::Logger,
    pub options: ProxyOptions,
}

#[derive(Debug, thiserror::Error)]
pub enum ProxyCreationError {
    #[error("Service name must not be empty")]
    InvalidServiceName,
    #[error("Illegal options for configuring proxy: {0}")]
    IllegalProxyOptions(String),
}

/// Creates a proxy that talks gRPC to `InvokerServer`s.
pub fn try_create_proxy(config: ProxyConfig) -> Result<LoadBalancingProxy, ProxyCreationError> {
    if config.service_name.is_empty() {
        return Err(ProxyCreationError::InvalidServiceName);
    }

    let options = ProxyOptionsValidated::try_from(config.options)
        .map_err(|e| ProxyCreationError::IllegalProxyOptions(e.to_string()))?;

    let transport = GrpcTransport::new(
        config.info_logger.clone(),
        options.rpc_timeout,
        options.connect_timeout,
    );

    Ok(LoadBalancingProxy::new(LoadBalancingProxyConfig {
        logger: config.info_logger,
        service_name: config.service_name,
        initial_view: config.initial_view,
        policy: config.policy.build(),
        transport: Arc::new(transport),
        interceptors: config.interceptors,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::ViewId;
    use tokio::time::Duration;

    fn config(service_name: &str, options: ProxyOptions) -> ProxyConfig {
        ProxyConfig {
            service_name: service_name.into(),
            initial_view: View::new(ViewId::new(0), vec![]),
            policy: LoadBalancePolicyConfig::default(),
            interceptors: vec![],
            info_logger: slog::Logger::root(slog::Discard, slog::o!()),
            options,
        }
    }

    #[test]
    fn proxy_requires_service_name() {
        assert!(matches!(
            try_create_proxy(config("", ProxyOptions::default())),
            Err(ProxyCreationError::InvalidServiceName)
        ));
    }

    #[test]
    fn proxy_rejects_illegal_options() {
        let options = ProxyOptions {
            rpc_timeout: Some(Duration::from_millis(0)),
            ..ProxyOptions::default()
        };

        assert!(matches!(
            try_create_proxy(config("svc", options)),
            Err(ProxyCreationError::IllegalProxyOptions(_))
        ));
    }

    #[tokio::test]
    async fn server_requires_fixed_port() {
        let result = try_create_invoker_server(InvokerServerConfig {
            listen_addr: "127.0.0.1:0".parse().unwrap(),
            registry: ServiceRegistry::new(slog::Logger::root(slog::Discard, slog::o!())),
            info_logger: slog::Logger::root(slog::Discard, slog::o!()),
        })
        .await;

        assert!(matches!(
            result,
            Err(InvokerServerCreationError::IllegalListenAddr(_, _))
        ));
    }

    #[tokio::test]
    async fn dropping_server_stops_listening() {
        let server = try_create_invoker_server(InvokerServerConfig {
            listen_addr: "127.0.0.1:47620".parse().unwrap(),
            registry: ServiceRegistry::new(slog::Logger::root(slog::Discard, slog::o!())),
            info_logger: slog::Logger::root(slog::Discard, slog::o!()),
        })
        .await
        .unwrap();
        let listen_addr = server.listen_addr();
        wait_until(|| async move { tokio::net::TcpStream::connect(listen_addr).await.is_ok() }).await;

        drop(server);

        wait_until(|| async move { tokio::net::TcpStream::connect(listen_addr).await.is_err() }).await;
    }

    async fn wait_until<F, Fut>(condition: F)
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = bool>,
    {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while !condition().await {
            assert!(tokio::time::Instant::now() < deadline, "Timed out waiting for condition");
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }
}
