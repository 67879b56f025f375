use crate::proxy::proxy::ProxyCore;
use crate::proxy::InvokeError;
use bytes::Bytes;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// ProxyCall is what flows through a proxy's interceptor chain.
#[derive(Clone, Debug)]
pub struct ProxyCall {
    service_name: Arc<str>,
    pub payload: Bytes,
}

impl ProxyCall {
    pub(crate) fn new(service_name: Arc<str>, payload: Bytes) -> Self {
        ProxyCall { service_name, payload }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

/// ProxyInterceptor wraps every call made through a proxy. Interceptors run in the order they
/// were configured; each one decides whether (and with what payload) to call `next`.
#[async_trait::async_trait]
pub trait ProxyInterceptor: Send + Sync {
    async fn invoke(&self, call: ProxyCall, next: Next<'_>) -> Result<Bytes, InvokeError>;
}

/// Next is the rest of the chain. The last link is the proxy's replica selection and failover.
pub struct Next<'a> {
    interceptors: &'a [Arc<dyn ProxyInterceptor>],
    core: &'a ProxyCore,
}

impl<'a> Next<'a> {
    pub(crate) fn new(interceptors: &'a [Arc<dyn ProxyInterceptor>], core: &'a ProxyCore) -> Self {
        Next { interceptors, core }
    }

    pub fn run(self, call: ProxyCall) -> Pin<Box<dyn Future<Output = Result<Bytes, InvokeError>> + Send + 'a>> {
        Box::pin(async move {
            match self.interceptors.split_first() {
                Some((head, rest)) => head.invoke(call, Next::new(rest, self.core)).await,
                None => self.core.invoke_with_failover(call.payload).await,
            }
        })
    }
}
