use crate::cluster::{ReplicaEndpoint, TargetSet};
use crate::invoker::BusinessFault;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// ServiceHandler is the business side of a published service. The invoker hands it the opaque
/// payload of each call.
#[async_trait::async_trait]
pub trait ServiceHandler: Send + Sync {
    async fn handle(&self, payload: Bytes) -> Result<Bytes, BusinessFault>;
}

/// PublishedService is what the registry resolves a service name to.
pub struct PublishedService {
    handler: Arc<dyn ServiceHandler>,
    target_set: TargetSet,
}

impl PublishedService {
    pub fn handler(&self) -> &dyn ServiceHandler {
        self.handler.as_ref()
    }

    pub fn target_set(&self) -> &TargetSet {
        &self.target_set
    }
}

/// ServiceRegistry maps service names to handlers. It's passed to whoever needs it (invokers,
/// the membership layer) rather than living in a global, so several independent registries can
/// coexist in one process.
#[derive(Clone)]
pub struct ServiceRegistry {
    logger: slog::Logger,
    services: Arc<RwLock<HashMap<String, Arc<PublishedService>>>>,
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("Service name must not be empty")]
    InvalidServiceName,
    #[error("Service '{0}' is already published")]
    AlreadyPublished(String),
    #[error("Service '{0}' is not published")]
    NotPublished(String),
}

impl ServiceRegistry {
    pub fn new(logger: slog::Logger) -> Self {
        ServiceRegistry {
            logger,
            services: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Publishes `handler` under `service_name` and returns the new target set, starting at view 0.
    /// The membership layer keeps the returned handle to push replica changes.
    pub fn publish(
        &self,
        service_name: impl Into<String>,
        handler: Arc<dyn ServiceHandler>,
        initial_replicas: Vec<ReplicaEndpoint>,
    ) -> Result<TargetSet, RegistryError> {
        let service_name = service_name.into();
        if service_name.is_empty() {
            return Err(RegistryError::InvalidServiceName);
        }

        let mut services = self.services.write().expect("ServiceRegistry.publish() lock poison");
        if services.contains_key(&service_name) {
            return Err(RegistryError::AlreadyPublished(service_name));
        }

        let target_set = TargetSet::new(self.logger.clone(), service_name.clone(), initial_replicas);
        services.insert(
            service_name.clone(),
            Arc::new(PublishedService {
                handler,
                target_set: target_set.clone(),
            }),
        );

        slog::info!(self.logger, "Published service '{}'", service_name);
        Ok(target_set)
    }

    /// Removes the service and withdraws its target set, so calls already in flight also observe
    /// that it's gone.
    pub fn unpublish(&self, service_name: &str) -> Result<(), RegistryError> {
        let removed = self
            .services
            .write()
            .expect("ServiceRegistry.unpublish() lock poison")
            .remove(service_name);

        match removed {
            Some(service) => {
                service.target_set.destroy();
                slog::info!(self.logger, "Unpublished service '{}'", service_name);
                Ok(())
            }
            None => Err(RegistryError::NotPublished(service_name.to_string())),
        }
    }

    pub fn lookup(&self, service_name: &str) -> Option<Arc<PublishedService>> {
        self.services
            .read()
            .expect("ServiceRegistry.lookup() lock poison")
            .get(service_name)
            .cloned()
    }

    pub fn target_set(&self, service_name: &str) -> Option<TargetSet> {
        self.lookup(service_name).map(|service| service.target_set.clone())
    }
}
