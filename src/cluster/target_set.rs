use crate::cluster::view_change_listener;
use crate::cluster::{ReplicaEndpoint, View, ViewChange, ViewChangeListener, ViewChangeNotifier, ViewId};
use std::sync::{Arc, RwLock};

/// TargetSet is the serving side's source of truth for which replicas can answer a logical
/// service, and which view that replica list belongs to.
///
/// Invocation threads only read it. The membership layer is the only writer: it calls
/// `update()` whenever it detects a node joining or leaving.
///
/// The view id and replica list live in one immutable `View` behind a single pointer, so a reader
/// always gets a pair that co-existed at some point. It may not be the latest pair if an update
/// races with the read, which is fine: view freshness is advisory.
#[derive(Clone)]
pub struct TargetSet {
    inner: Arc<Inner>,
}

struct Inner {
    logger: slog::Logger,
    service_name: String,
    state: RwLock<TargetState>,
    notifier: ViewChangeNotifier,
}

enum TargetState {
    Live {
        view: Arc<View>,
        invocations_allowed: bool,
    },
    Withdrawn,
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum TargetSetError {
    #[error("Target for service '{0}' has been withdrawn")]
    Withdrawn(String),
    #[error("View id space for service '{0}' is exhausted")]
    ViewIdExhausted(String),
}

impl TargetSet {
    pub fn new(logger: slog::Logger, service_name: impl Into<String>, replicas: Vec<ReplicaEndpoint>) -> Self {
        Self::with_initial_view(logger, service_name, View::new(ViewId::new(0), replicas))
    }

    /// Creates a target set that resumes from an existing view, e.g. one handed over from a
    /// previous incarnation of the service.
    pub fn with_initial_view(logger: slog::Logger, service_name: impl Into<String>, initial_view: View) -> Self {
        let service_name = service_name.into();
        let logger = logger.new(slog::o!("Service" => service_name.clone()));
        let initial_view = Arc::new(initial_view);

        slog::info!(
            logger,
            "Created target set at view {:?} with {} replicas",
            initial_view.view_id(),
            initial_view.replicas().len()
        );

        TargetSet {
            inner: Arc::new(Inner {
                logger,
                service_name,
                notifier: view_change_listener::new(initial_view.clone()),
                state: RwLock::new(TargetState::Live {
                    view: initial_view,
                    invocations_allowed: true,
                }),
            }),
        }
    }

    pub fn service_name(&self) -> &str {
        &self.inner.service_name
    }

    pub fn current_view(&self) -> Result<Arc<View>, TargetSetError> {
        let state = self.inner.state.read().expect("TargetSet.current_view() lock poison");
        match &*state {
            TargetState::Live { view, .. } => Ok(view.clone()),
            TargetState::Withdrawn => Err(self.withdrawn()),
        }
    }

    /// Installs `new_replicas` as the next view and returns its id.
    pub fn update(&self, new_replicas: Vec<ReplicaEndpoint>) -> Result<ViewId, TargetSetError> {
        let mut state = self.inner.state.write().expect("TargetSet.update() lock poison");
        let view = match &mut *state {
            TargetState::Live { view, .. } => view,
            TargetState::Withdrawn => return Err(self.withdrawn()),
        };

        let new_view_id = view
            .view_id()
            .checked_next()
            .ok_or_else(|| TargetSetError::ViewIdExhausted(self.inner.service_name.clone()))?;
        let new_view = Arc::new(View::new(new_view_id, new_replicas));
        *view = new_view.clone();

        // Notify while still holding the lock, so listeners observe views in install order.
        self.inner.notifier.notify(ViewChange::Installed(new_view.clone()));
        drop(state);

        slog::info!(
            self.inner.logger,
            "Installed view {:?}: {:?}",
            new_view_id,
            new_view.replicas().iter().map(|r| r.replica_id.as_str()).collect::<Vec<_>>()
        );

        Ok(new_view_id)
    }

    /// Withdraws the target. Returns false if it was already withdrawn.
    pub fn destroy(&self) -> bool {
        let mut state = self.inner.state.write().expect("TargetSet.destroy() lock poison");
        if let TargetState::Withdrawn = &*state {
            return false;
        }

        *state = TargetState::Withdrawn;
        self.inner.notifier.notify(ViewChange::Withdrawn);
        drop(state);

        slog::info!(self.inner.logger, "Target withdrawn");
        true
    }

    /// Temporarily refuse (or resume) invocations without withdrawing the target. Callers that
    /// are refused may fail over to another replica. No-op on a withdrawn target.
    pub fn set_invocations_allowed(&self, allowed: bool) {
        let mut state = self
            .inner
            .state
            .write()
            .expect("TargetSet.set_invocations_allowed() lock poison");
        if let TargetState::Live {
            invocations_allowed, ..
        } = &mut *state
        {
            if *invocations_allowed != allowed {
                *invocations_allowed = allowed;
                slog::info!(self.inner.logger, "Invocations allowed: {}", allowed);
            }
        }
    }

    /// False once withdrawn.
    pub fn invocations_allowed(&self) -> bool {
        let state = self
            .inner
            .state
            .read()
            .expect("TargetSet.invocations_allowed() lock poison");
        match &*state {
            TargetState::Live {
                invocations_allowed, ..
            } => *invocations_allowed,
            TargetState::Withdrawn => false,
        }
    }

    pub fn subscribe(&self) -> ViewChangeListener {
        self.inner.notifier.listener()
    }

    fn withdrawn(&self) -> TargetSetError {
        TargetSetError::Withdrawn(self.inner.service_name.clone())
    }
}
