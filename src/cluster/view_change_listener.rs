use crate::cluster::View;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ViewChange {
    Installed(Arc<View>),
    Withdrawn,
}

pub(crate) fn new(initial_view: Arc<View>) -> ViewChangeNotifier {
    let (snd, rcv) = watch::channel(ViewChange::Installed(initial_view));

    ViewChangeNotifier { snd, rcv }
}

pub(crate) struct ViewChangeNotifier {
    snd: watch::Sender<ViewChange>,
    // Held so that `send()` always has a live receiver, and new listeners can be handed out.
    rcv: watch::Receiver<ViewChange>,
}

impl ViewChangeNotifier {
    pub(crate) fn notify(&self, change: ViewChange) {
        let _ = self.snd.send(change);
    }

    pub(crate) fn listener(&self) -> ViewChangeListener {
        let mut rcv = self.rcv.clone();
        // Only changes after subscription are of interest.
        let _ = rcv.borrow_and_update();
        ViewChangeListener { rcv }
    }
}

/// ViewChangeListener observes membership changes of a single target set. Like any watch, it
/// doesn't queue intermediate changes: if several happen between two `next()` calls, only the
/// most recent one is returned.
#[derive(Clone)]
pub struct ViewChangeListener {
    rcv: watch::Receiver<ViewChange>,
}

impl ViewChangeListener {
    /// Returns `None` once the target set has been dropped.
    pub async fn next(&mut self) -> Option<ViewChange> {
        match self.rcv.changed().await {
            Ok(_) => Some(self.rcv.borrow().clone()),
            Err(_) => None,
        }
    }
}
