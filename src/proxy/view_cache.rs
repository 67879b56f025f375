use crate::cluster::{View, ViewId};
use std::sync::{Arc, Mutex};

/// ViewCache is a proxy's copy of the last view it has observed. It's shared by every caller of
/// that proxy.
pub(crate) struct ViewCache {
    current: Mutex<Arc<View>>,
}

impl ViewCache {
    pub(crate) fn new(initial_view: View) -> Self {
        ViewCache {
            current: Mutex::new(Arc::new(initial_view)),
        }
    }

    pub(crate) fn snapshot(&self) -> Arc<View> {
        self.current.lock().expect("ViewCache.snapshot() mutex guard poison").clone()
    }

    /// Installs `new_view` iff the cache still holds `expected_view_id`, i.e. the view the call was
    /// sent with. A slow reply therefore can't overwrite a view installed by a faster one.
    ///
    /// CAS: Return true if we successfully mutated state.
    pub(crate) fn compare_and_set(&self, expected_view_id: ViewId, new_view: View) -> bool {
        let mut current = self
            .current
            .lock()
            .expect("ViewCache.compare_and_set() mutex guard poison");

        if current.view_id() != expected_view_id || current.view_id() == new_view.view_id() {
            return false;
        }

        *current = Arc::new(new_view);
        true
    }
}
