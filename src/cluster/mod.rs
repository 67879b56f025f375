mod target_set;
mod view;
mod view_change_listener;

pub use target_set::TargetSet;
pub use target_set::TargetSetError;
pub use view::ReplicaEndpoint;
pub use view::ReplicaId;
pub use view::View;
pub use view::ViewId;
pub use view_change_listener::ViewChange;
pub use view_change_listener::ViewChangeListener;

pub(crate) use view_change_listener::ViewChangeNotifier;
