pub mod markers;
pub mod poller;
pub mod presenter;
pub mod resolver;
pub mod selection;
pub mod snapshot;
pub mod view;

pub use poller::RefreshPoller;
pub use resolver::{Clock, FixedClock, ResolverPolicy, SystemClock};
pub use snapshot::SnapshotStore;
pub use view::{Renderer, ViewModel, ViewSession};
