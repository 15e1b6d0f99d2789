use super::Dispatcher;
use arc_swap::ArcSwapOption;
use std::sync::Arc;
use tracing::info;

/// Publication point for a fully set-up [`Dispatcher`].
///
/// Setup happens on one thread against an owned dispatcher; `publish` then
/// stores it atomically. Readers on other threads `load` an `Arc` and resolve
/// requests without further locking.
#[derive(Default)]
pub struct SharedDispatcher {
    inner: ArcSwapOption<Dispatcher>,
}

impl SharedDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already set-up dispatcher
    #[must_use]
    pub fn from_dispatcher(dispatcher: Dispatcher) -> Self {
        let shared = Self::new();
        shared.publish(dispatcher);
        shared
    }

    /// Make `dispatcher` visible to every subsequent `load`
    pub fn publish(&self, dispatcher: Dispatcher) {
        info!(
            actions = dispatcher.registry().len(),
            dispatch_types = dispatcher.dispatchers().len(),
            "Dispatcher published"
        );
        self.inner.store(Some(Arc::new(dispatcher)));
    }

    /// The published dispatcher, `None` until setup has been published
    #[must_use]
    pub fn load(&self) -> Option<Arc<Dispatcher>> {
        self.inner.load_full()
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.inner.load().is_some()
    }
}
