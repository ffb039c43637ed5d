//! Builder pattern for slot construction.

use crate::observability::{NoOpMetrics, SlotMetrics};
use crate::persist::Persist;
use crate::retrieve::Retrieve;
use crate::slot::{CacheSlot, DEFAULT_CHANNEL_CAPACITY};
use std::sync::Arc;

/// Fluent builder for configuring a [`CacheSlot`].
///
/// Provides chainable methods for the seed value, collaborators, metrics
/// handler and change channel capacity.
///
/// # Example
///
/// ```ignore
/// let slot = CacheSlot::builder()
///     .seed(initial_config)
///     .retriever(retrieve_fn(move || {
///         let db = db.clone();
///         async move { db.load_config().await }
///     }))
///     .persister(persist_fn(move |config: Config| {
///         let db = db.clone();
///         async move { db.save_config(config).await }
///     }))
///     .channel_capacity(64)
///     .build();
/// ```
pub struct SlotBuilder<T> {
    seed: Option<T>,
    retriever: Option<Arc<dyn Retrieve<T>>>,
    persister: Option<Arc<dyn Persist<T>>>,
    metrics: Box<dyn SlotMetrics>,
    channel_capacity: usize,
}

impl<T: Clone + Send + Sync + 'static> SlotBuilder<T> {
    /// Create a new builder with default settings.
    pub(crate) fn new() -> Self {
        SlotBuilder {
            seed: None,
            retriever: None,
            persister: None,
            metrics: Box::new(NoOpMetrics),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Pre-populate the slot with a value.
    ///
    /// Seeding does not notify observers; none exist before `build`.
    pub fn seed(mut self, value: T) -> Self {
        self.seed = Some(value);
        self
    }

    /// Set the read-through retrieval collaborator.
    pub fn retriever(mut self, retriever: impl Retrieve<T> + 'static) -> Self {
        self.retriever = Some(Arc::new(retriever));
        self
    }

    /// Set the write-through persistence collaborator.
    pub fn persister(mut self, persister: impl Persist<T> + 'static) -> Self {
        self.persister = Some(Arc::new(persister));
        self
    }

    /// Set a custom metrics handler.
    pub fn metrics(mut self, metrics: Box<dyn SlotMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Capacity of the change notification channel.
    ///
    /// Observers that fall further behind than this many transitions skip
    /// ahead. Values below 1 are clamped to 1.
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Build the slot.
    pub fn build(self) -> CacheSlot<T> {
        CacheSlot::from_parts(
            self.seed,
            self.retriever,
            self.persister,
            self.metrics,
            self.channel_capacity,
        )
    }
}
