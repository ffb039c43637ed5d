//! Cache slot - the single-value cache primitive.

use crate::builder::SlotBuilder;
use crate::changes::Changes;
use crate::error::Result;
use crate::observability::{NoOpMetrics, SlotMetrics};
use crate::persist::Persist;
use crate::retrieve::Retrieve;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;
use tokio::sync::{broadcast, Mutex};

/// Default capacity of the change notification channel.
/// An observer that falls further behind than this skips ahead.
/// Override with `SlotBuilder::channel_capacity`.
pub(crate) const DEFAULT_CHANNEL_CAPACITY: usize = 16;

/// Concurrency-safe single-slot value cache.
///
/// Holds at most one value of type `T` and unifies three patterns behind one
/// type: in-memory holding, read-through retrieval on miss, and write-through
/// persistence on update, plus change notification for observers.
///
/// All operations take `&self`; share a slot across tasks by wrapping it in
/// an `Arc`. Every state transition is serialized by an internal async lock,
/// which is held across collaborator calls: at most one retrieval or
/// persistence runs per slot at any time, and concurrent `get` callers on a
/// miss share a single retrieval. A `get` that finds a value in memory never
/// touches the lock.
///
/// # Example
///
/// ```ignore
/// let slot = Arc::new(
///     CacheSlot::builder()
///         .retriever(retrieve_fn(move || {
///             let db = db.clone();
///             async move { db.load_profile().await }
///         }))
///         .persister(persist_fn(move |profile: Profile| {
///             let db = db.clone();
///             async move { db.save_profile(profile).await }
///         }))
///         .build(),
/// );
///
/// let profile = slot.get().await?;        // retrieved once, then cached
/// slot.store(updated_profile).await?;     // persisted, then cached
/// ```
pub struct CacheSlot<T> {
    value: RwLock<Option<T>>,
    /// Serializes every state transition, including collaborator calls.
    mutate: Mutex<()>,
    retriever: RwLock<Option<Arc<dyn Retrieve<T>>>>,
    persister: RwLock<Option<Arc<dyn Persist<T>>>>,
    changes: broadcast::Sender<T>,
    metrics: Box<dyn SlotMetrics>,
}

impl<T: Clone + Send + Sync + 'static> CacheSlot<T> {
    /// Create an empty slot with no collaborators.
    pub fn new() -> Self {
        Self::from_parts(None, None, None, Box::new(NoOpMetrics), DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a slot pre-populated with a seed value.
    ///
    /// Seeding does not notify observers; there are none yet.
    pub fn with_value(seed: T) -> Self {
        Self::from_parts(
            Some(seed),
            None,
            None,
            Box::new(NoOpMetrics),
            DEFAULT_CHANNEL_CAPACITY,
        )
    }

    /// Create a builder for configuring a slot.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let slot = CacheSlot::builder()
    ///     .seed(42)
    ///     .retriever(retrieve_fn(|| async { Ok(Some(7)) }))
    ///     .channel_capacity(64)
    ///     .build();
    /// ```
    pub fn builder() -> SlotBuilder<T> {
        SlotBuilder::new()
    }

    pub(crate) fn from_parts(
        seed: Option<T>,
        retriever: Option<Arc<dyn Retrieve<T>>>,
        persister: Option<Arc<dyn Persist<T>>>,
        metrics: Box<dyn SlotMetrics>,
        channel_capacity: usize,
    ) -> Self {
        // broadcast requires a nonzero capacity
        let (changes, _rx) = broadcast::channel(channel_capacity.max(1));
        CacheSlot {
            value: RwLock::new(seed),
            mutate: Mutex::new(()),
            retriever: RwLock::new(retriever),
            persister: RwLock::new(persister),
            changes,
            metrics,
        }
    }

    /// Set a custom metrics handler.
    pub fn with_metrics(mut self, metrics: Box<dyn SlotMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Return the cached value, retrieving it on a miss.
    ///
    /// The hit path reads memory without taking the slot lock. On a miss the
    /// lock is acquired, the value re-checked (another caller may have
    /// populated it in the meantime), and only then is the retrieval
    /// collaborator invoked, so N concurrent callers on an empty slot cost
    /// exactly one retrieval.
    ///
    /// Returns `Ok(None)` if no retriever is configured or the source has no
    /// value. An empty retrieval is not cached; the next `get` retries.
    ///
    /// # Errors
    ///
    /// `Error::RetrievalError` if the retrieval collaborator fails. The slot
    /// stays empty and remains usable.
    pub async fn get(&self) -> Result<Option<T>> {
        let timer = Instant::now();

        if let Some(value) = self.peek() {
            debug!("✓ Slot hit (fast path)");
            self.metrics.record_hit(timer.elapsed());
            return Ok(Some(value));
        }

        let _guard = self.mutate.lock().await;

        // Re-check: another caller may have filled the slot while this one
        // waited on the lock.
        if let Some(value) = self.peek() {
            debug!("✓ Slot filled while waiting for lock");
            self.metrics.record_hit(timer.elapsed());
            return Ok(Some(value));
        }

        let Some(retriever) = self.retriever() else {
            debug!("✗ Slot miss, no retriever configured");
            self.metrics.record_miss(timer.elapsed());
            return Ok(None);
        };

        debug!("» Slot miss, retrieving");
        match retriever.retrieve().await {
            Ok(Some(value)) => {
                self.commit(value.clone());
                self.metrics.record_hit(timer.elapsed());
                Ok(Some(value))
            }
            Ok(None) => {
                debug!("✗ Retrieval yielded no value");
                self.metrics.record_miss(timer.elapsed());
                Ok(None)
            }
            Err(e) => {
                self.metrics.record_error(&e.to_string());
                Err(e)
            }
        }
    }

    /// Store a value, writing it through to external storage first.
    ///
    /// Under the slot lock: invokes the persistence collaborator (if
    /// configured), then commits the value to memory and notifies observers.
    /// After `store` returns, persistence has completed and memory reflects
    /// the new value.
    ///
    /// # Errors
    ///
    /// `Error::PersistenceError` if the persistence collaborator fails.
    /// Memory is left unchanged: a value that failed to persist is never
    /// cached.
    pub async fn store(&self, value: T) -> Result<()> {
        let timer = Instant::now();
        let _guard = self.mutate.lock().await;

        if let Some(persister) = self.persister() {
            debug!("» Persisting stored value");
            if let Err(e) = persister.persist(value.clone()).await {
                self.metrics.record_error(&e.to_string());
                return Err(e);
            }
        }

        self.commit(value);
        self.metrics.record_store(timer.elapsed());
        Ok(())
    }

    /// Re-retrieve the value from the source, ignoring what is in memory.
    ///
    /// If the source yields a value it overwrites memory and observers are
    /// notified. If the retriever is absent or the source is empty, memory is
    /// left untouched and `Ok(None)` is returned. Never persists.
    ///
    /// # Errors
    ///
    /// `Error::RetrievalError` if the retrieval collaborator fails; the
    /// current value is kept.
    pub async fn refresh(&self) -> Result<Option<T>> {
        let timer = Instant::now();
        let _guard = self.mutate.lock().await;

        let Some(retriever) = self.retriever() else {
            debug!("✗ Refresh skipped, no retriever configured");
            self.metrics.record_miss(timer.elapsed());
            return Ok(None);
        };

        debug!("» Refreshing slot from source");
        match retriever.retrieve().await {
            Ok(Some(value)) => {
                self.commit(value.clone());
                self.metrics.record_hit(timer.elapsed());
                Ok(Some(value))
            }
            Ok(None) => {
                debug!("✗ Refresh yielded no value, keeping current");
                self.metrics.record_miss(timer.elapsed());
                Ok(None)
            }
            Err(e) => {
                self.metrics.record_error(&e.to_string());
                Err(e)
            }
        }
    }

    /// Make memory and external storage agree.
    ///
    /// Under the slot lock: retrieves on a miss (committing and notifying
    /// like `get`'s slow path), then persists whatever value is resident,
    /// whether pre-existing or freshly retrieved. Repeated `sync` calls
    /// re-persist an unchanged value; the slot does not compare by equality.
    ///
    /// Returns the resident value, or `Ok(None)` if the slot is empty and
    /// nothing could be retrieved.
    ///
    /// # Errors
    ///
    /// `Error::RetrievalError` if retrieval fails (memory unchanged), or
    /// `Error::PersistenceError` if persistence fails. A freshly retrieved
    /// value is already committed when persistence runs; it is not rolled
    /// back on a persistence failure.
    pub async fn sync(&self) -> Result<Option<T>> {
        let timer = Instant::now();
        let _guard = self.mutate.lock().await;

        let mut current = self.peek();

        if current.is_none() {
            if let Some(retriever) = self.retriever() {
                debug!("» Sync miss, retrieving");
                match retriever.retrieve().await {
                    Ok(Some(value)) => {
                        self.commit(value.clone());
                        current = Some(value);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        self.metrics.record_error(&e.to_string());
                        return Err(e);
                    }
                }
            }
        }

        let Some(value) = current else {
            debug!("✗ Sync finished with no value");
            self.metrics.record_miss(timer.elapsed());
            return Ok(None);
        };

        if let Some(persister) = self.persister() {
            debug!("» Persisting resident value");
            if let Err(e) = persister.persist(value.clone()).await {
                self.metrics.record_error(&e.to_string());
                return Err(e);
            }
        }

        self.metrics.record_hit(timer.elapsed());
        Ok(Some(value))
    }

    /// Empty the slot.
    ///
    /// Observers are not notified; they only ever see present values. The
    /// next `get` retrieves again if a retriever is configured.
    pub async fn clear(&self) {
        let _guard = self.mutate.lock().await;
        let mut slot = self.value.write().unwrap_or_else(PoisonError::into_inner);
        if slot.take().is_some() {
            debug!("✓ Slot cleared");
        }
    }

    /// Subscribe to value transitions.
    ///
    /// The subscription sees every value committed after this call, in
    /// commit order. The value held at subscription time is not replayed and
    /// `clear` is never emitted.
    pub fn observe(&self) -> Changes<T> {
        Changes::new(self.changes.subscribe())
    }

    /// Replace the retrieval collaborator.
    ///
    /// Takes effect on the next operation; an in-flight operation keeps the
    /// collaborator it already snapshotted.
    pub fn set_retriever(&self, retriever: impl Retrieve<T> + 'static) {
        *self
            .retriever
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(retriever));
    }

    /// Replace the persistence collaborator.
    ///
    /// Takes effect on the next operation; an in-flight operation keeps the
    /// collaborator it already snapshotted.
    pub fn set_persister(&self, persister: impl Persist<T> + 'static) {
        *self
            .persister
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(persister));
    }

    /// Blocking form of [`get`](Self::get) for non-async callers.
    ///
    /// Drives the operation to completion on the calling thread. Must not be
    /// called from a context that already holds the slot lock (e.g. from
    /// inside a collaborator of the same slot): it will deadlock.
    pub fn get_blocking(&self) -> Result<Option<T>> {
        futures::executor::block_on(self.get())
    }

    /// Blocking form of [`store`](Self::store) for non-async callers.
    ///
    /// Drives the operation to completion on the calling thread. Must not be
    /// called from a context that already holds the slot lock (e.g. from
    /// inside a collaborator of the same slot): it will deadlock.
    pub fn store_blocking(&self, value: T) -> Result<()> {
        futures::executor::block_on(self.store(value))
    }

    /// Read the value without taking the slot lock.
    fn peek(&self) -> Option<T> {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Snapshot the retrieval collaborator. The read guard is dropped before
    /// the collaborator is awaited.
    fn retriever(&self) -> Option<Arc<dyn Retrieve<T>>> {
        self.retriever
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn persister(&self) -> Option<Arc<dyn Persist<T>>> {
        self.persister
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Write the value to memory and notify observers. Callers hold the
    /// mutation lock, so commits (and therefore notifications) are totally
    /// ordered.
    fn commit(&self, value: T) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = Some(value.clone());
        // No live observers is fine.
        let _ = self.changes.send(value);
        debug!("✓ Slot value committed");
    }
}

impl<T: Clone + Send + Sync + 'static> Default for CacheSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}
