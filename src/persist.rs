//! Write-through collaborator seam.

use crate::error::Result;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::Future;

/// Write-through collaborator: pushes a value to external storage.
///
/// The slot calls `persist` from `store` (before the in-memory write commits)
/// and from `sync` (after the resident value is settled), always while holding
/// the slot lock. Durability is entirely this collaborator's responsibility;
/// the slot only invokes it and propagates its outcome.
///
/// # Example
///
/// ```ignore
/// struct ProfileStore {
///     pool: PgPool,
/// }
///
/// impl Persist<Profile> for ProfileStore {
///     fn persist(&self, value: Profile) -> BoxFuture<'_, Result<()>> {
///         async move {
///             save_current_profile(&self.pool, &value)
///                 .await
///                 .map_err(|e| Error::PersistenceError(e.to_string()))
///         }
///         .boxed()
///     }
/// }
/// ```
pub trait Persist<T>: Send + Sync {
    /// Write the value to the external store.
    ///
    /// # Errors
    ///
    /// Any error is propagated unchanged to the caller of the slot
    /// operation that triggered the write.
    fn persist(&self, value: T) -> BoxFuture<'_, Result<()>>;
}

/// Adapter turning an async closure into a [`Persist`] collaborator.
///
/// Built with [`persist_fn`].
pub struct PersistFn<F> {
    f: F,
}

/// Wrap an async closure as a persistence collaborator.
///
/// # Example
///
/// ```ignore
/// slot.set_persister(persist_fn(move |value: Config| {
///     let client = client.clone();
///     async move { client.save_config(value).await }
/// }));
/// ```
pub fn persist_fn<F, Fut, T>(f: F) -> PersistFn<F>
where
    F: Fn(T) -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    PersistFn { f }
}

impl<F, Fut, T> Persist<T> for PersistFn<F>
where
    F: Fn(T) -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    fn persist(&self, value: T) -> BoxFuture<'_, Result<()>> {
        (self.f)(value).boxed()
    }
}
