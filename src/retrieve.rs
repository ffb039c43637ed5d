//! Read-through collaborator seam.

use crate::error::Result;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::Future;

/// Read-through collaborator: produces the value from wherever it lives
/// (database, remote service, file) when the slot needs it.
///
/// The slot calls `retrieve` on a `get` miss, on every `refresh`, and on a
/// `sync` miss, always while holding the slot lock, so at most one retrieval
/// is in flight per slot at any time.
///
/// Returning `Ok(None)` means the source has no value either; it is not an
/// error and is never cached.
///
/// # Example
///
/// ```ignore
/// struct ProfileSource {
///     pool: PgPool,
/// }
///
/// impl Retrieve<Profile> for ProfileSource {
///     fn retrieve(&self) -> BoxFuture<'_, Result<Option<Profile>>> {
///         async move {
///             load_current_profile(&self.pool)
///                 .await
///                 .map_err(|e| Error::RetrievalError(e.to_string()))
///         }
///         .boxed()
///     }
/// }
/// ```
pub trait Retrieve<T>: Send + Sync {
    /// Fetch the value from the external source.
    ///
    /// # Errors
    ///
    /// Any error is propagated unchanged to the caller of the slot
    /// operation that triggered the retrieval.
    fn retrieve(&self) -> BoxFuture<'_, Result<Option<T>>>;
}

/// Adapter turning an async closure into a [`Retrieve`] collaborator.
///
/// Built with [`retrieve_fn`].
pub struct RetrieveFn<F> {
    f: F,
}

/// Wrap an async closure as a retrieval collaborator.
///
/// # Example
///
/// ```ignore
/// slot.set_retriever(retrieve_fn(move || {
///     let client = client.clone();
///     async move { client.fetch_config().await }
/// }));
/// ```
pub fn retrieve_fn<F, Fut, T>(f: F) -> RetrieveFn<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<T>>> + Send + 'static,
{
    RetrieveFn { f }
}

impl<F, Fut, T> Retrieve<T> for RetrieveFn<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<T>>> + Send + 'static,
{
    fn retrieve(&self) -> BoxFuture<'_, Result<Option<T>>> {
        (self.f)().boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[tokio::test]
    async fn test_retrieve_fn_yields_value() {
        let source = retrieve_fn(|| async { Ok(Some(7u32)) });
        assert_eq!(source.retrieve().await.unwrap(), Some(7));
    }

    #[tokio::test]
    async fn test_retrieve_fn_yields_absence() {
        let source = retrieve_fn(|| async { Ok(None::<u32>) });
        assert_eq!(source.retrieve().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_retrieve_fn_propagates_error() {
        let source = retrieve_fn(|| async {
            Err::<Option<u32>, _>(Error::RetrievalError("offline".to_string()))
        });
        let err = source.retrieve().await.unwrap_err();
        assert_eq!(err, Error::RetrievalError("offline".to_string()));
    }
}
