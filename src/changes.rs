//! Change notification stream for slot observers.

use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

/// Live view of a slot's value transitions.
///
/// Created by `CacheSlot::observe`. Each subscription sees every value
/// committed after it was created, in commit order; values held before
/// subscription are not replayed, and cleared (absent) states are never
/// emitted.
///
/// The underlying channel is bounded. An observer that falls more than the
/// channel capacity behind skips the overwritten transitions and continues
/// from the oldest one still buffered.
///
/// # Example
///
/// ```ignore
/// let mut changes = slot.observe();
/// tokio::spawn(async move {
///     while let Some(value) = changes.next().await {
///         println!("slot is now {:?}", value);
///     }
/// });
/// ```
pub struct Changes<T> {
    rx: broadcast::Receiver<T>,
}

impl<T: Clone + Send + 'static> Changes<T> {
    pub(crate) fn new(rx: broadcast::Receiver<T>) -> Self {
        Changes { rx }
    }

    /// Wait for the next committed value.
    ///
    /// Returns `None` once the slot has been dropped and all buffered
    /// transitions have been consumed.
    pub async fn next(&mut self) -> Option<T> {
        loop {
            match self.rx.recv().await {
                Ok(value) => return Some(value),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("✗ Observer lagged, skipped {} transition(s)", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Convert into a [`Stream`] of committed values.
    ///
    /// Lagged gaps are skipped silently; the stream ends when the slot is
    /// dropped.
    pub fn into_stream(self) -> impl Stream<Item = T> {
        BroadcastStream::new(self.rx).filter_map(|event| event.ok())
    }
}
