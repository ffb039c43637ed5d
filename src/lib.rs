//! # slot-cache
//!
//! A concurrency-safe, read-through/write-through single-slot value cache
//! for async Rust.
//!
//! ## Features
//!
//! - **Fully Generic:** Cache any `T: Clone + Send + Sync`
//! - **Read-Through:** Retrieves from a pluggable source on miss, exactly
//!   once per miss however many callers race
//! - **Write-Through:** Persists to a pluggable store before a stored value
//!   becomes visible
//! - **Reactive:** Broadcasts every committed value to observers
//! - **Concurrency-Safe:** Lock-free hit path, check-lock-check miss path,
//!   all mutations totally ordered
//! - **Production Ready:** Built-in logging, metrics hooks, and error
//!   handling
//!
//! ## Quick Start
//!
//! ```
//! use slot_cache::CacheSlot;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let slot: CacheSlot<u32> = CacheSlot::with_value(42);
//! assert_eq!(slot.get().await.unwrap(), Some(42));
//!
//! slot.store(69).await.unwrap();
//! assert_eq!(slot.get().await.unwrap(), Some(69));
//!
//! slot.clear().await;
//! assert_eq!(slot.get().await.unwrap(), None);
//! # }
//! ```
//!
//! ## Read-through and write-through
//!
//! Collaborators are plugged in as traits or async closures and may be
//! swapped at runtime:
//!
//! ```ignore
//! use slot_cache::{persist_fn, retrieve_fn, CacheSlot};
//!
//! let slot = CacheSlot::builder()
//!     .retriever(retrieve_fn(move || {
//!         let db = db.clone();
//!         async move { db.load_profile().await }
//!     }))
//!     .persister(persist_fn(move |profile: Profile| {
//!         let db = db.clone();
//!         async move { db.save_profile(profile).await }
//!     }))
//!     .build();
//!
//! // First get retrieves; later gets are memory hits.
//! let profile = slot.get().await?;
//!
//! // store persists first, then updates memory and notifies observers.
//! slot.store(updated).await?;
//!
//! // Watch the slot from anywhere.
//! let mut changes = slot.observe();
//! while let Some(profile) = changes.next().await {
//!     println!("profile changed: {profile:?}");
//! }
//! ```

#[macro_use]
extern crate log;

pub mod builder;
pub mod changes;
pub mod error;
pub mod observability;
pub mod persist;
pub mod retrieve;
pub mod slot;

// Re-exports for convenience
pub use builder::SlotBuilder;
pub use changes::Changes;
pub use error::{Error, Result};
pub use observability::{NoOpMetrics, SlotMetrics};
pub use persist::{persist_fn, Persist, PersistFn};
pub use retrieve::{retrieve_fn, Retrieve, RetrieveFn};
pub use slot::CacheSlot;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
