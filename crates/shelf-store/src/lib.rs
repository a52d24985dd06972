//! Embedded file-backed record store.
//!
//! A [`Store`] persists named records as one file each under a root
//! directory, with an in-process cache validated against file modification
//! time and a permissive text/JSON on-disk format (see `shelf-codec`). It
//! targets applications that want simple persistent key-value or list
//! storage without a database server.
//!
//! # Design Rules
//!
//! 1. Path validation runs before every filesystem access keyed by a
//!    user-supplied name; traversal attempts read as empty/false rather
//!    than erroring, so nothing outside the root is ever revealed.
//! 2. Not-found is not an error: missing records read as empty records.
//! 3. Every save and delete synchronously refreshes or clears the cache;
//!    the cache never serves content older than the last write made
//!    through this API.
//! 4. Record files are replaced under an exclusive advisory lock and read
//!    under a shared one; that is the only cross-process coordination
//!    provided. Within a process, every public operation holds the store's
//!    state mutex for its full duration.
//! 5. All operations are synchronous and run to completion; errors are
//!    raised to the caller, never retried internally.

pub mod cache;
pub mod config;
pub mod error;
pub mod lock;
pub mod paths;
pub mod store;

pub use cache::RecordCache;
pub use config::{StoreConfig, MIN_CACHE_EXPIRY_SECS};
pub use error::{StoreError, StoreResult};
pub use store::{CacheStats, SearchScope, Store};
