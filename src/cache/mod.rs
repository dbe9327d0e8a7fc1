//! In-process cache for authorization lookups
//!
//! Credentials are hashed into keys; results are held in a bounded LRU map
//! for the life of the process.

pub mod forms;
pub mod key;

// Re-export main types
pub use forms::{AuthCacheStats, AuthorizationCache, DEFAULT_AUTH_CACHE_CAPACITY};
pub use key::credential_key;
