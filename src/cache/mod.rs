//! Search cache for the last lookup of each query kind
//!
//! This module keeps the most recent result of a capital, country, and region
//! search, and mirrors it to a key-value store so it survives restarts. A
//! failed lookup is cached as an empty result, the same as a search with no
//! matches.

mod manager;
mod storage;
mod store;

pub use manager::{
    CacheError, ManagerOptions, OrderingPolicy, SearchCacheManager, DEFAULT_STORAGE_KEY,
};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::{CacheStore, RegionSlot, SlotView, TermSlot, STORE_FORMAT_VERSION};
