//! Search cache manager
//!
//! Owns the [`CacheStore`], runs searches through a [`CountryLookup`], writes
//! each result into the slot for its query kind, and mirrors the whole store
//! to a [`KeyValueStore`] after every change.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::storage::{KeyValueStore, StorageError};
use super::store::{CacheStore, PersistedHeader, PersistedStore, STORE_FORMAT_VERSION};
use crate::data::{Country, CountryLookup, QueryKind};

/// Storage key the store is persisted under by default
pub const DEFAULT_STORAGE_KEY: &str = "cacheStore";

/// Errors raised while loading or saving the cache store
#[derive(Debug, Error)]
pub enum CacheError {
    /// The storage backend failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The persisted value is not a valid serialized store
    #[error("Persisted cache store is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),

    /// The persisted value was written by an incompatible format version
    #[error("Persisted cache store has version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// The store could not be serialized
    #[error("Failed to serialize cache store: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// How completions of concurrent searches of the same kind are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderingPolicy {
    /// Every completed search overwrites its slot; the last to finish wins
    #[default]
    LastCompleted,
    /// A search that finishes after a newer search of the same kind has
    /// already been applied is dropped instead of overwriting the slot
    LatestIssued,
}

/// Construction options for [`SearchCacheManager`]
#[derive(Debug, Clone)]
pub struct ManagerOptions {
    /// Key the store is persisted under
    pub storage_key: String,
    /// Ordering applied to same-kind completions
    pub ordering: OrderingPolicy,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            ordering: OrderingPolicy::default(),
        }
    }
}

/// Mutable state guarded by the manager's lock
#[derive(Debug)]
struct SearchState {
    store: CacheStore,
    /// Sequence number of the search last written into each slot
    applied: [u64; 3],
    saved_at: Option<DateTime<Utc>>,
}

/// Keeps the last search of each kind, in memory and in durable storage
///
/// All methods take `&self`, so any number of searches may be in flight at
/// once. The lock is only held while a slot is replaced and persisted, never
/// across a network call.
pub struct SearchCacheManager<L, S> {
    lookup: L,
    storage: S,
    options: ManagerOptions,
    state: Mutex<SearchState>,
    /// Sequence numbers handed out per kind
    issued: [AtomicU64; 3],
}

impl<L: CountryLookup, S: KeyValueStore> SearchCacheManager<L, S> {
    /// Creates a manager with default options, restoring any persisted store
    pub fn new(lookup: L, storage: S) -> Result<Self, CacheError> {
        Self::load(lookup, storage, ManagerOptions::default())
    }

    /// Creates a manager, restoring the store persisted under
    /// `options.storage_key` if there is one
    ///
    /// # Returns
    /// * `Ok(manager)` with an all-empty store if nothing was persisted
    /// * `Ok(manager)` with the persisted store if it parsed
    /// * `Err(CacheError)` if storage failed or the persisted value is corrupt
    pub fn load(lookup: L, storage: S, options: ManagerOptions) -> Result<Self, CacheError> {
        let (store, saved_at) = match storage.get(&options.storage_key)? {
            Some(raw) => {
                let persisted = decode_store(&raw)?;
                info!(
                    key = %options.storage_key,
                    saved_at = %persisted.saved_at,
                    "restored cached searches"
                );
                (persisted.store, Some(persisted.saved_at))
            }
            None => {
                debug!(key = %options.storage_key, "no persisted searches, starting empty");
                (CacheStore::default(), None)
            }
        };

        Ok(Self {
            lookup,
            storage,
            options,
            state: Mutex::new(SearchState {
                store,
                applied: [0; 3],
                saved_at,
            }),
            issued: [AtomicU64::new(0), AtomicU64::new(0), AtomicU64::new(0)],
        })
    }

    /// Searches countries by capital and caches the result
    pub async fn search_by_capital(&self, term: &str) -> Vec<Country> {
        self.search(QueryKind::ByCapital, term).await
    }

    /// Searches countries by name and caches the result
    pub async fn search_by_country(&self, term: &str) -> Vec<Country> {
        self.search(QueryKind::ByCountry, term).await
    }

    /// Lists the countries of a region and caches the result
    pub async fn search_by_region(&self, region: &str) -> Vec<Country> {
        self.search(QueryKind::ByRegion, region).await
    }

    /// Looks up a single country by alpha code. Not cached.
    pub async fn lookup_by_alpha_code(&self, code: &str) -> Option<Country> {
        self.lookup.fetch_by_alpha_code(code).await
    }

    /// Runs a search of `kind` and writes its result into that kind's slot.
    ///
    /// The slot is replaced even when the result is empty, which is also what
    /// a failed lookup looks like by the time it reaches the cache.
    pub async fn search(&self, kind: QueryKind, term: &str) -> Vec<Country> {
        let seq = self.issued[kind.index()].fetch_add(1, Ordering::SeqCst) + 1;

        let countries = match kind {
            QueryKind::ByCapital => self.lookup.fetch_by_capital(term).await,
            QueryKind::ByCountry => self.lookup.fetch_by_country(term).await,
            QueryKind::ByRegion => self.lookup.fetch_by_region(term).await,
        };

        self.apply(kind, seq, term, countries.clone());
        countries
    }

    /// Re-runs the last search of every slot that has a term, concurrently
    ///
    /// Returns the kinds that were refreshed with their new result counts.
    pub async fn refresh(&self) -> Vec<(QueryKind, usize)> {
        let terms: Vec<(QueryKind, String)> = {
            let state = self.lock();
            QueryKind::ALL
                .into_iter()
                .map(|kind| (kind, state.store.slot(kind).term.to_string()))
                .filter(|(_, term)| !term.is_empty())
                .collect()
        };

        let searches = terms.into_iter().map(|(kind, term)| async move {
            let countries = self.search(kind, &term).await;
            (kind, countries.len())
        });

        futures::future::join_all(searches).await
    }

    /// Returns a copy of the whole store
    pub fn store(&self) -> CacheStore {
        self.lock().store.clone()
    }

    /// Returns the cached term and countries for `kind`
    pub fn slot(&self, kind: QueryKind) -> (String, Vec<Country>) {
        let state = self.lock();
        let slot = state.store.slot(kind);
        (slot.term.to_string(), slot.countries.to_vec())
    }

    /// When the store was last written to storage, if ever
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        self.lock().saved_at
    }

    /// Writes the current store to storage
    pub fn save(&self) -> Result<(), CacheError> {
        let mut state = self.lock();
        self.persist(&mut state)
    }

    fn apply(&self, kind: QueryKind, seq: u64, term: &str, countries: Vec<Country>) {
        let mut state = self.lock();
        let idx = kind.index();

        if self.options.ordering == OrderingPolicy::LatestIssued && seq < state.applied[idx] {
            debug!(
                kind = kind.label(),
                term,
                seq,
                applied = state.applied[idx],
                "dropping stale search result"
            );
            return;
        }

        state.applied[idx] = state.applied[idx].max(seq);
        debug!(kind = kind.label(), term, count = countries.len(), "updating cached search");
        state.store.replace(kind, term.to_string(), countries);

        if let Err(e) = self.persist(&mut state) {
            warn!(error = %e, "failed to persist cached searches");
        }
    }

    fn persist(&self, state: &mut SearchState) -> Result<(), CacheError> {
        let saved_at = Utc::now();
        let persisted = PersistedStore {
            version: STORE_FORMAT_VERSION,
            saved_at,
            store: &state.store,
        };
        let json = serde_json::to_string(&persisted).map_err(CacheError::Serialize)?;

        self.storage.set(&self.options.storage_key, &json)?;
        state.saved_at = Some(saved_at);
        debug!(key = %self.options.storage_key, bytes = json.len(), "persisted cached searches");
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, SearchState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Parses a persisted store, checking its version first
fn decode_store(raw: &str) -> Result<PersistedStore<CacheStore>, CacheError> {
    let header: PersistedHeader = serde_json::from_str(raw).map_err(CacheError::Corrupt)?;
    if header.version != STORE_FORMAT_VERSION {
        return Err(CacheError::UnsupportedVersion {
            found: header.version,
            expected: STORE_FORMAT_VERSION,
        });
    }
    serde_json::from_str(raw).map_err(CacheError::Corrupt)
}
