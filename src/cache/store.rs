//! The cached search state: one slot per query kind
//!
//! Persisted as a versioned JSON envelope so a schema change can be detected
//! instead of silently misreading an older blob.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::{Country, QueryKind};

/// Current version of the persisted envelope
pub const STORE_FORMAT_VERSION: u32 = 1;

/// Last search by capital or by country name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TermSlot {
    pub term: String,
    pub countries: Vec<Country>,
}

/// Last search by region
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionSlot {
    pub region: String,
    pub countries: Vec<Country>,
}

/// Borrowed view over any slot, for code that does not care about its kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotView<'a> {
    pub kind: QueryKind,
    pub term: &'a str,
    pub countries: &'a [Country],
}

impl SlotView<'_> {
    /// A slot that has never been filled by a search
    pub fn is_unset(&self) -> bool {
        self.term.is_empty() && self.countries.is_empty()
    }
}

/// The three cached searches
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStore {
    pub by_capital: TermSlot,
    pub by_country: TermSlot,
    pub by_region: RegionSlot,
}

impl CacheStore {
    /// Returns a view of the slot for `kind`
    pub fn slot(&self, kind: QueryKind) -> SlotView<'_> {
        let (term, countries) = match kind {
            QueryKind::ByCapital => (&self.by_capital.term, &self.by_capital.countries),
            QueryKind::ByCountry => (&self.by_country.term, &self.by_country.countries),
            QueryKind::ByRegion => (&self.by_region.region, &self.by_region.countries),
        };
        SlotView {
            kind,
            term,
            countries,
        }
    }

    /// Replaces the slot for `kind`, leaving the other two untouched
    pub fn replace(&mut self, kind: QueryKind, term: String, countries: Vec<Country>) {
        match kind {
            QueryKind::ByCapital => self.by_capital = TermSlot { term, countries },
            QueryKind::ByCountry => self.by_country = TermSlot { term, countries },
            QueryKind::ByRegion => {
                self.by_region = RegionSlot {
                    region: term,
                    countries,
                }
            }
        }
    }
}

/// On-disk wrapper around a [`CacheStore`]
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct PersistedStore<S> {
    /// Format version, checked on load
    pub version: u32,
    /// When the store was last written
    pub saved_at: DateTime<Utc>,
    /// The cached searches
    pub store: S,
}

/// Header read before the body, so an unknown version is reported as such
/// rather than as a shape mismatch
#[derive(Debug, Deserialize)]
pub(crate) struct PersistedHeader {
    pub version: u32,
}
