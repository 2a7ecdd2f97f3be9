//! REST Countries API client
//!
//! Fetches country records by capital, name, region, or alpha code. Every
//! transport failure is absorbed here: callers only ever see a (possibly
//! empty) list of countries, or `None` for single-code lookups.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

use super::Country;

/// Base URL for the REST Countries API
pub const REST_COUNTRIES_BASE_URL: &str = "https://restcountries.com/v3.1";

/// Errors that can occur while talking to the API
///
/// These never leave the gateway's `fetch_by_*` methods; they are logged and
/// collapsed into [`LookupOutcome::Failed`].
#[derive(Debug, Error)]
pub enum CountriesError {
    /// HTTP request failed or the body could not be decoded
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("Unexpected status {status} for {url}")]
    Status { status: u16, url: String },
}

/// A single request against one of the API's sub-resources
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Query {
    Capital(String),
    Name(String),
    Region(String),
    Alpha(String),
}

impl Query {
    /// Path relative to the API base URL, with the term percent-encoded
    pub fn path(&self) -> String {
        let (resource, term) = match self {
            Query::Capital(term) => ("capital", term),
            Query::Name(term) => ("name", term),
            Query::Region(term) => ("region", term),
            Query::Alpha(term) => ("alpha", term),
        };
        format!("/{}/{}", resource, urlencoded(term))
    }
}

/// Outcome of a single lookup before normalization
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// The API answered with a list of countries (possibly empty)
    Found(Vec<Country>),
    /// The request failed at the transport, status, or decoding level
    Failed,
}

impl LookupOutcome {
    /// Collapses a failure into an empty list.
    ///
    /// This is the only place a failed lookup becomes indistinguishable from
    /// a lookup with zero matches. The UI never sees an error state.
    pub fn into_countries(self) -> Vec<Country> {
        match self {
            LookupOutcome::Found(countries) => countries,
            LookupOutcome::Failed => Vec::new(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LookupOutcome::Failed)
    }
}

impl From<Result<Vec<Country>, CountriesError>> for LookupOutcome {
    fn from(result: Result<Vec<Country>, CountriesError>) -> Self {
        match result {
            Ok(countries) => LookupOutcome::Found(countries),
            Err(e) => {
                warn!(error = %e, "country lookup failed, returning empty result");
                LookupOutcome::Failed
            }
        }
    }
}

/// Source of country records
///
/// Implementors only provide [`CountryLookup::lookup`]; the `fetch_by_*`
/// methods build the query and normalize the outcome.
#[async_trait]
pub trait CountryLookup: Send + Sync {
    /// Performs one request against the API
    async fn lookup(&self, query: Query) -> LookupOutcome;

    async fn fetch_by_capital(&self, term: &str) -> Vec<Country> {
        self.lookup(Query::Capital(term.to_string()))
            .await
            .into_countries()
    }

    async fn fetch_by_country(&self, term: &str) -> Vec<Country> {
        self.lookup(Query::Name(term.to_string()))
            .await
            .into_countries()
    }

    async fn fetch_by_region(&self, region: &str) -> Vec<Country> {
        self.lookup(Query::Region(region.to_string()))
            .await
            .into_countries()
    }

    /// Returns the first country matching the code, or `None` if there is
    /// no match or the request failed
    async fn fetch_by_alpha_code(&self, code: &str) -> Option<Country> {
        self.lookup(Query::Alpha(code.to_string()))
            .await
            .into_countries()
            .into_iter()
            .next()
    }
}

#[async_trait]
impl<T: CountryLookup + ?Sized> CountryLookup for std::sync::Arc<T> {
    async fn lookup(&self, query: Query) -> LookupOutcome {
        (**self).lookup(query).await
    }
}

/// Client for the REST Countries API
#[derive(Debug, Clone)]
pub struct CountriesClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Base URL for the API (allows override for testing)
    base_url: String,
}

impl Default for CountriesClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CountriesClient {
    /// Creates a new CountriesClient pointing at the public API
    pub fn new() -> Self {
        Self::with_base_url(REST_COUNTRIES_BASE_URL)
    }

    /// Creates a new CountriesClient with a custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches countries directly from the API, surfacing every failure
    async fn fetch_from_api(&self, query: &Query) -> Result<Vec<Country>, CountriesError> {
        let url = format!("{}{}", self.base_url, query.path());
        debug!(%url, "requesting countries");

        let response = self.http_client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CountriesError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let countries = response.json::<Vec<Country>>().await?;
        debug!(%url, count = countries.len(), "received countries");
        Ok(countries)
    }
}

#[async_trait]
impl CountryLookup for CountriesClient {
    async fn lookup(&self, query: Query) -> LookupOutcome {
        self.fetch_from_api(&query).await.into()
    }
}

/// Percent-encodes a path segment
fn urlencoded(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
