//! Core data models for Countryfinder
//!
//! This module contains the country record returned by the REST Countries API,
//! the fixed set of regions, and the query kinds the search cache keys on.

pub mod countries;

pub use countries::{CountriesClient, CountriesError, CountryLookup, LookupOutcome, Query};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A single country as returned by the REST Countries API
///
/// The record is kept exactly as the API sent it, so it round-trips through
/// the cache unmodified. The accessors below read display fields leniently:
/// a missing or oddly shaped field only yields `None`, it never rejects the
/// record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Country(Map<String, Value>);

impl Country {
    /// Creates a minimal country record with only a name set
    pub fn named(common: impl Into<String>) -> Self {
        let common = common.into();
        let mut name = Map::new();
        name.insert("official".to_string(), Value::String(common.clone()));
        name.insert("common".to_string(), Value::String(common));

        let mut fields = Map::new();
        fields.insert("name".to_string(), Value::Object(name));
        Self(fields)
    }

    /// Sets a field, replacing any previous value
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Raw access to any field of the record
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The whole record
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Common name, e.g. "Peru"
    pub fn common_name(&self) -> Option<&str> {
        self.get("name")?.get("common")?.as_str()
    }

    /// Official name, e.g. "Republic of Peru"
    pub fn official_name(&self) -> Option<&str> {
        self.get("name")?.get("official")?.as_str()
    }

    /// Returns the first listed capital, if any
    pub fn primary_capital(&self) -> Option<&str> {
        self.get("capital")?.as_array()?.first()?.as_str()
    }

    pub fn region(&self) -> Option<&str> {
        self.get("region")?.as_str()
    }

    pub fn population(&self) -> Option<u64> {
        self.get("population")?.as_u64()
    }

    /// Flag emoji
    pub fn flag(&self) -> Option<&str> {
        self.get("flag")?.as_str()
    }

    /// ISO 3166-1 alpha-3 code
    pub fn cca3(&self) -> Option<&str> {
        self.get("cca3")?.as_str()
    }
}

/// Geographic regions accepted by the region endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Africa,
    Americas,
    Asia,
    Europe,
    Oceania,
}

impl Region {
    /// All regions, in display order
    pub const ALL: [Region; 5] = [
        Region::Africa,
        Region::Americas,
        Region::Asia,
        Region::Europe,
        Region::Oceania,
    ];

    /// The name used in API paths and cache slots
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Africa => "Africa",
            Region::Americas => "Americas",
            Region::Asia => "Asia",
            Region::Europe => "Europe",
            Region::Oceania => "Oceania",
        }
    }

    /// Parses a region name, ignoring case
    ///
    /// Returns `None` if the name is not one of the five known regions.
    pub fn from_name(s: &str) -> Option<Region> {
        Region::ALL
            .into_iter()
            .find(|region| region.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three independent search axes, one cache slot each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    ByCapital,
    ByCountry,
    ByRegion,
}

impl QueryKind {
    pub const ALL: [QueryKind; 3] = [QueryKind::ByCapital, QueryKind::ByCountry, QueryKind::ByRegion];

    /// Short label used in CLI output
    pub fn label(&self) -> &'static str {
        match self {
            QueryKind::ByCapital => "capital",
            QueryKind::ByCountry => "country",
            QueryKind::ByRegion => "region",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            QueryKind::ByCapital => 0,
            QueryKind::ByCountry => 1,
            QueryKind::ByRegion => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_deserializes_api_record_and_keeps_unknown_fields() {
        let json = r#"{
            "name": {"common": "Peru", "official": "Republic of Peru", "nativeName": {"spa": {"common": "Perú"}}},
            "capital": ["Lima"],
            "region": "Americas",
            "subregion": "South America",
            "population": 32971846,
            "flag": "🇵🇪",
            "cca3": "PER",
            "flags": {"png": "https://flagcdn.com/w320/pe.png"}
        }"#;

        let country: Country = serde_json::from_str(json).expect("Should parse country");

        assert_eq!(country.common_name(), Some("Peru"));
        assert_eq!(country.official_name(), Some("Republic of Peru"));
        assert_eq!(country.fields()["name"]["nativeName"]["spa"]["common"], "Perú");
        assert_eq!(country.primary_capital(), Some("Lima"));
        assert_eq!(country.region(), Some("Americas"));
        assert_eq!(country.population(), Some(32971846));
        assert_eq!(country.flag(), Some("🇵🇪"));
        assert_eq!(country.cca3(), Some("PER"));
        assert_eq!(country.fields()["subregion"], "South America");
        assert_eq!(
            country.fields()["flags"]["png"],
            "https://flagcdn.com/w320/pe.png"
        );
    }

    #[test]
    fn test_country_passes_through_unmodified() {
        let original = serde_json::json!({
            "name": {"common": "Antarctica", "official": "Antarctica"},
            "region": "Antarctic",
            "independent": false,
            "latlng": [-90.0, 0.0]
        });

        let country: Country = serde_json::from_value(original.clone()).unwrap();
        let back = serde_json::to_value(&country).unwrap();

        assert_eq!(back, original);
        assert!(country.primary_capital().is_none());
    }

    #[test]
    fn test_country_without_official_name_is_not_padded() {
        let original = serde_json::json!({"name": {"common": "X"}, "region": "Europe"});

        let country: Country = serde_json::from_value(original.clone()).unwrap();

        assert_eq!(serde_json::to_value(&country).unwrap(), original);
        assert_eq!(country.common_name(), Some("X"));
        assert!(country.official_name().is_none());
    }

    #[test]
    fn test_country_keeps_explicit_nulls() {
        let original = serde_json::json!({"name": {"common": "X"}, "capital": null});

        let country: Country = serde_json::from_value(original.clone()).unwrap();

        assert_eq!(serde_json::to_value(&country).unwrap(), original);
        assert!(country.primary_capital().is_none());
    }

    #[test]
    fn test_records_with_missing_or_odd_fields_still_decode() {
        let batch = serde_json::json!([
            {"name": {"common": "A"}},
            {"cca3": "ZZZ"},
            {"name": "not an object", "population": "many", "capital": "Lima"}
        ]);

        let countries: Vec<Country> = serde_json::from_value(batch).expect("Whole batch should decode");

        assert_eq!(countries.len(), 3);
        assert_eq!(countries[0].common_name(), Some("A"));
        assert!(countries[1].common_name().is_none());
        assert_eq!(countries[1].cca3(), Some("ZZZ"));
        assert!(countries[2].common_name().is_none());
        assert!(countries[2].population().is_none());
        assert!(countries[2].primary_capital().is_none());
    }

    #[test]
    fn test_region_from_name_ignores_case() {
        assert_eq!(Region::from_name("americas"), Some(Region::Americas));
        assert_eq!(Region::from_name("EUROPE"), Some(Region::Europe));
        assert_eq!(Region::from_name(" Oceania "), Some(Region::Oceania));
        assert_eq!(Region::from_name("Antarctica"), None);
    }

    #[test]
    fn test_region_display_matches_api_name() {
        for region in Region::ALL {
            assert_eq!(region.to_string(), region.as_str());
        }
    }

    #[test]
    fn test_query_kind_indices_are_distinct() {
        let indices: Vec<usize> = QueryKind::ALL.iter().map(QueryKind::index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }
}
