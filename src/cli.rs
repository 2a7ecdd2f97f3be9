//! Command-line interface parsing for Countryfinder
//!
//! This module handles parsing of CLI arguments using clap: one subcommand per
//! search kind, a single-country lookup, redisplay of cached searches, and a
//! refresh of every cached search.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use thiserror::Error;

use crate::cache::OrderingPolicy;
use crate::config::Config;
use crate::data::{QueryKind, Region};

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified region name is not recognized
    #[error("Invalid region: '{0}'. Valid regions: Africa, Americas, Asia, Europe, Oceania")]
    InvalidRegion(String),
}

/// Countryfinder - Look up countries by name, capital, or region
#[derive(Parser, Debug)]
#[command(name = "countryfinder")]
#[command(about = "Look up countries by name, capital, or region")]
#[command(version)]
pub struct Cli {
    /// Base URL of the REST Countries API
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Directory where the last searches are stored
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Ignore results that arrive after a newer search of the same kind
    #[arg(long, global = true)]
    pub discard_stale: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Search countries by capital city
    Capital {
        /// Full or partial capital name
        term: String,
    },
    /// Search countries by name
    Country {
        /// Full or partial country name
        term: String,
    },
    /// List the countries of a region
    ///
    /// Valid regions: Africa, Americas, Asia, Europe, Oceania
    Region {
        /// Region name (case-insensitive)
        region: String,
    },
    /// Look up a single country by its 2- or 3-letter code
    Alpha {
        /// ISO 3166-1 alpha-2 or alpha-3 code
        code: String,
    },
    /// Show the last cached search without contacting the API
    Show {
        /// Which search to show; all of them if omitted
        #[arg(value_enum)]
        kind: Option<KindArg>,
    },
    /// Re-run every cached search
    Refresh,
}

/// Query kind as written on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Capital,
    Country,
    Region,
}

impl From<KindArg> for QueryKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Capital => QueryKind::ByCapital,
            KindArg::Country => QueryKind::ByCountry,
            KindArg::Region => QueryKind::ByRegion,
        }
    }
}

/// Parses a region string argument into a Region.
///
/// # Returns
/// * `Ok(Region)` if the string names one of the five regions
/// * `Err(CliError::InvalidRegion)` otherwise
pub fn parse_region_arg(s: &str) -> Result<Region, CliError> {
    Region::from_name(s).ok_or_else(|| CliError::InvalidRegion(s.to_string()))
}

impl Cli {
    /// Applies command-line overrides on top of a base configuration
    pub fn apply_to(&self, mut config: Config) -> Config {
        if let Some(url) = &self.api_url {
            config.api_base_url = url.clone();
        }
        if let Some(dir) = &self.cache_dir {
            config.cache_dir = Some(dir.clone());
        }
        if self.discard_stale {
            config.ordering = OrderingPolicy::LatestIssued;
        }
        config
    }
}
