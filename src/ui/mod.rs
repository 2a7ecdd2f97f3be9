//! Output rendering for Countryfinder
//!
//! Renders cached or freshly fetched countries as a plain-text table for the
//! terminal. Rendering only reads country records; it never touches the cache.

pub mod countries_table;

pub use countries_table::{format_population, render_countries_table, render_slot};
