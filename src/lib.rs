//! Countryfinder Library
//!
//! Looks up countries through the REST Countries API and keeps the last
//! capital, country, and region search cached across sessions.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod ui;
