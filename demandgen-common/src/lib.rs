//! # demandgen common library
//!
//! Shared code for the demandgen services:
//! - Error type used across crates
//! - TOML bootstrap configuration loading
//! - Wire data model (exhibits, client identity, case analysis, damages)

pub mod config;
pub mod error;
pub mod models;

pub use error::{Error, Result};
