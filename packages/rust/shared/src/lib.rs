//! Shared types, error model, and configuration for sitekb.
//!
//! This crate is the foundation depended on by the other sitekb crates.
//! It provides:
//! - [`SiteKbError`] — the unified error type
//! - Domain types ([`Entry`] and its category projections)
//! - Configuration ([`AppConfig`], [`CrawlOptions`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CrawlOptions, CrawlPoliciesConfig, DefaultsConfig, StorageConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from, snapshot_dir,
};
pub use error::{Result, SiteKbError};
pub use types::{Client, DESCRIPTION_MAX_CHARS, Entry, Product, Supplier};
