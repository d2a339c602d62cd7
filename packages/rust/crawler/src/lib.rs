//! Web crawling and per-page extraction for sitekb.
//!
//! This crate provides:
//! - [`scope`] — include/exclude URL pattern filtering
//! - [`classify`] — pluggable page classification (title/content/category/tags)
//! - [`links`] — same-domain link extraction
//! - [`engine`] — the depth-first, quota-bounded crawl engine

pub mod classify;
pub mod engine;
pub mod links;
pub mod scope;

pub use classify::{HeuristicClassifier, PageClassifier, PageRecord};
pub use engine::{CrawlProgress, CrawlReport, Crawler, SilentProgress};
pub use links::extract_links;
pub use scope::PatternFilter;
