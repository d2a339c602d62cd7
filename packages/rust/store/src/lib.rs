//! In-memory knowledge store: build, query, project, snapshot.
//!
//! [`KnowledgeBase`] owns the ordered entry collection produced by a crawl.
//! `build` takes `&mut self`, so the borrow checker enforces the
//! one-build-at-a-time contract: a second build or any read on the same
//! instance cannot overlap an in-progress rebuild.

pub mod persist;
pub mod search;

use tracing::{debug, error, info, warn};
use url::Url;

use sitekb_crawler::{CrawlProgress, CrawlReport, Crawler};
use sitekb_shared::{Client, CrawlOptions, Entry, Product, Result, SiteKbError, Supplier};

pub use persist::{FileStore, SNAPSHOT_KEY, SnapshotStore};
pub use search::DEFAULT_SEARCH_LIMIT;

/// The searchable corpus of crawled entries.
#[derive(Debug, Default)]
pub struct KnowledgeBase {
    entries: Vec<Entry>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the corpus by crawling from `seed`.
    ///
    /// Always starts from scratch: existing entries are discarded before the
    /// crawl runs. The crawl itself never fails on a per-page basis — only
    /// pre-crawl configuration problems surface as errors.
    pub async fn build(
        &mut self,
        crawler: &Crawler,
        seed: &Url,
        options: &CrawlOptions,
        progress: &dyn CrawlProgress,
    ) -> Result<CrawlReport> {
        self.entries.clear();
        let (report, entries) = crawler.crawl(seed, options, progress).await?;
        self.entries = entries;
        info!(entries = self.entries.len(), "knowledge base built");
        Ok(report)
    }

    /// All entries in crawl-insertion order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Product projections of entries categorized `"products"`.
    pub fn products(&self) -> Vec<Product> {
        self.in_category("products").map(Product::from).collect()
    }

    /// Client projections of entries categorized `"clients"`.
    pub fn clients(&self) -> Vec<Client> {
        self.in_category("clients").map(Client::from).collect()
    }

    /// Supplier projections of entries categorized `"suppliers"`.
    pub fn suppliers(&self) -> Vec<Supplier> {
        self.in_category("suppliers").map(Supplier::from).collect()
    }

    fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Entry> {
        self.entries
            .iter()
            .filter(move |entry| entry.category.eq_ignore_ascii_case(category))
    }

    /// Rank entries against `query`, returning at most `limit` results.
    /// See [`search::search`] for the scoring rules.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Entry> {
        search::search(&self.entries, query, limit)
    }

    // -----------------------------------------------------------------------
    // Snapshot persistence
    // -----------------------------------------------------------------------

    /// Serialize the full entry array into `store`. Returns `false` on any
    /// failure, with details only in the logs.
    pub fn save_to_storage(&self, store: &dyn SnapshotStore) -> bool {
        match self.try_save(store) {
            Ok(()) => {
                info!(entries = self.entries.len(), "knowledge base saved");
                true
            }
            Err(e) => {
                error!(error = %e, "failed to save knowledge base");
                false
            }
        }
    }

    fn try_save(&self, store: &dyn SnapshotStore) -> Result<()> {
        let json =
            serde_json::to_string(&self.entries).map_err(|e| SiteKbError::Storage(e.to_string()))?;
        store.set(SNAPSHOT_KEY, &json)
    }

    /// Replace the corpus with the snapshot in `store`.
    ///
    /// Returns `false` both when no snapshot exists and when the stored data
    /// is malformed — the caller cannot tell the two apart (the logs can).
    /// On `false` the current entries are left untouched.
    pub fn load_from_storage(&mut self, store: &dyn SnapshotStore) -> bool {
        let raw = match store.get(SNAPSHOT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("no knowledge base snapshot found");
                return false;
            }
            Err(e) => {
                warn!(error = %e, "failed to read knowledge base snapshot");
                return false;
            }
        };

        match serde_json::from_str::<Vec<Entry>>(&raw) {
            Ok(entries) => {
                info!(entries = entries.len(), "knowledge base loaded from snapshot");
                self.entries = entries;
                true
            }
            Err(e) => {
                warn!(error = %e, "knowledge base snapshot is malformed");
                false
            }
        }
    }
}
