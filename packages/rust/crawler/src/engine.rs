//! Scope-aware crawl engine for a single organization's website.
//!
//! Traversal is an explicit work list driven depth-first: a page's links are
//! followed to completion before its next sibling, exactly as a sequential
//! awaited recursion would, but without recursion-depth limits. Every fetch
//! or parse failure is page-local — the build always completes and yields
//! whatever the quotas and encountered failures allow.

use std::collections::HashSet;
use std::time::Duration;

use reqwest::Client;
use scraper::Html;
use tracing::{debug, info, instrument, warn};
use url::Url;

use sitekb_shared::{CrawlOptions, Entry, Result, SiteKbError};

use crate::classify::{HeuristicClassifier, PageClassifier};
use crate::links::extract_links;
use crate::scope::PatternFilter;

/// User-Agent string for crawl requests.
const USER_AGENT: &str = concat!("sitekb/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// CrawlReport
// ---------------------------------------------------------------------------

/// Summary of a completed crawl.
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// URLs that consumed quota, including filtered and failed ones.
    pub pages_visited: usize,
    /// URLs rejected by the pattern filter without a fetch.
    pub pages_filtered: usize,
    /// URLs whose fetch or decode failed.
    pub pages_failed: usize,
    /// Per-page failures encountered (URL, error message).
    pub errors: Vec<(String, String)>,
    /// Total duration of the crawl.
    pub duration: Duration,
}

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

/// Hooks for reporting crawl progress to a frontend.
pub trait CrawlProgress: Send + Sync {
    /// A URL was dequeued and consumed quota.
    fn page_visited(&self, _url: &str, _visited: usize, _max_pages: usize) {}

    /// An entry was extracted and appended.
    fn entry_added(&self, _title: &str, _total: usize) {}
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl CrawlProgress for SilentProgress {}

// ---------------------------------------------------------------------------
// Crawl session
// ---------------------------------------------------------------------------

/// Mutable state owned by a single crawl call.
///
/// The visited set is the only deduplication mechanism: membership is
/// recorded the instant a URL is dequeued, before filtering or fetching, so
/// excluded and failed URLs still consume `max_pages` quota.
struct CrawlSession {
    visited: HashSet<String>,
    entries: Vec<Entry>,
    errors: Vec<(String, String)>,
    pages_filtered: usize,
    pages_failed: usize,
}

impl CrawlSession {
    fn new() -> Self {
        Self {
            visited: HashSet::new(),
            entries: Vec::new(),
            errors: Vec::new(),
            pages_filtered: 0,
            pages_failed: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Crawler
// ---------------------------------------------------------------------------

/// Sequential, scope-aware page crawler.
pub struct Crawler {
    client: Client,
    classifier: Box<dyn PageClassifier>,
}

impl Crawler {
    /// Create a crawler with the default heuristic classifier.
    ///
    /// The HTTP client deliberately carries no request timeout and the
    /// engine never retries: an unresponsive server stalls the build until
    /// the process is cancelled.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| SiteKbError::Fetch(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            classifier: Box::new(HeuristicClassifier),
        })
    }

    /// Replace the page classifier.
    pub fn with_classifier(mut self, classifier: Box<dyn PageClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Crawl from `seed`, returning the report and extracted entries in
    /// visit order.
    #[instrument(skip_all, fields(seed = %seed, classifier = self.classifier.name()))]
    pub async fn crawl(
        &self,
        seed: &Url,
        options: &CrawlOptions,
        progress: &dyn CrawlProgress,
    ) -> Result<(CrawlReport, Vec<Entry>)> {
        let start_time = std::time::Instant::now();

        let filter = PatternFilter::compile(seed, options)?;
        let mut session = CrawlSession::new();

        info!(
            max_depth = options.max_depth,
            max_pages = options.max_pages,
            delay_ms = options.delay_between_requests.as_millis() as u64,
            "starting crawl"
        );

        // Depth-first work list; children are pushed in reverse so siblings
        // pop in page order.
        let mut stack: Vec<(Url, u32)> = vec![(seed.clone(), 0)];

        while let Some((url, depth)) = stack.pop() {
            if session.visited.len() >= options.max_pages {
                debug!(max_pages = options.max_pages, "page quota reached");
                break;
            }
            if depth > options.max_depth {
                continue;
            }
            if !session.visited.insert(normalize_url(&url)) {
                continue;
            }
            progress.page_visited(url.as_str(), session.visited.len(), options.max_pages);

            if !filter.allows(url.as_str()) {
                debug!(%url, "out of scope, skipping");
                session.pages_filtered += 1;
                continue;
            }

            if !options.delay_between_requests.is_zero() {
                tokio::time::sleep(options.delay_between_requests).await;
            }

            let body = match self.fetch(&url).await {
                Ok(body) => body,
                Err(e) => {
                    warn!(%url, error = %e, "page fetch failed, continuing");
                    session.errors.push((url.to_string(), e.to_string()));
                    session.pages_failed += 1;
                    continue;
                }
            };

            let doc = Html::parse_document(&body);
            let record = self.classifier.classify(&doc, &url);
            if !record.title.is_empty() && !record.content.is_empty() {
                let entry = Entry::new(
                    url.as_str(),
                    record.title,
                    record.content,
                    record.category,
                    record.tags,
                );
                progress.entry_added(&entry.title, session.entries.len() + 1);
                session.entries.push(entry);
            }

            if depth < options.max_depth {
                for link in extract_links(&doc, &url, seed).into_iter().rev() {
                    stack.push((link, depth + 1));
                }
            }
        }

        let report = CrawlReport {
            pages_visited: session.visited.len(),
            pages_filtered: session.pages_filtered,
            pages_failed: session.pages_failed,
            errors: session.errors,
            duration: start_time.elapsed(),
        };

        info!(
            pages_visited = report.pages_visited,
            pages_filtered = report.pages_filtered,
            pages_failed = report.pages_failed,
            entries = session.entries.len(),
            duration_ms = report.duration.as_millis() as u64,
            "crawl completed"
        );

        Ok((report, session.entries))
    }

    /// Fetch one page body. Transport errors, non-success statuses, and
    /// undecodable bodies all surface as [`SiteKbError::Fetch`].
    async fn fetch(&self, url: &Url) -> Result<String> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| SiteKbError::Fetch(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SiteKbError::Fetch(format!("{url}: HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| SiteKbError::Fetch(format!("{url}: body read failed: {e}")))
    }
}

/// Normalize a URL for visited-set keying (strip fragment, drop the trailing
/// slash on non-root paths).
fn normalize_url(url: &Url) -> String {
    let mut normalized = url.clone();
    normalized.set_fragment(None);
    let mut s = normalized.to_string();
    if s.ends_with('/') && s.matches('/').count() > 3 {
        s.pop();
    }
    s
}
