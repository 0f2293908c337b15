//! The scrape run.
//!
//! Discovery produces the candidate pages; each page is then fetched,
//! gated, and extracted in order, and its records merged into a
//! deduplicated, budgeted result set. Nothing that happens to a single page
//! aborts the run.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::discovery::{self, DiscoveryMethod, PageCandidate, MAX_CANDIDATES};
use crate::extract::{BusinessRecord, DedupKey, RecordExtractor};
use crate::http_client::{FetchError, HttpClient, PageFetcher};
use crate::llm::{Completion, LlmClient, LlmError, DEFAULT_MAX_CONTENT_CHARS};
use crate::normalize::{ContentGate, PageText};

/// Degraded result when no page ever reached the extraction step.
pub const NO_DATA_PLACEHOLDER: &str = "No data extracted.";

/// Degraded result when the most recent extraction call failed.
pub const EXTRACTION_ERROR_TEXT: &str = "Error extracting data from page.";

/// Default record budget.
pub const DEFAULT_MAX_RECORDS: usize = 20;

/// Failures building the pipeline, before any page is touched.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] FetchError),

    #[error("Failed to build completion client: {0}")]
    Llm(#[from] LlmError),
}

/// Ordered unique records, never longer than its budget.
#[derive(Debug, Clone)]
pub struct ResultSet {
    max_records: usize,
    seen: HashSet<DedupKey>,
    records: Vec<BusinessRecord>,
}

impl ResultSet {
    /// A budget of zero is treated as one.
    pub fn new(max_records: usize) -> Self {
        Self {
            max_records: max_records.max(1),
            seen: HashSet::new(),
            records: Vec::new(),
        }
    }

    pub fn max_records(&self) -> usize {
        self.max_records
    }

    /// Add a record unless it is a duplicate or the budget is spent.
    pub fn insert(&mut self, record: BusinessRecord) -> bool {
        if self.is_full() || !self.seen.insert(record.dedup_key()) {
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn is_full(&self) -> bool {
        self.records.len() >= self.max_records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[BusinessRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<BusinessRecord> {
        self.records
    }
}

/// What happened to one candidate page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PageOutcome {
    /// The model answered. `parsed` array elements, `valid` after
    /// validation, `added` new to the result set.
    Records {
        parsed: usize,
        valid: usize,
        added: usize,
    },
    /// Too little text to be worth a model call.
    Skipped { chars: usize },
    /// Fetch or model call failed.
    Failed { reason: String },
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Records {
                parsed,
                valid,
                added,
            } => write!(f, "{parsed} parsed, {valid} valid, {added} new"),
            Self::Skipped { chars } => write!(f, "skipped ({chars} chars of text)"),
            Self::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageReport {
    pub url: String,
    pub method: DiscoveryMethod,
    pub outcome: PageOutcome,
}

/// Final result of a run: records, or the degraded raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeOutcome {
    Records(Vec<BusinessRecord>),
    /// Text of the most recent extraction attempt (the raw model response,
    /// or [`EXTRACTION_ERROR_TEXT`] when that call failed), or
    /// [`NO_DATA_PLACEHOLDER`] when no page reached extraction.
    Degraded(String),
}

impl ScrapeOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }

    pub fn records(&self) -> Option<&[BusinessRecord]> {
        match self {
            Self::Records(records) => Some(records),
            Self::Degraded(_) => None,
        }
    }
}

/// Everything a run did, page by page.
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    pub seed_url: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Candidates produced by discovery; pages after the budget was met are
    /// listed here but have no [`PageReport`].
    pub candidates: Vec<PageCandidate>,
    pub pages: Vec<PageReport>,
    pub outcome: ScrapeOutcome,
}

impl ScrapeReport {
    fn count(&self, pred: impl Fn(&PageOutcome) -> bool) -> usize {
        self.pages.iter().filter(|p| pred(&p.outcome)).count()
    }

    pub fn pages_extracted(&self) -> usize {
        self.count(|o| matches!(o, PageOutcome::Records { .. }))
    }

    pub fn pages_skipped(&self) -> usize {
        self.count(|o| matches!(o, PageOutcome::Skipped { .. }))
    }

    pub fn pages_failed(&self) -> usize {
        self.count(|o| matches!(o, PageOutcome::Failed { .. }))
    }

    pub fn pages_not_visited(&self) -> usize {
        self.candidates.len().saturating_sub(self.pages.len())
    }

    pub fn record_count(&self) -> usize {
        self.outcome.records().map_or(0, |r| r.len())
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    pub fn log_summary(&self) {
        info!(
            "Scrape of {} finished in {}s: {} records; {} pages extracted, {} skipped, {} failed, {} not visited",
            self.seed_url,
            self.elapsed().num_seconds(),
            self.record_count(),
            self.pages_extracted(),
            self.pages_skipped(),
            self.pages_failed(),
            self.pages_not_visited()
        );
    }
}

/// Inbound parameters for one run.
#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    pub url: String,
    pub max_records: usize,
    /// Overrides the configured completion API key for this run.
    pub api_key: Option<String>,
}

impl ScrapeRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_records: DEFAULT_MAX_RECORDS,
            api_key: None,
        }
    }

    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = max_records;
        self
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }
}

/// Progress notifications for interactive callers.
#[derive(Debug)]
pub enum ScrapeProgress<'a> {
    Discovered {
        candidates: usize,
    },
    Page {
        index: usize,
        total: usize,
        report: &'a PageReport,
        collected: usize,
    },
}

/// Sequential page pipeline over a fetcher and a completion service.
pub struct Scraper<F, C> {
    fetcher: F,
    extractor: RecordExtractor<C>,
    gate: ContentGate,
    max_pages: usize,
}

/// Scraper over the runtime-selected transports.
pub type DynScraper = Scraper<Arc<dyn PageFetcher>, Arc<dyn Completion>>;

impl<F: PageFetcher, C: Completion> Scraper<F, C> {
    pub fn new(fetcher: F, completion: C) -> Self {
        Self {
            fetcher,
            extractor: RecordExtractor::new(completion, DEFAULT_MAX_CONTENT_CHARS),
            gate: ContentGate::default(),
            max_pages: MAX_CANDIDATES,
        }
    }

    pub fn with_gate(mut self, gate: ContentGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.clamp(1, MAX_CANDIDATES);
        self
    }

    pub fn with_max_content_chars(mut self, max_content_chars: usize) -> Self {
        self.extractor = self.extractor.with_max_content_chars(max_content_chars);
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn completion(&self) -> &C {
        self.extractor.completion()
    }

    /// Candidate pages for a seed URL; falls back to the seed alone.
    pub async fn discover(&self, seed_url: &str) -> Vec<PageCandidate> {
        discovery::discover(&self.fetcher, seed_url, self.max_pages).await
    }

    pub async fn run(&self, request: &ScrapeRequest) -> ScrapeReport {
        self.run_with_progress(request, |_| {}).await
    }

    /// Discover pages for the request's URL and scrape them.
    pub async fn run_with_progress<P>(&self, request: &ScrapeRequest, mut progress: P) -> ScrapeReport
    where
        P: FnMut(ScrapeProgress<'_>),
    {
        let started_at = Utc::now();
        let candidates = self.discover(&request.url).await;
        info!("Found {} pages to scrape", candidates.len());
        progress(ScrapeProgress::Discovered {
            candidates: candidates.len(),
        });

        let mut report = self
            .scrape_candidates(candidates, request.max_records, progress)
            .await;
        report.seed_url = request.url.clone();
        report.started_at = started_at;
        report
    }

    /// Scrape an explicit candidate list in order.
    pub async fn scrape_candidates<P>(
        &self,
        candidates: Vec<PageCandidate>,
        max_records: usize,
        mut progress: P,
    ) -> ScrapeReport
    where
        P: FnMut(ScrapeProgress<'_>),
    {
        let started_at = Utc::now();
        let seed_url = candidates
            .first()
            .map(|c| c.url.clone())
            .unwrap_or_default();

        let mut results = ResultSet::new(max_records);
        let mut last_raw: Option<String> = None;
        let mut pages = Vec::with_capacity(candidates.len());

        for (index, candidate) in candidates.iter().enumerate() {
            if results.is_full() {
                debug!(
                    "Budget of {} records reached, skipping remaining {} pages",
                    results.max_records(),
                    candidates.len() - index
                );
                break;
            }

            let outcome = self
                .process_page(&candidate.url, &mut results, &mut last_raw)
                .await;
            pages.push(PageReport {
                url: candidate.url.clone(),
                method: candidate.method,
                outcome,
            });

            if let Some(report) = pages.last() {
                progress(ScrapeProgress::Page {
                    index,
                    total: candidates.len(),
                    report,
                    collected: results.len(),
                });
            }
        }

        let outcome = if results.is_empty() {
            info!("No records extracted, returning raw text");
            ScrapeOutcome::Degraded(last_raw.unwrap_or_else(|| NO_DATA_PLACEHOLDER.to_string()))
        } else {
            ScrapeOutcome::Records(results.into_records())
        };

        let report = ScrapeReport {
            seed_url,
            started_at,
            finished_at: Utc::now(),
            candidates,
            pages,
            outcome,
        };
        report.log_summary();
        report
    }

    async fn process_page(
        &self,
        url: &str,
        results: &mut ResultSet,
        last_raw: &mut Option<String>,
    ) -> PageOutcome {
        let html = match self.fetcher.fetch(url).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Failed to load {}: {}", url, e);
                return PageOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        let text = match self.gate.normalize(&html) {
            PageText::Accepted(text) => text,
            PageText::TooThin { chars } => {
                debug!(
                    "Skipping {}: {} chars of text (minimum {})",
                    url,
                    chars,
                    self.gate.min_chars()
                );
                return PageOutcome::Skipped { chars };
            }
        };

        let attempt = match self.extractor.extract(&text).await {
            Ok(attempt) => attempt,
            Err(e) => {
                warn!("Extraction failed for {}: {}", url, e);
                *last_raw = Some(EXTRACTION_ERROR_TEXT.to_string());
                return PageOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        let parsed = attempt.parsed;
        let valid = attempt.records.len();
        let mut added = 0;
        for record in attempt.records {
            if results.is_full() {
                break;
            }
            if results.insert(record) {
                added += 1;
            }
        }
        *last_raw = Some(attempt.raw);

        info!(
            "Loaded page: {}, records extracted: {}, total unique: {}",
            url,
            valid,
            results.len()
        );
        PageOutcome::Records {
            parsed,
            valid,
            added,
        }
    }
}

impl DynScraper {
    /// Build the HTTP (and optional browser) fetcher and the completion
    /// client from settings. `api_key` replaces the configured key.
    pub fn from_settings(settings: &Settings, api_key: Option<&str>) -> Result<Self, SetupError> {
        let fetcher = build_fetcher(settings)?;
        let llm_config = settings.llm.clone().with_api_key(api_key);
        let max_content_chars = llm_config.max_content_chars;
        let completion: Arc<dyn Completion> = Arc::new(LlmClient::new(llm_config)?);

        Ok(Scraper::new(fetcher, completion)
            .with_gate(ContentGate::new(settings.scrape.min_content_chars))
            .with_max_pages(settings.scrape.max_pages)
            .with_max_content_chars(max_content_chars))
    }
}

/// Plain HTTP, with the headless browser behind it when enabled.
pub fn build_fetcher(settings: &Settings) -> Result<Arc<dyn PageFetcher>, SetupError> {
    let http = HttpClient::new(
        settings.scrape.timeout(),
        settings.scrape.user_agent.as_deref(),
    )?;

    if settings.browser.enabled {
        #[cfg(feature = "browser")]
        {
            let browser =
                crate::browser::BrowserFetcher::new(settings.browser.clone(), http.user_agent());
            return Ok(Arc::new(crate::http_client::FallbackFetcher::new(
                http, browser,
            )));
        }
        #[cfg(not(feature = "browser"))]
        warn!("Browser fallback is enabled in config but this build lacks the browser feature");
    }

    Ok(Arc::new(http))
}

/// Run a complete scrape from settings: the library entry point.
pub async fn scrape_directory(
    settings: &Settings,
    request: &ScrapeRequest,
) -> Result<ScrapeReport, SetupError> {
    let scraper = DynScraper::from_settings(settings, request.api_key.as_deref())?;
    Ok(scraper.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    /// Serves fixed HTML per URL; unknown URLs are 404s.
    #[derive(Default)]
    struct SiteFake {
        pages: HashMap<String, String>,
        requests: Mutex<Vec<String>>,
    }

    impl SiteFake {
        fn page(mut self, url: &str, html: String) -> Self {
            self.pages.insert(url.to_string(), html);
            self
        }

        fn requested(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for SiteFake {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    /// Answers each completion call with the next scripted reply.
    struct ScriptedModel {
        replies: Mutex<VecDeque<Result<String, String>>>,
        calls: Mutex<usize>,
    }

    impl ScriptedModel {
        fn new(replies: Vec<Result<&str, &str>>) -> Self {
            Self {
                replies: Mutex::new(
                    replies
                        .into_iter()
                        .map(|r| r.map(str::to_string).map_err(str::to_string))
                        .collect(),
                ),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl Completion for ScriptedModel {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            *self.calls.lock().unwrap() += 1;
            match self.replies.lock().unwrap().pop_front() {
                Some(Ok(reply)) => Ok(reply),
                Some(Err(e)) => Err(LlmError::Api(e)),
                None => Err(LlmError::Api("no scripted reply".to_string())),
            }
        }
    }

    fn listing_page(title: &str) -> String {
        format!(
            "<html><body><h1>{}</h1><p>{}</p></body></html>",
            title,
            "Trusted local businesses serving the area. ".repeat(20)
        )
    }

    fn candidates(urls: &[&str]) -> Vec<PageCandidate> {
        urls.iter()
            .enumerate()
            .map(|(i, url)| {
                let method = if i == 0 {
                    DiscoveryMethod::Seed
                } else {
                    DiscoveryMethod::PatternGuess
                };
                PageCandidate::new(*url, method)
            })
            .collect()
    }

    fn names(outcome: &ScrapeOutcome) -> Vec<&str> {
        outcome
            .records()
            .unwrap_or_default()
            .iter()
            .map(|r| r.name.as_str())
            .collect()
    }

    const P1: &str = "https://dir.example.com/plumbers";
    const P2: &str = "https://dir.example.com/plumbers?page=2";
    const P3: &str = "https://dir.example.com/plumbers?page=3";

    #[test]
    fn result_set_dedups_and_respects_budget() {
        let record = |name: &str| BusinessRecord {
            name: name.to_string(),
            address: Some("1 Main St".to_string()),
            phone: None,
            email: None,
            services: None,
            website_url: None,
        };
        let mut set = ResultSet::new(2);
        assert!(set.insert(record("Acme")));
        assert!(!set.insert(record("Acme")));
        assert!(!set.insert(record(" ACME ")));
        assert!(set.insert(record("Best Bakery")));
        assert!(set.is_full());
        assert!(!set.insert(record("Corner Cafe")));
        assert_eq!(set.len(), 2);

        assert_eq!(ResultSet::new(0).max_records(), 1);
    }

    #[tokio::test]
    async fn first_seen_duplicate_wins_across_pages() {
        let site = SiteFake::default()
            .page(P1, listing_page("Page 1"))
            .page(P2, listing_page("Page 2"));
        let model = ScriptedModel::new(vec![
            Ok(r#"[{"name": "Acme Plumbing", "address": "123 Main St", "phone": "555-0100"}]"#),
            Ok(r#"[{"name": "acme plumbing ", "address": "123 MAIN ST", "phone": "555-0199"},
                   {"name": "Best Bakery", "address": "9 Elm St"}]"#),
        ]);
        let scraper = Scraper::new(site, model);

        let report = scraper
            .scrape_candidates(candidates(&[P1, P2]), 20, |_| {})
            .await;

        let records = report.outcome.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].phone.as_deref(), Some("555-0100"));
        assert_eq!(records[1].name, "Best Bakery");
        assert_eq!(
            report.pages[1].outcome,
            PageOutcome::Records {
                parsed: 2,
                valid: 2,
                added: 1
            }
        );
    }

    #[tokio::test]
    async fn same_record_twice_in_one_reply_is_kept_once() {
        let site = SiteFake::default().page(P1, listing_page("Page 1"));
        let model = ScriptedModel::new(vec![Ok(
            r#"[{"name": "Acme Plumbing"}, {"name": "Acme Plumbing"}]"#,
        )]);
        let report = Scraper::new(site, model)
            .scrape_candidates(candidates(&[P1]), 20, |_| {})
            .await;
        assert_eq!(names(&report.outcome), vec!["Acme Plumbing"]);
    }

    #[tokio::test]
    async fn budget_stops_page_processing() {
        let site = SiteFake::default()
            .page(P1, listing_page("Page 1"))
            .page(P2, listing_page("Page 2"));
        let model = ScriptedModel::new(vec![Ok(
            r#"[{"name": "A"}, {"name": "B"}, {"name": "C"}]"#,
        )]);
        let scraper = Scraper::new(site, model);

        let report = scraper
            .scrape_candidates(candidates(&[P1, P2, P3]), 2, |_| {})
            .await;

        assert_eq!(names(&report.outcome), vec!["A", "B"]);
        assert_eq!(scraper.completion().calls(), 1);
        assert_eq!(scraper.fetcher().requested(), vec![P1.to_string()]);
        assert_eq!(report.pages.len(), 1);
        assert_eq!(report.pages_not_visited(), 2);
    }

    #[tokio::test]
    async fn blank_names_never_reach_results() {
        let site = SiteFake::default().page(P1, listing_page("Page 1"));
        let model = ScriptedModel::new(vec![Ok(
            r#"[{"name": "  ", "phone": "555-0100", "address": "1 Main"},
                {"phone": "555-0101"},
                {"name": "Real Shop"}]"#,
        )]);
        let report = Scraper::new(site, model)
            .scrape_candidates(candidates(&[P1]), 20, |_| {})
            .await;
        assert_eq!(names(&report.outcome), vec!["Real Shop"]);
    }

    #[tokio::test]
    async fn thin_pages_give_placeholder() {
        let site = SiteFake::default()
            .page(P1, "<p>Coming soon</p>".to_string())
            .page(P2, "<p>Nothing here</p>".to_string());
        let scraper = Scraper::new(site, ScriptedModel::new(vec![]));

        let report = scraper
            .scrape_candidates(candidates(&[P1, P2]), 20, |_| {})
            .await;

        assert_eq!(
            report.outcome,
            ScrapeOutcome::Degraded(NO_DATA_PLACEHOLDER.to_string())
        );
        assert_eq!(report.pages_skipped(), 2);
        assert_eq!(scraper.completion().calls(), 0);
    }

    #[tokio::test]
    async fn degraded_result_is_last_raw_reply() {
        let site = SiteFake::default()
            .page(P1, listing_page("Page 1"))
            .page(P2, listing_page("Page 2"))
            .page(P3, listing_page("Page 3"));
        let model = ScriptedModel::new(vec![
            Err("503 from upstream"),
            Ok("I could not find any businesses."),
            Ok("Still nothing useful here."),
        ]);
        let report = Scraper::new(site, model)
            .scrape_candidates(candidates(&[P1, P2, P3]), 20, |_| {})
            .await;

        assert_eq!(
            report.outcome,
            ScrapeOutcome::Degraded("Still nothing useful here.".to_string())
        );
        assert!(matches!(
            report.pages[0].outcome,
            PageOutcome::Failed { .. }
        ));
    }

    #[tokio::test]
    async fn model_error_after_unparseable_reply_gives_error_text() {
        let site = SiteFake::default()
            .page(P1, listing_page("Page 1"))
            .page(P2, listing_page("Page 2"));
        let model = ScriptedModel::new(vec![
            Ok("I could not find any businesses."),
            Err("503 from upstream"),
        ]);
        let report = Scraper::new(site, model)
            .scrape_candidates(candidates(&[P1, P2]), 20, |_| {})
            .await;

        assert_eq!(
            report.outcome,
            ScrapeOutcome::Degraded(EXTRACTION_ERROR_TEXT.to_string())
        );
        assert!(matches!(
            report.pages[1].outcome,
            PageOutcome::Failed { .. }
        ));
    }

    #[tokio::test]
    async fn fetch_failure_does_not_count_as_extraction_error() {
        let site = SiteFake::default().page(P1, listing_page("Page 1"));
        let model = ScriptedModel::new(vec![Ok("Nothing to list.")]);
        let report = Scraper::new(site, model)
            .scrape_candidates(candidates(&[P1, P2]), 20, |_| {})
            .await;

        assert_eq!(
            report.outcome,
            ScrapeOutcome::Degraded("Nothing to list.".to_string())
        );
    }

    #[tokio::test]
    async fn failed_fetch_skips_to_next_page() {
        let site = SiteFake::default().page(P2, listing_page("Page 2"));
        let model = ScriptedModel::new(vec![Ok(r#"[{"name": "Acme Plumbing"}]"#)]);
        let report = Scraper::new(site, model)
            .scrape_candidates(candidates(&[P1, P2]), 20, |_| {})
            .await;

        assert_eq!(names(&report.outcome), vec!["Acme Plumbing"]);
        assert_eq!(report.pages_failed(), 1);
        assert_eq!(report.pages_extracted(), 1);
    }

    #[tokio::test]
    async fn model_failure_everywhere_gives_error_text() {
        let site = SiteFake::default().page(P1, listing_page("Page 1"));
        let model = ScriptedModel::new(vec![Err("invalid api key")]);
        let report = Scraper::new(site, model)
            .scrape_candidates(candidates(&[P1]), 20, |_| {})
            .await;
        assert_eq!(
            report.outcome,
            ScrapeOutcome::Degraded(EXTRACTION_ERROR_TEXT.to_string())
        );
    }

    #[tokio::test]
    async fn progress_reports_each_visited_page() {
        let site = SiteFake::default().page(P1, listing_page("Page 1"));
        let model = ScriptedModel::new(vec![Ok(r#"[{"name": "Acme"}]"#)]);
        let mut seen = Vec::new();
        Scraper::new(site, model)
            .scrape_candidates(candidates(&[P1, P2]), 20, |event| {
                if let ScrapeProgress::Page {
                    index, collected, ..
                } = event
                {
                    seen.push((index, collected));
                }
            })
            .await;
        assert_eq!(seen, vec![(0, 1), (1, 1)]);
    }

    #[tokio::test]
    async fn run_discovers_from_seed() {
        let seed_html = format!(
            r#"<html><body><div class="pagination"><a href="?page=2">2</a></div>{}</body></html>"#,
            listing_page("Page 1")
        );
        let site = SiteFake::default()
            .page(P1, seed_html)
            .page(P2, listing_page("Page 2"));
        let model = ScriptedModel::new(vec![
            Ok(r#"[{"name": "Acme"}]"#),
            Ok(r#"[{"name": "Best Bakery"}]"#),
        ]);
        let scraper = Scraper::new(site, model).with_max_pages(3);

        let report = scraper.run(&ScrapeRequest::new(P1)).await;

        assert_eq!(report.seed_url, P1);
        assert_eq!(report.candidates.len(), 3);
        assert_eq!(report.candidates[1].url, P2);
        assert_eq!(report.candidates[1].method, DiscoveryMethod::PaginationWidget);
        assert_eq!(names(&report.outcome), vec!["Acme", "Best Bakery"]);
        // Third candidate is an unvalidated guess that 404s.
        assert_eq!(report.pages_failed(), 1);
    }
}
