//! Pagination discovery for directory listings.
//!
//! Given a seed URL, produce the ordered list of pages that probably belong
//! to the same listing. Structural signals from the seed page come first
//! (pager widgets, "next" links, numeric paths), followed by unvalidated
//! page-number guesses. Bad guesses are filtered later by the content gate
//! or by yielding no records.

mod patterns;
mod structural;
pub mod url_utils;

use std::collections::HashSet;
use std::fmt;

use scraper::Html;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::http_client::{FetchError, PageFetcher};

use url_utils::same_origin;

/// Hard limit on the number of candidate pages, seed included.
pub const MAX_CANDIDATES: usize = 20;

/// Error type for discovery operations.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("Invalid seed URL {url}: {reason}")]
    InvalidSeed { url: String, reason: String },

    #[error("Failed to fetch seed page: {0}")]
    Fetch(#[from] FetchError),
}

/// How a candidate page was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryMethod {
    /// The URL the run started from.
    Seed,
    /// Link inside a pager container.
    PaginationWidget,
    /// Anchor labelled "next" or with a right chevron.
    NextLink,
    /// Link whose path ends in a page number.
    NumericPath,
    /// Generated page-number URL, never checked before queueing.
    PatternGuess,
}

impl DiscoveryMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Seed => "seed",
            Self::PaginationWidget => "pagination_widget",
            Self::NextLink => "next_link",
            Self::NumericPath => "numeric_path",
            Self::PatternGuess => "pattern_guess",
        }
    }
}

impl fmt::Display for DiscoveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A page queued for fetching, with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageCandidate {
    pub url: String,
    pub method: DiscoveryMethod,
}

impl PageCandidate {
    pub fn new(url: impl Into<String>, method: DiscoveryMethod) -> Self {
        Self {
            url: url.into(),
            method,
        }
    }
}

/// Ordered, deduplicated, same-origin candidate accumulator.
struct CandidateList {
    origin: Url,
    limit: usize,
    seen: HashSet<String>,
    candidates: Vec<PageCandidate>,
}

impl CandidateList {
    fn new(seed_raw: &str, seed: &Url, limit: usize) -> Self {
        let limit = limit.clamp(1, MAX_CANDIDATES);
        let mut seen = HashSet::new();
        seen.insert(seed_raw.to_string());
        seen.insert(seed.as_str().to_string());
        // Discovered links never carry fragments.
        let mut bare = seed.clone();
        bare.set_fragment(None);
        seen.insert(String::from(bare));
        Self {
            origin: seed.clone(),
            limit,
            seen,
            candidates: vec![PageCandidate::new(seed_raw, DiscoveryMethod::Seed)],
        }
    }

    fn is_full(&self) -> bool {
        self.candidates.len() >= self.limit
    }

    /// Add a URL unless it is a duplicate, off-origin, or the list is full.
    fn push(&mut self, url: Url, method: DiscoveryMethod) -> bool {
        if self.is_full() || !same_origin(&self.origin, &url) {
            return false;
        }
        let url = String::from(url);
        if !self.seen.insert(url.clone()) {
            return false;
        }
        self.candidates.push(PageCandidate::new(url, method));
        true
    }

    fn extend(&mut self, urls: impl IntoIterator<Item = Url>, method: DiscoveryMethod) -> usize {
        let mut added = 0;
        for url in urls {
            if self.is_full() {
                break;
            }
            if self.push(url, method) {
                added += 1;
            }
        }
        added
    }

    fn into_vec(self) -> Vec<PageCandidate> {
        self.candidates
    }
}

/// The degraded discovery result: just the seed.
pub fn seed_only(seed_url: &str) -> Vec<PageCandidate> {
    vec![PageCandidate::new(seed_url, DiscoveryMethod::Seed)]
}

/// Build the candidate list from an already-fetched seed page.
///
/// Pure: the same seed and HTML always give the same list. The first entry
/// is always `seed_raw` itself and the list never exceeds `max_pages`
/// (itself capped at [`MAX_CANDIDATES`]).
pub fn discover_from_html(
    seed_raw: &str,
    seed: &Url,
    html: &str,
    max_pages: usize,
) -> Vec<PageCandidate> {
    let mut list = CandidateList::new(seed_raw, seed, max_pages);
    let document = Html::parse_document(html);

    let widget = list.extend(
        structural::pagination_links(&document, seed),
        DiscoveryMethod::PaginationWidget,
    );
    let next = list.extend(
        structural::next_links(&document, seed),
        DiscoveryMethod::NextLink,
    );

    // First numeric link, then its template guesses, then the other numeric links.
    let mut numeric_links = structural::numeric_links(&document, seed).into_iter();
    let (mut numeric, mut templated) = (0, 0);
    if let Some(first) = numeric_links.next() {
        let template = structural::numeric_template_guesses(&first);
        numeric += list.extend([first], DiscoveryMethod::NumericPath);
        templated += list.extend(template, DiscoveryMethod::PatternGuess);
    }
    numeric += list.extend(numeric_links, DiscoveryMethod::NumericPath);

    let guessed = list.extend(patterns::page_guesses(seed), DiscoveryMethod::PatternGuess);

    debug!(
        "Discovery for {}: {} widget, {} next, {} numeric, {} templated, {} guessed",
        seed_raw, widget, next, numeric, templated, guessed
    );

    list.into_vec()
}

/// Fetch the seed page and run discovery over it.
pub async fn try_discover<F>(
    fetcher: &F,
    seed_url: &str,
    max_pages: usize,
) -> Result<Vec<PageCandidate>, DiscoveryError>
where
    F: PageFetcher + ?Sized,
{
    let seed = Url::parse(seed_url).map_err(|e| DiscoveryError::InvalidSeed {
        url: seed_url.to_string(),
        reason: e.to_string(),
    })?;
    let html = fetcher.fetch(seed_url).await?;
    Ok(discover_from_html(seed_url, &seed, &html, max_pages))
}

/// Discover candidate pages, falling back to the seed alone on any failure.
pub async fn discover<F>(fetcher: &F, seed_url: &str, max_pages: usize) -> Vec<PageCandidate>
where
    F: PageFetcher + ?Sized,
{
    match try_discover(fetcher, seed_url, max_pages).await {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!("Pagination discovery failed for {}: {}", seed_url, e);
            seed_only(seed_url)
        }
    }
}
