//! dirscrape - business directory scraping.
//!
//! Given one listing page of an online business directory, find the other
//! pages of the same listing, pull their text, and have a language model turn
//! it into structured business records.

#[cfg(feature = "browser")]
pub mod browser;
pub mod config;
pub mod discovery;
pub mod export;
pub mod extract;
pub mod http_client;
pub mod llm;
pub mod location;
pub mod normalize;
pub mod pipeline;

pub use config::Settings;
pub use discovery::{DiscoveryMethod, PageCandidate};
pub use extract::BusinessRecord;
pub use pipeline::{scrape_directory, ScrapeOutcome, ScrapeReport, ScrapeRequest, Scraper};
