//! The `discover` command.

use console::style;

use dirscrape::config::Settings;
use dirscrape::discovery;
use dirscrape::pipeline::build_fetcher;

use super::helpers::{spinner, warning};

pub async fn cmd_discover(settings: &Settings, url: &str, json: bool) -> anyhow::Result<()> {
    let fetcher = build_fetcher(settings)?;

    let pb = spinner(format!("Discovering pages from {}...", url))?;
    let result = discovery::try_discover(fetcher.as_ref(), url, settings.scrape.max_pages).await;
    pb.finish_and_clear();

    let candidates = match result {
        Ok(candidates) => candidates,
        Err(e) => {
            eprintln!("{} {}; only the seed would be scraped", warning(), e);
            discovery::seed_only(url)
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&candidates)?);
        return Ok(());
    }

    println!("\n{}", style("Candidate pages").bold());
    println!("{}", "-".repeat(80));
    for (i, candidate) in candidates.iter().enumerate() {
        println!(
            "{:>3}. {:<18} {}",
            i + 1,
            candidate.method.as_str(),
            candidate.url
        );
    }
    println!("\n{} pages", candidates.len());

    Ok(())
}
