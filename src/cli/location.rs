//! The `location` command.

use dirscrape::config::Settings;
use dirscrape::llm::LlmClient;
use dirscrape::location::extract_location;
use dirscrape::pipeline::build_fetcher;

use super::helpers::{spinner, warning};

pub async fn cmd_location(
    settings: &Settings,
    url: &str,
    api_key: Option<&str>,
) -> anyhow::Result<()> {
    let fetcher = build_fetcher(settings)?;
    let client = LlmClient::new(settings.llm.clone().with_api_key(api_key))?;

    let pb = spinner(format!("Finding location for {}...", url))?;
    let location = extract_location(fetcher.as_ref(), &client, url).await;
    pb.finish_and_clear();

    match location? {
        Some(location) => println!("{}", location),
        None => {
            eprintln!("{} Could not determine a location", warning());
            println!("unknown");
        }
    }
    Ok(())
}
