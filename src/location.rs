//! Primary city lookup for a directory page.

use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::http_client::{FetchError, PageFetcher};
use crate::llm::{prompts, truncate_content, Completion, LlmError};
use crate::normalize::html_to_text;

/// Characters of page text shown to the model.
const LOCATION_CONTEXT_CHARS: usize = 2000;

/// Query keys checked before fetching, in priority order.
const LOCATION_PARAMS: &[&str] = &["city", "location"];

#[derive(Debug, Error)]
pub enum LocationError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Location named in the URL query, if any.
pub fn location_from_query(url: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    LOCATION_PARAMS.iter().find_map(|param| {
        url.query_pairs()
            .find(|(key, _)| key == *param)
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}

/// Reduce a model reply to a bare place name.
///
/// Keeps the first line up to the first period. Replies that are empty or
/// mention "unknown" mean the model found nothing.
pub fn clean_location_response(reply: &str) -> Option<String> {
    let first_line = reply.lines().next().unwrap_or_default();
    let location = first_line.split('.').next().unwrap_or_default().trim();
    if location.is_empty() || location.to_lowercase().contains("unknown") {
        None
    } else {
        Some(location.to_string())
    }
}

/// Find the primary city a directory page covers.
///
/// The URL query wins when it names a city; otherwise the page is fetched
/// and the model asked. `Ok(None)` means no location could be determined.
pub async fn extract_location<F, C>(
    fetcher: &F,
    completion: &C,
    url: &str,
) -> Result<Option<String>, LocationError>
where
    F: PageFetcher + ?Sized,
    C: Completion + ?Sized,
{
    if let Some(location) = location_from_query(url) {
        debug!("Location for {} taken from query: {}", url, location);
        return Ok(Some(location));
    }

    let html = fetcher.fetch(url).await?;
    let text = html_to_text(&html);
    let prompt = prompts::render(
        prompts::LOCATION_PROMPT,
        truncate_content(&text, LOCATION_CONTEXT_CHARS),
    );
    let reply = completion.complete(&prompt).await?;
    Ok(clean_location_response(&reply))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Page(&'static str);

    #[async_trait]
    impl PageFetcher for Page {
        async fn fetch(&self, _url: &str) -> Result<String, FetchError> {
            Ok(self.0.to_string())
        }
    }

    struct Reply(&'static str);

    #[async_trait]
    impl Completion for Reply {
        async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
            assert!(prompt.contains("primary city"));
            Ok(self.0.to_string())
        }
    }

    struct Unreachable;

    #[async_trait]
    impl Completion for Unreachable {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            Err(LlmError::Connection("should not be called".to_string()))
        }
    }

    #[test]
    fn test_clean_response() {
        assert_eq!(clean_location_response("Austin"), Some("Austin".to_string()));
        assert_eq!(
            clean_location_response("  Austin, TX. It is in Texas.\nMore"),
            Some("Austin, TX".to_string())
        );
        assert_eq!(clean_location_response("unknown"), None);
        assert_eq!(clean_location_response("Unknown."), None);
        assert_eq!(clean_location_response(""), None);
        assert_eq!(clean_location_response("   \n"), None);
    }

    #[test]
    fn test_query_params() {
        assert_eq!(
            location_from_query("https://dir.example.com/search?city=Denver&location=CO"),
            Some("Denver".to_string())
        );
        assert_eq!(
            location_from_query("https://dir.example.com/search?location=San%20Diego"),
            Some("San Diego".to_string())
        );
        assert_eq!(location_from_query("https://dir.example.com/search?city="), None);
        assert_eq!(location_from_query("https://dir.example.com/search"), None);
    }

    #[tokio::test]
    async fn test_query_short_circuits_model() {
        let location = extract_location(
            &Page("<p>ignored</p>"),
            &Unreachable,
            "https://dir.example.com/?city=Boise",
        )
        .await
        .unwrap();
        assert_eq!(location.as_deref(), Some("Boise"));
    }

    #[tokio::test]
    async fn test_model_reply_is_cleaned() {
        let page = Page("<h1>Best plumbers in Portland</h1>");
        let location = extract_location(&page, &Reply("Portland."), "https://dir.example.com/")
            .await
            .unwrap();
        assert_eq!(location.as_deref(), Some("Portland"));

        let location = extract_location(&page, &Reply("unknown"), "https://dir.example.com/")
            .await
            .unwrap();
        assert_eq!(location, None);
    }
}
