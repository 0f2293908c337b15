//! Pagination signals read from the seed page's markup.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::url_utils::{resolve_href, trimmed_path, with_path};

/// Pager containers, most specific first. Only the first match of each is used.
const PAGINATION_SELECTORS: &[&str] = &[
    "div.pagination",
    "div.pager",
    "nav.pagination",
    "ul.pagination",
    ".pagination",
    ".pager",
    "div.page-numbers",
    "nav.page-navigation",
];

/// Highest page number synthesized from a numeric path template.
const LAST_TEMPLATE_PAGE: u32 = 20;

static NEXT_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bnext\b|[>›»→]").expect("valid regex"));

static NUMERIC_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\d+/?$").expect("valid regex"));

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));

fn anchors(document: &Html) -> impl Iterator<Item = ElementRef<'_>> + '_ {
    document.select(&ANCHOR)
}

/// Every link inside the first element matching each pager selector.
pub(super) fn pagination_links(document: &Html, base: &Url) -> Vec<Url> {
    let mut links = Vec::new();
    for selector_str in PAGINATION_SELECTORS {
        let selector = match Selector::parse(selector_str) {
            Ok(s) => s,
            Err(_) => continue,
        };
        let Some(container) = document.select(&selector).next() else {
            continue;
        };
        for anchor in container.select(&ANCHOR) {
            if let Some(url) = anchor.value().attr("href").and_then(|h| resolve_href(base, h)) {
                links.push(url);
            }
        }
    }
    links
}

/// Anchors labelled "next" or carrying a right chevron.
pub(super) fn next_links(document: &Html, base: &Url) -> Vec<Url> {
    anchors(document)
        .filter(|anchor| {
            let text: String = anchor.text().collect();
            NEXT_TEXT.is_match(text.trim())
        })
        .filter_map(|anchor| resolve_href(base, anchor.value().attr("href")?))
        .collect()
}

/// Links whose path ends in a number, like `/plumbers/3` or `/plumbers/3/`.
pub(super) fn numeric_links(document: &Html, base: &Url) -> Vec<Url> {
    anchors(document)
        .filter_map(|anchor| resolve_href(base, anchor.value().attr("href")?))
        .filter(|url| NUMERIC_PATH.is_match(url.path()))
        .collect()
}

/// Pages 2..=20 under the parent path of a numeric link.
pub(super) fn numeric_template_guesses(link: &Url) -> Vec<Url> {
    let path = trimmed_path(link);
    let Some((parent, _)) = path.rsplit_once('/') else {
        return Vec::new();
    };

    let mut base = link.clone();
    base.set_query(None);
    (2..=LAST_TEMPLATE_PAGE)
        .map(|n| with_path(&base, &format!("{parent}/{n}")))
        .collect()
}
