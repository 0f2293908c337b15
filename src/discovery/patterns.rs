//! Page-number URL guesses derived from the seed URL alone.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use super::url_utils::{trimmed_path, with_path};

/// Pages 2 through this number are guessed.
const LAST_GUESSED_PAGE: u32 = 20;

static PAGE_QUERY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|&)page=[^&]*").expect("valid regex"));

static PAGE_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/page/\d+").expect("valid regex"));

/// Guessed URLs for pages 2..=20, in generation order.
///
/// A seed that already paginates (`page=` query key or `/page/` segment)
/// gets its page number substituted. Otherwise every N yields `/page/N`, a
/// `page=N` query parameter, and a bare trailing `/N`.
///
/// The query family adapts to the seed: `?page=N` when it has no query,
/// `&page=N` appended to the existing query otherwise.
pub(super) fn page_guesses(seed: &Url) -> Vec<Url> {
    let mut seed = seed.clone();
    seed.set_fragment(None);

    if seed.query_pairs().any(|(key, _)| key == "page") {
        return substitute_query(&seed);
    }
    if seed.path().contains("/page/") {
        return substitute_path(&seed);
    }

    let query = seed.query().filter(|q| !q.is_empty()).map(str::to_string);
    let base_path = trimmed_path(&seed).to_string();

    let mut guesses = Vec::with_capacity(3 * (LAST_GUESSED_PAGE as usize - 1));
    for n in 2..=LAST_GUESSED_PAGE {
        guesses.push(with_path(&seed, &format!("{base_path}/page/{n}")));

        let mut with_query = seed.clone();
        match &query {
            None => with_query.set_query(Some(&format!("page={n}"))),
            Some(q) => with_query.set_query(Some(&format!("{q}&page={n}"))),
        }
        guesses.push(with_query);

        guesses.push(with_path(&seed, &format!("{base_path}/{n}")));
    }
    guesses
}

fn substitute_query(seed: &Url) -> Vec<Url> {
    let query = seed.query().unwrap_or_default();
    (2..=LAST_GUESSED_PAGE)
        .map(|n| {
            let replaced = PAGE_QUERY.replace(query, format!("${{1}}page={n}"));
            let mut url = seed.clone();
            url.set_query(Some(&replaced));
            url
        })
        .collect()
}

fn substitute_path(seed: &Url) -> Vec<Url> {
    let path = seed.path();
    (2..=LAST_GUESSED_PAGE)
        .map(|n| {
            let new_path = if PAGE_SEGMENT.is_match(path) {
                PAGE_SEGMENT.replace(path, format!("/page/{n}")).into_owned()
            } else {
                format!("{}/{n}", trimmed_path(seed))
            };
            with_path(seed, &new_path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guesses(seed: &str) -> Vec<String> {
        page_guesses(&Url::parse(seed).unwrap())
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn plain_seed_gets_all_families() {
        let out = guesses("https://dir.example.com/dentists/");
        assert_eq!(out.len(), 57);
        assert_eq!(
            &out[..3],
            &[
                "https://dir.example.com/dentists/page/2",
                "https://dir.example.com/dentists/?page=2",
                "https://dir.example.com/dentists/2",
            ]
        );
        assert_eq!(out[56], "https://dir.example.com/dentists/20");
    }

    #[test]
    fn existing_query_gets_appended_page() {
        let out = guesses("https://dir.example.com/search?city=austin#results");
        assert_eq!(out[0], "https://dir.example.com/search/page/2?city=austin");
        assert_eq!(out[1], "https://dir.example.com/search?city=austin&page=2");
        assert_eq!(out[2], "https://dir.example.com/search/2?city=austin");
    }

    #[test]
    fn page_query_is_substituted() {
        let out = guesses("https://dir.example.com/search?city=austin&page=1&sort=name");
        assert_eq!(out.len(), 19);
        assert_eq!(
            out[0],
            "https://dir.example.com/search?city=austin&page=2&sort=name"
        );
        assert_eq!(
            out[18],
            "https://dir.example.com/search?city=austin&page=20&sort=name"
        );
    }

    #[test]
    fn subpage_key_is_not_mistaken_for_page() {
        let out = guesses("https://dir.example.com/search?subpage=1");
        assert_eq!(out[1], "https://dir.example.com/search?subpage=1&page=2");
    }

    #[test]
    fn page_segment_is_substituted() {
        let out = guesses("https://dir.example.com/lawyers/page/1/");
        assert_eq!(out.len(), 19);
        assert_eq!(out[0], "https://dir.example.com/lawyers/page/2/");
        assert_eq!(out[18], "https://dir.example.com/lawyers/page/20/");
    }
}
