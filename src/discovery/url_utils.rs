//! URL helpers shared by the discovery stages.

use url::Url;

/// Resolve an href against the page it appeared on, dropping fragments.
///
/// `javascript:`, `mailto:` and `tel:` links resolve to `None`.
pub fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    let mut url = base.join(href).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.set_fragment(None);
    Some(url)
}

/// Same host and explicit port. The scheme is ignored so an http pager link
/// on an https directory still counts.
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.host_str() == b.host_str() && a.port() == b.port()
}

/// Path without any trailing slash; the root path becomes an empty string.
pub fn trimmed_path(url: &Url) -> &str {
    url.path().trim_end_matches('/')
}

/// Copy of `url` with a new path, no fragment.
pub fn with_path(url: &Url, path: &str) -> Url {
    let mut out = url.clone();
    out.set_path(path);
    out.set_fragment(None);
    out
}
