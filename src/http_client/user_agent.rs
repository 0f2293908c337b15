//! Browser user agents.

use std::time::{SystemTime, UNIX_EPOCH};

/// Sent when nothing else is configured.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Pool for `user_agent = "impersonate"`.
pub const IMPERSONATE_USER_AGENTS: &[&str] = &[
    USER_AGENT,
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/18.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36 Edg/131.0.0.0",
];

const IMPERSONATE: &str = "impersonate";

fn pick_impersonated() -> &'static str {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.subsec_nanos() as usize);
    IMPERSONATE_USER_AGENTS[nanos % IMPERSONATE_USER_AGENTS.len()]
}

/// Agent string for a configured value. Unset or blank gives
/// [`USER_AGENT`], `impersonate` (any case) a pool entry, and anything else
/// is sent verbatim.
pub fn resolve_user_agent(configured: Option<&str>) -> String {
    match configured.map(str::trim).filter(|s| !s.is_empty()) {
        None => USER_AGENT.to_string(),
        Some(s) if s.eq_ignore_ascii_case(IMPERSONATE) => pick_impersonated().to_string(),
        Some(custom) => custom.to_string(),
    }
}
