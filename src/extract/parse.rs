//! Tolerant recovery of a JSON array from free-form model output.
//!
//! Strategies run in order and the first one that yields an array wins.
//! When none do, the response contributes nothing.

use serde_json::Value;

/// One way of pulling a JSON array out of a model response.
pub trait ParseStrategy: Sync {
    fn name(&self) -> &'static str;
    fn parse(&self, raw: &str) -> Option<Vec<Value>>;
}

/// Whole response is the array, optionally wrapped in a code fence.
pub struct Fenced;

/// Array embedded in prose: first `[` through last `]`.
pub struct BracketScan;

/// Default strategy chain.
pub static STRATEGIES: &[&dyn ParseStrategy] = &[&Fenced, &BracketScan];

/// Outcome of running the chain over one response.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedArray {
    /// Strategy that succeeded, if any.
    pub strategy: Option<&'static str>,
    pub items: Vec<Value>,
}

fn strip_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

impl ParseStrategy for Fenced {
    fn name(&self) -> &'static str {
        "fenced"
    }

    fn parse(&self, raw: &str) -> Option<Vec<Value>> {
        serde_json::from_str(strip_fences(raw)).ok()
    }
}

impl ParseStrategy for BracketScan {
    fn name(&self) -> &'static str {
        "bracket_scan"
    }

    fn parse(&self, raw: &str) -> Option<Vec<Value>> {
        let text = strip_fences(raw);
        let start = text.find('[')?;
        let end = text.rfind(']')?;
        if end <= start {
            return None;
        }
        serde_json::from_str(&text[start..=end]).ok()
    }
}

/// Run `strategies` in order over `raw`.
pub fn parse_with(strategies: &[&dyn ParseStrategy], raw: &str) -> ParsedArray {
    for strategy in strategies {
        if let Some(items) = strategy.parse(raw) {
            return ParsedArray {
                strategy: Some(strategy.name()),
                items,
            };
        }
    }
    ParsedArray {
        strategy: None,
        items: Vec::new(),
    }
}

/// Run the default chain.
pub fn parse_response(raw: &str) -> ParsedArray {
    parse_with(STRATEGIES, raw)
}
