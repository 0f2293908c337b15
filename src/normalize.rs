//! HTML to plain text conversion and the thin-content gate.

use ego_tree::iter::Edge;
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Node};

/// Minimum trimmed text length (in characters) for a page to be worth a model call.
pub const DEFAULT_MIN_CONTENT_CHARS: usize = 500;

/// Subtrees whose text never reaches the model.
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template", "svg", "iframe"];

/// Elements that end a line of text when rendered.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "td", "th", "title",
    "tr", "ul",
];

/// Strip markup, scripts and styles from an HTML document.
///
/// Each block element starts a new line; whitespace inside a line collapses
/// to single spaces and blank lines are dropped.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut raw = String::with_capacity(html.len() / 2);
    collect_text(document.root_element(), &mut raw);

    raw.lines()
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Iterative walk so arbitrarily deep markup cannot exhaust the stack.
fn collect_text(root: ElementRef<'_>, out: &mut String) {
    // Root of the subtree currently being skipped, if any.
    let mut skipping: Option<NodeId> = None;

    for edge in root.traverse() {
        match edge {
            Edge::Open(node) => {
                if skipping.is_some() {
                    continue;
                }
                match node.value() {
                    Node::Text(text) => out.push_str(text),
                    Node::Element(element) if SKIPPED_TAGS.contains(&element.name()) => {
                        skipping = Some(node.id());
                    }
                    Node::Element(element) if BLOCK_TAGS.contains(&element.name()) => {
                        out.push('\n');
                    }
                    _ => {}
                }
            }
            Edge::Close(node) => {
                if let Some(id) = skipping {
                    if id == node.id() {
                        skipping = None;
                    }
                    continue;
                }
                if let Node::Element(element) = node.value() {
                    if BLOCK_TAGS.contains(&element.name()) {
                        out.push('\n');
                    } else {
                        // Inline siblings like <span>Name</span><span>Phone</span> stay separated.
                        out.push(' ');
                    }
                }
            }
        }
    }
}

fn collapse_whitespace(input: &str) -> String {
    let mut buf = String::with_capacity(input.len());
    let mut last_space = false;
    for ch in input.chars() {
        if ch.is_whitespace() {
            if !last_space && !buf.is_empty() {
                buf.push(' ');
            }
            last_space = true;
        } else {
            buf.push(ch);
            last_space = false;
        }
    }
    buf.trim_end().to_string()
}

/// Result of running page text through the [`ContentGate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageText {
    /// Enough text to be worth extracting from.
    Accepted(String),
    /// Too little text; the page is skipped without counting as a failure.
    TooThin { chars: usize },
}

/// Rejects near-empty or boilerplate-only pages before extraction.
#[derive(Debug, Clone, Copy)]
pub struct ContentGate {
    min_chars: usize,
}

impl Default for ContentGate {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_CONTENT_CHARS)
    }
}

impl ContentGate {
    pub fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }

    pub fn min_chars(&self) -> usize {
        self.min_chars
    }

    /// Check normalized text against the minimum length.
    pub fn check(&self, text: String) -> PageText {
        let chars = text.trim().chars().count();
        if chars < self.min_chars {
            PageText::TooThin { chars }
        } else {
            PageText::Accepted(text)
        }
    }

    /// Normalize HTML and gate the result in one step.
    pub fn normalize(&self, html: &str) -> PageText {
        self.check(html_to_text(html))
    }
}
