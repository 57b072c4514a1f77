//! HTML to markdown-ish text, sized for an LLM context window.
//!
//! Script blocks and class attributes are stripped before conversion; runs of
//! blank lines are collapsed afterwards. Token counts use the GPT-4 family
//! BPE (cl100k), matching what the extraction models bill against.

use std::io::Cursor;
use std::sync::OnceLock;

use eoka::Page;
use regex::Regex;
use tiktoken_rs::CoreBPE;

use crate::Result;

const WRAP_WIDTH: usize = 100;

fn script_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap())
}

fn class_attr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\sclass="[^"]*""#).unwrap())
}

fn blank_runs_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").unwrap())
}

fn bpe() -> &'static CoreBPE {
    static BPE: OnceLock<CoreBPE> = OnceLock::new();
    BPE.get_or_init(|| tiktoken_rs::cl100k_base().unwrap())
}

/// Convert an HTML document to compact markdown-ish text.
pub fn html_to_markdown(html: &str) -> String {
    let cleaned = script_re().replace_all(html, "");
    let cleaned = class_attr_re().replace_all(&cleaned, "");

    let text = html2text::from_read(Cursor::new(cleaned.as_bytes()), WRAP_WIDTH);

    blank_runs_re().replace_all(&text, "\n\n").trim().to_string()
}

/// Fetch the current page's HTML and convert it.
pub async fn page_markdown(page: &Page) -> Result<String> {
    let html: String = page.evaluate("document.documentElement.outerHTML").await?;
    Ok(html_to_markdown(&html))
}

/// Number of cl100k tokens in a string.
pub fn count_tokens(text: &str) -> usize {
    bpe().encode_with_special_tokens(text).len()
}
