use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<title>(.*?)</title>").unwrap());
static BODY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<TITLE>.*?</TITLE>.*?<BODY.*?>(.*?)</BODY>").unwrap()
});
static H1_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<H1>(.*?)</H1>").unwrap());

pub const NO_BODY_MESSAGE: &str = "Story content could not be extracted.";

/// Remove every `<...>` tag, wherever it sits in the text.
pub fn strip_tags(s: &str) -> String {
    TAG_RE.replace_all(s, "").into_owned()
}

/// Strip markup and surrounding whitespace; `None` when nothing is left.
pub fn clean_fragment(s: &str) -> Option<String> {
    let cleaned = strip_tags(s);
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Text of the first `<title>` element, if it has any.
pub fn page_title(html: &str) -> Option<String> {
    TITLE_RE
        .captures(html)
        .map(|caps| caps[1].trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Download-stage cut: the page body, minus everything up to and including
/// the first `<H1>` heading.
pub fn body_after_heading(html: &str) -> String {
    let Some(caps) = BODY_RE.captures(html) else {
        return NO_BODY_MESSAGE.to_string();
    };
    let body = &caps[1];
    match H1_RE.find(body) {
        Some(heading) => body[heading.end()..].to_string(),
        None => body.to_string(),
    }
}
