use std::sync::LazyLock;

use regex::Regex;

use super::markup::clean_fragment;

pub const PLACEHOLDER: &str =
    "Story content could not be extracted properly. Please check the original source.";

/// Tags that wrapped story prose on the archived site, in priority order.
const WRAPPER_PATTERNS: &[&str] = &[
    r#"<font size="1" face="Arial">(.*?)</font>"#,
    r"<p>(.*?)</p>",
];

/// Literal opening lines of stories whose markup has no usable wrapper.
const START_MARKERS: &[&str] = &[
    "Just before little Jack",
    "KJ Heisenberg",
    "Monsieur Ashe",
    "The lie detector",
];

const END_MARKERS: &[&str] = &["</body>", "</html>", "BEGIN WAYBACK TOOLBAR"];

static WRAPPER_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    WRAPPER_PATTERNS
        .iter()
        .map(|p| Regex::new(&format!("(?is){}", p)).unwrap())
        .collect()
});
static BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<p>|<P>|<br>|<BR>|\n\n").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Wrapper,
    Marker,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub tier: Tier,
    pub paragraphs: Vec<String>,
}

impl Extraction {
    fn placeholder() -> Self {
        Extraction {
            tier: Tier::Placeholder,
            paragraphs: vec![PLACEHOLDER.to_string()],
        }
    }

    /// Also true for a previously rendered placeholder read back in.
    pub fn is_placeholder(&self) -> bool {
        self.tier == Tier::Placeholder || self.paragraphs == [PLACEHOLDER]
    }

    pub fn into_paragraphs(self) -> Vec<String> {
        self.paragraphs
    }
}

/// Pull story paragraphs out of legacy HTML.
///
/// Tiers run in order and the first to produce a paragraph wins:
/// wrapper tags, then known opening lines, then a fixed placeholder.
/// The result is never empty.
pub fn extract(raw: &str) -> Extraction {
    if let Some(paragraphs) = from_wrappers(raw) {
        return Extraction {
            tier: Tier::Wrapper,
            paragraphs,
        };
    }
    if let Some(paragraphs) = from_markers(raw) {
        return Extraction {
            tier: Tier::Marker,
            paragraphs,
        };
    }
    Extraction::placeholder()
}

fn from_wrappers(raw: &str) -> Option<Vec<String>> {
    for re in WRAPPER_RES.iter() {
        // Output is never merged across patterns: first one with text wins.
        let paragraphs: Vec<String> = re
            .captures_iter(raw)
            .filter_map(|caps| clean_fragment(&caps[1]))
            .collect();
        if !paragraphs.is_empty() {
            return Some(paragraphs);
        }
    }
    None
}

fn from_markers(raw: &str) -> Option<Vec<String>> {
    for marker in START_MARKERS {
        let Some(start) = raw.find(marker) else {
            continue;
        };
        let text = truncate_at_end_markers(&raw[start..]);
        let paragraphs: Vec<String> = BREAK_RE.split(text).filter_map(clean_fragment).collect();
        if !paragraphs.is_empty() {
            return Some(paragraphs);
        }
    }
    None
}

/// Each end marker is searched in what the previous ones left, so the cut
/// lands before whichever occurs first.
fn truncate_at_end_markers(text: &str) -> &str {
    let mut text = text;
    for end in END_MARKERS {
        if let Some(idx) = text.find(end) {
            text = text[..idx].trim();
        }
    }
    text
}
