pub mod markup;
pub mod story;

use crate::template;
use story::Extraction;

/// Two-step pipeline: legacy HTML → story paragraphs → templated page.
pub fn process_page(html: &str, title: &str) -> (Extraction, String) {
    let extraction = story::extract(html);
    let page = template::render(title, &extraction.paragraphs);
    (extraction, page)
}
