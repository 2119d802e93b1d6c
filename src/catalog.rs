use std::path::Path;

use anyhow::{bail, Result};

/// A story on the archived site and the page names it may live under.
#[derive(Debug, Clone, Copy)]
pub struct StoryEntry {
    pub slug: &'static str,
    pub pages: &'static [&'static str],
}

pub const STORIES: &[StoryEntry] = &[
    StoryEntry {
        slug: "jack-the-railroad-and-shiva-the-destroyer",
        pages: &["jack"],
    },
    StoryEntry {
        slug: "kj-heisenberg-and-the-third-category",
        pages: &["kj"],
    },
    StoryEntry {
        slug: "jacks-tour-abroad",
        pages: &["tour"],
    },
    StoryEntry {
        slug: "airefrance-1267",
        pages: &[
            "airefrance1267",
            "airefrance",
            "air",
            "france",
            "flight1267",
            "flight",
            "af1267",
            "af",
        ],
    },
    StoryEntry {
        slug: "lie-detector",
        pages: &["liedetector", "lie", "detector"],
    },
    StoryEntry {
        slug: "village-inn",
        pages: &["villageinn", "village", "inn"],
    },
    StoryEntry {
        slug: "lois",
        pages: &["lois"],
    },
    StoryEntry {
        slug: "yamanote",
        pages: &["yamanote"],
    },
];

/// Archive snapshots to try, in order. The first is the one the site was found under.
pub const TIMESTAMPS: &[&str] = &[
    "20000116230658",
    "20000615000000", // mid-2000
    "20001215000000",
    "19991215000000",
    "20010115000000",
];

const TITLES: &[(&str, &str)] = &[
    (
        "jack-the-railroad-and-shiva-the-destroyer",
        "Jack, The Railroad, and Shiva The Destroyer",
    ),
    (
        "kj-heisenberg-and-the-third-category",
        "KJ Heisenberg and The Third Category",
    ),
    ("jacks-tour-abroad", "Jack's Tour Abroad"),
    ("airefrance-1267", "Airefrance #1267"),
    ("lie-detector", "Lie Detector"),
    ("village-inn", "Village Inn"),
    ("lois", "Lois"),
    ("yamanote", "Yamanote"),
    ("silent-observer", "Silent Observer"),
];

pub fn find(slug: &str) -> Option<&'static StoryEntry> {
    STORIES.iter().find(|s| s.slug == slug)
}

/// The named stories in catalog order, or all of them when `slugs` is empty.
pub fn select(slugs: &[String]) -> Result<Vec<&'static StoryEntry>> {
    if slugs.is_empty() {
        return Ok(STORIES.iter().collect());
    }
    for slug in slugs {
        if find(slug).is_none() {
            bail!("Unknown story '{}'", slug);
        }
    }
    Ok(STORIES
        .iter()
        .filter(|s| slugs.iter().any(|w| w == s.slug))
        .collect())
}

/// Display title for a slug: the known title, else the slug title-cased.
pub fn title_for(slug: &str) -> String {
    TITLES
        .iter()
        .find(|(s, _)| *s == slug)
        .map(|(_, t)| t.to_string())
        .unwrap_or_else(|| title_case(&slug.replace('-', " ")))
}

pub fn title_from_filename(path: &Path) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    title_for(stem)
}

/// Upper-case a cased letter after any uncased character, lower-case the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_cased = false;
    for ch in s.chars() {
        if ch.is_lowercase() || ch.is_uppercase() {
            if prev_cased {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_cased = true;
        } else {
            out.push(ch);
            prev_cased = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn known_titles() {
        assert_eq!(title_for("airefrance-1267"), "Airefrance #1267");
        assert_eq!(title_for("jacks-tour-abroad"), "Jack's Tour Abroad");
        assert_eq!(title_for("silent-observer"), "Silent Observer");
    }

    #[test]
    fn fallback_title() {
        assert_eq!(title_for("the-night-ferry"), "The Night Ferry");
        assert_eq!(title_for("route-66"), "Route 66");
    }

    #[test]
    fn title_case_rules() {
        assert_eq!(title_case("hELLO wORLD"), "Hello World");
        assert_eq!(title_case("1267abc"), "1267Abc");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn uncased_letters_start_a_word() {
        assert_eq!(title_case("山手abc"), "山手Abc");
        assert_eq!(title_case("yamanote 山手線"), "Yamanote 山手線");
    }

    #[test]
    fn title_from_path() {
        assert_eq!(
            title_from_filename(Path::new("stories/lie-detector.html")),
            "Lie Detector"
        );
        assert_eq!(title_from_filename(Path::new("old-mill.html")), "Old Mill");
    }

    #[test]
    fn every_story_has_pages_and_title() {
        for s in STORIES {
            assert!(!s.pages.is_empty(), "{} has no pages", s.slug);
            assert!(TITLES.iter().any(|(slug, _)| *slug == s.slug));
        }
    }

    #[test]
    fn page_names_unique_per_story() {
        for s in STORIES {
            let set: HashSet<_> = s.pages.iter().collect();
            assert_eq!(set.len(), s.pages.len(), "duplicate page for {}", s.slug);
        }
    }

    #[test]
    fn select_keeps_catalog_order() {
        let picked = select(&["yamanote".to_string(), "lois".to_string()]).unwrap();
        let slugs: Vec<_> = picked.iter().map(|s| s.slug).collect();
        assert_eq!(slugs, vec!["lois", "yamanote"]);
        assert_eq!(select(&[]).unwrap().len(), STORIES.len());
        assert!(select(&["nope".to_string()]).is_err());
    }

    #[test]
    fn find_by_slug() {
        assert_eq!(find("lois").map(|s| s.pages), Some(&["lois"][..]));
        assert!(find("silent-observer").is_none());
    }
}
