use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::catalog;
use crate::parser;

/// Totals for a pass over the story files.
#[derive(Debug, Default)]
pub struct CleanStats {
    pub total: usize,
    pub ok: usize,
    pub placeholders: usize,
}

pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))
}

pub fn story_path(dir: &Path, slug: &str) -> PathBuf {
    dir.join(format!("{}.html", slug))
}

pub fn has_content(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false)
}

/// All `*.html` files directly under `dir`, sorted by name.
pub fn list_story_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).with_context(|| format!("Failed to read {:?}", dir))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "html") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Decode bytes as UTF-8, dropping any invalid sequences.
pub fn decode_text(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// Read a file as text, dropping invalid UTF-8 rather than failing.
pub fn read_lossy(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    Ok(decode_text(&bytes))
}

/// Write to a sibling temp file, then rename over the target.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents).with_context(|| format!("Failed to write {:?}", tmp))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e).with_context(|| format!("Failed to replace {:?}", path));
    }
    Ok(())
}

/// Re-template one story file in place. Returns whether real text was found.
pub fn clean_file(path: &Path) -> Result<bool> {
    let html = read_lossy(path)?;
    let title = catalog::title_from_filename(path);
    let (extraction, page) = parser::process_page(&html, &title);
    let found = !extraction.is_placeholder();
    debug!("{:?}: {:?}, {} paragraphs", path, extraction.tier, extraction.paragraphs.len());
    write_atomic(path, &page)?;
    Ok(found)
}

/// Clean every story file in `dir`; a failing file is reported and skipped.
pub fn clean_all(dir: &Path) -> Result<CleanStats> {
    let files = list_story_files(dir)?;
    let mut stats = CleanStats {
        total: files.len(),
        ..Default::default()
    };

    for path in &files {
        info!("Cleaning {:?}", path);
        match clean_file(path) {
            Ok(found) => {
                stats.ok += 1;
                if !found {
                    stats.placeholders += 1;
                    warn!("No story text found in {:?}, wrote placeholder", path);
                }
            }
            Err(e) => warn!("Error cleaning {:?}: {:#}", path, e),
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn copy_fixture(dir: &Path, fixture: &str, slug: &str) -> PathBuf {
        let src = format!("tests/fixtures/{}.html", fixture);
        let dst = story_path(dir, slug);
        fs::copy(src, &dst).unwrap();
        dst
    }

    #[test]
    fn lists_only_html_sorted() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.html"), "x").unwrap();
        fs::write(tmp.path().join("a.html"), "x").unwrap();
        fs::write(tmp.path().join("notes.txt"), "x").unwrap();
        fs::create_dir(tmp.path().join("sub.html")).unwrap();

        let files = list_story_files(tmp.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.html", "b.html"]);
    }

    #[test]
    fn has_content_needs_bytes() {
        let tmp = TempDir::new().unwrap();
        let empty = tmp.path().join("empty.html");
        fs::write(&empty, "").unwrap();
        assert!(!has_content(&empty));
        assert!(!has_content(&tmp.path().join("missing.html")));
        fs::write(&empty, "x").unwrap();
        assert!(has_content(&empty));
    }

    #[test]
    fn atomic_write_replaces_and_leaves_no_temp() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("lois.html");
        fs::write(&path, "old").unwrap();
        write_atomic(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert!(!tmp.path().join("lois.html.tmp").exists());
    }

    #[test]
    fn read_lossy_tolerates_bad_utf8() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.html");
        fs::write(&path, b"<p>caf\xe9</p>").unwrap();
        assert_eq!(read_lossy(&path).unwrap(), "<p>caf</p>");
    }

    #[test]
    fn invalid_only_fragment_is_dropped() {
        let text = decode_text(b"<p>\xff\xfe</p><p>Still here</p>");
        assert!(!text.contains('\u{FFFD}'));
        assert_eq!(parser::story::extract(&text).paragraphs, vec!["Still here"]);
    }

    #[test]
    fn clean_file_uses_title_table() {
        let tmp = TempDir::new().unwrap();
        let path = copy_fixture(tmp.path(), "jack", "jack-the-railroad-and-shiva-the-destroyer");
        assert!(clean_file(&path).unwrap());

        let page = fs::read_to_string(&path).unwrap();
        assert!(page.contains("<h1>Jack, The Railroad, and Shiva The Destroyer</h1>"));
        assert!(page.contains("<p>He did not believe her until the first train screamed past.</p>"));
        assert!(!page.contains("FONT"));
    }

    #[test]
    fn clean_all_counts_placeholders() {
        let tmp = TempDir::new().unwrap();
        copy_fixture(tmp.path(), "airefrance", "airefrance-1267");
        copy_fixture(tmp.path(), "unknown", "under-construction");

        let stats = clean_all(tmp.path()).unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.ok, 2);
        assert_eq!(stats.placeholders, 1);

        let fallback = fs::read_to_string(story_path(tmp.path(), "under-construction")).unwrap();
        assert!(fallback.contains("<h1>Under Construction</h1>"));
        assert!(fallback.contains(parser::story::PLACEHOLDER));
    }

    #[test]
    fn clean_twice_is_stable() {
        let tmp = TempDir::new().unwrap();
        let path = copy_fixture(tmp.path(), "airefrance", "airefrance-1267");
        clean_file(&path).unwrap();
        let once = fs::read_to_string(&path).unwrap();
        clean_file(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), once);
    }

    #[test]
    fn missing_dir_is_an_error() {
        let tmp = TempDir::new().unwrap();
        assert!(clean_all(&tmp.path().join("nope")).is_err());
    }
}
