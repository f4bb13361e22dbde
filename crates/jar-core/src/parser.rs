//! Markdown milestone file parsing.
//!
//! The jar file is a loosely structured markdown document: `##`/`###`
//! headings open categories and `- ` bullets beneath them are milestones.
//! Everything else is ignored. Parsing happens once at startup and the
//! resulting [`MilestoneSet`] is read-only afterwards.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use jar_models::{Milestone, MilestoneSet};

/// Category for bullets that appear before any heading.
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// Errors raised while loading jar files.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The file does not exist.
    #[error("milestone file not found: {0}")]
    FileNotFound(PathBuf),

    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The pregenerated JSON could not be parsed.
    #[error("failed to parse {path}: {source}")]
    Json {
        /// Path that failed.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
}

/// Loads and parses a milestone markdown file.
///
/// A missing file is an error; an empty or heading-free file loads as an
/// empty set (selection then fails downstream, with no external calls
/// made).
pub fn load_milestones(path: &Path) -> Result<MilestoneSet, ParseError> {
    if !path.exists() {
        return Err(ParseError::FileNotFound(path.to_path_buf()));
    }
    let contents = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let set = parse_markdown(&contents);
    info!(
        path = %path.display(),
        milestones = set.len(),
        categories = set.categories().len(),
        "parsed milestone file"
    );
    Ok(set)
}

/// Parses markdown content into a [`MilestoneSet`].
pub fn parse_markdown(contents: &str) -> MilestoneSet {
    let mut set = MilestoneSet::new();
    let mut current_category = DEFAULT_CATEGORY.to_string();

    for (idx, raw_line) in contents.lines().enumerate() {
        let line_number = idx + 1;
        let line = raw_line.trim_end();

        if line.trim().is_empty() {
            continue;
        }

        if line.starts_with("##") {
            current_category = clean_heading(line);
            set.note_category(current_category.clone());
            debug!(category = %current_category, line = line_number, "found category");
            continue;
        }

        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix('-') {
            let text = rest.trim();

            // Blank bullets and metadata bullets (dividers, footnotes).
            if text.is_empty() || text.starts_with("---") || text.starts_with('*') {
                continue;
            }

            set.push(Milestone::new(text, current_category.clone(), line_number));
        }
    }

    set
}

/// Strips heading markers, surrounding whitespace, and any leading run of
/// emoji/punctuation from a heading line.
fn clean_heading(line: &str) -> String {
    let without_marks = line.trim_start_matches('#').trim();
    let cleaned = without_marks
        .trim_start_matches(|c: char| !c.is_alphanumeric() && !c.is_whitespace())
        .trim();
    if cleaned.is_empty() {
        without_marks.to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
# The Jar

## 🚀 Work
- Shipped the parser
- Fixed the flaky deploy
-
- ---
- *added 2025-11-02*

### Health
- Ran a 10k

## Reading
";

    #[test]
    fn test_parse_counts_bullets() {
        let set = parse_markdown(SAMPLE);
        assert_eq!(set.len(), 3);
        assert_eq!(
            set.category_stats(),
            vec![
                ("Work".to_string(), 2),
                ("Health".to_string(), 1),
                ("Reading".to_string(), 0),
            ]
        );
    }

    #[test]
    fn test_heading_emoji_is_stripped() {
        let set = parse_markdown("## 🚀 Work\n- Did X\n");
        assert_eq!(set.categories(), ["Work"]);
    }

    #[test]
    fn test_bullets_before_heading_are_uncategorized() {
        let set = parse_markdown("- floating achievement\n\n## Work\n- Did X\n");
        assert_eq!(set.categories(), [DEFAULT_CATEGORY, "Work"]);
        let first = set.iter().next().unwrap();
        assert_eq!(first.category, DEFAULT_CATEGORY);
    }

    #[test]
    fn test_whitespace_is_stripped() {
        let set = parse_markdown("## Work\n-    padded entry   \n");
        assert_eq!(set.iter().next().unwrap().text, "padded entry");
    }

    #[test]
    fn test_order_is_stable() {
        let a = parse_markdown(SAMPLE);
        let b = parse_markdown(SAMPLE);
        let texts_a: Vec<&str> = a.iter().map(|m| m.text.as_str()).collect();
        let texts_b: Vec<&str> = b.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts_a, texts_b);
    }

    #[test]
    fn test_empty_file_loads_empty() {
        let set = parse_markdown("");
        assert!(set.is_empty());
    }

    #[test]
    fn test_prose_only_file_loads_empty() {
        let set = parse_markdown("just some notes\nwith no structure\n");
        assert!(set.is_empty());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = load_milestones(Path::new("does-not-exist.md")).unwrap_err();
        assert!(matches!(err, ParseError::FileNotFound(_)));
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let set = load_milestones(file.path()).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(
            set.iter().map(|m| m.line_number).collect::<Vec<_>>(),
            vec![4, 5, 11]
        );
    }
}
