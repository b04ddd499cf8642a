//! Report persistence
//!
//! Reports land in `report-{slug}-{unix_millis}.md`, where the slug is a
//! lowercase, dash-separated, length-bounded rendering of the topic.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

/// Default maximum slug length
pub const DEFAULT_SLUG_MAX_LEN: usize = 50;

/// Slug used when the topic has no usable characters
pub const UNTITLED_SLUG: &str = "untitled-research";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to create report directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write report {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Turn a topic into a file-name-safe slug of at most `max_len` characters
pub fn slugify(topic: &str, max_len: usize) -> String {
    let mut slug = String::with_capacity(topic.len());
    for c in topic.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }

    // slug is pure ASCII from here on, so byte slicing is safe
    let trimmed = slug.trim_matches('-');
    let truncated = trimmed[..trimmed.len().min(max_len)].trim_end_matches('-');

    if truncated.is_empty() {
        UNTITLED_SLUG.to_string()
    } else {
        truncated.to_string()
    }
}

/// File name for a report on `topic` written at `timestamp_ms`
pub fn report_filename(topic: &str, max_len: usize, timestamp_ms: i64) -> String {
    format!("report-{}-{}.md", slugify(topic, max_len), timestamp_ms)
}

/// Write `report` into `dir`, returning the full path
pub fn save_report(dir: &Path, topic: &str, report: &str, max_len: usize) -> Result<PathBuf, ReportError> {
    debug!(dir = %dir.display(), report_len = report.len(), "save_report: called");
    fs::create_dir_all(dir).map_err(|source| ReportError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let filename = report_filename(topic, max_len, chrono::Utc::now().timestamp_millis());
    let path = dir.join(filename);
    fs::write(&path, report).map_err(|source| ReportError::Write {
        path: path.clone(),
        source,
    })?;

    info!(path = %path.display(), "save_report: report saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Quantum Error Correction!", 50), "quantum-error-correction");
        assert_eq!(slugify("  --Rust & WebAssembly--  ", 50), "rust-webassembly");
        assert_eq!(slugify("Café au lait", 50), "caf-au-lait");
    }

    #[test]
    fn test_slugify_empty_becomes_untitled() {
        assert_eq!(slugify("", 50), UNTITLED_SLUG);
        assert_eq!(slugify("!!! ???", 50), UNTITLED_SLUG);
        assert_eq!(slugify("日本語", 50), UNTITLED_SLUG);
    }

    #[test]
    fn test_slugify_truncates_without_trailing_dash() {
        assert_eq!(slugify("abcd efgh", 5), "abcd");
        assert_eq!(slugify("abcdefgh", 3), "abc");
    }

    #[test]
    fn test_report_filename() {
        assert_eq!(
            report_filename("History of Rome", 50, 1_700_000_000_000),
            "report-history-of-rome-1700000000000.md"
        );
    }

    #[test]
    fn test_save_report_writes_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("nested").join("reports");

        let path = save_report(&out, "Ocean currents", "# Report\n\nBody ✓", 50).unwrap();

        assert!(path.starts_with(&out));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("report-ocean-currents-"));
        assert!(name.ends_with(".md"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "# Report\n\nBody ✓");
    }

    proptest! {
        #[test]
        fn prop_slug_is_bounded_and_safe(topic in ".*", max_len in 1usize..80) {
            let slug = slugify(&topic, max_len);
            prop_assert!(slug == UNTITLED_SLUG || slug.len() <= max_len);
            prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            prop_assert!(!slug.starts_with('-') && !slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
        }
    }
}
