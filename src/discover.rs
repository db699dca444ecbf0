//! Test-file discovery: `.tc` files under the test directory, ordered by
//! their numeric filename prefix, optionally filtered to one test or a range.

use crate::directive;
use crate::types::TestCase;
use anyhow::{ensure, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestFilter {
    All,
    Single(u32),
    Range(u32, u32),
}

impl TestFilter {
    /// Parses "start-end" (inclusive on both ends).
    pub fn parse_range(text: &str) -> Result<Self> {
        let (start, end) = text
            .split_once('-')
            .with_context(|| format!("invalid range '{text}': expected 'start-end'"))?;
        let start: u32 = start
            .trim()
            .parse()
            .with_context(|| format!("invalid range '{text}': start is not a number"))?;
        let end: u32 = end
            .trim()
            .parse()
            .with_context(|| format!("invalid range '{text}': end is not a number"))?;
        ensure!(start <= end, "invalid range '{text}': start exceeds end");
        Ok(Self::Range(start, end))
    }

    fn admits(self, prefix: Option<u32>) -> bool {
        match self {
            Self::All => true,
            // Prefixless files cannot be addressed by number.
            Self::Single(n) => prefix == Some(n),
            Self::Range(start, end) => prefix.is_some_and(|p| start <= p && p <= end),
        }
    }
}

/// `10_pointers.tc` -> `Some(10)`; files without a numeric prefix sort last.
pub fn extract_number_prefix(path: &Path) -> Option<u32> {
    let name = path.file_name()?.to_str()?;
    let (digits, _) = name.split_once('_')?;
    digits.parse().ok()
}

/// Collects test files under `test_dir`, skipping files without the test
/// marker, and returns them sorted by numeric prefix (then name).
pub fn collect_test_files(test_dir: &Path, filter: TestFilter) -> Result<Vec<PathBuf>> {
    ensure!(
        test_dir.is_dir(),
        "test directory {} not found",
        test_dir.display()
    );

    let mut files = Vec::new();
    for entry in WalkDir::new(test_dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != "tc") {
            continue;
        }
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "could not read file, skipping");
                continue;
            }
        };
        if !directive::is_test_file(&content) {
            warn!(file = %path.display(), "does not appear to be a test file (missing header), skipping");
            continue;
        }
        if filter.admits(extract_number_prefix(path)) {
            files.push(path.to_path_buf());
        }
    }

    files.sort_by_key(|p| {
        (
            extract_number_prefix(p).unwrap_or(u32::MAX),
            p.file_name().map(|n| n.to_os_string()),
        )
    });
    Ok(files)
}

/// Reads and parses one test file; the case name is the file's base name.
pub fn load_test_case(path: &Path) -> Result<TestCase> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "test".to_string());
    directive::parse_test_file(&name, &content)
        .with_context(|| format!("failed to parse {}", path.display()))
}
