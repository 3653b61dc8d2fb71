use crate::errors::{MonolintError, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// One directory between the monorepo root and a target directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub path: PathBuf,
    pub is_root: bool,
}

/// Directories from `root` down to a target, root first.
///
/// Finite and cheap to clone, so callers can restart the walk by cloning
/// before consuming it.
#[derive(Debug, Clone)]
pub struct Levels {
    root: PathBuf,
    segments: Vec<OsString>,
    next: usize,
}

impl Iterator for Levels {
    type Item = Level;

    fn next(&mut self) -> Option<Level> {
        if self.next > self.segments.len() {
            return None;
        }
        let mut path = self.root.clone();
        for segment in &self.segments[..self.next] {
            path.push(segment);
        }
        let level = Level {
            path,
            is_root: self.next == 0,
        };
        self.next += 1;
        Some(level)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.segments.len() + 1).saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Levels {}

/// Walk the directory levels from `root` to `target` (both inclusive).
///
/// `target` must be `root` itself or one of its descendants.
pub fn levels_within(root: &Path, target: &Path) -> Result<Levels> {
    let relative = target
        .strip_prefix(root)
        .map_err(|_| MonolintError::OutsideRoot {
            path: target.to_path_buf(),
            root: root.to_path_buf(),
        })?;

    let segments = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_os_string()),
            _ => None,
        })
        .collect();

    Ok(Levels {
        root: root.to_path_buf(),
        segments,
        next: 0,
    })
}

/// Compile gitignore-style patterns so that each one matches at any depth
/// below the walk root, both the entry itself and everything inside it.
pub fn build_ignore_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        if pattern.starts_with('!') {
            tracing::debug!("Negated ignore pattern not supported, skipping: {pattern}");
            continue;
        }
        let trimmed = pattern.trim_end_matches('/');
        if trimmed.is_empty() {
            continue;
        }
        let anchored = if trimmed.starts_with("**/") {
            trimmed.to_string()
        } else {
            format!("**/{trimmed}")
        };
        builder.add(path_glob(&anchored)?);
        builder.add(path_glob(&format!("{anchored}/**"))?);
    }
    Ok(builder.build()?)
}

/// Find every marker file below `base_dir`, skipping ignored entries.
///
/// Dotfiles and dot-directories are searched. Returns sorted paths.
pub fn find_marker_files(
    base_dir: &Path,
    markers: &[String],
    ignore_set: &GlobSet,
) -> Result<Vec<PathBuf>> {
    if markers.is_empty() {
        return Ok(Vec::new());
    }

    let mut marker_builder = GlobSetBuilder::new();
    for marker in markers {
        marker_builder.add(path_glob(&format!("**/{marker}"))?);
    }
    let marker_set = marker_builder.build()?;

    let root = base_dir.to_path_buf();
    let ignored = ignore_set.clone();
    let walker = WalkBuilder::new(base_dir)
        .standard_filters(false)
        .hidden(false)
        .filter_entry(move |entry| {
            let relative = entry.path().strip_prefix(&root).unwrap_or(entry.path());
            relative.as_os_str().is_empty() || !ignored.is_match(relative)
        })
        .build();

    let mut found = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.path();
        let relative = path.strip_prefix(base_dir).unwrap_or(path);
        if marker_set.is_match(relative) {
            found.push(path.to_path_buf());
        }
    }

    found.sort();
    Ok(found)
}

/// Glob where `*` does not cross directory separators.
pub fn path_glob(pattern: &str) -> Result<globset::Glob> {
    Ok(GlobBuilder::new(pattern).literal_separator(true).build()?)
}
