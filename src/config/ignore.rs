use std::path::Path;

/// Tool-specific ignore file, read from the monorepo root.
pub const MONOLINT_IGNORE_FILE: &str = ".monolintignore";

/// Load ignore patterns for module discovery from the monorepo root.
///
/// `.gitignore` is only read when `use_gitignore` is set; its leading `/`
/// anchors are dropped. `.monolintignore` is always read when present.
pub fn load_ignore_patterns(base_dir: &Path, use_gitignore: bool) -> Vec<String> {
    let mut patterns = Vec::new();

    if use_gitignore {
        if let Some(content) = read_optional(&base_dir.join(".gitignore")) {
            patterns.extend(
                parse_ignore_patterns(&content)
                    .into_iter()
                    .map(|p| p.strip_prefix('/').map(str::to_string).unwrap_or(p)),
            );
        }
    }

    if let Some(content) = read_optional(&base_dir.join(MONOLINT_IGNORE_FILE)) {
        patterns.extend(parse_ignore_patterns(&content));
    }

    patterns
}

fn read_optional(path: &Path) -> Option<String> {
    if !path.exists() {
        return None;
    }
    match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            tracing::warn!("Could not read {}: {e}", path.display());
            None
        }
    }
}

fn parse_ignore_patterns(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|l| l.to_string())
        .collect()
}
