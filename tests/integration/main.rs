mod cli_test;
mod config_test;
mod lint_test;

use std::path::Path;

/// Write `content` to `root/rel`, creating parent folders.
pub fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}
