use crate::config::resolve::Resolution;
use std::io::Write;

/// Render `config show` output.
pub fn render_show<W: Write>(w: &mut W, resolution: &Resolution) -> std::io::Result<()> {
    if resolution.loaded_files.is_empty() {
        writeln!(w, "Loaded config files: (none)")?;
    } else {
        writeln!(w, "Loaded config files:")?;
        for (i, path) in resolution.loaded_files.iter().enumerate() {
            writeln!(w, "  {}. {}", i + 1, path.display())?;
        }
    }
    writeln!(w)?;

    if resolution.presets.is_empty() {
        writeln!(w, "Extensions: (none)")?;
    } else {
        writeln!(w, "Extensions: {}", resolution.presets.join(", "))?;
    }
    writeln!(w)?;

    let rendered =
        serde_json::to_string_pretty(&resolution.config).map_err(std::io::Error::other)?;
    writeln!(w, "Resolved config:")?;
    writeln!(w, "{rendered}")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, RuleSetting};
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn make_resolution() -> Resolution {
        let mut rules = BTreeMap::new();
        rules.insert("module-name-regex".to_string(), RuleSetting::Enabled);
        Resolution {
            config: Config {
                module_markers: Some(vec!["package.json".to_string()]),
                use_gitignore: Some(true),
                extends: None,
                rules: Some(rules),
            },
            loaded_files: vec![PathBuf::from("/repo/.monolint.json")],
            presets: vec!["monolint:recommended".to_string()],
        }
    }

    #[test]
    fn render_show_format() {
        let mut buf = Vec::new();
        render_show(&mut buf, &make_resolution()).unwrap();
        let output = String::from_utf8(buf).unwrap();

        assert!(output.contains("Loaded config files:"));
        assert!(output.contains("  1. /repo/.monolint.json"));
        assert!(output.contains("Extensions: monolint:recommended"));
        assert!(output.contains("\"module-markers\""));
        assert!(output.contains("\"module-name-regex\": true"));
        assert!(!output.contains("extends"));
    }

    #[test]
    fn render_show_no_files() {
        let mut resolution = make_resolution();
        resolution.loaded_files.clear();
        let mut buf = Vec::new();
        render_show(&mut buf, &resolution).unwrap();
        let output = String::from_utf8(buf).unwrap();

        assert!(output.contains("Loaded config files: (none)"));
    }
}
