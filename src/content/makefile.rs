use serde_json::{Map, Value};
use std::collections::HashMap;

#[derive(Debug, Default)]
struct Target {
    dependencies: Vec<String>,
    contents: Vec<String>,
}

/// Parse a Makefile into `{target: {dependencies, contents}}`.
///
/// `dependencies` is the space-joined prerequisite list and `contents` the
/// recipe lines joined by newlines. Special targets such as `.PHONY`,
/// variable assignments and target-specific variables are left out.
/// Backslash-continued lines are joined first.
pub fn parse_makefile(content: &str) -> Value {
    let mut order: Vec<String> = Vec::new();
    let mut targets: HashMap<String, Target> = HashMap::new();
    let mut current: Vec<String> = Vec::new();

    for line in logical_lines(content) {
        let line = line.as_str();
        if let Some(recipe) = line.strip_prefix('\t') {
            for name in &current {
                if let Some(target) = targets.get_mut(name) {
                    target.contents.push(recipe.trim_end().to_string());
                }
            }
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        current = match parse_rule_line(trimmed) {
            Some((names, deps)) => {
                for name in &names {
                    let target = targets.entry(name.clone()).or_insert_with(|| {
                        order.push(name.clone());
                        Target::default()
                    });
                    target.dependencies.extend(deps.iter().cloned());
                }
                names
            }
            None => Vec::new(),
        };
    }

    let mut map = Map::new();
    for name in order {
        if let Some(target) = targets.remove(&name) {
            let mut entry = Map::new();
            entry.insert(
                "dependencies".to_string(),
                Value::String(target.dependencies.join(" ")),
            );
            entry.insert(
                "contents".to_string(),
                Value::String(target.contents.join("\n")),
            );
            map.insert(name, Value::Object(entry));
        }
    }
    Value::Object(map)
}

/// Join lines ending in `\` with the next one, separated by one space.
fn logical_lines(content: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending: Option<String> = None;
    for line in content.lines() {
        let line = match pending.take() {
            Some(mut joined) => {
                joined.push(' ');
                joined.push_str(line.trim_start());
                joined
            }
            None => line.to_string(),
        };
        match line.strip_suffix('\\') {
            Some(head) => pending = Some(head.trim_end().to_string()),
            None => lines.push(line),
        }
    }
    lines.extend(pending);
    lines
}

/// Split `a b: dep1 dep2` into target names and prerequisites.
fn parse_rule_line(line: &str) -> Option<(Vec<String>, Vec<String>)> {
    let colon = line.find(':')?;
    let before = &line[..colon];
    let after = &line[colon + 1..];

    // `=` before the colon, `:=` and `::=` are assignments
    if before.contains('=') || after.starts_with('=') || after.starts_with(":=") {
        return None;
    }
    let after = after.strip_prefix(':').unwrap_or(after);
    let after = after.split(';').next().unwrap_or_default();
    let after = after.split('#').next().unwrap_or_default();
    // `target: VAR = value` sets a target-specific variable
    if after.contains('=') {
        return None;
    }

    let names: Vec<String> = before
        .split_whitespace()
        .filter(|n| !n.starts_with('.'))
        .map(str::to_string)
        .collect();
    if names.is_empty() {
        return None;
    }
    let deps = after.split_whitespace().map(str::to_string).collect();
    Some((names, deps))
}
