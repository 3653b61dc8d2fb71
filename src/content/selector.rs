//! Path queries into structured file contents.
//!
//! A query is a dot-separated list of keys, each optionally followed by one
//! or more `[n]` array indexes: `provider.runtime`, `plugins[0]`,
//! `scripts.lint-fix`. Keys may be double-quoted to include dots or
//! brackets: `"a.b".c`. The empty query selects the whole document.

use crate::errors::{MonolintError, Result};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    Key(String),
    Index(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Query {
    steps: Vec<Step>,
}

impl Query {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// The sub-value addressed by this query, if it exists.
    pub fn select<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        self.steps
            .iter()
            .try_fold(value, |current, step| match step {
                Step::Key(key) => current.as_object()?.get(key),
                Step::Index(i) => current.as_array()?.get(*i),
            })
    }

    /// Mutable access to the addressed sub-value, if it exists.
    pub fn select_mut<'a>(&self, value: &'a mut Value) -> Option<&'a mut Value> {
        let mut current = value;
        for step in &self.steps {
            current = match step {
                Step::Key(key) => current.as_object_mut()?.get_mut(key)?,
                Step::Index(i) => current.as_array_mut()?.get_mut(*i)?,
            };
        }
        Some(current)
    }
}

impl FromStr for Query {
    type Err = MonolintError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |message: &str| MonolintError::InvalidSelector {
            selector: s.to_string(),
            message: message.to_string(),
        };

        let mut steps = Vec::new();
        if s.trim().is_empty() {
            return Ok(Query { steps });
        }

        let mut chars = s.chars().peekable();
        let mut after_dot = false;
        loop {
            // key part of one segment
            let mut key = String::new();
            let mut quoted = false;
            if chars.peek() == Some(&'"') {
                quoted = true;
                chars.next();
                loop {
                    match chars.next() {
                        Some('\\') => match chars.next() {
                            Some(c) => key.push(c),
                            None => return Err(invalid("unterminated escape")),
                        },
                        Some('"') => break,
                        Some(c) => key.push(c),
                        None => return Err(invalid("unterminated quote")),
                    }
                }
            } else {
                while let Some(&c) = chars.peek() {
                    if c == '.' || c == '[' {
                        break;
                    }
                    if c == ']' || c == '"' {
                        return Err(invalid(&format!("unexpected '{c}'")));
                    }
                    key.push(c);
                    chars.next();
                }
            }

            if after_dot && !quoted && key.is_empty() {
                return Err(invalid("empty segment"));
            }

            let mut has_index = false;
            if quoted || !key.is_empty() {
                steps.push(Step::Key(key));
            }

            // indexes
            while chars.peek() == Some(&'[') {
                chars.next();
                let mut digits = String::new();
                loop {
                    match chars.next() {
                        Some(']') => break,
                        Some(c) if c.is_ascii_digit() => digits.push(c),
                        Some(c) => return Err(invalid(&format!("unexpected '{c}' in index"))),
                        None => return Err(invalid("unterminated index")),
                    }
                }
                let index = digits
                    .parse::<usize>()
                    .map_err(|_| invalid("empty index"))?;
                steps.push(Step::Index(index));
                has_index = true;
            }

            if !quoted && steps.is_empty() && !has_index {
                return Err(invalid("empty segment"));
            }

            match chars.next() {
                None => break,
                Some('.') => {
                    if chars.peek().is_none() {
                        return Err(invalid("trailing '.'"));
                    }
                    after_dot = true;
                }
                Some(c) => return Err(invalid(&format!("unexpected '{c}'"))),
            }
        }

        Ok(Query { steps })
    }
}

/// Canonical form with every key quoted, e.g. `"scripts"."lint-fix"`.
impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for step in &self.steps {
            match step {
                Step::Key(key) => {
                    if !first {
                        write!(f, ".")?;
                    }
                    write!(f, "\"{}\"", key.replace('\\', "\\\\").replace('"', "\\\""))?;
                }
                Step::Index(i) => write!(f, "[{i}]")?,
            }
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn q(s: &str) -> Query {
        s.parse().unwrap()
    }

    #[test]
    fn parse_and_quote() {
        assert_eq!(q("testb[0].testa[0]").to_string(), r#""testb"[0]."testa"[0]"#);
        assert_eq!(q("scripts.lint-fix").to_string(), r#""scripts"."lint-fix""#);
        assert_eq!(q(r#""a.b".c"#).to_string(), r#""a.b"."c""#);
        assert_eq!(q("").to_string(), "");
    }

    #[test]
    fn quoted_form_parses_back() {
        let query = q("provider.tracing[1]");
        assert_eq!(q(&query.to_string()), query);
    }

    #[test]
    fn select_nested_values() {
        let doc = json!({
            "provider": {"runtime": "nodejs14.x"},
            "plugins": ["a", "b"],
            "scripts": {"lint-fix": "eslint --fix"},
            "a.b": {"c": 1}
        });
        assert_eq!(q("provider.runtime").select(&doc), Some(&json!("nodejs14.x")));
        assert_eq!(q("plugins[1]").select(&doc), Some(&json!("b")));
        assert_eq!(q("scripts.lint-fix").select(&doc), Some(&json!("eslint --fix")));
        assert_eq!(q(r#""a.b".c"#).select(&doc), Some(&json!(1)));
        assert_eq!(q("").select(&doc), Some(&doc));
        assert_eq!(q("provider.missing").select(&doc), None);
        assert_eq!(q("plugins[5]").select(&doc), None);
        assert_eq!(q("provider[0]").select(&doc), None);
    }

    #[test]
    fn select_mut_rewrites_in_place() {
        let mut doc = json!({"service": "old"});
        *q("service").select_mut(&mut doc).unwrap() = json!("new");
        assert_eq!(doc, json!({"service": "new"}));
    }

    #[test]
    fn invalid_queries() {
        for bad in ["a..b", "a.", "a[x]", "a[1", "\"a", "a]b", ".a", "a.[0]", "a[0].[1]"] {
            assert!(bad.parse::<Query>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn leading_index_and_quoted_empty_key() {
        assert_eq!(q("[0].a").to_string(), r#"[0]."a""#);
        assert_eq!(q(r#"a."""#).to_string(), r#""a"."""#);
    }
}
