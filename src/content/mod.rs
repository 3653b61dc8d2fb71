//! Structured file contents and the similarity engine built on them.

pub mod makefile;
pub mod selector;
pub mod similarity;

use crate::errors::{MonolintError, Result};
use serde_json::{Map, Value};
use std::path::Path;

/// File formats that can be loaded as a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    Json,
    Yaml,
    Makefile,
}

impl ContentFormat {
    pub fn detect(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        if file_name == "Makefile" || file_name == "makefile" || file_name == "GNUmakefile" {
            return Some(ContentFormat::Makefile);
        }
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(ContentFormat::Json),
            "yml" | "yaml" => Some(ContentFormat::Yaml),
            "mk" => Some(ContentFormat::Makefile),
            _ => None,
        }
    }
}

/// Load a JSON, YAML or Makefile as a generic JSON tree.
pub fn load_structured(path: &Path) -> Result<Value> {
    let format = ContentFormat::detect(path).ok_or_else(|| MonolintError::UnsupportedFormat {
        file: path.to_path_buf(),
    })?;
    let content = std::fs::read_to_string(path)?;
    parse_structured(path, &content, format)
}

pub fn parse_structured(path: &Path, content: &str, format: ContentFormat) -> Result<Value> {
    let parse_err = |message: String| MonolintError::ContentParse {
        file: path.to_path_buf(),
        message,
    };
    match format {
        ContentFormat::Json => serde_json::from_str(content).map_err(|e| parse_err(e.to_string())),
        ContentFormat::Yaml => {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(content).map_err(|e| parse_err(e.to_string()))?;
            yaml_to_json(yaml).map_err(parse_err)
        }
        ContentFormat::Makefile => Ok(makefile::parse_makefile(content)),
    }
}

/// Convert a YAML tree to JSON.
///
/// CloudFormation-style tags become single-key objects: `!Ref x` turns
/// into `{"Ref": x}` and any other `!Tag x` into `{"Fn::Tag": x}`.
pub fn yaml_to_json(value: serde_yaml::Value) -> std::result::Result<Value, String> {
    use serde_yaml::Value as Yaml;

    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<std::result::Result<_, _>>()?,
        ),
        Yaml::Mapping(mapping) => {
            let mut map = Map::new();
            for (k, v) in mapping {
                map.insert(yaml_key(k)?, yaml_to_json(v)?);
            }
            Value::Object(map)
        }
        Yaml::Tagged(tagged) => {
            let tag = tagged.tag.to_string();
            let tag = tag.trim_start_matches('!');
            let key = if tag == "Ref" {
                "Ref".to_string()
            } else {
                format!("Fn::{tag}")
            };
            let mut map = Map::new();
            map.insert(key, yaml_to_json(tagged.value)?);
            Value::Object(map)
        }
    })
}

fn yaml_key(key: serde_yaml::Value) -> std::result::Result<String, String> {
    use serde_yaml::Value as Yaml;
    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Null => Ok("null".to_string()),
        other => Err(format!("unsupported mapping key {other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::path::PathBuf;

    #[test]
    fn detect_formats() {
        assert_eq!(
            ContentFormat::detect(Path::new("a/package.json")),
            Some(ContentFormat::Json)
        );
        assert_eq!(
            ContentFormat::detect(Path::new("serverless.YML")),
            Some(ContentFormat::Yaml)
        );
        assert_eq!(
            ContentFormat::detect(Path::new("x/Makefile")),
            Some(ContentFormat::Makefile)
        );
        assert_eq!(ContentFormat::detect(Path::new("LICENSE")), None);
    }

    #[test]
    fn yaml_with_cloudformation_tags() {
        let yaml = r#"
service: svc
provider:
  runtime: nodejs14.x
  role: !Ref LambdaRole
  arn: !GetAtt Bucket.Arn
"#;
        let value =
            parse_structured(&PathBuf::from("serverless.yml"), yaml, ContentFormat::Yaml).unwrap();
        assert_eq!(
            value,
            json!({
                "service": "svc",
                "provider": {
                    "runtime": "nodejs14.x",
                    "role": {"Ref": "LambdaRole"},
                    "arn": {"Fn::GetAtt": "Bucket.Arn"}
                }
            })
        );
    }

    #[test]
    fn malformed_json_is_content_error() {
        let err = parse_structured(&PathBuf::from("a.json"), "{", ContentFormat::Json).unwrap_err();
        assert!(matches!(err, MonolintError::ContentParse { .. }));
    }

    #[test]
    fn unsupported_format() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("LICENSE");
        std::fs::write(&path, "MIT").unwrap();
        let err = load_structured(&path).unwrap_err();
        assert!(matches!(err, MonolintError::UnsupportedFormat { .. }));
    }
}
