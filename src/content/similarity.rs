use crate::content::load_structured;
use crate::content::selector::Query;
use crate::errors::Result;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Key of the aggregate score in a partial similarity result.
pub const ALL: &str = "_all";

/// Per-attribute similarity percentages plus the [`ALL`] aggregate.
pub type Similarity = BTreeMap<String, f64>;

/// Character-level Levenshtein distance.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// How much of `reference` survives in `other`, as a percentage of the
/// reference length. Not symmetric.
pub fn text_similarity(reference: &str, other: &str) -> f64 {
    let len = reference.chars().count();
    if len == 0 {
        return if other.is_empty() { 100.0 } else { 0.0 };
    }
    let distance = levenshtein(reference, other);
    round2(((len as f64 - distance as f64) / len as f64 * 100.0).max(0.0))
}

/// Similarity of two strings relative to the longer one.
pub fn string_similarity(a: &str, b: &str) -> f64 {
    let max = a.chars().count().max(b.chars().count());
    if max == 0 {
        return 100.0;
    }
    let distance = levenshtein(a, b);
    round2((max as f64 - distance as f64) / max as f64 * 100.0)
}

/// Whole-file similarity of `file_b` against `file_a`.
pub fn full_content_similarity(file_a: &Path, file_b: &Path) -> Result<f64> {
    let a = std::fs::read_to_string(file_a)?;
    let b = std::fs::read_to_string(file_b)?;
    Ok(text_similarity(&a, &b))
}

/// Compare the parts of two structured files selected by queries.
pub fn partial_similarity(
    file_a: &Path,
    query_a: &Query,
    file_b: &Path,
    query_b: &Query,
    only_matching: bool,
) -> Result<Similarity> {
    let tree_a = load_structured(file_a)?;
    let tree_b = load_structured(file_b)?;
    Ok(value_similarity(
        query_a.select(&tree_a),
        query_b.select(&tree_b),
        only_matching,
    ))
}

/// Compare two selected values.
///
/// With `only_matching` and two objects sharing at least one key, each
/// shared key is scored on its own and [`ALL`] is their mean. Otherwise the
/// values are compared as a whole.
pub fn value_similarity(a: Option<&Value>, b: Option<&Value>, only_matching: bool) -> Similarity {
    let mut result = Similarity::new();

    if only_matching {
        if let (Some(Value::Object(map_a)), Some(Value::Object(map_b))) = (a, b) {
            for (key, value_a) in map_a {
                if let Some(value_b) = map_b.get(key) {
                    let score = whole_similarity(Some(value_a), Some(value_b));
                    result.insert(key.clone(), score);
                }
            }
            if !result.is_empty() {
                let mean = result.values().sum::<f64>() / result.len() as f64;
                result.insert(ALL.to_string(), round2(mean));
                return result;
            }
        }
    }

    result.insert(ALL.to_string(), whole_similarity(a, b));
    result
}

fn whole_similarity(a: Option<&Value>, b: Option<&Value>) -> f64 {
    match (stringify(a), stringify(b)) {
        (None, None) => 100.0,
        (Some(_), None) | (None, Some(_)) => 0.0,
        (Some(a), Some(b)) => string_similarity(&a, &b),
    }
}

/// Compact JSON text of a value; `None` for absent or empty values.
fn stringify(value: Option<&Value>) -> Option<String> {
    value.filter(|v| !is_empty_value(v)).map(Value::to_string)
}

/// Null, `""`, `{}` and `[]` count as empty.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
