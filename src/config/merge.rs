use serde_json::Value;

/// Deep-merge a sequence of JSON values, later values taking precedence.
///
/// Objects are merged key by key, arrays are concatenated, anything else is
/// replaced by the later value. Inputs are not modified.
pub fn merge_deep<'a, I>(values: I) -> Value
where
    I: IntoIterator<Item = &'a Value>,
{
    values
        .into_iter()
        .fold(Value::Object(Default::default()), |acc, next| {
            merge_pair(acc, next)
        })
}

fn merge_pair(prev: Value, next: &Value) -> Value {
    match (prev, next) {
        (Value::Object(mut prev_map), Value::Object(next_map)) => {
            for (key, next_val) in next_map {
                match prev_map.get_mut(key) {
                    Some(slot) => {
                        let prev_val = slot.take();
                        *slot = merge_value(prev_val, next_val);
                    }
                    None => {
                        prev_map.insert(key.clone(), next_val.clone());
                    }
                }
            }
            Value::Object(prev_map)
        }
        (_, next) => next.clone(),
    }
}

fn merge_value(prev: Value, next: &Value) -> Value {
    match (prev, next) {
        (Value::Array(mut prev_items), Value::Array(next_items)) => {
            prev_items.extend(next_items.iter().cloned());
            Value::Array(prev_items)
        }
        (prev @ Value::Object(_), Value::Object(_)) => merge_pair(prev, next),
        (_, next) => next.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn nested_objects_and_arrays() {
        let a = json!({"aa": 1, "bb": {"cc": {"dd": 1, "gg": 1}, "ee": 1, "ff": 1, "hh": [3]}});
        let b = json!({"aa": 2, "bb": {"cc": {"dd": 2}, "ee": 2, "hh": [1, 2]}});
        let merged = merge_deep([&a, &b]);
        assert_eq!(
            merged,
            json!({"aa": 2, "bb": {"cc": {"dd": 2, "gg": 1}, "ee": 2, "ff": 1, "hh": [3, 1, 2]}})
        );
    }

    #[test]
    fn inputs_untouched() {
        let a = json!({"x": [1]});
        let b = json!({"x": [2]});
        let _ = merge_deep([&a, &b]);
        assert_eq!(a, json!({"x": [1]}));
        assert_eq!(b, json!({"x": [2]}));
    }

    #[test]
    fn scalar_overwrites_object() {
        let a = json!({"x": {"y": 1}});
        let b = json!({"x": false});
        assert_eq!(merge_deep([&a, &b]), json!({"x": false}));
    }

    #[test]
    fn empty_sequence_is_empty_object() {
        let none: [&Value; 0] = [];
        assert_eq!(merge_deep(none), json!({}));
    }
}
