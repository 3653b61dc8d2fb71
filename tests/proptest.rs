use monolint::config::merge::merge_deep;
use monolint::config::{merge_configs, Config, RuleSetting};
use monolint::content::similarity::{string_similarity, text_similarity, value_similarity, ALL};
use monolint::modules::retain_leaves;
use proptest::prelude::*;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

fn rule_map() -> impl Strategy<Value = BTreeMap<String, bool>> {
    prop::collection::btree_map("[a-e]{1,2}", any::<bool>(), 0..6)
}

fn config(rules: &BTreeMap<String, bool>, markers: Vec<String>, extends: bool) -> Config {
    Config {
        module_markers: Some(markers),
        use_gitignore: None,
        extends: extends.then(|| vec!["monolint:basic".to_string()]),
        rules: Some(
            rules
                .iter()
                .map(|(k, v)| (k.clone(), RuleSetting::from(*v)))
                .collect(),
        ),
    }
}

fn module_path() -> impl Strategy<Value = PathBuf> {
    prop::collection::vec("[ab]{1,2}", 1..4).prop_map(|parts| parts.iter().collect())
}

proptest! {
    #[test]
    fn child_rules_override_parent(
        parent in rule_map(),
        child in rule_map(),
        markers_a in prop::collection::vec("[a-c]\\.json", 0..3),
        markers_b in prop::collection::vec("[a-c]\\.json", 0..3),
        extends_a in any::<bool>(),
        extends_b in any::<bool>(),
    ) {
        let merged = merge_configs(
            &config(&parent, markers_a.clone(), extends_a),
            &config(&child, markers_b.clone(), extends_b),
        );

        let mut expected = parent.clone();
        expected.extend(child.clone());
        let rules = merged.rules.clone().unwrap();
        prop_assert_eq!(rules.len(), expected.len());
        for (name, enabled) in expected {
            prop_assert_eq!(rules[&name].is_enabled(), enabled);
        }

        for marker in markers_a.iter().chain(markers_b.iter()) {
            prop_assert!(merged.markers().contains(marker));
        }
        prop_assert!(merged.extends.is_none());
    }

    #[test]
    fn deep_merge_keeps_every_key(
        a in prop::collection::btree_map("[a-d]", 0i64..10, 0..5),
        b in prop::collection::btree_map("[a-d]", 0i64..10, 0..5),
    ) {
        let va = serde_json::to_value(&a).unwrap();
        let vb = serde_json::to_value(&b).unwrap();
        let merged = merge_deep([&va, &vb]);
        let obj = merged.as_object().unwrap();
        for (k, v) in &a {
            if !b.contains_key(k) {
                prop_assert_eq!(&obj[k], &Value::from(*v));
            }
        }
        for (k, v) in &b {
            prop_assert_eq!(&obj[k], &Value::from(*v));
        }
    }

    #[test]
    fn identical_text_is_fully_similar(s in ".{0,40}") {
        prop_assert_eq!(text_similarity(&s, &s), 100.0);
        prop_assert_eq!(string_similarity(&s, &s), 100.0);
    }

    #[test]
    fn similarity_within_bounds(a in ".{0,30}", b in ".{0,30}") {
        let t = text_similarity(&a, &b);
        let s = string_similarity(&a, &b);
        prop_assert!((0.0..=100.0).contains(&t));
        prop_assert!((0.0..=100.0).contains(&s));
    }

    #[test]
    fn absent_against_present_is_zero(s in "[a-z]{1,10}") {
        let present = Value::String(s);
        prop_assert_eq!(value_similarity(None, Some(&present), true)[ALL], 0.0);
        prop_assert_eq!(value_similarity(Some(&present), None, true)[ALL], 0.0);
        prop_assert_eq!(value_similarity(None, None, true)[ALL], 100.0);
    }

    #[test]
    fn no_module_contains_another(paths in prop::collection::vec(module_path(), 0..12)) {
        let leaves = retain_leaves(paths.clone(), |p| p.as_path());
        for a in &leaves {
            for b in &leaves {
                if a != b {
                    prop_assert!(!b.starts_with(a), "{} contains {}", a.display(), b.display());
                }
            }
        }
        for path in &paths {
            let covered = leaves.iter().any(|leaf: &PathBuf| leaf.starts_with(Path::new(path)));
            prop_assert!(covered, "{} lost", path.display());
        }
    }
}
