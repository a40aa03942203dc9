// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property-based tests using proptest.
//!
//! These tests check that the store and both loaders handle arbitrary keys
//! and scalar values correctly.

use cfgstore::adapters::{JsonLoader, MemoryFileSystem, YamlLoader};
use cfgstore::domain::{ConfigMap, ConfigValue};
use cfgstore::ports::{ConfigLoader, EncodeInput};
use cfgstore::store::ConfigStore;
use proptest::prelude::*;
use std::path::Path;
use std::sync::Arc;

const ASCII_KEY: &str = "[a-zA-Z_][a-zA-Z0-9_]{0,12}";
const ASCII_TEXT: &str = "[ -~]{0,24}";
const ANY_KEY: &str = "\\PC{1,12}";
const ANY_TEXT: &str = "\\PC{0,24}";

fn scalar(text: &'static str) -> impl Strategy<Value = ConfigValue> {
    prop_oneof![
        any::<bool>().prop_map(ConfigValue::Bool),
        any::<i64>().prop_map(ConfigValue::Integer),
        (-4000i32..4000).prop_map(|n| ConfigValue::Float(f64::from(n) / 4.0)),
        text.prop_map(ConfigValue::String),
    ]
}

fn value(key: &'static str, text: &'static str) -> impl Strategy<Value = ConfigValue> {
    scalar(text).prop_recursive(3, 24, 4, move |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(ConfigValue::Sequence),
            prop::collection::vec((key, inner), 0..4)
                .prop_map(|pairs| ConfigValue::Mapping(pairs.into_iter().collect())),
        ]
    })
}

fn mapping(key: &'static str, text: &'static str) -> impl Strategy<Value = ConfigMap> {
    prop::collection::vec((key, value(key, text)), 1..6)
        .prop_map(|pairs| pairs.into_iter().collect())
}

// Keyed writes are visible through attribute reads
proptest! {
    #[test]
    fn test_set_then_attr(key in "\\PC+", v in "\\PC*") {
        let v = ConfigValue::from(v);
        let mut store = ConfigStore::new();
        store.set(key.clone(), v.clone());
        prop_assert_eq!(store.attr(&key).unwrap().into_owned(), v);
    }
}

// Attribute writes are visible through keyed reads
proptest! {
    #[test]
    fn test_set_attr_then_get(key in "[a-z]{1,12}", v in scalar(ASCII_TEXT)) {
        prop_assume!(!["initialized", "file_path", "format_tag"].contains(&key.as_str()));
        let mut store = ConfigStore::new();
        store.set_attr(&key, v.clone()).unwrap();
        prop_assert_eq!(store.get(&key), Some(&v));
    }
}

// Any mapping survives a JSON save and load unchanged
proptest! {
    #[test]
    fn test_json_store_roundtrip(data in mapping(ASCII_KEY, ANY_TEXT)) {
        let fs = Arc::new(MemoryFileSystem::new());
        let mut store = ConfigStore::builder()
            .path("config.json")
            .loader(Box::new(JsonLoader::with_file_system(fs.clone())))
            .build()
            .unwrap();
        *store.to_mapping_mut() = data.clone();

        prop_assert!(store.save().unwrap());
        store.load().unwrap();
        prop_assert_eq!(store.to_mapping(), &data);
    }
}

// Any mapping survives a YAML encode and decode unchanged, including keys and
// strings with line breaks or other non-ASCII text
proptest! {
    #[test]
    fn test_yaml_loader_roundtrip(data in mapping(ANY_KEY, ANY_TEXT)) {
        let fs = Arc::new(MemoryFileSystem::new());
        let mut loader = YamlLoader::with_file_system(fs);
        let path = Path::new("config.yaml");

        prop_assert!(loader.encode(EncodeInput::Mapping(&data), Some(path)));
        let decoded = loader.decode(Some(path)).unwrap();
        prop_assert_eq!(decoded, ConfigValue::Mapping(data));
    }
}

// Key order is insertion order no matter how keys are named
proptest! {
    #[test]
    fn test_iteration_order(keys in prop::collection::hash_set("[a-z]{1,8}", 1..10)) {
        let keys: Vec<String> = keys.into_iter().collect();
        let mut store = ConfigStore::new();
        for (i, key) in keys.iter().enumerate() {
            store.set(key.clone(), i as i64);
        }

        let seen: Vec<&String> = store.keys().collect();
        prop_assert_eq!(seen, keys.iter().collect::<Vec<_>>());
        prop_assert_eq!(store.len(), keys.len());
    }
}

// Removing a key never disturbs the others
proptest! {
    #[test]
    fn test_remove_only_affects_key(
        data in mapping(ASCII_KEY, ASCII_TEXT),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut store = ConfigStore::new();
        *store.to_mapping_mut() = data.clone();
        let victim = pick.get(&data.keys().cloned().collect::<Vec<_>>()).clone();

        store.remove(&victim);

        prop_assert!(!store.has(&victim));
        for (key, value) in &data {
            if key != &victim {
                prop_assert_eq!(store.get(key), Some(value));
            }
        }
    }
}
