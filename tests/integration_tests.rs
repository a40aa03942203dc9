// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the configuration store.
//!
//! These tests drive the store against real files in temporary directories
//! and against the in-memory file system.

mod common;

use cfgstore::adapters::{JsonLoader, LoaderRegistry, MemoryFileSystem, YamlLoader};
use cfgstore::domain::{ConfigError, ConfigMap, ConfigValue};
use cfgstore::ports::{ConfigLoader, EncodeInput};
use cfgstore::store::ConfigStore;
use common::{temp_config, PropertiesLoader};
use std::fs;
use std::path::Path;
use std::sync::Arc;

#[test]
fn test_load_json_file() {
    let (_dir, path) = temp_config(
        "config.json",
        r#"{"name": "servo", "limits": {"max": 10}, "tags": ["a", "b"]}"#,
    );

    let store = ConfigStore::open(&path).unwrap();

    assert!(store.is_initialized());
    assert_eq!(store.format_tag(), Some("json"));
    assert_eq!(store["name"], "servo");
    assert_eq!(*store.attr("name").unwrap(), "servo");
    assert_eq!(
        store["limits"].as_mapping().unwrap()["max"].as_i64(),
        Some(10)
    );
    assert_eq!(store["tags"].as_sequence().unwrap().len(), 2);
}

#[test]
fn test_load_yaml_file() {
    let (_dir, path) = temp_config(
        "config.yml",
        "name: servo\nlimits:\n  max: 10\ntags:\n  - a\n  - b\n",
    );

    let store = ConfigStore::open(&path).unwrap();

    assert!(store.is_initialized());
    assert_eq!(store.format_tag(), Some("yaml"));
    for key in ["name", "limits", "tags"] {
        assert!(store.has(key));
        assert_eq!(*store.attr(key).unwrap(), store[key]);
    }
}

#[test]
fn test_load_non_mapping_files() {
    let cases = [
        ("list.json", "[1, 2, 3]"),
        ("scalar.json", "42"),
        ("list.yaml", "- 1\n- 2\n"),
        ("scalar.yaml", "just a string\n"),
        ("empty.yaml", ""),
    ];

    for (name, content) in cases {
        let (_dir, path) = temp_config(name, content);
        let mut store = ConfigStore::builder()
            .path(&path)
            .detect_format()
            .build()
            .unwrap();

        let result = store.load();
        assert!(
            matches!(result, Err(ConfigError::InvalidConfig { .. })),
            "{}: {:?}",
            name,
            result
        );
        assert!(!store.is_initialized());
    }
}

#[test]
fn test_load_empty_mapping() {
    for (name, content) in [("empty.json", "{}"), ("empty.yaml", "{}\n")] {
        let (_dir, path) = temp_config(name, content);
        let result = ConfigStore::open(&path);
        assert!(matches!(result, Err(ConfigError::InvalidConfig { .. })));
    }
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();

    for name in ["non_existent_file.json", "non_existent_file.yaml"] {
        let result = ConfigStore::open(dir.path().join(name));
        assert!(matches!(result, Err(ConfigError::MissingFile { .. })));
    }
}

#[test]
fn test_load_malformed_file() {
    let (_dir, path) = temp_config("broken.json", "{\"key\": ");
    assert!(matches!(
        ConfigStore::open(&path),
        Err(ConfigError::Decode { .. })
    ));

    let (_dir, path) = temp_config("broken.yaml", "key: [unclosed\n");
    assert!(matches!(
        ConfigStore::open(&path),
        Err(ConfigError::Decode { .. })
    ));
}

#[test]
fn test_yaml_tags_are_rejected() {
    let (_dir, path) = temp_config("tagged.yaml", "value: !custom 1\n");
    assert!(matches!(
        ConfigStore::open(&path),
        Err(ConfigError::Decode { .. })
    ));
}

#[test]
fn test_roundtrip_both_formats() {
    let dir = tempfile::tempdir().unwrap();
    let json: Box<dyn ConfigLoader> = Box::new(JsonLoader::new());
    let yaml: Box<dyn ConfigLoader> = Box::new(YamlLoader::new());
    let loaders = vec![(json, "roundtrip.json"), (yaml, "roundtrip.yaml")];

    for (mut loader, name) in loaders {
        let path = dir.path().join(name);
        let mut data = ConfigMap::new();
        data.insert("key".to_string(), ConfigValue::from("value"));

        assert!(loader.encode(EncodeInput::Mapping(&data), Some(&path)));
        let decoded = loader.decode(Some(&path)).unwrap();
        assert_eq!(decoded, ConfigValue::Mapping(data));
    }
}

#[test]
fn test_save_and_reload_json() {
    let (_dir, path) = temp_config("config.json", r#"{"key": "value"}"#);
    let mut store = ConfigStore::open(&path).unwrap();

    store.set("key", "new_value");
    store.set("count", 3);
    assert!(store.save().unwrap());

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "{\n    \"key\": \"new_value\",\n    \"count\": 3\n}"
    );

    let reloaded = ConfigStore::open(&path).unwrap();
    assert_eq!(reloaded.to_mapping(), store.to_mapping());
}

#[test]
fn test_save_and_reload_yaml() {
    let (_dir, path) = temp_config(
        "config.yaml",
        "database:\n  host: localhost\n  port: 5432\nmotors:\n  - id: 1\n    name: base\n",
    );
    let mut store = ConfigStore::open(&path).unwrap();
    assert!(store.save().unwrap());

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "database:\n    host: localhost\n    port: 5432\nmotors:\n    -   id: 1\n        name: base\n"
    );

    let reloaded = ConfigStore::open(&path).unwrap();
    assert_eq!(reloaded.to_mapping(), store.to_mapping());
}

#[cfg(unix)]
#[test]
fn test_save_preserves_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, path) = temp_config("config.json", r#"{"key": "value"}"#);
    fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();

    let mut store = ConfigStore::open(&path).unwrap();
    store.set("key", "other");
    assert!(store.save().unwrap());

    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_save_into_missing_directory_returns_false() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("config.json");

    let mut store = ConfigStore::builder()
        .path(&path)
        .detect_format()
        .build()
        .unwrap();
    store.set("key", "value");

    assert!(!store.save().unwrap());
    assert_eq!(store["key"], "value");
    assert!(!path.exists());
}

#[test]
fn test_convert_between_formats() {
    let (dir, path) = temp_config("config.yaml", "key: value\nlist:\n  - 1\n  - 2\n");
    let mut store = ConfigStore::open(&path).unwrap();

    let json_path = dir.path().join("config.json");
    store.set_loader_by_tag("json").unwrap();
    assert!(store.save_to(Some(&json_path)).unwrap());
    assert_eq!(store.file_path(), Some(json_path.as_path()));

    let converted = ConfigStore::open(&json_path).unwrap();
    assert_eq!(converted.to_mapping(), store.to_mapping());
}

#[test]
fn test_mocked_file_system_scenario() {
    let fs = Arc::new(MemoryFileSystem::new().with_file("config.json", r#"{"key": "value"}"#));
    let mut store = ConfigStore::builder()
        .path("config.json")
        .loader(Box::new(JsonLoader::with_file_system(fs)))
        .build()
        .unwrap();

    store.load().unwrap();

    assert!(store.is_initialized());
    assert_eq!(store["key"], "value");
}

#[test]
fn test_mocked_write_failure() {
    let fs = Arc::new(MemoryFileSystem::new().with_file("config.yaml", "key: value\n"));
    let mut store = ConfigStore::builder()
        .path("config.yaml")
        .format("yaml")
        .file_system(fs.clone())
        .build()
        .unwrap();
    store.load().unwrap();

    fs.fail_writes(true);
    store.set("key", "changed");
    assert!(!store.save().unwrap());

    assert_eq!(store["key"], "changed");
    assert!(store.is_initialized());
    assert_eq!(fs.contents("config.yaml").unwrap(), "key: value\n");
}

#[test]
fn test_mocked_read_failure() {
    let fs = Arc::new(MemoryFileSystem::new().with_file("config.json", r#"{"key": "value"}"#));
    fs.fail_reads(true);
    let mut store = ConfigStore::builder()
        .path("config.json")
        .format("json")
        .file_system(fs)
        .build()
        .unwrap();

    assert!(matches!(store.load(), Err(ConfigError::IoError(_))));
    assert!(!store.is_initialized());
}

#[test]
fn test_invalid_loader_tag() {
    let mut store = ConfigStore::new();
    let result = store.set_loader_by_tag("InvalidLoader");
    assert!(matches!(result, Err(ConfigError::InvalidArgument { .. })));
    assert!(store.loader().is_none());
}

#[test]
fn test_keyed_and_attribute_views_agree() {
    let fs = Arc::new(MemoryFileSystem::new());
    let mut store = ConfigStore::builder()
        .path("config.json")
        .loader(Box::new(JsonLoader::with_file_system(fs)))
        .build()
        .unwrap();

    store.set("key", "value");
    assert_eq!(*store.attr("key").unwrap(), "value");

    store.set_attr("other", "value2").unwrap();
    assert_eq!(store["other"], "value2");

    store.remove("key");
    assert!(matches!(
        store.attr("key"),
        Err(ConfigError::AttributeNotFound { .. })
    ));
}

#[test]
fn test_custom_loader() {
    let fs = Arc::new(
        MemoryFileSystem::new().with_file("app.properties", "# comment\nhost = localhost\nport=80\n"),
    );
    let mut store = ConfigStore::builder()
        .path("app.properties")
        .loader(Box::new(PropertiesLoader::new(fs.clone())))
        .build()
        .unwrap();

    store.load().unwrap();
    assert_eq!(store.format_tag(), Some("properties"));
    assert_eq!(store["host"], "localhost");

    store.set("port", "8080");
    assert!(store.save().unwrap());
    assert_eq!(
        fs.contents("app.properties").unwrap(),
        "host=localhost\nport=8080\n"
    );
}

#[test]
fn test_custom_loader_through_registry() {
    let fs = Arc::new(MemoryFileSystem::new().with_file("app.properties", "a=1\n"));
    let mut registry = LoaderRegistry::with_builtins();
    registry.register("properties", &["properties"], |fs| {
        Box::new(PropertiesLoader::new(fs))
    });

    let loader = registry
        .for_path_with(Path::new("app.properties"), fs)
        .unwrap();
    let mut store = ConfigStore::new();
    store
        .load_with(Some(loader), Some(Path::new("app.properties")))
        .unwrap();

    assert_eq!(store["a"], "1");
    assert_eq!(store.file_path(), Some(Path::new("app.properties")));
}

#[test]
fn test_typed_access_after_load() {
    #[derive(Debug, serde::Deserialize, PartialEq)]
    struct Database {
        host: String,
        port: u16,
    }

    let (_dir, path) = temp_config("config.yaml", "database:\n  host: db\n  port: 5432\n");
    let store = ConfigStore::open(&path).unwrap();

    let database: Database = store.get_as("database").unwrap();
    assert_eq!(
        database,
        Database {
            host: "db".to_string(),
            port: 5432
        }
    );
}
