// SPDX-License-Identifier: MIT OR Apache-2.0

//! Basic usage example for the cfgstore crate.
//!
//! This example demonstrates:
//! - Loading a YAML file into a store
//! - Keyed, attribute-style and typed access
//! - Saving changes and converting the file to JSON
//!
//! To run this example:
//! ```bash
//! cargo run --example basic_usage
//! ```

use cfgstore::prelude::*;
use std::fs;

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    println!("=== cfgstore: Basic Usage ===\n");

    let dir = tempfile::tempdir()?;
    let yaml_path = dir.path().join("config.yaml");
    fs::write(
        &yaml_path,
        "app:\n  name: MyApplication\ndatabase:\n  host: localhost\n  port: 5432\ndebug: true\n",
    )?;

    // Example 1: Open a file, picking the loader from its extension
    println!("--- Example 1: Loading ---");
    let mut store = ConfigStore::open(&yaml_path)?;
    println!(
        "Loaded {} keys with the {} loader",
        store.len(),
        store.format_tag().unwrap_or("unknown")
    );

    // Example 2: Keyed and attribute-style access see the same data
    println!("\n--- Example 2: Access ---");
    println!("debug = {}", store["debug"]);
    println!("database = {}", *store.attr("database")?);
    println!("initialized = {}", *store.attr("initialized")?);

    // Example 3: Typed access through serde
    println!("\n--- Example 3: Typed Values ---");
    #[derive(Debug, serde::Deserialize)]
    struct Database {
        host: String,
        port: u16,
    }
    let database: Database = store.get_as("database")?;
    println!("{:?}", database);

    // Example 4: Modify and save
    println!("\n--- Example 4: Saving ---");
    store.set("debug", false);
    store.set_attr("retries", 3)?;
    if store.save()? {
        println!("Saved:\n{}", fs::read_to_string(&yaml_path)?);
    }

    // Example 5: Convert to JSON by switching loaders
    println!("--- Example 5: Converting ---");
    let json_path = dir.path().join("config.json");
    store.set_loader(Box::new(JsonLoader::new()));
    if store.save_to(Some(&json_path))? {
        println!("{}", fs::read_to_string(&json_path)?);
    }

    Ok(())
}
