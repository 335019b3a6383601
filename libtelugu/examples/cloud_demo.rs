//! Example demonstrating online suggestions.
//!
//! Run with: cargo run --example cloud_demo telugu

use libtelugu::cloud::DEFAULT_INPUT_TOOL;
use libtelugu::{transliterate, CloudProvider, CloudSuggestions};
use std::time::Duration;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <itrans> [provider]", args[0]);
        eprintln!("Example: {} telugu", args[0]);
        std::process::exit(1);
    }

    let text = &args[1];
    let provider = args
        .get(2)
        .map(|p| CloudProvider::from_setting(p))
        .unwrap_or_default();

    println!("Cloud Suggestion Demo");
    println!("=====================\n");
    println!("Querying for: {} (offline: {})\n", text, transliterate(text));

    let cloud = match CloudSuggestions::new(provider, DEFAULT_INPUT_TOOL, Duration::from_secs(3)) {
        Ok(cloud) => cloud,
        Err(e) => {
            eprintln!("Failed to build client: {e}");
            std::process::exit(1);
        }
    };

    match cloud.query(text).await {
        Ok(results) if results.is_empty() => println!("No candidates returned"),
        Ok(results) => {
            println!("Got {} candidates:\n", results.len());
            for (i, candidate) in results.iter().enumerate() {
                println!("  {}. {}", i + 1, candidate);
            }
        }
        Err(e) => println!("Request failed: {e}"),
    }
}
