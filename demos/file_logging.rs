//! File logging example
//!
//! Demonstrates dated log files and the tab-separated line layout.
//!
//! Run with: cargo run --example file_logging

use logpipe::prelude::*;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== logpipe - File Logging Example ===\n");

    let options = FileSinkOptions::default()
        .filename("__PREFIX__-__DATE__.log")
        .date_format("yyyy-mm-dd")
        .prefix("application");
    let logger = Logger::builder()
        .context("app")
        .sink(FileSink::new(options)?)
        .build();

    println!("1. Logging application lifecycle:");
    logger.info("Application started");
    logger.debug("Loading configuration...");
    logger.info("Configuration loaded successfully");
    logger.warning("Using default settings for some options");
    logger.error("Failed to load optional plugin");

    println!("2. Multi-line payloads stay on one line:");
    logger.info("stack trace:\n  at main\n  at run");

    println!("3. Per-subsystem contexts:");
    let db = logger.contextualize("db", true);
    for i in 1..=5 {
        db.info(vec![Arg::from("processing item"), Arg::from(i), Arg::from("of"), Arg::from(5)]);
    }

    println!("4. Options from JSON:");
    let audit = Logger::new(FileSink::from_json(serde_json::json!({
        "filename": "audit.log",
        "encoding": "UTF-8",
    }))?);
    audit.warning("configuration reloaded");

    let written = logger.flush_blocking(Duration::from_secs(5))
        && audit.flush_blocking(Duration::from_secs(5));

    println!("\n=== Example completed (all records written: {}) ===", written);
    println!("Check 'application-<date>.log' and 'audit.log' for the output");

    Ok(())
}
