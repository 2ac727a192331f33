//! Basic logger usage example
//!
//! Demonstrates queued console logging, level filtering and contexts.
//!
//! Run with: cargo run --example basic_usage

use logpipe::prelude::*;
use logpipe::{info, warning};
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== logpipe - Basic Usage Example ===\n");

    let logger = Logger::builder()
        .context("demo")
        .min_level(Level::Trace)
        .sink(ConsoleSink::new())
        .build();

    println!("1. Logging at every level (error and warning go to stderr):");
    logger.trace("This is a trace message");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warning("This is a warning message");
    logger.error("This is an error message");
    logger.flush_blocking(Duration::from_secs(1));

    println!("\n2. Filtering below info:");
    let quiet = Logger::builder()
        .context("quiet")
        .min_level(Level::Info)
        .sink(ConsoleSink::new())
        .build();
    quiet.debug("Debug message (hidden)");
    quiet.info("Info message (visible)");
    quiet.flush_blocking(Duration::from_secs(1));
    println!("   filtered: {}", quiet.metrics().filtered());

    println!("\n3. Mixed arguments and contexts:");
    let http = logger.contextualize("http", true);
    info!(http, "GET /health", 200, "in", 3.5, "ms");
    warning!(http, "admin"; "login attempt from", "10.0.0.7");
    http.error(Arg::from(&std::io::Error::new(
        std::io::ErrorKind::ConnectionReset,
        "peer went away",
    )));
    logger.flush_blocking(Duration::from_secs(1));

    println!("\n4. Colored output:");
    let colored = Logger::builder()
        .context("color")
        .sink(ColoredConsoleSink::new())
        .build();
    colored.info("green info");
    colored.warning("yellow warning");
    colored.flush_blocking(Duration::from_secs(1));

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
