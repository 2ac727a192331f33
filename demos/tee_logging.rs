//! Tee logging example
//!
//! One logger fans records out to a colored console and a file, each with
//! its own filter.
//!
//! Run with: cargo run --example tee_logging

use logpipe::prelude::*;
use std::sync::Arc;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== logpipe - Tee Logging Example ===\n");

    let console = Logger::builder()
        .context("console")
        .min_level(Level::Debug)
        .sink(ColoredConsoleSink::new())
        .build();
    let file = Logger::builder()
        .context("file")
        .min_level(Level::Warning)
        .sink(FileSink::new(FileSinkOptions::default().filename("tee.log"))?)
        .build();

    let tee = Logger::builder()
        .context("tee")
        .sink(TeeSink::new(vec![
            Arc::new(console.clone()) as Arc<dyn Log>,
            Arc::new(file.clone()) as Arc<dyn Log>,
        ]))
        .build();

    tee.trace("dropped by both children");
    tee.debug("console only");
    tee.info("console only");
    tee.warning("console and file");
    tee.log(Level::Error, "payments", vec![Arg::from("charge failed:"), Arg::from(402)]);

    let done = tee.flush_blocking(Duration::from_secs(5))
        && console.flush_blocking(Duration::from_secs(5))
        && file.flush_blocking(Duration::from_secs(5));

    println!("\nconsole delivered: {}", console.metrics().delivered());
    println!("file delivered:    {}", file.metrics().delivered());
    println!("\n=== Example completed (flushed: {}) ===", done);

    Ok(())
}
