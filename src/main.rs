//! blueprint-lens: analyze Camel Blueprint descriptors and build budgeted LLM context
//!
//! The command-line front end over the `blueprint_lens` library: extraction,
//! external-service detection, secret redaction and context budgeting.

use anyhow::Result;

fn main() -> Result<()> {
    blueprint_lens::cli::run()
}
