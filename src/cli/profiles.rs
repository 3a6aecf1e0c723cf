//! Profiles command implementation

use anyhow::Result;

use crate::budget::{OptimizationOptions, PRESETS};
use crate::domain::Config;

pub fn run(config: &Config) -> Result<()> {
    println!("Presets:");
    for (name, options) in PRESETS {
        println!("{}", describe(name, options, config));
    }

    if !config.profiles.is_empty() {
        println!();
        println!("Configured:");
        for (name, options) in &config.profiles {
            println!("{}", describe(name, options, config));
        }
    }
    Ok(())
}

fn describe(name: &str, options: &OptimizationOptions, config: &Config) -> String {
    let mut sections = Vec::new();
    if options.include_routes {
        sections.push("routes");
    }
    if options.include_data_sources {
        sections.push("data-sources");
    }
    if options.include_external_services {
        sections.push("external");
    }
    if options.include_configuration {
        sections.push("configuration");
    }
    if options.include_dependencies {
        sections.push("dependencies");
    }

    let mode = if options.include_full_xml { "full-xml".to_string() } else { sections.join(",") };
    let limit = options
        .max_length
        .map(|n| format!("{} chars", n))
        .unwrap_or_else(|| "unbounded".to_string());
    let marker = if name == config.default_profile { " (default)" } else { "" };
    format!("  {:<20} {:<12} {}{}", name, limit, mode, marker)
}
