use colored::Colorize;
use mtr_core::RollerConfig;
use mtr_core::source::{ListingKind, list_tables};

pub fn run(config: &RollerConfig, query: &str) -> Result<(), String> {
    let listing =
        list_tables(&config.root, query, &config.extension).map_err(|e| e.to_string())?;

    if listing.is_empty() {
        println!("  No tables found.");
        return Ok(());
    }

    for entry in &listing {
        let line = format!("{}{}", "-".repeat(entry.depth), entry.label);
        match entry.kind {
            ListingKind::Directory => println!("{}", line.purple()),
            ListingKind::Table => println!("{}", line.yellow()),
        }
    }

    Ok(())
}
