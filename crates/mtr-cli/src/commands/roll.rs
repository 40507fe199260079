use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use mtr_core::table::MISSING_REPORT_LIMIT;
use mtr_core::{Resolver, RollableTable, RollerConfig, load_table};

pub fn run(config: &RollerConfig, name: &str, show: bool, json: bool) -> Result<(), String> {
    let source = config.source();
    tracing::debug!(root = %source.root().display(), table = name, "loading table");
    let table = load_table(&source, name).map_err(|e| e.to_string())?;

    if show {
        print_table(&table);
    }

    let resolver = Resolver::new(&source).with_max_depth(config.max_depth);
    let mut rng = config.rng();
    let roll = resolver.roll(&table, &mut rng).map_err(|e| e.to_string())?;

    if json {
        let out = serde_json::to_string_pretty(&roll).map_err(|e| e.to_string())?;
        println!("{out}");
    } else {
        println!("{}", roll.text);
    }

    Ok(())
}

fn print_table(table: &RollableTable) {
    let mut out = Table::new();
    out.set_content_arrangement(ContentArrangement::Dynamic);
    out.set_header(vec![table.dice().to_string(), table.name().to_string()]);

    for row in table.rows() {
        let range = if row.min == row.max {
            row.min.to_string()
        } else {
            format!("{}-{}", row.min, row.max)
        };
        out.add_row(vec![range, row.text]);
    }

    println!("{out}");

    let missing = table.missing_outcomes();
    if !missing.is_empty() {
        let mut values: Vec<String> = missing.iter().map(u32::to_string).collect();
        if missing.len() == MISSING_REPORT_LIMIT {
            values.push("...".to_string());
        }
        eprintln!(
            "{}",
            format!("  warning: no entry for rolls {}", values.join(", ")).yellow()
        );
    }
    println!();
}
