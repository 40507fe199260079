//! Split one markdown document into a directory tree of table files.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use mtr_core::source::DEFAULT_EXTENSION;
use mtr_core::split::split_document;

#[derive(Parser)]
#[command(
    name = "mtr-split",
    about = "Split a markdown document into one table file per heading",
    version
)]
struct Cli {
    /// The document to split
    file: PathBuf,

    /// Directory to write the tables into
    #[arg(short, long, default_value = ".")]
    out: PathBuf,
}

fn run(file: &Path, out: &Path) -> Result<(), String> {
    let source = fs::read_to_string(file)
        .map_err(|e| format!("error reading {}: {e}", file.display()))?;
    let lines: Vec<&str> = source.lines().collect();
    let files = split_document(&lines, DEFAULT_EXTENSION);

    if files.is_empty() {
        return Err(format!("no tables found in {}", file.display()));
    }

    for table in &files {
        let path = out.join(&table.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("error making directory {}: {e}", parent.display()))?;
        }
        fs::write(&path, &table.content)
            .map_err(|e| format!("error writing {}: {e}", path.display()))?;
        println!("{}", table.path.display());
    }
    println!();
    println!("  {} tables", files.len());

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli.file, &cli.out) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
