//! CLI frontend for the markdown table roller.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::Parser;
use mtr_core::RollerConfig;
use mtr_core::resolve::DEFAULT_MAX_DEPTH;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, eg. `MTR_LOG=debug`.
const LOG_ENV: &str = "MTR_LOG";

#[derive(Parser)]
#[command(
    name = "mtr",
    about = "Roll on random tables kept as markdown files",
    version,
    after_help = "TABLE is the name of a markdown file in the table directory or one of its \
                  subdirectories. The '.md' extension is optional and it may contain path \
                  components. Examples: 'Weapons', 'weapons', 'weapons.md', 'Items/Weapons.md'"
)]
struct Cli {
    /// Table to roll on (or, with --list, a filter for table names)
    table: Option<String>,

    /// List available tables instead of rolling
    #[arg(short, long)]
    list: bool,

    /// Directory containing the tables
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// RNG seed for reproducible rolls
    #[arg(short, long)]
    seed: Option<u64>,

    /// How deeply table references may nest
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Print the parsed table before rolling
    #[arg(long)]
    show: bool,

    /// Print the roll as JSON
    #[arg(long)]
    json: bool,

    /// Log dice rolls and reference lookups to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// Map the historical flag spellings (`-ls`, `-help`, `\h`, ...) onto the
/// ones clap understands.
fn normalize_args(args: impl IntoIterator<Item = String>) -> Vec<String> {
    args.into_iter()
        .map(|arg| match arg.as_str() {
            "--h" | "-help" | "\\h" | "\\help" => "--help".to_string(),
            "-ls" | "--ls" | "-list" | "\\ls" | "\\list" => "--list".to_string(),
            _ => arg,
        })
        .collect()
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() {
    let cli = Cli::parse_from(normalize_args(std::env::args()));
    init_tracing(cli.verbose);

    let config = RollerConfig::default()
        .with_root(cli.dir)
        .with_seed(cli.seed)
        .with_max_depth(cli.max_depth);

    let result = if cli.list {
        commands::list::run(&config, cli.table.as_deref().unwrap_or(""))
    } else {
        match cli.table.as_deref() {
            Some(table) => commands::roll::run(&config, table, cli.show, cli.json),
            None => Err("please provide a table name (see --help)".into()),
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
