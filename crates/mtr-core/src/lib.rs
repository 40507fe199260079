//! Random table engine for markdown table libraries.
//!
//! Parses hand-written list and range tables into weighted [`RollableTable`]s,
//! rolls them with optional dice headers (`2d6`, `d66`), and resolves
//! references between tables so one roll can pull results from many.

pub mod config;
pub mod dice;
pub mod error;
pub mod format;
pub mod resolve;
pub mod source;
pub mod split;
pub mod table;

pub use config::RollerConfig;
pub use dice::{DiceRoll, DiceSpec, Interpretation};
pub use error::{TableError, TableResult};
pub use format::{RangeRow, TableFormat, detect_format};
pub use resolve::{Reference, Resolver, find_reference};
pub use source::{DirectorySource, MemorySource, TableSource, TableText, list_tables, load_table};
pub use table::{Roll, RollableTable, TableEntry, TableRow};
