//! Error types for table parsing, rolling, and reference resolution.

use std::path::PathBuf;

/// Errors that can occur while building or rolling a table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// None of the first lines looked like a list or a range table, or a
    /// range table had no usable rows.
    #[error("'{name}' is not a rollable table")]
    NotATable {
        /// Display name of the offending table.
        name: String,
    },

    /// A range-table row whose roll column is neither a number nor a range.
    #[error("bad row range value: '{row}'")]
    MalformedRow {
        /// The raw roll column.
        row: String,
    },

    /// A table could not be found, read, or parsed.
    #[error("couldn't load table '{target}': {reason}")]
    LookupFailed {
        /// The requested table name or path.
        target: String,
        /// Why the lookup failed.
        reason: String,
    },

    /// The dice produced a value that has no entry in the table.
    #[error("table '{table}' has no entry for roll {value}")]
    InvariantViolation {
        /// Display name of the table.
        table: String,
        /// The value that was drawn.
        value: u32,
    },

    /// Reference resolution nested deeper than the configured limit.
    #[error("reference to '{target}' nested {depth} levels deep, giving up (cyclic reference?)")]
    CyclicReference {
        /// The reference target that would have exceeded the limit.
        target: String,
        /// The nesting depth reached.
        depth: usize,
    },

    /// Filesystem access failed.
    #[error("error reading {}: {source}", path.display())]
    Io {
        /// The path being read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl TableError {
    /// Shorthand for a [`TableError::LookupFailed`].
    pub fn lookup(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LookupFailed {
            target: target.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience result type for table operations.
pub type TableResult<T> = Result<T, TableError>;
