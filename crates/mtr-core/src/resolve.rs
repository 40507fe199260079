//! Nested table references.
//!
//! Outcome text can point at other tables with a markdown link
//! (`[label](target)`) or a wiki link (`[[target]]`, `[[target|label]]`).
//! Rolling through a [`Resolver`] rolls each referenced table and splices its
//! result into the text, recursively.

use std::ops::Range;
use std::sync::LazyLock;

use rand::rngs::StdRng;
use regex::Regex;

use crate::error::{TableError, TableResult};
use crate::source::{TableSource, load_table};
use crate::table::{Roll, RollableTable};

/// Default limit on how deeply references may nest.
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Matches `[[target]]`, `[[target|label]]`, or `[label](target)`.
static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\[\[(?P<wiki>[^\[\]|]+)(?:\|(?P<wiki_label>[^\[\]]*))?\]\]|\[(?P<label>[^\[\]]+)\]\((?P<link>[^()]+)\)",
    )
    .expect("valid reference pattern")
});

/// A reference to another table inside outcome text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Byte range of the whole reference in the text.
    pub span: Range<usize>,
    /// The table name or path to roll.
    pub target: String,
    /// The link label, if any.
    pub label: Option<String>,
}

/// Find the first reference in `text`.
pub fn find_reference(text: &str) -> Option<Reference> {
    REFERENCE.captures(text).and_then(|caps| reference_from(&caps))
}

fn reference_from(caps: &regex::Captures<'_>) -> Option<Reference> {
    let span = caps.get(0)?.range();
    let (target, label) = match caps.name("wiki") {
        Some(wiki) => (wiki, caps.name("wiki_label")),
        None => (caps.name("link")?, caps.name("label")),
    };
    Some(Reference {
        span,
        target: target.as_str().trim().to_string(),
        label: label.map(|l| l.as_str().to_string()),
    })
}

/// Rolls tables and substitutes their references through a [`TableSource`].
pub struct Resolver<'a, S: TableSource + ?Sized> {
    source: &'a S,
    max_depth: usize,
}

impl<'a, S: TableSource + ?Sized> Resolver<'a, S> {
    /// Create a resolver that looks tables up in `source`.
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Limit how deeply references may nest before giving up.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Load the table named `target`, roll it, and resolve its result.
    ///
    /// Unlike references inside results, a top-level table that can't be
    /// loaded is an error.
    pub fn roll_target(&self, target: &str, rng: &mut StdRng) -> TableResult<Roll> {
        let table = load_table(self.source, target)?;
        self.roll(&table, rng)
    }

    /// Roll `table` and resolve any references in the result.
    pub fn roll(&self, table: &RollableTable, rng: &mut StdRng) -> TableResult<Roll> {
        let mut roll = table.roll(rng)?;
        roll.text = self.resolve_at(&roll.text, 1, rng)?;
        Ok(roll)
    }

    /// Replace every reference in `text` with a roll on the referenced table.
    ///
    /// When a referenced table can't be loaded, the reference is left in
    /// place and resolution of this text stops there.
    pub fn resolve(&self, text: &str, rng: &mut StdRng) -> TableResult<String> {
        self.resolve_at(text, 0, rng)
    }

    fn resolve_at(&self, text: &str, depth: usize, rng: &mut StdRng) -> TableResult<String> {
        let mut result = text.to_string();
        // Substituted text is already resolved, so scanning resumes after it.
        let mut offset = 0;
        while let Some(found) = find_reference(&result[offset..]) {
            let reference = Reference {
                span: found.span.start + offset..found.span.end + offset,
                ..found
            };
            if depth >= self.max_depth {
                return Err(TableError::CyclicReference {
                    target: reference.target,
                    depth,
                });
            }

            let table = match load_table(self.source, &reference.target) {
                Ok(table) => table,
                Err(e) => {
                    tracing::warn!(reference = %reference.target, "leaving reference unresolved: {e}");
                    return Ok(result);
                }
            };
            tracing::debug!(reference = %reference.target, depth, "resolving reference");

            let roll = table.roll(rng)?;
            let replacement = self.resolve_at(&roll.text, depth + 1, rng)?;
            offset = reference.span.start + replacement.len();
            result.replace_range(reference.span, &replacement);
        }
        Ok(result)
    }
}
