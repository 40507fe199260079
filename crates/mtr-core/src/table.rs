//! Weighted roll tables.
//!
//! A [`RollableTable`] maps every possible roll value to an entry. Range rows
//! like `| 4-6 | Goblins |` store their text once, at the first key of the
//! range, and point the remaining keys at it with a [`TableEntry::Redirect`].
//! A redirect always targets a literal, so every lookup takes at most one hop.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::LazyLock;

use rand::rngs::StdRng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::dice::DiceSpec;
use crate::error::{TableError, TableResult};
use crate::format::{self, RangeRow, TableFormat};

/// A roll column holding a single value, eg. `7`.
static SINGLE_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)$").expect("valid single value pattern"));

/// A roll column holding a range, eg. `5-12` or `5–12`.
static VALUE_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*[-–]\s*(\d+)$").expect("valid range pattern"));

/// Widest span of values a single range row may cover.
pub const MAX_ROW_SPAN: u32 = 100_000;

/// Most unreachable roll values [`RollableTable::missing_outcomes`] reports.
pub const MISSING_REPORT_LIMIT: usize = 20;

/// A stored table entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableEntry {
    /// The outcome text.
    Literal(String),
    /// Part of a range whose text is stored at another key.
    Redirect(u32),
}

/// A contiguous span of roll values sharing one outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// Lowest roll value for this outcome.
    pub min: u32,
    /// Highest roll value for this outcome.
    pub max: u32,
    /// The outcome text.
    pub text: String,
}

/// The outcome of rolling a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roll {
    /// Name of the table that was rolled.
    pub table: String,
    /// The dice the table was rolled with.
    pub dice: DiceSpec,
    /// Individual die values.
    pub rolled: Vec<u32>,
    /// The combined roll value used for the lookup.
    pub value: u32,
    /// The outcome text.
    pub text: String,
}

/// A table that can be rolled on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollableTable {
    name: String,
    entries: BTreeMap<u32, TableEntry>,
    max: u32,
    dice: DiceSpec,
}

/// Parse a roll column into an inclusive `(min, max)` range.
///
/// Accepts `K`, `min-max`, and `min–max`. Reversed ranges are swapped.
pub fn parse_range(column: &str) -> Option<(u32, u32)> {
    let column = column.trim();
    if let Some(caps) = SINGLE_VALUE.captures(column) {
        let value = caps[1].parse().ok()?;
        return Some((value, value));
    }
    let caps = VALUE_RANGE.captures(column)?;
    let a: u32 = caps[1].parse().ok()?;
    let b: u32 = caps[2].parse().ok()?;
    Some((a.min(b), a.max(b)))
}

impl RollableTable {
    /// Parse a table from its source lines.
    ///
    /// The format is fixed by the first list item or table row within
    /// [`format::DETECTION_WINDOW`] lines.
    pub fn parse<S: AsRef<str>>(name: impl Into<String>, lines: &[S]) -> TableResult<Self> {
        let name = name.into();
        match format::detect_format(lines) {
            Some((TableFormat::List, start)) => {
                Self::from_list(name, format::extract_list(&lines[start..]))
            }
            Some((TableFormat::RangeTable, start)) => {
                Self::from_range_rows(name, &format::extract_range_rows(&lines[start..]))
            }
            None => Err(TableError::NotATable { name }),
        }
    }

    /// Build a table where every entry is equally likely, keyed 1..=N.
    pub fn from_list(name: impl Into<String>, items: Vec<String>) -> TableResult<Self> {
        let name = name.into();
        let max = u32::try_from(items.len()).unwrap_or(u32::MAX);
        let Some(dice) = DiceSpec::uniform(max) else {
            return Err(TableError::NotATable { name });
        };
        let entries = (1..=max)
            .zip(items)
            .map(|(key, text)| (key, TableEntry::Literal(text)))
            .collect();
        Ok(Self {
            name,
            entries,
            max,
            dice,
        })
    }

    /// Build a table from range rows.
    ///
    /// Rows whose roll column isn't a number or range, or whose range spans
    /// more than [`MAX_ROW_SPAN`] values, are skipped. When rows
    /// overlap, values already claimed by an earlier row keep their outcome.
    /// Dice come from the first row's roll column (eg. a `2d6` header),
    /// defaulting to a single die covering the whole table.
    pub fn from_range_rows(name: impl Into<String>, rows: &[RangeRow]) -> TableResult<Self> {
        let name = name.into();
        let mut entries = BTreeMap::new();
        let mut max: u32 = 0;
        let mut usable = 0;

        for row in rows {
            let range = parse_range(&row.range).filter(|(low, high)| high - low < MAX_ROW_SPAN);
            let Some((low, high)) = range else {
                let skipped = TableError::MalformedRow {
                    row: row.range.trim().to_string(),
                };
                tracing::debug!(table = %name, "skipping row: {skipped}");
                continue;
            };
            usable += 1;
            max = max.max(high);
            insert_range(&mut entries, low, high, row.text.trim());
        }

        if usable == 0 {
            return Err(TableError::NotATable { name });
        }

        let header = rows.first().and_then(|row| DiceSpec::parse(&row.range));
        let Some(dice) = header.or_else(|| DiceSpec::uniform(max)) else {
            return Err(TableError::NotATable { name });
        };

        Ok(Self {
            name,
            entries,
            max,
            dice,
        })
    }

    /// The table's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The highest roll value with an entry.
    pub fn max(&self) -> u32 {
        self.max
    }

    /// The dice this table is rolled with.
    pub fn dice(&self) -> DiceSpec {
        self.dice
    }

    /// All stored entries, keyed by roll value.
    pub fn entries(&self) -> &BTreeMap<u32, TableEntry> {
        &self.entries
    }

    /// Look up the outcome text for a roll value, following redirects.
    pub fn lookup(&self, value: u32) -> TableResult<&str> {
        let entry = match self.entries.get(&value) {
            Some(TableEntry::Redirect(key)) => self.entries.get(key),
            other => other,
        };
        match entry {
            Some(TableEntry::Literal(text)) => Ok(text.as_str()),
            _ => Err(TableError::InvariantViolation {
                table: self.name.clone(),
                value,
            }),
        }
    }

    /// Roll the table's dice and look up the result.
    pub fn roll(&self, rng: &mut StdRng) -> TableResult<Roll> {
        let roll = self.dice.roll(rng);
        let text = self.lookup(roll.value)?.to_string();
        Ok(Roll {
            table: self.name.clone(),
            dice: self.dice,
            rolled: roll.dice,
            value: roll.value,
            text,
        })
    }

    /// All distinct outcome texts.
    pub fn literals(&self) -> impl Iterator<Item = &str> {
        self.entries.values().filter_map(|entry| match entry {
            TableEntry::Literal(text) => Some(text.as_str()),
            TableEntry::Redirect(_) => None,
        })
    }

    /// Collapse the entries back into one row per outcome.
    pub fn rows(&self) -> Vec<TableRow> {
        let mut rows: BTreeMap<u32, TableRow> = BTreeMap::new();
        for (&key, entry) in &self.entries {
            match entry {
                TableEntry::Literal(text) => {
                    let row = rows.entry(key).or_insert_with(|| TableRow {
                        min: key,
                        max: key,
                        text: String::new(),
                    });
                    row.text = text.clone();
                }
                TableEntry::Redirect(target) => {
                    let row = rows.entry(*target).or_insert_with(|| TableRow {
                        min: *target,
                        max: key,
                        text: String::new(),
                    });
                    row.max = row.max.max(key);
                }
            }
        }
        rows.into_values().collect()
    }

    /// Roll values the dice can produce that have no entry, lowest first and
    /// at most [`MISSING_REPORT_LIMIT`] of them.
    pub fn missing_outcomes(&self) -> Vec<u32> {
        self.dice
            .outcomes()
            .filter(|value| !self.entries.contains_key(value))
            .take(MISSING_REPORT_LIMIT)
            .collect()
    }
}

/// Store one range row. The first unclaimed value in the range holds the
/// literal and every other unclaimed value redirects to it.
fn insert_range(entries: &mut BTreeMap<u32, TableEntry>, low: u32, high: u32, text: &str) {
    let mut canonical = None;
    for key in low..=high {
        let Entry::Vacant(slot) = entries.entry(key) else {
            continue;
        };
        match canonical {
            None => {
                slot.insert(TableEntry::Literal(text.to_string()));
                canonical = Some(key);
            }
            Some(target) => {
                slot.insert(TableEntry::Redirect(target));
            }
        }
    }
    if canonical.is_none() {
        tracing::debug!(low, high, "range already covered by earlier rows");
    }
}
