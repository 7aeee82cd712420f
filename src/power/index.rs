//! Power log parsing.
//!
//! Builds a lookup from the log's elapsed-time column (`MM:SS`) to the raw
//! power reading. Values are kept as the exact text from the log so they
//! round-trip into the track document unchanged.

use crate::error::MergeError;
use crate::storage::config::PowerLogSettings;
use std::collections::HashMap;

/// A data row dropped in lenient mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    /// 1-based line number in the log
    pub line: usize,
    /// Row text as read
    pub content: String,
}

/// Elapsed time → power reading.
#[derive(Debug, Clone, Default)]
pub struct PowerIndex {
    entries: HashMap<String, String>,
    /// Rows skipped because they had too few columns
    pub rejected_rows: Vec<RejectedRow>,
}

impl PowerIndex {
    /// Look up the power reading for an `MM:SS` key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a reading; a later row for the same key replaces the earlier one.
    pub fn insert(&mut self, key: impl Into<String>, watts: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), watts.into())
    }
}

impl FromIterator<(String, String)> for PowerIndex {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            rejected_rows: Vec::new(),
        }
    }
}

/// Build a power index from power log text.
pub fn build_power_index(
    content: &str,
    settings: &PowerLogSettings,
) -> Result<PowerIndex, MergeError> {
    let required = settings.required_columns();
    let mut index = PowerIndex::default();

    for (i, line) in content.lines().enumerate() {
        let line_number = i + 1;

        if line.trim().is_empty() || settings.is_header(line) {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < required {
            if settings.skip_malformed_rows {
                tracing::warn!(
                    line = line_number,
                    columns = fields.len(),
                    "Dropping short power log row"
                );
                index.rejected_rows.push(RejectedRow {
                    line: line_number,
                    content: line.to_string(),
                });
                continue;
            }

            return Err(MergeError::format(
                format!("line {}", line_number),
                format!(
                    "expected at least {} columns, found {} in {:?}",
                    required,
                    fields.len(),
                    line
                ),
            ));
        }

        let key = fields[settings.time_column];
        let watts = fields[settings.power_column];

        if let Some(previous) = index.insert(key, watts) {
            tracing::debug!(
                line = line_number,
                key,
                previous = %previous,
                watts,
                "Duplicate elapsed time in power log, keeping later row"
            );
        }
    }

    tracing::debug!(
        entries = index.len(),
        rejected = index.rejected_rows.len(),
        "Built power index"
    );

    Ok(index)
}
