//! Cross-row batch helpers.
//!
//! Pure scans over the uploaded rows used by the orchestrator's
//! uniqueness pass. The datastore side of uniqueness (one batched query
//! per unique field) and the decision to commit live in the API crate.

use std::collections::HashSet;

use super::policy::FieldKey;
use super::row::{Cell, Row};

/// Fields whose values must be unique within the batch and across the
/// datastore.
pub const UNIQUE_FIELDS: &[FieldKey] = &[FieldKey::Email, FieldKey::Number];

/// Cells of later in-batch duplicates for `key`.
///
/// The first occurrence (lowest row position) wins and is not returned;
/// every later cell carrying an already-seen value is. Empty cells are
/// skipped — emptiness is the row validator's concern.
pub fn batch_duplicates<'a>(rows: &'a [Row], key: FieldKey) -> Vec<&'a Cell> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut duplicates = Vec::new();

    for row in rows {
        let Some(cell) = row.get(&key) else { continue };
        let value = cell.value.trim();
        if value.is_empty() {
            continue;
        }
        if !seen.insert(value) {
            duplicates.push(cell);
        }
    }

    duplicates
}

/// Distinct non-empty values the batch carries for `key`, for the
/// datastore existence lookup.
pub fn unique_candidates(rows: &[Row], key: FieldKey) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut values = Vec::new();

    for row in rows {
        let Some(cell) = row.get(&key) else { continue };
        let value = cell.value.trim();
        if !value.is_empty() && seen.insert(value) {
            values.push(value.to_string());
        }
    }

    values
}

/// Every cell in the batch whose trimmed value equals `value`, so a
/// datastore hit can be flagged against each offending cell.
pub fn cells_with_value<'a>(rows: &'a [Row], key: FieldKey, value: &str) -> Vec<&'a Cell> {
    rows.iter()
        .filter_map(|row| row.get(&key))
        .filter(|cell| cell.value.trim() == value)
        .collect()
}
