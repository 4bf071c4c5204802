//! Persisted history records.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::replacement::{DecodeResult, Replacement};

/// Default cap on retained history entries.
pub const MAX_HISTORY_ENTRIES: usize = 1000;

/// `datetime.isoformat()`-style local timestamp with microseconds.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// One persisted decode.
///
/// Every field defaults when absent so older files stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryEntry {
    /// Local wall-clock time the entry was recorded, ISO-8601.
    pub timestamp: String,
    /// Full input text.
    pub original: String,
    /// Full substituted text.
    pub decoded: String,
    /// Number of runs substituted.
    pub num_replacements: usize,
    /// Runs substituted, in scan order.
    pub replacements: Vec<Replacement>,
}

impl HistoryEntry {
    /// Snapshots `result` under the given timestamp.
    pub fn from_result(result: &DecodeResult, recorded_at: NaiveDateTime) -> Self {
        Self {
            timestamp: recorded_at.format(TIMESTAMP_FORMAT).to_string(),
            original: result.original.clone(),
            decoded: result.decoded.clone(),
            num_replacements: result.replacements.len(),
            replacements: result.replacements.clone(),
        }
    }

    /// Snapshots `result` stamped with the current local time.
    pub fn now(result: &DecodeResult) -> Self {
        Self::from_result(result, Local::now().naive_local())
    }

    /// Lookup key: there is no surrogate id.
    pub fn identity(&self) -> (&str, &str, &str) {
        (&self.timestamp, &self.original, &self.decoded)
    }

    /// True when `other` has the same `(timestamp, original, decoded)`.
    pub fn same_identity(&self, other: &HistoryEntry) -> bool {
        self.identity() == other.identity()
    }

    /// Parsed timestamp, when it is well-formed.
    pub fn recorded_at(&self) -> Option<NaiveDateTime> {
        self.timestamp.parse::<NaiveDateTime>().ok()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(h: u32, m: u32, s: u32, micro: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_micro_opt(h, m, s, micro)
            .unwrap()
    }

    #[test]
    fn timestamp_matches_isoformat() {
        let result = DecodeResult::new("a".into(), "a".into(), vec![]);
        let entry = HistoryEntry::from_result(&result, at(7, 5, 3, 42));
        assert_eq!(entry.timestamp, "2024-03-09T07:05:03.000042");
        assert_eq!(entry.recorded_at(), Some(at(7, 5, 3, 42)));
    }

    #[test]
    fn identity_ignores_replacements() {
        let result = DecodeResult::new("x".into(), "y".into(), vec![]);
        let a = HistoryEntry::from_result(&result, at(1, 0, 0, 0));
        let mut b = a.clone();
        b.num_replacements = 9;
        assert!(a.same_identity(&b));
        b.decoded.push('!');
        assert!(!a.same_identity(&b));
    }

    #[test]
    fn legacy_object_with_missing_keys_loads() {
        let entry: HistoryEntry = serde_json::from_str(r#"{"timestamp":"t","original":"o"}"#).unwrap();
        assert_eq!(entry.decoded, "");
        assert_eq!(entry.num_replacements, 0);
        assert!(entry.replacements.is_empty());
    }
}
