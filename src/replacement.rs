//! Detected hex runs and the outcome of one decode pass.

use serde::{Deserialize, Serialize};

use crate::core::decoder::count_hex_tokens;

/// One detected hex run and its decoding.
///
/// Offsets are half-open and counted in characters (Unicode scalar values)
/// of the original text, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Replacement {
    /// First character covered by the run.
    pub start: usize,
    /// One past the last character covered by the run.
    pub end: usize,
    /// Exact matched text, equal to `original[start..end]`.
    pub hex_run: String,
    /// Decoded text with the run's trailing whitespace re-appended.
    pub decoded: String,
}

impl Replacement {
    /// Number of characters covered in the original text.
    pub fn span_len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Number of two-digit hex tokens inside [`Self::hex_run`].
    pub fn hex_bytes(&self) -> usize {
        count_hex_tokens(&self.hex_run)
    }
}

/// Outcome of decoding one text buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeResult {
    /// Input text, untouched.
    pub original: String,
    /// Input text with every replacement substituted.
    pub decoded: String,
    /// Replacements in scan order (ascending `start`).
    pub replacements: Vec<Replacement>,
    /// Same as `replacements.len()`.
    pub num_replacements: usize,
}

impl DecodeResult {
    /// Builds a result, deriving `num_replacements` from the list.
    pub fn new(original: String, decoded: String, replacements: Vec<Replacement>) -> Self {
        let num_replacements = replacements.len();
        Self {
            original,
            decoded,
            replacements,
            num_replacements,
        }
    }

    /// True when at least one run was substituted.
    pub fn has_replacements(&self) -> bool {
        self.num_replacements > 0
    }

    /// Total hex bytes across all runs.
    pub fn total_hex_bytes(&self) -> usize {
        self.replacements.iter().map(Replacement::hex_bytes).sum()
    }

    /// Total characters of decoded text, trailing whitespace included.
    pub fn total_decoded_chars(&self) -> usize {
        self.replacements
            .iter()
            .map(|r| r.decoded.chars().count())
            .sum()
    }

    /// Mean hex bytes per run; `0.0` with no replacements.
    pub fn avg_bytes_per_run(&self) -> f64 {
        if self.replacements.is_empty() {
            return 0.0;
        }
        self.total_hex_bytes() as f64 / self.replacements.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rep(hex_run: &str, decoded: &str) -> Replacement {
        Replacement {
            start: 0,
            end: hex_run.chars().count(),
            hex_run: hex_run.to_string(),
            decoded: decoded.to_string(),
        }
    }

    #[test]
    fn stats_are_zero_without_replacements() {
        let result = DecodeResult::new("plain".into(), "plain".into(), vec![]);
        assert_eq!(result.total_hex_bytes(), 0);
        assert_eq!(result.total_decoded_chars(), 0);
        assert_eq!(result.avg_bytes_per_run(), 0.0);
        assert!(!result.has_replacements());
    }

    #[test]
    fn stats_sum_over_runs() {
        let result = DecodeResult::new(
            String::new(),
            String::new(),
            vec![rep("48 69 21 ", "Hi! "), rep("41 42 43 44 45", "ABCDE")],
        );
        assert_eq!(result.num_replacements, 2);
        assert_eq!(result.total_hex_bytes(), 8);
        assert_eq!(result.total_decoded_chars(), 9);
        assert_eq!(result.avg_bytes_per_run(), 4.0);
    }

    #[test]
    fn missing_keys_default_on_deserialize() {
        let rep: Replacement = serde_json::from_str(r#"{"hex_run":"41 42 43"}"#).unwrap();
        assert_eq!(rep.start, 0);
        assert_eq!(rep.end, 0);
        assert_eq!(rep.decoded, "");
    }
}
