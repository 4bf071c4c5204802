//! Hex-run detection, UTF-8 decoding and in-place substitution.

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::replacement::{DecodeResult, Replacement};

use super::offsets::CharCursor;

/// Fewest consecutive byte tokens that count as a run.
///
/// Two-token runs are mostly coincidental pairs in prose ("AB CD").
pub const DEFAULT_MIN_RUN: usize = 3;

const HEX_TOKEN: &str = r"\b[0-9A-Fa-f]{2}\b";

/// Whitespace between tokens, including the ASCII information separators
/// (FS, GS, RS, US).
const SEPARATOR: &str = r"[\s\x1c-\x1f]";

/// Reasons a [`HexDecoder`] cannot be built.
#[derive(Debug)]
pub enum DecoderError {
    /// The minimum run length was zero.
    InvalidMinRun(usize),
    /// The run pattern failed to compile.
    Pattern(regex::Error),
}

impl From<regex::Error> for DecoderError {
    fn from(value: regex::Error) -> Self {
        Self::Pattern(value)
    }
}

impl std::fmt::Display for DecoderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMinRun(n) => write!(f, "minimum run length must be at least 1, got {n}"),
            Self::Pattern(err) => write!(f, "hex run pattern: {err}"),
        }
    }
}

impl std::error::Error for DecoderError {}

/// Detection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Fewest consecutive byte tokens that form a run. Must be at least 1.
    pub min_run: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            min_run: DEFAULT_MIN_RUN,
        }
    }
}

/// Scanner for whitespace-separated hex byte runs.
#[derive(Debug, Clone)]
pub struct HexDecoder {
    config: DecoderConfig,
    run: Regex,
}

impl HexDecoder {
    /// Builds a decoder for `config`, compiling its run pattern.
    pub fn new(config: DecoderConfig) -> Result<Self, DecoderError> {
        if config.min_run == 0 {
            return Err(DecoderError::InvalidMinRun(config.min_run));
        }
        let run = Regex::new(&run_pattern(config.min_run))?;
        Ok(Self { config, run })
    }

    /// Process-wide decoder with the default threshold.
    pub fn shared() -> &'static HexDecoder {
        static DEFAULT: OnceLock<HexDecoder> = OnceLock::new();
        DEFAULT.get_or_init(|| {
            let config = DecoderConfig::default();
            let run = Regex::new(&run_pattern(config.min_run)).expect("default hex run pattern");
            HexDecoder { config, run }
        })
    }

    /// Settings this decoder was built with.
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Finds every decodable run, left to right, without overlap.
    pub fn find_replacements(&self, text: &str) -> Vec<Replacement> {
        let mut cursor = CharCursor::new(text);
        let mut reps = Vec::new();

        for m in self.run.find_iter(text) {
            let run = m.as_str();
            let trimmed = run.trim_end_matches(is_separator);
            let trailing_ws = &run[trimmed.len()..];

            let tokens: Vec<&str> = token_regex()
                .find_iter(trimmed)
                .map(|t| t.as_str())
                .collect();
            let Some(decoded) = decode_hex_tokens(&tokens) else {
                debug!(start = m.start(), "dropping hex run that decoded to nothing");
                continue;
            };

            let start = cursor.char_at_byte(m.start());
            let end = cursor.char_at_byte(m.end());
            reps.push(Replacement {
                start,
                end,
                hex_run: run.to_string(),
                decoded: decoded + trailing_ws,
            });
        }

        reps
    }

    /// Detects runs in `text` and substitutes their decodings.
    pub fn decode(&self, text: &str) -> DecodeResult {
        let reps = self.find_replacements(text);
        let decoded = apply_replacements(text, &reps);
        DecodeResult::new(text.to_string(), decoded, reps)
    }
}

impl Default for HexDecoder {
    fn default() -> Self {
        Self::shared().clone()
    }
}

/// Decodes `text` with the default threshold.
pub fn decode_text(text: &str) -> DecodeResult {
    HexDecoder::shared().decode(text)
}

/// Finds runs in `text` with the default threshold.
pub fn find_replacements(text: &str) -> Vec<Replacement> {
    HexDecoder::shared().find_replacements(text)
}

/// Substitutes `reps` into `text`.
///
/// `reps` must be ascending by `start` and non-overlapping, with character
/// offsets into `text`. Entries breaking that order, empty spans, or spans
/// past the end are skipped and left as literal text.
pub fn apply_replacements(text: &str, reps: &[Replacement]) -> String {
    if reps.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut cursor = CharCursor::new(text);
    let mut copied = 0usize;

    for rep in reps {
        if rep.start >= rep.end {
            warn!(start = rep.start, end = rep.end, "skipping empty replacement span");
            continue;
        }
        let Some(start) = cursor.byte_at_char(rep.start) else {
            warn!(start = rep.start, "skipping overlapping or unordered replacement");
            continue;
        };
        let Some(end) = cursor.byte_at_char(rep.end) else {
            warn!(end = rep.end, "skipping replacement past end of text");
            continue;
        };
        out.push_str(&text[copied..start]);
        out.push_str(&rep.decoded);
        copied = end;
    }

    out.push_str(&text[copied..]);
    out
}

/// Counts two-digit hex tokens in `s`.
pub fn count_hex_tokens(s: &str) -> usize {
    token_regex().find_iter(s).count()
}

fn run_pattern(min_run: usize) -> String {
    format!(r"(?m)(?:{HEX_TOKEN}(?:{SEPARATOR}+|$)){{{min_run},}}")
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(HEX_TOKEN).expect("hex token pattern"))
}

fn decode_hex_tokens(tokens: &[&str]) -> Option<String> {
    let bytes = hex::decode(tokens.concat()).ok()?;
    let text = String::from_utf8_lossy(&bytes).into_owned();
    if text.is_empty() { None } else { Some(text) }
}
