//! Display helpers for front ends: highlight segmentation and timestamps.

use chrono::NaiveDateTime;

use crate::{core::offsets::CharCursor, replacement::Replacement};

/// Which side of a decode to segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Original text with hex runs marked.
    Source,
    /// Substituted text with decoded runs marked.
    Decoded,
}

/// A slice of display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text carried over unchanged.
    Plain(&'a str),
    /// A matched hex run.
    Hex(&'a str),
    /// The decoded text of a run.
    Decoded(&'a str),
}

impl<'a> Segment<'a> {
    /// Text carried by the segment.
    pub fn text(&self) -> &'a str {
        match *self {
            Segment::Plain(s) | Segment::Hex(s) | Segment::Decoded(s) => s,
        }
    }

    /// False only for [`Segment::Plain`].
    pub fn is_highlighted(&self) -> bool {
        !matches!(self, Segment::Plain(_))
    }
}

/// Splits `original` into plain and highlighted segments.
///
/// Concatenating the segment texts gives `original` for [`View::Source`]
/// and the substituted text for [`View::Decoded`]. Replacements are taken
/// in `start` order; ones that overlap an earlier run or fall outside the
/// text are ignored.
pub fn segments<'a>(original: &'a str, reps: &'a [Replacement], view: View) -> Vec<Segment<'a>> {
    let mut ordered: Vec<&Replacement> = reps.iter().collect();
    ordered.sort_by_key(|r| r.start);

    let mut out = Vec::with_capacity(ordered.len() * 2 + 1);
    let mut cursor = CharCursor::new(original);
    let mut copied = 0usize;

    for rep in ordered {
        if rep.start >= rep.end {
            continue;
        }
        let Some(start) = cursor.byte_at_char(rep.start) else {
            continue;
        };
        let Some(end) = cursor.byte_at_char(rep.end) else {
            continue;
        };
        if copied < start {
            out.push(Segment::Plain(&original[copied..start]));
        }
        out.push(match view {
            View::Source => Segment::Hex(&original[start..end]),
            View::Decoded => Segment::Decoded(&rep.decoded),
        });
        copied = end;
    }

    if copied < original.len() {
        out.push(Segment::Plain(&original[copied..]));
    }
    out
}

/// Renders segments, wrapping highlighted ones with `open`/`close`.
pub fn render_marked(segments: &[Segment<'_>], open: &str, close: &str) -> String {
    let mut out = String::new();
    for seg in segments {
        if seg.is_highlighted() {
            out.push_str(open);
            out.push_str(seg.text());
            out.push_str(close);
        } else {
            out.push_str(seg.text());
        }
    }
    out
}

/// `YYYY-MM-DD HH:MM:SS` for an ISO-8601 timestamp; anything unparseable is
/// returned as given.
pub fn format_timestamp(timestamp: &str) -> String {
    match timestamp.parse::<NaiveDateTime>() {
        Ok(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        Err(_) => timestamp.to_string(),
    }
}
