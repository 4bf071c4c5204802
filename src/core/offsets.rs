/// Forward-only converter between byte and character offsets of one text.
///
/// Queries must be non-decreasing; each call only walks the characters
/// between the previous position and the requested one.
pub(crate) struct CharCursor<'a> {
    text: &'a str,
    byte: usize,
    chars: usize,
}

impl<'a> CharCursor<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            text,
            byte: 0,
            chars: 0,
        }
    }

    /// Character index of `byte`. `byte` must be a char boundary at or after
    /// the current position.
    pub(crate) fn char_at_byte(&mut self, byte: usize) -> usize {
        self.chars += self.text[self.byte..byte].chars().count();
        self.byte = byte;
        self.chars
    }

    /// Byte offset of character index `ch`, or `None` when `ch` lies behind
    /// the cursor or past the end of the text.
    pub(crate) fn byte_at_char(&mut self, ch: usize) -> Option<usize> {
        let skip = ch.checked_sub(self.chars)?;
        let rest = &self.text[self.byte..];
        let offset = rest
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(rest.len()))
            .nth(skip)?;
        self.byte += offset;
        self.chars = ch;
        Some(self.byte)
    }
}

#[cfg(test)]
mod tests {
    use super::CharCursor;

    #[test]
    fn maps_multibyte_text_both_ways() {
        let text = "héllo wörld";
        let mut c = CharCursor::new(text);
        assert_eq!(c.char_at_byte(0), 0);
        assert_eq!(c.char_at_byte(3), 2);
        assert_eq!(c.char_at_byte(text.len()), 11);

        let mut c = CharCursor::new(text);
        assert_eq!(c.byte_at_char(2), Some(3));
        assert_eq!(c.byte_at_char(8), Some(9));
        assert_eq!(c.byte_at_char(11), Some(text.len()));
    }

    #[test]
    fn rejects_backwards_and_out_of_range() {
        let mut c = CharCursor::new("abc");
        assert_eq!(c.byte_at_char(2), Some(2));
        assert_eq!(c.byte_at_char(1), None);
        assert_eq!(c.byte_at_char(4), None);
        assert_eq!(c.byte_at_char(3), Some(3));
    }
}
