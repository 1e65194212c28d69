//! Subject text access
//!
//! The matcher never indexes the subject directly. It walks a [`TextCursor`]
//! and asks the [`Subject`] for substrings once a match is found, so a host
//! with its own string storage only has to provide these two traits.

use std::borrow::Cow;

/// A forward-only position over subject text.
///
/// Cloning must be cheap: every backtracking branch forks its own cursor.
pub trait TextCursor: Clone {
    /// Whether a character is available at the current position
    fn has_more(&self) -> bool;

    /// The character at the current position, or `None` at the end
    fn peek(&self) -> Option<char>;

    /// Move past the current character. Does nothing at the end.
    fn advance(&mut self);

    /// Absolute offset of the current position
    fn position(&self) -> usize;
}

/// Read-only subject text that can hand out cursors and substrings.
pub trait Subject {
    /// The cursor type walking this subject
    type Cursor<'a>: TextCursor
    where
        Self: 'a;

    /// Length of the subject in offset units
    fn len(&self) -> usize;

    /// Whether the subject is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create a cursor positioned at `offset`
    fn cursor_at(&self, offset: usize) -> Self::Cursor<'_>;

    /// Materialize the text between two offsets
    fn substring(&self, start: usize, end: usize) -> Cow<'_, str>;
}

/// Cursor over a `str`, positioned on byte offsets at char boundaries.
#[derive(Debug, Clone, Copy)]
pub struct StrCursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> StrCursor<'a> {
    /// Create a cursor at `pos`, clamped to the text and moved forward to the
    /// next char boundary
    pub fn new(text: &'a str, pos: usize) -> Self {
        let mut pos = pos.min(text.len());
        while !text.is_char_boundary(pos) {
            pos += 1;
        }
        StrCursor { text, pos }
    }
}

impl TextCursor for StrCursor<'_> {
    #[inline]
    fn has_more(&self) -> bool {
        self.pos < self.text.len()
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    #[inline]
    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    #[inline]
    fn position(&self) -> usize {
        self.pos
    }
}

impl Subject for str {
    type Cursor<'a> = StrCursor<'a>;

    fn len(&self) -> usize {
        str::len(self)
    }

    fn cursor_at(&self, offset: usize) -> StrCursor<'_> {
        StrCursor::new(self, offset)
    }

    fn substring(&self, start: usize, end: usize) -> Cow<'_, str> {
        Cow::Borrowed(&self[start..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_walks_chars() {
        let mut cursor = "héllo".cursor_at(0);
        assert_eq!(cursor.peek(), Some('h'));
        cursor.advance();
        assert_eq!(cursor.peek(), Some('é'));
        cursor.advance();
        assert_eq!(cursor.position(), 3);
        assert_eq!(cursor.peek(), Some('l'));
    }

    #[test]
    fn test_cursor_clone_is_independent() {
        let mut a = "abc".cursor_at(0);
        let b = a;
        a.advance();
        a.advance();
        assert_eq!(a.position(), 2);
        assert_eq!(b.position(), 0);
    }

    #[test]
    fn test_cursor_at_end() {
        let mut cursor = "ab".cursor_at(2);
        assert!(!cursor.has_more());
        assert_eq!(cursor.peek(), None);
        cursor.advance();
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_cursor_snaps_to_char_boundary() {
        let cursor = "é!".cursor_at(1);
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.peek(), Some('!'));

        let cursor = "abc".cursor_at(10);
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn test_substring() {
        let text = "Hello World";
        assert_eq!(text.substring(6, 11), "World");
        assert_eq!(Subject::len(text), 11);
    }
}
