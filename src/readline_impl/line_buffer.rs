/*
 *   Copyright (c) 2025 the rawline authors
 *
 *   Licensed under the Apache License, Version 2.0 (the "License");
 *   you may not use this file except in compliance with the License.
 *   You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 *   Unless required by applicable law or agreed to in writing, software
 *   distributed under the License is distributed on an "AS IS" BASIS,
 *   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *   See the License for the specific language governing permissions and
 *   limitations under the License.
 */

//! The logical line under edit: a byte buffer plus a cursor.
//!
//! Editing is byte-wise throughout. Keyboard input only ever inserts ASCII
//! printables, but history files may carry arbitrary bytes, and byte-wise
//! operations can never land between char boundaries.

/// Invariant: `cursor <= bytes.len()`.
#[derive(Debug, Default)]
pub struct LineBuffer {
    bytes: Vec<u8>,
    cursor: usize,
}

impl LineBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lossy view of the contents, for the completion hook and history.
    #[must_use]
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
        self.cursor = 0;
    }

    /// Place the cursor at `position`, clamped to the buffer length.
    pub fn set_cursor(&mut self, position: usize) {
        self.cursor = position.min(self.bytes.len());
    }

    /// Insert one byte at the cursor and advance past it.
    pub fn insert(&mut self, byte: u8) {
        self.bytes.insert(self.cursor, byte);
        self.cursor += 1;
    }

    /// Remove `count` bytes before the cursor. Returns false (buffer
    /// untouched) when fewer than `count` bytes precede the cursor.
    pub fn remove_before(&mut self, count: usize) -> bool {
        if count == 0 || self.cursor < count {
            return false;
        }
        self.bytes.drain(self.cursor - count..self.cursor);
        self.cursor -= count;
        true
    }

    /// Remove `count` bytes at and after the cursor. Returns false (buffer
    /// untouched) when fewer than `count` bytes follow the cursor.
    pub fn remove_after(&mut self, count: usize) -> bool {
        if count == 0 || self.bytes.len() - self.cursor < count {
            return false;
        }
        self.bytes.drain(self.cursor..self.cursor + count);
        true
    }

    /// First index at or after the cursor reached by skipping
    /// non-alphanumerics, then skipping alphanumerics.
    #[must_use]
    pub fn word_end_from_cursor(&self) -> usize {
        let mut i = self.cursor;
        while i < self.bytes.len() && !self.bytes[i].is_ascii_alphanumeric() {
            i += 1;
        }
        while i < self.bytes.len() && self.bytes[i].is_ascii_alphanumeric() {
            i += 1;
        }
        i
    }

    /// Mirror image of [`Self::word_end_from_cursor`], scanning left over
    /// the byte before each candidate index.
    #[must_use]
    pub fn word_start_from_cursor(&self) -> usize {
        let mut i = self.cursor;
        while i > 0 && !self.bytes[i - 1].is_ascii_alphanumeric() {
            i -= 1;
        }
        while i > 0 && self.bytes[i - 1].is_ascii_alphanumeric() {
            i -= 1;
        }
        i
    }

    /// Append the submitted line feed and park the cursor at the end.
    pub fn push_newline(&mut self) {
        self.bytes.push(b'\n');
        self.cursor = self.bytes.len();
    }

    /// Replace the contents (history navigation), cursor at the end.
    pub fn load(&mut self, contents: &str) {
        self.bytes.clear();
        self.bytes.extend_from_slice(contents.as_bytes());
        self.cursor = self.bytes.len();
    }

    /// Hand the contents to the caller and reset the buffer.
    #[must_use]
    pub fn take_line(&mut self) -> String {
        let line = String::from_utf8_lossy(&self.bytes).into_owned();
        self.clear();
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn test_insert_moves_cursor_and_shifts_tail() {
        let mut buffer = LineBuffer::new();
        for byte in *b"abc" {
            buffer.insert(byte);
        }
        buffer.set_cursor(1);
        buffer.insert(b'X');
        assert_eq!(buffer.as_bytes(), b"aXbc");
        assert_eq!(buffer.cursor(), 2);
    }

    #[test]
    fn test_remove_before_at_start_is_rejected() {
        let mut buffer = LineBuffer::new();
        buffer.insert(b'a');
        buffer.set_cursor(0);
        assert!(!buffer.remove_before(1));
        assert_eq!(buffer.as_bytes(), b"a");
    }

    #[test]
    fn test_remove_after_at_end_is_rejected() {
        let mut buffer = LineBuffer::new();
        buffer.insert(b'a');
        assert!(!buffer.remove_after(1));
        assert_eq!(buffer.as_bytes(), b"a");
    }

    #[test]
    fn test_remove_ranges() {
        let mut buffer = LineBuffer::new();
        for byte in *b"hello world" {
            buffer.insert(byte);
        }
        buffer.set_cursor(5);
        assert!(buffer.remove_before(2));
        assert_eq!(buffer.as_bytes(), b"helo world");
        assert_eq!(buffer.cursor(), 3);
        assert!(buffer.remove_after(2));
        assert_eq!(buffer.as_bytes(), b"helworld");
        assert_eq!(buffer.cursor(), 3);
    }

    // Cursor invariant holds through an arbitrary mixed sequence.
    #[test]
    fn test_cursor_never_exceeds_length() {
        let mut buffer = LineBuffer::new();
        let script: &[(u8, usize)] = &[(b'a', 0), (b'b', 1), (b'c', 0), (b'd', 9)];
        for &(byte, position) in script {
            buffer.insert(byte);
            buffer.set_cursor(position);
            buffer.remove_after(1);
            assert!(buffer.cursor() <= buffer.len());
        }
    }

    //                  v cursor at 0: skip spaces, then "one"
    #[test_case("  one two", 0, 5 ; "leading separators then word")]
    #[test_case("one two", 0, 3 ; "cursor inside word runs to its end")]
    #[test_case("one two", 3, 7 ; "separator then next word")]
    #[test_case("one", 3, 3 ; "already at end")]
    #[test_case("--..", 0, 4 ; "only separators run to end")]
    fn test_word_end_from_cursor(line: &str, cursor: usize, expected: usize) {
        let mut buffer = LineBuffer::new();
        buffer.load(line);
        buffer.set_cursor(cursor);
        assert_eq!(buffer.word_end_from_cursor(), expected);
    }

    #[test_case("one two  ", 9, 4 ; "trailing separators then word start")]
    #[test_case("one two", 5, 4 ; "cursor inside word backs to its start")]
    #[test_case("one two", 4, 0 ; "separator then previous word")]
    #[test_case("one", 0, 0 ; "already at start")]
    #[test_case("--..", 4, 0 ; "only separators run to start")]
    fn test_word_start_from_cursor(line: &str, cursor: usize, expected: usize) {
        let mut buffer = LineBuffer::new();
        buffer.load(line);
        buffer.set_cursor(cursor);
        assert_eq!(buffer.word_start_from_cursor(), expected);
    }

    #[test]
    fn test_take_line_includes_pushed_newline() {
        let mut buffer = LineBuffer::new();
        for byte in *b"abc" {
            buffer.insert(byte);
        }
        buffer.push_newline();
        assert_eq!(buffer.take_line(), "abc\n");
        assert!(buffer.is_empty());
        assert_eq!(buffer.cursor(), 0);
    }

    #[test]
    fn test_byte_wise_edits_on_non_utf8_contents_do_not_panic() {
        let mut buffer = LineBuffer::new();
        buffer.load("café");
        // Cursor lands mid-way through the two-byte 'é'.
        buffer.set_cursor(4);
        assert!(buffer.remove_before(1));
        assert_eq!(buffer.len(), 4);
        let _ = buffer.take_line();
    }
}
