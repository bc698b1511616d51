//! Text buffer access
//!
//! The analysis engines read documents through the [`TextBuffer`] trait. [`LineIndex`] is the
//! bundled implementation, built on a Rope so that line access and offset/position
//! conversion stay O(log N) while a document is being edited.

use crate::error::AnalysisError;
use ropey::Rope;
use std::borrow::Cow;

/// Line-oriented read access to a document.
pub trait TextBuffer {
    /// Number of lines. An empty document has one (empty) line.
    fn line_count(&self) -> usize;

    /// Text of `line` without its line terminator.
    fn line_text(&self, line: usize) -> Option<Cow<'_, str>>;
}

impl TextBuffer for [&str] {
    fn line_count(&self) -> usize {
        self.len().max(1)
    }

    fn line_text(&self, line: usize) -> Option<Cow<'_, str>> {
        if self.is_empty() && line == 0 {
            return Some(Cow::Borrowed(""));
        }
        self.get(line).map(|text| Cow::Borrowed(*text))
    }
}

/// Rope-backed line index.
#[derive(Debug, Clone)]
pub struct LineIndex {
    rope: Rope,
}

impl LineIndex {
    /// Create an empty index (one empty line).
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build the index from text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Get total line count
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get total character count
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Line and column of a character offset (clamped to the document end).
    pub fn char_offset_to_position(&self, char_offset: usize) -> (usize, usize) {
        let char_offset = char_offset.min(self.rope.len_chars());

        let line_idx = self.rope.char_to_line(char_offset);
        let line_start_char = self.rope.line_to_char(line_idx);

        (line_idx, char_offset - line_start_char)
    }

    /// Character offset of a line/column (clamped to the line and the document).
    pub fn position_to_char_offset(&self, line: usize, column: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }

        let line_start_char = self.rope.line_to_char(line);
        line_start_char + column.min(self.line_len(line))
    }

    /// Like [`LineIndex::char_offset_to_position`], but rejects offsets past the end.
    pub fn checked_position(&self, char_offset: usize) -> Result<(usize, usize), AnalysisError> {
        if char_offset > self.rope.len_chars() {
            return Err(AnalysisError::InvalidOffset(char_offset));
        }
        Ok(self.char_offset_to_position(char_offset))
    }

    /// Like [`LineIndex::position_to_char_offset`], but rejects positions outside the document.
    pub fn checked_offset(&self, line: usize, column: usize) -> Result<usize, AnalysisError> {
        if line >= self.rope.len_lines() || column > self.line_len(line) {
            return Err(AnalysisError::InvalidPosition { line, column });
        }
        Ok(self.rope.line_to_char(line) + column)
    }

    /// Length of `line` in characters, excluding its line terminator.
    pub fn line_len(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return 0;
        }
        let slice = self.rope.line(line);
        let mut len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len -= 1;
            if len > 0 && slice.char(len - 1) == '\r' {
                len -= 1;
            }
        }
        len
    }

    /// Character at `char_offset`.
    pub fn char_at(&self, char_offset: usize) -> Option<char> {
        self.rope.get_char(char_offset)
    }

    /// Text of the half-open character range `start..end` (clamped).
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.rope.len_chars());
        let start = start.min(end);
        self.rope.slice(start..end).to_string()
    }

    /// Number of `\n` in the half-open character range `start..end` (clamped).
    pub fn newlines_in(&self, start: usize, end: usize) -> usize {
        let end = end.min(self.rope.len_chars());
        let start = start.min(end);
        self.rope.char_to_line(end) - self.rope.char_to_line(start)
    }

    /// Insert text (at specified character offset)
    pub fn insert(&mut self, char_offset: usize, text: &str) {
        let char_offset = char_offset.min(self.rope.len_chars());
        self.rope.insert(char_offset, text);
    }

    /// Delete text range (character offset)
    pub fn delete(&mut self, start_char: usize, len_chars: usize) {
        let start_char = start_char.min(self.rope.len_chars());
        let end_char = (start_char + len_chars).min(self.rope.len_chars());

        if start_char < end_char {
            self.rope.remove(start_char..end_char);
        }
    }

    /// Get complete text
    pub fn get_text(&self) -> String {
        self.rope.to_string()
    }

    /// Get text of the specified line (excluding its line terminator)
    pub fn get_line_text(&self, line_number: usize) -> Option<String> {
        if line_number >= self.rope.len_lines() {
            return None;
        }

        let mut text = self.rope.line(line_number).to_string();
        if text.ends_with('\n') {
            text.pop();
            if text.ends_with('\r') {
                text.pop();
            }
        }

        Some(text)
    }
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer for LineIndex {
    fn line_count(&self) -> usize {
        LineIndex::line_count(self)
    }

    fn line_text(&self, line: usize) -> Option<Cow<'_, str>> {
        self.get_line_text(line).map(Cow::Owned)
    }
}
