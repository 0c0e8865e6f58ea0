//! Rope-backed line index.
//!
//! Maps between char offsets and (line, column) coordinates and answers
//! line-range queries over a fixed revision of the document text. Callers
//! build one against the current text and query it O(log n) through the
//! rope.

use ropey::Rope;

/// Line/column lookup over a fixed revision of the document text.
#[derive(Debug, Clone)]
pub struct LineIndex {
    rope: Rope,
}

impl LineIndex {
    /// Build an index for `text`.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Total char count of the indexed text.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Number of logical lines, counting the trailing empty line after a
    /// final newline.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Line containing `offset` (clamped).
    pub fn line_of(&self, offset: usize) -> usize {
        let offset = offset.min(self.rope.len_chars());
        self.rope.char_to_line(offset)
    }

    /// (line, column) of `offset` (clamped), column in chars.
    pub fn position_of(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        (line, offset - self.rope.line_to_char(line))
    }

    /// Char offset of the start of `line` (clamped to the last line).
    pub fn line_start(&self, line: usize) -> usize {
        let line = line.min(self.rope.len_lines().saturating_sub(1));
        self.rope.line_to_char(line)
    }

    /// Char offset of the end of `line`, excluding its terminating newline.
    pub fn line_end(&self, line: usize) -> usize {
        let line = line.min(self.rope.len_lines().saturating_sub(1));
        let start = self.rope.line_to_char(line);
        let raw: String = self.rope.line(line).chars().collect();
        let trimmed = raw.strip_suffix('\n').unwrap_or(&raw);
        start + trimmed.chars().count()
    }

    /// Char offset for (line, column), clamping the column to the line length.
    pub fn offset_of(&self, line: usize, column: usize) -> usize {
        let start = self.line_start(line);
        let end = self.line_end(line);
        (start + column).min(end)
    }

    /// The text of `line` without its terminating newline.
    pub fn line_text(&self, line: usize) -> String {
        let line = line.min(self.rope.len_lines().saturating_sub(1));
        let raw: String = self.rope.line(line).chars().collect();
        raw.strip_suffix('\n').unwrap_or(&raw).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_round_trip() {
        let index = LineIndex::from_text("foo\nbar\nbaz");
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.position_of(5), (1, 1));
        assert_eq!(index.offset_of(1, 1), 5);
        assert_eq!(index.offset_of(1, 99), 7);
    }

    #[test]
    fn trailing_newline_counts_a_line() {
        let index = LineIndex::from_text("a\n");
        assert_eq!(index.line_count(), 2);
        assert_eq!(index.line_start(1), 2);
        assert_eq!(index.line_end(1), 2);
        assert_eq!(index.line_text(0), "a");
    }

    #[test]
    fn clamping() {
        let index = LineIndex::from_text("ab");
        assert_eq!(index.position_of(99), (0, 2));
        assert_eq!(index.line_start(42), 0);
    }
}
