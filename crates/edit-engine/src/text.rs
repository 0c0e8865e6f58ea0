//! Character-offset text utilities shared across the engine.
//!
//! The engine addresses the document exclusively in Unicode scalar values
//! (`char` offsets), while Rust strings are byte-indexed. These helpers keep
//! the conversion in one place and guarantee the clamping behavior the rest
//! of the engine relies on: out-of-range offsets never panic, they clamp.

/// Convert a char offset into a byte offset, clamping to the end of `text`.
pub fn byte_of_char(text: &str, char_offset: usize) -> usize {
    if char_offset == 0 {
        return 0;
    }
    text.char_indices()
        .nth(char_offset)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// Convert a byte offset into a char offset.
///
/// `byte_offset` is expected to lie on a char boundary; anything past the end
/// of `text` counts the whole string.
pub fn char_of_byte(text: &str, byte_offset: usize) -> usize {
    text.get(..byte_offset).unwrap_or(text).chars().count()
}

/// Total char count of `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Slice `text` by a half-open char range, clamping both bounds.
pub fn slice_chars(text: &str, start: usize, end: usize) -> &str {
    let (start, end) = if start <= end { (start, end) } else { (end, start) };
    let start_byte = byte_of_char(text, start);
    let end_byte = byte_of_char(text, end);
    &text[start_byte..end_byte]
}

/// Replace a half-open char range with `replacement`, clamping both bounds.
pub fn splice_chars(text: &str, start: usize, end: usize, replacement: &str) -> String {
    let (start, end) = if start <= end { (start, end) } else { (end, start) };
    let start_byte = byte_of_char(text, start);
    let end_byte = byte_of_char(text, end);
    let mut out = String::with_capacity(text.len() - (end_byte - start_byte) + replacement.len());
    out.push_str(&text[..start_byte]);
    out.push_str(replacement);
    out.push_str(&text[end_byte..]);
    out
}

/// Normalize CRLF and lone CR line endings to LF.
pub fn normalize_newlines(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Split into logical lines, preserving a trailing empty line.
///
/// `"a\nb\n"` yields `["a", "b", ""]` so that a caret after the final newline
/// still addresses a real line.
pub fn split_lines_keep_trailing(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = text.split('\n').collect();
    if lines.is_empty() {
        lines.push("");
    }
    lines
}

/// Char offset of the start of the line containing `offset`.
pub fn line_start_at(text: &str, offset: usize) -> usize {
    let offset = offset.min(char_len(text));
    text.chars()
        .take(offset)
        .enumerate()
        .filter(|(_, c)| *c == '\n')
        .map(|(i, _)| i + 1)
        .last()
        .unwrap_or(0)
}

/// Char offset of the end of the line containing `offset` (before its `\n`).
pub fn line_end_at(text: &str, offset: usize) -> usize {
    let total = char_len(text);
    let offset = offset.min(total);
    text.chars()
        .enumerate()
        .skip(offset)
        .find(|(_, c)| *c == '\n')
        .map(|(i, _)| i)
        .unwrap_or(total)
}

/// Leading whitespace (spaces and tabs) of the line containing `offset`.
pub fn leading_whitespace_at(text: &str, offset: usize) -> String {
    let start = line_start_at(text, offset);
    text.chars()
        .skip(start)
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect()
}
