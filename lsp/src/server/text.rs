use ropey::Rope;
use tower_lsp::lsp_types::{Position, Range, TextDocumentContentChangeEvent, TextEdit};

use orion_core::{FixEdit, LineRange};

/// Convert an LSP UTF-16 position to a rope char index, clamped to the end
/// of the line. A char straddling the target column is not included.
pub(crate) fn position_to_char_idx(text: &Rope, pos: Position) -> usize {
    let line_idx = pos.line as usize;
    if line_idx >= text.len_lines() {
        return text.len_chars();
    }
    let target_utf16 = pos.character as usize;

    let mut seen_utf16 = 0usize;
    let mut chars_in_line = 0usize;
    for ch in text.line(line_idx).chars() {
        let width = ch.len_utf16();
        if seen_utf16 + width > target_utf16 {
            break;
        }
        seen_utf16 += width;
        chars_in_line += 1;
    }
    text.line_to_char(line_idx) + chars_in_line
}

/// Apply one LSP content change to the buffer. A change without a range is
/// a full replacement.
pub(crate) fn apply_incremental_change_rope(text: &mut Rope, change: &TextDocumentContentChangeEvent) {
    let Some(range) = &change.range else {
        *text = Rope::from_str(&change.text);
        return;
    };

    let a = position_to_char_idx(text, range.start);
    let b = position_to_char_idx(text, range.end);
    let (start, end) = if a <= b { (a, b) } else { (b, a) };

    if start != end {
        text.remove(start..end);
    }
    if !change.text.is_empty() {
        text.insert(start, &change.text);
    }
}

/// Word under the cursor: `\w+` run touching `character`, with its starting
/// column. Empty when the cursor sits on punctuation or whitespace.
pub(crate) fn word_at_position(line: &str, character: usize) -> Option<(String, u32)> {
    let chars: Vec<char> = line.chars().collect();
    let cursor = character.min(chars.len());

    let is_word = |c: &char| c.is_alphanumeric() || *c == '_';
    let mut start = cursor;
    while start > 0 && is_word(&chars[start - 1]) {
        start -= 1;
    }
    let mut end = cursor;
    while end < chars.len() && is_word(&chars[end]) {
        end += 1;
    }

    if start == end {
        return None;
    }
    Some((chars[start..end].iter().collect(), start as u32))
}

pub(crate) fn to_lsp_range(range: LineRange) -> Range {
    Range {
        start: Position::new(range.line, range.start),
        end: Position::new(range.line, range.end),
    }
}

/// Number of UTF-16 units in one line of the rope, excluding the newline.
fn line_len_utf16(text: &Rope, line: u32) -> u32 {
    let line_idx = line as usize;
    if line_idx >= text.len_lines() {
        return 0;
    }
    text.line(line_idx)
        .chars()
        .filter(|c| *c != '\n' && *c != '\r')
        .map(|c| c.len_utf16() as u32)
        .sum()
}

/// Lower a core fix edit to one LSP text edit against the current buffer.
pub(crate) fn fix_edit_to_text_edit(text: &Rope, edit: &FixEdit) -> TextEdit {
    match edit {
        FixEdit::ReplaceLine { line, text: new_text } => TextEdit {
            range: Range {
                start: Position::new(*line, 0),
                end: Position::new(*line, line_len_utf16(text, *line)),
            },
            new_text: new_text.clone(),
        },
        FixEdit::DeleteLine { line } => {
            let last_line = text.len_lines().saturating_sub(1) as u32;
            let range = if *line < last_line {
                Range {
                    start: Position::new(*line, 0),
                    end: Position::new(line + 1, 0),
                }
            } else {
                // Final line has no trailing newline to swallow.
                Range {
                    start: Position::new(*line, 0),
                    end: Position::new(*line, line_len_utf16(text, *line)),
                }
            };
            TextEdit {
                range,
                new_text: String::new(),
            }
        }
        FixEdit::ReplaceRange { range, text: new_text } => TextEdit {
            range: to_lsp_range(*range),
            new_text: new_text.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_conversion_clamps_to_line_end() {
        let rope = Rope::from_str("let x = 1\nshow x\n");
        assert_eq!(position_to_char_idx(&rope, Position::new(0, 4)), 4);
        assert_eq!(position_to_char_idx(&rope, Position::new(0, 99)), 10);
        assert_eq!(position_to_char_idx(&rope, Position::new(9, 0)), rope.len_chars());
    }

    #[test]
    fn position_conversion_counts_utf16_units() {
        // "𝄞" is two UTF-16 units but one rope char.
        let rope = Rope::from_str("let s = \"\u{1D11E}\"x\n");
        assert_eq!(position_to_char_idx(&rope, Position::new(0, 9)), 9);
        assert_eq!(position_to_char_idx(&rope, Position::new(0, 11)), 10);
        assert_eq!(position_to_char_idx(&rope, Position::new(0, 12)), 11);
        // A target inside the surrogate pair stops before it.
        assert_eq!(position_to_char_idx(&rope, Position::new(0, 10)), 9);
    }

    #[test]
    fn incremental_change_replaces_a_span() {
        let mut rope = Rope::from_str("let x = 1\n");
        let change = TextDocumentContentChangeEvent {
            range: Some(Range {
                start: Position::new(0, 8),
                end: Position::new(0, 9),
            }),
            range_length: None,
            text: "42".to_string(),
        };
        apply_incremental_change_rope(&mut rope, &change);
        assert_eq!(rope.to_string(), "let x = 42\n");
    }

    #[test]
    fn full_change_replaces_the_buffer() {
        let mut rope = Rope::from_str("old");
        let change = TextDocumentContentChangeEvent {
            range: None,
            range_length: None,
            text: "new text".to_string(),
        };
        apply_incremental_change_rope(&mut rope, &change);
        assert_eq!(rope.to_string(), "new text");
    }

    #[test]
    fn word_extraction_spans_both_sides_of_the_cursor() {
        assert_eq!(word_at_position("show total", 7), Some(("total".to_string(), 5)));
        assert_eq!(word_at_position("show total", 5), Some(("total".to_string(), 5)));
        assert_eq!(word_at_position("show total", 4), Some(("show".to_string(), 0)));
        assert_eq!(word_at_position("a + b", 2), None);
    }

    #[test]
    fn delete_line_edit_swallows_the_newline() {
        let rope = Rope::from_str("let y = 5\nshow 1\n");
        let edit = fix_edit_to_text_edit(&rope, &FixEdit::DeleteLine { line: 0 });
        assert_eq!(edit.range.start, Position::new(0, 0));
        assert_eq!(edit.range.end, Position::new(1, 0));
        assert!(edit.new_text.is_empty());
    }

    #[test]
    fn replace_line_edit_covers_the_whole_line() {
        let rope = Rope::from_str("    let x = 2\n");
        let edit = fix_edit_to_text_edit(
            &rope,
            &FixEdit::ReplaceLine {
                line: 0,
                text: "    x = 2".to_string(),
            },
        );
        assert_eq!(edit.range.end, Position::new(0, 13));
        assert_eq!(edit.new_text, "    x = 2");
    }
}
