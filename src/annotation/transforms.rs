//! String-transform primitives used by annotation passes 14-15 (spec.md
//! §4.3). Grounded in `annotation.py`'s `transform_text_preceding_block`,
//! `transform_text_following_block`, and
//! `transform_text_following_block_preceding_inline`.

/// Strip trailing whitespace from `text`, then append a newline and
/// `physical_level` units of indentation. Used before a block child or a
/// following block sibling.
pub fn text_preceding_block(text: &str, physical_level: u32, one_indent: &str) -> String {
    let trimmed = text.trim_end();
    format!("{trimmed}\n{}", one_indent.repeat(physical_level as usize))
}

/// Strip leading whitespace from `text`, then prepend a newline and
/// `physical_level` units of indentation. Used after a block element.
pub fn text_following_block(text: &str, physical_level: u32, one_indent: &str) -> String {
    let trimmed = text.trim_start();
    format!("\n{}{trimmed}", one_indent.repeat(physical_level as usize))
}

/// Ensure the leading whitespace run, if any, contains a newline. Used
/// between a block element and a following inline sibling so the inline run
/// still starts on its own line without otherwise touching the text.
pub fn text_following_block_preceding_inline(text: &str, _physical_level: u32) -> String {
    let leading_len = text.len() - text.trim_start().len();
    if leading_len > 0 && !text[..leading_len].contains('\n') {
        format!("\n{text}")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preceding_block_strips_trailing_and_indents() {
        assert_eq!(text_preceding_block("  hi   ", 2, "  "), "  hi\n    ");
    }

    #[test]
    fn following_block_strips_leading_and_indents() {
        assert_eq!(text_following_block("   hi  ", 1, "  "), "\n  hi  ");
    }

    #[test]
    fn following_block_preceding_inline_adds_newline_when_missing() {
        assert_eq!(text_following_block_preceding_inline("  x", 0), "\n  x");
    }

    #[test]
    fn following_block_preceding_inline_keeps_existing_newline() {
        assert_eq!(text_following_block_preceding_inline("\n  x", 0), "\n  x");
    }

    #[test]
    fn following_block_preceding_inline_leaves_text_with_no_leading_ws() {
        assert_eq!(text_following_block_preceding_inline("x", 0), "x");
    }
}
