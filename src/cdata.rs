//! CDATA-safe rendering (spec.md §4.6): splits any `]]>` occurrence across
//! section boundaries so the forbidden substring never appears inside a
//! CDATA section. Grounded in `document_formatter.py`'s `_render_safe_cdata`.

/// Render `content` as one or more `<![CDATA[...]]>` sections, splitting at
/// every `]]>` so the closing delimiter never appears mid-section. The `>`
/// that would otherwise complete a stray `]]>` is instead emitted outside any
/// section as the entity `&gt;`. A `]]>` found at the very start of the
/// remaining content is emitted as a bare `]]&gt;` rather than opening an
/// empty CDATA section just to immediately close it.
pub fn render_safe_cdata(content: &str) -> String {
    if content.is_empty() {
        return "<![CDATA[]]>".to_string();
    }
    if !content.contains("]]>") {
        return format!("<![CDATA[{content}]]>");
    }

    let mut result = String::new();
    let mut remaining = content;
    while let Some(pos) = remaining.find("]]>") {
        if pos == 0 {
            result.push_str("]]&gt;");
            remaining = &remaining[3..];
        } else {
            let before_and_brackets = &remaining[..pos + 2];
            result.push_str("<![CDATA[");
            result.push_str(before_and_brackets);
            result.push_str("]]>");
            result.push_str("&gt;");
            remaining = &remaining[pos + 3..];
        }
    }
    if !remaining.is_empty() {
        result.push_str("<![CDATA[");
        result.push_str(remaining);
        result.push_str("]]>");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_yields_empty_section() {
        assert_eq!(render_safe_cdata(""), "<![CDATA[]]>");
    }

    #[test]
    fn content_without_marker_is_single_section() {
        assert_eq!(render_safe_cdata("hello"), "<![CDATA[hello]]>");
    }

    #[test]
    fn splits_at_forbidden_sequence() {
        assert_eq!(
            render_safe_cdata("before]]>after"),
            "<![CDATA[before]]]]>&gt;<![CDATA[after]]>"
        );
    }

    #[test]
    fn bare_forbidden_sequence_has_no_empty_section() {
        assert_eq!(render_safe_cdata("]]>"), "]]&gt;");
    }

    #[test]
    fn leading_forbidden_sequence_skips_empty_section() {
        assert_eq!(render_safe_cdata("]]>after"), "]]&gt;<![CDATA[after]]>");
    }

    #[test]
    fn never_contains_the_forbidden_substring_inside_a_section() {
        let rendered = render_safe_cdata("a]]>b]]>c");
        for section in rendered.split("<![CDATA[").skip(1) {
            let body = section.split("]]>").next().unwrap();
            assert!(!body.contains("]]>"));
        }
    }
}
