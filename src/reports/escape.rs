//! Escaping for HTML and Markdown output.
//!
//! Package names, descriptions and licenses come straight from the input
//! SBOM and must be escaped before they are embedded in a report.

fn escape_with(s: &str, replace: impl Fn(char) -> Option<&'static str>) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match replace(c) {
            Some(replacement) => result.push_str(replacement),
            None => result.push(c),
        }
    }
    result
}

/// Escape a string for HTML text or a quoted attribute value.
///
/// ```
/// use sbom_analyzer::reports::escape::escape_html;
///
/// assert_eq!(escape_html("<b>\"x\" & 'y'</b>"),
///     "&lt;b&gt;&quot;x&quot; &amp; &#x27;y&#x27;&lt;/b&gt;");
/// ```
#[must_use]
pub fn escape_html(s: &str) -> String {
    escape_with(s, |c| match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#x27;"),
        _ => None,
    })
}

/// Escape a string for a Markdown table cell.
///
/// ```
/// use sbom_analyzer::reports::escape::escape_markdown_table;
///
/// assert_eq!(escape_markdown_table("a | b\nc"), "a \\| b c");
/// ```
#[must_use]
pub fn escape_markdown_table(s: &str) -> String {
    escape_with(s, |c| match c {
        '|' => Some("\\|"),
        '\n' => Some(" "),
        '\r' => Some(""),
        '`' => Some("\\`"),
        '[' => Some("\\["),
        ']' => Some("\\]"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        _ => None,
    })
}

/// Escape a string for inline Markdown (headings, list items).
#[must_use]
pub fn escape_markdown_inline(s: &str) -> String {
    escape_with(s, |c| match c {
        '*' => Some("\\*"),
        '_' => Some("\\_"),
        '`' => Some("\\`"),
        '[' => Some("\\["),
        ']' => Some("\\]"),
        '#' => Some("\\#"),
        '!' => Some("\\!"),
        '~' => Some("\\~"),
        '|' => Some("\\|"),
        '<' => Some("\\<"),
        '>' => Some("\\>"),
        '\n' => Some(" "),
        '\r' => Some(""),
        _ => None,
    })
}

/// HTML-escape an optional value, `-` when absent.
#[must_use]
pub fn escape_html_opt(s: Option<&str>) -> String {
    s.map_or_else(|| "-".to_string(), escape_html)
}

/// Markdown-table-escape an optional value, `-` when absent.
#[must_use]
pub fn escape_md_opt(s: Option<&str>) -> String {
    s.map_or_else(|| "-".to_string(), escape_markdown_table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html_script_in_package_name() {
        assert_eq!(
            escape_html("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("&lt;"), "&amp;lt;");
        assert_eq!(escape_html("pkg:npm/%40scope/name@1.0.0"), "pkg:npm/%40scope/name@1.0.0");
    }

    #[test]
    fn test_escape_markdown_table_breakout() {
        assert_eq!(
            escape_markdown_table("row1\n| new | row |"),
            "row1 \\| new \\| row \\|"
        );
        assert_eq!(escape_markdown_table("[evil](http://x)"), "\\[evil\\](http://x)");
        assert_eq!(escape_markdown_table(">=1.0 <2.0"), "&gt;=1.0 &lt;2.0");
    }

    #[test]
    fn test_escape_markdown_inline() {
        assert_eq!(escape_markdown_inline("serde_json"), "serde\\_json");
        assert_eq!(escape_markdown_inline("# heading"), "\\# heading");
    }

    #[test]
    fn test_optional_helpers() {
        assert_eq!(escape_html_opt(Some("<a>")), "&lt;a&gt;");
        assert_eq!(escape_html_opt(None), "-");
        assert_eq!(escape_md_opt(Some("a|b")), "a\\|b");
        assert_eq!(escape_md_opt(None), "-");
    }

    #[test]
    fn test_unicode_preserved() {
        assert_eq!(escape_html("日本語"), "日本語");
        assert_eq!(escape_markdown_table("émoji 🎉"), "émoji 🎉");
    }
}
