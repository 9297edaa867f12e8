//! Helpers for template renderers working over a [`Definition`](crate::ir::Definition).
//!
//! All helpers are pure functions of their arguments.

use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

pub use crate::naming::{camelize_down, camelize_up, snake_down};

const COMMENT_WIDTH: usize = 80;

/// Pretty JSON indented with tabs.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"\t"));
    value.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| Error::Helper(e.to_string()))
}

/// Compact single-line JSON.
pub fn to_json_inline<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Merge tag strings into one backtick-quoted literal.
pub fn format_tags(tags: &[&str]) -> Result<String> {
    Ok(crate::tags::format_tags(tags)?)
}

pub fn strip_prefix(s: &str, prefix: &str) -> Result<String> {
    s.strip_prefix(prefix)
        .map(str::to_string)
        .ok_or_else(|| Error::Helper(format!("cannot strip prefix: {prefix} from: {s}")))
}

pub fn strip_suffix(s: &str, suffix: &str) -> Result<String> {
    s.strip_suffix(suffix)
        .map(str::to_string)
        .ok_or_else(|| Error::Helper(format!("cannot strip suffix: {suffix} from: {s}")))
}

pub fn has_prefix(s: &str, prefix: &str) -> bool {
    s.starts_with(prefix)
}

pub fn has_suffix(s: &str, suffix: &str) -> bool {
    s.ends_with(suffix)
}

pub fn to_lower(s: &str) -> String {
    s.to_lowercase()
}

pub fn to_upper(s: &str) -> String {
    s.to_uppercase()
}

/// The whole comment on one line.
pub fn format_comment_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `// `-prefixed comment lines wrapped at 80 columns. Paragraphs are
/// separated by an empty comment line.
pub fn format_comment_text(s: &str) -> String {
    let mut out = String::new();
    for (i, paragraph) in paragraphs(s).iter().enumerate() {
        if i > 0 {
            out.push_str("//\n");
        }
        for line in wrap(paragraph, COMMENT_WIDTH) {
            out.push_str("// ");
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

/// One `<p>` element per paragraph with the text HTML-escaped.
pub fn format_comment_html(s: &str) -> String {
    paragraphs(s)
        .iter()
        .map(|p| format!("<p>\n{}\n</p>\n", escape_html(&p.join(" "))))
        .collect()
}

/// Whether `s` is a non-empty run of ASCII digits.
pub fn is_number(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Whether the first `len` bytes of `s` are digits.
pub fn is_number_prefix(s: &str, len: usize) -> bool {
    s.get(..len).is_some_and(is_number)
}

fn paragraphs(s: &str) -> Vec<Vec<&str>> {
    let mut out = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in s.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            continue;
        }
        current.extend(line.split_whitespace());
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn wrap(words: &[&str], width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in words {
        if !line.is_empty() && line.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_json_uses_tabs() {
        assert_eq!(to_json(&json!({"a": 1})).unwrap(), "{\n\t\"a\": 1\n}");
        assert_eq!(to_json_inline(&json!({"a": [1, 2]})).unwrap(), r#"{"a":[1,2]}"#);
    }

    #[test]
    fn test_format_comment_text() {
        assert_eq!(format_comment_text("card's").trim(), "// card's");
        assert_eq!(
            format_comment_text(r#"What happens if I use "quotes"?"#).trim(),
            r#"// What happens if I use "quotes"?"#
        );
        assert_eq!(
            format_comment_text("What about\nnew lines?").trim(),
            "// What about new lines?"
        );
    }

    #[test]
    fn test_format_comment_text_wraps() {
        let long = "word ".repeat(40);
        let text = format_comment_text(&long);
        assert!(text.lines().count() > 1);
        assert!(text.lines().all(|l| l.len() <= COMMENT_WIDTH + 3));
    }

    #[test]
    fn test_format_comment_html() {
        assert_eq!(
            format_comment_html("Use <b> & co.\n\nSecond"),
            "<p>\nUse &lt;b&gt; &amp; co.\n</p>\n<p>\nSecond\n</p>\n"
        );
    }

    #[test]
    fn test_format_comment_line() {
        assert_eq!(format_comment_line("  one\ntwo  three "), "one two three");
    }

    #[test]
    fn test_strip_prefix() {
        assert_eq!(strip_prefix("PrefixSuffix", "Prefix").unwrap(), "Suffix");
        assert_eq!(strip_prefix("PrefixSuffix", "Pre").unwrap(), "fixSuffix");
        let err = strip_prefix("PrefixSuffix", "refix").unwrap_err();
        assert_eq!(err.to_string(), "cannot strip prefix: refix from: PrefixSuffix");
    }

    #[test]
    fn test_strip_suffix() {
        assert_eq!(strip_suffix("PrefixSuffix", "Suffix").unwrap(), "Prefix");
        assert_eq!(strip_suffix("PrefixSuffix", "fix").unwrap(), "PrefixSuf");
        let err = strip_suffix("PrefixSuffix", "Suf").unwrap_err();
        assert_eq!(err.to_string(), "cannot strip suffix: Suf from: PrefixSuffix");
    }

    #[test]
    fn test_prefix_suffix_and_case() {
        assert!(has_prefix("GreeterService", "Greeter"));
        assert!(!has_prefix("GreeterService", "Service"));
        assert!(has_suffix("GreeterService", "Service"));
        assert!(!has_suffix("GreeterService", "Greeter"));
        assert_eq!(to_lower("GreetRequest"), "greetrequest");
        assert_eq!(to_upper("GreetRequest"), "GREETREQUEST");
    }

    #[test]
    fn test_format_tags() {
        assert_eq!(
            format_tags(&[r#"json:"field,omitempty""#, r#"monkey:"true""#]).unwrap(),
            r#"`json:"field,omitempty" monkey:"true"`"#
        );
        assert!(format_tags(&["json:broken"]).is_err());
    }

    #[test]
    fn test_numbers() {
        assert!(is_number("123"));
        assert!(!is_number("12a"));
        assert!(!is_number(""));
        assert!(is_number_prefix("2fa", 1));
        assert!(!is_number_prefix("2fa", 2));
        assert!(!is_number_prefix("1", 3));
    }
}
