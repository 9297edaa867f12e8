//! Struct tag strings: `json:"name,omitempty" db:"user_name"`.
//!
//! Each entry is a key followed by a quoted value; the value is a name
//! followed by comma-separated options.

use crate::error::TagError;
use std::fmt;

/// One `key:"name,opt"` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub name: String,
    pub options: Vec<String>,
}

impl Tag {
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    fn value(&self) -> String {
        std::iter::once(self.name.as_str())
            .chain(self.options.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:\"", self.key)?;
        for c in self.value().chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\t' => f.write_str("\\t")?,
                c => write!(f, "{c}")?,
            }
        }
        f.write_str("\"")
    }
}

/// Ordered tag entries, unique by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags {
    tags: Vec<Tag>,
}

impl Tags {
    /// Parse a raw tag string. An empty string has no entries.
    pub fn parse(raw: &str) -> Result<Self, TagError> {
        let mut tags = Tags::default();
        let mut rest = raw;

        loop {
            rest = rest.trim_start_matches(' ');
            if rest.is_empty() {
                break;
            }

            let bytes = rest.as_bytes();
            let key_len = bytes
                .iter()
                .take_while(|&&b| b > b' ' && b != b':' && b != b'"' && b != 0x7f)
                .count();
            if key_len == 0 {
                return Err(TagError::KeySyntax);
            }
            if key_len + 1 >= bytes.len() || bytes[key_len] != b':' {
                return Err(TagError::PairSyntax);
            }
            if bytes[key_len + 1] != b'"' {
                return Err(TagError::ValueSyntax);
            }
            let key = &rest[..key_len];
            rest = &rest[key_len + 1..];

            // scan to the closing quote, skipping escaped characters
            let bytes = rest.as_bytes();
            let mut end = 1;
            while end < bytes.len() && bytes[end] != b'"' {
                if bytes[end] == b'\\' {
                    end += 1;
                }
                end += 1;
            }
            if end >= bytes.len() {
                return Err(TagError::ValueSyntax);
            }
            let quoted = &rest[..=end];
            rest = &rest[end + 1..];

            let value: String =
                serde_json::from_str(quoted).map_err(|_| TagError::ValueSyntax)?;
            let mut parts = value.split(',').map(str::to_string);
            let name = parts.next().unwrap_or_default();
            tags.set(Tag {
                key: key.to_string(),
                name,
                options: parts.collect(),
            });
        }

        Ok(tags)
    }

    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.key == key)
    }

    /// Insert a tag, replacing an existing entry with the same key in place.
    pub fn set(&mut self, tag: Tag) {
        match self.tags.iter_mut().find(|t| t.key == tag.key) {
            Some(existing) => *existing = tag,
            None => self.tags.push(tag),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tag) in self.tags.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{tag}")?;
        }
        Ok(())
    }
}

/// Merge several tag strings into one backtick-quoted tag literal.
///
/// Later strings override keys from earlier ones. Returns an empty string
/// when there are no tags at all.
pub fn format_tags(raw: &[&str]) -> Result<String, TagError> {
    let mut all = Tags::default();
    for s in raw {
        for tag in Tags::parse(s)?.tags {
            all.set(tag);
        }
    }
    if all.is_empty() {
        return Ok(String::new());
    }
    Ok(format!("`{all}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_tag() {
        let tags = Tags::parse(r#"json:"name,omitempty" db:"user_name""#).unwrap();
        let json = tags.get("json").unwrap();
        assert_eq!(json.name, "name");
        assert_eq!(json.options, vec!["omitempty".to_string()]);
        assert!(json.has_option("omitempty"));
        assert_eq!(tags.get("db").unwrap().name, "user_name");
        assert!(tags.get("xml").is_none());
    }

    #[test]
    fn test_parse_empty() {
        assert!(Tags::parse("").unwrap().is_empty());
        assert!(Tags::parse("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Tags::parse(r#":"x""#), Err(TagError::KeySyntax));
        assert_eq!(Tags::parse("json"), Err(TagError::PairSyntax));
        assert_eq!(Tags::parse("json:name"), Err(TagError::ValueSyntax));
        assert_eq!(Tags::parse(r#"json:"unterminated"#), Err(TagError::ValueSyntax));
    }

    #[test]
    fn test_format_tags() {
        assert_eq!(
            format_tags(&[r#"json:"field,omitempty""#]).unwrap(),
            r#"`json:"field,omitempty"`"#
        );
        assert_eq!(
            format_tags(&[r#"json:"field,omitempty" monkey:"true""#]).unwrap(),
            r#"`json:"field,omitempty" monkey:"true"`"#
        );
        assert_eq!(
            format_tags(&[r#"json:"field,omitempty""#, r#"monkey:"true""#]).unwrap(),
            r#"`json:"field,omitempty" monkey:"true"`"#
        );
        assert_eq!(format_tags(&[]).unwrap(), "");
    }

    #[test]
    fn test_format_tags_later_keys_win() {
        assert_eq!(
            format_tags(&[r#"json:"a" db:"b""#, r#"json:"c""#]).unwrap(),
            r#"`json:"c" db:"b"`"#
        );
    }

    #[test]
    fn test_format_tags_rejects_malformed() {
        assert!(format_tags(&["json"]).is_err());
    }
}
