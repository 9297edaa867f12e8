//! Metadata embedded in documentation comments.
//!
//! Lines shaped like `key: <JSON value>` are pulled out of a comment into a
//! metadata map; everything else stays in the comment text.
//!
//! ```text
//! Greet prepares a lovely greeting.
//! example: "Hello there"
//! options: ["formal", "casual"]
//! ```

use regex::Regex;
use serde_json::{Map, Number, Value};
use std::sync::LazyLock;

/// Metadata keys mapped to JSON values.
pub type Metadata = Map<String, Value>;

static METADATA_LINE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_][A-Za-z0-9_-]*): (.+)$"));

/// Comment text with its metadata lines removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedComment {
    pub comment: String,
    pub metadata: Metadata,
}

/// Split a raw comment into residual text and metadata.
///
/// Blank lines are dropped and the remaining lines are trimmed. A metadata
/// line whose value is not valid JSON is dropped with a warning.
pub fn extract(raw: &str) -> ExtractedComment {
    let mut lines = Vec::new();
    let mut metadata = Metadata::new();

    for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Some((key, value)) = split_metadata_line(line) else {
            lines.push(line);
            continue;
        };
        match serde_json::from_str::<Value>(value) {
            Ok(value) => {
                metadata.insert(key.to_string(), normalize_numbers(value));
            }
            Err(err) => {
                tracing::warn!(line, error = %err, "skipping metadata line: value is not JSON");
            }
        }
    }

    ExtractedComment {
        comment: lines.join("\n"),
        metadata,
    }
}

fn split_metadata_line(line: &str) -> Option<(&str, &str)> {
    let re = METADATA_LINE.as_ref().ok()?;
    let caps = re.captures(line)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Decode every number at float64 width.
///
/// Integral values that fit an `i64` keep an integer representation so they
/// render as `3` rather than `3.0`.
fn normalize_numbers(value: Value) -> Value {
    match value {
        Value::Number(n) => {
            let f = n.as_f64().unwrap_or_default();
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                Value::Number(Number::from(f as i64))
            } else {
                Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
            }
        }
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, normalize_numbers(v)))
                .collect(),
        ),
        other => other,
    }
}

/// Whether a metadata flag such as `nullable: true` is set.
pub fn flag(metadata: &Metadata, key: &str) -> bool {
    matches!(metadata.get(key), Some(Value::Bool(true)))
}
